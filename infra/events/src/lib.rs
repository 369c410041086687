//! # Event Bus
//!
//! A type-indexed registry of `tokio` channels shared by the navigation components.
//!
//! * **Broadcast** channels carry every event to every subscriber (selection changes).
//! * **Watch** channels keep only the latest value (trail snapshots), so late
//!   subscribers start from the current state.
//!
//! Channels are created lazily on first use and identified by the event's Rust type.
//!
//! # Example
//!
//! ```rust
//! use geonav_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct RegionSelected { id: u64 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!
//!     let mut rx = bus.subscribe::<RegionSelected>()?;
//!     bus.publish(RegionSelected { id: 42 })?;
//!
//!     if let Some(event) = EventReceiverExt::recv(&mut rx).await {
//!         assert_eq!(event.id, 42);
//!     }
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
