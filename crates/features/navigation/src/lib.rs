//! # Navigation
//!
//! Keeps the breadcrumb trail consistent with the selected region.
//!
//! * [`SelectionStore`] holds `(region, hierarchy)` and broadcasts every change.
//! * [`TrailResolver`] rebuilds the trail from the region service's ancestor chain,
//!   short-circuits root selections, truncates locally on crumb clicks and discards
//!   lookups that a newer selection overtook.
//! * [`NavigationSession`] wires both to a [`RegionService`](geonav_kernel::service::RegionService)
//!   and runs the resolution task.
//!
//! Trail changes are published as [`TrailSnapshot`]s on a watch channel, so observers
//! only ever see a previous or a fully rebuilt trail.

mod error;
mod events;
mod resolver;
mod session;
mod store;

pub use error::{NavigationError, NavigationErrorExt};
pub use events::{SelectionChanged, TrailPhase, TrailSnapshot};
pub use resolver::{PendingLookup, Plan, Resolution, ResolverOptions, TrailResolver};
pub use session::{NavigationSession, NavigationSessionBuilder};
pub use store::SelectionStore;
