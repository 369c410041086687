use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{trace, warn};

/// Default broadcast buffer; selection bursts from a single user stay well below it.
const DEFAULT_CAPACITY: usize = 128;
const MIN_CAPACITY: usize = 1;

/// Supported channel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Every subscriber receives every event, up to `capacity` buffered events.
    Broadcast { capacity: usize },
    /// Subscribers observe only the latest value.
    Watch,
}

impl ChannelKind {
    const fn same_family(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Broadcast { .. }, Self::Broadcast { .. }) | (Self::Watch, Self::Watch)
        )
    }
}

/// Marker trait for types that can be sent across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct ChannelState {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

#[derive(Debug)]
enum ChannelHandle<T> {
    Broadcast(broadcast::Sender<Arc<T>>),
    Watch(watch::Sender<Arc<T>>),
}

impl<T: Event> ChannelHandle<T> {
    fn from_state(state: &ChannelState) -> Result<Self, EventBusError> {
        let handle = match state.kind {
            ChannelKind::Broadcast { .. } => state
                .sender
                .downcast_ref::<broadcast::Sender<Arc<T>>>()
                .map(|tx| Self::Broadcast(tx.clone())),
            ChannelKind::Watch => {
                state.sender.downcast_ref::<watch::Sender<Arc<T>>>().map(|tx| Self::Watch(tx.clone()))
            },
        };
        handle.ok_or_else(type_mismatch::<T>)
    }

    fn into_broadcast(self) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        match self {
            Self::Broadcast(tx) => Ok(tx),
            Self::Watch(_) => Err(type_mismatch::<T>()),
        }
    }

    fn into_watch(self) -> Result<watch::Sender<Arc<T>>, EventBusError> {
        match self {
            Self::Watch(tx) => Ok(tx),
            Self::Broadcast(_) => Err(type_mismatch::<T>()),
        }
    }
}

/// A thread-safe registry of typed channels.
///
/// Cloning the bus is cheap; clones share the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, ChannelState>>>,
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T` over a broadcast channel with the default capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is already registered as a
    /// watch channel.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to events of type `T` with a specific broadcast buffer capacity.
    ///
    /// The capacity only applies when this call creates the channel.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] for a zero capacity, or
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a watch channel.
    ///
    /// # Examples
    /// ```rust
    /// use geonav_event_bus::EventBus;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Tick(u64);
    ///
    /// # fn main() -> Result<(), geonav_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let _rx = bus.subscribe_with_capacity::<Tick>(16)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        let capacity = validate_capacity(capacity)?;
        let tx = self.broadcast_sender::<T>(capacity)?;
        Ok(tx.subscribe())
    }

    /// Subscribes to a watch channel, creating it with `initial` if absent.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is registered as a
    /// broadcast channel.
    pub fn subscribe_watch<T: Event>(
        &self,
        initial: T,
    ) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        let tx = self.watch_sender(Arc::new(initial))?;
        Ok(tx.subscribe())
    }

    /// Subscribes to an existing watch channel without supplying an initial value.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelNotFound`] if nothing was published on the
    /// channel yet, or [`EventBusError::ChannelKindMismatch`] for a broadcast channel.
    ///
    /// # Examples
    /// ```rust
    /// use geonav_event_bus::EventBus;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Snapshot(u64);
    ///
    /// # fn main() -> Result<(), geonav_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// assert!(bus.watch_receiver::<Snapshot>().is_err());
    ///
    /// bus.publish_watch(Snapshot(7))?;
    /// let rx = bus.watch_receiver::<Snapshot>()?;
    /// assert_eq!(rx.borrow().0, 7);
    /// # Ok(())
    /// # }
    /// ```
    pub fn watch_receiver<T: Event>(&self) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        let tx = self.existing::<T>(ChannelKind::Watch)?.into_watch()?;
        Ok(tx.subscribe())
    }

    /// Returns the value currently held by the watch channel of `T`.
    ///
    /// # Errors
    /// Same as [`EventBus::watch_receiver`].
    pub fn latest<T: Event>(&self) -> Result<Arc<T>, EventBusError> {
        let tx = self.existing::<T>(ChannelKind::Watch)?.into_watch()?;
        let value = tx.borrow().clone();
        Ok(value)
    }

    /// Publishes an event over broadcast and returns the number of receivers reached.
    ///
    /// Publishing without subscribers is not an error.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is registered as a watch channel.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Publishes a shared event instance over broadcast without re-wrapping.
    ///
    /// # Errors
    /// Same as [`EventBus::publish`].
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let tx = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        let count = tx.send(event).unwrap_or_default();
        trace!(event = type_name::<T>(), count, "Event dispatched");
        Ok(count)
    }

    /// Replaces the value of the watch channel of `T`, creating the channel if missing.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is registered as a
    /// broadcast channel.
    pub fn publish_watch<T: Event>(&self, value: T) -> Result<(), EventBusError> {
        self.publish_watch_arc(Arc::new(value))
    }

    /// Replaces the value of the watch channel of `T` without re-wrapping.
    ///
    /// # Errors
    /// Same as [`EventBus::publish_watch`].
    pub fn publish_watch_arc<T: Event>(&self, value: Arc<T>) -> Result<(), EventBusError> {
        let tx = self.watch_sender(Arc::clone(&value))?;
        tx.send_replace(value);
        trace!(event = type_name::<T>(), receivers = tx.receiver_count(), "Watch value replaced");
        Ok(())
    }

    /// Drops every channel, closing all receivers.
    ///
    /// Returns the number of channels that were closed.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        self.ensure::<T>(ChannelKind::Broadcast { capacity }, || {
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Box::new(tx)
        })?
        .into_broadcast()
    }

    fn watch_sender<T: Event>(&self, initial: Arc<T>) -> Result<watch::Sender<Arc<T>>, EventBusError> {
        self.ensure::<T>(ChannelKind::Watch, || {
            let (tx, _) = watch::channel::<Arc<T>>(initial);
            Box::new(tx)
        })?
        .into_watch()
    }

    fn existing<T: Event>(&self, kind: ChannelKind) -> Result<ChannelHandle<T>, EventBusError> {
        let channels = self.channels.read();
        let state = channels.get(&TypeId::of::<T>()).ok_or_else(|| {
            EventBusError::ChannelNotFound {
                message: type_name::<T>().into(),
                context: Some(format!("No {kind:?} channel registered").into()),
            }
        })?;
        check_kind::<T>(state.kind, kind)?;
        ChannelHandle::from_state(state)
    }

    fn ensure<T: Event>(
        &self,
        kind: ChannelKind,
        create: impl FnOnce() -> Box<dyn Any + Send + Sync>,
    ) -> Result<ChannelHandle<T>, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(state) = self.channels.read().get(&id) {
            check_kind::<T>(state.kind, kind)?;
            return ChannelHandle::from_state(state);
        }

        let mut channels = self.channels.write();
        let state = channels.entry(id).or_insert_with(|| {
            trace!(event = type_name::<T>(), ?kind, "Initializing new event channel");
            ChannelState { kind, sender: create() }
        });
        check_kind::<T>(state.kind, kind)?;
        ChannelHandle::from_state(state)
    }
}

fn check_kind<T>(existing: ChannelKind, requested: ChannelKind) -> Result<(), EventBusError> {
    if !existing.same_family(requested) {
        return Err(EventBusError::ChannelKindMismatch {
            message: format!("Expected {requested:?} but found {existing:?} for {}", type_name::<T>())
                .into(),
            context: None,
        });
    }

    if let (
        ChannelKind::Broadcast { capacity: existing_capacity },
        ChannelKind::Broadcast { capacity: requested_capacity },
    ) = (existing, requested)
        && existing_capacity != requested_capacity
        && requested_capacity != DEFAULT_CAPACITY
    {
        warn!(
            event = type_name::<T>(),
            existing_capacity, requested_capacity, "Broadcast channel already initialized with a different capacity"
        );
    }

    Ok(())
}

fn type_mismatch<T>() -> EventBusError {
    EventBusError::TypeMismatch {
        message: type_name::<T>().into(),
        context: Some("Unexpected event type".into()),
    }
}

fn validate_capacity(capacity: usize) -> Result<usize, EventBusError> {
    if capacity < MIN_CAPACITY {
        return Err(EventBusError::InvalidCapacity {
            message: format!("capacity must be >= {MIN_CAPACITY}").into(),
            context: None,
        });
    }
    Ok(capacity)
}
