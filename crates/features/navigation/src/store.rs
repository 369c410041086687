use crate::error::NavigationError;
use crate::events::SelectionChanged;
use geonav_domain::constants::WORLD_NAME;
use geonav_domain::{HierarchyId, RegionRef, SelectedRegion, Selection, Subregions};
use geonav_event_bus::EventBus;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

#[derive(Debug)]
struct StoreState {
    selection: Selection,
    generation: u64,
}

#[derive(Debug)]
struct StoreInner {
    state: RwLock<StoreState>,
    bus: EventBus,
    root_name: String,
}

/// Session-scoped owner of the current [`Selection`].
///
/// Every mutation bumps the generation and broadcasts a [`SelectionChanged`] before the
/// call returns. The event is published while the state lock is held, so subscribers
/// observe changes in generation order. The store performs no I/O and never fails.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    inner: Arc<StoreInner>,
}

impl SelectionStore {
    /// Creates a store at generation 0 holding `initial`.
    pub fn new(bus: EventBus, initial: Selection) -> Self {
        Self::with_root_name(bus, initial, WORLD_NAME)
    }

    /// Like [`SelectionStore::new`], with `root_name` as the label of every root selection
    /// the store creates itself.
    pub fn with_root_name(bus: EventBus, initial: Selection, root_name: impl Into<String>) -> Self {
        let state = StoreState { selection: initial, generation: 0 };
        let inner = StoreInner { state: RwLock::new(state), bus, root_name: root_name.into() };
        Self { inner: Arc::new(inner) }
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.inner.state.read().selection.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.state.read().generation
    }

    /// Selection and generation read atomically.
    #[must_use]
    pub fn snapshot(&self) -> SelectionChanged {
        let state = self.inner.state.read();
        SelectionChanged { generation: state.generation, selection: state.selection.clone() }
    }

    /// Replaces the selected region; its flag may still be unknown.
    pub fn set_selected_region(&self, region: SelectedRegion) -> SelectionChanged {
        self.update(|selection| selection.region = region)
    }

    /// Replaces the hierarchy only. See [`SelectionStore::switch_hierarchy`] for the usual
    /// hierarchy change, which also resets the region.
    pub fn set_selected_hierarchy(&self, hierarchy: HierarchyId) -> SelectionChanged {
        self.update(|selection| selection.hierarchy = hierarchy)
    }

    /// Replaces the hierarchy and resets the region to the root in one change.
    ///
    /// A region id only has meaning inside one hierarchy.
    pub fn switch_hierarchy(&self, hierarchy: HierarchyId) -> SelectionChanged {
        let root = Selection::root(hierarchy, self.inner.root_name.as_str());
        self.update(|selection| *selection = root)
    }

    /// Records the resolved flag of `region` if it is still the selected one.
    pub fn set_subregions(&self, region: RegionRef, subregions: Subregions) -> Option<SelectionChanged> {
        let mut state = self.inner.state.write();
        if state.selection.region.region != region {
            trace!(%region, "Selection moved on; dropping resolved flag");
            return None;
        }
        Some(self.commit(&mut state, |selection| selection.region.subregions = subregions))
    }

    /// Subscribes to [`SelectionChanged`] events.
    ///
    /// # Errors
    /// [`NavigationError::EventBus`] if the bus registered the event under another channel kind.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<Arc<SelectionChanged>>, NavigationError> {
        Ok(self.inner.bus.subscribe::<SelectionChanged>()?)
    }

    fn update(&self, change: impl FnOnce(&mut Selection)) -> SelectionChanged {
        let mut state = self.inner.state.write();
        self.commit(&mut state, change)
    }

    fn commit(&self, state: &mut StoreState, change: impl FnOnce(&mut Selection)) -> SelectionChanged {
        change(&mut state.selection);
        state.generation += 1;

        let event = SelectionChanged { generation: state.generation, selection: state.selection.clone() };
        trace!(generation = event.generation, region = %event.selection.region.region, "Selection changed");
        if let Err(error) = self.inner.bus.publish(event.clone()) {
            warn!(%error, "Selection change could not be broadcast");
        }
        event
    }
}
