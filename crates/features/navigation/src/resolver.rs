//! Breadcrumb trail resolution.
//!
//! The resolver turns selections into trails. A selection change is handled in two
//! steps: [`TrailResolver::begin`] runs synchronously in event order and decides
//! whether a lookup is needed (taking a ticket), and [`TrailResolver::complete`]
//! performs the ancestor lookup and applies it only if its ticket is still the latest.
//! Clicking a crumb truncates the trail locally and invalidates every outstanding ticket.

use crate::error::NavigationError;
use crate::events::{SelectionChanged, TrailPhase, TrailSnapshot};
use crate::store::SelectionStore;
use geonav_domain::config::NavigationConfig;
use geonav_domain::constants::WORLD_NAME;
use geonav_domain::{BreadcrumbTrail, Region, RegionId, SelectedRegion, SelectionKey, Subregions};
use geonav_event_bus::EventBus;
use geonav_kernel::service::{RegionService, RegionServiceExt, ServiceError};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};

/// Tunables of a [`TrailResolver`].
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Label of the root crumb.
    pub root_name: String,
    /// Bound on one ancestor lookup; `None` waits for the service indefinitely.
    pub lookup_timeout: Option<Duration>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { root_name: WORLD_NAME.to_owned(), lookup_timeout: None }
    }
}

impl From<&NavigationConfig> for ResolverOptions {
    fn from(config: &NavigationConfig) -> Self {
        Self {
            root_name: config.root_name.clone(),
            lookup_timeout: (config.lookup_timeout_ms > 0)
                .then(|| Duration::from_millis(config.lookup_timeout_ms)),
        }
    }
}

/// An ancestor lookup that [`TrailResolver::begin`] decided to run.
#[derive(Debug)]
pub struct PendingLookup {
    ticket: u64,
    key: SelectionKey,
    region: RegionId,
    /// Appended as the last crumb when the ancestor chain omits the selection itself.
    leaf: Region,
}

impl PendingLookup {
    #[must_use]
    pub const fn key(&self) -> SelectionKey {
        self.key
    }
}

/// What [`TrailResolver::begin`] decided for a selection change.
#[derive(Debug)]
pub enum Plan {
    /// Stale event, or the trail already describes this selection.
    Skip,
    /// Root selection; the single-crumb trail was committed without a lookup.
    Committed,
    /// An ancestor lookup must run; hand it to [`TrailResolver::complete`].
    Fetch(PendingLookup),
}

/// Outcome of a resolution.
#[derive(Debug)]
pub enum Resolution {
    Unchanged,
    Root,
    Rebuilt,
    /// The lookup failed; the previous trail stays in place.
    KeptPrevious(ServiceError),
    /// A newer selection or a crumb click overtook this lookup; its result was discarded.
    Superseded,
}

#[derive(Debug)]
struct ResolverState {
    trail: Arc<BreadcrumbTrail>,
    phase: TrailPhase,
    /// Key of the latest lookup started (or truncation applied).
    requested: Option<SelectionKey>,
    /// Key the current trail was built for.
    committed: Option<SelectionKey>,
    ticket: u64,
    /// Newest selection generation taken into account.
    seen: Option<u64>,
}

#[derive(Debug)]
struct ResolverInner<S> {
    service: Arc<S>,
    store: SelectionStore,
    bus: EventBus,
    options: ResolverOptions,
    state: RwLock<ResolverState>,
}

/// Derives the [`BreadcrumbTrail`] from the [`SelectionStore`]'s selection.
///
/// Lock order is resolver, then store. No lock is held across an `.await`.
#[derive(Debug)]
pub struct TrailResolver<S> {
    inner: Arc<ResolverInner<S>>,
}

impl<S> Clone for TrailResolver<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: RegionService> TrailResolver<S> {
    /// Creates an idle resolver showing the root crumb of the store's hierarchy.
    pub fn new(service: Arc<S>, store: SelectionStore, bus: EventBus, options: ResolverOptions) -> Self {
        let hierarchy = store.selection().hierarchy;
        let state = ResolverState {
            trail: Arc::new(BreadcrumbTrail::root(hierarchy, options.root_name.clone())),
            phase: TrailPhase::Idle,
            requested: None,
            committed: None,
            ticket: 0,
            seen: None,
        };
        let resolver =
            Self { inner: Arc::new(ResolverInner { service, store, bus, options, state: RwLock::new(state) }) };
        resolver.publish(&resolver.inner.state.read());
        resolver
    }

    #[must_use]
    pub fn trail(&self) -> Arc<BreadcrumbTrail> {
        Arc::clone(&self.inner.state.read().trail)
    }

    #[must_use]
    pub fn phase(&self) -> TrailPhase {
        self.inner.state.read().phase
    }

    #[must_use]
    pub fn snapshot(&self) -> TrailSnapshot {
        snapshot_of(&self.inner.state.read())
    }

    /// Decides how to handle `change`. Must be called in event order.
    ///
    /// Events older than the newest one seen are skipped, as are changes that keep the
    /// selection key (e.g., a resolved flag). A hierarchy change resets the trail to
    /// the root of the new hierarchy before anything is fetched.
    pub fn begin(&self, change: &SelectionChanged) -> Plan {
        let key = change.selection.key();
        let mut state = self.inner.state.write();

        if state.seen.is_some_and(|seen| change.generation < seen) {
            trace!(generation = change.generation, "Skipping stale selection event");
            return Plan::Skip;
        }
        state.seen = Some(change.generation);

        if state.requested == Some(key) {
            if state.phase != TrailPhase::Resolving {
                self.publish(&state);
            }
            return Plan::Skip;
        }

        state.ticket += 1;
        state.requested = Some(key);

        if state.trail.hierarchy() != Some(key.hierarchy) {
            debug!(hierarchy = %key.hierarchy, "Hierarchy changed; resetting trail");
            state.trail = Arc::new(self.root_trail(key));
            state.committed = None;
        }

        match key.region.id() {
            None => {
                state.trail = Arc::new(self.root_trail(key));
                state.committed = Some(key);
                state.phase = TrailPhase::Ready;
                self.publish(&state);
                Plan::Committed
            },
            Some(region) => {
                state.phase = TrailPhase::Resolving;
                self.publish(&state);
                let leaf = Region::new(
                    key.region,
                    change.selection.region.name.clone(),
                    change.selection.region.subregions,
                );
                Plan::Fetch(PendingLookup { ticket: state.ticket, key, region, leaf })
            },
        }
    }

    /// Runs the ancestor lookup of `pending` and applies it if it is still current.
    #[instrument(skip(self, pending), fields(region = %pending.region, hierarchy = %pending.key.hierarchy))]
    pub async fn complete(&self, pending: PendingLookup) -> Resolution {
        let result = self.lookup(pending.region, pending.key).await;

        let mut state = self.inner.state.write();
        if state.ticket != pending.ticket {
            debug!(ticket = pending.ticket, latest = state.ticket, "Discarding superseded ancestors");
            return Resolution::Superseded;
        }

        let resolution = match result {
            Ok(mut ancestors) => {
                let leaf = ancestors.iter().find(|region| !region.id.is_root()).map(|region| region.id);
                if leaf != Some(pending.key.region) {
                    warn!(leaf = ?leaf, "Ancestor chain does not start at the selected region; appending it");
                    ancestors.insert(0, pending.leaf);
                }
                let trail = BreadcrumbTrail::from_ancestors(
                    pending.key.hierarchy,
                    self.inner.options.root_name.clone(),
                    ancestors,
                );
                state.trail = Arc::new(trail);
                state.committed = Some(pending.key);
                Resolution::Rebuilt
            },
            Err(error) => {
                warn!(%error, "Ancestor lookup failed; keeping the previous trail");
                state.requested = state.committed;
                Resolution::KeptPrevious(error)
            },
        };

        state.phase = TrailPhase::Ready;
        self.publish(&state);
        resolution
    }

    /// [`TrailResolver::begin`] followed by [`TrailResolver::complete`].
    ///
    /// If the returned future is dropped mid-lookup the trail stays `Resolving` until the
    /// next selection change; long-lived callers should spawn the completion instead.
    pub async fn resolve(&self, change: &SelectionChanged) -> Resolution {
        match self.begin(change) {
            Plan::Skip => Resolution::Unchanged,
            Plan::Committed => Resolution::Root,
            Plan::Fetch(pending) => self.complete(pending).await,
        }
    }

    /// Starts a rebuild of the current selection even if its key did not change.
    pub fn restart(&self) -> Plan {
        {
            let mut state = self.inner.state.write();
            state.requested = None;
        }
        self.begin(&self.inner.store.snapshot())
    }

    /// Handles a click on the crumb at `index`.
    ///
    /// The crumb's flag is resolved first (root crumbs always have subregions; a failed
    /// lookup yields `Absent`), then the selection is written and the trail is cut to
    /// `0..=index` in one step. Lookups started before the click can no longer apply.
    ///
    /// # Errors
    /// * [`NavigationError::CrumbOutOfRange`] for an index past the end of the trail.
    /// * [`NavigationError::StaleTrail`] if the trail belongs to another hierarchy.
    /// * [`NavigationError::Superseded`] if the selection changed during the flag lookup.
    #[instrument(skip(self))]
    pub async fn select_crumb(&self, index: usize) -> Result<SelectedRegion, NavigationError> {
        let shown = self.trail();
        let entry = shown.get(index).cloned().ok_or(NavigationError::CrumbOutOfRange {
            index,
            len: shown.entries().len(),
            context: None,
        })?;

        let current = self.inner.store.selection();
        if shown.hierarchy() != Some(current.hierarchy) {
            return Err(NavigationError::StaleTrail { context: Some(format!("Clicking crumb {index}").into()) });
        }

        let subregions = match entry.region.id() {
            None => Subregions::Present,
            Some(region) => self.inner.service.subregions_flag(region, current.hierarchy).await,
        };
        let selected = SelectedRegion::new(entry.region, entry.name.clone(), subregions);

        let mut state = self.inner.state.write();
        if self.inner.store.selection().key() != current.key() {
            return Err(NavigationError::Superseded { context: Some(format!("Clicking crumb {index}").into()) });
        }

        let change = self.inner.store.set_selected_region(selected.clone());
        let key = change.selection.key();
        state.ticket += 1;
        state.seen = Some(change.generation);

        let truncated = Arc::ptr_eq(&state.trail, &shown)
            .then(|| shown.truncated(index))
            .flatten()
            .map(|trail| trail.with_leaf_subregions(subregions));
        match truncated {
            Some(trail) => {
                state.trail = Arc::new(trail);
                state.requested = Some(key);
                state.committed = Some(key);
                state.phase = TrailPhase::Truncated;
                debug!(index, region = %entry.region, "Trail truncated");
                self.publish(&state);
            },
            None => {
                debug!(index, "Trail changed during the click; rebuilding instead");
                state.requested = None;
                drop(state);
                let plan = self.begin(&change);
                if let Plan::Fetch(pending) = plan {
                    let resolver = self.clone();
                    tokio::spawn(async move { resolver.complete(pending).await });
                }
            },
        }

        Ok(selected)
    }

    async fn lookup(
        &self,
        region: RegionId,
        key: SelectionKey,
    ) -> Result<Vec<Region>, ServiceError> {
        let lookup = self.inner.service.ancestors(region, key.hierarchy);
        match self.inner.options.lookup_timeout {
            Some(limit) => tokio::time::timeout(limit, lookup).await.unwrap_or_else(|_| {
                Err(ServiceError::Timeout {
                    message: format!("No ancestors after {} ms", limit.as_millis()).into(),
                    context: Some(format!("Resolving region {region}").into()),
                })
            }),
            None => lookup.await,
        }
    }

    fn root_trail(&self, key: SelectionKey) -> BreadcrumbTrail {
        BreadcrumbTrail::root(key.hierarchy, self.inner.options.root_name.clone())
    }

    fn publish(&self, state: &ResolverState) {
        if let Err(error) = self.inner.bus.publish_watch(snapshot_of(state)) {
            warn!(%error, "Trail snapshot could not be published");
        }
    }
}

fn snapshot_of(state: &ResolverState) -> TrailSnapshot {
    TrailSnapshot {
        generation: state.seen.unwrap_or_default(),
        trail: Arc::clone(&state.trail),
        phase: state.phase,
    }
}
