use crate::error::{NavigationError, NavigationErrorExt};
use crate::events::{SelectionChanged, TrailPhase, TrailSnapshot};
use crate::resolver::{Plan, Resolution, ResolverOptions, TrailResolver};
use crate::store::SelectionStore;
use geonav_domain::config::NavigationConfig;
use geonav_domain::{BreadcrumbTrail, Hierarchy, HierarchyId, Region, SelectedRegion, Selection, Subregions};
use geonav_event_bus::{EventBus, EventReceiverExt};
use geonav_kernel::service::{Geometry, RegionService, RegionServiceExt};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// A fluent builder for [`NavigationSession`].
#[must_use = "builders do nothing unless you call .start()"]
#[derive(Debug)]
pub struct NavigationSessionBuilder<S> {
    service: Arc<S>,
    options: ResolverOptions,
    hierarchy: Option<HierarchyId>,
}

impl<S: RegionService> NavigationSessionBuilder<S> {
    /// Applies the navigation section of the configuration.
    pub fn config(mut self, config: &NavigationConfig) -> Self {
        self.options = ResolverOptions::from(config);
        self.hierarchy = config.default_hierarchy.map(HierarchyId);
        self
    }

    pub fn options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Hierarchy to start in; the first enumerated one when unset.
    pub const fn hierarchy(mut self, hierarchy: HierarchyId) -> Self {
        self.hierarchy = Some(hierarchy);
        self
    }

    /// Enumerates hierarchies, wires store and resolver, and resolves the initial
    /// (root) selection.
    ///
    /// Must be called within a Tokio runtime; the resolution task is spawned on it.
    ///
    /// # Errors
    /// * [`NavigationError::NoHierarchies`] if the service lists none (or listing fails).
    /// * [`NavigationError::UnknownHierarchy`] if the requested hierarchy is not listed.
    pub async fn start(self) -> Result<NavigationSession<S>, NavigationError> {
        let hierarchies = self.service.hierarchies_or_empty().await;
        let active = match self.hierarchy {
            Some(id) => hierarchies
                .iter()
                .find(|h| h.hierarchy_id == id)
                .map(|h| h.hierarchy_id)
                .ok_or(NavigationError::UnknownHierarchy { id, context: Some("Starting session".into()) })?,
            None => hierarchies
                .first()
                .map(|h| h.hierarchy_id)
                .ok_or(NavigationError::NoHierarchies { context: Some("Starting session".into()) })?,
        };

        let bus = EventBus::new();
        let root_name = self.options.root_name.clone();
        let store =
            SelectionStore::with_root_name(bus.clone(), Selection::root(active, root_name.as_str()), root_name);
        let resolver = TrailResolver::new(self.service.clone(), store.clone(), bus.clone(), self.options);

        // Subscribe before the first change so no event can slip past the worker.
        let events = store.subscribe()?;
        let worker = tokio::spawn(resolution_loop(resolver.clone(), events));

        let session = NavigationSession { service: self.service, hierarchies, bus, store, resolver, worker };
        session.run(session.resolver.begin(&session.store.snapshot())).await?;

        info!(hierarchy = %active, hierarchies = session.hierarchies.len(), "Navigation session started");
        Ok(session)
    }
}

/// Owns the navigation state of one user session.
///
/// The session holds the [`SelectionStore`], the [`TrailResolver`] and a background
/// task that feeds every [`SelectionChanged`] to the resolver in order. Dropping the
/// session stops that task.
///
/// # Examples
///
/// ```rust,ignore
/// let session = NavigationSession::builder(client).config(&config.navigation).start().await?;
///
/// let europe = session.children().await.unwrap_or_default().remove(0);
/// session.drill_down(europe).await?;
/// let snapshot = session.settled().await?;
/// println!("{}", snapshot.trail);
/// ```
#[derive(Debug)]
pub struct NavigationSession<S> {
    service: Arc<S>,
    hierarchies: Vec<Hierarchy>,
    bus: EventBus,
    store: SelectionStore,
    resolver: TrailResolver<S>,
    worker: JoinHandle<()>,
}

impl<S: RegionService> NavigationSession<S> {
    pub fn builder(service: S) -> NavigationSessionBuilder<S> {
        Self::builder_shared(Arc::new(service))
    }

    /// Same as [`NavigationSession::builder`] for a service that is already shared.
    pub fn builder_shared(service: Arc<S>) -> NavigationSessionBuilder<S> {
        NavigationSessionBuilder { service, options: ResolverOptions::default(), hierarchy: None }
    }

    /// Hierarchies enumerated at session start.
    #[must_use]
    pub fn hierarchies(&self) -> &[Hierarchy] {
        &self.hierarchies
    }

    #[must_use]
    pub fn active_hierarchy(&self) -> HierarchyId {
        self.store.selection().hierarchy
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.store.selection()
    }

    #[must_use]
    pub fn trail(&self) -> Arc<BreadcrumbTrail> {
        self.resolver.trail()
    }

    #[must_use]
    pub fn phase(&self) -> TrailPhase {
        self.resolver.phase()
    }

    #[must_use]
    pub const fn store(&self) -> &SelectionStore {
        &self.store
    }

    #[must_use]
    pub const fn resolver(&self) -> &TrailResolver<S> {
        &self.resolver
    }

    /// Latest-value channel of [`TrailSnapshot`]s.
    ///
    /// # Errors
    /// [`NavigationError::EventBus`] after [`NavigationSession::shutdown`].
    pub fn subscribe_trail(&self) -> Result<watch::Receiver<Arc<TrailSnapshot>>, NavigationError> {
        Ok(self.bus.watch_receiver::<TrailSnapshot>()?)
    }

    /// Every [`SelectionChanged`] from now on.
    ///
    /// # Errors
    /// Same as [`SelectionStore::subscribe`].
    pub fn subscribe_selection(&self) -> Result<broadcast::Receiver<Arc<SelectionChanged>>, NavigationError> {
        self.store.subscribe()
    }

    /// Waits until the trail reflects the current selection generation and no lookup
    /// for it is pending.
    ///
    /// # Errors
    /// [`NavigationError::Internal`] if the trail channel closed while waiting.
    pub async fn settled(&self) -> Result<Arc<TrailSnapshot>, NavigationError> {
        let target = self.store.generation();
        let mut rx = self.subscribe_trail()?;
        let snapshot = rx.wait_for(|snapshot| snapshot.settles(target)).await.map_err(|_| {
            NavigationError::Internal {
                message: "Trail channel closed".into(),
                context: Some(format!("Waiting for generation {target}").into()),
            }
        })?;
        Ok(Arc::clone(&snapshot))
    }

    /// Switches to another enumerated hierarchy and resets the selection to the root.
    ///
    /// # Errors
    /// [`NavigationError::UnknownHierarchy`] if `hierarchy` was not enumerated at start.
    pub fn switch_hierarchy(&self, hierarchy: HierarchyId) -> Result<SelectionChanged, NavigationError> {
        if !self.hierarchies.iter().any(|h| h.hierarchy_id == hierarchy) {
            return Err(NavigationError::UnknownHierarchy { id: hierarchy, context: None });
        }
        debug!(%hierarchy, "Switching hierarchy");
        Ok(self.store.switch_hierarchy(hierarchy))
    }

    /// Children of the selected region; root regions when the root is selected.
    ///
    /// `None` means the service explicitly answered "no content". Failures are logged
    /// and yield an empty list.
    pub async fn children(&self) -> Option<Vec<Region>> {
        let selection = self.store.selection();
        match selection.region.region.id() {
            None => Some(self.service.root_regions_or_empty(selection.hierarchy).await),
            Some(region) => self.service.subregions_or_empty(region, selection.hierarchy).await,
        }
    }

    /// Resolves an unknown flag of the selected region and records it in the store.
    pub async fn resolve_subregions(&self) -> Subregions {
        let selection = self.store.selection();
        let known = selection.region.subregions;
        if known.is_resolved() {
            return known;
        }

        let flag = match selection.region.region.id() {
            None => Subregions::Present,
            Some(region) => self.service.subregions_flag(region, selection.hierarchy).await,
        };
        if self.store.set_subregions(selection.region.region, flag).is_none() {
            debug!(region = %selection.region.region, "Selection changed before its flag resolved");
        }
        flag
    }

    /// Selects `child` of the selected region.
    ///
    /// # Errors
    /// * [`NavigationError::NoSubregions`] unless the selected region's flag resolves to
    ///   `Present`.
    /// * [`NavigationError::Superseded`] if the selection changed while resolving.
    #[instrument(skip(self, child), fields(child = %child.id))]
    pub async fn drill_down(&self, child: Region) -> Result<SelectionChanged, NavigationError> {
        let key = self.store.selection().key();
        if !self.resolve_subregions().await.allows_drill_down() {
            return Err(NavigationError::NoSubregions { region: key.region, context: None });
        }
        if self.store.selection().key() != key {
            return Err(NavigationError::Superseded { context: Some("Drilling down".into()) });
        }
        Ok(self.store.set_selected_region(SelectedRegion::from(child)))
    }

    /// Clicks the crumb at `index`; see [`TrailResolver::select_crumb`].
    ///
    /// # Errors
    /// Same as [`TrailResolver::select_crumb`].
    pub async fn select_crumb(&self, index: usize) -> Result<SelectedRegion, NavigationError> {
        self.resolver.select_crumb(index).await
    }

    /// Rebuilds the trail of the current selection and waits for the outcome.
    ///
    /// # Errors
    /// [`NavigationError::Internal`] if the resolution task panicked.
    pub async fn refresh(&self) -> Result<Resolution, NavigationError> {
        self.run(self.resolver.restart()).await
    }

    /// Geometry of the selected region. The root has none.
    ///
    /// # Errors
    /// [`NavigationError::Geometry`] when the service fails.
    pub async fn geometry(&self, resolve_empty: bool) -> Result<Option<Geometry>, NavigationError> {
        let selection = self.store.selection();
        let Some(region) = selection.region.region.id() else {
            return Ok(None);
        };
        self.service
            .geometry(region, selection.hierarchy, resolve_empty)
            .await
            .context(format!("Region {region}"))
    }

    /// Stops the resolution task and closes every channel of the session bus.
    pub fn shutdown(self) {
        self.worker.abort();
        let closed = self.bus.shutdown();
        info!(channels = closed, "Navigation session closed");
    }

    /// Runs the remote part of `plan` on its own task, so dropping the caller
    /// cannot leave the trail half-resolved.
    async fn run(&self, plan: Plan) -> Result<Resolution, NavigationError> {
        match plan {
            Plan::Skip => Ok(Resolution::Unchanged),
            Plan::Committed => Ok(Resolution::Root),
            Plan::Fetch(pending) => {
                let resolver = self.resolver.clone();
                tokio::spawn(async move { resolver.complete(pending).await }).await.map_err(|e| {
                    NavigationError::Internal {
                        message: e.to_string().into(),
                        context: Some("Resolving trail".into()),
                    }
                })
            },
        }
    }
}

impl<S> Drop for NavigationSession<S> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn resolution_loop<S: RegionService>(
    resolver: TrailResolver<S>,
    mut events: broadcast::Receiver<Arc<SelectionChanged>>,
) {
    while let Some(change) = EventReceiverExt::recv(&mut events).await {
        if let Plan::Fetch(pending) = resolver.begin(&change) {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.complete(pending).await });
        }
    }
    debug!("Selection channel closed; resolution task stopped");
}
