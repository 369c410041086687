use geonav_domain::{BreadcrumbTrail, Selection};
use std::sync::Arc;

/// Broadcast by the [`SelectionStore`](crate::SelectionStore) after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Monotonically increasing per store; events are published in generation order.
    pub generation: u64,
    pub selection: Selection,
}

/// Resolver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailPhase {
    /// Nothing resolved yet.
    Idle,
    /// An ancestor lookup is in flight; the previous trail is still shown.
    Resolving,
    /// The trail is committed (rebuilt, root, or kept after a failure).
    Ready,
    /// The trail was cut locally after a crumb click.
    Truncated,
}

/// Latest trail state, published on a watch channel.
///
/// Observers see either the previous trail or a fully rebuilt one, never a partial edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailSnapshot {
    /// Newest selection generation the resolver has taken into account.
    pub generation: u64,
    pub trail: Arc<BreadcrumbTrail>,
    pub phase: TrailPhase,
}

impl TrailSnapshot {
    /// `true` once the trail reflects selection `generation` (or a later one).
    #[must_use]
    pub fn settles(&self, generation: u64) -> bool {
        self.generation >= generation && self.phase != TrailPhase::Resolving
    }
}
