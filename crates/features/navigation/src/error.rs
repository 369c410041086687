use geonav_domain::{HierarchyId, RegionRef};
use geonav_event_bus::EventBusError;
use geonav_kernel::service::ServiceError;
use std::borrow::Cow;

/// A specialized [`NavigationError`] enum of this crate.
#[geonav_derive::geonav_error]
pub enum NavigationError {
    /// The service listed no hierarchy, so no session can be scoped.
    #[error("No hierarchies available{}", format_context(.context))]
    NoHierarchies { context: Option<Cow<'static, str>> },

    #[error("Unknown hierarchy {id}{}", format_context(.context))]
    UnknownHierarchy { id: HierarchyId, context: Option<Cow<'static, str>> },

    #[error("Crumb {index} is out of range for a trail of {len}{}", format_context(.context))]
    CrumbOutOfRange { index: usize, len: usize, context: Option<Cow<'static, str>> },

    /// The displayed trail was built under another hierarchy than the selected one.
    #[error("Trail belongs to another hierarchy{}", format_context(.context))]
    StaleTrail { context: Option<Cow<'static, str>> },

    /// The selection changed while this operation was waiting on the service.
    #[error("Selection changed while resolving{}", format_context(.context))]
    Superseded { context: Option<Cow<'static, str>> },

    /// Drill-down refused: the flag of the selected region did not resolve to `Present`.
    #[error("Region {region} has no subregions{}", format_context(.context))]
    NoSubregions { region: RegionRef, context: Option<Cow<'static, str>> },

    #[error("Geometry unavailable{}: {source}", format_context(.context))]
    Geometry { source: ServiceError, context: Option<Cow<'static, str>> },

    #[error("Event bus error{}: {source}", format_context(.context))]
    EventBus { source: EventBusError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal navigation error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
