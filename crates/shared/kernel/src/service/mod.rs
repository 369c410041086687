//! The region service contract.
//!
//! [`RegionService`] returns typed results that keep data, absence and failure apart.
//! Navigation code that must never fail goes through [`RegionServiceExt`], which maps
//! failures to the documented defaults and logs the cause.

mod error;
mod ext;

pub use error::{ServiceError, ServiceErrorExt};
pub use ext::RegionServiceExt;

use geonav_domain::{Hierarchy, HierarchyId, Region, RegionId};
use std::future::Future;

/// Opaque geometry payload, passed through untouched.
pub type Geometry = serde_json::Value;

/// Read-only access to the region hierarchy service.
///
/// Root-scoped questions are answered by [`RegionService::root_regions`]; every other
/// call addresses a real region, so the root never reaches the wire as an id.
pub trait RegionService: Send + Sync + 'static {
    /// All hierarchies, in service order.
    fn hierarchies(&self) -> impl Future<Output = Result<Vec<Hierarchy>, ServiceError>> + Send;

    /// Top-level regions of `hierarchy`.
    fn root_regions(
        &self,
        hierarchy: HierarchyId,
    ) -> impl Future<Output = Result<Vec<Region>, ServiceError>> + Send;

    /// Children of `region`. `None` is the explicit "no content" answer, distinct from `[]`.
    fn subregions(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
    ) -> impl Future<Output = Result<Option<Vec<Region>>, ServiceError>> + Send;

    /// A single region record.
    fn region(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
    ) -> impl Future<Output = Result<Region, ServiceError>> + Send;

    /// Geometry of `region`; `None` when the service has none ("no content" or "not found").
    fn geometry(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
        resolve_empty: bool,
    ) -> impl Future<Output = Result<Option<Geometry>, ServiceError>> + Send;

    /// The ancestor chain of `region`, leaf-adjacent first. "No content" yields `[]`.
    fn ancestors(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
    ) -> impl Future<Output = Result<Vec<Region>, ServiceError>> + Send;
}
