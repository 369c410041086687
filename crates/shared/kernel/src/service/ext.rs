use super::RegionService;
use geonav_domain::{Hierarchy, HierarchyId, Region, RegionId, Subregions};
use std::future::Future;
use tracing::warn;

/// Fail-soft lookups: failures become empty results or `Absent` and are logged.
///
/// Geometry and ancestors have no fail-soft variant; their callers handle the error.
pub trait RegionServiceExt: RegionService {
    fn hierarchies_or_empty(&self) -> impl Future<Output = Vec<Hierarchy>> + Send {
        async move {
            self.hierarchies().await.unwrap_or_else(|error| {
                warn!(%error, "Listing hierarchies failed; using none");
                Vec::new()
            })
        }
    }

    fn root_regions_or_empty(&self, hierarchy: HierarchyId) -> impl Future<Output = Vec<Region>> + Send {
        async move {
            self.root_regions(hierarchy).await.unwrap_or_else(|error| {
                warn!(%error, %hierarchy, "Listing root regions failed; using none");
                Vec::new()
            })
        }
    }

    /// `None` only for an explicit "no content" answer; failures yield `Some([])`.
    fn subregions_or_empty(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
    ) -> impl Future<Output = Option<Vec<Region>>> + Send {
        async move {
            self.subregions(region, hierarchy).await.unwrap_or_else(|error| {
                warn!(%error, %region, %hierarchy, "Listing subregions failed; using none");
                Some(Vec::new())
            })
        }
    }

    /// Resolved `hasSubregions` of `region`; a failed lookup or unset flag yields `Absent`.
    fn subregions_flag(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
    ) -> impl Future<Output = Subregions> + Send {
        async move {
            match self.region(region, hierarchy).await {
                Ok(record) => record.has_subregions.or_absent(),
                Err(error) => {
                    warn!(%error, %region, %hierarchy, "Region lookup failed; assuming no subregions");
                    Subregions::Absent
                },
            }
        }
    }
}

impl<S: RegionService> RegionServiceExt for S {}
