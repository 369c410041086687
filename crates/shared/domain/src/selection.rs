use crate::constants::WORLD_NAME;
use crate::region::{HierarchyId, Region, RegionRef, Subregions};
use serde::{Deserialize, Serialize};

/// The currently selected region together with its (possibly unresolved) flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedRegion {
    pub region: RegionRef,
    pub name: String,
    pub subregions: Subregions,
}

impl SelectedRegion {
    pub fn new(region: impl Into<RegionRef>, name: impl Into<String>, subregions: Subregions) -> Self {
        Self { region: region.into(), name: name.into(), subregions }
    }

    /// The synthetic root. It always has children.
    #[must_use]
    pub fn world() -> Self {
        Self::root(WORLD_NAME)
    }

    /// The synthetic root shown under `label`.
    #[must_use]
    pub fn root(label: impl Into<String>) -> Self {
        Self::new(RegionRef::Root, label, Subregions::Present)
    }
}

impl From<Region> for SelectedRegion {
    fn from(region: Region) -> Self {
        Self { region: region.id, name: region.name, subregions: region.has_subregions }
    }
}

/// `(selectedRegion, selectedHierarchy)`, the only externally observable navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub region: SelectedRegion,
    pub hierarchy: HierarchyId,
}

impl Selection {
    /// World selected under `hierarchy`.
    #[must_use]
    pub fn world(hierarchy: HierarchyId) -> Self {
        Self { region: SelectedRegion::world(), hierarchy }
    }

    /// Root selected under `hierarchy`, labelled `label`.
    #[must_use]
    pub fn root(hierarchy: HierarchyId, label: impl Into<String>) -> Self {
        Self { region: SelectedRegion::root(label), hierarchy }
    }

    #[must_use]
    pub const fn key(&self) -> SelectionKey {
        SelectionKey { region: self.region.region, hierarchy: self.hierarchy }
    }
}

/// Identity of a selection for trail purposes. A trail is rebuilt only when it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub region: RegionRef,
    pub hierarchy: HierarchyId,
}
