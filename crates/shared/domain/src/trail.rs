use crate::constants::{TRAIL_SEPARATOR, WORLD_NAME};
use crate::region::{HierarchyId, Region, RegionRef, Subregions};
use crate::selection::SelectedRegion;
use serde::Serialize;
use std::fmt;

/// One crumb of a [`BreadcrumbTrail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailEntry {
    pub region: RegionRef,
    pub name: String,
    pub subregions: Subregions,
}

impl TrailEntry {
    pub fn root(label: impl Into<String>) -> Self {
        Self { region: RegionRef::Root, name: label.into(), subregions: Subregions::Present }
    }
}

impl From<Region> for TrailEntry {
    fn from(region: Region) -> Self {
        Self { region: region.id, name: region.name, subregions: region.has_subregions }
    }
}

impl From<&TrailEntry> for SelectedRegion {
    fn from(entry: &TrailEntry) -> Self {
        Self::new(entry.region, entry.name.clone(), entry.subregions)
    }
}

/// Root-first path from the synthetic root to the selected region.
///
/// Never empty; entry 0 is always the root. A trail built by a lookup remembers the
/// hierarchy it belongs to so it can never be mixed with another hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbTrail {
    hierarchy: Option<HierarchyId>,
    entries: Vec<TrailEntry>,
}

impl Default for BreadcrumbTrail {
    fn default() -> Self {
        Self { hierarchy: None, entries: vec![TrailEntry::root(WORLD_NAME)] }
    }
}

impl BreadcrumbTrail {
    /// The single-crumb trail of a root selection.
    pub fn root(hierarchy: HierarchyId, label: impl Into<String>) -> Self {
        Self { hierarchy: Some(hierarchy), entries: vec![TrailEntry::root(label)] }
    }

    /// Builds a trail from an ancestor response ordered leaf-adjacent first.
    ///
    /// Records that point at the root are dropped; the root crumb is always synthesized.
    pub fn from_ancestors(
        hierarchy: HierarchyId,
        label: impl Into<String>,
        ancestors: Vec<Region>,
    ) -> Self {
        let mut entries = Vec::with_capacity(ancestors.len() + 1);
        entries.push(TrailEntry::root(label));
        entries.extend(
            ancestors.into_iter().rev().filter(|region| !region.id.is_root()).map(TrailEntry::from),
        );
        Self { hierarchy: Some(hierarchy), entries }
    }

    /// Keeps entries `0..=index`. `None` if `index` is past the end.
    #[must_use]
    pub fn truncated(&self, index: usize) -> Option<Self> {
        (index < self.entries.len()).then(|| Self {
            hierarchy: self.hierarchy,
            entries: self.entries[..=index].to_vec(),
        })
    }

    /// Replaces the flag of the last crumb.
    #[must_use]
    pub fn with_leaf_subregions(mut self, subregions: Subregions) -> Self {
        if let Some(leaf) = self.entries.last_mut() {
            leaf.subregions = subregions;
        }
        self
    }

    /// Hierarchy the trail was built under; `None` before the first resolution.
    #[must_use]
    pub const fn hierarchy(&self) -> Option<HierarchyId> {
        self.hierarchy
    }

    #[must_use]
    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TrailEntry> {
        self.entries.get(index)
    }

    /// The crumb of the selected region.
    #[must_use]
    pub fn leaf(&self) -> &TrailEntry {
        // Invariant: the root crumb is never removed.
        &self.entries[self.entries.len() - 1]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

impl fmt::Display for BreadcrumbTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, name) in self.names().enumerate() {
            if index > 0 {
                f.write_str(TRAIL_SEPARATOR)?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
