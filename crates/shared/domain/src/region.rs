//! Regions and hierarchies as served by the region service.
//!
//! The service encodes the synthetic World root as `null` or `0`. Both decode to
//! [`RegionRef::Root`], so the rest of the workspace never sees a sentinel id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Identifier of a real (non-root) region, unique within a hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(NonZeroU64);

impl RegionId {
    /// Returns `None` for `0`, which the service reserves for the World root.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reference to a node of the region tree: the synthetic root or a real region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum RegionRef {
    #[default]
    Root,
    Node(RegionId),
}

impl RegionRef {
    #[must_use]
    pub const fn is_root(self) -> bool {
        matches!(self, Self::Root)
    }

    /// The real region id, `None` for the root.
    #[must_use]
    pub const fn id(self) -> Option<RegionId> {
        match self {
            Self::Root => None,
            Self::Node(id) => Some(id),
        }
    }
}

impl From<Option<u64>> for RegionRef {
    fn from(raw: Option<u64>) -> Self {
        raw.and_then(RegionId::new).map_or(Self::Root, Self::Node)
    }
}

impl From<u64> for RegionRef {
    fn from(raw: u64) -> Self {
        Self::from(Some(raw))
    }
}

impl From<RegionId> for RegionRef {
    fn from(id: RegionId) -> Self {
        Self::Node(id)
    }
}

impl From<RegionRef> for Option<u64> {
    fn from(region: RegionRef) -> Self {
        region.id().map(RegionId::get)
    }
}

impl fmt::Display for RegionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Node(id) => id.fmt(f),
        }
    }
}

/// Tri-state `hasSubregions` flag.
///
/// `Unknown` until resolved. Drill-down is only offered for `Present`; a failed
/// resolution settles on `Absent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Subregions {
    #[default]
    Unknown,
    Present,
    Absent,
}

impl Subregions {
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub const fn allows_drill_down(self) -> bool {
        matches!(self, Self::Present)
    }

    /// Settles an unresolved flag on the conservative `Absent`.
    #[must_use]
    pub const fn or_absent(self) -> Self {
        match self {
            Self::Unknown => Self::Absent,
            resolved => resolved,
        }
    }
}

impl From<bool> for Subregions {
    fn from(present: bool) -> Self {
        if present { Self::Present } else { Self::Absent }
    }
}

impl From<Option<bool>> for Subregions {
    fn from(raw: Option<bool>) -> Self {
        raw.map_or(Self::Unknown, Self::from)
    }
}

impl From<Subregions> for Option<bool> {
    fn from(flag: Subregions) -> Self {
        match flag {
            Subregions::Unknown => None,
            Subregions::Present => Some(true),
            Subregions::Absent => Some(false),
        }
    }
}

/// A region record. Unknown wire fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: RegionRef,
    pub name: String,
    #[serde(default)]
    pub has_subregions: Subregions,
}

impl Region {
    pub fn new(id: impl Into<RegionRef>, name: impl Into<String>, has_subregions: Subregions) -> Self {
        Self { id: id.into(), name: name.into(), has_subregions }
    }
}

/// Opaque, stable identifier scoping every region query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyId(pub u64);

impl fmt::Display for HierarchyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named taxonomy of region subdivision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    pub hierarchy_id: HierarchyId,
    #[serde(default, alias = "hierarchyName")]
    pub name: String,
}
