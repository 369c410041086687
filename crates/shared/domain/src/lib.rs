//! # Domain Models
//!
//! Pure data types of the region navigator: regions and hierarchies as the region
//! service describes them, the user's selection, and the breadcrumb trail derived
//! from it. Keep it lean: `serde` only, no I/O or async.

pub mod config;
pub mod constants;
pub mod region;
pub mod selection;
pub mod trail;

pub use region::{Hierarchy, HierarchyId, Region, RegionId, RegionRef, Subregions};
pub use selection::{SelectedRegion, Selection, SelectionKey};
pub use trail::{BreadcrumbTrail, TrailEntry};
