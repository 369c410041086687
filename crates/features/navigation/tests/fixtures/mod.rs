#![allow(dead_code, unreachable_pub)]

use geonav_domain::{Hierarchy, HierarchyId, Region, RegionId, SelectedRegion, Subregions};
use geonav_kernel::service::{Geometry, RegionService, ServiceError};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Notify;

/// "Continents": 1 Europe > 2 France > 3 Paris, 10 Asia > 11 Japan.
pub const CONTINENTS: HierarchyId = HierarchyId(1);
/// "Climate": 20 Temperate > 2 France. Region 2 exists in both hierarchies.
pub const CLIMATE: HierarchyId = HierarchyId(2);

pub const EUROPE: u64 = 1;
pub const FRANCE: u64 = 2;
pub const PARIS: u64 = 3;
pub const ASIA: u64 = 10;
pub const JAPAN: u64 = 11;
pub const TEMPERATE: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Hierarchies,
    RootRegions(u64),
    Subregions(u64, u64),
    Region(u64, u64),
    Geometry(u64, u64),
    Ancestors(u64, u64),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    gates: HashMap<u64, Arc<Notify>>,
    failing_ancestors: HashSet<u64>,
    malformed_ancestors: HashSet<u64>,
    parents_only: HashSet<u64>,
    failing_regions: HashSet<u64>,
    failing_hierarchies: bool,
}

/// Scripted region service. Ancestor lookups of gated regions wait until the gate opens.
#[derive(Default)]
pub struct FakeRegionService {
    state: Mutex<FakeState>,
}

impl std::fmt::Debug for FakeRegionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeRegionService").finish_non_exhaustive()
    }
}

pub fn id(raw: u64) -> RegionId {
    RegionId::new(raw).unwrap()
}

pub fn region(raw: u64) -> Region {
    record(CONTINENTS.0, raw).or_else(|| record(CLIMATE.0, raw)).unwrap()
}

pub fn selected(raw: u64) -> SelectedRegion {
    SelectedRegion::from(region(raw))
}

fn record(hierarchy: u64, raw: u64) -> Option<Region> {
    let (name, flag) = match (hierarchy, raw) {
        (1, EUROPE) => ("Europe", Subregions::Present),
        (1, FRANCE) => ("France", Subregions::Present),
        (1, PARIS) => ("Paris", Subregions::Absent),
        (1, ASIA) => ("Asia", Subregions::Present),
        (1, JAPAN) => ("Japan", Subregions::Absent),
        (2, TEMPERATE) => ("Temperate", Subregions::Present),
        (2, FRANCE) => ("France", Subregions::Absent),
        _ => return None,
    };
    Some(Region::new(raw, name, flag))
}

fn chain(hierarchy: u64, raw: u64) -> Option<Vec<u64>> {
    let chain = match (hierarchy, raw) {
        (1, EUROPE) => vec![EUROPE],
        (1, FRANCE) => vec![FRANCE, EUROPE],
        (1, PARIS) => vec![PARIS, FRANCE, EUROPE],
        (1, ASIA) => vec![ASIA],
        (1, JAPAN) => vec![JAPAN, ASIA],
        (2, TEMPERATE) => vec![TEMPERATE],
        (2, FRANCE) => vec![FRANCE, TEMPERATE],
        _ => return None,
    };
    Some(chain)
}

fn down(what: &str) -> ServiceError {
    ServiceError::Transport { message: format!("{what} unavailable").into(), context: None }
}

impl FakeRegionService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Holds ancestor lookups of `region` until the returned gate is notified.
    pub fn gate(&self, region: u64) -> Arc<Notify> {
        Arc::clone(self.state.lock().gates.entry(region).or_default())
    }

    pub fn fail_ancestors(&self, region: u64) {
        self.state.lock().failing_ancestors.insert(region);
    }

    pub fn heal_ancestors(&self, region: u64) {
        self.state.lock().failing_ancestors.remove(&region);
    }

    /// Ancestor lookups of `region` fail to decode.
    pub fn malform_ancestors(&self, region: u64) {
        self.state.lock().malformed_ancestors.insert(region);
    }

    /// Ancestor lookups of `region` omit the region itself and return its parents only.
    pub fn return_parents_only(&self, region: u64) {
        self.state.lock().parents_only.insert(region);
    }

    pub fn fail_region(&self, region: u64) {
        self.state.lock().failing_regions.insert(region);
    }

    pub fn fail_hierarchies(&self) {
        self.state.lock().failing_hierarchies = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn ancestor_calls(&self) -> usize {
        self.calls().iter().filter(|call| matches!(call, Call::Ancestors(..))).count()
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }
}

impl RegionService for FakeRegionService {
    async fn hierarchies(&self) -> Result<Vec<Hierarchy>, ServiceError> {
        self.record(Call::Hierarchies);
        if self.state.lock().failing_hierarchies {
            return Err(down("hierarchies"));
        }
        Ok(vec![
            Hierarchy { hierarchy_id: CONTINENTS, name: "Continents".into() },
            Hierarchy { hierarchy_id: CLIMATE, name: "Climate".into() },
        ])
    }

    async fn root_regions(&self, hierarchy: HierarchyId) -> Result<Vec<Region>, ServiceError> {
        self.record(Call::RootRegions(hierarchy.0));
        let roots = match hierarchy {
            CONTINENTS => vec![EUROPE, ASIA],
            CLIMATE => vec![TEMPERATE],
            _ => Vec::new(),
        };
        Ok(roots.into_iter().filter_map(|raw| record(hierarchy.0, raw)).collect())
    }

    async fn subregions(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
    ) -> Result<Option<Vec<Region>>, ServiceError> {
        self.record(Call::Subregions(region.get(), hierarchy.0));
        let children = match (hierarchy.0, region.get()) {
            (1, EUROPE) => vec![FRANCE],
            (1, FRANCE) => vec![PARIS],
            (1, ASIA) => vec![JAPAN],
            (2, TEMPERATE) => vec![FRANCE],
            _ => return Ok(None),
        };
        Ok(Some(children.into_iter().filter_map(|raw| record(hierarchy.0, raw)).collect()))
    }

    async fn region(&self, region: RegionId, hierarchy: HierarchyId) -> Result<Region, ServiceError> {
        self.record(Call::Region(region.get(), hierarchy.0));
        if self.state.lock().failing_regions.contains(&region.get()) {
            return Err(ServiceError::Status { status: 500, context: None });
        }
        record(hierarchy.0, region.get()).ok_or(ServiceError::Status { status: 404, context: None })
    }

    async fn geometry(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
        _resolve_empty: bool,
    ) -> Result<Option<Geometry>, ServiceError> {
        self.record(Call::Geometry(region.get(), hierarchy.0));
        match region.get() {
            FRANCE => Ok(Some(json!({ "type": "Polygon", "coordinates": [] }))),
            PARIS => Ok(None),
            _ => Err(down("geometry")),
        }
    }

    async fn ancestors(&self, region: RegionId, hierarchy: HierarchyId) -> Result<Vec<Region>, ServiceError> {
        let raw = region.get();
        let (gate, failing, malformed, parents_only) = {
            let mut state = self.state.lock();
            state.calls.push(Call::Ancestors(raw, hierarchy.0));
            (
                state.gates.get(&raw).cloned(),
                state.failing_ancestors.contains(&raw),
                state.malformed_ancestors.contains(&raw),
                state.parents_only.contains(&raw),
            )
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if failing {
            return Err(down("ancestors"));
        }
        if malformed {
            let error = serde_json::from_str::<Vec<Region>>(r#"{"id": 1}"#).unwrap_err();
            return Err(ServiceError::from(error));
        }

        let mut chain = chain(hierarchy.0, raw).unwrap_or_default();
        if parents_only {
            chain.retain(|&ancestor| ancestor != raw);
        }
        Ok(chain.into_iter().filter_map(|raw| record(hierarchy.0, raw)).collect())
    }
}
