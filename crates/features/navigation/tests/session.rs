mod fixtures;

use fixtures::{
    CLIMATE, CONTINENTS, EUROPE, FRANCE, FakeRegionService, JAPAN, PARIS, TEMPERATE, region,
};
use geonav_domain::config::NavigationConfig;
use geonav_domain::{HierarchyId, Region, RegionRef, SelectedRegion, Subregions};
use geonav_event_bus::EventReceiverExt;
use geonav_navigation::{NavigationError, NavigationSession, Resolution, TrailPhase};
use std::sync::Arc;
use std::time::Duration;

type Session = NavigationSession<FakeRegionService>;

async fn start(fake: &Arc<FakeRegionService>) -> Session {
    NavigationSession::builder_shared(Arc::clone(fake)).start().await.unwrap()
}

async fn names(session: &Session) -> Vec<String> {
    let snapshot = session.settled().await.unwrap();
    snapshot.trail.names().map(str::to_owned).collect()
}

async fn walk(session: &Session, path: &[u64]) {
    for &raw in path {
        session.drill_down(region(raw)).await.unwrap();
        session.settled().await.unwrap();
    }
}

#[tokio::test]
async fn starts_in_the_first_hierarchy_on_the_root() {
    let fake = FakeRegionService::new();

    let session = start(&fake).await;

    assert_eq!(session.hierarchies().len(), 2);
    assert_eq!(session.active_hierarchy(), CONTINENTS);
    assert!(session.selection().region.region.is_root());
    assert_eq!(names(&session).await, vec!["World"]);
    assert_eq!(session.phase(), TrailPhase::Ready);
    assert_eq!(fake.ancestor_calls(), 0);
}

#[tokio::test]
async fn configured_hierarchy_is_selected_at_start() {
    let fake = FakeRegionService::new();
    let config = NavigationConfig { default_hierarchy: Some(CLIMATE.0), ..Default::default() };

    let session = NavigationSession::builder_shared(Arc::clone(&fake)).config(&config).start().await.unwrap();

    assert_eq!(session.active_hierarchy(), CLIMATE);
    assert_eq!(session.trail().hierarchy(), Some(CLIMATE));
}

#[tokio::test]
async fn start_fails_without_a_selectable_hierarchy() {
    let fake = FakeRegionService::new();
    let unknown = NavigationSession::builder_shared(Arc::clone(&fake)).hierarchy(HierarchyId(99)).start().await;
    assert!(matches!(unknown, Err(NavigationError::UnknownHierarchy { id: HierarchyId(99), .. })));

    fake.fail_hierarchies();
    let none = NavigationSession::builder_shared(Arc::clone(&fake)).start().await;
    assert!(matches!(none, Err(NavigationError::NoHierarchies { .. })));
}

#[tokio::test]
async fn drilling_down_extends_the_trail() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;

    let roots = session.children().await.unwrap();
    assert_eq!(roots.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["Europe", "Asia"]);

    walk(&session, &[EUROPE, FRANCE, PARIS]).await;

    assert_eq!(names(&session).await, vec!["World", "Europe", "France", "Paris"]);
    assert_eq!(session.children().await, None, "Paris answers with no content");
    assert_eq!(fake.ancestor_calls(), 3);
}

#[tokio::test]
async fn drill_down_requires_subregions() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;
    walk(&session, &[EUROPE, FRANCE, PARIS]).await;

    let result = session.drill_down(region(JAPAN)).await;

    assert!(matches!(result, Err(NavigationError::NoSubregions { .. })));
    assert_eq!(session.selection().region.name, "Paris");
}

#[tokio::test]
async fn unknown_flag_is_resolved_lazily() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;
    session.store().set_selected_region(SelectedRegion::new(FRANCE, "France", Subregions::Unknown));

    assert_eq!(session.resolve_subregions().await, Subregions::Present);
    assert_eq!(session.selection().region.subregions, Subregions::Present);

    fake.fail_region(EUROPE);
    session.store().set_selected_region(SelectedRegion::new(EUROPE, "Europe", Subregions::Unknown));
    assert_eq!(session.resolve_subregions().await, Subregions::Absent);
}

#[tokio::test]
async fn crumb_click_truncates_and_settles_without_a_lookup() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;
    walk(&session, &[EUROPE, FRANCE, PARIS]).await;

    let picked = session.select_crumb(1).await.unwrap();

    assert_eq!(picked.name, "Europe");
    assert_eq!(names(&session).await, vec!["World", "Europe"]);
    assert_eq!(session.phase(), TrailPhase::Truncated);
    assert_eq!(fake.ancestor_calls(), 3);
}

#[tokio::test]
async fn click_during_a_pending_lookup_wins() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;
    walk(&session, &[EUROPE, FRANCE]).await;
    let gate = fake.gate(PARIS);

    let mut trail = session.subscribe_trail().unwrap();
    session.drill_down(region(PARIS)).await.unwrap();
    trail.wait_for(|snapshot| snapshot.phase == TrailPhase::Resolving).await.unwrap();

    session.select_crumb(1).await.unwrap();
    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(names(&session).await, vec!["World", "Europe"]);
    assert_eq!(session.selection().region.name, "Europe");
    assert_eq!(fake.ancestor_calls(), 3);
}

#[tokio::test]
async fn switching_hierarchy_starts_over_at_its_root() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;
    walk(&session, &[EUROPE, FRANCE]).await;

    session.switch_hierarchy(CLIMATE).unwrap();

    assert_eq!(names(&session).await, vec!["World"]);
    assert_eq!(session.trail().hierarchy(), Some(CLIMATE));
    let roots = session.children().await.unwrap();
    assert_eq!(roots[0].id, RegionRef::from(TEMPERATE));

    session.drill_down(roots[0].clone()).await.unwrap();
    session.drill_down(Region::new(FRANCE, "France", Subregions::Absent)).await.unwrap();
    assert_eq!(names(&session).await, vec!["World", "Temperate", "France"]);

    let unknown = session.switch_hierarchy(HierarchyId(99));
    assert!(matches!(unknown, Err(NavigationError::UnknownHierarchy { .. })));
}

#[tokio::test]
async fn configured_root_label_names_every_root_selection() {
    let fake = FakeRegionService::new();
    let config = NavigationConfig { root_name: "Earth".to_owned(), ..Default::default() };
    let session = NavigationSession::builder_shared(Arc::clone(&fake)).config(&config).start().await.unwrap();

    assert_eq!(session.selection().region.name, "Earth");
    assert_eq!(names(&session).await, vec!["Earth"]);

    walk(&session, &[EUROPE, FRANCE]).await;
    let picked = session.select_crumb(0).await.unwrap();
    assert_eq!(picked.name, "Earth");
    assert_eq!(session.selection().region.name, "Earth");

    walk(&session, &[EUROPE]).await;
    session.switch_hierarchy(CLIMATE).unwrap();
    assert_eq!(session.selection().region.name, "Earth");
    assert_eq!(names(&session).await, vec!["Earth"]);
}

#[tokio::test]
async fn geometry_of_the_selection() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;

    assert_eq!(session.geometry(false).await.unwrap(), None, "the root has no geometry");

    walk(&session, &[EUROPE]).await;
    assert!(matches!(session.geometry(false).await, Err(NavigationError::Geometry { .. })));

    walk(&session, &[FRANCE]).await;
    assert_eq!(session.geometry(true).await.unwrap().unwrap()["type"], "Polygon");

    walk(&session, &[PARIS]).await;
    assert_eq!(session.geometry(true).await.unwrap(), None);
}

#[tokio::test]
async fn refresh_refetches_the_current_trail() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;
    walk(&session, &[EUROPE, FRANCE]).await;

    let resolution = session.refresh().await.unwrap();

    assert!(matches!(resolution, Resolution::Rebuilt));
    assert_eq!(fake.ancestor_calls(), 3);
    assert_eq!(names(&session).await, vec!["World", "Europe", "France"]);
}

#[tokio::test]
async fn selection_changes_are_observable() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;
    let mut rx = session.subscribe_selection().unwrap();

    session.drill_down(region(EUROPE)).await.unwrap();

    let change = EventReceiverExt::recv(&mut rx).await.unwrap();
    assert_eq!(change.generation, 1);
    assert_eq!(change.selection.region.name, "Europe");
}

#[tokio::test]
async fn shutdown_closes_the_trail_channel() {
    let fake = FakeRegionService::new();
    let session = start(&fake).await;
    let mut trail = session.subscribe_trail().unwrap();

    session.shutdown();

    assert!(trail.changed().await.is_err());
}
