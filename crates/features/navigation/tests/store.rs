mod fixtures;

use fixtures::{CLIMATE, CONTINENTS, EUROPE, FRANCE, selected};
use geonav_domain::{RegionRef, SelectedRegion, Selection, Subregions};
use geonav_event_bus::{EventBus, EventReceiverExt};
use geonav_navigation::SelectionStore;

fn store() -> SelectionStore {
    SelectionStore::new(EventBus::new(), Selection::world(CONTINENTS))
}

#[test]
fn starts_at_generation_zero_on_the_root() {
    let store = store();

    assert_eq!(store.generation(), 0);
    assert!(store.selection().region.region.is_root());
    assert_eq!(store.selection().region.subregions, Subregions::Present);
}

#[test]
fn every_change_bumps_the_generation() {
    let store = store();

    let first = store.set_selected_region(selected(EUROPE));
    let second = store.set_selected_hierarchy(CLIMATE);

    assert_eq!(first.generation, 1);
    assert_eq!(second.generation, 2);
    assert_eq!(store.generation(), 2);
    assert_eq!(second.selection.region.region, RegionRef::from(EUROPE), "hierarchy-only change keeps the region");
}

#[test]
fn switching_hierarchy_resets_to_the_root_atomically() {
    let store = store();
    store.set_selected_region(selected(FRANCE));

    let change = store.switch_hierarchy(CLIMATE);

    assert_eq!(change.selection, Selection::world(CLIMATE));
    assert_eq!(change.generation, 2);
}

#[test]
fn switching_hierarchy_uses_the_configured_root_label() {
    let store = SelectionStore::with_root_name(EventBus::new(), Selection::root(CONTINENTS, "Earth"), "Earth");
    store.set_selected_region(selected(FRANCE));

    let change = store.switch_hierarchy(CLIMATE);

    assert_eq!(change.selection, Selection::root(CLIMATE, "Earth"));
    assert!(change.selection.region.region.is_root());
    assert_eq!(change.selection.region.subregions, Subregions::Present);
}

#[test]
fn resolved_flag_only_applies_to_the_selected_region() {
    let store = store();
    store.set_selected_region(SelectedRegion::new(EUROPE, "Europe", Subregions::Unknown));

    assert!(store.set_subregions(RegionRef::from(FRANCE), Subregions::Absent).is_none());
    assert_eq!(store.generation(), 1);

    let change = store.set_subregions(RegionRef::from(EUROPE), Subregions::Present).unwrap();
    assert_eq!(change.generation, 2);
    assert_eq!(change.selection.region.subregions, Subregions::Present);
    assert_eq!(change.selection.key(), store.selection().key(), "flag does not change identity");
}

#[tokio::test]
async fn subscribers_see_changes_in_generation_order() {
    let store = store();
    let mut rx = store.subscribe().unwrap();

    store.set_selected_region(selected(EUROPE));
    store.set_selected_region(selected(FRANCE));
    store.switch_hierarchy(CLIMATE);

    let generations: Vec<u64> = [
        EventReceiverExt::recv(&mut rx).await.unwrap(),
        EventReceiverExt::recv(&mut rx).await.unwrap(),
        EventReceiverExt::recv(&mut rx).await.unwrap(),
    ]
    .iter()
    .map(|event| event.generation)
    .collect();

    assert_eq!(generations, vec![1, 2, 3]);
}

#[test]
fn snapshot_pairs_selection_with_its_generation() {
    let store = store();
    store.set_selected_region(selected(FRANCE));

    let snapshot = store.snapshot();

    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.selection.region.name, "France");
}
