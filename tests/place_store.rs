use place_keeper::{Coordinate, Database, Place, PlaceList, PlaceStore};
use tempfile::TempDir;

fn open(dir: &TempDir, force_reset: bool) -> PlaceStore {
    Database::open(dir.path().join("data").join("places.sqlite"))
        .and_then(|db| db.initialize(force_reset))
        .expect("store")
}

fn draft(title: &str, description: Option<&str>) -> Place {
    Place::new(
        title,
        description.map(str::to_string),
        Coordinate::new(-31.332, -54.0718),
    )
}

#[test]
fn places_survive_reopening_the_database() {
    let dir = tempfile::tempdir().expect("temp dir");
    let id = {
        let store = open(&dir, false);
        store.insert(&draft("IFSUL Bagé", None)).expect("insert")
    };

    let store = open(&dir, false);
    let places = store.list_all().expect("list");
    assert_eq!(places.len(), 1);
    assert_eq!(places[0], draft("IFSUL Bagé", None).with_id(id));
    assert!(!places[0].is_favorite);
}

#[test]
fn forced_reset_discards_every_row() {
    let dir = tempfile::tempdir().expect("temp dir");
    {
        let store = open(&dir, false);
        for title in ["One", "Two", "Three"] {
            store.insert(&draft(title, None)).expect("insert");
        }
        assert_eq!(store.list_all().expect("list").len(), 3);
    }

    let store = open(&dir, true);
    assert!(store.list_all().expect("list").is_empty());
}

#[test]
fn reset_on_a_ready_store_starts_ids_over() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = open(&dir, false);
    store.insert(&draft("Old", None)).expect("insert");
    store.reset().expect("reset");

    assert!(store.list_all().expect("list").is_empty());
    assert_eq!(store.insert(&draft("New", None)).expect("insert"), 1);
}

#[test]
fn user_text_is_stored_verbatim() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = open(&dir, false);
    let tricky = "Bob's \"bar\"; DROP TABLE place; --";
    store.insert(&draft(tricky, Some(tricky))).expect("insert");

    let places = store.list_all().expect("list");
    assert_eq!(places[0].title, tricky);
    assert_eq!(places[0].description.as_deref(), Some(tricky));
}

#[test]
fn controller_snapshot_tracks_every_mutation() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut list = PlaceList::load(open(&dir, false)).expect("list");

    let park = list.create(&draft("Park", Some("Lago da Prefeitura"))).expect("create");
    let museum = list.create(&draft("Museum", None)).expect("create");
    assert_eq!(list.places().len(), 2);

    let saved = list.find(park).cloned().expect("park");
    list.toggle_favorite(&saved).expect("favorite");
    let favorites: Vec<_> = list.favorites().into_iter().map(|p| p.id).collect();
    assert_eq!(favorites, vec![Some(park)]);

    let results: Vec<_> = list.search("prefeitura").into_iter().map(|p| p.id).collect();
    assert_eq!(results, vec![Some(park)]);
    assert!(list.search("").is_empty());

    let doomed = list.find(museum).cloned().expect("museum");
    list.delete(&doomed).expect("delete");
    assert_eq!(list.places().len(), 1);

    // A second session sees exactly what the first one left behind.
    drop(list);
    let reopened = PlaceList::load(open(&dir, false)).expect("reload");
    assert_eq!(reopened.places().len(), 1);
    assert!(reopened.places()[0].is_favorite);
}
