use chrono::{Duration, Utc};
use mockall::mock;
use places_core::{Place, RootResolver, StoreConfig};
use places_store::{PlaceStore, StoreError};
use std::path::PathBuf;
use tempfile::TempDir;

mock! {
    pub Resolver {}

    impl RootResolver for Resolver {
        fn activity_root(&self) -> places_core::Result<PathBuf>;
    }
}

fn create_test_place(uri: &str, days_ago: i64) -> Place {
    let mut place = Place::new(uri).with_title("test page");
    place.visits = 1;
    place.last_visit = Utc::now() - Duration::days(days_ago);
    place
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("places.db")
}

#[test]
fn test_open_creates_database_file() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();

    assert!(path.exists());
    assert_eq!(store.path(), Some(path.as_path()));
}

#[test]
fn test_places_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let place = create_test_place("http://keep.test/", 0);

    {
        let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();
        store.add_place(&place).unwrap();
    }

    let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();
    assert_eq!(store.lookup_place(&place.uri).unwrap(), Some(place));
}

#[test]
fn test_reopen_expires_stale_places() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    {
        let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();
        store.add_place(&create_test_place("http://stale.test/", 45)).unwrap();
        store.add_place(&create_test_place("http://recent.test/", 29)).unwrap();
        store.add_place(&create_test_place("http://today.test/", 0)).unwrap();
    }

    let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();
    assert!(store.lookup_place("http://stale.test/").unwrap().is_none());
    assert!(store.lookup_place("http://recent.test/").unwrap().is_some());
    assert!(store.lookup_place("http://today.test/").unwrap().is_some());
}

#[test]
fn test_first_open_keeps_stale_places_until_reopen() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    // The sweep runs at open time only, so a stale row added afterwards sticks around
    let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();
    store.add_place(&create_test_place("http://stale.test/", 90)).unwrap();
    assert!(store.lookup_place("http://stale.test/").unwrap().is_some());
}

#[test]
fn test_expiry_window_follows_config() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let config = StoreConfig {
        expire_days: 7,
        ..StoreConfig::default()
    };

    {
        let store = PlaceStore::open(&path, &config).unwrap();
        store.add_place(&create_test_place("http://week-old.test/", 10)).unwrap();
    }

    let store = PlaceStore::open(&path, &config).unwrap();
    assert!(store.search("").unwrap().is_empty());
}

#[test]
fn test_open_in_resolves_activity_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();

    let mut resolver = MockResolver::new();
    resolver
        .expect_activity_root()
        .times(1)
        .returning(move || Ok(root.clone()));

    let store = PlaceStore::open_in(&resolver, &StoreConfig::default()).unwrap();

    let expected = dir.path().join("data").join("places.db");
    assert!(expected.exists());
    assert_eq!(store.path(), Some(expected.as_path()));
}

#[test]
fn test_open_in_propagates_resolver_failure() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_activity_root()
        .returning(|| Err(places_core::Error::ConfigError("no activity root".into())));

    let result = PlaceStore::open_in(&resolver, &StoreConfig::default());
    assert!(matches!(result, Err(StoreError::Core(_))));
}

#[test]
fn test_unopenable_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("places.db");

    let result = PlaceStore::open(&path, &StoreConfig::default());
    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[test]
fn test_lookup_then_update_workflow() {
    let dir = TempDir::new().unwrap();
    let store = PlaceStore::open(db_path(&dir), &StoreConfig::default()).unwrap();
    let uri = "http://wiki.laptop.org/";

    // What a browser does on every page load
    for _ in 0..3 {
        match store.lookup_place(uri).unwrap() {
            Some(mut place) => {
                place.record_visit();
                store.update_place(&place).unwrap();
            }
            None => {
                let mut place = Place::new(uri).with_title("OLPC wiki");
                place.record_visit();
                store.add_place(&place).unwrap();
            }
        }
    }

    let results = store.search("laptop").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].visits, 3);
}

#[test]
fn test_negative_expiry_window_refuses_to_open() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let config = places_core::Config::from_toml("[store]\nexpire_days = -1\n").unwrap();

    {
        let store = PlaceStore::open(&path, &config.store).unwrap();
        store.add_place(&Place::new("http://today.test/")).unwrap();
    }

    let reopened = PlaceStore::open(&path, &config.store);
    assert!(matches!(reopened, Err(StoreError::InvalidRetention(-1))));

    let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();
    assert!(store.lookup_place("http://today.test/").unwrap().is_some());
}

#[test]
fn test_far_future_place_is_not_swept() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    {
        let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();
        let mut ahead = create_test_place("http://ahead.test/", 0);
        ahead.last_visit = Utc::now() + Duration::days(365 * 8000);
        assert!(store.add_place(&ahead).is_err());

        store.add_place(&create_test_place("http://today.test/", -365)).unwrap();
    }

    let store = PlaceStore::open(&path, &StoreConfig::default()).unwrap();
    assert!(store.lookup_place("http://today.test/").unwrap().is_some());
    assert!(store.lookup_place("http://ahead.test/").unwrap().is_none());
}
