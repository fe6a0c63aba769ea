//! End-to-end recency scenarios for `LruMap`.

use lru_map::{ConfigError, Error, LruMap, LruMapConfig};

fn keys(map: &LruMap<&'static str, &'static str>) -> Vec<&'static str> {
    map.keys().copied().collect()
}

fn values(map: &LruMap<&'static str, &'static str>) -> Vec<&'static str> {
    map.values().copied().collect()
}

fn abc() -> LruMap<&'static str, &'static str> {
    let mut map = LruMap::unbounded();
    map.set("A", "Alpha");
    map.set("B", "Bravo");
    map.set("C", "Charlie");
    map
}

#[test]
fn insertion_order_and_access_promotion() {
    let mut map = abc();
    assert_eq!(keys(&map), ["C", "B", "A"]);

    assert_eq!(map.get("B"), Some(&"Bravo"));
    assert_eq!(keys(&map), ["B", "C", "A"]);
}

#[test]
fn full_map_evicts_oldest_on_insert() {
    let mut map = LruMap::new(3).unwrap();
    map.set("A", "Alpha");
    map.set("B", "Bravo");
    map.set("C", "Charlie");

    let evicted = map.set("D", "Delta");
    assert_eq!(evicted, Some(("A", "Alpha")));
    assert_eq!(keys(&map), ["D", "C", "B"]);
}

#[test]
fn shrinking_bound_keeps_most_recent() {
    let mut map = LruMap::new(5).unwrap();
    for key in ["A", "B", "C", "D", "E"] {
        map.set(key, key);
    }

    let evicted = map.set_maximum_size(Some(3)).unwrap();
    assert_eq!(evicted, [("A", "A"), ("B", "B")]);
    assert_eq!(keys(&map), ["E", "D", "C"]);
    assert_eq!(map.maximum_size(), Some(3));
}

#[test]
fn put_if_absent_on_present_key_promotes_without_calling() {
    let mut map = LruMap::new(3).unwrap();
    map.set("C", "Charlie");
    map.set("A", "Alpha");
    map.set("B", "Bravo");
    assert_eq!(keys(&map), ["B", "A", "C"]);

    let value = *map.put_if_absent("A", || unreachable!("value already present"));
    assert_eq!(value, "Alpha");
    assert_eq!(keys(&map), ["A", "B", "C"]);
}

#[test]
fn repeated_set_of_same_key_is_not_duplicated() {
    let mut map = LruMap::unbounded();
    map.set("A", "Alpha");
    map.set("A", "Alpha");

    assert_eq!(keys(&map), ["A"]);
    assert_eq!(values(&map), ["Alpha"]);
    assert_eq!(map.len(), 1);
}

#[test]
fn remove_from_any_position() {
    let mut map = abc();
    assert_eq!(map.remove("B"), Some("Bravo"));
    assert_eq!(keys(&map), ["C", "A"]);

    let mut map = abc();
    assert_eq!(map.remove("C"), Some("Charlie"));
    assert_eq!(keys(&map), ["B", "A"]);

    let mut map = abc();
    assert_eq!(map.remove("A"), Some("Alpha"));
    assert_eq!(keys(&map), ["C", "B"]);

    assert_eq!(map.remove("Z"), None);
    assert_eq!(keys(&map), ["C", "B"]);
}

#[test]
fn failing_value_callback_propagates_and_changes_nothing() {
    #[derive(Debug, PartialEq)]
    struct LoadFailed;

    let mut map = LruMap::new(3).unwrap();
    map.set("A", "Alpha");
    map.set("B", "Bravo");
    map.set("C", "Charlie");

    let result = map.try_put_if_absent("D", || Err(LoadFailed));
    assert_eq!(result, Err(LoadFailed));
    assert_eq!(keys(&map), ["C", "B", "A"]);
    assert!(!map.contains_key("D"));

    let loaded = map.try_put_if_absent("D", || Ok::<_, LoadFailed>("Delta"));
    assert_eq!(loaded, Ok(&"Delta"));
    assert_eq!(keys(&map), ["D", "C", "B"]);
}

#[test]
fn zero_bound_is_invalid_configuration() {
    assert!(matches!(
        LruMap::<u32, u32>::new(0),
        Err(Error::Config(ConfigError::InvalidMaximumSize { value: 0 }))
    ));
    assert!(LruMap::<u32, u32>::with_config(&LruMapConfig::bounded(0)).is_err());

    let mut map = LruMap::new(2).unwrap();
    map.set(1u32, 1u32);
    assert!(matches!(
        map.set_maximum_size(Some(0)),
        Err(Error::Config(ConfigError::InvalidMaximumSize { value: 0 }))
    ));
    assert_eq!(map.maximum_size(), Some(2));
    assert_eq!(map.len(), 1);
}

#[test]
fn initial_entries_are_inserted_in_order() {
    let map = LruMap::from_entries(
        &LruMapConfig::unbounded(),
        [("A", "Alpha"), ("B", "Bravo"), ("C", "Charlie")],
    )
    .unwrap();
    assert_eq!(keys(&map), ["C", "B", "A"]);
    assert_eq!(values(&map), ["Charlie", "Bravo", "Alpha"]);
}

#[test]
fn config_from_toml_builds_bounded_map() {
    let config = LruMapConfig::from_toml_str("maximum_size = 2").unwrap();
    let mut map = LruMap::with_config(&config).unwrap();
    map.set("A", "Alpha");
    map.set("B", "Bravo");
    map.set("C", "Charlie");
    assert_eq!(keys(&map), ["C", "B"]);
}

#[test]
fn views_do_not_promote() {
    let map = abc();
    for _ in 0..3 {
        assert_eq!(keys(&map), ["C", "B", "A"]);
        assert_eq!(values(&map), ["Charlie", "Bravo", "Alpha"]);
        let mut seen = Vec::new();
        map.for_each(|k, v| seen.push((*k, *v)));
        assert_eq!(seen, [("C", "Charlie"), ("B", "Bravo"), ("A", "Alpha")]);
    }
    assert!(map.contains_value(&"Alpha"));
    assert_eq!(keys(&map), ["C", "B", "A"]);
}
