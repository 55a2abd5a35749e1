use std::sync::Arc;
use strandmap::{fnv1a, Sharding, StrandMapBuilder};

#[test]
fn test_fnv1a_reference_vectors() {
    // Published 64-bit FNV-1a vectors
    assert_eq!(fnv1a(""), 14_695_981_039_346_656_037);
    assert_eq!(fnv1a("a"), 0xaf63_dc4c_8601_ec8c);
    assert_eq!(fnv1a("foobar"), 0x8594_4171_f739_67e8);
}

#[test]
fn test_fnv1a_is_deterministic() {
    for key in ["", "a", "some longer key with spaces", "🦀"] {
        assert_eq!(fnv1a(key), fnv1a(key));
    }
}

#[test]
fn test_deterministic_shard_assignment_across_instances() {
    let map1 = StrandMapBuilder::new()
        .shard_count(8)
        .unwrap()
        .build::<i32>()
        .unwrap();
    let map2 = StrandMapBuilder::new()
        .shard_count(8)
        .unwrap()
        .build::<i32>()
        .unwrap();

    // Insert same keys in both maps
    for i in 0..50 {
        let key = format!("key_{}", i);
        map1.insert(key.clone(), i);
        map2.insert(key, i);
    }

    // Same keys, same default strategy: identical shard distribution
    assert_eq!(map1.shard_loads(), map2.shard_loads());
}

#[test]
fn test_default_distribution_is_reasonably_even() {
    let map = StrandMapBuilder::new()
        .shard_count(16)
        .unwrap()
        .build::<i32>()
        .unwrap();

    for i in 0..1000 {
        map.insert(format!("key_{}", i), i);
    }

    let stats = map.stats();
    assert_eq!(stats.len, 1000);

    // With 1000 keys over 16 shards we expect ~62 per shard; allow
    // variance but reject gross skew.
    let max = *stats.shard_loads.iter().max().unwrap();
    let min = *stats.shard_loads.iter().min().unwrap();
    assert!(max < 125, "shard distribution too uneven (max: {})", max);
    assert!(min > 15, "shard distribution too uneven (min: {})", min);
    assert!(stats.max_load_ratio < 2.0);
}

#[test]
fn test_custom_sharding_pins_routing() {
    // Identity-like strategy: route by the first letter, so "a", "b",
    // "c" land in shards 0, 1, 2 of 4.
    let by_first_letter = Sharding::Custom(Arc::new(|key: &str| {
        key.bytes().next().map_or(0, |byte| u64::from(byte - b'a'))
    }));

    let map = StrandMapBuilder::new()
        .shard_count(4)
        .unwrap()
        .sharding(by_first_letter)
        .build::<i32>()
        .unwrap();

    map.insert("a", 1);
    map.insert("b", 2);
    map.insert("c", 3);

    assert_eq!(map.len(), 3);
    assert_eq!(map.shard_loads(), [1, 1, 1, 0]);

    let mut keys = map.keys();
    keys.sort();
    assert_eq!(keys, ["a", "b", "c"]);

    let items = map.items();
    assert_eq!(items.get("a"), Some(&1));
    assert_eq!(items.get("b"), Some(&2));
    assert_eq!(items.get("c"), Some(&3));
}

#[test]
fn test_ahash_strategy_routes_consistently() {
    let map = StrandMapBuilder::new()
        .shard_count(8)
        .unwrap()
        .sharding(Sharding::AHash)
        .build::<i32>()
        .unwrap();

    for i in 0..100 {
        map.insert(format!("key_{}", i), i);
    }

    // Same key always maps to the same shard within a process
    for i in 0..100 {
        let key = format!("key_{}", i);
        assert_eq!(map.get(&key), Some(i));
    }
    assert_eq!(map.len(), 100);
}

#[test]
fn test_single_shard_map_still_works() {
    let map = StrandMapBuilder::new()
        .shard_count(1)
        .unwrap()
        .build::<i32>()
        .unwrap();

    for i in 0..100 {
        map.insert(format!("key_{}", i), i);
    }

    assert_eq!(map.len(), 100);
    assert_eq!(map.shard_loads(), [100]);
    assert_eq!(map.pop_all().count(), 100);
    assert!(map.is_empty());
}
