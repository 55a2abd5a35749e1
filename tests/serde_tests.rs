#![cfg(feature = "serde")]

use std::collections::HashMap;
use strandmap::{StrandMap, StrandMapBuilder};

#[test]
fn test_json_encoding_is_flat() {
    let map = StrandMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    map.insert("c", 3);

    // The encoded form is a plain object — no trace of the sharding
    let value = serde_json::to_value(&map).unwrap();
    assert_eq!(value, serde_json::json!({"a": 1, "b": 2, "c": 3}));
}

#[test]
fn test_json_round_trip() {
    let map = StrandMap::new();
    for i in 0..150 {
        map.insert(format!("key_{}", i), i);
    }

    let json = serde_json::to_string(&map).unwrap();
    let decoded: StrandMap<i32> = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded.len(), 150);
    assert_eq!(decoded.items(), map.items());
}

#[test]
fn test_decode_into_custom_configuration() {
    let map = StrandMapBuilder::new()
        .shard_count(4)
        .unwrap()
        .build::<i32>()
        .unwrap();
    map.insert("a", 1);
    map.insert("b", 2);

    let json = serde_json::to_string(&map).unwrap();

    // Loading into a non-default configuration goes through a flat map
    // and extend(), since Deserialize always builds the default layout.
    let flat: HashMap<String, i32> = serde_json::from_str(&json).unwrap();
    let rebuilt = StrandMapBuilder::new()
        .shard_count(4)
        .unwrap()
        .build::<i32>()
        .unwrap();
    rebuilt.extend(flat);

    assert_eq!(rebuilt.shard_count(), 4);
    assert_eq!(rebuilt.items(), map.items());
    assert_eq!(rebuilt.shard_loads(), map.shard_loads());
}

#[test]
fn test_malformed_json_is_reported() {
    let result: Result<StrandMap<i32>, _> = serde_json::from_str("[1, 2, 3]");
    assert!(result.is_err());

    let result: Result<StrandMap<i32>, _> = serde_json::from_str("{\"key\": \"not a number\"}");
    assert!(result.is_err());
}

#[test]
fn test_decode_empty_object() {
    let decoded: StrandMap<i32> = serde_json::from_str("{}").unwrap();
    assert!(decoded.is_empty());

    // The fresh map is fully usable
    decoded.insert("after", 1);
    assert_eq!(decoded.len(), 1);
}

#[test]
fn test_stats_serialize() {
    let map = StrandMap::new();
    map.insert("a", 1);

    let value = serde_json::to_value(map.stats()).unwrap();
    assert_eq!(value["len"], 1);
    assert_eq!(value["shard_loads"].as_array().unwrap().len(), 128);
}
