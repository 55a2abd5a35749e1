//! # StrandMap
//!
//! A concurrent map for string keys that trades one global lock for many
//! small ones.
//!
//! StrandMap partitions its entries across a fixed array of shards, each
//! a hash map behind its own read-write lock, and routes every key to
//! exactly one shard by hashing. Readers and writers touching different
//! shards never block each other, which is what you want for workloads
//! that look like an in-memory key-value store: frequent overwrites and
//! removals from many threads at once, not write-once/read-many.
//!
//! ## Features
//!
//! - **Sharded locking**: contention is bounded by the shard, not the map
//! - **Atomic compound operations**: [`upsert`](StrandMap::upsert),
//!   [`insert_if_absent`](StrandMap::insert_if_absent) and
//!   [`remove_if`](StrandMap::remove_if) run their callback under one
//!   shard-lock acquisition
//! - **Channel-merged snapshots**: [`iter`](StrandMap::iter),
//!   [`iter_buffered`](StrandMap::iter_buffered) and
//!   [`pop_all`](StrandMap::pop_all) scan all shards concurrently and
//!   merge into one stream, never holding two shard locks at once
//! - **Deterministic routing**: FNV-1a by default, pluggable per map
//! - **Cheap handles**: `Clone` shares the underlying shards
//! - **Flat serde form**: encodes as a plain key→value map (`serde`
//!   feature, on by default)
//!
//! ## Example
//!
//! ```rust
//! use strandmap::StrandMap;
//!
//! let map = StrandMap::new();
//!
//! map.insert("alpha", 1);
//! map.insert("beta", 2);
//!
//! // Atomic insert-or-update under one lock acquisition.
//! map.upsert("alpha", 10, |current, incoming| current.unwrap_or(0) + incoming);
//! assert_eq!(map.get("alpha"), Some(11));
//!
//! // Hand a handle to another thread; both see the same entries.
//! let handle = map.clone();
//! std::thread::spawn(move || {
//!     handle.insert("gamma", 3);
//! })
//! .join()
//! .unwrap();
//!
//! // Merged snapshot across all shards.
//! let mut keys: Vec<_> = map.iter_buffered().map(|(key, _)| key).collect();
//! keys.sort();
//! assert_eq!(keys, ["alpha", "beta", "gamma"]);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use strandmap::{Sharding, StrandMapBuilder};
//!
//! let map = StrandMapBuilder::new()
//!     .shard_count(32)? // must be a power of two
//!     .sharding(Sharding::AHash)
//!     .build::<i32>()?;
//! map.insert("answer", 42);
//! # Ok::<(), strandmap::Error>(())
//! ```
//!
//! ## What a snapshot means here
//!
//! Aggregate operations never take a global lock — each shard is locked,
//! scanned and released independently, so a snapshot is a best-effort
//! point-in-time capture, not a serializable view. The same applies to
//! [`len`](StrandMap::len): it sums shard sizes observed at possibly
//! different instants.

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
/// Hashing and sharding strategies.
pub mod hash;
/// Merged snapshot/drain iterator.
pub mod iter;
/// Internal shard implementation.
pub mod shard;
/// Load-distribution introspection.
pub mod stats;
/// Main StrandMap implementation.
pub mod strandmap;

#[cfg(feature = "serde")]
mod serde;

// Re-export main types
pub use config::{Config, StrandMapBuilder};
pub use error::Error;
pub use hash::{fnv1a, Sharding};
pub use iter::Entries;
pub use stats::Stats;
pub use strandmap::StrandMap;
