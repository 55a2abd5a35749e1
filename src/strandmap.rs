use crate::config::Config;
use crate::error::Error;
use crate::hash::Sharding;
use crate::iter::Entries;
use crate::shard::Shard;
use crate::stats::Stats;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

/// Concurrency-safe map from string keys to `V`, partitioned across
/// independently locked shards.
///
/// Every key-level operation routes to exactly one shard via
/// `hash(key) & (shard_count - 1)`, so operations on keys in different
/// shards never contend. Aggregate operations (snapshots, drains,
/// counting) coordinate per-shard locking without ever holding more
/// than one shard lock at a time.
///
/// `Clone` produces a cheap handle to the same underlying storage, so a
/// map can be handed to worker threads without an extra `Arc` wrapper.
///
/// # Example
///
/// ```rust
/// use strandmap::StrandMap;
///
/// let map = StrandMap::new();
/// map.insert("alpha", 1);
///
/// assert_eq!(map.get("alpha"), Some(1));
/// assert_eq!(map.get("beta"), None);
/// ```
///
/// # Locking rules
///
/// The callbacks passed to [`upsert`](Self::upsert) and
/// [`remove_if`](Self::remove_if) run while the key's shard lock is
/// held exclusively. A callback must not call back into the same map:
/// the lock is not re-entrant, so touching a key in the same shard
/// deadlocks, and touching another shard's key couples two lock scopes.
/// This is documented caller responsibility, not detected at runtime.
pub struct StrandMap<V> {
    shards: Arc<[Shard<V>]>,
    mask: usize,
    sharding: Sharding,
}

impl<V> StrandMap<V> {
    /// Create a new map with defaults (128 shards, FNV-1a sharding).
    pub fn new() -> Self {
        Self::with_config(Config::default()).unwrap()
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        if config.shard_count == 0 || !config.shard_count.is_power_of_two() {
            return Err(Error::InvalidShardCount);
        }

        let mut shards = Vec::with_capacity(config.shard_count);
        for _ in 0..config.shard_count {
            shards.push(match config.capacity_per_shard {
                Some(capacity) => Shard::with_capacity(capacity),
                None => Shard::new(),
            });
        }

        Ok(Self {
            shards: shards.into(),
            mask: config.shard_count - 1,
            sharding: config.sharding,
        })
    }

    /// Number of shards, fixed at construction.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Route a key to its owning shard. Takes no lock.
    #[inline]
    fn shard_for(&self, key: &str) -> &Shard<V> {
        // Power-of-two shard count makes the mask equivalent to modulo.
        let index = (self.sharding.hash_key(key) as usize) & self.mask;
        &self.shards[index]
    }

    /// Insert or overwrite, returning the previous value if the key
    /// existed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strandmap::StrandMap;
    ///
    /// let map = StrandMap::new();
    /// assert_eq!(map.insert("key", 1), None);
    /// assert_eq!(map.insert("key", 2), Some(1));
    /// ```
    pub fn insert(&self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        self.shard_for(&key).insert(key, value)
    }

    /// Copy out the value under `key`, if present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strandmap::StrandMap;
    ///
    /// let map = StrandMap::new();
    /// map.insert("key", "value".to_string());
    ///
    /// assert_eq!(map.get("key").as_deref(), Some("value"));
    /// ```
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.shard_for(key).get(key)
    }

    /// Membership test without cloning the value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.shard_for(key).contains_key(key)
    }

    /// Insert only if `key` is absent. Returns whether the insert
    /// happened; an existing value is left untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strandmap::StrandMap;
    ///
    /// let map = StrandMap::new();
    /// assert!(map.insert_if_absent("key", 1));
    /// assert!(!map.insert_if_absent("key", 2));
    /// assert_eq!(map.get("key"), Some(1));
    /// ```
    pub fn insert_if_absent(&self, key: impl Into<String>, value: V) -> bool {
        let key = key.into();
        self.shard_for(&key).insert_if_absent(key, value)
    }

    /// Insert-or-update atomically under the key's shard lock.
    ///
    /// `combine` receives the current value (if any) and the incoming
    /// one, and returns the value to store; the result is written back
    /// under the same lock acquisition and returned.
    ///
    /// See the [Locking rules](#locking-rules): `combine` must not call
    /// back into this map.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strandmap::StrandMap;
    ///
    /// let map = StrandMap::new();
    /// map.upsert("hits", 1, |current, incoming| current.unwrap_or(0) + incoming);
    /// map.upsert("hits", 1, |current, incoming| current.unwrap_or(0) + incoming);
    ///
    /// assert_eq!(map.get("hits"), Some(2));
    /// ```
    pub fn upsert<F>(&self, key: impl Into<String>, value: V, combine: F) -> V
    where
        V: Clone,
        F: FnOnce(Option<V>, V) -> V,
    {
        let key = key.into();
        self.shard_for(&key).upsert(key, value, combine)
    }

    /// Conditional removal under the key's shard lock.
    ///
    /// `decide` receives the key and its current value (if any) and
    /// returns whether to delete; the entry is deleted only when
    /// `decide` returns true *and* the key was present. The decision is
    /// returned either way.
    ///
    /// See the [Locking rules](#locking-rules): `decide` must not call
    /// back into this map.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strandmap::StrandMap;
    ///
    /// let map = StrandMap::new();
    /// map.insert("session", 3);
    ///
    /// let removed = map.remove_if("session", |_key, value| value == Some(&0));
    /// assert!(!removed);
    /// assert_eq!(map.get("session"), Some(3));
    /// ```
    pub fn remove_if<F>(&self, key: &str, decide: F) -> bool
    where
        F: FnOnce(&str, Option<&V>) -> bool,
    {
        self.shard_for(key).remove_if(key, decide)
    }

    /// Unconditional delete, discarding the value. No-op if the key is
    /// absent. Use [`pop`](Self::pop) to get the removed value back.
    pub fn remove(&self, key: &str) {
        self.shard_for(key).remove(key);
    }

    /// Remove `key` and return its value, if it was present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strandmap::StrandMap;
    ///
    /// let map = StrandMap::new();
    /// map.insert("key", 7);
    ///
    /// assert_eq!(map.pop("key"), Some(7));
    /// assert_eq!(map.pop("key"), None);
    /// ```
    pub fn pop(&self, key: &str) -> Option<V> {
        self.shard_for(key).pop(key)
    }

    /// Insert every pair from `entries`.
    ///
    /// Each key's shard lock is acquired and released independently, so
    /// the batch is *not* atomic: a concurrent reader may observe some
    /// of the pairs and not others.
    pub fn extend<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, V)>,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    /// Total number of entries.
    ///
    /// Shard sizes are read one shared lock at a time, at possibly
    /// different instants — under concurrent writers the sum is a
    /// best-effort point-in-time estimate.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Check whether the map is empty (same caveat as [`len`](Self::len)).
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Call `f` for every `(key, value)` pair, shard by shard — the
    /// cheapest full traversal.
    ///
    /// Each shard's shared lock is held for the duration of that
    /// shard's callbacks, so `f` sees a consistent view *within* one
    /// shard but no cross-shard consistency, and no shard's lock
    /// overlaps another's. `f` must not call back into this map.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &V),
    {
        for shard in self.shards.iter() {
            let guard = shard.read_lock();
            for (key, value) in guard.iter() {
                f(key, value);
            }
        }
    }

    /// Remove every entry, one shard at a time.
    ///
    /// Each shard is emptied atomically under its exclusive lock, but
    /// the pass is not atomic across shards: a concurrent writer can
    /// repopulate an already-cleared shard before the pass finishes.
    /// Use [`pop_all`](Self::pop_all) to also get the removed entries.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.clear();
        }
    }

    /// Number of entries in each shard, in shard-index order.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.len()).collect()
    }

    /// Point-in-time load distribution across shards.
    pub fn stats(&self) -> Stats {
        Stats::from_shard_loads(self.shard_loads())
    }
}

impl<V> StrandMap<V>
where
    V: Send + Sync + 'static,
{
    /// Drain the whole map into a merged stream of `(key, value)`
    /// pairs.
    ///
    /// Each shard is emptied atomically under its exclusive lock (one
    /// scan task per shard), but not atomically across shards: a
    /// consumer of the stream may race a writer repopulating a shard
    /// that was already drained. Returns once every shard has captured
    /// and sized its output; the merge into the (fully buffered)
    /// stream continues in the background.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strandmap::StrandMap;
    ///
    /// let map = StrandMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let drained: Vec<_> = map.pop_all().collect();
    /// assert_eq!(drained.len(), 2);
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_all(&self) -> Entries<V> {
        let partials = self.drain_shards();
        let total = buffered_capacity(&partials);
        let (tx, rx) = bounded(total);
        fan_in(partials, tx);
        Entries::new(rx)
    }

    /// Collect every key into one flat vector.
    ///
    /// The merge channel is pre-sized from a [`len`](Self::len)
    /// observed just before the scan, so under concurrent writers the
    /// result length may differ slightly from a precise point-in-time
    /// count.
    pub fn keys(&self) -> Vec<String> {
        let count = self.len();
        let (tx, rx) = bounded(count);
        for index in 0..self.shards.len() {
            let shards = Arc::clone(&self.shards);
            let tx = tx.clone();
            thread::spawn(move || {
                let guard = shards[index].read_lock();
                for key in guard.keys() {
                    if tx.send(key.clone()).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut keys = Vec::with_capacity(count);
        keys.extend(rx);
        keys
    }

    /// One scan task per shard: take the shard's entire map under the
    /// exclusive lock, size a channel to it, move the pairs in.
    /// Read-and-clear is atomic per shard only. Blocks until every
    /// shard has reported a sized channel.
    fn drain_shards(&self) -> Vec<Receiver<(String, V)>> {
        let (ready_tx, ready_rx) = bounded(self.shards.len());
        for index in 0..self.shards.len() {
            let shards = Arc::clone(&self.shards);
            let ready_tx = ready_tx.clone();
            thread::spawn(move || {
                let items = shards[index].take_items();
                let (tx, rx) = bounded(items.len());
                if ready_tx.send(rx).is_err() {
                    return;
                }
                for pair in items {
                    // Capacity equals the item count, so sends never block.
                    let _ = tx.send(pair);
                }
            });
        }
        drop(ready_tx);

        ready_rx.iter().collect()
    }
}

impl<V> StrandMap<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Snapshot the map into an unbuffered merged stream.
    ///
    /// Pairs appear as the merge forwards them over a rendezvous
    /// channel, so a slow consumer blocks the merge threads — never the
    /// shard locks, which are released before forwarding begins. Prefer
    /// [`iter_buffered`](Self::iter_buffered) unless holding all
    /// entries buffered at once is a concern.
    pub fn iter(&self) -> Entries<V> {
        let partials = self.snapshot_shards();
        let (tx, rx) = bounded(0);
        fan_in(partials, tx);
        Entries::new(rx)
    }

    /// Snapshot the map into a merged stream pre-sized to hold every
    /// captured entry, so the merge never blocks on the consumer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strandmap::StrandMap;
    ///
    /// let map = StrandMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let mut total = 0;
    /// for (_key, value) in map.iter_buffered() {
    ///     total += value;
    /// }
    /// assert_eq!(total, 3);
    /// ```
    pub fn iter_buffered(&self) -> Entries<V> {
        let partials = self.snapshot_shards();
        let total = buffered_capacity(&partials);
        let (tx, rx) = bounded(total);
        fan_in(partials, tx);
        Entries::new(rx)
    }

    /// Flatten a buffered snapshot into one unsharded map.
    ///
    /// Keys are unique by construction of the merge; the result is the
    /// flat view the serialization adapter encodes.
    pub fn items(&self) -> HashMap<String, V> {
        self.iter_buffered().collect()
    }

    /// One scan task per shard: under the shared lock, size a channel
    /// to the shard length observed at acquisition, copy the pairs in
    /// (the exact buffer guarantees sends never block while the lock is
    /// held), release. Blocks until every shard has reported a sized
    /// channel; forwarding into the merged stream continues afterward.
    fn snapshot_shards(&self) -> Vec<Receiver<(String, V)>> {
        let (ready_tx, ready_rx) = bounded(self.shards.len());
        for index in 0..self.shards.len() {
            let shards = Arc::clone(&self.shards);
            let ready_tx = ready_tx.clone();
            thread::spawn(move || {
                let guard = shards[index].read_lock();
                let (tx, rx) = bounded(guard.len());
                if ready_tx.send(rx).is_err() {
                    return;
                }
                for (key, value) in guard.iter() {
                    let _ = tx.send((key.clone(), value.clone()));
                }
            });
        }
        drop(ready_tx);

        ready_rx.iter().collect()
    }
}

/// Total capacity of the per-shard buffers, i.e. the number of entries
/// captured by a snapshot or drain.
fn buffered_capacity<V>(partials: &[Receiver<(String, V)>]) -> usize {
    partials.iter().map(|rx| rx.capacity().unwrap_or(0)).sum()
}

/// Forward every per-shard stream into `out`, one forwarder per shard.
/// The merged channel disconnects once the last forwarder drops its
/// sender; a consumer dropping the receiver stops the forwarders.
fn fan_in<V>(partials: Vec<Receiver<(String, V)>>, out: Sender<(String, V)>)
where
    V: Send + 'static,
{
    for rx in partials {
        let out = out.clone();
        thread::spawn(move || {
            for pair in rx {
                if out.send(pair).is_err() {
                    break;
                }
            }
        });
    }
}

impl<V> Clone for StrandMap<V> {
    /// Clones are handles: both maps share the same shards.
    fn clone(&self) -> Self {
        Self {
            shards: Arc::clone(&self.shards),
            mask: self.mask,
            sharding: self.sharding.clone(),
        }
    }
}

impl<V> Default for StrandMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for StrandMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrandMap")
            .field("shard_count", &self.shards.len())
            .field("sharding", &self.sharding)
            .finish_non_exhaustive()
    }
}
