use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard};

/// A single shard: a string-keyed map guarded by its own read-write lock.
///
/// The map is only ever touched while the lock is held — shared for
/// reads, exclusive for writes. No two shards share a lock.
pub(crate) struct Shard<V> {
    items: RwLock<HashMap<String, V>>,
}

impl<V> Shard<V> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Copy out the value under `key`, if present.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.items.read().get(key).cloned()
    }

    /// Membership test without cloning the value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.items.read().contains_key(key)
    }

    /// Insert or overwrite, returning the previous value if any.
    pub fn insert(&self, key: String, value: V) -> Option<V> {
        self.items.write().insert(key, value)
    }

    /// Insert only if `key` is absent. Returns whether the insert happened.
    pub fn insert_if_absent(&self, key: String, value: V) -> bool {
        match self.items.write().entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Insert-or-update in one lock acquisition. `combine` sees the
    /// current value (if any) and the incoming one, and returns the
    /// value to store; that value is written back and returned.
    ///
    /// `combine` runs under this shard's exclusive lock.
    pub fn upsert<F>(&self, key: String, value: V, combine: F) -> V
    where
        V: Clone,
        F: FnOnce(Option<V>, V) -> V,
    {
        let mut items = self.items.write();
        let current = items.remove(&key);
        let stored = combine(current, value);
        items.insert(key, stored.clone());
        stored
    }

    /// Conditional removal in one lock acquisition. `decide` sees the
    /// key and its current value (if any); the entry is deleted only
    /// when `decide` returns true and the key was present. Returns the
    /// decision either way.
    ///
    /// `decide` runs under this shard's exclusive lock.
    pub fn remove_if<F>(&self, key: &str, decide: F) -> bool
    where
        F: FnOnce(&str, Option<&V>) -> bool,
    {
        let mut items = self.items.write();
        let remove = decide(key, items.get(key));
        if remove {
            items.remove(key);
        }
        remove
    }

    /// Unconditional delete. No-op if the key is absent.
    pub fn remove(&self, key: &str) {
        self.items.write().remove(key);
    }

    /// Read-and-delete in one lock acquisition.
    pub fn pop(&self, key: &str) -> Option<V> {
        self.items.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Drop every entry in one exclusive-lock pass.
    pub fn clear(&self) {
        self.items.write().clear();
    }

    /// Atomically take this shard's entire map, leaving it empty.
    pub fn take_items(&self) -> HashMap<String, V> {
        std::mem::take(&mut *self.items.write())
    }

    /// Shared lock for scan-style access.
    pub fn read_lock(&self) -> RwLockReadGuard<'_, HashMap<String, V>> {
        self.items.read()
    }
}
