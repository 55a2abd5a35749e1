use std::hash::Hasher;
use std::sync::Arc;

/// FNV-1a 64-bit offset basis.
pub(crate) const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;

/// FNV-1a 64-bit prime.
pub(crate) const FNV_PRIME: u64 = 1_099_511_628_211;

/// Hash a key with 64-bit FNV-1a.
///
/// The "1a" ordering (XOR the byte in, then multiply) avalanches better
/// than FNV-1 on short keys, which keeps shard assignment even for the
/// small keys typical of cache-style workloads. Output is deterministic
/// across processes and container instances.
#[inline]
pub fn fnv1a(key: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in key.as_bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Sharding strategy: maps a key to a 64-bit hash used only for shard
/// selection. Collision handling inside a shard is the shard map's own
/// concern, so a fast non-cryptographic hash is all that's needed here.
#[derive(Clone, Default)]
pub enum Sharding {
    /// 64-bit FNV-1a (default). Deterministic across processes.
    #[default]
    Fnv1a,
    /// AHash over the key bytes. Stronger mixing, but deterministic only
    /// within one process.
    AHash,
    /// FxHash over the key bytes (faster, weaker distribution).
    #[cfg(feature = "fxhash")]
    FxHash,
    /// Caller-supplied strategy, e.g. to co-locate related keys or to
    /// pin routing for tests. Must be pure and deterministic for the
    /// lifetime of any map using it.
    Custom(Arc<dyn Fn(&str) -> u64 + Send + Sync>),
}

impl Sharding {
    /// Hash a key to determine which shard it belongs to.
    pub fn hash_key(&self, key: &str) -> u64 {
        match self {
            Sharding::Fnv1a => fnv1a(key),
            Sharding::AHash => {
                let mut hasher = ahash::AHasher::default();
                hasher.write(key.as_bytes());
                hasher.finish()
            }
            #[cfg(feature = "fxhash")]
            Sharding::FxHash => {
                let mut hasher = fxhash::FxHasher::default();
                hasher.write(key.as_bytes());
                hasher.finish()
            }
            Sharding::Custom(f) => f(key),
        }
    }
}

impl std::fmt::Debug for Sharding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sharding::Fnv1a => write!(f, "Sharding::Fnv1a"),
            Sharding::AHash => write!(f, "Sharding::AHash"),
            #[cfg(feature = "fxhash")]
            Sharding::FxHash => write!(f, "Sharding::FxHash"),
            Sharding::Custom(_) => write!(f, "Sharding::Custom(..)"),
        }
    }
}
