//! Load-distribution introspection.

/// Point-in-time load distribution for a StrandMap.
///
/// Shard sizes are observed one shared lock at a time, so under
/// concurrent writers the totals are a best-effort estimate, not a
/// globally consistent count.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stats {
    /// Total number of entries across all shards.
    pub len: usize,
    /// Number of entries in each shard, in shard-index order.
    pub shard_loads: Vec<usize>,
    /// Average load (entries) per shard.
    pub avg_load_per_shard: f64,
    /// Max load / avg load. A ratio well above 1.0 means the configured
    /// sharding strategy is funneling keys into few shards.
    pub max_load_ratio: f64,
}

impl Stats {
    pub(crate) fn from_shard_loads(shard_loads: Vec<usize>) -> Self {
        let len: usize = shard_loads.iter().sum();
        let avg_load_per_shard = if shard_loads.is_empty() {
            0.0
        } else {
            len as f64 / shard_loads.len() as f64
        };
        let max = shard_loads.iter().copied().max().unwrap_or(0);
        let max_load_ratio = if avg_load_per_shard > 0.0 {
            max as f64 / avg_load_per_shard
        } else {
            0.0
        };

        Self {
            len,
            shard_loads,
            avg_load_per_shard,
            max_load_ratio,
        }
    }
}
