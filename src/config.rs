use crate::error::Error;
use crate::hash::Sharding;

/// Configuration for a StrandMap instance.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) shard_count: usize,
    pub(crate) sharding: Sharding,
    pub(crate) capacity_per_shard: Option<usize>,
}

impl Config {
    /// Create a new config with defaults (128 shards, FNV-1a sharding).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shards. Must be a power of two and greater
    /// than 0: routing masks the key hash with `shard_count - 1`, and a
    /// non-power-of-two modulo would skew the distribution anyway.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        if count == 0 || !count.is_power_of_two() {
            return Err(Error::InvalidShardCount);
        }
        self.shard_count = count;
        Ok(self)
    }

    /// Set the sharding strategy.
    pub fn sharding(mut self, sharding: Sharding) -> Self {
        self.sharding = sharding;
        self
    }

    /// Set initial capacity per shard. Total capacity will be
    /// approximately `capacity_per_shard * shard_count`. Omitted by
    /// default (HashMap default).
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.capacity_per_shard = Some(capacity);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: 128,
            sharding: Sharding::default(),
            capacity_per_shard: None,
        }
    }
}

/// Builder for creating a StrandMap with custom configuration.
pub struct StrandMapBuilder {
    config: Config,
}

impl StrandMapBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of shards. Must be a power of two and greater than 0.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        self.config = self.config.shard_count(count)?;
        Ok(self)
    }

    /// Set the sharding strategy.
    pub fn sharding(mut self, sharding: Sharding) -> Self {
        self.config = self.config.sharding(sharding);
        self
    }

    /// Set initial capacity per shard. Total capacity ≈ `capacity_per_shard * shard_count`.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.config = self.config.capacity_per_shard(capacity);
        self
    }

    /// Build a StrandMap with the configured settings.
    pub fn build<V>(self) -> Result<crate::StrandMap<V>, Error> {
        crate::StrandMap::with_config(self.config)
    }
}

impl Default for StrandMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
