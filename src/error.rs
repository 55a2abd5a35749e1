/// Errors that can occur when configuring a StrandMap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The shard count is invalid (must be a power of two and greater than 0).
    InvalidShardCount,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidShardCount => {
                write!(f, "shard count must be a power of two and greater than 0")
            }
        }
    }
}

impl std::error::Error for Error {}
