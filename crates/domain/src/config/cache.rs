use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    /// Size at which the cache opportunistically sweeps expired entries
    /// on the next insert, rather than running a background task.
    pub sweep_threshold: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_secs: 300,
            sweep_threshold: 10_000,
        }
    }
}
