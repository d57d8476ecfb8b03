use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Inbound concurrency limiter capacity (spec §5: default 3-10).
    pub max_concurrent_requests: usize,
    /// Hard wall-clock ceiling for a request, enforced by the HTTP surface.
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_concurrent_requests: 8,
            request_timeout_ms: 30_000,
        }
    }
}
