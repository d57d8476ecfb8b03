use serde::{Deserialize, Serialize};

/// A third-party API credential fetched lazily from the admin control
/// plane. The adapter that requests it retains the decrypted value only
/// in memory — it is never logged or written to disk by this crate.
#[derive(Clone, Deserialize, Serialize)]
pub struct Credential {
    pub service_name: String,
    pub api_key: String,
    pub endpoint_url: String,
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("service_name", &self.service_name)
            .field("api_key", &"<redacted>")
            .field("endpoint_url", &self.endpoint_url)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}
