use serde::{Deserialize, Serialize};

/// Connection details for the admin control plane that `qo-config-client`
/// polls for flags, routing, and third-party credentials. Auth is a single
/// shared service credential, opaque to everything but the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminPlaneConfig {
    pub base_url: String,
    pub service_credential_env: String,
    pub flags_ttl_secs: u64,
    pub routing_ttl_secs: u64,
    pub credentials_ttl_secs: u64,
    pub poll_interval_secs: u64,
}

impl Default for AdminPlaneConfig {
    fn default() -> Self {
        AdminPlaneConfig {
            base_url: "http://localhost:4000".to_string(),
            service_credential_env: "QO_ADMIN_SERVICE_CREDENTIAL".to_string(),
            flags_ttl_secs: 60,
            routing_ttl_secs: 60,
            credentials_ttl_secs: 300,
            poll_interval_secs: 30,
        }
    }
}
