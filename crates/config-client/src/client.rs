//! Admin control-plane client: feature flags, intent routing, and
//! third-party API credentials, each cached independently with its own
//! TTL. Flags and routing are refreshed by a background poll loop;
//! credentials are fetched lazily on first request per service, matching
//! `spec.md`'s "pulled lazily on adapter init".
//!
//! On fetch failure every accessor falls back to the last known good
//! snapshot, and only when none exists at all does it fall back further
//! to a hardcoded default plus a `TraceEvent::ConfigFallback`. A feature
//! flag's absence or disabled state must never fail a caller — it only
//! changes which branch the orchestrator takes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use qo_domain::config::AdminPlaneConfig;
use qo_domain::credential::Credential;
use qo_domain::flags::FeatureFlag;
use qo_domain::intent::Intent;
use qo_domain::routing::RoutingEntry;
use qo_domain::trace::TraceEvent;

use crate::snapshot::Snapshot;

pub struct ConfigClient {
    http: reqwest::Client,
    base_url: String,
    service_credential: String,
    flags_ttl: Duration,
    routing_ttl: Duration,
    credentials_ttl: Duration,
    flags: RwLock<Option<Snapshot<HashMap<String, FeatureFlag>>>>,
    routing: RwLock<Option<Snapshot<HashMap<Intent, RoutingEntry>>>>,
    credentials: RwLock<HashMap<String, Snapshot<Credential>>>,
}

impl ConfigClient {
    pub fn new(config: &AdminPlaneConfig, service_credential: String) -> Self {
        ConfigClient {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            service_credential,
            flags_ttl: Duration::from_secs(config.flags_ttl_secs),
            routing_ttl: Duration::from_secs(config.routing_ttl_secs),
            credentials_ttl: Duration::from_secs(config.credentials_ttl_secs),
            flags: RwLock::new(None),
            routing: RwLock::new(None),
            credentials: RwLock::new(HashMap::new()),
        }
    }

    /// Whether the named flag is enabled. Absence is treated as disabled
    /// (never an error) except where a hardcoded default says otherwise.
    pub fn flag(&self, name: &str) -> bool {
        let fresh = {
            let guard = self.flags.read();
            guard
                .as_ref()
                .filter(|s| s.is_fresh(self.flags_ttl))
                .and_then(|s| s.value.get(name).cloned())
        };
        if let Some(flag) = fresh {
            return flag.effective();
        }

        // Stale or missing: serve last known good regardless of freshness
        // before falling back to a hardcoded default.
        let stale = self.flags.read().as_ref().and_then(|s| s.value.get(name).cloned());
        match stale {
            Some(flag) => flag.effective(),
            None => {
                TraceEvent::ConfigFallback {
                    key: format!("flag:{name}"),
                    reason: "no cached value available".to_string(),
                }
                .emit();
                false
            }
        }
    }

    pub fn routing(&self, intent: Intent) -> RoutingEntry {
        let fresh = {
            let guard = self.routing.read();
            guard
                .as_ref()
                .filter(|s| s.is_fresh(self.routing_ttl))
                .and_then(|s| s.value.get(&intent).cloned())
        };
        if let Some(entry) = fresh {
            return entry;
        }

        let stale = self.routing.read().as_ref().and_then(|s| s.value.get(&intent).cloned());
        match stale {
            Some(entry) => entry,
            None => {
                TraceEvent::ConfigFallback {
                    key: format!("routing:{}", intent.as_str()),
                    reason: "no cached value available".to_string(),
                }
                .emit();
                RoutingEntry::hardcoded_default(intent)
            }
        }
    }

    /// Fetch (or serve cached) credential for `service`. Unlike flags and
    /// routing, credentials are not proactively polled; they are fetched
    /// on demand and then cached for their own TTL.
    pub async fn external_key(&self, service: &str) -> Option<Credential> {
        {
            let guard = self.credentials.read();
            if let Some(snapshot) = guard.get(service) {
                if snapshot.is_fresh(self.credentials_ttl) {
                    return Some(snapshot.value.clone());
                }
            }
        }

        match self.fetch_credential(service).await {
            Ok(credential) => {
                self.credentials
                    .write()
                    .insert(service.to_string(), Snapshot::new(credential.clone()));
                Some(credential)
            }
            Err(reason) => {
                let stale = self.credentials.read().get(service).map(|s| s.value.clone());
                if stale.is_none() {
                    TraceEvent::ConfigFallback {
                        key: format!("credential:{service}"),
                        reason,
                    }
                    .emit();
                }
                stale
            }
        }
    }

    async fn fetch_flags(&self) -> Result<HashMap<String, FeatureFlag>, String> {
        let url = format!("{}/features/public", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("X-Service-Credential", &self.service_credential)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let flags: Vec<FeatureFlag> = resp.json().await.map_err(|e| e.to_string())?;
        Ok(flags.into_iter().map(|f| (f.name.clone(), f)).collect())
    }

    async fn fetch_routing(&self) -> Result<HashMap<Intent, RoutingEntry>, String> {
        let url = format!("{}/routing/public", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("X-Service-Credential", &self.service_credential)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let entries: Vec<RoutingEntry> = resp.json().await.map_err(|e| e.to_string())?;
        Ok(entries.into_iter().map(|e| (e.intent, e)).collect())
    }

    async fn fetch_credential(&self, service: &str) -> Result<Credential, String> {
        let url = format!("{}/external-api-keys/public/{service}/key", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("X-Service-Credential", &self.service_credential)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        resp.json().await.map_err(|e| e.to_string())
    }

    /// One refresh cycle for flags and routing. Called by the background
    /// poll loop; public so tests and `doctor`-style CLI checks can drive
    /// it directly without waiting on a timer.
    pub async fn refresh(&self) {
        match self.fetch_flags().await {
            Ok(flags) => *self.flags.write() = Some(Snapshot::new(flags)),
            Err(reason) => {
                tracing::warn!(error = %reason, "flag refresh failed, serving cached values");
            }
        }
        match self.fetch_routing().await {
            Ok(routing) => *self.routing.write() = Some(Snapshot::new(routing)),
            Err(reason) => {
                tracing::warn!(error = %reason, "routing refresh failed, serving cached values");
            }
        }
    }
}

/// Spawn the background poll loop that keeps flags and routing warm.
/// Credentials are intentionally excluded — they are refreshed lazily.
pub fn spawn_background_refresh(client: Arc<ConfigClient>, poll_interval: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        loop {
            interval.tick().await;
            client.refresh().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AdminPlaneConfig {
        AdminPlaneConfig {
            base_url: "http://localhost:0".to_string(),
            service_credential_env: "QO_ADMIN_SERVICE_CREDENTIAL".to_string(),
            flags_ttl_secs: 60,
            routing_ttl_secs: 60,
            credentials_ttl_secs: 300,
            poll_interval_secs: 30,
        }
    }

    #[test]
    fn flag_falls_back_to_false_with_no_cache() {
        let client = ConfigClient::new(&test_config(), "secret".to_string());
        assert!(!client.flag("nonexistent"));
    }

    #[test]
    fn routing_falls_back_to_hardcoded_default_with_no_cache() {
        let client = ConfigClient::new(&test_config(), "secret".to_string());
        let entry = client.routing(Intent::Weather);
        assert_eq!(entry.adapter_name, "weather");
    }

    #[test]
    fn required_flag_with_stale_disabled_cache_is_effective() {
        let client = ConfigClient::new(&test_config(), "secret".to_string());
        let mut map = HashMap::new();
        map.insert(
            "must_run".to_string(),
            FeatureFlag {
                id: 1,
                name: "must_run".to_string(),
                enabled: false,
                required: true,
            },
        );
        *client.flags.write() = Some(Snapshot::new(map));
        assert!(client.flag("must_run"));
    }
}
