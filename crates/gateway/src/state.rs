//! Shared application state handed to every axum handler.
//!
//! Mirrors the teacher's `AppState` shape (one `Arc` per long-lived
//! collaborator, `Clone` is cheap) but scoped to what this gateway's
//! handlers actually touch: the orchestrator itself for `/v1/chat/
//! completions`, plus the individual collaborators `/health` and the CLI's
//! `doctor` command need to probe independently of a full `run()` call.

use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusHandle;
use qo_adapters::AdapterRegistry;
use qo_cache::ResponseCache;
use qo_config_client::ConfigClient;
use qo_domain::config::Config;
use qo_llm::LlmClient;
use qo_orchestrator::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<Orchestrator>,
    pub llm: Arc<LlmClient>,
    pub adapters: Arc<AdapterRegistry>,
    pub config_client: Arc<ConfigClient>,
    pub cache: Arc<ResponseCache>,
    pub metrics_handle: PrometheusHandle,
    pub started_at: Instant,
}
