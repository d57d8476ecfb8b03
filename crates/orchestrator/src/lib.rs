//! The query orchestrator: a request-scoped state machine that sequences
//! classify → route_decision → retrieve → synthesize → validate →
//! finalize, enforcing a per-stage budget and falling back rather than
//! aborting when a stage runs long or an upstream fails.
//!
//! Owns no per-request mutable state beyond the `RequestState` built
//! fresh inside `run()`; every collaborator it holds (`SessionStore`,
//! `ResponseCache`, `LlmClient`, `AdapterRegistry`, `ParallelSearchEngine`,
//! `ConfigClient`) is shared via `Arc` across every call.

mod fingerprint;
mod prompt;
mod route;
mod stages;

use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use qo_adapters::{AdapterRegistry, ParallelSearchEngine};
use qo_cache::ResponseCache;
use qo_classifier::Classifier;
use qo_config_client::ConfigClient;
use qo_domain::flags::names;
use qo_domain::intent::Intent;
use qo_domain::request::{normalize_query, ChatResponse, Request, RequestState, Stage};
use qo_domain::trace::TraceEvent;
use qo_llm::{LlmClient, TierConfig};
use qo_sessions::SessionStore;

pub use route::RouteTarget;

/// Per-stage wall-clock budgets, mirroring `qo_domain::config::BudgetsConfig`.
#[derive(Debug, Clone)]
pub struct OrchestratorBudgets {
    pub classify: Duration,
    pub retrieve_rag: Duration,
    pub retrieve_parallel_search: Duration,
    pub synthesize: Duration,
    pub validate: Duration,
}

impl From<&qo_domain::config::BudgetsConfig> for OrchestratorBudgets {
    fn from(cfg: &qo_domain::config::BudgetsConfig) -> Self {
        OrchestratorBudgets {
            classify: Duration::from_millis(cfg.classify_ms),
            retrieve_rag: Duration::from_millis(cfg.retrieve_rag_ms),
            retrieve_parallel_search: Duration::from_millis(cfg.retrieve_parallel_search_ms),
            synthesize: Duration::from_millis(cfg.synthesize_ms),
            validate: Duration::from_millis(cfg.validate_ms),
        }
    }
}

pub struct Orchestrator {
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) cache: Arc<ResponseCache>,
    pub(crate) classifier: Arc<Classifier>,
    pub(crate) llm: Arc<LlmClient>,
    pub(crate) tiers: TierConfig,
    pub(crate) adapters: Arc<AdapterRegistry>,
    pub(crate) search_engine: Arc<ParallelSearchEngine>,
    pub(crate) config: Arc<ConfigClient>,
    pub(crate) budgets: OrchestratorBudgets,
    pub(crate) default_context_turns: usize,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<SessionStore>,
        cache: Arc<ResponseCache>,
        classifier: Arc<Classifier>,
        llm: Arc<LlmClient>,
        tiers: TierConfig,
        adapters: Arc<AdapterRegistry>,
        search_engine: Arc<ParallelSearchEngine>,
        config: Arc<ConfigClient>,
        budgets: OrchestratorBudgets,
        default_context_turns: usize,
    ) -> Self {
        Orchestrator {
            sessions,
            cache,
            classifier,
            llm,
            tiers,
            adapters,
            search_engine,
            config,
            budgets,
            default_context_turns,
        }
    }

    /// Run one request through the full stage graph. Never panics or
    /// propagates an error to the caller — any internal failure surfaces
    /// as a `degraded` response built from whatever partial state was
    /// gathered before the failure.
    pub async fn run(&self, request: Request) -> ChatResponse {
        let total_started = Instant::now();
        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let raw_query = request.query().to_string();
        let normalized_query = normalize_query(&raw_query);

        let (session, _is_new) = self.sessions.resolve_or_create(&session_id);

        let mut state = RequestState::new(session_id.clone(), normalized_query.clone());
        let correlation_id = state.correlation_id.to_string();
        TraceEvent::StageStarted {
            correlation_id: correlation_id.clone(),
            stage: "classify".to_string(),
        }
        .emit();

        let classify_started = Instant::now();
        self.classify_stage(&mut state, &raw_query, &session, &request.metadata)
            .await;
        state.timings.classify_ms = classify_started.elapsed().as_millis() as u64;

        let cache_enabled = self.config.flag(names::RESPONSE_CACHE) && !request.metadata.bypass_cache;
        let cache_key = cache_enabled.then(|| self.compute_cache_key(&state, &normalized_query, &session));

        if let Some(key) = &cache_key {
            if let Some(entry) = self.cache.get(&correlation_id, key) {
                self.append_turns(&session_id, &raw_query, &entry.response, &state);
                state.timings.total_ms = total_started.elapsed().as_millis() as u64;
                return (*entry.response).clone();
            }
        }

        let has_search_providers = self.search_engine.has_providers();
        let intent = state.intent.unwrap_or(Intent::Unknown);
        let target = route::route_decision(&self.config, has_search_providers, intent);
        state.stage = Stage::Routed;

        let mut model_used: Option<String> = None;

        match target {
            RouteTarget::Control => {
                state.candidate_answer = Some(
                    "Device control requests are handled by the smart-home system, not by this assistant."
                        .to_string(),
                );
                state.verdict = Some(qo_domain::request::Verdict::FailUnsafe);
                state.degraded = true;
                state.stage = Stage::Validated;
            }
            RouteTarget::Unknown => {
                state.candidate_answer = Some(
                    "I'm not sure what you're asking — could you rephrase or add a bit more detail?"
                        .to_string(),
                );
                state.verdict = Some(qo_domain::request::Verdict::Pass);
                state.stage = Stage::Validated;
            }
            other => {
                let retrieve_started = Instant::now();
                self.retrieve_stage(&mut state, other).await;
                state.timings.retrieve_ms = retrieve_started.elapsed().as_millis() as u64;

                let synth_started = Instant::now();
                model_used = self
                    .synthesize_stage(&mut state, &raw_query, &session, &request.metadata)
                    .await;
                state.timings.synth_ms = synth_started.elapsed().as_millis() as u64;

                let validate_started = Instant::now();
                self.validate_stage(&mut state, &raw_query);
                state.timings.validate_ms = validate_started.elapsed().as_millis() as u64;
            }
        }

        let response = self.finalize_stage(&mut state, &session_id, &raw_query, cache_key.as_deref(), model_used);
        state.timings.total_ms = total_started.elapsed().as_millis() as u64;
        response
    }

    /// The session store backing this orchestrator, exposed for the
    /// `GET /session/{id}` and `GET /sessions` read endpoints.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn compute_cache_key(
        &self,
        state: &RequestState,
        normalized_query: &str,
        session: &qo_domain::session::Session,
    ) -> String {
        let intent_label = state.intent.unwrap_or(Intent::Unknown).as_str();
        let entity_fp = state
            .entities
            .as_ref()
            .map(fingerprint::entity_fingerprint)
            .unwrap_or_default();
        let last_turn_fp = fingerprint::last_assistant_fingerprint(session);
        qo_cache::cache_key(normalized_query, intent_label, &entity_fp, &last_turn_fp)
    }
}
