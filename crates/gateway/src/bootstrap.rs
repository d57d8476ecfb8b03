//! Builds every long-lived collaborator from [`qo_domain::config::Config`]
//! and wires them into an [`AppState`]. Shared by `serve` and `doctor` so
//! both exercise the exact same construction path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use qo_adapters::{airports_path, sports_path, weather_path, AdapterRegistry, HttpDomainAdapter, HttpSearchProvider, ParallelSearchEngine, SearchProvider};
use qo_cache::ResponseCache;
use qo_classifier::Classifier;
use qo_config_client::{spawn_background_refresh, ConfigClient};
use qo_domain::config::Config;
use qo_domain::intent::Intent;
use qo_llm::{LlmClient, OpenAiCompatProvider, ProviderRegistry, TierConfig};
use qo_orchestrator::{Orchestrator, OrchestratorBudgets};
use qo_sessions::SessionStore;

use axum_prometheus::PrometheusMetricLayer;

use crate::state::AppState;

/// Builds every collaborator and returns the ready-to-serve [`AppState`]
/// alongside the HTTP metrics middleware layer (`doctor` uses the former
/// and discards the latter, since it never starts a listener).
pub async fn build_state(config: Arc<Config>) -> anyhow::Result<(AppState, PrometheusMetricLayer)> {
    let service_credential = std::env::var(&config.admin_plane.service_credential_env).unwrap_or_default();
    let config_client = Arc::new(ConfigClient::new(&config.admin_plane, service_credential));
    config_client.refresh().await;
    spawn_background_refresh(config_client.clone(), Duration::from_secs(config.admin_plane.poll_interval_secs));
    tracing::info!(base_url = %config.admin_plane.base_url, "admin-plane config client ready");

    let llm_api_key = std::env::var(&config.llm.api_key_env).unwrap_or_default();
    let llm_provider = Arc::new(OpenAiCompatProvider::new(
        "primary",
        config.llm.base_url.clone(),
        llm_api_key,
        config.llm.request_timeout_ms,
    )?);
    let mut provider_registry = ProviderRegistry::new();
    provider_registry.register(llm_provider, true);
    let tiers = TierConfig::from_map(&config.llm.tier_models);
    let llm = Arc::new(LlmClient::new(provider_registry, tiers.clone(), 512));
    tracing::info!(base_url = %config.llm.base_url, "LLM client ready");

    let mut adapters = AdapterRegistry::new();
    if !config.adapters.weather.base_url.is_empty() {
        let key = config_client.external_key("weather").await.map(|c| c.api_key);
        adapters.register(Arc::new(HttpDomainAdapter::new(
            "weather",
            config.adapters.weather.base_url.clone(),
            Duration::from_millis(config.adapters.weather.timeout_ms),
            key,
            weather_path,
            config.adapters.weather.breaker_threshold,
            Duration::from_secs(config.adapters.weather.breaker_window_secs),
            Duration::from_secs(config.adapters.weather.breaker_cooldown_secs),
        )?));
    }
    if !config.adapters.sports.base_url.is_empty() {
        let key = config_client.external_key("sports").await.map(|c| c.api_key);
        adapters.register(Arc::new(HttpDomainAdapter::new(
            "sports",
            config.adapters.sports.base_url.clone(),
            Duration::from_millis(config.adapters.sports.timeout_ms),
            key,
            sports_path,
            config.adapters.sports.breaker_threshold,
            Duration::from_secs(config.adapters.sports.breaker_window_secs),
            Duration::from_secs(config.adapters.sports.breaker_cooldown_secs),
        )?));
    }
    if !config.adapters.airports.base_url.is_empty() {
        let key = config_client.external_key("airports").await.map(|c| c.api_key);
        adapters.register(Arc::new(HttpDomainAdapter::new(
            "airports",
            config.adapters.airports.base_url.clone(),
            Duration::from_millis(config.adapters.airports.timeout_ms),
            key,
            airports_path,
            config.adapters.airports.breaker_threshold,
            Duration::from_secs(config.adapters.airports.breaker_window_secs),
            Duration::from_secs(config.adapters.airports.breaker_cooldown_secs),
        )?));
    }
    let adapters = Arc::new(adapters);
    tracing::info!(adapters = ?adapters.names(), "retrieval adapter registry ready");

    let mut search_providers: Vec<Arc<dyn SearchProvider>> = Vec::new();
    for (i, endpoint) in config.adapters.websearch_providers.iter().enumerate() {
        let name = format!("websearch-{i}");
        let key = config_client.external_key(&name).await.map(|c| c.api_key);
        search_providers.push(Arc::new(HttpSearchProvider::new(
            name,
            endpoint.base_url.clone(),
            key,
            1.0,
            Duration::from_millis(endpoint.timeout_ms),
            endpoint.breaker_threshold,
            Duration::from_secs(endpoint.breaker_window_secs),
            Duration::from_secs(endpoint.breaker_cooldown_secs),
        )?));
    }
    let search_provider_count = search_providers.len();
    let search_engine = Arc::new(ParallelSearchEngine::new(
        search_providers,
        Duration::from_millis(config.adapters.weather.timeout_ms.min(5_000)),
        Duration::from_millis(config.adapters.parallel_search_budget_ms),
    ));
    tracing::info!(providers = search_provider_count, "parallel search engine ready");

    let sessions = Arc::new(SessionStore::new(config.sessions.max_turns, config.sessions.idle_ttl_secs));
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(config.cache.ttl_secs), config.cache.sweep_threshold));
    let classifier = Arc::new(Classifier::new());
    let budgets = OrchestratorBudgets::from(&config.budgets);

    let orchestrator = Arc::new(Orchestrator::new(
        sessions,
        cache.clone(),
        classifier,
        llm.clone(),
        tiers,
        adapters.clone(),
        search_engine,
        config_client.clone(),
        budgets,
        config.sessions.default_context_turns,
    ));

    let (metrics_layer, metrics_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    Ok((AppState {
        config,
        orchestrator,
        llm,
        adapters,
        config_client,
        cache,
        metrics_handle,
        started_at: Instant::now(),
    },
    metrics_layer))
}
