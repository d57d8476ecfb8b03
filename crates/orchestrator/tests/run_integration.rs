//! Integration tests for `Orchestrator::run` — full stage graph round-trip
//! against fake providers, no network calls. Mirrors the pure,
//! fully-in-process style of the router integration suite this crate's
//! stage graph descends from, adapted to exercise async stages instead of
//! a synchronous resolver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use qo_adapters::{AdapterRegistry, ParallelSearchEngine, SearchProvider, SearchResultItem};
use qo_cache::ResponseCache;
use qo_classifier::Classifier;
use qo_config_client::ConfigClient;
use qo_domain::config::AdminPlaneConfig;
use qo_domain::error::Result;
use qo_domain::intent::Intent;
use qo_domain::request::{Message, Request, RequestOptions};
use qo_llm::{ChatRequest, ChatResponse as ProviderChatResponse, LlmClient, LlmProvider, ProviderRegistry, TierConfig};
use qo_orchestrator::{Orchestrator, OrchestratorBudgets};
use qo_sessions::SessionStore;

struct FakeLlmProvider {
    calls: Arc<AtomicUsize>,
    reply: String,
}

#[async_trait::async_trait]
impl LlmProvider for FakeLlmProvider {
    async fn chat(&self, _req: ChatRequest) -> Result<ProviderChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProviderChatResponse {
            content: self.reply.clone(),
            model: "fake-model".to_string(),
            prompt_tokens: Some(10),
            completion_tokens: Some(20),
        })
    }

    fn provider_id(&self) -> &str {
        "fake"
    }
}

struct FakeSearchProvider;

#[async_trait::async_trait]
impl SearchProvider for FakeSearchProvider {
    async fn search(&self, _query: &str) -> Result<Vec<SearchResultItem>> {
        Ok(vec![SearchResultItem {
            url: "https://example.com/article".to_string(),
            title: "An informative article".to_string(),
            snippet: "General background information.".to_string(),
            score: 0.8,
        }])
    }

    fn name(&self) -> &str {
        "fake-search"
    }
}

fn test_orchestrator(reply: &str, calls: Arc<AtomicUsize>, with_search: bool) -> Orchestrator {
    let sessions = Arc::new(SessionStore::new(20, 3600));
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(60), 1000));
    let classifier = Arc::new(Classifier::new());

    let mut registry = ProviderRegistry::new();
    registry.register(
        Arc::new(FakeLlmProvider {
            calls,
            reply: reply.to_string(),
        }),
        true,
    );
    let tiers = TierConfig {
        small: vec!["fake-model".to_string()],
        medium: vec!["fake-model".to_string()],
        large: vec!["fake-model".to_string()],
    };
    let llm = Arc::new(LlmClient::new(registry, tiers.clone(), 100));

    let adapters = Arc::new(AdapterRegistry::new());
    let providers: Vec<Arc<dyn SearchProvider>> = if with_search {
        vec![Arc::new(FakeSearchProvider)]
    } else {
        vec![]
    };
    let search_engine = Arc::new(ParallelSearchEngine::new(
        providers,
        Duration::from_secs(5),
        Duration::from_secs(10),
    ));

    let config = Arc::new(ConfigClient::new(&AdminPlaneConfig::default(), "test-secret".to_string()));
    let budgets = OrchestratorBudgets {
        classify: Duration::from_millis(3_000),
        retrieve_rag: Duration::from_millis(10_000),
        retrieve_parallel_search: Duration::from_millis(15_000),
        synthesize: Duration::from_millis(20_000),
        validate: Duration::from_millis(2_000),
    };

    Orchestrator::new(
        sessions,
        cache,
        classifier,
        llm,
        tiers,
        adapters,
        search_engine,
        config,
        budgets,
        6,
    )
}

fn request(query: &str, session_id: Option<&str>) -> Request {
    Request {
        messages: vec![Message {
            role: "user".to_string(),
            content: query.to_string(),
        }],
        session_id: session_id.map(str::to_string),
        user_id: None,
        metadata: RequestOptions::default(),
    }
}

#[tokio::test]
async fn unrecognized_query_falls_back_to_general_info_and_still_answers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = test_orchestrator("I don't recognize that store.", calls.clone(), false);

    let response = orchestrator.run(request("asdkj qwoeiru zzxywv", None)).await;

    assert_eq!(response.intent, Intent::GeneralInfo);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn control_intent_is_always_degraded_and_fails_unsafe() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = test_orchestrator("unused", calls.clone(), false);

    let response = orchestrator.run(request("turn off the living room lights", None)).await;

    assert_eq!(response.intent, Intent::Control);
    assert!(!response.validated);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn general_info_without_search_providers_uses_llm_knowledge_only() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = test_orchestrator("The unicorn store opens at nine.", calls.clone(), false);

    let response = orchestrator
        .run(request("What time does the unicorn store open?", None))
        .await;

    assert_eq!(response.intent, Intent::GeneralInfo);
    assert!(response.sources.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn general_info_with_search_providers_retrieves_and_grounds_sources() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = test_orchestrator("Here is some background on the topic.", calls.clone(), true);

    let response = orchestrator
        .run(request("What time does the unicorn store open?", None))
        .await;

    assert_eq!(response.intent, Intent::GeneralInfo);
    assert_eq!(response.sources.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn response_cache_stays_disabled_until_the_control_plane_populates_the_flag() {
    // `ConfigClient` fails a wholly-uncached flag closed, never open — a
    // disabled flag must never block a request. With no admin-plane poll
    // ever run against it, `response_cache` reads as off, so every call
    // re-runs the full stage graph rather than serving a stale short-circuit.
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = test_orchestrator("i don't have further details on that topic right now.", calls.clone(), true);

    let first = orchestrator
        .run(request("What time does the unicorn store open?", Some("session-a")))
        .await;
    let second = orchestrator
        .run(request("What time does the unicorn store open?", Some("session-a")))
        .await;

    assert_ne!(first.id, second.id);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn finalize_appends_user_and_assistant_turns_to_the_session() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = test_orchestrator("Here is some background on the topic.", calls, true);

    let response = orchestrator
        .run(request("What time does the unicorn store open?", Some("session-b")))
        .await;

    let session = orchestrator
        .sessions()
        .get("session-b")
        .expect("session should exist after a run");
    assert_eq!(session.turns.len(), 2);
    assert_eq!(response.session_id, "session-b");
}
