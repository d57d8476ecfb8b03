//! Stage handlers (spec §4.1): classify, retrieve, synthesize, validate,
//! finalize, plus the turn-append side effect finalize performs. Each is a
//! method on [`Orchestrator`] so it can reach the shared collaborators;
//! none of them retain state across calls.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use qo_adapters::QueryParams;
use qo_domain::flags::names;
use qo_domain::intent::{Entities, Intent};
use qo_domain::request::{ChatChoice, ChatResponse, Message, RequestOptions, RequestState, Stage, Verdict};
use qo_domain::session::{Session, Turn, TurnRole};
use qo_domain::source::{Source, SourceKind};
use qo_domain::trace::TraceEvent;
use qo_llm::ModelTier;

use crate::route::{self, RouteTarget};
use crate::{prompt, Orchestrator};

fn parse_tier(raw: &str) -> Option<ModelTier> {
    match raw.to_ascii_lowercase().as_str() {
        "small" => Some(ModelTier::Small),
        "medium" => Some(ModelTier::Medium),
        "large" => Some(ModelTier::Large),
        _ => None,
    }
}

impl Orchestrator {
    pub(crate) async fn classify_stage(
        &self,
        state: &mut RequestState,
        raw_query: &str,
        session: &Session,
        options: &RequestOptions,
    ) {
        let correlation_id = state.correlation_id.to_string();
        let needs_context = self.config.flag(names::CONVERSATION_CONTEXT) && self.classifier.needs_context(raw_query);
        let context_limit = options
            .max_history_turns
            .map(|n| n as usize)
            .unwrap_or(self.default_context_turns);
        let history_owned: Vec<Turn> = if needs_context {
            session.recent(context_limit).into_iter().cloned().collect()
        } else {
            Vec::new()
        };
        let history_refs: Vec<&Turn> = history_owned.iter().collect();

        let llm_enabled = self.config.flag(names::ENABLE_LLM_INTENT_CLASSIFICATION);
        let result = if llm_enabled {
            self.classifier
                .classify(
                    &correlation_id,
                    raw_query,
                    &history_refs,
                    Some((self.llm.as_ref(), self.budgets.classify)),
                )
                .await
        } else {
            self.classifier.classify_pattern(&correlation_id, raw_query, &history_refs)
        };

        state.intent = Some(result.intent);
        state.confidence = result.confidence;
        state.entities = Some(result.entities);
        state.stage = Stage::Classified;
    }

    pub(crate) async fn retrieve_stage(&self, state: &mut RequestState, target: RouteTarget) {
        match target {
            RouteTarget::SingleAdapter(routing) => {
                let demote = match self.adapters.get(&routing.adapter_name) {
                    None => {
                        state
                            .errors
                            .push(format!("no adapter registered for '{}'", routing.adapter_name));
                        true
                    }
                    Some(adapter) => {
                        let params = QueryParams {
                            query: state.normalized_query.clone(),
                            entities: state.entities.clone().unwrap_or(Entities::None),
                        };
                        let budget = Duration::from_millis(routing.timeout_ms.max(1));
                        match tokio::time::timeout(budget, adapter.query(&params)).await {
                            Ok(Ok(source)) => {
                                state.sources.push(source);
                                false
                            }
                            Ok(Err(e)) => {
                                state.errors.push(format!("adapter '{}' failed: {e}", routing.adapter_name));
                                true
                            }
                            Err(_) => {
                                state
                                    .errors
                                    .push(format!("adapter '{}' timed out after {}ms", routing.adapter_name, routing.timeout_ms));
                                true
                            }
                        }
                    }
                };
                if demote {
                    TraceEvent::RouteFallback {
                        correlation_id: state.correlation_id.to_string(),
                        from_intent: routing.intent.as_str().to_string(),
                        to_intent: Intent::GeneralInfo.as_str().to_string(),
                        reason: "adapter unavailable".to_string(),
                    }
                    .emit();
                    let demoted = route::route_decision(&self.config, self.search_engine.has_providers(), Intent::GeneralInfo);
                    self.retrieve_general_info(state, demoted).await;
                }
            }
            other => self.retrieve_general_info(state, other).await,
        }
        state.stage = Stage::Retrieved;
    }

    /// Handles the two terminal `general_info` routes. Never re-enters
    /// `retrieve_stage`, so a demoted single-adapter route (which always
    /// demotes into one of these two variants) cannot recurse further.
    async fn retrieve_general_info(&self, state: &mut RequestState, target: RouteTarget) {
        if let RouteTarget::ParallelSearch = target {
            let fused = self
                .search_engine
                .search(&state.correlation_id.to_string(), &state.normalized_query)
                .await;
            for item in fused.items {
                state.sources.push(Source {
                    provider: item.providers.join(","),
                    kind: SourceKind::Websearch,
                    payload: serde_json::json!({
                        "url": item.url,
                        "title": item.title,
                        "snippet": item.snippet,
                        "score": item.score,
                    }),
                    fetched_at: Utc::now(),
                    latency_ms: 0,
                });
            }
        }
    }

    pub(crate) async fn synthesize_stage(
        &self,
        state: &mut RequestState,
        raw_query: &str,
        session: &Session,
        options: &RequestOptions,
    ) -> Option<String> {
        let intent = state.intent.unwrap_or(Intent::GeneralInfo);
        let intent_is_simple = matches!(intent, Intent::Weather | Intent::Sports | Intent::Airports);
        let synthesizer_tier =
            qo_llm::select_synthesis_tier(intent_is_simple, state.confidence, state.normalized_query.chars().count());
        let requested_tier = options.model_tier.as_deref().and_then(parse_tier);
        let decision = qo_llm::resolve_model_for_request(requested_tier, synthesizer_tier, &self.tiers);

        let context_on = self.config.flag(names::CONVERSATION_CONTEXT);
        let history_owned: Vec<Turn> = if context_on {
            let limit = options
                .max_history_turns
                .map(|n| n as usize)
                .unwrap_or(self.default_context_turns);
            session.recent(limit).into_iter().cloned().collect()
        } else {
            Vec::new()
        };
        let history_refs: Vec<&Turn> = history_owned.iter().collect();

        let system = prompt::build_system_prompt();
        let user_prompt = prompt::build_prompt(raw_query, &history_refs, &state.sources);

        match self
            .llm
            .generate(
                &state.correlation_id.to_string(),
                Some(system),
                &user_prompt,
                decision.tier,
                self.budgets.synthesize,
                false,
            )
            .await
        {
            Ok(output) => {
                state.candidate_answer = Some(output.text);
                state.stage = Stage::Synthesized;
                Some(output.model_id)
            }
            Err(e) => {
                state.candidate_answer =
                    Some("I wasn't able to finish putting together an answer in time.".to_string());
                state.mark_degraded(format!("synthesis failed: {e}"));
                state.stage = Stage::Synthesized;
                None
            }
        }
    }

    pub(crate) fn validate_stage(&self, state: &mut RequestState, raw_query: &str) {
        let intent = state.intent.unwrap_or(Intent::GeneralInfo);
        let entities = state.entities.clone().unwrap_or_else(|| Entities::empty_for(intent));
        let candidate = state.candidate_answer.clone().unwrap_or_default();
        let result = qo_validator::validate(&candidate, intent, &entities, &state.sources);

        TraceEvent::ValidationVerdict {
            correlation_id: state.correlation_id.to_string(),
            verdict: format!("{:?}", result.verdict),
            reason: result.reason.clone(),
        }
        .emit();

        let verdict = match result.verdict {
            qo_validator::Verdict::Pass => Verdict::Pass,
            qo_validator::Verdict::FailUnsupported => Verdict::FailUnsupported,
            qo_validator::Verdict::FailUnsafe => Verdict::FailUnsafe,
        };
        state.verdict = Some(verdict);
        if !verdict.passed() {
            state.candidate_answer = Some(prompt::uncertainty_message(raw_query, &state.sources, &result.reason));
            state.degraded = true;
        }
        state.stage = Stage::Validated;
    }

    pub(crate) fn finalize_stage(
        &self,
        state: &mut RequestState,
        session_id: &str,
        raw_query: &str,
        cache_key: Option<&str>,
        model_used: Option<String>,
    ) -> ChatResponse {
        let validated = state.verdict.map(|v| v.passed()).unwrap_or(false);
        let content = state
            .candidate_answer
            .clone()
            .unwrap_or_else(|| "I don't have an answer for that right now.".to_string());

        let response = ChatResponse {
            id: format!("chatcmpl-{}", state.correlation_id),
            choices: vec![ChatChoice {
                message: Message {
                    role: "assistant".to_string(),
                    content,
                },
            }],
            session_id: session_id.to_string(),
            sources: state.sources.clone(),
            intent: state.intent.unwrap_or(Intent::Unknown),
            confidence: state.confidence,
            validated,
            model_used,
            timings: state.timings.clone(),
        };

        self.append_turns(session_id, raw_query, &response, state);

        if let (Some(key), Some(verdict)) = (cache_key, state.verdict) {
            if validated {
                self.cache
                    .insert(key.to_string(), Arc::new(response.clone()), verdict, state.sources.clone());
            }
        }

        state.stage = Stage::Finalized;
        TraceEvent::StageCompleted {
            correlation_id: state.correlation_id.to_string(),
            stage: "finalize".to_string(),
            duration_ms: state.timings.total_ms,
            outcome: if state.degraded { "degraded" } else { "ok" }.to_string(),
        }
        .emit();

        response
    }

    pub(crate) fn append_turns(&self, session_id: &str, raw_query: &str, response: &ChatResponse, state: &RequestState) {
        let user_turn = Turn {
            role: TurnRole::User,
            content: raw_query.to_string(),
            timestamp: Utc::now(),
            intent: state.intent,
            entities: state.entities.clone(),
            source_tags: Vec::new(),
        };
        self.sessions.append_turn(session_id, user_turn);

        let assistant_content = response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();
        let source_tags = response.sources.iter().map(|s| s.provider.clone()).collect();
        let assistant_turn = Turn {
            role: TurnRole::Assistant,
            content: assistant_content,
            timestamp: Utc::now(),
            intent: None,
            entities: None,
            source_tags,
        };
        self.sessions.append_turn(session_id, assistant_turn);
    }
}
