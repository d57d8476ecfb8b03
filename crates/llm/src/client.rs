use std::time::Duration;

use qo_domain::error::{Error, Result};
use qo_domain::trace::TraceEvent;
use rand::Rng;

use crate::decisions::{Decision, DecisionLog};
use crate::registry::ProviderRegistry;
use crate::tiers::{resolve_tier_model, ModelTier, TierConfig};
use crate::traits::ChatRequest;

/// The output of a single `generate` call.
#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub text: String,
    pub tokens_used: Option<u32>,
    pub latency_ms: u64,
    pub model_id: String,
}

/// Tier-selecting wrapper over a registered LLM backend. Exposes
/// `generate(prompt, tier, budget)`; retries once with jitter on backend
/// error, and returns a typed timeout error on budget exhaustion. Emits a
/// telemetry record per call regardless of outcome.
pub struct LlmClient {
    registry: ProviderRegistry,
    tiers: TierConfig,
    decisions: DecisionLog,
}

impl LlmClient {
    pub fn new(registry: ProviderRegistry, tiers: TierConfig, decision_log_capacity: usize) -> Self {
        Self {
            registry,
            tiers,
            decisions: DecisionLog::new(decision_log_capacity),
        }
    }

    pub fn decisions(&self) -> &DecisionLog {
        &self.decisions
    }

    pub async fn generate(
        &self,
        correlation_id: &str,
        system: Option<&str>,
        prompt: &str,
        tier: ModelTier,
        budget: Duration,
        json_mode: bool,
    ) -> Result<GenerateOutput> {
        let model = resolve_tier_model(tier, &self.tiers)
            .ok_or_else(|| Error::Internal(format!("no model configured for tier {}", tier.as_str())))?
            .to_string();
        let provider = self.registry.default_provider()?;

        let req = ChatRequest {
            system: system.map(|s| s.to_string()),
            messages: vec![("user".to_string(), prompt.to_string())],
            model: model.clone(),
            temperature: None,
            max_tokens: None,
            json_mode,
        };

        let started = std::time::Instant::now();
        let outcome = tokio::time::timeout(budget, async {
            match provider.chat(req.clone()).await {
                Ok(resp) => Ok(resp),
                Err(first_err) => {
                    TraceEvent::LlmRetry {
                        correlation_id: correlation_id.to_string(),
                        provider: provider.provider_id().to_string(),
                        attempt: 1,
                        reason: first_err.to_string(),
                    }
                    .emit();
                    let jitter_ms = rand::thread_rng().gen_range(50..250);
                    tokio::time::sleep(Duration::from_millis(jitter_ms)).await;
                    provider.chat(req).await
                }
            }
        })
        .await;

        let latency_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Err(_) => Err(Error::BudgetExceeded {
                stage: "llm_generate".to_string(),
                elapsed_ms: latency_ms,
                budget_ms: budget.as_millis() as u64,
            }),
            Ok(Err(e)) => Err(e),
            Ok(Ok(resp)) => Ok(GenerateOutput {
                text: resp.content,
                tokens_used: resp.completion_tokens,
                latency_ms,
                model_id: resp.model,
            }),
        };

        TraceEvent::LlmRequest {
            correlation_id: correlation_id.to_string(),
            provider: provider.provider_id().to_string(),
            model: model.clone(),
            tier: tier.as_str().to_string(),
            duration_ms: latency_ms,
            prompt_tokens: None,
            completion_tokens: result.as_ref().ok().and_then(|o| o.tokens_used),
        }
        .emit();

        self.decisions.record(Decision {
            timestamp: chrono::Utc::now(),
            correlation_id: correlation_id.to_string(),
            tier: tier.into(),
            model,
            latency_ms,
        });

        result
    }
}
