pub mod client;
pub mod decisions;
pub mod openai_compat;
pub mod registry;
pub mod tiers;
pub mod traits;

pub use client::{GenerateOutput, LlmClient};
pub use decisions::{Decision, DecisionLog};
pub use openai_compat::OpenAiCompatProvider;
pub use registry::ProviderRegistry;
pub use tiers::{resolve_model_for_request, resolve_tier_model, select_synthesis_tier, ModelTier, RoutingDecision, TierConfig};
pub use traits::{ChatRequest, ChatResponse, LlmProvider};
