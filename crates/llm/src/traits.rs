//! Provider-facing request/response shapes and the adapter trait every LLM
//! backend implements. Trimmed from a richer tool-calling/streaming/
//! embeddings surface down to the single-shot generation this system needs.

use qo_domain::error::Result;

/// A single-shot chat completion request sent to one backend.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub messages: Vec<(String, String)>,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub json_mode: bool,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

/// Trait every LLM backend adapter implements. Implementations are thin
/// HTTP clients translating to/from one provider's wire format.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse>;

    /// A unique identifier for this provider instance, e.g. `"openai"`.
    fn provider_id(&self) -> &str;
}
