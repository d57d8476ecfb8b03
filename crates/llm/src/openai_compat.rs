//! Adapter for any OpenAI-compatible chat-completions endpoint.

use qo_domain::error::{Error, Result};
use serde_json::Value;

use crate::traits::{ChatRequest, ChatResponse, LlmProvider};

pub struct OpenAiCompatProvider {
    id: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(id: impl Into<String>, base_url: impl Into<String>, api_key: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            id: id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn build_body(&self, req: &ChatRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &req.system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        for (role, content) in &req.messages {
            messages.push(serde_json::json!({"role": role, "content": content}));
        }

        let mut body = serde_json::json!({
            "model": req.model,
            "messages": messages,
        });
        if let Some(temp) = req.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if req.json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }
        body
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(&req);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable {
                upstream: self.id.clone(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(Error::UpstreamUnavailable {
                upstream: self.id.clone(),
                message: format!("status {}", resp.status()),
            });
        }

        let payload: Value = resp.json().await.map_err(|e| Error::ParseError {
            source: self.id.clone(),
            message: e.to_string(),
        })?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| Error::ParseError {
                source: self.id.clone(),
                message: "missing choices[0].message.content".to_string(),
            })?
            .to_string();

        let model = payload["model"]
            .as_str()
            .unwrap_or(&req.model)
            .to_string();
        let prompt_tokens = payload["usage"]["prompt_tokens"].as_u64().map(|v| v as u32);
        let completion_tokens = payload["usage"]["completion_tokens"].as_u64().map(|v| v as u32);

        Ok(ChatResponse {
            content,
            model,
            prompt_tokens,
            completion_tokens,
        })
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}
