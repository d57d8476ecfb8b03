use std::collections::HashMap;
use std::sync::Arc;

use qo_domain::error::{Error, Result};

use crate::traits::LlmProvider;

/// Named pool of LLM backend adapters. A deployment typically registers
/// exactly one provider, but the registry supports more since the
/// workspace carries adapters for several OpenAI-compatible backends.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    default_provider: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn LlmProvider>, make_default: bool) {
        let id = provider.provider_id().to_string();
        if make_default || self.default_provider.is_none() {
            self.default_provider = Some(id.clone());
        }
        self.providers.insert(id, provider);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers.get(id).cloned()
    }

    pub fn default_provider(&self) -> Result<Arc<dyn LlmProvider>> {
        self.default_provider
            .as_ref()
            .and_then(|id| self.providers.get(id))
            .cloned()
            .ok_or_else(|| Error::Internal("no LLM provider registered".to_string()))
    }
}
