//! Optional LLM-backed classification path. Calls the small tier with a
//! context-aware prompt and parses a `{category, confidence, entities}`
//! JSON reply; on parse failure the caller falls through to the pattern
//! classifier and records a warning (spec §4.1).

use serde::Deserialize;

use qo_domain::error::{Error, Result};
use qo_domain::intent::Intent;
use qo_domain::session::Turn;
use qo_domain::trace::TraceEvent;
use qo_llm::{LlmClient, ModelTier};

#[derive(Debug, Deserialize)]
struct LlmClassification {
    category: String,
    confidence: f32,
}

pub struct LlmClassifyResult {
    pub intent: Intent,
    pub confidence: f32,
}

pub fn build_prompt(query: &str, history: &[&Turn]) -> String {
    let mut prompt = String::from(
        "Classify the user's query into one of: control, weather, sports, airports, general_info, unknown.\n\
         Respond with JSON only: {\"category\": \"...\", \"confidence\": 0.0-1.0}.\n",
    );
    if !history.is_empty() {
        prompt.push_str("Recent conversation:\n");
        for turn in history {
            prompt.push_str(&format!("{:?}: {}\n", turn.role, turn.content));
        }
    }
    prompt.push_str(&format!("Query: {query}\n"));
    prompt
}

pub async fn classify_via_llm(
    client: &LlmClient,
    correlation_id: &str,
    query: &str,
    history: &[&Turn],
    budget: std::time::Duration,
) -> Result<LlmClassifyResult> {
    let prompt = build_prompt(query, history);
    let output = client
        .generate(
            correlation_id,
            Some("You are an intent classifier for a query-answering assistant."),
            &prompt,
            ModelTier::Small,
            budget,
            true,
        )
        .await?;

    let parsed: LlmClassification = serde_json::from_str(output.text.trim()).map_err(|e| {
        let err = Error::ParseError {
            source: "classifier_llm".to_string(),
            message: e.to_string(),
        };
        TraceEvent::ClassifierLlmParseFailed {
            correlation_id: correlation_id.to_string(),
            reason: err.to_string(),
        }
        .emit();
        err
    })?;

    Ok(LlmClassifyResult {
        intent: Intent::normalize(&parsed.category),
        confidence: parsed.confidence.clamp(0.0, 1.0),
    })
}
