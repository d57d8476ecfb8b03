//! Prompt assembly for the synthesize stage, and the fixed uncertainty
//! template the validate stage rewrites a failed answer into.

use qo_domain::session::{Turn, TurnRole};
use qo_domain::source::{Source, SourceKind};

fn kind_label(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Rag => "rag",
        SourceKind::Websearch => "websearch",
        SourceKind::LlmKnowledge => "llm_knowledge",
    }
}

pub fn build_system_prompt() -> &'static str {
    "You are a conversational assistant that answers questions about weather, \
     sports, airports, and general topics. Ground your answer in the provided \
     sources when they are present; if no sources are given, answer from your \
     own knowledge and say so plainly. Keep answers concise and direct."
}

pub fn build_prompt(query: &str, history: &[&Turn], sources: &[Source]) -> String {
    let mut prompt = String::new();

    if !history.is_empty() {
        prompt.push_str("Recent conversation:\n");
        for turn in history {
            let role = match turn.role {
                TurnRole::User => "User",
                TurnRole::Assistant => "Assistant",
            };
            prompt.push_str(&format!("{role}: {}\n", turn.content));
        }
        prompt.push('\n');
    }

    if sources.is_empty() {
        prompt.push_str("No retrieved sources are available for this query.\n\n");
    } else {
        prompt.push_str("Retrieved sources:\n");
        for (i, source) in sources.iter().enumerate() {
            prompt.push_str(&format!(
                "[{}] ({}, {}): {}\n",
                i + 1,
                source.provider,
                kind_label(source.kind),
                source.payload
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("User query: {query}\n"));
    prompt
}

/// The fixed uncertainty message the validator rewrites a failed candidate
/// into. Acknowledges the query, lists what was consulted, and suggests an
/// authoritative source — never re-synthesizes.
pub fn uncertainty_message(query: &str, sources: &[Source], reason: &str) -> String {
    let consulted = if sources.is_empty() {
        "no external sources".to_string()
    } else {
        let providers: Vec<&str> = sources.iter().map(|s| s.provider.as_str()).collect();
        format!("the following sources: {}", providers.join(", "))
    };

    format!(
        "I can't confidently answer \"{query}\" right now ({reason}). I checked {consulted}. \
         For an authoritative answer, please check a dedicated source for this topic."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_prompt_includes_query_and_no_sources_note() {
        let prompt = build_prompt("what's the weather", &[], &[]);
        assert!(prompt.contains("what's the weather"));
        assert!(prompt.contains("No retrieved sources"));
    }

    #[test]
    fn uncertainty_message_names_consulted_sources() {
        let source = Source {
            provider: "weather".to_string(),
            kind: qo_domain::source::SourceKind::Rag,
            payload: serde_json::json!({}),
            fetched_at: chrono::Utc::now(),
            latency_ms: 5,
        };
        let message = uncertainty_message("weather in Baltimore", &[source], "no grounded sources");
        assert!(message.contains("weather"));
        assert!(message.contains("Baltimore"));
    }
}
