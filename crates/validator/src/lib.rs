//! Pure, synchronous grounding check of a candidate answer against its
//! retrieved evidence. No I/O; must run in under a few milliseconds
//! (spec §4.6) — modeled on the teacher's style of exhaustively
//! unit-tested pure decision functions for anything that can be pure.

pub mod normalize;

use regex::Regex;

use qo_domain::intent::{Entities, Intent};
use qo_domain::source::{Source, SourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    FailUnsupported,
    FailUnsafe,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub verdict: Verdict,
    pub reason: String,
}

/// Claims: numbers, proper nouns, dates, prices. A simple regex sweep
/// suffices here — the validator only needs to know a specific claim is
/// *present*, not to parse it structurally.
fn contains_specific_claim(text: &str) -> bool {
    let number_or_price = Regex::new(r"\$?\b\d[\d,]*(\.\d+)?%?\b").unwrap();
    let proper_noun = Regex::new(r"\b[A-Z][a-z]{2,}\b").unwrap();
    number_or_price.is_match(text) || proper_noun.is_match(text)
}

/// Extract the named-entity-ish tokens worth checking against sources:
/// capitalized words and number sequences in the candidate text.
fn claim_tokens(text: &str) -> Vec<String> {
    let token_re = Regex::new(r"[A-Za-z][A-Za-z'-]{2,}|\d[\d,.]*").unwrap();
    token_re
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn source_text(sources: &[Source]) -> String {
    sources
        .iter()
        .map(|s| s.payload.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pure validation function: `(candidate_text, intent, entities, sources)
/// -> {verdict, reason}`.
pub fn validate(candidate_text: &str, intent: Intent, entities: &Entities, sources: &[Source]) -> ValidationResult {
    // fail-unsafe is reserved for control-intent queries that leaked into
    // an info-answering path; always triggers degraded finalize.
    if intent == Intent::Control {
        return ValidationResult {
            verdict: Verdict::FailUnsafe,
            reason: "control intent must not be answered by the info path".to_string(),
        };
    }

    let has_claim = contains_specific_claim(candidate_text);
    let no_grounded_sources = sources.is_empty() || sources.iter().all(|s| s.kind == SourceKind::LlmKnowledge);

    if has_claim && no_grounded_sources {
        return ValidationResult {
            verdict: Verdict::FailUnsupported,
            reason: "candidate contains specific claims but no grounded sources were retrieved".to_string(),
        };
    }

    if has_claim {
        let haystack = source_text(sources);
        let entity_values = entity_claim_values(entities);
        let candidate_tokens = claim_tokens(candidate_text);

        // Prefer checking the specific entities the classifier extracted;
        // fall back to scanning every capitalized/number token in the
        // candidate when no entity values were resolved at all.
        let tokens_to_check: Vec<&str> = if entity_values.is_empty() {
            candidate_tokens.iter().map(|s| s.as_str()).collect()
        } else {
            entity_values.iter().map(|s| s.as_str()).collect()
        };

        let any_unsupported = tokens_to_check
            .iter()
            .any(|token| !normalize::loose_contains(&haystack, token));

        if any_unsupported && !tokens_to_check.is_empty() {
            return ValidationResult {
                verdict: Verdict::FailUnsupported,
                reason: "a named-entity claim has no matching token in any retrieved source".to_string(),
            };
        }
    }

    ValidationResult {
        verdict: Verdict::Pass,
        reason: "claims are supported by retrieved sources, or no specific claims were made".to_string(),
    }
}

fn entity_claim_values(entities: &Entities) -> Vec<String> {
    match entities {
        Entities::Weather(w) => w.location.as_ref().map(|r| r.value.clone()).into_iter().collect(),
        Entities::Sports(s) => s.team.as_ref().map(|r| r.value.clone()).into_iter().collect(),
        Entities::Airports(a) => a.airport.as_ref().map(|r| r.value.clone()).into_iter().collect(),
        Entities::GeneralInfo(_) | Entities::None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qo_domain::intent::{Resolved, WeatherEntities};
    use serde_json::json;

    fn rag_source(provider: &str, payload: serde_json::Value) -> Source {
        Source {
            provider: provider.to_string(),
            kind: SourceKind::Rag,
            payload,
            fetched_at: chrono::Utc::now(),
            latency_ms: 10,
        }
    }

    #[test]
    fn control_intent_is_always_fail_unsafe() {
        let result = validate("turning off the lights now", Intent::Control, &Entities::None, &[]);
        assert_eq!(result.verdict, Verdict::FailUnsafe);
    }

    #[test]
    fn specific_claim_with_no_sources_fails_unsupported() {
        let result = validate(
            "Baltimore is currently 72 degrees.",
            Intent::Weather,
            &Entities::Weather(WeatherEntities::default()),
            &[],
        );
        assert_eq!(result.verdict, Verdict::FailUnsupported);
    }

    #[test]
    fn grounded_claim_passes() {
        let entities = Entities::Weather(WeatherEntities {
            location: Some(Resolved::fresh("Baltimore".to_string())),
            timeframe: None,
            forecast_flag: false,
        });
        let sources = vec![rag_source("weather", json!({"location": "Baltimore, MD", "temp_f": 72}))];
        let result = validate("Baltimore is currently 72 degrees.", Intent::Weather, &entities, &sources);
        assert_eq!(result.verdict, Verdict::Pass);
    }

    #[test]
    fn claim_not_present_in_sources_fails_unsupported() {
        let entities = Entities::Sports(qo_domain::intent::SportsEntities {
            team: Some(Resolved::fresh("Packers".to_string())),
            opponent: None,
            timeframe: None,
        });
        let sources = vec![rag_source("sports", json!({"team": "Giants", "opponent": "Eagles"}))];
        let result = validate("The Packers play this week.", Intent::Sports, &entities, &sources);
        assert_eq!(result.verdict, Verdict::FailUnsupported);
    }

    #[test]
    fn no_specific_claims_passes_without_sources() {
        let result = validate(
            "I don't have specific details on that right now.",
            Intent::GeneralInfo,
            &Entities::GeneralInfo(Default::default()),
            &[],
        );
        assert_eq!(result.verdict, Verdict::Pass);
    }
}
