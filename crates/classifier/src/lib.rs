pub mod coref;
pub mod entities;
pub mod llm_path;
pub mod pattern;

use std::time::Duration;

use qo_domain::intent::{Entities, Intent};
use qo_domain::session::Turn;
use qo_llm::LlmClient;

use pattern::PatternClassifier;

/// The result of classifying one query: intent, confidence, and resolved
/// entities. Deterministic for a given (query, history) input when the
/// LLM path is disabled; the LLM path has no determinism guarantee.
#[derive(Debug, Clone)]
pub struct ClassifyResult {
    pub intent: Intent,
    pub confidence: f32,
    pub entities: Entities,
}

pub struct Classifier {
    pattern: PatternClassifier,
}

impl Classifier {
    pub fn new() -> Self {
        Classifier {
            pattern: PatternClassifier::new(),
        }
    }

    /// Whether `query` contains a referring expression that warrants
    /// fetching session history before classifying (spec §4.1).
    pub fn needs_context(&self, query: &str) -> bool {
        coref::contains_referring_expression(query)
    }

    /// Pattern-only classification path: deterministic, no I/O.
    pub fn classify_pattern(
        &self,
        correlation_id: &str,
        query: &str,
        history: &[&Turn],
    ) -> ClassifyResult {
        let matched_intent = self.pattern.classify(query);
        let confidence = if matched_intent == Intent::GeneralInfo && !query_looks_informational(query) {
            0.4
        } else {
            0.9
        };

        let promoted = coref::maybe_promote_unknown(correlation_id, matched_intent, history);
        let mut entities = entities::extract(promoted, query);
        resolve_missing_entity(&mut entities, promoted, history);

        ClassifyResult {
            intent: promoted,
            confidence,
            entities,
        }
    }

    /// Full classify pipeline: LLM path when enabled and a client is
    /// supplied, falling through to the pattern path on any failure.
    pub async fn classify(
        &self,
        correlation_id: &str,
        query: &str,
        history: &[&Turn],
        llm: Option<(&LlmClient, Duration)>,
    ) -> ClassifyResult {
        if let Some((client, budget)) = llm {
            match llm_path::classify_via_llm(client, correlation_id, query, history, budget).await {
                Ok(result) => {
                    let promoted = coref::maybe_promote_unknown(correlation_id, result.intent, history);
                    let mut entities = entities::extract(promoted, query);
                    resolve_missing_entity(&mut entities, promoted, history);
                    return ClassifyResult {
                        intent: promoted,
                        confidence: result.confidence,
                        entities,
                    };
                }
                Err(_) => {
                    // Parse/backend failure already traced by classify_via_llm.
                    return self.classify_pattern(correlation_id, query, history);
                }
            }
        }
        self.classify_pattern(correlation_id, query, history)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn query_looks_informational(query: &str) -> bool {
    query.trim_end_matches(['?', '.', '!']).split_whitespace().count() > 2
}

fn resolve_missing_entity(entities: &mut Entities, intent: Intent, history: &[&Turn]) {
    let expected_kind = Entities::expected_kind(intent);
    if expected_kind.is_empty() {
        return;
    }
    let already_present = match entities {
        Entities::Weather(w) => w.location.is_some(),
        Entities::Sports(s) => s.team.is_some(),
        Entities::Airports(a) => a.airport.is_some(),
        _ => true,
    };
    if already_present {
        return;
    }
    let Some((_, resolved)) = coref::resolve_from_history(history, expected_kind) else {
        return;
    };
    match (entities, resolved) {
        (Entities::Weather(w), Entities::Weather(prior)) => {
            w.location = prior
                .location
                .as_ref()
                .map(|r| qo_domain::intent::Resolved::from_context(r.value.clone()));
        }
        (Entities::Sports(s), Entities::Sports(prior)) => {
            s.team = prior
                .team
                .as_ref()
                .map(|r| qo_domain::intent::Resolved::from_context(r.value.clone()));
        }
        (Entities::Airports(a), Entities::Airports(prior)) => {
            a.airport = prior
                .airport
                .as_ref()
                .map(|r| qo_domain::intent::Resolved::from_context(r.value.clone()));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use qo_domain::intent::{Resolved, SportsEntities, Timeframe};
    use qo_domain::session::TurnRole;

    fn sports_history_turn() -> Turn {
        Turn {
            role: TurnRole::User,
            content: "who do the giants play".into(),
            timestamp: Utc::now(),
            intent: Some(Intent::Sports),
            entities: Some(Entities::Sports(SportsEntities {
                team: Some(Resolved::fresh("New York Giants".to_string())),
                opponent: None,
                timeframe: Some(Resolved::fresh(Timeframe::ThisWeek)),
            })),
            source_tags: vec![],
        }
    }

    #[test]
    fn pattern_path_is_deterministic() {
        let c = Classifier::new();
        let a = c.classify_pattern("c1", "What's the weather in Baltimore?", &[]);
        let b = c.classify_pattern("c1", "What's the weather in Baltimore?", &[]);
        assert_eq!(a.intent, b.intent);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn coreference_follow_up_resolves_team_from_context() {
        let c = Classifier::new();
        let turn = sports_history_turn();
        let history = vec![&turn];
        let result = c.classify_pattern("c1", "Who do they play next week?", &history);
        assert_eq!(result.intent, Intent::Sports);
        match result.entities {
            Entities::Sports(s) => {
                let team = s.team.expect("team resolved");
                assert_eq!(team.value, "New York Giants");
                assert!(team.resolved_from_context);
            }
            _ => panic!("expected sports entities"),
        }
    }
}
