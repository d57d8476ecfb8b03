//! Coreference detection and resolution against prior session turns.

use qo_domain::intent::{Entities, Intent};
use qo_domain::session::Turn;
use qo_domain::trace::TraceEvent;

/// Referring expressions that trigger a context fetch when
/// `conversation_context` is enabled (spec §4.1).
const REFERRING_WORDS: &[&str] = &[
    "they", "them", "their", "it", "that", "those", "this", "tomorrow", "next", "last",
];

pub fn contains_referring_expression(query: &str) -> bool {
    let lower = query.to_lowercase();
    REFERRING_WORDS
        .iter()
        .any(|w| lower.split(|c: char| !c.is_alphanumeric()).any(|tok| tok == *w))
}

/// Scan turns most-recent-first for one whose recognized entity kind
/// matches `expected_kind`. Returns the matching turn's intent and
/// entities, used to resolve the current query's missing entity.
pub fn resolve_from_history<'a>(
    history: &'a [&'a Turn],
    expected_kind: &str,
) -> Option<(&'a Turn, &'a Entities)> {
    if expected_kind.is_empty() {
        return None;
    }
    history.iter().rev().find_map(|turn| {
        let entities = turn.entities.as_ref()?;
        let matches = match (expected_kind, entities) {
            ("location", Entities::Weather(w)) => w.location.is_some(),
            ("team", Entities::Sports(s)) => s.team.is_some(),
            ("airport", Entities::Airports(a)) => a.airport.is_some(),
            _ => false,
        };
        matches.then_some((*turn, entities))
    })
}

/// When the current intent is `Unknown` at extraction time, promote it to
/// the intent of the most recent matching turn. Must be explicit and
/// recorded in telemetry (spec §4.2).
pub fn maybe_promote_unknown(
    correlation_id: &str,
    current: Intent,
    history: &[&Turn],
) -> Intent {
    if current != Intent::Unknown {
        return current;
    }
    if let Some(last) = history.iter().rev().find(|t| t.intent.is_some()) {
        let promoted = last.intent.unwrap();
        TraceEvent::IntentPromoted {
            correlation_id: correlation_id.to_string(),
            from: current.to_string(),
            to: promoted.to_string(),
        }
        .emit();
        return promoted;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use qo_domain::intent::{Resolved, SportsEntities};
    use qo_domain::session::TurnRole;

    fn sports_turn(team: &str) -> Turn {
        Turn {
            role: TurnRole::User,
            content: "who do the giants play".into(),
            timestamp: Utc::now(),
            intent: Some(Intent::Sports),
            entities: Some(Entities::Sports(SportsEntities {
                team: Some(Resolved::fresh(team.to_string())),
                opponent: None,
                timeframe: None,
            })),
            source_tags: vec![],
        }
    }

    #[test]
    fn detects_referring_pronoun() {
        assert!(contains_referring_expression("Who do they play next week?"));
        assert!(!contains_referring_expression("Who do the Giants play?"));
    }

    #[test]
    fn resolves_team_from_history() {
        let turn = sports_turn("New York Giants");
        let history = vec![&turn];
        let (matched_turn, entities) = resolve_from_history(&history, "team").unwrap();
        assert_eq!(matched_turn.intent, Some(Intent::Sports));
        match entities {
            Entities::Sports(s) => assert_eq!(s.team.as_ref().unwrap().value, "New York Giants"),
            _ => panic!("expected sports entities"),
        }
    }

    #[test]
    fn no_match_returns_none() {
        let turn = sports_turn("New York Giants");
        let history = vec![&turn];
        assert!(resolve_from_history(&history, "location").is_none());
    }
}
