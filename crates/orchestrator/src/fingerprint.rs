//! Deterministic string fingerprints folded into the response-cache key
//! (spec §4.5), kept separate from `qo_cache` itself since both fields are
//! intent-shape-specific and belong to the orchestrator's view of a
//! request, not to the generic cache store.

use qo_domain::intent::Entities;
use qo_domain::request::normalize_query;
use qo_domain::session::Session;

pub fn entity_fingerprint(entities: &Entities) -> String {
    match entities {
        Entities::Weather(w) => format!(
            "location={}|timeframe={}|forecast={}",
            w.location.as_ref().map(|r| r.value.as_str()).unwrap_or(""),
            w.timeframe.as_ref().map(|r| r.value.as_str()).unwrap_or(""),
            w.forecast_flag
        ),
        Entities::Sports(s) => format!(
            "team={}|opponent={}|timeframe={}",
            s.team.as_ref().map(|r| r.value.as_str()).unwrap_or(""),
            s.opponent.as_ref().map(|r| r.value.as_str()).unwrap_or(""),
            s.timeframe.as_ref().map(|r| r.value.as_str()).unwrap_or("")
        ),
        Entities::Airports(a) => format!(
            "airport={}|timeframe={}",
            a.airport.as_ref().map(|r| r.value.as_str()).unwrap_or(""),
            a.timeframe.as_ref().map(|r| r.value.as_str()).unwrap_or("")
        ),
        Entities::GeneralInfo(g) => format!("topic={}", g.topic.as_deref().unwrap_or("")),
        Entities::None => String::new(),
    }
}

/// The fingerprint of the session's last assistant turn, or empty if none
/// exists yet — folded into the cache key so a hit never crosses a
/// conversational context that has moved on since the cached answer was
/// produced.
pub fn last_assistant_fingerprint(session: &Session) -> String {
    session
        .last_assistant_turn()
        .map(|t| normalize_query(&t.content))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qo_domain::intent::{Resolved, WeatherEntities};

    #[test]
    fn entity_fingerprint_is_stable_for_equal_entities() {
        let a = Entities::Weather(WeatherEntities {
            location: Some(Resolved::fresh("Baltimore".to_string())),
            timeframe: None,
            forecast_flag: false,
        });
        let b = Entities::Weather(WeatherEntities {
            location: Some(Resolved::fresh("Baltimore".to_string())),
            timeframe: None,
            forecast_flag: false,
        });
        assert_eq!(entity_fingerprint(&a), entity_fingerprint(&b));
    }

    #[test]
    fn empty_session_has_empty_last_assistant_fingerprint() {
        let session = Session::new("s1".to_string());
        assert_eq!(last_assistant_fingerprint(&session), "");
    }
}
