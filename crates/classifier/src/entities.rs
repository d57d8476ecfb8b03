//! Intent-specific entity extraction on the original (non-lowercased,
//! non-trimmed) query text, plus timeframe/forecast-flag detection shared
//! across intents.

use regex::Regex;

use qo_domain::intent::{
    AirportEntities, Entities, GeneralInfoEntities, Intent, Resolved, SportsEntities, Timeframe,
    WeatherEntities,
};

fn extract_timeframe(query: &str) -> Option<Timeframe> {
    let lower = query.to_lowercase();
    let checks: &[(&str, Timeframe)] = &[
        ("tonight", Timeframe::Tonight),
        ("tomorrow", Timeframe::Tomorrow),
        ("next week", Timeframe::NextWeek),
        ("weekend", Timeframe::Weekend),
        ("this week", Timeframe::ThisWeek),
        ("next month", Timeframe::NextMonth),
        ("this month", Timeframe::ThisMonth),
        ("today", Timeframe::Today),
    ];
    checks
        .iter()
        .find(|(token, _)| lower.contains(token))
        .map(|(_, tf)| *tf)
}

fn extract_location(query: &str) -> Option<String> {
    let re = Regex::new(r"(?i)\bin\s+([A-Z][\w\s]{1,40}?)(?:[?.!]|$)").ok()?;
    re.captures(query)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn extract_team(query: &str) -> Option<String> {
    let re = Regex::new(r"(?i)\bthe\s+([A-Z][\w]*(?:\s+[A-Z][\w]*){0,3})\b").ok()?;
    re.captures(query)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn extract_airport(query: &str) -> Option<String> {
    let re = Regex::new(r"\b([A-Z]{3})\b").ok()?;
    re.captures(query).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

/// Extract entities for `intent` from `query`. Coreference-resolved fields
/// are filled in separately by the caller when a pronoun was detected.
pub fn extract(intent: Intent, query: &str) -> Entities {
    let timeframe = extract_timeframe(query);
    match intent {
        Intent::Weather => Entities::Weather(WeatherEntities {
            location: extract_location(query).map(Resolved::fresh),
            forecast_flag: timeframe.map(|t| t.is_forecast()).unwrap_or(false),
            timeframe: timeframe.map(Resolved::fresh),
        }),
        Intent::Sports => Entities::Sports(SportsEntities {
            team: extract_team(query).map(Resolved::fresh),
            opponent: None,
            timeframe: timeframe.map(Resolved::fresh),
        }),
        Intent::Airports => Entities::Airports(AirportEntities {
            airport: extract_airport(query).map(Resolved::fresh),
            timeframe: timeframe.map(Resolved::fresh),
        }),
        Intent::GeneralInfo => Entities::GeneralInfo(GeneralInfoEntities { topic: None }),
        Intent::Control | Intent::Unknown => Entities::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_location_after_in() {
        assert_eq!(
            extract_location("What's the weather in Baltimore?"),
            Some("Baltimore".to_string())
        );
    }

    #[test]
    fn extracts_team_after_the() {
        assert_eq!(
            extract_team("Who do the New York Giants play this week?"),
            Some("New York Giants".to_string())
        );
    }

    #[test]
    fn future_timeframe_sets_forecast_flag() {
        let entities = extract(Intent::Weather, "Is it going to snow this week?");
        match entities {
            Entities::Weather(w) => assert!(w.forecast_flag),
            _ => panic!("expected weather entities"),
        }
    }

    #[test]
    fn today_timeframe_is_not_forecast() {
        let entities = extract(Intent::Weather, "What's the weather today?");
        match entities {
            Entities::Weather(w) => assert!(!w.forecast_flag),
            _ => panic!("expected weather entities"),
        }
    }

    #[test]
    fn extracts_airport_code() {
        assert_eq!(extract_airport("Are there delays at BWI?"), Some("BWI".to_string()));
    }
}
