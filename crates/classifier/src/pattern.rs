//! Ordered regex pattern classifier. Rules are order-sensitive: the first
//! matching rule wins. A disambiguation pre-pass is expressed simply by
//! placing guard rules (how-to phrasing that merely mentions a domain
//! keyword) ahead of the keyword-only rules they would otherwise trigger.

use regex::Regex;

use qo_domain::intent::Intent;

pub struct PatternRule {
    pub regex: Regex,
    pub intent: Intent,
}

pub struct PatternClassifier {
    rules: Vec<PatternRule>,
}

impl PatternClassifier {
    pub fn new() -> Self {
        let specs: &[(&str, Intent)] = &[
            // Control intents: imperative device commands.
            (r"(?i)\b(turn (on|off)|dim|set (the )?thermostat|lock the|unlock the)\b", Intent::Control),
            // Disambiguation guard: "how do/does/to/can you <verb>" phrasing
            // is a how-to question, not a request for live data, even when
            // it mentions a domain keyword like "snowboard" or "play".
            (r"(?i)\bhow\s+(do|does|to|can)\s+(you|i|one)\b", Intent::GeneralInfo),
            // Weather.
            (
                r"(?i)\b(weather|temperature|forecast|snow(ing)?|rain(ing)?|sunny|cloudy|humidity)\b",
                Intent::Weather,
            ),
            // Sports.
            (
                r"(?i)\b(game|match|score|schedule|play(s|ing)?|opponent|roster)\b.*\b(team|giants|yankees|lakers|vs\.?)\b|\b(who do|who does).*\bplay\b",
                Intent::Sports,
            ),
            // Airports / flights.
            (
                r"(?i)\b(flight|airport|delay(s|ed)?|gate|terminal|boarding)\b",
                Intent::Airports,
            ),
        ];

        let rules = specs
            .iter()
            .map(|(pattern, intent)| PatternRule {
                regex: Regex::new(pattern).expect("static pattern is valid regex"),
                intent: *intent,
            })
            .collect();

        PatternClassifier { rules }
    }

    /// Returns the first matching rule's intent, or `GeneralInfo` if
    /// nothing matches (the orchestrator's required fallback, spec §3).
    pub fn classify(&self, query: &str) -> Intent {
        for rule in &self.rules {
            if rule.regex.is_match(query) {
                return rule.intent;
            }
        }
        Intent::GeneralInfo
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_weather_query_matches_weather() {
        let c = PatternClassifier::new();
        assert_eq!(c.classify("What's the weather in Baltimore?"), Intent::Weather);
    }

    #[test]
    fn how_to_question_does_not_match_weather() {
        let c = PatternClassifier::new();
        assert_eq!(c.classify("How do you snowboard?"), Intent::GeneralInfo);
    }

    #[test]
    fn sports_schedule_query_matches_sports() {
        let c = PatternClassifier::new();
        assert_eq!(
            c.classify("Who do the New York Giants play this week?"),
            Intent::Sports
        );
    }

    #[test]
    fn flight_delay_query_matches_airports() {
        let c = PatternClassifier::new();
        assert_eq!(c.classify("Are there delays at BWI?"), Intent::Airports);
    }

    #[test]
    fn unrelated_query_falls_back_to_general_info() {
        let c = PatternClassifier::new();
        assert_eq!(c.classify("What time does the unicorn store open?"), Intent::GeneralInfo);
    }

    #[test]
    fn control_command_matches_control() {
        let c = PatternClassifier::new();
        assert_eq!(c.classify("Turn off the living room lights"), Intent::Control);
    }
}
