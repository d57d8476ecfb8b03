//! Intent labels and the typed entity sum type.
//!
//! The source system carried entities as a dict; here each intent has its
//! own entity struct, unioned into [`Entities`] so the synthesizer and
//! validator can match exhaustively instead of probing a map by string key.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A closed enum of recognized intents. The orchestrator must treat any
/// label it doesn't recognize (e.g. from a future classifier version) as
/// [`Intent::GeneralInfo`] — see [`Intent::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Control,
    Weather,
    Sports,
    Airports,
    GeneralInfo,
    Unknown,
}

impl Intent {
    /// Parse a free-form label (e.g. from an LLM classifier reply or a
    /// future rule) into a known intent, falling back to `GeneralInfo` for
    /// anything unrecognized rather than `Unknown` — per spec: "the
    /// orchestrator must treat unknown labels as general_info".
    pub fn normalize(label: &str) -> Intent {
        match label.trim().to_ascii_lowercase().as_str() {
            "control" => Intent::Control,
            "weather" => Intent::Weather,
            "sports" => Intent::Sports,
            "airports" => Intent::Airports,
            "general_info" | "general" | "info" => Intent::GeneralInfo,
            "unknown" => Intent::Unknown,
            _ => Intent::GeneralInfo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Control => "control",
            Intent::Weather => "weather",
            Intent::Sports => "sports",
            Intent::Airports => "airports",
            Intent::GeneralInfo => "general_info",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timeframe extracted from the query (or resolved from context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Today,
    Tonight,
    Tomorrow,
    ThisWeek,
    NextWeek,
    Weekend,
    ThisMonth,
    NextMonth,
}

impl Timeframe {
    /// Whether this timeframe looks forward from "now" (drives the
    /// retrieve stage's forecast-vs-current-conditions endpoint choice).
    pub fn is_forecast(&self) -> bool {
        !matches!(self, Timeframe::Today)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Today => "today",
            Timeframe::Tonight => "tonight",
            Timeframe::Tomorrow => "tomorrow",
            Timeframe::ThisWeek => "this_week",
            Timeframe::NextWeek => "next_week",
            Timeframe::Weekend => "weekend",
            Timeframe::ThisMonth => "this_month",
            Timeframe::NextMonth => "next_month",
        }
    }
}

/// A single resolved entity value, tagged with whether it came from the
/// current query or was resolved against prior-turn context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub value: T,
    #[serde(default)]
    pub resolved_from_context: bool,
}

impl<T> Resolved<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            resolved_from_context: false,
        }
    }

    pub fn from_context(value: T) -> Self {
        Self {
            value,
            resolved_from_context: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherEntities {
    pub location: Option<Resolved<String>>,
    pub timeframe: Option<Resolved<Timeframe>>,
    pub forecast_flag: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SportsEntities {
    pub team: Option<Resolved<String>>,
    pub opponent: Option<Resolved<String>>,
    pub timeframe: Option<Resolved<Timeframe>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirportEntities {
    pub airport: Option<Resolved<String>>,
    pub timeframe: Option<Resolved<Timeframe>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralInfoEntities {
    /// Free-form topic tokens extracted for search query shaping.
    pub topic: Option<String>,
}

/// The typed union of every intent's entity shape. Synthesizer and
/// validator match on this exhaustively instead of indexing into a map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Entities {
    Weather(WeatherEntities),
    Sports(SportsEntities),
    Airports(AirportEntities),
    GeneralInfo(GeneralInfoEntities),
    /// `control` and `unknown` carry no structured entities.
    None,
}

impl Entities {
    pub fn empty_for(intent: Intent) -> Entities {
        match intent {
            Intent::Weather => Entities::Weather(WeatherEntities::default()),
            Intent::Sports => Entities::Sports(SportsEntities::default()),
            Intent::Airports => Entities::Airports(AirportEntities::default()),
            Intent::GeneralInfo => Entities::GeneralInfo(GeneralInfoEntities::default()),
            Intent::Control | Intent::Unknown => Entities::None,
        }
    }

    /// The entity kind string this variant expects to be resolved from,
    /// used by coreference resolution to find a matching prior turn.
    pub fn expected_kind(intent: Intent) -> &'static str {
        match intent {
            Intent::Weather => "location",
            Intent::Sports => "team",
            Intent::Airports => "airport",
            _ => "",
        }
    }

    pub fn forecast_flag(&self) -> bool {
        matches!(self, Entities::Weather(w) if w.forecast_flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_label_normalizes_to_general_info() {
        assert_eq!(Intent::normalize("smalltalk"), Intent::GeneralInfo);
    }

    #[test]
    fn known_labels_roundtrip() {
        for (label, intent) in [
            ("control", Intent::Control),
            ("weather", Intent::Weather),
            ("sports", Intent::Sports),
            ("airports", Intent::Airports),
            ("unknown", Intent::Unknown),
        ] {
            assert_eq!(Intent::normalize(label), intent);
        }
    }

    #[test]
    fn timeframe_today_is_not_forecast() {
        assert!(!Timeframe::Today.is_forecast());
        assert!(Timeframe::ThisWeek.is_forecast());
        assert!(Timeframe::Tomorrow.is_forecast());
    }
}
