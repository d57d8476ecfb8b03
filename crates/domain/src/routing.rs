use crate::intent::Intent;
use serde::{Deserialize, Serialize};

/// A single `intent -> adapter` routing rule pulled from the control
/// plane's routing map and cached by the config client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingEntry {
    pub intent: Intent,
    pub adapter_name: String,
    pub timeout_ms: u64,
    #[serde(default)]
    pub fallback_intent: Option<Intent>,
}

impl RoutingEntry {
    /// A hardcoded fallback used when the config client has neither a
    /// fresh nor a last-known-good entry for an intent.
    pub fn hardcoded_default(intent: Intent) -> RoutingEntry {
        let (adapter_name, timeout_ms, fallback_intent) = match intent {
            Intent::Weather => ("weather", 10_000, Some(Intent::GeneralInfo)),
            Intent::Sports => ("sports", 10_000, Some(Intent::GeneralInfo)),
            Intent::Airports => ("airports", 10_000, Some(Intent::GeneralInfo)),
            Intent::GeneralInfo => ("websearch", 15_000, None),
            Intent::Control => ("control", 3_000, None),
            Intent::Unknown => ("none", 0, None),
        };
        RoutingEntry {
            intent,
            adapter_name: adapter_name.to_string(),
            timeout_ms,
            fallback_intent,
        }
    }
}
