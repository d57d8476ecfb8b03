//! Pure, synchronous tier resolution. No HTTP, no async — deterministic
//! decision logic the rest of the crate can unit-test exhaustively.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelTier {
    Small,
    Medium,
    Large,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Small => "small",
            ModelTier::Medium => "medium",
            ModelTier::Large => "large",
        }
    }
}

/// Tier-to-model table, normally loaded from `qo_domain::config::LlmConfig`
/// and overridable per-intent by the config client's routing feed.
#[derive(Debug, Clone, Default)]
pub struct TierConfig {
    pub small: Vec<String>,
    pub medium: Vec<String>,
    pub large: Vec<String>,
}

impl TierConfig {
    pub fn from_map(map: &HashMap<String, String>) -> TierConfig {
        let one = |k: &str| map.get(k).cloned().into_iter().collect();
        TierConfig {
            small: one("small"),
            medium: one("medium"),
            large: one("large"),
        }
    }
}

/// Get the first configured model for a tier.
pub fn resolve_tier_model(tier: ModelTier, tiers: &TierConfig) -> Option<&str> {
    let models = match tier {
        ModelTier::Small => &tiers.small,
        ModelTier::Medium => &tiers.medium,
        ModelTier::Large => &tiers.large,
    };
    models.first().map(|s| s.as_str())
}

/// Tier fallback order when the target tier has no models configured.
fn fallback_tiers(starting: ModelTier) -> Vec<ModelTier> {
    match starting {
        ModelTier::Small => vec![ModelTier::Medium, ModelTier::Large],
        ModelTier::Medium => vec![ModelTier::Large, ModelTier::Small],
        ModelTier::Large => vec![ModelTier::Medium, ModelTier::Small],
    }
}

#[derive(Debug, Clone)]
pub struct RoutingDecision {
    pub model: String,
    pub tier: ModelTier,
}

/// Resolve a model for a request: an explicit `model_tier` request option
/// overrides the classifier-selected tier; an empty tier walks the
/// fallback chain before giving up.
pub fn resolve_model_for_request(
    requested_tier: Option<ModelTier>,
    synthesizer_tier: ModelTier,
    tiers: &TierConfig,
) -> RoutingDecision {
    let target_tier = requested_tier.unwrap_or(synthesizer_tier);

    if let Some(model) = resolve_tier_model(target_tier, tiers) {
        return RoutingDecision {
            model: model.to_string(),
            tier: target_tier,
        };
    }

    for fallback in fallback_tiers(target_tier) {
        if let Some(model) = resolve_tier_model(fallback, tiers) {
            return RoutingDecision {
                model: model.to_string(),
                tier: fallback,
            };
        }
    }

    RoutingDecision {
        model: String::new(),
        tier: target_tier,
    }
}

/// The synthesize-stage tier selection rule (spec §4.1): simple intents
/// with high confidence and a short query use the small tier, otherwise
/// medium. Pure function of classifier output and query length so it's
/// testable without a live model. Large is never selected automatically —
/// it is reserved for an explicit `model_tier: "large"` request option.
pub fn select_synthesis_tier(intent_is_simple: bool, confidence: f32, query_len_chars: usize) -> ModelTier {
    if intent_is_simple && confidence >= 0.75 && query_len_chars <= 80 {
        ModelTier::Small
    } else {
        ModelTier::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_tiers() -> TierConfig {
        TierConfig {
            small: vec!["small-model".into()],
            medium: vec!["medium-model".into()],
            large: vec!["large-model".into()],
        }
    }

    #[test]
    fn resolve_tier_model_picks_first_in_list() {
        let tiers = TierConfig {
            small: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        assert_eq!(resolve_tier_model(ModelTier::Small, &tiers), Some("a"));
    }

    #[test]
    fn resolve_tier_model_empty_tier_returns_none() {
        let tiers = TierConfig::default();
        assert_eq!(resolve_tier_model(ModelTier::Small, &tiers), None);
    }

    #[test]
    fn explicit_request_tier_overrides_synthesizer_choice() {
        let tiers = test_tiers();
        let decision = resolve_model_for_request(Some(ModelTier::Large), ModelTier::Small, &tiers);
        assert_eq!(decision.model, "large-model");
        assert_eq!(decision.tier, ModelTier::Large);
    }

    #[test]
    fn falls_back_across_tiers_when_empty() {
        let tiers = TierConfig {
            small: vec![],
            medium: vec!["fallback".into()],
            large: vec![],
        };
        let decision = resolve_model_for_request(None, ModelTier::Small, &tiers);
        assert_eq!(decision.model, "fallback");
        assert_eq!(decision.tier, ModelTier::Medium);
    }

    #[test]
    fn simple_short_high_confidence_selects_small_tier() {
        assert_eq!(select_synthesis_tier(true, 0.9, 20), ModelTier::Small);
    }

    #[test]
    fn low_confidence_selects_medium_tier() {
        assert_eq!(select_synthesis_tier(true, 0.5, 20), ModelTier::Medium);
    }

    #[test]
    fn long_query_selects_medium_tier() {
        assert_eq!(select_synthesis_tier(true, 0.9, 200), ModelTier::Medium);
    }
}
