//! Pure route_decision logic (spec §4.1): a function of intent plus the
//! routing map and feature flags pulled from the config client. No I/O.

use qo_domain::flags::names;
use qo_domain::intent::Intent;
use qo_domain::routing::RoutingEntry;

use qo_config_client::ConfigClient;

#[derive(Debug, Clone)]
pub enum RouteTarget {
    Control,
    Unknown,
    SingleAdapter(RoutingEntry),
    ParallelSearch,
    LlmKnowledgeOnly,
}

/// Resolve where a classified intent should be retrieved from. `control`
/// and `unknown` short-circuit to finalize before retrieve ever runs;
/// `weather`/`sports`/`airports` fall through to `general_info` when their
/// adapter flag is off, and `general_info` itself picks parallel search or
/// LLM-knowledge-only depending on whether any search provider exists.
pub fn route_decision(config: &ConfigClient, has_search_providers: bool, intent: Intent) -> RouteTarget {
    match intent {
        Intent::Control => RouteTarget::Control,
        Intent::Unknown => RouteTarget::Unknown,
        Intent::Weather => adapter_or_fallback(config, has_search_providers, Intent::Weather, names::WEATHER_ADAPTER),
        Intent::Sports => adapter_or_fallback(config, has_search_providers, Intent::Sports, names::SPORTS_ADAPTER),
        Intent::Airports => adapter_or_fallback(config, has_search_providers, Intent::Airports, names::AIRPORTS_ADAPTER),
        Intent::GeneralInfo => {
            if has_search_providers {
                RouteTarget::ParallelSearch
            } else {
                RouteTarget::LlmKnowledgeOnly
            }
        }
    }
}

fn adapter_or_fallback(
    config: &ConfigClient,
    has_search_providers: bool,
    intent: Intent,
    flag_name: &str,
) -> RouteTarget {
    if config.flag(flag_name) {
        RouteTarget::SingleAdapter(config.routing(intent))
    } else if has_search_providers {
        RouteTarget::ParallelSearch
    } else {
        RouteTarget::LlmKnowledgeOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qo_domain::config::AdminPlaneConfig;

    fn config() -> ConfigClient {
        ConfigClient::new(&AdminPlaneConfig::default(), "test-secret".to_string())
    }

    #[test]
    fn control_always_routes_to_control() {
        let cfg = config();
        assert!(matches!(route_decision(&cfg, true, Intent::Control), RouteTarget::Control));
    }

    #[test]
    fn unknown_always_routes_to_unknown() {
        let cfg = config();
        assert!(matches!(route_decision(&cfg, true, Intent::Unknown), RouteTarget::Unknown));
    }

    #[test]
    fn weather_with_no_cached_flag_falls_back_to_parallel_search_when_providers_exist() {
        let cfg = config();
        assert!(matches!(
            route_decision(&cfg, true, Intent::Weather),
            RouteTarget::ParallelSearch
        ));
    }

    #[test]
    fn weather_with_no_cached_flag_and_no_providers_falls_back_to_llm_knowledge_only() {
        let cfg = config();
        assert!(matches!(
            route_decision(&cfg, false, Intent::Weather),
            RouteTarget::LlmKnowledgeOnly
        ));
    }

    #[test]
    fn general_info_picks_parallel_search_when_providers_exist() {
        let cfg = config();
        assert!(matches!(
            route_decision(&cfg, true, Intent::GeneralInfo),
            RouteTarget::ParallelSearch
        ));
    }

    #[test]
    fn general_info_picks_llm_knowledge_only_with_no_providers() {
        let cfg = config();
        assert!(matches!(
            route_decision(&cfg, false, Intent::GeneralInfo),
            RouteTarget::LlmKnowledgeOnly
        ));
    }
}
