use serde::{Deserialize, Serialize};

/// Per-stage wall-clock budgets (spec §4.1). Exceeding a budget marks that
/// stage's output unavailable and proceeds to the fallback branch rather
/// than aborting the whole request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetsConfig {
    pub classify_ms: u64,
    pub retrieve_rag_ms: u64,
    pub retrieve_parallel_search_ms: u64,
    pub synthesize_ms: u64,
    pub validate_ms: u64,
}

impl Default for BudgetsConfig {
    fn default() -> Self {
        BudgetsConfig {
            classify_ms: 3_000,
            retrieve_rag_ms: 10_000,
            retrieve_parallel_search_ms: 15_000,
            synthesize_ms: 20_000,
            validate_ms: 2_000,
        }
    }
}
