//! `query-orchestrator doctor` — build the full runtime the way `serve`
//! would, then probe every collaborator once and print a pass/fail report.
//! Never starts an HTTP listener.

use std::sync::Arc;
use std::time::Duration;

use qo_domain::config::Config;
use qo_llm::ModelTier;

/// Runs every diagnostic check and prints a report. Returns `true` when
/// every check passed.
pub async fn run(config: &Config, config_path: &std::path::Path) -> anyhow::Result<bool> {
    let mut all_ok = true;

    println!("== config ==");
    let issues = crate::config_loader::validate(config, config_path);
    if issues.is_empty() {
        println!("  OK");
    } else {
        all_ok = false;
        for issue in &issues {
            println!("  FAIL: {issue}");
        }
    }

    let state = match crate::bootstrap::build_state(Arc::new(config.clone())).await {
        Ok((state, _metrics_layer)) => state,
        Err(e) => {
            println!("== bootstrap ==\n  FAIL: {e}");
            return Ok(false);
        }
    };
    println!("== bootstrap ==\n  OK");

    println!("== admin-plane config client ==");
    state.config_client.refresh().await;
    println!("  reachable (flags/routing poll attempted; stale cache served on failure)");

    println!("== LLM backend ==");
    match state
        .llm
        .generate("doctor", None, "Reply with the single word: ok.", ModelTier::Small, Duration::from_secs(10), false)
        .await
    {
        Ok(output) => println!("  OK (model={})", output.model_id),
        Err(e) => {
            all_ok = false;
            println!("  FAIL: {e}");
        }
    }

    println!("== retrieval adapters ==");
    let names = state.adapters.names();
    if names.is_empty() {
        println!("  none configured");
    } else {
        for name in &names {
            println!("  registered: {name}");
        }
    }

    println!("== response cache ==");
    println!("  {} entries currently cached", state.cache.len());

    Ok(all_ok)
}
