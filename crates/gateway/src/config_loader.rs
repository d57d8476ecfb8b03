//! Loads the process-wide static [`qo_domain::config::Config`] from the
//! path named by `QO_CONFIG` (default `config.yaml`), layered under
//! `QO_`-prefixed environment variables. Shared by `serve`, `doctor`, and
//! `config show`/`config validate` so the logic lives in one place.

use std::path::{Path, PathBuf};

use qo_domain::config::Config;
use qo_domain::error::Result;

pub fn load() -> Result<(Config, PathBuf)> {
    let config_path = std::env::var("QO_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let path = PathBuf::from(&config_path);
    let config = Config::load(Some(path.as_path()))?;
    Ok((config, path))
}

/// Best-effort sanity checks beyond what `figment`'s deserialization
/// already enforces — the things a malformed-but-parseable config can
/// still get wrong.
pub fn validate(config: &Config, path: &Path) -> Vec<String> {
    let mut issues = Vec::new();

    if config.server.bind_addr.parse::<std::net::SocketAddr>().is_err() {
        issues.push(format!("server.bind_addr '{}' is not a valid address", config.server.bind_addr));
    }
    if config.server.max_concurrent_requests == 0 {
        issues.push("server.max_concurrent_requests must be > 0".to_string());
    }
    if config.llm.tier_models.is_empty() {
        issues.push("llm.tier_models has no entries — synthesis will never find a model".to_string());
    }
    if !path.exists() {
        issues.push(format!(
            "{} not found — running on built-in defaults only",
            path.display()
        ));
    }

    issues
}
