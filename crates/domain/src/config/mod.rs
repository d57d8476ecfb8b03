//! Process-wide static configuration, loaded once at startup (and
//! refreshed wholesale on SIGHUP-style reload) via `figment`. This is
//! distinct from the *dynamic* control-plane config (flags, routing,
//! credentials) which `qo-config-client` polls at runtime — this module
//! covers the config that only ever comes from the local YAML/env layer:
//! bind address, upstream endpoints, budgets, concurrency caps.

mod adapters;
mod admin;
mod budgets;
mod cache;
mod llm;
mod server;
mod sessions;

pub use adapters::AdaptersConfig;
pub use admin::AdminPlaneConfig;
pub use budgets::BudgetsConfig;
pub use cache::CacheConfig;
pub use llm::LlmConfig;
pub use server::ServerConfig;
pub use sessions::SessionsConfig;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub adapters: AdaptersConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub admin_plane: AdminPlaneConfig,
    #[serde(default)]
    pub budgets: BudgetsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            adapters: AdaptersConfig::default(),
            cache: CacheConfig::default(),
            sessions: SessionsConfig::default(),
            admin_plane: AdminPlaneConfig::default(),
            budgets: BudgetsConfig::default(),
        }
    }
}

impl Config {
    /// Layer a YAML file (if present) under environment variables prefixed
    /// `QO_`, e.g. `QO_SERVER__BIND_ADDR`. Mirrors the teacher's layering
    /// order: file first, env last so it always wins.
    pub fn load(path: Option<&std::path::Path>) -> Result<Config> {
        let mut figment =
            Figment::from(figment::providers::Serialized::defaults(Config::default()));
        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Yaml::file(path));
            }
        }
        figment = figment.merge(Env::prefixed("QO_").split("__"));
        figment.extract().map_err(|e| Error::Config(e.to_string()))
    }
}
