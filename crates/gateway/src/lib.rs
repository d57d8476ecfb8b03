//! HTTP surface and process bootstrap for the query orchestrator.
//!
//! `main.rs` is deliberately thin: it parses the CLI, loads config, and
//! delegates to the functions this crate exposes so `serve`/`doctor`/
//! `config` all share one bootstrap path.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod config_loader;
pub mod state;
pub mod telemetry;

pub use state::AppState;
