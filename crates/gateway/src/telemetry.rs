//! Structured JSON tracing, initialized once at process start for the
//! `serve` command (the other subcommands print plain text to stdout and
//! don't need a subscriber).

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,qo_gateway=debug")),
        )
        .json()
        .init();
}
