pub mod config;
pub mod doctor;

use clap::{Parser, Subcommand};

/// query-orchestrator — a conversational backend that classifies, routes,
/// retrieves, synthesizes, and validates answers.
#[derive(Debug, Parser)]
#[command(name = "query-orchestrator", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP gateway (default when no subcommand is given).
    Serve,
    /// Run diagnostic checks against config and every collaborator, then exit.
    Doctor,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any issues.
    Validate,
    /// Dump the resolved configuration (with defaults) as YAML.
    Show,
}
