use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use qo_gateway::cli::{Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => {
            qo_gateway::telemetry::init_tracing();
            let (config, _config_path) = qo_gateway::config_loader::load()?;
            run_server(Arc::new(config)).await
        }
        Some(Command::Doctor) => {
            let (config, config_path) = qo_gateway::config_loader::load()?;
            let passed = qo_gateway::cli::doctor::run(&config, &config_path).await?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = qo_gateway::config_loader::load()?;
            let valid = qo_gateway::cli::config::validate(&config, &config_path);
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _config_path) = qo_gateway::config_loader::load()?;
            qo_gateway::cli::config::show(&config);
            Ok(())
        }
        Some(Command::Version) => {
            println!("query-orchestrator {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_server(config: Arc<qo_domain::config::Config>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind_addr.clone();
    let (state, metrics_layer) = qo_gateway::bootstrap::build_state(config).await?;

    let app = qo_gateway::api::router(state, metrics_layer);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {bind_addr}"))?;

    tracing::info!(addr = %bind_addr, "query-orchestrator listening");

    axum::serve(listener, app).await.context("axum server error")?;

    Ok(())
}
