//! PSW command line
//!
//! Walks a project document through setup, budgeting, margin review, demand
//! planning and export, and fronts the budgeting agent.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use psw_core::config::AppConfig;
use psw_core::error::PswError;

mod cli;
mod commands;
mod document;

use cli::Cli;
use commands::App;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(failure_code(&e))
        }
    }
}

fn failure_code(e: &anyhow::Error) -> u8 {
    e.downcast_ref::<PswError>()
        .map(PswError::exit_code)
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}

/// Returns whether the command's result was a success
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        // an explicit config file has to load
        Err(e) if cli.config.is_some() => return Err(PswError::from(e).into()),
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            AppConfig::default()
        }
    };

    let app = App::new(config, cli.project);
    let outcome = app.run(cli.command).await?;
    println!("{}", outcome.render(cli.format)?);
    Ok(outcome.success)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,psw_cli=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
