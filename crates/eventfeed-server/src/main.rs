//! eventfeed-server entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use eventfeed_core::{TracingConfig, TracingOutputFormat, init_tracing};
use eventfeed_providers::{HttpFetcher, MeetupPageParser};
use eventfeed_server::{
    AppState, ConfigSource, DEFAULT_CONFIG_PATH, ServerError, ServerResult, router,
};

/// Serve upcoming Meetup events as JSON.
#[derive(Debug, Parser)]
#[command(name = "eventfeed-server", version, about)]
struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Re-read the configuration file on every request
    #[arg(
        long,
        env = "RELOAD_CONFIG_EACH_REQUEST",
        default_value_t = false,
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    reload_config: bool,

    /// Address to listen on
    #[arg(long, env = "EVENTFEED_BIND", default_value = "0.0.0.0:8000")]
    bind: String,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "compact")]
    log_format: TracingOutputFormat,

    /// Log filter directive, e.g. "eventfeed_server=debug" (overrides RUST_LOG)
    #[arg(long, env = "EVENTFEED_LOG")]
    log_filter: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::server().with_format(cli.log_format)
    };
    if let Some(filter) = &cli.log_filter {
        tracing_config = tracing_config.with_env_filter(filter);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server stopped");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ServerResult<()> {
    let source = ConfigSource::load(cli.config.clone(), cli.reload_config)?;
    let settings = source.snapshot()?.fetch.to_settings();
    let fetcher = HttpFetcher::new(&settings).map_err(|e| ServerError::config(e.to_string()))?;

    let state = AppState::new(source, Arc::new(fetcher), Arc::new(MeetupPageParser::new()));

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    info!(
        addr = %cli.bind,
        config = %cli.config.display(),
        reload = cli.reload_config,
        "Listening"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}
