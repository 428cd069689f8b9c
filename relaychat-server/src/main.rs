use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use relaychat_core::config::{load_from_path, RelayConfig, SafeLogging};
use relaychat_core::{CompletionAggregator, CompletionSettings, GroqProvider};
use relaychat_server::{run_http, AppState, IndexPage, DEFAULT_LOG_FILTER};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "relaychat")]
#[command(author, version, about = "Relay browser chat messages to a streaming LLM provider", long_about = None)]
struct Cli {
    /// YAML or JSON config file; defaults plus GROQ_API_KEY when omitted
    #[arg(short, long, env = "RELAYCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:5000
    #[arg(short, long)]
    bind: Option<String>,

    /// Directory served under /static
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("Configuration: {}", config.safe_for_logging());

    let provider = GroqProvider::new(&config.provider, &config.connection)
        .context("building provider client")?;
    let aggregator = CompletionAggregator::new(
        Arc::new(provider),
        CompletionSettings::from(&config.completion),
    );
    info!(
        "Relaying completions to {} (model: {})",
        aggregator.provider_name(),
        aggregator.settings().model
    );

    let state = AppState::new(aggregator, IndexPage::from(config.server.index_path.clone()));

    run_http(state, &config.server).await
}

fn load_config(cli: &Cli) -> Result<RelayConfig> {
    let mut config = match &cli.config {
        Some(path) => load_from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RelayConfig::from_env(),
    };

    if let Some(bind) = &cli.bind {
        config.server.bind_addr = bind.clone();
    }
    if let Some(dir) = &cli.static_dir {
        config.server.static_dir = dir.clone();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}
