use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use aap_mcp_server::{run_server, AapClient, AapConfig};

#[derive(Parser, Debug)]
#[command(version, about = "MCP server for Ansible Automation Platform")]
struct CliArgs {
    /// The port to listen on.
    #[clap(short, long, default_value_t = 8080)]
    pub port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let config = AapConfig::from_env().context("Invalid AAP configuration")?;
    info!(
        "Configured for AAP controller at {} (project {}, verify_ssl={}, timeout={}s, retries={})",
        config.url, config.project_id, config.verify_ssl, config.timeout_secs, config.max_retries
    );

    // One client for the process lifetime; shared by every tool call.
    let client = Arc::new(AapClient::new(config.clone())?);

    info!("Ready to serve at port {}!", cli_args.port);
    run_server(client, config, cli_args.port).await
}
