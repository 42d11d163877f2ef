use anyhow::Result;
use clap::Parser;
use idgate::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Minimal in-memory identity service.
#[derive(Debug, Parser)]
#[command(name = "idgate", version, about)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,

    /// Directory of client assets served outside /api/
    #[arg(long)]
    client_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.gateway.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.gateway.port = port;
        }
        if let Some(dir) = &self.client_dir {
            config.gateway.client_dir.clone_from(dir);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    tracing::info!("Starting idgate");
    idgate::gateway::run_gateway(config).await
}
