//! Mini CRM: customer segmentation and campaign dashboard backend.
//!
//! Loads configuration, wires the in-memory store, audience estimator and
//! message generator, and serves the REST API.

use clap::{Parser, ValueEnum};
use crm_api::ApiServer;
use crm_core::config::{AppConfig, EstimatorKind};
use crm_management::ManagementState;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Estimator {
    /// Random count in the preview range
    Mock,
    /// Count the seeded demo customers that match
    Predicate,
}

impl From<Estimator> for EstimatorKind {
    fn from(value: Estimator) -> Self {
        match value {
            Estimator::Mock => EstimatorKind::Mock,
            Estimator::Predicate => EstimatorKind::Predicate,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "mini-crm")]
#[command(about = "Customer segmentation and campaign dashboard backend")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, short)]
    config: Option<String>,

    /// Node identifier (overrides config)
    #[arg(long, env = "MINI_CRM__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "MINI_CRM__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "MINI_CRM__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Gemini API key (overrides config)
    #[arg(long, env = "MINI_CRM__GEMINI__API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Audience estimator
    #[arg(long, value_enum)]
    estimator: Option<Estimator>,

    /// Artificial delay for mocked store calls, in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_crm=info,crm_management=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Mini CRM starting up");

    let mut config = AppConfig::load_from(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if let Some(key) = cli.gemini_api_key {
        config.gemini.api_key = Some(key);
    }
    if let Some(estimator) = cli.estimator {
        config.segmentation.estimator = estimator.into();
    }
    if let Some(latency) = cli.latency_ms {
        config.store.simulated_latency_ms = latency;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        estimator = ?config.segmentation.estimator,
        "Configuration loaded"
    );

    let state = ManagementState::from_config(&config)?;
    let api_server = ApiServer::new(config, state);

    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Mini CRM is ready to serve traffic");

    api_server.start_http().await?;

    Ok(())
}
