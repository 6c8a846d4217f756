use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use glowwatch::config::Settings;
use glowwatch::{metrics, Collector};
use glowwatch_adapters::GlowrootClient;
use glowwatch_store::prometheus::{PrometheusConfig, PrometheusExporter};
use glowwatch_store::SnapshotStore;

#[derive(Parser, Debug)]
#[command(name = "glowwatch")]
#[command(about = "Prometheus exporter for Glowroot APM error and transaction counts")]
struct Args {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Log as JSON lines instead of human-readable text
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    let settings = Settings::load(&args.config)?;
    let server = settings.server;

    let client = GlowrootClient::builder()
        .endpoint(server.glowroot_url.as_str())
        .build()
        .context("Invalid server.glowroot_url")?;

    let store = Arc::new(SnapshotStore::new());
    let exporter = PrometheusExporter::new(
        PrometheusConfig::builder()
            .listen_addr(server.listen_addr())
            .namespace(metrics::NAMESPACE)
            .build(),
        Arc::clone(&store),
    );
    let listener = exporter
        .bind()
        .await
        .with_context(|| format!("Failed to bind {}", exporter.config().listen_addr))?;

    info!(
        glowroot_url = %server.glowroot_url,
        exporter_port = server.exporter_port,
        "Starting glowwatch"
    );

    let metrics_server = tokio::spawn(async move { exporter.serve_listener(listener).await });
    let collector = Collector::new(client, store, server.time_interval(), server.poll_interval());

    tokio::select! {
        joined = metrics_server => {
            joined
                .context("Metrics server task panicked")?
                .context("Metrics server failed")?;
            Ok(())
        }
        never = collector.run() => match never {},
    }
}
