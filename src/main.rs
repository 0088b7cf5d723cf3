use anyhow::{Context, Result};
use clap::Parser;
use docsum::{api, config, logging, processing::ProcessingService};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(
    name = "docsum",
    about = "Document Summary Assistant backend: upload extraction and LLM summaries"
)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    /// Port to bind; overrides `PORT`.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load().context("refusing to start without valid configuration")?;
    logging::init_tracing(&config.log_file);
    tracing::debug!(
        model = %config.gemini_model,
        base_url = %config.gemini_base_url,
        server_port = config.server_port,
        max_upload_bytes = config.max_upload_bytes,
        upload_temp_dir = %config.upload_temp_dir.display(),
        tesseract = %config.ocr.command,
        log_file = %config.log_file.display(),
        "Loaded configuration"
    );

    let service =
        ProcessingService::from_config(&config).context("failed to build processing service")?;
    let app = api::create_router(Arc::new(service), config.max_upload_bytes);

    let port = cli.port.unwrap_or(config.server_port);
    let listener = TcpListener::bind((cli.host, port))
        .await
        .with_context(|| format!("failed to bind {}:{port}", cli.host))?;
    tracing::info!("Listening on http://{}:{}", cli.host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
