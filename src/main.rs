//! healthreport: Terminal client for the school health-report service.
//!
//! Main entry point for the terminal application.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthreport::adapters::{HttpScoringService, RedactingMakeWriter};
use healthreport::tui::{App, TuiPresenter};
use healthreport::{ClientConfig, LogConfig, ReportClient};

fn main() -> Result<()> {
    // Loads `.env` first so its logging settings apply.
    let log_config = LogConfig::from_env();

    // Writing logs to the terminal would corrupt the TUI (alternate screen).
    let (writer, _guard) = if log_config.mode.use_file(std::io::stdout().is_terminal()) {
        let log_file = &log_config.file;
        if let Some(parent) = log_file.parent() {
            // Best-effort: a missing directory surfaces as the open error below.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(RedactingMakeWriter::new(writer)))
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        api = %config.base_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting healthreport..."
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("healthreport-worker")
        .build()
        .context("Failed to start async runtime")?;

    let scoring = Arc::new(HttpScoringService::new(&config)?);
    let presenter = Arc::new(TuiPresenter::new());
    let client = Arc::new(ReportClient::new(
        scoring,
        presenter.clone(),
        &config,
        runtime.handle().clone(),
    ));

    client.show_form();
    {
        let client = client.clone();
        runtime.spawn(async move { client.load_school_info().await });
    }

    let mut app = App::new(client, presenter, runtime.handle().clone());
    app.run()?;

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    tracing::info!("healthreport shutdown complete.");
    Ok(())
}
