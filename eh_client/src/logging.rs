//! Structured logging configuration.
//!
//! Library records emitted through the `log` facade are bridged into
//! `tracing` by the subscriber, so one filter governs both.

use anyhow::{Context, Result};
use event_hub::api::ApiError;
use std::{fs::OpenOptions, path::Path, sync::Mutex, time::Duration};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize logging to stderr
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use eh_client::logging;
///
/// logging::init().unwrap();
/// tracing::info!("Client starting");
/// ```
pub fn init() -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::debug!("Logging initialized");
    Ok(())
}

/// Initialize logging to an append-only file.
///
/// Used while the TUI owns the terminal, where writing to stderr would
/// corrupt the screen.
pub fn init_to_file(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::info!(log_file = %path.display(), "Logging initialized");
    Ok(())
}

/// Log a completed API call
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Request path relative to the API base
/// * `outcome` - `Ok` for a success status, otherwise the error
/// * `duration` - Time until the response (or failure)
pub fn log_api_call(method: &str, path: &str, outcome: Result<(), &ApiError>, duration: Duration) {
    let duration_ms = duration.as_millis() as u64;
    match outcome {
        Ok(()) => tracing::debug!(
            http_method = method,
            http_path = path,
            duration_ms = duration_ms,
            "API call succeeded"
        ),
        Err(e) => tracing::warn!(
            http_method = method,
            http_path = path,
            http_status = e.status(),
            duration_ms = duration_ms,
            error = %e,
            "API call failed"
        ),
    }
}
