use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Env var holding a tracing filter directive, e.g. `CRM_LOG=debug`.
pub const LOG_ENV: &str = "CRM_LOG";

/// Route tracing output to a daily-rolling file in `log_dir`.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow!("invalid {LOG_ENV} filter: {e}"))?;

    let appender = tracing_appender::rolling::daily(log_dir, "crm-change-request.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_target(false)
        .with_thread_ids(true)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(guard)
}
