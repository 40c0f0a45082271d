use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `debug` or
/// `prompt_inspector=trace`.
pub const LOG_ENV: &str = "PROMPT_INSPECTOR_LOG";

fn env_filter(fallback: &str) -> EnvFilter {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => fallback
            .parse::<EnvFilter>()
            .unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Log to a daily-rotated file under `dir`. The terminal belongs to the UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_file(dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, "prompt-inspector.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    Ok(guard)
}

/// Log to stderr, for one-shot commands.
pub fn init_stderr(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))
}
