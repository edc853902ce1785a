//! Tracing setup.
//!
//! The TUI owns the terminal, so it logs to a file; one-shot commands log to stderr.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "websum.log";

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Log to `<log_dir>/websum.log`. Keep the guard alive until exit so buffered
/// lines are written.
pub fn init_file<P: AsRef<Path>>(log_dir: P, level: &str) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir.as_ref())?;
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .try_init();

    Ok(guard)
}

/// Log to stderr, leaving stdout for command output
pub fn init_stderr(level: &str) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console_layer)
        .try_init();
}
