//! Log setup
//!
//! The TUI owns stdout, so logs go to a daily rolling file as NDJSON.
//! `TERMINAL_HACKER_LOG` overrides the configured level with any
//! `EnvFilter` directive.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a filter directive
pub const LOG_ENV: &str = "TERMINAL_HACKER_LOG";

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines get flushed.
pub fn init_logging<P: AsRef<Path>>(log_dir: P, level: &str) -> anyhow::Result<WorkerGuard> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    std::fs::create_dir_all(log_dir.as_ref())?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "terminal-hacker.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init();

    Ok(guard)
}
