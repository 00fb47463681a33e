//! Logging configuration using tracing
//!
//! The terminal is owned by the UI, so logs always go to a file.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "SEGMENT_STUDIO_LOG";

/// Initialize the logging subsystem.
///
/// Logs are written to `<data dir>/segment-studio/logs/segment-studio.log.<date>`.
/// The level is controlled by `SEGMENT_STUDIO_LOG`, e.g.
/// `SEGMENT_STUDIO_LOG=debug segment-studio ...`.
pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "segment-studio.log");

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("segment_studio=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .context("install tracing subscriber")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "segment-studio starting");
    tracing::info!("Log directory: {}", log_dir.display());
    Ok(log_dir)
}

fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("segment-studio").join("logs")
}
