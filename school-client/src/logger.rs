//! Logging Infrastructure
//!
//! Console logging, plus an optional daily rotating file under
//! `<log_dir>/app/app.YYYY-MM-DD.log`. Rotated files older than 14 days are
//! removed at startup and then hourly while a runtime is alive.

use anyhow::Context;
use chrono::{Local, NaiveDate, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

const LOG_PREFIX: &str = "app";
const LOG_SUFFIX: &str = "log";
const RETENTION_DAYS: i64 = 14;

/// Date encoded in a rotated file name (`app.2024-09-02.log`)
fn log_file_date(name: &str) -> Option<NaiveDate> {
    let date = name
        .strip_prefix(LOG_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(LOG_SUFFIX)?
        .strip_suffix('.')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Remove rotated application logs older than `days`
///
/// Returns the number of files deleted.
pub fn cleanup_logs_older_than(log_dir: &Path, days: i64) -> anyhow::Result<usize> {
    let cutoff = Local::now() - chrono::Duration::days(days);
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(&app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = log_file_date(name) else {
            continue;
        };
        let expired = date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| Local.from_local_datetime(&midnight).single())
            .is_some_and(|at| at < cutoff);
        if expired {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Remove application logs past the retention window
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    cleanup_logs_older_than(log_dir, RETENTION_DAYS)
}

/// Initialize logging
///
/// # Arguments
/// * `level` - Log level used when `RUST_LOG` is unset (e.g. "info", "debug")
/// * `json_format` - JSON lines instead of the human-readable format
/// * `log_dir` - Directory for the rotating file; console only when `None`
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let log_dir = Path::new(dir);
            let app_log_dir = log_dir.join("app");
            fs::create_dir_all(&app_log_dir)
                .with_context(|| format!("creating log directory {}", app_log_dir.display()))?;

            let app_log = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_PREFIX)
                .filename_suffix(LOG_SUFFIX)
                .build(&app_log_dir)
                .context("creating rolling log file")?;

            let layer = if json_format {
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::sync::Mutex::new(app_log))
                    .boxed()
            } else {
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(app_log))
                    .boxed()
            };

            cleanup_old_logs(log_dir)?;
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(periodic_cleanup(log_dir.to_path_buf()));
            }
            Some(layer)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("installing the global subscriber")?;
    Ok(())
}

/// Periodic cleanup task - runs every hour
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}
