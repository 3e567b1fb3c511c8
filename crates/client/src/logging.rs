//! Tracing setup for the client binary.
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Platform cache directory for client logs.
///
/// - macOS: `~/Library/Caches/chohan/logs`
/// - Linux: `~/.cache/chohan/logs` (or `$XDG_CACHE_HOME/chohan/logs`)
/// - Windows: `%LOCALAPPDATA%\chohan\cache\logs`
/// - Fallback: `/tmp/chohan/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "chohan")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/chohan"))
        .join("logs")
}

/// Installs a stderr layer and a per-room file layer.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole run.
pub fn setup_logging(room: &str) -> Result<WorkerGuard> {
    let room_dir = log_dir().join(room);
    std::fs::create_dir_all(&room_dir)
        .with_context(|| format!("failed to create log directory {}", room_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&room_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking_file).with_ansi(false))
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!(room, log_file = %room_dir.join("client.log").display(), "logging initialized");
    Ok(guard)
}
