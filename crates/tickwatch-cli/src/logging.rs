//! File-only logging.
//!
//! stdout belongs to the ticker display, so events go to a daily-rolling
//! file under the log directory (`tickwatch.YYYY-MM-DD`). The level comes
//! from `RUST_LOG` and defaults to `info`.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

const LOG_FILE_PREFIX: &str = "tickwatch";

/// Install the global subscriber. The returned guard flushes buffered
/// events on drop and must live until exit.
pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard, CliError> {
    fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|error| CliError::Logging(error.to_string()))?;

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_log_directory() {
        let root = tempfile::tempdir().expect("tempdir");
        let dir = root.path().join("nested").join("logs");

        let _guard = init_logging(&dir).expect("first init succeeds");
        assert!(dir.is_dir());
    }
}
