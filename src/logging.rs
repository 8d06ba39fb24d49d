//! Log file setup
//!
//! The terminal form owns stdout, so all tracing output goes to
//! `txcast.log` in the configured log directory. The file is truncated at
//! start-up and written through a non-blocking appender whose guard is kept
//! here until [`flush`] is called.

use crate::config::AppConfig;
use crate::error::{Result, TxCastError};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "txcast.log";

/// Keeps the appender's background writer alive
static GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();

pub fn log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

/// Filter from `RUST_LOG`, falling back to the configured level
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Returns the log file path.
pub fn init(config: &AppConfig) -> Result<PathBuf> {
    // Refuse before touching the file a running subscriber may be writing
    if tracing::dispatcher::has_been_set() {
        return Err(TxCastError::Logging(
            "a global subscriber is already installed".to_string(),
        ));
    }

    let dir = config.log_directory();
    fs::create_dir_all(&dir)
        .map_err(|e| TxCastError::Logging(format!("{}: {}", dir.display(), e)))?;

    let path = log_path(&dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|file| file.set_len(0).map(|_| file)) // Start fresh each run
        .map_err(|e| TxCastError::Logging(format!("{}: {}", path.display(), e)))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_thread_names(true),
        )
        .try_init()
        .map_err(|e| TxCastError::Logging(e.to_string()))?;

    *GUARD.get_or_init(|| Mutex::new(None)).lock() = Some(guard);

    tracing::info!(version = crate::VERSION, path = %path.display(), "txcast starting up");
    Ok(path)
}

/// Flush pending log lines. Later events are dropped.
pub fn flush() {
    if let Some(guard) = GUARD.get() {
        guard.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lives_in_configured_dir() {
        let config = AppConfig {
            log_dir: Some(PathBuf::from("/var/tmp/txcast-logs")),
            ..Default::default()
        };
        assert_eq!(
            log_path(&config.log_directory()),
            PathBuf::from("/var/tmp/txcast-logs/txcast.log")
        );
    }

    #[test]
    fn init_creates_log_file_once() {
        let dir = std::env::temp_dir().join(format!("txcast-log-{}", std::process::id()));
        let config = AppConfig {
            log_dir: Some(dir.clone()),
            ..Default::default()
        };

        let path = init(&config).unwrap();
        assert_eq!(path, dir.join(LOG_FILE_NAME));
        assert!(path.is_file());

        // A second init is refused and leaves the running log intact
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        std::io::Write::write_all(&mut file, b"marker line\n").unwrap();
        drop(file);

        assert!(matches!(init(&config), Err(TxCastError::Logging(_))));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("marker line"));
        flush();
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn flush_without_init_is_harmless() {
        flush();
    }
}
