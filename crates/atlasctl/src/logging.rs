//! Tracing setup: console stream plus a persistent log file

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file written in the working directory unless overridden
pub const DEFAULT_LOG_FILE: &str = "atlasctl.log";

/// File log records everything the operations report, regardless of `-v`
const FILE_FILTER: &str = "atlasctl=info,atlasctl_core=info";

/// Keeps the file writer flushing until dropped at the end of `main`
#[derive(Debug)]
pub struct LoggingGuard {
    _guard: Option<WorkerGuard>,
}

/// Console filter: `RUST_LOG` wins, otherwise the `-v` count
fn console_filter(verbose: u8) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(console_directives(verbose))
    }
}

fn console_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "atlasctl=warn,atlasctl_core=warn",
        1 => "atlasctl=info,atlasctl_core=info",
        2 => "atlasctl=debug,atlasctl_core=debug",
        _ => "atlasctl=trace,atlasctl_core=trace",
    }
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!(
                "Warning: failed to open log file {}: {}",
                path.display(),
                err
            );
            None
        }
    }
}

pub fn init_tracing(verbose: u8, log_file: Option<&str>) -> LoggingGuard {
    let path = PathBuf::from(log_file.unwrap_or(DEFAULT_LOG_FILE));

    let (file_layer, guard) = match open_log_file(&path) {
        Some(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .with_filter(EnvFilter::new(FILE_FILTER));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact()
        .with_filter(console_filter(verbose));

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
    LoggingGuard { _guard: guard }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_directives_by_verbosity() {
        assert!(console_directives(0).contains("=warn"));
        assert!(console_directives(1).contains("=info"));
        assert!(console_directives(2).contains("=debug"));
        assert!(console_directives(7).contains("=trace"));
    }

    #[test]
    fn test_open_log_file_in_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(open_log_file(&dir.path().join("missing/atlasctl.log")).is_none());
        assert!(open_log_file(&dir.path().join("atlasctl.log")).is_some());
    }
}
