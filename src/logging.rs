//! Tracing configuration and log routing.
//!
//! Logs go to stdout using a compact formatter and are appended to the configured log file.
//! The file writer is non-blocking so request handlers never wait on disk.
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Keeps the non-blocking writer alive for the process lifetime via a global guard.
/// - Falls back to stdout only when `log_file` cannot be opened.
pub fn init_tracing(log_file: &Path) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match open_log_file(log_file) {
        Ok(file) => {
            let file_layer = fmt::layer()
                .with_writer(install_writer(file))
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", log_file.display());
            registry.init();
        }
    }
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn install_writer<W>(writer: W) -> NonBlocking
where
    W: std::io::Write + Send + 'static,
{
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);
    let _ = LOG_GUARD.set(guard);
    non_blocking
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn log_file_parents_are_created_and_writes_append() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested/logs/docsum.log");

        writeln!(open_log_file(&path).expect("first open"), "one").expect("write");
        writeln!(open_log_file(&path).expect("second open"), "two").expect("write");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "one\ntwo\n");
    }

    #[test]
    fn directory_as_log_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");

        assert!(open_log_file(dir.path()).is_err());
    }
}
