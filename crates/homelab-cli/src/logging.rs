//! Tracing subscriber setup

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use color_eyre::Result;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber
///
/// Logs go to stderr, filtered at `warn` (`debug` with `verbose`) unless
/// `RUST_LOG` is set. With `log_file`, the same events are appended there
/// without ANSI colours. A log file that cannot be opened is reported on
/// stderr and skipped.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file, open_error) = match log_file.map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let file_layer = file.map(|file| fmt::layer().with_ansi(false).with_writer(Arc::new(file)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .try_init()?;

    if let (Some(path), Some(e)) = (log_file, open_error) {
        eprintln!(
            "Warning: cannot open log file {}: {e}; continuing without it",
            path.display()
        );
        warn!(path = %path.display(), error = %e, "log file unavailable");
    }

    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<File> {
    File::options().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homelab.log");
        std::fs::write(&path, "first\n").unwrap();

        drop(open_log_file(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");
    }

    #[test]
    fn test_open_log_file_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_log_file(&dir.path().join("missing/homelab.log")).is_err());
    }
}
