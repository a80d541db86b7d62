use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_LEVEL_ENV: &str = "POKEDEX_LOG";
const LOG_FILE_NAME: &str = "pokedex.log";

/// Default log location: `<data_local_dir>/pokedex-tui/pokedex.log`.
pub fn default_log_file() -> PathBuf {
    let base = dirs_next::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("pokedex-tui").join(LOG_FILE_NAME)
}

/// Routes `tracing` output into `path`. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr.
///
/// The returned guard flushes buffered lines on drop and must be kept alive
/// for the lifetime of the app.
pub fn init_logger(path: &Path) -> io::Result<WorkerGuard> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(guard)
}

/// Like [`init_logger`], but a failure only costs diagnostics. The reason is
/// printed once to stderr, before the UI takes over the terminal.
pub fn init_logger_or_report(path: &Path) -> Option<WorkerGuard> {
    match init_logger(path) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("pokedex: logging disabled ({}): {err}", path.display());
            None
        }
    }
}
