use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Where log output goes. With neither sink enabled only errors returned
/// from `main` are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub log_file: Option<PathBuf>,
    pub stdout: bool,
}

/// Install the global subscriber. The returned guard flushes the file writer
/// on drop and must be held for the duration of the program.
pub fn init(
    config: &LoggingConfig,
) -> color_eyre::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = config
        .stdout
        .then(|| fmt::layer().with_writer(std::io::stdout).with_target(false));

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let (directory, file_name) = split_log_path(path);
            let file_appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

/// Split a log file path into the directory and file name the appender wants.
/// A bare file name lands in the current directory.
pub fn split_log_path(path: &Path) -> (PathBuf, OsString) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("vassal-deployer.log"));
    (directory, file_name)
}
