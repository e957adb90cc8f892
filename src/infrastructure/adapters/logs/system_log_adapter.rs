/*
System Log Adapter

Installs the global tracing subscriber from LoggingSettings: an optional console layer, an
optional daily rolling file layer written through a non-blocking worker, and an env filter.
`RUST_LOG` takes precedence over the configured level when it is set.

Uses tracing-subscriber for structured logging and tracing-appender for file rotation.
The returned WorkerGuard must be held for as long as file logging is needed; dropping it
flushes and stops the background writer.
*/

use crate::config::application_settings::{LogFormat, LoggingSettings};
use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid log file path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

pub type LogResult<T> = Result<T, LogError>;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(settings: &LoggingSettings) -> LogResult<Option<WorkerGuard>> {
    let filter = build_filter(settings)?;
    let (layers, guard) = build_layers(settings)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::Init(e.to_string()))?;

    Ok(guard)
}

fn build_filter(settings: &LoggingSettings) -> LogResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level).map_err(|e| LogError::InvalidFilter(e.to_string()))
}

fn build_layers(settings: &LoggingSettings) -> LogResult<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if settings.console {
        let layer = match settings.format {
            LogFormat::Json => fmt::layer().json().with_current_span(false).boxed(),
            LogFormat::Text => fmt::layer().with_target(true).boxed(),
        };
        layers.push(layer);
    }

    let guard = match &settings.file_path {
        Some(path) => {
            let (directory, prefix) = split_log_path(path)?;
            std::fs::create_dir_all(directory)?;

            let (writer, guard) = non_blocking(rolling::daily(directory, prefix));
            let layer = match settings.format {
                LogFormat::Json => fmt::layer().json().with_writer(writer).with_ansi(false).boxed(),
                LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
            };
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    Ok((layers, guard))
}

/// Splits `logs/clearpass.log` into the directory and the rolling file prefix
fn split_log_path(path: &Path) -> LogResult<(&Path, &str)> {
    let prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LogError::InvalidPath(path.display().to_string()))?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((directory, prefix))
}
