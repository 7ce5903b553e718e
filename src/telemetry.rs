//! Tracing setup.
//!
//! The terminal belongs to the UI, so logs are appended to a file instead of
//! stderr. `log_filter` takes the usual `EnvFilter` directives
//! (e.g. `"info,video_quiz::service=debug"`); `log_format` picks pretty or
//! JSON lines.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::error::AppError;

pub fn init_tracing(config: &Config) -> Result<(), AppError> {
    let path = config.log_file_path();
    init_to_file(&config.log_filter, config.log_format, &path)
}

fn init_to_file(filter: &str, format: LogFormat, path: &Path) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| AppError::Telemetry(format!("invalid log filter {filter:?}: {e}")))?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| AppError::Telemetry(e.to_string()))
}
