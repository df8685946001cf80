//! Structured logging setup.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const TRACE_ENV: &str = "PREFIXSEL_TRACE";
pub const FORMAT_ENV: &str = "PREFIXSEL_LOG_FORMAT";
pub const FILE_ENV: &str = "PREFIXSEL_LOG_FILE";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("[LOG_INVALID_FILTER] Invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("[LOG_INVALID_FORMAT] Invalid PREFIXSEL_LOG_FORMAT {0:?} (expected 'json' or 'pretty')")]
    InvalidFormat(String),
    #[error("[LOG_FILE] Failed to open log file: {0}")]
    File(#[from] io::Error),
    #[error("[LOG_INIT] Failed to initialize logging: {0}")]
    Init(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

fn parse_format(value: &str) -> Result<LogFormat, LoggingError> {
    if value.eq_ignore_ascii_case("pretty") {
        Ok(LogFormat::Pretty)
    } else if value.eq_ignore_ascii_case("json") {
        Ok(LogFormat::Json)
    } else {
        Err(LoggingError::InvalidFormat(value.to_string()))
    }
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()))
    } else {
        EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
    }
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber. Events go to stderr, and also to
/// `PREFIXSEL_LOG_FILE` when set.
///
/// The level is `level`, else `PREFIXSEL_TRACE`, else `off`. Returns false
/// when a subscriber was already installed.
pub fn init_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(TRACE_ENV).ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;
    let format = parse_format(&env::var(FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string()))?;
    let log_file = env::var(FILE_ENV).ok().map(|path| open_log_file(&path)).transpose()?;
    let init_err = |err: tracing_subscriber::util::TryInitError| LoggingError::Init(err.to_string());

    match format {
        LogFormat::Json => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .json();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(file) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .json();
                base.with(file_layer).try_init().map_err(init_err)?;
            } else {
                base.try_init().map_err(init_err)?;
            }
        }
        LogFormat::Pretty => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .pretty();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(file) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .pretty();
                base.with(file_layer).try_init().map_err(init_err)?;
            } else {
                base.try_init().map_err(init_err)?;
            }
        }
    }
    Ok(true)
}
