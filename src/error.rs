use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Why a rental table could not be produced.
///
/// Every variant renders a message fit for the status line; the caller treats
/// all of them as "no data available".
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not fetch '{url}': {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed Arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: unparseable date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: date {date} appears more than once")]
    DuplicateDate { row: usize, date: NaiveDate },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

/// A factor name outside {temperature, humidity, windspeed}.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weather factor '{0}' (expected temperature, humidity or windspeed)")]
pub struct InvalidFactorError(pub String);

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable is set but cannot be interpreted.
    #[error("invalid value '{value}' for environment variable {name}")]
    InvalidEnvVar { name: &'static str, value: String },
}
