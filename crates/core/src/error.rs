// Error types for the benchmark engine

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for suite-level operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that stop a suite before or while it is set up.
///
/// Individual request failures never show up here; they are folded into
/// `RequestResult`s and counted in the statistics.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Every configured target failed the availability probe
    #[error("no targets available: none of {checked} configured target(s) passed the availability probe")]
    NoTargetsAvailable { checked: usize },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },

    #[error("invalid target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("at least one target must be configured")]
    NoTargets,
}

/// Why a single HTTP exchange did not produce a usable response.
///
/// Only the Display text survives into `RequestResult::error`.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Connection refused, timeout, DNS failure, or the body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was absent or not valid JSON
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A created resource came back without an identifier to chain on
    #[error("decode error: response has no positive integer `id` field")]
    MissingId,
}
