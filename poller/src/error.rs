//! Unified error types for the commitwatch poller
//!
//! This module defines error types for each layer:
//! - `GithubError`: GitHub API client errors
//! - `DateError`: timestamp parsing errors
//! - `FeedError`: feed document errors (formatting, I/O)
//! - `ConfigError`: environment configuration errors
//! - `AppError`: driver errors (wraps the layers above)

use std::path::PathBuf;

use thiserror::Error;

/// GitHub API client errors
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized - invalid token")]
    Unauthorized,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Timestamp could not be turned into a publication date
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid timestamp: {input:?}")]
    Invalid { input: String },
}

/// Feed document errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] DateError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML error: {0}")]
    Xml(String),
}

impl FeedError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FeedError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Driver errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GitHub error: {0}")]
    Github(#[from] GithubError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
}
