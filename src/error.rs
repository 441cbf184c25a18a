//! Error types for the collection pipelines.
//!
//! Fatal kinds ([`ConfigError`], [`FetchError`], [`ExtractionError`],
//! [`ExportError`]) abort a run. [`ApiError`] and [`SearchError`] are
//! recoverable: the enrichment and search stages log them and degrade the
//! affected item instead of propagating.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Startup configuration problems, reported before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "YouTube API key is not set. Export YOUTUBE_API_KEY=<your key> or pass --api-key <your key> \
         (keys are created at https://console.cloud.google.com/apis/credentials)"
    )]
    MissingApiKey,
    #[error("Could not read events file {path}: {source}")]
    EventsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid events file {path}: {source}")]
    EventsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to retrieve the leaderboard page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// The page did not have the structure the extractor expects.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Leaderboard table '{selector}' not found in page; the site layout may have changed")]
    TableNotFound { selector: String },
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// A single statistics API call failed.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Could not build API client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("API request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("API returned HTTP {status} ({reason}): {message}")]
    Status {
        status: StatusCode,
        reason: String,
        message: String,
    },
    #[error("Could not decode API response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// Provider-side reason code, e.g. `quotaExceeded`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Status { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid event date '{date}' (expected YYYY-MM-DD): {source}")]
    InvalidDate {
        date: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Writing an output table failed. The previous file at `path`, if any, is untouched.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Any fatal error that ends a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("No runs could be extracted from {url}")]
    NoRuns { url: String },
}
