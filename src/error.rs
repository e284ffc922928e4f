use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::RepoError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { value: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Missing required argument --{0}")]
    MissingArgument(&'static str),

    #[error("Invalid repository format '{value}'")]
    InvalidRepo {
        value: String,
        #[source]
        source: RepoError,
    },

    #[error("Invalid API URL '{value}'")]
    InvalidApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Request to GitHub failed")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse search response")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Failed to write to file {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report to stdout")]
    Stdout(#[source] std::io::Error),
}
