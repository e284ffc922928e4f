use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ReportError;

/// Reasons an `owner/name` repository identifier can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    MissingSeparator,
    TooManySegments,
    EmptyOwner,
    EmptyName,
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::MissingSeparator => write!(f, "expected 'owner/repo'"),
            RepoError::TooManySegments => write!(f, "expected exactly one '/'"),
            RepoError::EmptyOwner => write!(f, "owner must not be empty"),
            RepoError::EmptyName => write!(f, "repository name must not be empty"),
        }
    }
}

impl std::error::Error for RepoError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into();
        let name = name.into();
        if owner.trim().is_empty() {
            return Err(RepoError::EmptyOwner);
        }
        if name.trim().is_empty() {
            return Err(RepoError::EmptyName);
        }
        Ok(Self { owner, name })
    }

    pub fn parse(value: &str) -> Result<Self, RepoError> {
        let mut parts = value.trim().split('/');
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().ok_or(RepoError::MissingSeparator)?;
        if parts.next().is_some() {
            return Err(RepoError::TooManySegments);
        }
        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// What to search for: pull requests opened by `author` in `repo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub repo: Repo,
    pub author: String,
}

/// The subset of a search result item the report needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequest {
    pub title: String,
    #[serde(rename = "html_url")]
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// One page of search results and the link to the page after it.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<PullRequest>,
    /// Target of the `rel="next"` link. Only its presence drives paging;
    /// the URL itself is kept for logging.
    pub next: Option<String>,
}

/// Inclusive creation-date window. Missing bounds default to the Unix epoch
/// and to "now" at the moment the filter runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, ReportError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ReportError::InvalidDateRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.start.unwrap_or(DateTime::UNIX_EPOCH),
            self.end.unwrap_or(now),
        )
    }

    pub fn contains(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds(now);
        start <= created_at && created_at <= end
    }
}

/// Everything a single report run needs, as parsed from the command line.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub search: SearchRequest,
    pub token: Option<String>,
    pub range: DateRange,
    pub output: Option<PathBuf>,
}

/// Source of paged pull request search results.
#[async_trait]
pub trait Forge {
    async fn fetch_page(
        &self,
        request: &SearchRequest,
        page: u32,
    ) -> Result<SearchPage, ReportError>;
}
