//! Prdigest: monthly markdown digest of a user's pull requests.
//!
//! Searches a repository for every pull request opened by one author,
//! narrows the results to a creation-date window, and renders them as a
//! markdown document grouped by month, newest month first.

pub mod cli;
pub mod error;
pub mod github;
pub mod output;
pub mod query;
pub mod report;
pub mod types;

pub use cli::parse_args;
pub use error::ReportError;
pub use github::GitHub;
pub use output::write_report;
pub use query::{fetch_pull_requests, filter_by_date};
pub use report::{MonthBucket, group_by_month, render_markdown};
pub use types::{
    DateRange, Forge, PullRequest, Repo, RepoError, ReportSpec, SearchPage, SearchRequest,
};
