use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Parser;

use crate::{
    error::ReportError,
    types::{DateRange, Repo, ReportSpec, SearchRequest},
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Parser, Debug)]
#[command(
    name = "prdigest",
    about = "Render a month-by-month markdown list of the pull requests an author opened in a GitHub repository"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// GitHub username whose pull requests are listed
    #[arg(short = 'a', long, value_name = "USERNAME")]
    pub author: Option<String>,

    /// GitHub token (falls back to GITHUB_TOKEN, then GH_TOKEN)
    #[arg(
        short = 't',
        long,
        value_name = "TOKEN",
        env = "GITHUB_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// GitHub repository in format 'owner/repo'
    #[arg(short = 'r', long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Only include PRs created at or after this date (YYYY-MM-DD or RFC 3339)
    #[arg(short = 's', long, value_name = "DATE", value_parser = parse_date)]
    pub start: Option<DateTime<Utc>>,

    /// Only include PRs created at or before this date (YYYY-MM-DD or RFC 3339)
    #[arg(short = 'e', long, value_name = "DATE", value_parser = parse_date)]
    pub end: Option<DateTime<Utc>>,

    /// Write the report to this file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Parses a date bound. A bare `YYYY-MM-DD` means midnight UTC on that day.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, ReportError> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ReportError::InvalidDate {
            value: value.to_string(),
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn create_report_spec(cli: CliArgs) -> Result<ReportSpec> {
    let repo_arg = non_blank(cli.repo).ok_or(ReportError::MissingArgument("repo"))?;
    let repo = Repo::parse(&repo_arg).map_err(|source| ReportError::InvalidRepo {
        value: repo_arg.clone(),
        source,
    })?;

    let author = non_blank(cli.author).ok_or(ReportError::MissingArgument("author"))?;

    let token = non_blank(cli.token).or_else(|| non_blank(std::env::var("GH_TOKEN").ok()));

    let range = DateRange::new(cli.start, cli.end)?;

    Ok(ReportSpec {
        search: SearchRequest { repo, author },
        token,
        range,
        output: cli.output,
    })
}

/// Parses command-line arguments into a report specification.
///
/// clap errors (including `--help` and `--version`) are returned as
/// `clap::Error` inside the `anyhow::Error` so the caller can decide how to
/// print them and which exit code to use.
pub fn parse_args<I, T>(args: I) -> Result<ReportSpec>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    create_report_spec(cli)
}
