use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, LINK};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::ReportError,
    types::{Forge, PullRequest, Repo, SearchPage, SearchRequest},
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;

const API_URL_ENV: &str = "PRDIGEST_API_URL";
const HTTP_TIMEOUT_ENV: &str = "PRDIGEST_HTTP_TIMEOUT_SECS";
const USER_AGENT: &str = concat!("prdigest/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct SearchQueryBuilder {
    terms: Vec<String>,
}

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn repo(&mut self, repo: &Repo) -> &mut Self {
        self.terms.push(format!("repo:{}", repo));
        self
    }

    pub fn pr_type(&mut self) -> &mut Self {
        self.terms.push("type:pr".to_string());
        self
    }

    pub fn author(&mut self, author: &str) -> &mut Self {
        self.terms.push(format!("author:{}", author));
        self
    }

    pub fn build(&self) -> String {
        self.terms.join(" ")
    }
}

impl Default for SearchQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the issue-search query for a request, e.g.
/// `repo:owner/name type:pr author:alice`.
pub fn build_search_query(request: &SearchRequest) -> String {
    SearchQueryBuilder::new()
        .repo(&request.repo)
        .pr_type()
        .author(&request.author)
        .build()
}

/// Extracts the `rel="next"` target from a `Link` header value.
///
/// The header is a comma-separated list of `<url>; rel="relation"` entries;
/// `rel` may hold several space-separated relations.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rel| {
                    rel.trim_matches('"')
                        .split_whitespace()
                        .any(|r| r.eq_ignore_ascii_case("next"))
                })
                .unwrap_or(false)
        });

        is_next.then(|| url.to_string())
    })
}

fn parse_timeout_secs(value: &str) -> Option<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(err) => {
            warn!(value, error = %err, "Ignoring invalid {HTTP_TIMEOUT_ENV}");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    items: Vec<PullRequest>,
}

/// GitHub REST issue-search client.
#[derive(Debug, Clone)]
pub struct GitHub {
    client: reqwest::Client,
    search_url: Url,
    token: Option<String>,
}

impl GitHub {
    pub fn new(token: Option<String>) -> Result<Self, ReportError> {
        Self::with_api_url(DEFAULT_API_URL, token, None)
    }

    /// Creates a client honouring `PRDIGEST_API_URL` and
    /// `PRDIGEST_HTTP_TIMEOUT_SECS`.
    pub fn from_env(token: Option<String>) -> Result<Self, ReportError> {
        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = std::env::var(HTTP_TIMEOUT_ENV)
            .ok()
            .and_then(|s| parse_timeout_secs(&s));

        Self::with_api_url(&api_url, token, timeout)
    }

    pub fn with_api_url(
        api_url: &str,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ReportError> {
        let invalid = |source: url::ParseError| ReportError::InvalidApiUrl {
            value: api_url.to_string(),
            source,
        };

        // Url::join drops the last path segment unless the base ends in '/'.
        let base = format!("{}/", api_url.trim_end_matches('/'));
        let search_url = Url::parse(&base)
            .and_then(|base| base.join("search/issues"))
            .map_err(invalid)?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            search_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn fetch_page(
        &self,
        request: &SearchRequest,
        page: u32,
    ) -> Result<SearchPage, ReportError> {
        let query = build_search_query(request);
        let page_param = page.to_string();
        let per_page_param = PER_PAGE.to_string();

        debug!(url = %self.search_url, query = %query, page, "Searching pull requests");

        let mut builder = self
            .client
            .get(self.search_url.clone())
            .header(ACCEPT, "application/vnd.github.v3+json")
            .query(&[
                ("q", query.as_str()),
                ("sort", "created"),
                ("order", "desc"),
                ("per_page", per_page_param.as_str()),
                ("page", page_param.as_str()),
            ]);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();

        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_next_link);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Api { status, body });
        }

        let body = response.text().await?;
        let result: SearchResponse =
            serde_json::from_str(&body).map_err(ReportError::MalformedResponse)?;

        debug!(
            page,
            items = result.items.len(),
            total_count = result.total_count,
            has_next = next.is_some(),
            "Received search page"
        );

        Ok(SearchPage {
            items: result.items,
            next,
        })
    }
}
