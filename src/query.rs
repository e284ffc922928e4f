use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    error::ReportError,
    types::{DateRange, Forge, PullRequest, ReportSpec},
};

/// Fetches every pull request matching the report's search, following
/// `next` links until the forge reports no further page.
///
/// Pages are requested one at a time and their items appended in the order
/// received, so the result is page 1 followed by page 2 and so on. Any
/// failure aborts the whole fetch; partial results are never returned.
pub async fn fetch_pull_requests<F>(
    spec: &ReportSpec,
    forge: &F,
) -> Result<Vec<PullRequest>, ReportError>
where
    F: Forge + Sync,
{
    let mut all_prs = Vec::new();
    let mut page = 1;

    loop {
        info!("Fetching page {page}...");
        let result = forge.fetch_page(&spec.search, page).await?;
        all_prs.extend(result.items);

        let Some(next) = result.next else {
            break;
        };
        debug!(next = %next, "Following next link");
        page += 1;
    }

    debug!(pages = page, total = all_prs.len(), "Fetched all pages");
    Ok(all_prs)
}

/// Keeps the pull requests created inside `range`, both ends inclusive.
pub fn filter_by_date(
    prs: Vec<PullRequest>,
    range: &DateRange,
    now: DateTime<Utc>,
) -> Vec<PullRequest> {
    let before = prs.len();
    let filtered: Vec<PullRequest> = prs
        .into_iter()
        .filter(|pr| range.contains(pr.created_at, now))
        .collect();

    debug!(before, after = filtered.len(), "Applied date filter");
    filtered
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn pr_at(title: &str, created_at: DateTime<Utc>) -> PullRequest {
        PullRequest {
            title: title.to_string(),
            url: format!("https://github.com/owner/repo/pull/{title}"),
            created_at,
        }
    }

    #[test]
    fn test_filter_is_inclusive_at_both_ends() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let range = DateRange::new(Some(start), Some(end)).unwrap();

        let prs = vec![
            pr_at("before", start - chrono::Duration::seconds(1)),
            pr_at("at-start", start),
            pr_at("middle", Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()),
            pr_at("at-end", end),
            pr_at("after", end + chrono::Duration::seconds(1)),
        ];

        let titles: Vec<String> = filter_by_date(prs, &range, now)
            .into_iter()
            .map(|pr| pr.title)
            .collect();
        assert_eq!(titles, vec!["at-start", "middle", "at-end"]);
    }

    #[test]
    fn test_filter_without_bounds_keeps_everything_up_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let prs = vec![
            pr_at("epoch", DateTime::UNIX_EPOCH),
            pr_at("recent", now - chrono::Duration::days(1)),
            pr_at("now", now),
            pr_at("future", now + chrono::Duration::days(1)),
        ];

        let titles: Vec<String> = filter_by_date(prs, &DateRange::default(), now)
            .into_iter()
            .map(|pr| pr.title)
            .collect();
        assert_eq!(titles, vec!["epoch", "recent", "now"]);
    }

    #[test]
    fn test_filter_open_ended_start() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let range = DateRange::new(Some(start), None).unwrap();
        let prs = vec![
            pr_at("old", Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()),
            pr_at("new", Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
        ];

        let filtered = filter_by_date(prs, &range, now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "new");
    }
}
