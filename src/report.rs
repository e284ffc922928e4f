use std::collections::BTreeMap;

use crate::types::PullRequest;

pub const REPORT_HEADING: &str = "## All PRs";

/// Pull requests created in the same calendar month (UTC).
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// Sortable `YYYY-MM` key.
    pub key: String,
    /// Display label, e.g. `Mar 2024`.
    pub label: String,
    pub prs: Vec<PullRequest>,
}

/// Groups pull requests by creation month, newest month first.
///
/// Within a bucket the input order is preserved.
pub fn group_by_month(prs: &[PullRequest]) -> Vec<MonthBucket> {
    let mut by_month: BTreeMap<String, MonthBucket> = BTreeMap::new();

    for pr in prs {
        let key = pr.created_at.format("%Y-%m").to_string();
        by_month
            .entry(key.clone())
            .or_insert_with(|| MonthBucket {
                key,
                label: pr.created_at.format("%b %Y").to_string(),
                prs: Vec::new(),
            })
            .prs
            .push(pr.clone());
    }

    by_month.into_values().rev().collect()
}

/// Renders buckets as markdown: a report heading, then one `###` section
/// per month with a numbered list of links. Titles are emitted verbatim.
pub fn render_markdown(buckets: &[MonthBucket]) -> String {
    let mut markdown = format!("{REPORT_HEADING}\n\n");

    for bucket in buckets {
        markdown.push_str(&format!("### {}\n\n", bucket.label));
        for (index, pr) in bucket.prs.iter().enumerate() {
            markdown.push_str(&format!("{}. [{}]({})\n", index + 1, pr.title, pr.url));
        }
        markdown.push('\n');
    }

    markdown
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn pr(number: u64, y: i32, m: u32, d: u32) -> PullRequest {
        PullRequest {
            title: format!("PR {number}"),
            url: format!("https://github.com/owner/repo/pull/{number}"),
            created_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(render_markdown(&group_by_month(&[])), "## All PRs\n\n");
    }

    #[test]
    fn test_two_prs_same_month() {
        let prs = vec![
            PullRequest {
                title: "Add `--json` flag & *fix* [docs]".to_string(),
                url: "https://github.com/owner/repo/pull/7".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 20, 8, 0, 0).unwrap(),
            },
            PullRequest {
                title: "Bump deps".to_string(),
                url: "https://github.com/owner/repo/pull/5".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap(),
            },
        ];

        let buckets = group_by_month(&prs);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].key, "2024-03");
        assert_eq!(buckets[0].label, "Mar 2024");

        assert_eq!(
            render_markdown(&buckets),
            "## All PRs\n\n\
             ### Mar 2024\n\n\
             1. [Add `--json` flag & *fix* [docs]](https://github.com/owner/repo/pull/7)\n\
             2. [Bump deps](https://github.com/owner/repo/pull/5)\n\
             \n"
        );
    }

    #[test]
    fn test_buckets_sorted_descending() {
        // Deliberately out of order across years and months.
        let prs = vec![
            pr(1, 2023, 11, 1),
            pr(2, 2024, 2, 14),
            pr(3, 2023, 2, 1),
            pr(4, 2024, 10, 3),
            pr(5, 2024, 2, 1),
        ];

        let buckets = group_by_month(&prs);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-10", "2024-02", "2023-11", "2023-02"]);

        for pair in buckets.windows(2) {
            assert!(pair[0].key > pair[1].key);
        }
    }

    #[test]
    fn test_grouping_is_stable() {
        let prs = vec![pr(9, 2024, 2, 28), pr(3, 2024, 1, 5), pr(8, 2024, 2, 1)];
        let buckets = group_by_month(&prs);

        assert_eq!(buckets[0].label, "Feb 2024");
        let titles: Vec<&str> = buckets[0].prs.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["PR 9", "PR 8"]);
        assert_eq!(buckets[1].label, "Jan 2024");
    }

    #[test]
    fn test_numbering_restarts_per_bucket() {
        let prs = vec![pr(1, 2024, 5, 3), pr(2, 2024, 5, 1), pr(3, 2024, 4, 30)];
        let markdown = render_markdown(&group_by_month(&prs));

        assert_eq!(
            markdown,
            "## All PRs\n\n\
             ### May 2024\n\n\
             1. [PR 1](https://github.com/owner/repo/pull/1)\n\
             2. [PR 2](https://github.com/owner/repo/pull/2)\n\
             \n\
             ### Apr 2024\n\n\
             1. [PR 3](https://github.com/owner/repo/pull/3)\n\
             \n"
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let buckets = group_by_month(&[pr(1, 2024, 1, 1), pr(2, 2023, 12, 31)]);
        assert_eq!(render_markdown(&buckets), render_markdown(&buckets));
    }
}
