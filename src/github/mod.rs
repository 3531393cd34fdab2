pub mod client;
pub mod fixture;
pub mod query;
pub mod types;

pub use client::GitHubClient;
pub use fixture::FixtureSource;
pub use query::{SearchKind, SearchQuery};
pub use types::{PullRequestRecord, ReviewedRecord, SearchResults};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info_span, Instrument};

use crate::activity::period::Period;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub token not found: set GITHUB_TOKEN or GH_TOKEN, or add [github] token to .gh-activity.toml")]
    MissingToken,

    #[error("GitHub API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub rejected the credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("GitHub API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GitHub GraphQL query failed: {0}")]
    Query(String),

    #[error("GitHub API response contained no data")]
    MissingData,

    #[error("Failed to parse fixture data: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Where pull request activity comes from.
/// Implementations must be Send + Sync so both searches can run under tokio::try_join!.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Login of the authenticated user.
    async fn viewer_login(&self) -> Result<String, GitHubError>;

    async fn search_authored(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchResults<PullRequestRecord>, GitHubError>;

    async fn search_reviewed(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchResults<ReviewedRecord>, GitHubError>;
}

/// Raw output of both searches for one run.
#[derive(Debug, Clone)]
pub struct FetchedActivity {
    pub login: String,
    pub authored: SearchResults<PullRequestRecord>,
    pub reviewed: SearchResults<ReviewedRecord>,
}

impl FetchedActivity {
    /// Searches whose results may have been cut short by the result cap.
    pub fn capped_searches(&self) -> Vec<SearchKind> {
        let mut capped = Vec::new();
        if self.authored.capped {
            capped.push(SearchKind::Authored);
        }
        if self.reviewed.capped {
            capped.push(SearchKind::Reviewed);
        }
        capped
    }
}

/// Run the authored and reviewed searches concurrently for `login`.
///
/// Either search failing fails the whole fetch; there is no partial result.
pub async fn fetch_activity(
    source: &dyn ActivitySource,
    login: &str,
    period: &Period,
) -> Result<FetchedActivity, GitHubError> {
    let authored_query = SearchQuery::authored(login, period);
    let reviewed_query = SearchQuery::reviewed(login, period);

    let (authored, reviewed) = tokio::try_join!(
        source
            .search_authored(&authored_query)
            .instrument(info_span!("search", kind = "authored")),
        source
            .search_reviewed(&reviewed_query)
            .instrument(info_span!("search", kind = "reviewed")),
    )?;

    debug!(
        authored = authored.records.len(),
        reviewed = reviewed.records.len(),
        "both searches complete"
    );

    Ok(FetchedActivity {
        login: login.to_string(),
        authored,
        reviewed,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use super::types::PrState;

    pub fn authored_record(repo: &str, state: PrState, additions: u64, deletions: u64) -> PullRequestRecord {
        let created: DateTime<Utc> = "2025-01-02T09:30:00Z".parse().unwrap();
        let merged_at = (state == PrState::Merged).then_some(created);
        PullRequestRecord {
            number: 1,
            title: "Test PR".to_string(),
            url: format!("https://github.com/{}/pull/1", repo),
            state,
            repository: repo.to_string(),
            created_at: created,
            closed_at: merged_at,
            merged_at,
            additions,
            deletions,
        }
    }

    pub fn reviewed_record(repo: &str, author: &str, review_count: u64) -> ReviewedRecord {
        ReviewedRecord {
            number: 2,
            title: "Reviewed PR".to_string(),
            url: format!("https://github.com/{}/pull/2", repo),
            state: PrState::Open,
            repository: repo.to_string(),
            author: author.to_string(),
            created_at: "2025-01-03T12:00:00Z".parse().unwrap(),
            review_count,
        }
    }

    /// Source returning canned results, or failing the reviewed search.
    struct StubSource {
        authored: SearchResults<PullRequestRecord>,
        reviewed: SearchResults<ReviewedRecord>,
        fail_reviewed: bool,
    }

    #[async_trait]
    impl ActivitySource for StubSource {
        async fn viewer_login(&self) -> Result<String, GitHubError> {
            Ok("stub".to_string())
        }

        async fn search_authored(
            &self,
            query: &SearchQuery,
        ) -> Result<SearchResults<PullRequestRecord>, GitHubError> {
            assert_eq!(query.kind, SearchKind::Authored);
            Ok(self.authored.clone())
        }

        async fn search_reviewed(
            &self,
            query: &SearchQuery,
        ) -> Result<SearchResults<ReviewedRecord>, GitHubError> {
            assert_eq!(query.kind, SearchKind::Reviewed);
            if self.fail_reviewed {
                return Err(GitHubError::Unauthorized { status: 401 });
            }
            Ok(self.reviewed.clone())
        }
    }

    fn stub(authored_capped: bool, fail_reviewed: bool) -> StubSource {
        StubSource {
            authored: SearchResults {
                records: vec![authored_record("org/a", PrState::Open, 1, 1)],
                total_count: 1,
                capped: authored_capped,
            },
            reviewed: SearchResults {
                records: vec![reviewed_record("org/b", "alice", 1)],
                total_count: 1,
                capped: false,
            },
            fail_reviewed,
        }
    }

    fn period() -> Period {
        Period::parse("2025-01-01", "2025-01-08", 0).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_activity_collects_both_searches() {
        let fetched = fetch_activity(&stub(false, false), "stub", &period()).await.unwrap();
        assert_eq!(fetched.login, "stub");
        assert_eq!(fetched.authored.records.len(), 1);
        assert_eq!(fetched.reviewed.records.len(), 1);
        assert!(fetched.capped_searches().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_activity_reports_capped_search_without_failing() {
        let fetched = fetch_activity(&stub(true, false), "stub", &period()).await.unwrap();
        assert_eq!(fetched.capped_searches(), vec![SearchKind::Authored]);
        assert_eq!(fetched.authored.records.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_activity_fails_when_either_search_fails() {
        let result = fetch_activity(&stub(false, true), "stub", &period()).await;
        assert!(matches!(result, Err(GitHubError::Unauthorized { status: 401 })));
    }
}
