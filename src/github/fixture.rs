use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::paginate;
use super::query::SearchQuery;
use super::types::{AuthoredNode, PullRequestRecord, ReviewedNode, ReviewedRecord, SearchPage, SearchResults};
use super::{ActivitySource, GitHubError};

pub const MOCK_LOGIN: &str = "octocat";

/// Serves search results from recorded GraphQL search pages instead of
/// the network. Backs `--mock`.
pub struct FixtureSource {
    login: String,
    authored_json: String,
    reviewed_json: String,
}

impl FixtureSource {
    pub fn new(login: &str, authored_json: &str, reviewed_json: &str) -> Self {
        Self {
            login: login.to_string(),
            authored_json: authored_json.to_string(),
            reviewed_json: reviewed_json.to_string(),
        }
    }

    /// The sample pages bundled into the binary.
    pub fn embedded() -> Self {
        Self::new(
            MOCK_LOGIN,
            include_str!("../../tests/fixtures/authored.json"),
            include_str!("../../tests/fixtures/reviewed.json"),
        )
    }

    async fn replay<N, T>(&self, query: &SearchQuery, json: &str) -> Result<SearchResults<T>, GitHubError>
    where
        N: DeserializeOwned,
        T: From<N>,
    {
        let page: SearchPage<N> = serde_json::from_str(json)?;
        let mut pages = vec![page].into_iter();
        paginate(query.kind, move |_| {
            let next = pages.next().ok_or(GitHubError::MissingData);
            async move { next }
        })
        .await
    }
}

#[async_trait]
impl ActivitySource for FixtureSource {
    async fn viewer_login(&self) -> Result<String, GitHubError> {
        Ok(self.login.clone())
    }

    async fn search_authored(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchResults<PullRequestRecord>, GitHubError> {
        let mut results = self
            .replay::<AuthoredNode, PullRequestRecord>(query, &self.authored_json)
            .await?;
        results
            .records
            .retain(|r| query.period.contains(r.created_at.date_naive()));
        debug!(records = results.records.len(), "replayed authored fixture");
        Ok(results)
    }

    async fn search_reviewed(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchResults<ReviewedRecord>, GitHubError> {
        let mut results = self
            .replay::<ReviewedNode, ReviewedRecord>(query, &self.reviewed_json)
            .await?;
        results
            .records
            .retain(|r| query.period.contains(r.created_at.date_naive()));
        debug!(records = results.records.len(), "replayed reviewed fixture");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::period::Period;

    #[tokio::test]
    async fn test_embedded_fixtures_parse() {
        let source = FixtureSource::embedded();
        let period = Period::parse("2025-02-28", "2026-02-02", 0).unwrap();
        let login = source.viewer_login().await.unwrap();
        assert_eq!(login, MOCK_LOGIN);

        let authored = source
            .search_authored(&SearchQuery::authored(&login, &period))
            .await
            .unwrap();
        let reviewed = source
            .search_reviewed(&SearchQuery::reviewed(&login, &period))
            .await
            .unwrap();
        assert_eq!(authored.records.len(), 6);
        assert_eq!(reviewed.records.len(), 5);
        assert!(!authored.capped);
    }

    #[tokio::test]
    async fn test_fixture_respects_period() {
        let source = FixtureSource::embedded();
        let period = Period::parse("2020-01-01", "2020-02-01", 0).unwrap();
        let authored = source
            .search_authored(&SearchQuery::authored(MOCK_LOGIN, &period))
            .await
            .unwrap();
        assert!(authored.records.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_fixture_is_an_error() {
        let source = FixtureSource::new(MOCK_LOGIN, "{ not json", "{}");
        let period = Period::parse("2025-01-01", "2025-02-01", 0).unwrap();
        let result = source
            .search_authored(&SearchQuery::authored(MOCK_LOGIN, &period))
            .await;
        assert!(matches!(result, Err(GitHubError::Fixture(_))));
    }
}
