use std::future::Future;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

use super::query::{SearchKind, SearchQuery, VIEWER_QUERY};
use super::types::{
    AuthoredNode, GraphqlResponse, PullRequestRecord, ReviewedNode, ReviewedRecord, SearchData,
    SearchPage, SearchResults, ViewerData,
};
use super::{ActivitySource, GitHubError};
use crate::config::Config;

/// Maximum number of results a single GitHub search can return,
/// regardless of how many items actually match.
pub const SEARCH_RESULT_CAP: u64 = 1000;

/// Hard stop for a pagination loop whose cursor never runs out.
pub const MAX_PAGES: usize = 100;

const USER_AGENT: &str = "gh-activity";
const UNREADABLE_BODY: &str = "<response body could not be read>";

/// Classify a non-success HTTP status.
fn status_error(status: StatusCode, body: String) -> GitHubError {
    if status == StatusCode::UNAUTHORIZED {
        GitHubError::Unauthorized {
            status: status.as_u16(),
        }
    } else {
        GitHubError::Status {
            status: status.as_u16(),
            body,
        }
    }
}

/// Unwrap the `data` of a GraphQL response. Errors alongside data are
/// logged and the data is kept; errors without data fail the query.
fn into_data<D>(body: GraphqlResponse<D>) -> Result<D, GitHubError> {
    let messages: Vec<String> = body
        .errors
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.message)
        .collect();

    match body.data {
        Some(data) => {
            if !messages.is_empty() {
                warn!(errors = %messages.join("; "), "GraphQL response carried partial errors");
            }
            Ok(data)
        }
        None if !messages.is_empty() => Err(GitHubError::Query(messages.join("; "))),
        None => Err(GitHubError::MissingData),
    }
}

/// Drain a paginated search connection, one page at a time.
///
/// `fetch_page` receives the cursor of the previous page (`None` for the
/// first request). Pages are requested strictly in sequence because each
/// cursor comes from the preceding response. The result is flagged
/// `capped` when the search hit GitHub's result cap or the page limit.
pub async fn paginate<N, T, F, Fut>(
    kind: SearchKind,
    mut fetch_page: F,
) -> Result<SearchResults<T>, GitHubError>
where
    T: From<N>,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<SearchPage<N>, GitHubError>>,
{
    let mut records: Vec<T> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut total_count = 0u64;
    let mut pages = 0usize;
    let mut page_limit_hit = false;

    loop {
        if pages == MAX_PAGES {
            warn!(%kind, pages, "hit maximum page limit, stopping pagination");
            page_limit_hit = true;
            break;
        }

        let page = fetch_page(cursor.take()).await?;
        pages += 1;
        total_count = page.issue_count;

        let page_len = page.nodes.len();
        records.extend(page.nodes.into_iter().flatten().map(T::from));
        info!(%kind, fetched = records.len(), total = total_count, "fetched search page");

        if page_len == 0 {
            debug!(%kind, "empty page, stopping pagination");
            break;
        }
        match page.page_info.end_cursor {
            Some(next) if page.page_info.has_next_page => cursor = Some(next),
            _ => {
                debug!(%kind, pages, "last page reached");
                break;
            }
        }
    }

    let reached = total_count.max(records.len() as u64);
    let capped = page_limit_hit || reached >= SEARCH_RESULT_CAP;
    if capped {
        warn!(
            %kind,
            fetched = records.len(),
            total = total_count,
            cap = SEARCH_RESULT_CAP,
            "search result cap reached, results may be incomplete"
        );
    }

    Ok(SearchResults {
        records,
        total_count,
        capped,
    })
}

/// GraphQL client for the GitHub API.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    page_size: u32,
}

impl GitHubClient {
    /// Fails with `MissingToken` before any request is made when no token
    /// is configured.
    pub fn new(config: &Config) -> Result<Self, GitHubError> {
        let token = config.github_token().ok_or(GitHubError::MissingToken)?;
        Ok(Self {
            http: reqwest::Client::new(),
            api_url: config.github.api_url.clone(),
            token,
            page_size: config.page_size(),
        })
    }

    async fn post<D: DeserializeOwned>(&self, document: &str, variables: Value) -> Result<D, GitHubError> {
        let response = self
            .http
            .post(&self.api_url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .json(&json!({
                "query": document,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(error = %err, "failed to read error response body");
                    UNREADABLE_BODY.to_string()
                }
            };
            return Err(status_error(status, body));
        }

        let body: GraphqlResponse<D> = response.json().await?;
        into_data(body)
    }

    async fn search<N, T>(&self, query: &SearchQuery) -> Result<SearchResults<T>, GitHubError>
    where
        N: DeserializeOwned,
        T: From<N>,
    {
        let search_string = query.search_string();
        let document = query.document();
        let client = self;
        debug!(search = %search_string, "starting search");

        paginate(query.kind, |after| {
            let mut variables = Map::new();
            variables.insert("searchQuery".to_string(), json!(search_string));
            variables.insert("first".to_string(), json!(client.page_size));
            variables.insert("after".to_string(), json!(after));
            if query.kind == SearchKind::Reviewed {
                variables.insert("login".to_string(), json!(query.login));
            }
            async move {
                let data: SearchData<N> = client.post(document, Value::Object(variables)).await?;
                Ok(data.search)
            }
        })
        .await
    }
}

#[async_trait]
impl ActivitySource for GitHubClient {
    #[instrument(skip(self))]
    async fn viewer_login(&self) -> Result<String, GitHubError> {
        let data: ViewerData = self.post(VIEWER_QUERY, json!({})).await?;
        debug!(login = %data.viewer.login, "resolved authenticated user");
        Ok(data.viewer.login)
    }

    #[instrument(skip(self, query), fields(login = %query.login))]
    async fn search_authored(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchResults<PullRequestRecord>, GitHubError> {
        self.search::<AuthoredNode, PullRequestRecord>(query).await
    }

    #[instrument(skip(self, query), fields(login = %query.login))]
    async fn search_reviewed(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchResults<ReviewedRecord>, GitHubError> {
        self.search::<ReviewedNode, ReviewedRecord>(query).await
    }
}
