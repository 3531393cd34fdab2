use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Lifecycle state of a pull request as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrState::Open => write!(f, "OPEN"),
            PrState::Closed => write!(f, "CLOSED"),
            PrState::Merged => write!(f, "MERGED"),
        }
    }
}

/// Which of the three mutually exclusive buckets an authored PR falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Merged,
    Open,
    ClosedUnmerged,
}

/// A pull request authored by the querying user.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)] // number, title and url are not reported yet
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: PrState,
    /// `owner/name`
    pub repository: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub additions: u64,
    pub deletions: u64,
}

impl PullRequestRecord {
    /// A merge timestamp wins over the reported state, so every record
    /// lands in exactly one bucket.
    pub fn outcome(&self) -> Outcome {
        if self.merged_at.is_some() || self.state == PrState::Merged {
            Outcome::Merged
        } else if self.state == PrState::Open {
            Outcome::Open
        } else {
            Outcome::ClosedUnmerged
        }
    }
}

/// A pull request the querying user has reviewed at least once.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct ReviewedRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: PrState,
    pub repository: String,
    /// Login of the PR author
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// Reviews submitted on this PR by the querying user
    pub review_count: u64,
}

/// Records returned by one paginated search, plus whether GitHub's search
/// cap may have cut the result short.
#[derive(Debug, Clone)]
pub struct SearchResults<T> {
    pub records: Vec<T>,
    /// `issueCount` reported by the API
    pub total_count: u64,
    pub capped: bool,
}

// GraphQL wire types. Node shapes follow the fragments in query.rs.

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Viewer {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchData<N> {
    pub search: SearchPage<N>,
}

/// One page of a GraphQL `search` connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage<N> {
    pub issue_count: u64,
    pub page_info: PageInfo,
    /// Null entries appear for nodes the token cannot see
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<N>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryRef {
    pub name_with_owner: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorRef {
    pub login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TotalCount {
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthoredNode {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: PrState,
    pub repository: RepositoryRef,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub additions: u64,
    pub deletions: u64,
}

impl From<AuthoredNode> for PullRequestRecord {
    fn from(node: AuthoredNode) -> Self {
        PullRequestRecord {
            number: node.number,
            title: node.title,
            url: node.url,
            state: node.state,
            repository: node.repository.name_with_owner,
            created_at: node.created_at,
            closed_at: node.closed_at,
            merged_at: node.merged_at,
            additions: node.additions,
            deletions: node.deletions,
        }
    }
}

/// GitHub reports deleted accounts with a null author.
pub const GHOST_LOGIN: &str = "ghost";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewedNode {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: PrState,
    pub repository: RepositoryRef,
    pub author: Option<ActorRef>,
    pub created_at: DateTime<Utc>,
    pub reviews: Option<TotalCount>,
}

impl From<ReviewedNode> for ReviewedRecord {
    fn from(node: ReviewedNode) -> Self {
        ReviewedRecord {
            number: node.number,
            title: node.title,
            url: node.url,
            state: node.state,
            repository: node.repository.name_with_owner,
            author: node
                .author
                .map(|a| a.login)
                .unwrap_or_else(|| GHOST_LOGIN.to_string()),
            created_at: node.created_at,
            review_count: node.reviews.map(|r| r.total_count).unwrap_or(0),
        }
    }
}
