use crate::activity::period::Period;

/// Which of the two searches a query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Authored,
    Reviewed,
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchKind::Authored => write!(f, "authored"),
            SearchKind::Reviewed => write!(f, "reviewed"),
        }
    }
}

/// A fully specified search: who, which side, and the creation window.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub kind: SearchKind,
    pub login: String,
    pub period: Period,
}

impl SearchQuery {
    pub fn authored(login: &str, period: &Period) -> Self {
        Self {
            kind: SearchKind::Authored,
            login: login.to_string(),
            period: period.clone(),
        }
    }

    pub fn reviewed(login: &str, period: &Period) -> Self {
        Self {
            kind: SearchKind::Reviewed,
            login: login.to_string(),
            period: period.clone(),
        }
    }

    /// GitHub search syntax. Start is inclusive, end exclusive.
    pub fn search_string(&self) -> String {
        let qualifier = match self.kind {
            SearchKind::Authored => "author",
            SearchKind::Reviewed => "reviewed-by",
        };
        format!(
            "{}:{} is:pr created:>={} created:<{}",
            qualifier,
            self.login,
            self.period.start.format("%Y-%m-%d"),
            self.period.end.format("%Y-%m-%d"),
        )
    }

    pub fn document(&self) -> &'static str {
        match self.kind {
            SearchKind::Authored => AUTHORED_QUERY,
            SearchKind::Reviewed => REVIEWED_QUERY,
        }
    }
}

pub const VIEWER_QUERY: &str = r#"
query {
    viewer {
        login
    }
}
"#;

pub const AUTHORED_QUERY: &str = r#"
query($searchQuery: String!, $first: Int!, $after: String) {
    search(query: $searchQuery, type: ISSUE, first: $first, after: $after) {
        issueCount
        pageInfo {
            hasNextPage
            endCursor
        }
        nodes {
            ... on PullRequest {
                number
                title
                url
                state
                repository {
                    nameWithOwner
                }
                createdAt
                closedAt
                mergedAt
                additions
                deletions
            }
        }
    }
}
"#;

pub const REVIEWED_QUERY: &str = r#"
query($searchQuery: String!, $first: Int!, $after: String, $login: String!) {
    search(query: $searchQuery, type: ISSUE, first: $first, after: $after) {
        issueCount
        pageInfo {
            hasNextPage
            endCursor
        }
        nodes {
            ... on PullRequest {
                number
                title
                url
                state
                repository {
                    nameWithOwner
                }
                author {
                    login
                }
                createdAt
                reviews(author: $login) {
                    totalCount
                }
            }
        }
    }
}
"#;
