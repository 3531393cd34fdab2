use chrono::NaiveDate;

use super::period::Period;
use super::ranking::RankedEntry;

/// Statistics over the PRs the user authored.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthoredStats {
    pub total: usize,
    pub merged: usize,
    pub open: usize,
    /// Closed without being merged
    pub closed: usize,
    pub additions: u64,
    pub deletions: u64,
    /// additions - deletions; negative for net-deleting work
    pub net: i64,
    pub first_created: Option<NaiveDate>,
    pub last_created: Option<NaiveDate>,
    pub top_repositories: Vec<RankedEntry>,
}

impl AuthoredStats {
    /// Share of `count` in the authored total, as a percentage.
    pub fn percentage(&self, count: usize) -> Option<f64> {
        (self.total > 0).then(|| count as f64 * 100.0 / self.total as f64)
    }
}

/// Statistics over the PRs the user reviewed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewedStats {
    pub total: usize,
    /// Reviews the user submitted across all reviewed PRs
    pub review_submissions: u64,
    pub unique_authors: usize,
    pub top_collaborators: Vec<RankedEntry>,
    pub top_repositories: Vec<RankedEntry>,
}

/// Working-time figures derived from the period and PTO.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingTime {
    pub weekdays: i64,
    pub pto_days: u32,
    pub working_days: i64,
    pub working_weeks: f64,
    pub authored_per_week: Option<f64>,
    pub reviewed_per_week: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverallStats {
    pub total_interactions: usize,
    /// floor((additions + deletions) / authored total); 0 with nothing authored
    pub average_changes_per_pr: u64,
    pub all_repositories: Vec<String>,
    pub days: i64,
    /// Omitted when the period spans no days
    pub weekly_authored: Option<f64>,
    pub weekly_reviewed: Option<f64>,
    pub working: WorkingTime,
}

/// Everything derived from one run's authored and reviewed records.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityReport {
    pub period: Period,
    pub authored: AuthoredStats,
    pub reviewed: ReviewedStats,
    pub overall: OverallStats,
}
