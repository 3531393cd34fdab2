pub mod period;
pub mod ranking;
pub mod types;

pub use period::Period;
pub use types::ActivityReport;

use crate::config::ReportConfig;
use crate::github::types::Outcome;
use crate::github::{PullRequestRecord, ReviewedRecord};
use period::weekly_rate;
use ranking::{distinct_count, sorted_union, top_by_count};
use types::{AuthoredStats, OverallStats, ReviewedStats, WorkingTime};

/// How many rows each ranking keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingLimits {
    pub repositories: usize,
    pub collaborators: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            repositories: 5,
            collaborators: 10,
        }
    }
}

impl From<&ReportConfig> for RankingLimits {
    fn from(config: &ReportConfig) -> Self {
        Self {
            repositories: config.top_repositories,
            collaborators: config.top_collaborators,
        }
    }
}

/// Derive the full activity report from the two record collections.
///
/// Pure: the same inputs always produce the same report, and empty inputs
/// produce zeroed statistics rather than an error.
pub fn aggregate(
    authored: &[PullRequestRecord],
    reviewed: &[ReviewedRecord],
    period: &Period,
    limits: &RankingLimits,
) -> ActivityReport {
    let authored_stats = authored_stats(authored, limits);
    let reviewed_stats = reviewed_stats(reviewed, limits);
    let overall = overall_stats(authored, reviewed, &authored_stats, period);

    ActivityReport {
        period: period.clone(),
        authored: authored_stats,
        reviewed: reviewed_stats,
        overall,
    }
}

fn authored_stats(authored: &[PullRequestRecord], limits: &RankingLimits) -> AuthoredStats {
    let (mut merged, mut open, mut closed) = (0, 0, 0);
    for record in authored {
        match record.outcome() {
            Outcome::Merged => merged += 1,
            Outcome::Open => open += 1,
            Outcome::ClosedUnmerged => closed += 1,
        }
    }

    let additions: u64 = authored.iter().map(|r| r.additions).sum();
    let deletions: u64 = authored.iter().map(|r| r.deletions).sum();
    let created = authored.iter().map(|r| r.created_at.date_naive());

    AuthoredStats {
        total: authored.len(),
        merged,
        open,
        closed,
        additions,
        deletions,
        net: additions as i64 - deletions as i64,
        first_created: created.clone().min(),
        last_created: created.max(),
        top_repositories: top_by_count(
            authored.iter().map(|r| r.repository.as_str()),
            limits.repositories,
        ),
    }
}

fn reviewed_stats(reviewed: &[ReviewedRecord], limits: &RankingLimits) -> ReviewedStats {
    ReviewedStats {
        total: reviewed.len(),
        review_submissions: reviewed.iter().map(|r| r.review_count).sum(),
        unique_authors: distinct_count(reviewed.iter().map(|r| r.author.as_str())),
        top_collaborators: top_by_count(
            reviewed.iter().map(|r| r.author.as_str()),
            limits.collaborators,
        ),
        top_repositories: top_by_count(
            reviewed.iter().map(|r| r.repository.as_str()),
            limits.repositories,
        ),
    }
}

fn overall_stats(
    authored: &[PullRequestRecord],
    reviewed: &[ReviewedRecord],
    authored_stats: &AuthoredStats,
    period: &Period,
) -> OverallStats {
    let total = authored.len() as u64;
    let average_changes_per_pr = if total > 0 {
        (authored_stats.additions + authored_stats.deletions) / total
    } else {
        0
    };

    let all_repositories = sorted_union(
        authored
            .iter()
            .map(|r| r.repository.as_str())
            .chain(reviewed.iter().map(|r| r.repository.as_str())),
    );

    let days = period.days();
    let working_weeks = period.working_weeks();
    let per_working_week =
        |count: usize| (working_weeks > 0.0).then(|| count as f64 / working_weeks);

    OverallStats {
        total_interactions: authored.len() + reviewed.len(),
        average_changes_per_pr,
        all_repositories,
        days,
        weekly_authored: weekly_rate(authored.len(), days),
        weekly_reviewed: weekly_rate(reviewed.len(), days),
        working: WorkingTime {
            weekdays: period.weekdays(),
            pto_days: period.pto_days,
            working_days: period.working_days(),
            working_weeks,
            authored_per_week: per_working_week(authored.len()),
            reviewed_per_week: per_working_week(reviewed.len()),
        },
    }
}
