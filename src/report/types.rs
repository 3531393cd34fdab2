use crate::activity::ActivityReport;
use crate::github::SearchKind;

/// A rendered-ready report: aggregated statistics plus the run context
/// needed to present them.
#[derive(Debug, Clone)]
pub struct Report {
    /// Login the searches ran for
    pub login: String,
    pub activity: ActivityReport,
    /// Searches that hit GitHub's result cap
    pub incomplete: Vec<SearchKind>,
    /// Command line that reproduces this run
    pub rerun_command: String,
}

impl Report {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }
}

/// Net line change with an explicit `+` for gains.
pub fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}
