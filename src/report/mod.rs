pub mod types;

pub use types::Report;

use crate::activity::period::DATE_FORMAT;
use crate::activity::ranking::RankedEntry;
use crate::activity::ActivityReport;
use crate::github::client::SEARCH_RESULT_CAP;
use crate::github::FetchedActivity;
use chrono::NaiveDate;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};
use types::signed;

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Combine aggregated statistics with the context of the fetch that
/// produced them.
pub fn build(activity: ActivityReport, fetched: &FetchedActivity) -> Report {
    let period = &activity.period;
    let mut rerun_command = format!(
        "gh-activity {} {}",
        period.start.format(DATE_FORMAT),
        period.end.format(DATE_FORMAT)
    );
    if period.pto_days > 0 {
        rerun_command.push_str(&format!(" --ptos {}", period.pto_days));
    }

    Report {
        login: fetched.login.clone(),
        incomplete: fetched.capped_searches(),
        activity,
        rerun_command,
    }
}

/// Print the report to the terminal, and also write it as markdown when
/// an output path is given.
#[instrument(skip(report), fields(login = %report.login))]
pub fn output(report: &Report, output_path: Option<&Path>) -> Result<(), ReportError> {
    debug!("writing report to terminal");
    print!("{}", render_terminal(report));

    if let Some(path) = output_path {
        debug!(path = %path.display(), "writing report to file");
        write_markdown_report(report, path)?;
    }
    Ok(())
}

fn date_or_na(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn with_percentage(count: usize, percentage: Option<f64>) -> String {
    match percentage {
        Some(p) => format!("{} ({:.1}%)", count, p),
        None => count.to_string(),
    }
}

fn incomplete_notice(report: &Report) -> Option<String> {
    if report.is_complete() {
        return None;
    }
    let searches: Vec<String> = report.incomplete.iter().map(|k| k.to_string()).collect();
    Some(format!(
        "Results may be incomplete: the {} search reached GitHub's {}-result cap",
        searches.join(" and "),
        SEARCH_RESULT_CAP
    ))
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("{}\n", title.cyan().bold()));
    out.push_str(&format!("{}\n", RULE));
}

fn stat(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("  {}: {}\n", label, value.to_string().bold()));
}

fn pr_count(count: usize) -> String {
    if count == 1 {
        "1 PR".to_string()
    } else {
        format!("{} PRs", count)
    }
}

fn ranking(out: &mut String, entries: &[RankedEntry]) {
    for entry in entries {
        out.push_str(&format!("    • {}: {}\n", entry.name, pr_count(entry.count)));
    }
}

/// Render the report for the terminal with colors.
///
/// ╔═══════════════════════════╗
/// ║  GitHub Activity Summary
/// ║  User: octocat
/// ║  Period: 2025-02-28 to 2026-02-02
/// ╚═══════════════════════════╝
///
/// 📝 Pull Requests You Authored
/// ═══════════════════════════
///   Total PRs Created: 6
/// ...
pub fn render_terminal(report: &Report) -> String {
    let activity = &report.activity;
    let period = &activity.period;
    let authored = &activity.authored;
    let reviewed = &activity.reviewed;
    let overall = &activity.overall;
    let mut out = String::new();

    out.push_str(&format!("╔{}╗\n", RULE));
    out.push_str(&format!("║        {}\n", "GitHub Activity Summary".bold()));
    out.push_str(&format!("║        User: {}\n", report.login));
    out.push_str(&format!(
        "║        Period: {} to {}\n",
        period.start.format(DATE_FORMAT),
        period.end.format(DATE_FORMAT)
    ));
    out.push_str(&format!("╚{}╝\n\n", RULE));

    if let Some(notice) = incomplete_notice(report) {
        out.push_str(&format!("{}\n\n", format!("⚠ {}", notice).yellow().bold()));
    }

    section(&mut out, "📝 Pull Requests You Authored");
    stat(&mut out, "Total PRs Created", authored.total);
    stat(&mut out, "Merged", with_percentage(authored.merged, authored.percentage(authored.merged)));
    stat(&mut out, "Open", with_percentage(authored.open, authored.percentage(authored.open)));
    stat(
        &mut out,
        "Closed (not merged)",
        with_percentage(authored.closed, authored.percentage(authored.closed)),
    );
    out.push_str(&format!("  Lines Added: {}\n", format!("+{}", authored.additions).green()));
    out.push_str(&format!("  Lines Deleted: {}\n", format!("-{}", authored.deletions).red()));
    let net = signed(authored.net);
    let net = if authored.net < 0 { net.red() } else { net.green() };
    out.push_str(&format!("  Net Change: {}\n", net));
    stat(&mut out, "First PR", date_or_na(authored.first_created));
    stat(&mut out, "Latest PR", date_or_na(authored.last_created));
    out.push('\n');

    section(&mut out, "📦 Top Repositories (Authored)");
    ranking(&mut out, &authored.top_repositories);
    out.push('\n');

    section(&mut out, "👀 Pull Requests You Reviewed");
    stat(&mut out, "Total PRs Reviewed", reviewed.total);
    stat(&mut out, "Reviews Submitted", reviewed.review_submissions);
    stat(&mut out, "Unique Authors", reviewed.unique_authors);
    out.push('\n');

    section(&mut out, "🤝 Top Collaborators (PRs Reviewed)");
    ranking(&mut out, &reviewed.top_collaborators);
    out.push('\n');

    section(&mut out, "📦 Top Repositories (Reviewed)");
    ranking(&mut out, &reviewed.top_repositories);
    out.push('\n');

    section(&mut out, "📊 Overall Statistics");
    stat(&mut out, "Total Interactions", overall.total_interactions);
    stat(&mut out, "Average Changes per PR", overall.average_changes_per_pr);
    stat(&mut out, "Repositories Touched", overall.all_repositories.len());
    stat(&mut out, "Period", format!("{} days", overall.days));
    if let Some(rate) = overall.weekly_authored {
        stat(&mut out, "PRs Authored per Week", format!("{:.1}", rate));
    }
    if let Some(rate) = overall.weekly_reviewed {
        stat(&mut out, "PRs Reviewed per Week", format!("{:.1}", rate));
    }
    let working = &overall.working;
    if working.pto_days > 0 {
        stat(
            &mut out,
            "Working Days",
            format!("{} ({} weekdays, {} PTO)", working.working_days, working.weekdays, working.pto_days),
        );
    } else {
        stat(&mut out, "Working Days", working.working_days);
    }
    if let Some(rate) = working.authored_per_week {
        stat(&mut out, "PRs Authored per Working Week", format!("{:.2}", rate));
    }
    if let Some(rate) = working.reviewed_per_week {
        stat(&mut out, "PRs Reviewed per Working Week", format!("{:.2}", rate));
    }
    out.push('\n');

    section(&mut out, "🗂  All Repositories");
    for repo in &overall.all_repositories {
        out.push_str(&format!("    • {}\n", repo));
    }
    out.push('\n');

    out.push_str(&format!("╔{}╗\n", RULE));
    out.push_str(&format!("║  {}\n", "Summary complete!".green().bold()));
    out.push_str(&format!("╚{}╝\n\n", RULE));
    out.push_str("💡 Tip: Save this output to a file:\n");
    out.push_str(&format!("   {} > github_activity.txt\n", report.rerun_command));
    out.push_str("   or write it as markdown:\n");
    out.push_str(&format!("   {} --output github_activity.md\n\n", report.rerun_command));

    out
}

fn md_ranking(md: &mut String, title: &str, entries: &[RankedEntry]) {
    md.push_str(&format!("## {}\n\n", title));
    for entry in entries {
        md.push_str(&format!("- {}: {}\n", entry.name, pr_count(entry.count)));
    }
    if !entries.is_empty() {
        md.push('\n');
    }
}

/// Render the report as markdown, with the same sections as the terminal.
pub fn render_markdown(report: &Report) -> String {
    let activity = &report.activity;
    let period = &activity.period;
    let authored = &activity.authored;
    let reviewed = &activity.reviewed;
    let overall = &activity.overall;
    let mut md = String::new();

    md.push_str("# GitHub Activity Summary\n\n");
    md.push_str(&format!(
        "**User:** {} | **Period:** {} to {}\n\n",
        report.login,
        period.start.format(DATE_FORMAT),
        period.end.format(DATE_FORMAT)
    ));
    if let Some(notice) = incomplete_notice(report) {
        md.push_str(&format!("> **Warning:** {}\n\n", notice));
    }

    md.push_str("## Pull Requests Authored\n\n");
    md.push_str(&format!("- **Total PRs Created:** {}\n", authored.total));
    md.push_str(&format!(
        "- **Merged:** {}\n",
        with_percentage(authored.merged, authored.percentage(authored.merged))
    ));
    md.push_str(&format!(
        "- **Open:** {}\n",
        with_percentage(authored.open, authored.percentage(authored.open))
    ));
    md.push_str(&format!(
        "- **Closed (not merged):** {}\n",
        with_percentage(authored.closed, authored.percentage(authored.closed))
    ));
    md.push_str(&format!(
        "- **Lines:** +{} -{} (net {})\n",
        authored.additions,
        authored.deletions,
        signed(authored.net)
    ));
    md.push_str(&format!(
        "- **First / Latest PR:** {} / {}\n\n",
        date_or_na(authored.first_created),
        date_or_na(authored.last_created)
    ));
    md_ranking(&mut md, "Top Repositories (Authored)", &authored.top_repositories);

    md.push_str("## Pull Requests Reviewed\n\n");
    md.push_str(&format!("- **Total PRs Reviewed:** {}\n", reviewed.total));
    md.push_str(&format!("- **Reviews Submitted:** {}\n", reviewed.review_submissions));
    md.push_str(&format!("- **Unique Authors:** {}\n\n", reviewed.unique_authors));
    md_ranking(&mut md, "Top Collaborators", &reviewed.top_collaborators);
    md_ranking(&mut md, "Top Repositories (Reviewed)", &reviewed.top_repositories);

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Interactions:** {}\n", overall.total_interactions));
    md.push_str(&format!("- **Average Changes per PR:** {}\n", overall.average_changes_per_pr));
    md.push_str(&format!("- **Repositories Touched:** {}\n", overall.all_repositories.len()));
    md.push_str(&format!("- **Period:** {} days\n", overall.days));
    if let Some(rate) = overall.weekly_authored {
        md.push_str(&format!("- **PRs Authored per Week:** {:.1}\n", rate));
    }
    if let Some(rate) = overall.weekly_reviewed {
        md.push_str(&format!("- **PRs Reviewed per Week:** {:.1}\n", rate));
    }
    md.push_str(&format!("- **Working Days:** {}\n", overall.working.working_days));
    if let Some(rate) = overall.working.authored_per_week {
        md.push_str(&format!("- **PRs Authored per Working Week:** {:.2}\n", rate));
    }
    if let Some(rate) = overall.working.reviewed_per_week {
        md.push_str(&format!("- **PRs Reviewed per Working Week:** {:.2}\n", rate));
    }
    md.push('\n');

    md.push_str("## All Repositories\n\n");
    for repo in &overall.all_repositories {
        md.push_str(&format!("- {}\n", repo));
    }

    md
}

fn write_markdown_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    std::fs::write(path, render_markdown(report))?;
    Ok(())
}
