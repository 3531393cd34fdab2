mod activity;
mod config;
mod github;
mod report;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use activity::RankingLimits;
use github::{ActivitySource, FixtureSource, GitHubClient};

pub const DEFAULT_START_DATE: &str = "2025-02-28";
pub const DEFAULT_END_DATE: &str = "2026-02-02";

/// gh-activity: summarize the pull requests you authored and reviewed on
/// GitHub over a date range.
#[derive(Parser, Debug)]
#[command(name = "gh-activity", version, about)]
struct Cli {
    /// First day of the period, inclusive (YYYY-MM-DD)
    #[arg(default_value = DEFAULT_START_DATE)]
    start_date: String,

    /// Day after the period ends, exclusive (YYYY-MM-DD)
    #[arg(default_value = DEFAULT_END_DATE)]
    end_date: String,

    /// Also write the report as markdown to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Paid-time-off days to exclude from working-day statistics
    #[arg(long, default_value_t = 0)]
    ptos: u32,

    /// Use built-in sample data for demo purposes (no GitHub token needed)
    #[arg(long)]
    r#mock: bool,
}

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Pick the activity source. The config file is only read for the network
/// path, so `--mock` works regardless of what is in the working directory.
fn select_source<F>(mock: bool, load_config: F) -> Result<(Box<dyn ActivitySource>, RankingLimits), BoxError>
where
    F: FnOnce() -> Result<config::Config, config::ConfigError>,
{
    if mock {
        info!("using mock activity data for demo");
        return Ok((Box::new(FixtureSource::embedded()), RankingLimits::default()));
    }

    info!("loading configuration");
    let config = load_config()?;
    let limits = RankingLimits::from(&config.report);
    Ok((Box::new(GitHubClient::new(&config)?), limits))
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    let period = activity::Period::parse(&cli.start_date, &cli.end_date, cli.ptos)?;
    let _main_span = info_span!("gh_activity", start = %period.start, end = %period.end).entered();

    let (source, limits) = select_source(cli.r#mock, config::Config::load)?;

    info!("resolving authenticated GitHub user");
    let login = source.viewer_login().await?;
    debug!(login = %login, "authenticated");

    info!("fetching authored and reviewed pull requests");
    let fetched = github::fetch_activity(source.as_ref(), &login, &period).await?;
    info!(
        authored = fetched.authored.records.len(),
        authored_matches = fetched.authored.total_count,
        reviewed = fetched.reviewed.records.len(),
        reviewed_matches = fetched.reviewed.total_count,
        "fetched pull requests"
    );

    info!("aggregating activity");
    let stats = activity::aggregate(
        &fetched.authored.records,
        &fetched.reviewed.records,
        &period,
        &limits,
    );

    info!("generating report");
    let built_report = report::build(stats, &fetched);
    report::output(&built_report, cli.output.as_deref())?;
    info!(complete = built_report.is_complete(), "done");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["gh-activity"]);
        assert_eq!(cli.start_date, DEFAULT_START_DATE);
        assert_eq!(cli.end_date, DEFAULT_END_DATE);
        assert_eq!(cli.ptos, 0);
        assert!(!cli.r#mock);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_explicit_arguments() {
        let cli = Cli::parse_from([
            "gh-activity",
            "2025-01-01",
            "2025-01-08",
            "--ptos",
            "2",
            "-o",
            "out.md",
            "--mock",
        ]);
        assert_eq!(cli.start_date, "2025-01-01");
        assert_eq!(cli.end_date, "2025-01-08");
        assert_eq!(cli.ptos, 2);
        assert!(cli.r#mock);
        assert_eq!(cli.output, Some(PathBuf::from("out.md")));
    }

    #[tokio::test]
    async fn test_mock_pipeline_end_to_end() {
        let source = FixtureSource::embedded();
        let period = activity::Period::parse(DEFAULT_START_DATE, DEFAULT_END_DATE, 0).unwrap();
        let login = source.viewer_login().await.unwrap();
        let fetched = github::fetch_activity(&source, &login, &period).await.unwrap();
        let stats = activity::aggregate(
            &fetched.authored.records,
            &fetched.reviewed.records,
            &period,
            &activity::RankingLimits::default(),
        );

        assert_eq!(stats.authored.total, 6);
        assert_eq!(stats.authored.merged, 3);
        assert_eq!(stats.authored.open, 2);
        assert_eq!(stats.authored.closed, 1);
        assert_eq!(stats.authored.additions, 423);
        assert_eq!(stats.authored.deletions, 673);
        assert_eq!(stats.authored.net, -250);
        assert_eq!(stats.authored.top_repositories[0].name, "acme/sync-service");
        assert_eq!(stats.reviewed.unique_authors, 3);
        assert_eq!(stats.reviewed.review_submissions, 8);
        assert_eq!(stats.reviewed.top_repositories[0].name, "acme/platform");
        assert_eq!(stats.overall.all_repositories.len(), 4);

        let built = report::build(stats, &fetched);
        assert!(built.is_complete());
        assert!(report::render_markdown(&built).contains("acme/handbook"));
    }

    #[tokio::test]
    async fn test_run_reports_invalid_date_readably() {
        let cli = Cli::parse_from(["gh-activity", "2025-13-01", "2025-02-01", "--mock"]);
        let err = run(cli).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid date '2025-13-01'"), "got: {message}");
        assert!(!message.contains("InvalidDate"));
    }

    #[test]
    fn test_missing_token_message_explains_setup() {
        let message = github::GitHubError::MissingToken.to_string();
        assert!(message.contains("set GITHUB_TOKEN or GH_TOKEN"));
        assert!(message.contains(".gh-activity.toml"));
    }

    #[test]
    fn test_select_source_mock_skips_config() {
        let (_, limits) = select_source(true, || {
            panic!("config must not be read in mock mode");
        })
        .unwrap();
        assert_eq!(limits, RankingLimits::default());
    }

    #[test]
    fn test_select_source_network_propagates_config_error() {
        let result = select_source(false, || {
            toml::from_str::<config::Config>("[report\n").map_err(config::ConfigError::from)
        });
        let err = result.err().unwrap();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_select_source_network_uses_config_limits() {
        let (_, limits) = select_source(false, || {
            let mut config = config::Config::default();
            config.github.token = Some("t0ken".to_string());
            config.report.top_repositories = 2;
            Ok(config)
        })
        .unwrap();
        assert_eq!(limits.repositories, 2);
        assert_eq!(limits.collaborators, 10);
    }
}
