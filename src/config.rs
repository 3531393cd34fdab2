use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".gh-activity.toml";
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .gh-activity.toml.
///
/// All fields are optional; the tool works with zero config as long as a
/// token is available from the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN, then GH_TOKEN.
    pub token: Option<String>,
    /// GraphQL endpoint (GitHub Enterprise installs use their own host)
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Search results requested per page, clamped to 1..=100
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Entries kept in each repository ranking
    #[serde(default = "default_top_repositories")]
    pub top_repositories: usize,
    /// Entries kept in the collaborator ranking
    #[serde(default = "default_top_collaborators")]
    pub top_collaborators: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_repositories: default_top_repositories(),
            top_collaborators: default_top_collaborators(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_top_repositories() -> usize {
    5
}

fn default_top_collaborators() -> usize {
    10
}

impl Config {
    /// Load configuration from .gh-activity.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if config.github.token.is_none() {
            config.github.token = token_from_env();
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence,
    /// then GITHUB_TOKEN, then GH_TOKEN (the variable the gh CLI exports).
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone().or_else(token_from_env)
    }

    pub fn page_size(&self) -> u32 {
        self.github.page_size.clamp(1, 100)
    }
}

fn token_from_env() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}
