//! Configuration loading
//!
//! Settings come from an optional TOML file. Secrets are never read from the
//! file: the GitHub token and the WakaTime API key only come from the
//! environment, and a missing WakaTime key simply disables that enrichment.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Older name for the GitHub token, still honoured.
pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";
/// Environment variable holding the WakaTime API key.
pub const WAKATIME_KEY_ENV: &str = "WAKATIME_API_KEY";
/// Overrides `username` from the file.
pub const USERNAME_ENV: &str = "DEVCARD_USERNAME";

/// Main configuration struct
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Account the card is rendered for
    #[serde(default = "default_username")]
    pub username: String,

    /// Address the HTTP server binds to
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub contributions: ContributionsConfig,

    #[serde(default)]
    pub wakatime: WakaTimeConfig,

    #[serde(default)]
    pub projects: ProjectsConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: default_username(),
            listen: default_listen(),
            github: GithubConfig::default(),
            contributions: ContributionsConfig::default(),
            wakatime: WakaTimeConfig::default(),
            projects: ProjectsConfig::default(),
            image: ImageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// GitHub REST API settings
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_base")]
    pub api_base: String,

    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,

    /// Bearer token, filled from the environment
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_base(),
            timeout_secs: default_github_timeout(),
            token: None,
        }
    }
}

impl GithubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Daily contribution feed settings
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionsConfig {
    #[serde(default = "default_contributions_base")]
    pub api_base: String,

    #[serde(default = "default_contributions_timeout")]
    pub timeout_secs: u64,
}

impl Default for ContributionsConfig {
    fn default() -> Self {
        Self {
            api_base: default_contributions_base(),
            timeout_secs: default_contributions_timeout(),
        }
    }
}

impl ContributionsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// WakaTime enrichment settings
#[derive(Debug, Clone, Deserialize)]
pub struct WakaTimeConfig {
    #[serde(default = "default_wakatime_base")]
    pub api_base: String,

    #[serde(default = "default_wakatime_timeout")]
    pub timeout_secs: u64,

    /// API key, filled from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for WakaTimeConfig {
    fn default() -> Self {
        Self {
            api_base: default_wakatime_base(),
            timeout_secs: default_wakatime_timeout(),
            api_key: None,
        }
    }
}

impl WakaTimeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How the "most committed project" is estimated
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStrategy {
    /// Most recently pushed-to repository
    Recency,
    /// Count one page of the user's commits in the first few repositories
    Sample,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsConfig {
    #[serde(default = "default_strategy")]
    pub strategy: ProjectStrategy,

    /// Repositories inspected by the sample strategy
    #[serde(default = "default_sample_repos")]
    pub sample_repos: usize,

    /// Commits requested per repository; also the cap on any one count
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            sample_repos: default_sample_repos(),
            page_size: default_page_size(),
        }
    }
}

/// Which implementation backs `/api/stats-image`
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageBackend {
    /// Serve the layout card markup directly
    Markup,
    /// Screenshot the HTML page with a headless browser
    Browser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_backend")]
    pub backend: ImageBackend,

    /// Page the browser captures; derived from the request host when unset
    #[serde(default)]
    pub page_url: Option<String>,

    #[serde(default = "default_selector")]
    pub selector: String,

    #[serde(default = "default_navigate_timeout")]
    pub navigate_timeout_secs: u64,

    #[serde(default = "default_selector_timeout")]
    pub selector_timeout_secs: u64,

    #[serde(default = "default_settle_millis")]
    pub settle_millis: u64,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            page_url: None,
            selector: default_selector(),
            navigate_timeout_secs: default_navigate_timeout(),
            selector_timeout_secs: default_selector_timeout(),
            settle_millis: default_settle_millis(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_username() -> String {
    "octocat".to_string()
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_github_base() -> String {
    "https://api.github.com".to_string()
}

fn default_github_timeout() -> u64 {
    10
}

fn default_contributions_base() -> String {
    "https://github-contributions-api.jogruber.de".to_string()
}

fn default_contributions_timeout() -> u64 {
    10
}

fn default_wakatime_base() -> String {
    "https://wakatime.com/api/v1".to_string()
}

fn default_wakatime_timeout() -> u64 {
    5
}

fn default_strategy() -> ProjectStrategy {
    ProjectStrategy::Sample
}

fn default_sample_repos() -> usize {
    10
}

fn default_page_size() -> u32 {
    100
}

fn default_backend() -> ImageBackend {
    if cfg!(feature = "browser") {
        ImageBackend::Browser
    } else {
        ImageBackend::Markup
    }
}

fn default_selector() -> String {
    ".stats-card".to_string()
}

fn default_navigate_timeout() -> u64 {
    15
}

fn default_selector_timeout() -> u64 {
    5
}

fn default_settle_millis() -> u64 {
    500
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    640
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `path`, or defaults when no path is given,
    /// then apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Fill secrets and overrides from a variable lookup. Empty values count
    /// as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        self.github.token = non_empty(GITHUB_TOKEN_ENV).or_else(|| non_empty(ACCESS_TOKEN_ENV));
        self.wakatime.api_key = non_empty(WAKATIME_KEY_ENV);
        if let Some(username) = non_empty(USERNAME_ENV) {
            self.username = username;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::Config("username must not be empty".into()));
        }
        if self.projects.sample_repos == 0 {
            return Err(Error::Config("projects.sample_repos must be at least 1".into()));
        }
        if self.projects.page_size == 0 || self.projects.page_size > 100 {
            return Err(Error::Config("projects.page_size must be within 1..=100".into()));
        }
        if self.image.backend == ImageBackend::Browser && !cfg!(feature = "browser") {
            return Err(Error::Config(
                "image.backend = \"browser\" requires building with the `browser` feature".into(),
            ));
        }
        Ok(())
    }
}
