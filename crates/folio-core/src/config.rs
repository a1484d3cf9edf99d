//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Content source settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Sitemap settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// RSS feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,

    /// GitHub activity proxy settings.
    pub heartbeat: HeartbeatSettings,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Site description for the feed channel.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,
}

/// Where article files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding `.md` / `.mdx` articles.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,
}

/// Sitemap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Top-level site sections; the empty string is the home page.
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
}

/// RSS feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Whether the feed is generated.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of items in feed.
    #[serde(default = "default_feed_limit")]
    pub limit: usize,
}

/// robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Whether robots.txt is generated.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Paths crawlers should skip.
    #[serde(default = "default_disallow")]
    pub disallow: Vec<String>,
}

/// Settings for the GitHub public events proxy.
#[derive(Clone, Serialize, Deserialize)]
pub struct HeartbeatSettings {
    /// GitHub account whose public events are proxied.
    pub username: String,

    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Number of events requested per call.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Optional bearer token. Usually supplied through the environment.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl std::fmt::Debug for HeartbeatSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatSettings")
            .field("username", &self.username)
            .field("api_base", &self.api_base)
            .field("per_page", &self.per_page)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// Default value functions
fn default_posts_dir() -> PathBuf {
    PathBuf::from("content/writing")
}

fn default_sections() -> Vec<String> {
    ["", "about", "consulting", "contact", "writing", "projects", "tldr"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_feed_limit() -> usize {
    20
}

fn default_disallow() -> Vec<String> {
    vec!["/api/".to_string()]
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    10
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_dir: default_posts_dir(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_feed_limit(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disallow: default_disallow(),
        }
    }
}

impl HeartbeatSettings {
    /// Settings for `username` with every other field defaulted.
    pub fn for_user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_base: default_api_base(),
            per_page: default_per_page(),
            token: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `FOLIO__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.heartbeat.username.trim().is_empty() {
            return Err(CoreError::config("heartbeat.username cannot be empty"));
        }

        if !(1..=100).contains(&self.heartbeat.per_page) {
            return Err(CoreError::config(
                "heartbeat.per_page must be between 1 and 100",
            ));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.base_url())
    }
}
