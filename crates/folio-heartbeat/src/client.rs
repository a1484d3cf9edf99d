//! Outbound client for the GitHub public events API.

use folio_core::HeartbeatSettings;
use reqwest::{StatusCode, header::ACCEPT};
use serde_json::Value;
use tracing::debug;

use crate::error::HeartbeatError;

/// Default `User-Agent`; GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = "folio-heartbeat";

/// Everything needed to build the outbound request.
#[derive(Clone)]
pub struct HeartbeatConfig {
    /// API base, e.g. `https://api.github.com`.
    pub api_base: String,
    /// Account whose public events are fetched.
    pub username: String,
    /// Page size passed upstream.
    pub per_page: u32,
    /// Bearer token; requests are unauthenticated when `None`.
    pub token: Option<String>,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl std::fmt::Debug for HeartbeatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatConfig")
            .field("api_base", &self.api_base)
            .field("username", &self.username)
            .field("per_page", &self.per_page)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HeartbeatConfig {
    /// Build from site settings. Blank tokens count as absent.
    pub fn from_settings(settings: &HeartbeatSettings) -> Self {
        Self {
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            username: settings.username.clone(),
            per_page: settings.per_page,
            token: settings
                .token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Replace the token.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Fully qualified events URL.
    pub fn events_url(&self) -> String {
        format!(
            "{}/users/{}/events/public?per_page={}",
            self.api_base.trim_end_matches('/'),
            self.username,
            self.per_page
        )
    }
}

/// Stateless client: one upstream call per [`fetch_events`](Self::fetch_events).
#[derive(Debug, Clone)]
pub struct HeartbeatClient {
    config: HeartbeatConfig,
    http: reqwest::Client,
}

impl HeartbeatClient {
    /// Create a client with the platform default timeouts.
    pub fn new(config: HeartbeatConfig) -> Result<Self, HeartbeatError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(HeartbeatError::Transport)?;
        Ok(Self { config, http })
    }

    /// Client configuration.
    pub fn config(&self) -> &HeartbeatConfig {
        &self.config
    }

    /// Fetch the public events and return the body as untyped JSON.
    pub async fn fetch_events(&self) -> Result<Value, HeartbeatError> {
        let url = self.config.events_url();
        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        debug!(url = %url, authenticated = self.config.token.is_some(), "fetching github events");
        let response = request.send().await.map_err(HeartbeatError::Transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(HeartbeatError::RateLimited);
        }
        if !status.is_success() {
            return Err(HeartbeatError::Unavailable {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(HeartbeatError::Decode)
    }
}
