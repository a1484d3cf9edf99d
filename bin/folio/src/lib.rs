//! folio CLI library
//!
//! Command implementations and the HTTP server used by the `folio` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, serve, check)
//! - [`server`] - axum router with the heartbeat proxy and live sitemap

pub mod cmd;
pub mod server;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
pub use folio_core::{Config, Post, PostMeta};
pub use folio_generator::{BuildStats, Builder, ContentIndex, PostListing};

/// Environment variable consulted when the config carries no token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Load configuration with environment overrides.
///
/// Falls back to `GITHUB_TOKEN` for the heartbeat token.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load_with_env(path).wrap_err("Failed to load configuration")?;
    if config.heartbeat.token.is_none() {
        config.heartbeat.token = std::env::var(GITHUB_TOKEN_ENV).ok();
    }
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
