//! robots.txt generation.

use std::{fs, path::Path};

use folio_core::Config;
use thiserror::Error;
use tracing::info;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render robots.txt content.
    pub fn render(&self) -> String {
        let mut out = String::from("User-agent: *\n");
        for path in &self.config.robots.disallow {
            out.push_str(&format!("Disallow: {path}\n"));
        }
        out.push_str(&format!("Sitemap: {}\n", self.config.url_for("sitemap.xml")));
        out
    }

    /// Write robots.txt into `output_dir`. Returns whether a file was written.
    pub fn generate(&self, output_dir: &Path) -> Result<bool> {
        if !self.config.robots.enabled {
            return Ok(false);
        }

        info!("generating robots.txt");
        fs::write(output_dir.join("robots.txt"), self.render())?;
        Ok(true)
    }
}
