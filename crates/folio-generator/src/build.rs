//! Build orchestration.
//!
//! Writes the generated artifacts (`sitemap.xml`, `robots.txt`, `feed.xml`,
//! `posts.json`) into the output directory.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{DateTime, Utc};
use folio_core::Config;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    feed::FeedGenerator,
    index::{ContentError, ContentIndex},
    robots::{RobotsError, RobotsGenerator},
    sitemap::SitemapGenerator,
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content index error.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// robots.txt error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of posts listed.
    pub posts: usize,

    /// Number of posts skipped because they failed to parse.
    pub skipped: usize,

    /// Number of project pages.
    pub projects: usize,

    /// Number of sitemap entries.
    pub sitemap_urls: usize,

    /// Number of feed items.
    pub feed_items: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates artifact generation.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    index: ContentIndex,
    output_dir: PathBuf,
    timestamp: Option<DateTime<Utc>>,
}

impl Builder {
    /// Create a new builder reading posts from the configured directory.
    #[must_use]
    pub fn new(config: Config, output_dir: impl Into<PathBuf>) -> Self {
        let index = ContentIndex::from_config(&config);
        Self {
            config,
            index,
            output_dir: output_dir.into(),
            timestamp: None,
        }
    }

    /// Use a custom content index.
    #[must_use]
    pub fn with_index(mut self, index: ContentIndex) -> Self {
        self.index = index;
        self
    }

    /// Pin the build timestamp instead of using the current time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Execute the build.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let now = self.timestamp.unwrap_or_else(Utc::now);
        let mut stats = BuildStats::default();

        info!(
            posts_dir = %self.index.posts_dir().display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        fs::create_dir_all(&self.output_dir)?;

        let listing = self.index.list_posts_meta()?;
        let projects = self.index.list_project_slugs();
        stats.posts = listing.posts.len();
        stats.skipped = listing.skipped_count();
        stats.projects = projects.len();

        // Sitemap
        let sitemap = SitemapGenerator::new(self.config.clone());
        let urls = sitemap.entries(&listing.posts, &projects, now);
        stats.sitemap_urls = urls.len();
        self.write("sitemap.xml", &sitemap.render(&urls))?;

        // robots.txt
        RobotsGenerator::new(self.config.clone()).generate(&self.output_dir)?;

        // Feed
        if self.config.feed.enabled {
            let posts: Vec<_> = listing
                .posts
                .iter()
                .take(self.config.feed.limit)
                .filter_map(|meta| match self.index.get_post_by_slug(&meta.slug) {
                    Ok(post) => Some(post),
                    Err(e) => {
                        warn!(slug = %meta.slug, error = %e, "post vanished during build");
                        None
                    }
                })
                .collect();
            stats.feed_items = posts.len();
            let xml = FeedGenerator::new(self.config.clone()).generate(&posts, now);
            self.write("feed.xml", &xml)?;
        }

        // Post index for client-side listings
        self.write("posts.json", &serde_json::to_string_pretty(&listing)?)?;

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            posts = stats.posts,
            skipped = stats.skipped,
            projects = stats.projects,
            sitemap_urls = stats.sitemap_urls,
            feed_items = stats.feed_items,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Output directory for generated files.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.output_dir.join(name);
        fs::write(&path, contents)?;
        debug!(path = %path.display(), "wrote artifact");
        Ok(())
    }
}
