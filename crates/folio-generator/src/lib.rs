//! folio generator library
//!
//! Content index and static artifact generation for folio.
//!
//! # Modules
//!
//! - [`index`] - Read-only index over the posts directory and project catalog
//! - [`sitemap`] - XML sitemap generation
//! - [`feed`] - RSS feed generation
//! - [`robots`] - robots.txt generation
//! - [`build`] - Build orchestration

pub mod build;
pub mod feed;
pub mod index;
pub mod robots;
pub mod sitemap;

pub use build::{BuildError, BuildStats, Builder};
pub use feed::FeedGenerator;
pub use index::{ContentError, ContentIndex, PostListing, SkippedPost, sort_posts};
pub use robots::RobotsGenerator;
pub use sitemap::{ChangeFreq, SitemapGenerator, SitemapUrl};
