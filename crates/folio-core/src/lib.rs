//! folio core library
//!
//! Configuration, error handling, frontmatter parsing and the article and
//! project types shared by the folio crates.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod post;
pub mod project;

pub use config::{Config, HeartbeatSettings};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use post::{ContentType, Post, PostMeta, is_valid_slug, slug_from_path};
pub use project::{Project, ProjectCatalog};
