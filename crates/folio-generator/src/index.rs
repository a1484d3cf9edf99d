//! Content index over the posts directory.
//!
//! Reads article files on demand and exposes the read-only queries the page
//! layer and the build pipeline use. Nothing is cached between calls.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use folio_core::{
    Config, ContentType, CoreError, Post, PostMeta, ProjectCatalog, is_valid_slug, slug_from_path,
};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Content index errors.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The posts directory does not exist.
    #[error("content directory missing: {}", path.display())]
    DirectoryMissing { path: PathBuf },

    /// No file backs the requested slug.
    #[error("post not found: {slug}")]
    PostNotFound { slug: String },

    /// A file exists but its frontmatter is missing or malformed.
    #[error("invalid post {}: {source}", path.display())]
    InvalidPost {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for content index operations.
pub type Result<T> = std::result::Result<T, ContentError>;

/// A post that was left out of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPost {
    /// Slug of the unreadable file.
    pub slug: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of listing post metadata.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostListing {
    /// Posts ordered by date descending, slug ascending.
    pub posts: Vec<PostMeta>,
    /// Entries that failed to load.
    pub skipped: Vec<SkippedPost>,
}

impl PostListing {
    /// Number of entries left out.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Read-only index of posts and projects.
#[derive(Debug, Clone)]
pub struct ContentIndex {
    posts_dir: PathBuf,
    projects: ProjectCatalog,
}

impl ContentIndex {
    /// Create an index over `posts_dir` with the builtin project catalog.
    #[must_use]
    pub fn new(posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            projects: ProjectCatalog::builtin(),
        }
    }

    /// Create an index from site configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.content.posts_dir)
    }

    /// Replace the project catalog.
    #[must_use]
    pub fn with_projects(mut self, projects: ProjectCatalog) -> Self {
        self.projects = projects;
        self
    }

    /// Directory the index reads from.
    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// List every post slug, sorted ascending.
    ///
    /// A missing directory yields an empty list rather than an error.
    pub fn list_post_slugs(&self) -> Result<Vec<String>> {
        Ok(self.scan()?.into_keys().collect())
    }

    /// List metadata for every readable post, newest first.
    ///
    /// Files that fail to parse are logged and reported in
    /// [`PostListing::skipped`] instead of failing the listing.
    pub fn list_posts_meta(&self) -> Result<PostListing> {
        let files = self.scan()?;
        info!(dir = %self.posts_dir.display(), count = files.len(), "listing posts");

        let results: Vec<_> = files
            .into_par_iter()
            .map(|(slug, path)| {
                let loaded = load_post(&slug, &path);
                (slug, loaded)
            })
            .collect();

        let mut listing = PostListing::default();
        for (slug, loaded) in results {
            match loaded {
                Ok(post) => listing.posts.push(post.meta),
                Err(e) => {
                    warn!(slug = %slug, error = %e, "skipping unreadable post");
                    listing.skipped.push(SkippedPost {
                        slug,
                        reason: e.to_string(),
                    });
                }
            }
        }

        sort_posts(&mut listing.posts);

        if !listing.skipped.is_empty() {
            warn!(
                skipped = listing.skipped.len(),
                loaded = listing.posts.len(),
                "some posts were skipped"
            );
        }

        Ok(listing)
    }

    /// Resolve one full post.
    ///
    /// Fails with [`ContentError::DirectoryMissing`] when the posts directory
    /// is absent and [`ContentError::PostNotFound`] when no file backs `slug`.
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Post> {
        if !self.posts_dir.is_dir() {
            return Err(ContentError::DirectoryMissing {
                path: self.posts_dir.clone(),
            });
        }

        let path = self
            .locate(slug)
            .ok_or_else(|| ContentError::PostNotFound {
                slug: slug.to_string(),
            })?;

        load_post(slug, &path)
    }

    /// List project slugs from the in-process catalog.
    pub fn list_project_slugs(&self) -> Vec<String> {
        self.projects.slugs()
    }

    /// Project catalog attached to this index.
    pub fn projects(&self) -> &ProjectCatalog {
        &self.projects
    }

    /// Find the file backing `slug`, preferring `.mdx` over `.md`.
    fn locate(&self, slug: &str) -> Option<PathBuf> {
        if !is_valid_slug(slug) {
            debug!(slug, "rejecting invalid slug");
            return None;
        }

        ContentType::LOOKUP_ORDER
            .iter()
            .map(|ct| self.posts_dir.join(format!("{slug}.{}", ct.extension())))
            .find(|path| path.is_file())
    }

    /// Map each slug to its backing file.
    fn scan(&self) -> Result<BTreeMap<String, PathBuf>> {
        let mut files: BTreeMap<String, (ContentType, PathBuf)> = BTreeMap::new();

        if !self.posts_dir.is_dir() {
            debug!(dir = %self.posts_dir.display(), "posts directory missing, nothing to list");
            return Ok(BTreeMap::new());
        }

        for entry in fs::read_dir(&self.posts_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let Some((slug, content_type)) = slug_from_path(&path) else {
                continue;
            };

            match files.get(&slug) {
                Some((existing, existing_path)) => {
                    warn!(
                        slug = %slug,
                        kept = %existing_path.display(),
                        other = %path.display(),
                        "duplicate slug"
                    );
                    if lookup_rank(content_type) < lookup_rank(*existing) {
                        files.insert(slug, (content_type, path));
                    }
                }
                None => {
                    files.insert(slug, (content_type, path));
                }
            }
        }

        Ok(files
            .into_iter()
            .map(|(slug, (_, path))| (slug, path))
            .collect())
    }
}

fn lookup_rank(content_type: ContentType) -> usize {
    ContentType::LOOKUP_ORDER
        .iter()
        .position(|ct| *ct == content_type)
        .unwrap_or(usize::MAX)
}

/// Read and parse one post file.
fn load_post(slug: &str, path: &Path) -> Result<Post> {
    debug!(path = %path.display(), "reading post");
    let content = fs::read_to_string(path)?;
    Post::parse(slug, &content, path).map_err(|source| ContentError::InvalidPost {
        path: path.to_path_buf(),
        source,
    })
}

/// Order posts by date descending, breaking ties by slug ascending.
pub fn sort_posts(posts: &mut [PostMeta]) {
    posts.sort_by(compare_posts);
}

fn compare_posts(a: &PostMeta, b: &PostMeta) -> Ordering {
    b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
}
