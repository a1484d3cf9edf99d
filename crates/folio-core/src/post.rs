//! Article types and slug handling.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    frontmatter::{Frontmatter, parse_frontmatter},
};

/// Words per minute used for reading time estimates.
const WORDS_PER_MINUTE: u32 = 200;

/// Article source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// MDX content (.mdx files).
    Mdx,
    /// Markdown content (.md files).
    Markdown,
}

impl ContentType {
    /// Lookup order when resolving a slug to a file. `.mdx` shadows `.md`.
    pub const LOOKUP_ORDER: [ContentType; 2] = [ContentType::Mdx, ContentType::Markdown];

    /// Determine content type from file extension.
    ///
    /// Only the exact extensions tried by slug lookup are accepted.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::LOOKUP_ORDER
            .into_iter()
            .find(|ct| ct.extension() == ext)
    }

    /// Get the file extension for this content type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mdx => "mdx",
            Self::Markdown => "md",
        }
    }
}

/// Derive a slug from an article path: the file stem of a `.md`/`.mdx` file.
///
/// Hidden files and unsupported extensions yield `None`.
pub fn slug_from_path(path: &Path) -> Option<(String, ContentType)> {
    let content_type = ContentType::from_extension(path.extension()?.to_str()?)?;
    let stem = path.file_stem()?.to_str()?;
    is_valid_slug(stem).then(|| (stem.to_string(), content_type))
}

/// Whether `slug` can name a file directly inside the posts directory.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
        && !slug.contains("..")
}

/// Metadata for one published article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Identifier derived from the filename.
    pub slug: String,

    /// Article title.
    pub title: String,

    /// Publication date.
    pub date: NaiveDate,

    /// Last updated date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<NaiveDate>,

    /// Optional summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Word count of the body.
    pub word_count: u32,

    /// Reading time in minutes.
    pub reading_time: u32,
}

impl PostMeta {
    /// Date used as last-modified: `updated` when present, else `date`.
    pub fn last_modified(&self) -> NaiveDate {
        self.updated.unwrap_or(self.date)
    }
}

/// A full article: metadata plus raw body markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Parsed metadata.
    pub meta: PostMeta,

    /// Body markup without the frontmatter block.
    pub body: String,

    /// File the post was read from.
    pub source_path: PathBuf,
}

impl Post {
    /// Parse a post from file content.
    pub fn parse(slug: impl Into<String>, content: &str, path: &Path) -> Result<Self> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        Ok(Self::from_parts(slug.into(), frontmatter, body, path))
    }

    /// Assemble a post from already parsed parts.
    pub fn from_parts(slug: String, fm: Frontmatter, body: String, path: &Path) -> Self {
        let word_count = body.split_whitespace().count() as u32;
        let reading_time = (word_count / WORDS_PER_MINUTE).max(1);

        Self {
            meta: PostMeta {
                slug,
                title: fm.title,
                date: fm.date,
                updated: fm.updated,
                summary: fm.summary,
                tags: fm.tags,
                word_count,
                reading_time,
            },
            body,
            source_path: path.to_path_buf(),
        }
    }

    /// Summary if present, else a plain-text excerpt of the body.
    pub fn excerpt(&self, max_chars: usize) -> String {
        match &self.meta.summary {
            Some(summary) => summary.clone(),
            None => {
                let plain = strip_markup(&self.body);
                let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");
                truncate_at_word_boundary(&plain, max_chars)
            }
        }
    }
}

/// Strip HTML/JSX tags and `import`/`export` lines from MDX markup.
fn strip_markup(markup: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for line in markup.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") || trimmed.starts_with("export ") {
            continue;
        }
        for c in line.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => result.push(c),
                _ => {}
            }
        }
        result.push('\n');
    }

    result
}

/// Truncate text at word boundary, respecting UTF-8 character boundaries.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text.to_string();
    }

    let truncate_byte_idx = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let truncated = &text[..truncate_byte_idx];

    if let Some(last_space_byte) = truncated.rfind(' ') {
        format!("{}...", &truncated[..last_space_byte])
    } else {
        format!("{truncated}...")
    }
}
