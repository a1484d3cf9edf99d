//! Sitemap generation.
//!
//! One entry per static section, project page and post.

use chrono::{DateTime, NaiveDate, Utc};
use folio_core::{Config, PostMeta};
use tracing::debug;

/// Priority of the home page.
pub const HOME_PRIORITY: f32 = 1.0;
/// Priority of top-level sections other than home.
pub const SECTION_PRIORITY: f32 = 0.8;
/// Priority of project detail pages.
pub const PROJECT_PRIORITY: f32 = 0.7;
/// Priority of posts.
pub const POST_PRIORITY: f32 = 0.6;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// URL location.
    pub loc: String,

    /// Last modification date.
    pub lastmod: NaiveDate,

    /// Change frequency.
    pub changefreq: ChangeFreq,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the entry list: sections, then projects, then posts.
    ///
    /// `now` is used as last-modified for entries without a date of their own.
    pub fn entries(
        &self,
        posts: &[PostMeta],
        project_slugs: &[String],
        now: DateTime<Utc>,
    ) -> Vec<SitemapUrl> {
        let today = now.date_naive();
        let sections = &self.config.sitemap.sections;
        let mut urls = Vec::with_capacity(sections.len() + project_slugs.len() + posts.len());

        for section in sections {
            let section = section.trim_matches('/');
            let (changefreq, priority) = if section.is_empty() {
                (ChangeFreq::Weekly, HOME_PRIORITY)
            } else {
                (ChangeFreq::Monthly, SECTION_PRIORITY)
            };
            urls.push(SitemapUrl {
                loc: self.config.url_for(section),
                lastmod: today,
                changefreq,
                priority,
            });
        }

        for slug in project_slugs {
            urls.push(SitemapUrl {
                loc: self.config.url_for(&format!("projects/{slug}")),
                lastmod: today,
                changefreq: ChangeFreq::Monthly,
                priority: PROJECT_PRIORITY,
            });
        }

        for post in posts {
            urls.push(SitemapUrl {
                loc: self.config.url_for(&format!("writing/{}", post.slug)),
                lastmod: post.last_modified(),
                changefreq: ChangeFreq::Monthly,
                priority: POST_PRIORITY,
            });
        }

        urls
    }

    /// Render entries as sitemap XML.
    pub fn render(&self, urls: &[SitemapUrl]) -> String {
        debug!(count = urls.len(), "rendering sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in urls {
            xml.push_str(&url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Generate sitemap XML in one step.
    pub fn generate(
        &self,
        posts: &[PostMeta],
        project_slugs: &[String],
        now: DateTime<Utc>,
    ) -> String {
        self.render(&self.entries(posts, project_slugs, now))
    }
}

/// Convert a URL entry to XML.
fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::from("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));
    xml.push_str(&format!(
        "    <lastmod>{}</lastmod>\n",
        url.lastmod.format("%Y-%m-%d")
    ));
    xml.push_str(&format!(
        "    <changefreq>{}</changefreq>\n",
        url.changefreq.as_str()
    ));
    xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));
    xml.push_str("  </url>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
