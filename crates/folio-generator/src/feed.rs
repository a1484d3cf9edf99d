//! RSS feed generation for the writing section.

use chrono::{DateTime, Utc};
use folio_core::{Config, Post};
use rss::{Category, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use tracing::debug;

/// Maximum length of item descriptions derived from the body.
const EXCERPT_CHARS: usize = 200;

/// RSS feed generator.
#[derive(Debug)]
pub struct FeedGenerator {
    config: Config,
}

impl FeedGenerator {
    /// Create a new feed generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate RSS XML from posts ordered newest first.
    pub fn generate(&self, posts: &[Post], now: DateTime<Utc>) -> String {
        let limit = self.config.feed.limit;
        let items: Vec<Item> = posts
            .iter()
            .take(limit)
            .map(|post| self.post_to_item(post))
            .collect();

        debug!(count = items.len(), limit, "generating feed");

        let channel = ChannelBuilder::default()
            .title(self.config.site.title.clone())
            .link(self.config.url_for("writing"))
            .description(
                self.config
                    .site
                    .description
                    .clone()
                    .unwrap_or_else(|| self.config.site.title.clone()),
            )
            .last_build_date(Some(now.to_rfc2822()))
            .items(items)
            .build();

        channel.to_string()
    }

    /// Convert a post to an RSS item.
    fn post_to_item(&self, post: &Post) -> Item {
        let url = self.config.url_for(&format!("writing/{}", post.meta.slug));
        let guid = GuidBuilder::default().value(url.clone()).permalink(true).build();

        let mut builder = ItemBuilder::default();
        builder.title(Some(post.meta.title.clone()));
        builder.link(Some(url));
        builder.guid(Some(guid));
        builder.description(Some(post.excerpt(EXCERPT_CHARS)));
        builder.pub_date(
            post.meta
                .date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().to_rfc2822()),
        );

        if let Some(author) = &self.config.site.author {
            builder.author(Some(author.clone()));
        }

        let categories: Vec<_> = post
            .meta
            .tags
            .iter()
            .map(|tag| Category {
                name: tag.clone(),
                domain: None,
            })
            .collect();
        if !categories.is_empty() {
            builder.categories(categories);
        }

        builder.build()
    }
}
