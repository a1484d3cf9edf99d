//! Frontmatter parsing for article files.

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Article title (required, non-empty).
    pub title: String,

    /// Publication date (required).
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,

    /// Last updated date.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub updated: Option<NaiveDate>,

    /// Short summary used in listings and feeds.
    #[serde(default, alias = "description")]
    pub summary: Option<String>,

    /// Tags for the article.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Keys this crate does not interpret.
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// Both delimiters must be whole lines; trailing whitespace is ignored.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    let (opening, rest) = content.split_once('\n').unwrap_or((content, ""));

    let format = [FrontmatterFormat::Yaml, FrontmatterFormat::Toml]
        .into_iter()
        .find(|f| opening.trim_end() == f.delimiter())?;
    let delimiter = format.delimiter();

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = rest[..offset].trim();
            let body = rest[offset + line.len()..].trim_start();
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse and validate frontmatter, returning it together with the body.
///
/// Content without a frontmatter block is rejected.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Err(CoreError::frontmatter(path, "missing frontmatter block"));
    };

    let frontmatter: Frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    frontmatter.validate(path)?;
    Ok((frontmatter, body.to_string()))
}

impl Frontmatter {
    /// Validate required fields.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::frontmatter(path, "title is required"));
        }
        Ok(())
    }
}

/// Dates arrive as YAML strings or native TOML datetimes.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Toml(toml::value::Datetime),
}

impl RawDate {
    fn into_date(self) -> std::result::Result<NaiveDate, String> {
        match self {
            Self::Text(text) => parse_date(&text),
            Self::Toml(datetime) => {
                let date = datetime
                    .date
                    .ok_or_else(|| format!("datetime `{datetime}` has no date part"))?;
                NaiveDate::from_ymd_opt(
                    i32::from(date.year),
                    u32::from(date.month),
                    u32::from(date.day),
                )
                .ok_or_else(|| format!("invalid date `{datetime}`"))
            }
        }
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the date.
pub fn parse_date(text: &str) -> std::result::Result<NaiveDate, String> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.date_naive()))
        .map_err(|_| format!("invalid date `{text}`, expected YYYY-MM-DD or RFC 3339"))
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    RawDate::deserialize(deserializer)?
        .into_date()
        .map_err(serde::de::Error::custom)
}

fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawDate>::deserialize(deserializer)?
        .map(RawDate::into_date)
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = r#"---
title: "Hello World"
date: 2024-01-14
---

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert!(fm.contains("title:"));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_split_ignores_inline_dashes() {
        let content = "---\ntitle: \"a---b\"\ndate: 2024-01-14\n---\nBody";

        let (_, fm, body) = split_frontmatter(content).expect("split");
        assert!(fm.contains("a---b"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_delimiters_must_be_whole_lines() {
        let content = "---\ntitle: T\nnote: |\n  ---x\ndate: 2024-01-01\n---  \n----\nBody";

        let (_, fm, body) = split_frontmatter(content).expect("split");
        assert!(fm.contains("---x"));
        assert!(fm.contains("date: 2024-01-01"));
        assert!(body.starts_with("----\nBody"));

        let (fm, body) = parse_frontmatter(content, Path::new("t.md")).expect("parse");
        assert_eq!(fm.title, "T");
        assert_eq!(body, "----\nBody");
    }

    #[test]
    fn test_longer_rule_does_not_open_block() {
        assert!(split_frontmatter("----\ntitle: T\n----\nBody").is_none());
        assert!(split_frontmatter("---foo\ntitle: T\n---\nBody").is_none());
        assert!(split_frontmatter("---\ntitle: T\n---x\nBody").is_none());
    }

    #[test]
    fn test_crlf_delimiters() {
        let content = "+++\r\ntitle = \"T\"\r\ndate = \"2024-01-01\"\r\n+++\r\nBody";

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert!(fm.contains("title"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "Just some content without frontmatter.";
        assert!(split_frontmatter(content).is_none());

        let err = parse_frontmatter(content, Path::new("bare.md")).unwrap_err();
        assert!(err.to_string().contains("missing frontmatter block"));
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "Test Post"
date: 2024-01-14
summary: A short one.
tags:
  - rust
  - markets
---

Content here."#;

        let (fm, body) = parse_frontmatter(content, Path::new("test.mdx")).expect("parse");

        assert_eq!(fm.title, "Test Post");
        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
        assert_eq!(fm.summary.as_deref(), Some("A short one."));
        assert_eq!(fm.tags, vec!["rust", "markets"]);
        assert!(fm.updated.is_none());
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = r#"+++
title = "Test Post"
date = "2024-03-02"
tags = ["rust", "test"]
+++

Content here."#;

        let (fm, body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");

        assert_eq!(fm.title, "Test Post");
        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(fm.tags, vec!["rust", "test"]);
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_rfc3339_date_keeps_date_part() {
        let content = "---\ntitle: T\ndate: 2023-11-05T22:10:00Z\nupdated: 2024-02-01\n---\n";

        let (fm, _) = parse_frontmatter(content, Path::new("t.md")).expect("parse");

        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2023, 11, 5).unwrap());
        assert_eq!(fm.updated, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_description_alias() {
        let content = "---\ntitle: T\ndate: 2024-01-01\ndescription: From alias\n---\nBody";

        let (fm, _) = parse_frontmatter(content, Path::new("t.md")).expect("parse");

        assert_eq!(fm.summary.as_deref(), Some("From alias"));
    }

    #[test]
    fn test_frontmatter_with_extra_fields() {
        let content = r#"---
title: "Test"
date: 2024-01-01
hero_image: "/img/hero.png"
---

Body"#;

        let (fm, _body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");

        assert_eq!(fm.title, "Test");
        assert!(fm.extra.contains_key("hero_image"));
    }

    #[test]
    fn test_missing_date_rejected() {
        let content = "---\ntitle: \"No date\"\n---\nBody";

        let err = parse_frontmatter(content, Path::new("nodate.md")).unwrap_err();
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn test_bad_date_rejected() {
        let content = "---\ntitle: T\ndate: yesterday\n---\nBody";

        let err = parse_frontmatter(content, Path::new("bad.md")).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_empty_title_rejected() {
        let content = "---\ntitle: \"  \"\ndate: 2024-01-01\n---\nBody";

        let err = parse_frontmatter(content, Path::new("empty.md")).unwrap_err();
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-01"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert!(parse_date("01/02/2024").is_err());
    }
}
