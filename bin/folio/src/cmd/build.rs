//! Build command - generates sitemap, feed, robots.txt and the post index

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use folio_generator::Builder;

/// Run the build command.
pub fn run(config_path: &Path, output: &Path, base_url: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?base_url, "Starting build");

    let mut config = crate::load_config(config_path)?;

    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base_url from CLI");
        config.site.base_url = url.to_string();
    }

    let stats = Builder::new(config, output)
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Posts:        {}", stats.posts);
    println!("  Skipped:      {}", stats.skipped);
    println!("  Projects:     {}", stats.projects);
    println!("  Sitemap URLs: {}", stats.sitemap_urls);
    println!("  Feed items:   {}", stats.feed_items);
    println!();
    println!("  Duration:     {:.2}s", duration.as_secs_f64());
    println!("  Output:       {}", output.display());
    println!();

    if stats.skipped > 0 {
        tracing::warn!(skipped = stats.skipped, "Some posts were skipped; run `folio check` for details");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_build_writes_artifacts_with_base_url_override() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("writing");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-03-01\n---\nHi there",
        )
        .unwrap();

        let config_path = dir.path().join("folio.toml");
        fs::write(
            &config_path,
            format!(
                r#"
[site]
title = "Test"
base_url = "https://example.com"

[content]
posts_dir = "{}"

[heartbeat]
username = "octocat"
"#,
                posts.display()
            ),
        )
        .unwrap();

        let output = dir.path().join("public");
        run(&config_path, &output, Some("https://override.dev")).unwrap();

        let sitemap = fs::read_to_string(output.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("https://override.dev/writing/hello"));
        assert!(!sitemap.contains("https://example.com"));
        assert!(output.join("robots.txt").exists());
        assert!(output.join("feed.xml").exists());
        assert!(output.join("posts.json").exists());
    }

    #[test]
    fn test_build_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        let result = run(&dir.path().join("nope.toml"), &dir.path().join("out"), None);
        assert!(result.is_err());
    }
}
