//! Check command - validate configuration and content

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use folio_core::Config;
use folio_generator::ContentIndex;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and every post under the posts directory.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let result = validate(config_path);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn validate(config_path: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match crate::load_config(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e:#}"));
            println!("  ✗ Configuration invalid");
            return result;
        }
    };

    println!("\nChecking content files...");
    check_content(&config, &mut result);

    result
}

fn check_content(config: &Config, result: &mut ValidationResult) {
    let index = ContentIndex::from_config(config);

    if !index.posts_dir().is_dir() {
        result.add_warning(format!(
            "Posts directory does not exist: {}",
            index.posts_dir().display()
        ));
        return;
    }

    match index.list_posts_meta() {
        Ok(listing) => {
            println!("  ✓ {} post(s) parsed", listing.posts.len());
            for skipped in &listing.skipped {
                result.add_warning(format!("Skipped post '{}': {}", skipped.slug, skipped.reason));
            }
        }
        Err(e) => result.add_error(format!("Failed to list posts: {e}")),
    }

    println!("  ✓ {} project(s) in catalog", index.list_project_slugs().len());
}
