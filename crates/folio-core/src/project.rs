//! In-process project catalog backing the project detail pages.

use serde::Serialize;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// URL identifier.
    pub slug: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub tagline: &'static str,
    /// Topic tags.
    pub tags: &'static [&'static str],
}

const BUILTIN_PROJECTS: &[Project] = &[
    Project {
        slug: "market-replay",
        name: "Market Replay",
        tagline: "Interactive long-form walkthrough of a historical market event",
        tags: &["finance", "visualization"],
    },
    Project {
        slug: "gradient-explainer",
        name: "Gradient Explainer",
        tagline: "Visual explainer for an iterative optimization algorithm",
        tags: &["optimization", "visualization"],
    },
    Project {
        slug: "tldr",
        name: "TL;DR",
        tagline: "Catalog of small open-source tools",
        tags: &["open-source", "tools"],
    },
    Project {
        slug: "github-heartbeat",
        name: "GitHub Heartbeat",
        tagline: "Cached proxy over the public GitHub activity feed",
        tags: &["api", "github"],
    },
];

/// Read-only list of projects compiled into the binary.
#[derive(Debug, Clone)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    /// The catalog shipped with the site.
    pub fn builtin() -> Self {
        Self {
            projects: BUILTIN_PROJECTS.to_vec(),
        }
    }

    /// A catalog over an explicit project list.
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// All projects in catalog order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Project slugs in catalog order.
    pub fn slugs(&self) -> Vec<String> {
        self.projects.iter().map(|p| p.slug.to_string()).collect()
    }

    /// Look up a project by slug.
    pub fn get(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }
}

impl Default for ProjectCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
