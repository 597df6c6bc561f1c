use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::paths::normalize;

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Directory names never descended into: dependency caches, VCS metadata, build output.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".svn",
    ".hg",
    "__pycache__",
    ".venv",
    "venv",
    ".env",
    "env",
    "dist",
    "build",
    ".next",
    ".nuxt",
    "target",
    "vendor",
];

const HIDDEN_PREFIX: char = '.';

/// Finds per-project marker directories below a root.
#[derive(Debug, Clone)]
pub struct ProjectScanner {
    marker: String,
    max_depth: usize,
}

impl ProjectScanner {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Sorted marker directories under `root`. Markers are not searched for nested
    /// markers, and unreadable subtrees are treated as empty.
    pub fn scan(&self, root: &Path) -> Vec<PathBuf> {
        let root = normalize(root);
        if !root.is_dir() {
            return Vec::new();
        }
        let mut found = BTreeSet::new();
        self.scan_into(&root, &mut found);
        found.into_iter().collect()
    }

    pub fn scan_multiple(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut found = BTreeSet::new();
        for root in roots {
            let root = normalize(root);
            if root.is_dir() {
                self.scan_into(&root, &mut found);
            }
        }
        found.into_iter().collect()
    }

    fn scan_into(&self, root: &Path, found: &mut BTreeSet<PathBuf>) {
        // Depth 0 lists the root itself, so entries sit one level deeper than the
        // directory being listed.
        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(self.max_depth.saturating_add(1))
            .into_iter();

        while let Some(item) = walker.next() {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("abandoning unreadable subtree: {}", err);
                    continue;
                }
            };
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if name == self.marker.as_str() {
                found.insert(normalize(entry.path()));
                walker.skip_current_dir();
            } else if !self.should_descend(&name) {
                walker.skip_current_dir();
            }
        }
    }

    fn should_descend(&self, name: &str) -> bool {
        !SKIP_DIRS.contains(&name) && !name.starts_with(HIDDEN_PREFIX)
    }
}
