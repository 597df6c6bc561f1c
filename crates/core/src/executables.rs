use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::ToolProfile;
use crate::paths::normalize;
use crate::platform::PlatformDetector;
use crate::process::CommandRunner;

/// Finds every plausible location of the tool's executables.
pub struct ExecutableDetector {
    platform: PlatformDetector,
    runner: Arc<dyn CommandRunner>,
    tool: String,
    binary_names: Vec<String>,
    lookup_timeout: Duration,
}

impl ExecutableDetector {
    pub fn new(
        platform: PlatformDetector,
        runner: Arc<dyn CommandRunner>,
        profile: &ToolProfile,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            platform,
            runner,
            tool: profile.name.to_lowercase(),
            binary_names: profile.binary_names.clone(),
            lookup_timeout,
        }
    }

    /// Sorted, de-duplicated union of the search-path, package-manager and bun probes.
    pub fn find(&self) -> Vec<PathBuf> {
        let mut found = BTreeSet::new();
        found.extend(self.find_in_path());
        found.extend(self.find_in_package_manager_dirs());
        found.extend(self.find_in_bun_dirs());
        debug!("executable discovery found {} candidate(s)", found.len());
        found.into_iter().collect()
    }

    pub fn find_in_path(&self) -> Vec<PathBuf> {
        let mut found = BTreeSet::new();
        for name in &self.binary_names {
            found.extend(self.lookup(name));
        }
        found.into_iter().collect()
    }

    pub fn find_in_package_manager_dirs(&self) -> Vec<PathBuf> {
        let extensions = self.platform.executable_extensions();
        let mut found = BTreeSet::new();
        for dir in self.platform.package_manager_dirs() {
            if !dir.is_dir() {
                continue;
            }
            for name in &self.binary_names {
                for ext in &extensions {
                    let candidate = dir.join(format!("{name}{ext}"));
                    if candidate.is_file() {
                        found.insert(normalize(&candidate));
                    }
                }
            }
        }
        found.into_iter().collect()
    }

    /// Files in bun's bin directory whose name mentions the tool, plus global package
    /// directories named exactly like one of the tool's binaries.
    pub fn find_in_bun_dirs(&self) -> Vec<PathBuf> {
        let mut found = BTreeSet::new();
        if !self.platform.bun_dir().is_dir() {
            return Vec::new();
        }

        found.extend(self.matching_files(&self.platform.bun_bin_dir()));

        let global_modules = self.platform.bun_global_modules_dir();
        if global_modules.is_dir() {
            for name in &self.binary_names {
                let package_dir = global_modules.join(name);
                if package_dir.exists() {
                    found.insert(normalize(&package_dir));
                }
            }
        }
        found.into_iter().collect()
    }

    fn matching_files(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("skipping {}: {}", dir.display(), err);
                return Vec::new();
            }
        };
        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .to_lowercase()
                    .contains(&self.tool)
            })
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .map(|path| normalize(&path))
            .collect()
    }

    fn lookup(&self, name: &str) -> Vec<PathBuf> {
        let (program, args) = if self.platform.detect().is_windows() {
            ("where", vec![name.to_string()])
        } else {
            ("which", vec!["-a".to_string(), name.to_string()])
        };

        match self.runner.run(program, &args, self.lookup_timeout) {
            Ok(output) if output.success => output
                .stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(PathBuf::from)
                .filter(|path| path.exists())
                .map(|path| normalize(&path))
                .collect(),
            Ok(_) => Vec::new(),
            Err(err) => {
                debug!("search-path lookup for {} unavailable: {}", name, err);
                Vec::new()
            }
        }
    }
}
