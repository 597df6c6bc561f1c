use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RemoveError, UninstallFailure};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlatformId {
    Windows,
    Macos,
    Linux,
}

impl PlatformId {
    /// Platform family of the running binary. Anything that is neither Windows nor macOS
    /// gets Linux-style paths.
    pub fn current() -> Self {
        if cfg!(windows) {
            PlatformId::Windows
        } else if cfg!(target_os = "macos") {
            PlatformId::Macos
        } else {
            PlatformId::Linux
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformId::Windows => "windows",
            PlatformId::Macos => "macos",
            PlatformId::Linux => "linux",
        }
    }

    pub fn is_windows(self) -> bool {
        self == PlatformId::Windows
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlatformPaths {
    pub platform: Option<PlatformId>,
    pub config_dirs: Vec<PathBuf>,
    pub cache_dirs: Vec<PathBuf>,
    pub data_dirs: Vec<PathBuf>,
    pub state_dirs: Vec<PathBuf>,
    pub executable_extensions: Vec<String>,
    pub package_manager_dirs: Vec<PathBuf>,
}

/// Outcome of one filesystem deletion attempt. `error` is set exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveResult {
    pub path: PathBuf,
    pub success: bool,
    pub error: Option<String>,
}

impl RemoveResult {
    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(path: impl Into<PathBuf>, error: &RemoveError) -> Self {
        Self {
            path: path.into(),
            success: false,
            error: Some(error.to_string()),
        }
    }

    pub fn display_path(&self) -> String {
        path_string(&self.path)
    }
}

/// Outcome of one package-manager uninstall command. `target` is `<manager>:<package>`,
/// or just the manager name when the manager itself could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallResult {
    pub target: String,
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

impl UninstallResult {
    pub fn succeeded(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failed(
        target: impl Into<String>,
        message: impl Into<String>,
        failure: &UninstallFailure,
    ) -> Self {
        Self {
            target: target.into(),
            success: false,
            message: message.into(),
            error: Some(failure.to_string()),
        }
    }

    pub fn manager(&self) -> &str {
        self.target
            .split_once(':')
            .map(|(manager, _)| manager)
            .unwrap_or(&self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub target: String,
    pub reason: String,
}

impl FailedItem {
    pub fn new(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemovalOutcome {
    pub removed: Vec<String>,
    pub failed: Vec<FailedItem>,
}

impl RemovalOutcome {
    pub fn record(&mut self, result: &RemoveResult) {
        if result.success {
            self.removed.push(result.display_path());
        } else {
            let reason = result
                .error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string());
            self.failed
                .push(FailedItem::new(result.display_path(), reason));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageManagerOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedItem>,
    /// Managers that are not installed on this machine. Not a failure.
    pub skipped: Vec<String>,
}

impl PackageManagerOutcome {
    pub fn record_success(&mut self, manager: &str) {
        if !self.succeeded.iter().any(|name| name == manager) {
            self.succeeded.push(manager.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Accumulates the outcome of a single uninstall run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UninstallReport {
    pub dry_run: bool,
    pub executables: RemovalOutcome,
    pub package_managers: PackageManagerOutcome,
    pub config_dirs: RemovalOutcome,
    /// Config directories left in place, by answer or by `keep_config`.
    pub config_dirs_skipped: Vec<String>,
    pub cache_dirs: RemovalOutcome,
    pub data_dirs: RemovalOutcome,
    pub data_dirs_skipped: Vec<String>,
    pub state_dirs: RemovalOutcome,
    pub project_dirs: RemovalOutcome,
    pub project_scan_skipped: bool,
}

impl UninstallReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    fn removal_outcomes(&self) -> [&RemovalOutcome; 6] {
        [
            &self.executables,
            &self.config_dirs,
            &self.cache_dirs,
            &self.data_dirs,
            &self.state_dirs,
            &self.project_dirs,
        ]
    }

    /// True when nothing failed. Skipped managers and user-declined categories do not count.
    pub fn is_complete(&self) -> bool {
        self.package_managers.failed.is_empty()
            && self
                .removal_outcomes()
                .iter()
                .all(|outcome| outcome.failed.is_empty())
    }

    pub fn total_removed(&self) -> usize {
        self.removal_outcomes()
            .iter()
            .map(|outcome| outcome.removed.len())
            .sum()
    }

    pub fn total_failed(&self) -> usize {
        self.package_managers.failed.len()
            + self
                .removal_outcomes()
                .iter()
                .map(|outcome| outcome.failed.len())
                .sum::<usize>()
    }
}

pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
