use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::project_scan::DEFAULT_MAX_DEPTH;

/// Identity of the tool being removed: the names every discovery strategy looks for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolProfile {
    #[serde(default = "default_tool_name")]
    pub name: String,
    #[serde(default = "default_marker_dir")]
    pub marker_dir: String,
    #[serde(default = "default_tool_aliases")]
    pub binary_names: Vec<String>,
    #[serde(default = "default_tool_aliases")]
    pub package_names: Vec<String>,
}

fn default_tool_name() -> String {
    "opencode".to_string()
}

fn default_marker_dir() -> String {
    ".opencode".to_string()
}

fn default_tool_aliases() -> Vec<String> {
    ["opencode", "opencode-ai", "oh-my-opencode"]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

impl Default for ToolProfile {
    fn default() -> Self {
        Self {
            name: default_tool_name(),
            marker_dir: default_marker_dir(),
            binary_names: default_tool_aliases(),
            package_names: default_tool_aliases(),
        }
    }
}

impl ToolProfile {
    /// Package used by managers that only know the tool under one name (scoop, choco).
    pub fn primary_package(&self) -> &str {
        self.package_names
            .first()
            .map(String::as_str)
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UninstallConfig {
    #[serde(default)]
    pub profile: ToolProfile,
    #[serde(default)]
    pub dry_run: bool,
    /// Answer every yes/no gate with yes. The project scan needs a root, so it is skipped.
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub keep_config: bool,
    #[serde(default)]
    pub keep_data: bool,
    #[serde(default = "default_scan_max_depth")]
    pub scan_max_depth: usize,
    #[serde(default = "default_check_timeout_secs")]
    pub check_timeout_secs: u64,
    #[serde(default = "default_uninstall_timeout_secs")]
    pub uninstall_timeout_secs: u64,
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

fn default_scan_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_check_timeout_secs() -> u64 {
    10
}

fn default_uninstall_timeout_secs() -> u64 {
    60
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

impl Default for UninstallConfig {
    fn default() -> Self {
        Self {
            profile: ToolProfile::default(),
            dry_run: false,
            force: false,
            keep_config: false,
            keep_data: false,
            scan_max_depth: default_scan_max_depth(),
            check_timeout_secs: default_check_timeout_secs(),
            uninstall_timeout_secs: default_uninstall_timeout_secs(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl UninstallConfig {
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn uninstall_timeout(&self) -> Duration {
        Duration::from_secs(self.uninstall_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

pub fn load_config(path: &Path) -> Result<UninstallConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: UninstallConfig = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &UninstallConfig) -> Result<()> {
    let profile = &config.profile;
    if profile.name.trim().is_empty() {
        return Err(anyhow!("profile.name must not be empty"));
    }
    if profile.marker_dir.trim().is_empty() || profile.marker_dir.contains(['/', '\\']) {
        return Err(anyhow!(
            "profile.marker_dir must be a single non-empty directory name"
        ));
    }
    if profile.binary_names.iter().any(|name| name.trim().is_empty()) {
        return Err(anyhow!("profile.binary_names must not contain empty names"));
    }
    if profile.package_names.is_empty() {
        return Err(anyhow!("profile.package_names must name at least one package"));
    }
    if profile.package_names.iter().any(|name| name.trim().is_empty()) {
        return Err(anyhow!("profile.package_names must not contain empty names"));
    }
    if config.check_timeout_secs == 0
        || config.uninstall_timeout_secs == 0
        || config.lookup_timeout_secs == 0
    {
        return Err(anyhow!("command timeouts must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: UninstallConfig = serde_json::from_str("{}").expect("parses");
        assert_eq!(config, UninstallConfig::default());
        assert_eq!(config.scan_max_depth, 10);
        assert_eq!(config.profile.marker_dir, ".opencode");
        assert_eq!(config.profile.primary_package(), "opencode");
    }

    #[test]
    fn partial_profile_keeps_other_defaults() {
        let config: UninstallConfig =
            serde_json::from_str(r#"{"profile": {"name": "mytool"}, "uninstall_timeout_secs": 5}"#)
                .expect("parses");
        assert_eq!(config.profile.name, "mytool");
        assert_eq!(config.profile.binary_names.len(), 3);
        assert_eq!(config.uninstall_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn rejects_zero_timeouts_and_nested_markers() {
        let config = UninstallConfig {
            check_timeout_secs: 0,
            ..UninstallConfig::default()
        };
        assert!(validate_config(&config).is_err());

        let mut config = UninstallConfig::default();
        config.profile.marker_dir = "a/.opencode".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_profile_without_packages() {
        let config: UninstallConfig =
            serde_json::from_str(r#"{"profile": {"package_names": []}}"#).expect("parses");
        let err = validate_config(&config).expect_err("empty package list");
        assert!(err.to_string().contains("package_names"));
    }

    #[test]
    fn keep_and_force_flags_default_off() {
        let config: UninstallConfig =
            serde_json::from_str(r#"{"keep_data": true}"#).expect("parses");
        assert!(config.keep_data);
        assert!(!config.keep_config);
        assert!(!config.force);
    }

    #[test]
    fn load_config_reads_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("uninstall.json");
        fs::write(&path, r#"{"dry_run": true, "scan_max_depth": 3}"#).expect("write");

        let config = load_config(&path).expect("loads");
        assert!(config.dry_run);
        assert_eq!(config.scan_max_depth, 3);

        assert!(load_config(&dir.path().join("missing.json")).is_err());
    }
}
