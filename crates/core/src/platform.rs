use std::env;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use crate::config::ToolProfile;
use crate::model::{PlatformId, PlatformPaths};
use crate::paths::dedup_paths;

/// Snapshot of the environment values that influence standard directory locations.
/// Captured once at the process edge; the detector never reads the environment itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformEnv {
    pub home: PathBuf,
    pub appdata: Option<PathBuf>,
    pub local_appdata: Option<PathBuf>,
    pub temp: Option<PathBuf>,
    pub xdg_config_home: Option<PathBuf>,
    pub xdg_cache_home: Option<PathBuf>,
    pub xdg_data_home: Option<PathBuf>,
    pub xdg_state_home: Option<PathBuf>,
    pub pnpm_home: Option<PathBuf>,
    pub bun_install: Option<PathBuf>,
    pub scoop: Option<PathBuf>,
    pub chocolatey_install: Option<PathBuf>,
}

impl PlatformEnv {
    pub fn from_process() -> Self {
        Self {
            home: dirs::home_dir().unwrap_or_else(|| PathBuf::from(MAIN_SEPARATOR_STR)),
            appdata: env_path("APPDATA"),
            local_appdata: env_path("LOCALAPPDATA"),
            temp: env_path("TEMP"),
            xdg_config_home: env_path("XDG_CONFIG_HOME"),
            xdg_cache_home: env_path("XDG_CACHE_HOME"),
            xdg_data_home: env_path("XDG_DATA_HOME"),
            xdg_state_home: env_path("XDG_STATE_HOME"),
            pnpm_home: env_path("PNPM_HOME"),
            bun_install: env_path("BUN_INSTALL"),
            scoop: env_path("SCOOP"),
            chocolatey_install: env_path("ChocolateyInstall"),
        }
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            ..Self::default()
        }
    }
}

// Relative values are ignored, the same way XDG consumers treat them.
fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
}

/// Resolves the standard config/cache/data/package-manager locations of the tool for
/// one platform family. Pure computation over templates and [`PlatformEnv`].
#[derive(Debug, Clone)]
pub struct PlatformDetector {
    platform: PlatformId,
    env: PlatformEnv,
    tool: String,
}

impl PlatformDetector {
    pub fn new(env: PlatformEnv, profile: &ToolProfile) -> Self {
        Self::for_platform(PlatformId::current(), env, profile)
    }

    pub fn for_platform(platform: PlatformId, env: PlatformEnv, profile: &ToolProfile) -> Self {
        Self {
            platform,
            env,
            tool: profile.name.clone(),
        }
    }

    pub fn detect(&self) -> PlatformId {
        self.platform
    }

    pub fn home_dir(&self) -> &Path {
        &self.env.home
    }

    pub fn config_dirs(&self) -> Vec<PathBuf> {
        let home = self.home_dir();
        let mut dirs = vec![home.join(format!(".{}", self.tool)), home.join(".config").join(&self.tool)];
        match self.platform {
            PlatformId::Windows => {
                dirs.push(self.appdata().join(&self.tool));
                dirs.push(self.local_appdata().join(&self.tool));
                dirs.push(self.local_appdata().join(format!("{}-nodejs", self.tool)));
            }
            PlatformId::Linux => {
                if let Some(xdg_config) = &self.env.xdg_config_home {
                    dirs.push(xdg_config.join(&self.tool));
                }
            }
            PlatformId::Macos => {}
        }
        dedup_paths(dirs)
    }

    pub fn cache_dirs(&self) -> Vec<PathBuf> {
        let dirs = match self.platform {
            PlatformId::Windows => {
                let temp = self
                    .env
                    .temp
                    .clone()
                    .unwrap_or_else(|| self.local_appdata().join("Temp"));
                vec![
                    self.local_appdata().join(&self.tool).join("cache"),
                    temp.join(&self.tool),
                ]
            }
            PlatformId::Macos => vec![self.home_dir().join("Library").join("Caches").join(&self.tool)],
            PlatformId::Linux => {
                let cache = self
                    .env
                    .xdg_cache_home
                    .clone()
                    .unwrap_or_else(|| self.home_dir().join(".cache"));
                vec![cache.join(&self.tool)]
            }
        };
        dedup_paths(dirs)
    }

    pub fn data_dirs(&self) -> Vec<PathBuf> {
        let dirs = match self.platform {
            PlatformId::Windows => vec![self.local_appdata().join(&self.tool).join("data")],
            PlatformId::Macos => vec![self
                .home_dir()
                .join("Library")
                .join("Application Support")
                .join(&self.tool)],
            PlatformId::Linux => {
                let data = self
                    .env
                    .xdg_data_home
                    .clone()
                    .unwrap_or_else(|| self.home_dir().join(".local").join("share"));
                vec![data.join(&self.tool)]
            }
        };
        dedup_paths(dirs)
    }

    /// XDG state location (logs, prompt history). Used on every platform, with the
    /// `~/.local/state` default when `XDG_STATE_HOME` is unset.
    pub fn state_dirs(&self) -> Vec<PathBuf> {
        let state = self
            .env
            .xdg_state_home
            .clone()
            .unwrap_or_else(|| self.home_dir().join(".local").join("state"));
        vec![state.join(&self.tool)]
    }

    /// Suffixes to try when probing a directory for an executable by base name.
    pub fn executable_extensions(&self) -> Vec<String> {
        let extensions: &[&str] = if self.platform.is_windows() {
            &["", ".exe", ".cmd", ".bat", ".ps1"]
        } else {
            &[""]
        };
        extensions.iter().map(|ext| ext.to_string()).collect()
    }

    /// Root of the bun installation (`$BUN_INSTALL` or `~/.bun`).
    pub fn bun_dir(&self) -> PathBuf {
        self.env
            .bun_install
            .clone()
            .unwrap_or_else(|| self.home_dir().join(".bun"))
    }

    pub fn bun_bin_dir(&self) -> PathBuf {
        self.bun_dir().join("bin")
    }

    pub fn bun_global_modules_dir(&self) -> PathBuf {
        self.bun_dir()
            .join("install")
            .join("global")
            .join("node_modules")
    }

    /// Global install directories of every supported package manager. Existence is
    /// left to the caller.
    pub fn package_manager_dirs(&self) -> Vec<PathBuf> {
        let home = self.home_dir();
        let mut dirs = vec![self.bun_bin_dir(), self.bun_global_modules_dir()];

        if self.platform.is_windows() {
            let npm = self.appdata().join("npm");
            dirs.push(npm.clone());
            dirs.push(npm.join("node_modules"));
            dirs.push(
                self.env
                    .pnpm_home
                    .clone()
                    .unwrap_or_else(|| self.local_appdata().join("pnpm")),
            );
            let yarn = self.local_appdata().join("Yarn");
            dirs.push(yarn.join("bin"));
            dirs.push(yarn.join("Data").join("global").join("node_modules"));
            let scoop = self
                .env
                .scoop
                .clone()
                .unwrap_or_else(|| home.join("scoop"));
            dirs.push(scoop.join("shims"));
            if let Some(choco) = &self.env.chocolatey_install {
                dirs.push(choco.join("bin"));
            }
        } else {
            dirs.push(PathBuf::from("/usr/local/bin"));
            dirs.push(PathBuf::from("/usr/local/lib/node_modules"));
            let npm_global = home.join(".npm-global");
            dirs.push(npm_global.join("bin"));
            dirs.push(npm_global.join("lib").join("node_modules"));
            dirs.push(
                self.env
                    .pnpm_home
                    .clone()
                    .unwrap_or_else(|| home.join(".local").join("share").join("pnpm")),
            );
            dirs.push(home.join(".yarn").join("bin"));
            dirs.push(
                home.join(".config")
                    .join("yarn")
                    .join("global")
                    .join("node_modules"),
            );
        }

        dedup_paths(dirs)
    }

    pub fn all_paths(&self) -> PlatformPaths {
        PlatformPaths {
            platform: Some(self.platform),
            config_dirs: self.config_dirs(),
            cache_dirs: self.cache_dirs(),
            data_dirs: self.data_dirs(),
            state_dirs: self.state_dirs(),
            executable_extensions: self.executable_extensions(),
            package_manager_dirs: self.package_manager_dirs(),
        }
    }

    fn appdata(&self) -> PathBuf {
        self.env
            .appdata
            .clone()
            .unwrap_or_else(|| self.home_dir().join("AppData").join("Roaming"))
    }

    fn local_appdata(&self) -> PathBuf {
        self.env
            .local_appdata
            .clone()
            .unwrap_or_else(|| self.home_dir().join("AppData").join("Local"))
    }
}
