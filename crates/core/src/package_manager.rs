use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ToolProfile;
use crate::error::{CommandError, UninstallFailure};
use crate::model::UninstallResult;
use crate::process::CommandRunner;

/// Output fragments that mean "the package was not there to begin with".
/// Several managers exit non-zero in that case. Matching is best effort.
const ABSENT_MARKERS: &[&str] = &["not found", "not installed", "no such"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallCommand {
    pub package: String,
    pub argv: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerSpec {
    pub name: String,
    pub check: Vec<String>,
    pub uninstall: Vec<UninstallCommand>,
}

impl ManagerSpec {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            check: vec![name.to_string(), "--version".to_string()],
            uninstall: Vec::new(),
        }
    }

    fn with_command(mut self, package: &str, argv: &[&str]) -> Self {
        self.uninstall.push(UninstallCommand {
            package: package.to_string(),
            argv: argv.iter().map(|arg| arg.to_string()).collect(),
        });
        self
    }
}

/// Supported managers in probe order.
pub fn default_registry(profile: &ToolProfile) -> Vec<ManagerSpec> {
    let mut bun = ManagerSpec::new("bun");
    let mut npm = ManagerSpec::new("npm");
    let mut pnpm = ManagerSpec::new("pnpm");
    let mut yarn = ManagerSpec::new("yarn");
    for package in profile.package_names.iter().map(String::as_str) {
        bun = bun.with_command(package, &["bun", "remove", "-g", package]);
        npm = npm.with_command(package, &["npm", "uninstall", "-g", package]);
        pnpm = pnpm.with_command(package, &["pnpm", "remove", "-g", package]);
        yarn = yarn.with_command(package, &["yarn", "global", "remove", package]);
    }

    let primary = profile.primary_package();
    let scoop = ManagerSpec::new("scoop").with_command(primary, &["scoop", "uninstall", primary]);
    let choco =
        ManagerSpec::new("choco").with_command(primary, &["choco", "uninstall", primary, "-y"]);

    vec![bun, npm, pnpm, yarn, scoop, choco]
}

/// Result of probing a manager's `--version` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Missing,
    TimedOut,
    Failed,
}

pub struct PackageManagerUninstaller {
    runner: Arc<dyn CommandRunner>,
    registry: Vec<ManagerSpec>,
    availability: HashMap<String, Availability>,
    check_timeout: Duration,
    uninstall_timeout: Duration,
}

impl PackageManagerUninstaller {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        registry: Vec<ManagerSpec>,
        check_timeout: Duration,
        uninstall_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            registry,
            availability: HashMap::new(),
            check_timeout,
            uninstall_timeout,
        }
    }

    pub fn supported_managers(&self) -> Vec<String> {
        self.registry.iter().map(|spec| spec.name.clone()).collect()
    }

    /// Runs the manager's check command at most once per uninstaller. `None` for names
    /// outside the registry.
    pub fn probe(&mut self, manager: &str) -> Option<Availability> {
        if let Some(cached) = self.availability.get(manager) {
            return Some(*cached);
        }
        let spec = self.registry.iter().find(|spec| spec.name == manager)?;
        let (program, args) = spec.check.split_first()?;

        let availability = match self.runner.run(program, args, self.check_timeout) {
            Ok(output) if output.success => Availability::Available,
            Ok(output) => {
                debug!("{} check exited with {:?}", manager, output.code);
                Availability::Failed
            }
            Err(CommandError::NotFound { .. }) => Availability::Missing,
            Err(CommandError::TimedOut { .. }) => Availability::TimedOut,
            Err(err) => {
                debug!("{} check failed: {}", manager, err);
                Availability::Failed
            }
        };
        self.availability.insert(manager.to_string(), availability);
        Some(availability)
    }

    pub fn is_available(&mut self, manager: &str) -> bool {
        self.probe(manager) == Some(Availability::Available)
    }

    /// Runs every uninstall command of `manager`, each reported on its own.
    pub fn uninstall(&mut self, manager: &str) -> Vec<UninstallResult> {
        let Some(spec) = self
            .registry
            .iter()
            .find(|spec| spec.name == manager)
            .cloned()
        else {
            return vec![UninstallResult::failed(
                manager,
                format!("unsupported package manager: {manager}"),
                &UninstallFailure::Unsupported,
            )];
        };

        if !self.is_available(manager) {
            return vec![UninstallResult::failed(
                manager,
                format!("{manager} is not installed"),
                &UninstallFailure::NotInstalled,
            )];
        }

        spec.uninstall
            .iter()
            .map(|command| self.run_uninstall_command(manager, command))
            .collect()
    }

    /// Attempts every registered manager. Unavailable managers, and managers with nothing
    /// to run, are returned separately and never appear among the results.
    pub fn uninstall_all(&mut self) -> (Vec<UninstallResult>, Vec<String>) {
        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for manager in self.supported_managers() {
            if !self.has_commands(&manager) {
                debug!("{} has no uninstall commands configured", manager);
                skipped.push(manager);
                continue;
            }
            if !self.is_available(&manager) {
                skipped.push(manager);
                continue;
            }
            info!("uninstalling through {}", manager);
            results.extend(self.uninstall(&manager));
        }
        (results, skipped)
    }

    /// Splits the registry into available and unavailable managers without uninstalling.
    pub fn partition_available(&mut self) -> (Vec<String>, Vec<String>) {
        self.supported_managers()
            .into_iter()
            .partition(|manager| self.is_available(manager))
    }

    fn has_commands(&self, manager: &str) -> bool {
        self.registry
            .iter()
            .any(|spec| spec.name == manager && !spec.uninstall.is_empty())
    }

    fn run_uninstall_command(&self, manager: &str, command: &UninstallCommand) -> UninstallResult {
        let target = format!("{manager}:{}", command.package);
        let package = &command.package;
        let Some((program, args)) = command.argv.split_first() else {
            return UninstallResult::failed(
                target,
                format!("no command configured for {package}"),
                &UninstallFailure::Spawn("empty command".to_string()),
            );
        };

        match self.runner.run(program, args, self.uninstall_timeout) {
            Ok(output) if output.success => UninstallResult::succeeded(
                target,
                format!("removed {package} via {manager}"),
            ),
            Ok(output) => {
                let combined = output.combined_lowercase();
                if ABSENT_MARKERS.iter().any(|marker| combined.contains(marker)) {
                    return UninstallResult::succeeded(
                        target,
                        format!("{package} was not installed via {manager}"),
                    );
                }
                let reason = match output.stderr.trim() {
                    "" => format!(
                        "exit code: {}",
                        output
                            .code
                            .map(|code| code.to_string())
                            .unwrap_or_else(|| "signal".to_string())
                    ),
                    stderr => stderr.to_string(),
                };
                warn!("{} failed to remove {}: {}", manager, package, reason);
                UninstallResult::failed(
                    target,
                    format!("failed to remove {package} via {manager}"),
                    &UninstallFailure::CommandFailed(reason),
                )
            }
            Err(CommandError::TimedOut { .. }) => UninstallResult::failed(
                target,
                format!("removing {package} via {manager} timed out"),
                &UninstallFailure::Timeout,
            ),
            Err(err) => UninstallResult::failed(
                target,
                format!("could not run {manager} to remove {package}"),
                &UninstallFailure::Spawn(err.to_string()),
            ),
        }
    }
}
