use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::cleaner::DirectoryCleaner;
use crate::config::UninstallConfig;
use crate::error::RemoveError;
use crate::executables::ExecutableDetector;
use crate::model::{path_string, FailedItem, RemovalOutcome, RemoveResult, UninstallReport};
use crate::package_manager::{default_registry, PackageManagerUninstaller};
use crate::paths::normalize_user_path;
use crate::platform::PlatformDetector;
use crate::process::CommandRunner;
use crate::project_scan::ProjectScanner;
use crate::report::render_text_report;

/// Answers accepted as "yes" at a confirmation gate, compared case-insensitively.
pub const AFFIRMATIVE_ANSWERS: &[&str] = &["y", "yes", "是", "确定"];

/// Source of user answers. `None` means the input was closed or interrupted.
pub trait Prompter {
    fn ask(&mut self, question: &str) -> Option<String>;
}

/// Sink for progress lines and the final report.
pub trait Reporter {
    fn emit(&mut self, line: &str);
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE_ANSWERS.contains(&answer.as_str())
}

/// Phases of one run, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Confirm,
    Executables,
    PackageManagers,
    ConfigDirs,
    CacheDirs,
    DataDirs,
    StateDirs,
    ProjectDirs,
    Reported,
    Done,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Confirm => "confirm",
            Phase::Executables => "executables",
            Phase::PackageManagers => "package managers",
            Phase::ConfigDirs => "config directories",
            Phase::CacheDirs => "cache directories",
            Phase::DataDirs => "data directories",
            Phase::StateDirs => "state directories",
            Phase::ProjectDirs => "project directories",
            Phase::Reported => "report",
            Phase::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StandardDirs {
    Cache,
    Data,
    State,
}

pub struct Uninstaller<P: Prompter, R: Reporter> {
    config: UninstallConfig,
    platform: PlatformDetector,
    executables: ExecutableDetector,
    package_managers: PackageManagerUninstaller,
    cleaner: DirectoryCleaner,
    scanner: ProjectScanner,
    prompter: P,
    reporter: R,
    phase: Phase,
}

impl<P: Prompter, R: Reporter> Uninstaller<P, R> {
    pub fn new(
        config: UninstallConfig,
        platform: PlatformDetector,
        runner: Arc<dyn CommandRunner>,
        prompter: P,
        reporter: R,
    ) -> Self {
        let executables = ExecutableDetector::new(
            platform.clone(),
            runner.clone(),
            &config.profile,
            config.lookup_timeout(),
        );
        let package_managers = PackageManagerUninstaller::new(
            runner,
            default_registry(&config.profile),
            config.check_timeout(),
            config.uninstall_timeout(),
        );
        let cleaner = DirectoryCleaner::new(config.dry_run);
        let scanner =
            ProjectScanner::new(config.profile.marker_dir.clone()).with_max_depth(config.scan_max_depth);

        Self {
            config,
            platform,
            executables,
            package_managers,
            cleaner,
            scanner,
            prompter,
            reporter,
            phase: Phase::Confirm,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_parts(self) -> (P, R) {
        (self.prompter, self.reporter)
    }

    /// Drives every phase to completion and returns the accumulated report. Individual
    /// failures are recorded, never propagated.
    pub fn run(&mut self) -> UninstallReport {
        let mut report = UninstallReport::new(self.config.dry_run);
        self.phase = Phase::Confirm;
        while self.phase != Phase::Done {
            info!("uninstall phase: {}", self.phase.label());
            self.phase = self.step(&mut report);
        }
        report
    }

    fn step(&mut self, report: &mut UninstallReport) -> Phase {
        match self.phase {
            Phase::Confirm => {
                if self.confirm_start() {
                    Phase::Executables
                } else {
                    self.say("\nUninstall cancelled.");
                    Phase::Reported
                }
            }
            Phase::Executables => {
                self.process_executables(report);
                Phase::PackageManagers
            }
            Phase::PackageManagers => {
                self.process_package_managers(report);
                Phase::ConfigDirs
            }
            Phase::ConfigDirs => {
                self.process_config_dirs(report);
                Phase::CacheDirs
            }
            Phase::CacheDirs => {
                self.process_standard_dirs(StandardDirs::Cache, report);
                Phase::DataDirs
            }
            Phase::DataDirs => {
                self.process_standard_dirs(StandardDirs::Data, report);
                Phase::StateDirs
            }
            Phase::StateDirs => {
                self.process_standard_dirs(StandardDirs::State, report);
                Phase::ProjectDirs
            }
            Phase::ProjectDirs => {
                self.process_project_dirs(report);
                Phase::Reported
            }
            Phase::Reported => {
                let text = render_text_report(report);
                for line in text.lines() {
                    self.reporter.emit(line);
                }
                Phase::Done
            }
            Phase::Done => Phase::Done,
        }
    }

    /// Asks a yes/no question. `force` answers yes without asking.
    pub fn confirm(&mut self, question: &str) -> bool {
        if self.config.force {
            return true;
        }
        self.prompter
            .ask(question)
            .is_some_and(|answer| is_affirmative(&answer))
    }

    fn prompt(&mut self, question: &str) -> String {
        self.prompter
            .ask(question)
            .map(|answer| answer.trim().to_string())
            .unwrap_or_default()
    }

    fn say(&mut self, line: impl AsRef<str>) {
        self.reporter.emit(line.as_ref());
    }

    fn confirm_start(&mut self) -> bool {
        let tool = self.config.profile.name.clone();
        let marker = self.config.profile.marker_dir.clone();
        let rule = "=".repeat(50);
        self.say(&rule);
        self.say(format!("{tool} complete removal"));
        self.say(&rule);
        if self.config.dry_run {
            self.say("\n! Preview mode - nothing will actually be deleted");
        }
        if self.config.keep_config {
            self.say("! Config directories will be kept (--keep-config)");
        }
        if self.config.keep_data {
            self.say("! Data directories will be kept (--keep-data)");
        }
        self.say("\nThis will remove:");
        self.say(format!("  - {tool} executables"));
        self.say(format!("  - {tool} installed through package managers"));
        self.say(format!("  - {tool} config directories"));
        self.say(format!("  - {tool} cache, data and state directories"));
        self.say(format!("  - {marker} directories inside projects (optional)"));
        self.say(format!("\n{rule}"));
        self.confirm("Continue? (y/n): ")
    }

    fn process_executables(&mut self, report: &mut UninstallReport) {
        self.say("\n[Executables]");
        let found = self.executables.find();
        if found.is_empty() {
            self.say("  no executables found");
            return;
        }
        self.say(format!("  found {} executable(s)/package dir(s)", found.len()));

        let cleaner = self.cleaner;
        self.remove_each(&found, &mut report.executables, |path| {
            cleaner.remove_path(path)
        });
    }

    fn process_package_managers(&mut self, report: &mut UninstallReport) {
        self.say("\n[Package managers]");
        let outcome = &mut report.package_managers;

        if self.config.dry_run {
            let (available, unavailable) = self.package_managers.partition_available();
            if !available.is_empty() {
                self.say("  [preview] would attempt uninstall through:");
            }
            for manager in available {
                self.say(format!("    - {manager}"));
                outcome.record_success(&manager);
            }
            outcome.skipped.extend(unavailable);
            return;
        }

        let managers = &mut self.package_managers;
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| managers.uninstall_all()));
        let (results, skipped) = match attempt {
            Ok(value) => value,
            Err(_) => {
                warn!("package manager phase aborted unexpectedly");
                outcome
                    .failed
                    .push(FailedItem::new("package managers", "unexpected error"));
                return;
            }
        };

        for result in results {
            if result.success {
                self.say(format!("  ✓ {}: {}", result.target, result.message));
                outcome.record_success(result.manager());
            } else {
                self.say(format!("  ✗ {}: {}", result.target, result.message));
                let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
                outcome.failed.push(FailedItem::new(result.target, reason));
            }
        }
        outcome.skipped.extend(skipped);
    }

    fn process_config_dirs(&mut self, report: &mut UninstallReport) {
        self.say("\n[Config directories]");
        let existing = self.cleaner.find_directories(&self.platform.config_dirs());
        if existing.is_empty() {
            self.say("  no config directories found");
            return;
        }

        self.say(format!("  found {} config directory(ies):", existing.len()));
        for dir in &existing {
            self.say(format!("    - {}", dir.display()));
        }
        if self.config.keep_config {
            self.say("  config directories kept (--keep-config)");
            report
                .config_dirs_skipped
                .extend(existing.iter().map(|dir| path_string(dir)));
            return;
        }
        if !self.confirm("\n  Delete these config directories? (y/n): ") {
            self.say("  config directories kept");
            report
                .config_dirs_skipped
                .extend(existing.iter().map(|dir| path_string(dir)));
            return;
        }

        let cleaner = self.cleaner;
        self.remove_each(&existing, &mut report.config_dirs, |path| {
            cleaner.remove_directory(path)
        });
    }

    fn process_standard_dirs(&mut self, kind: StandardDirs, report: &mut UninstallReport) {
        let (title, candidates) = match kind {
            StandardDirs::Cache => ("cache", self.platform.cache_dirs()),
            StandardDirs::Data => ("data", self.platform.data_dirs()),
            StandardDirs::State => ("state", self.platform.state_dirs()),
        };
        self.say(format!("\n[{} directories]", capitalize(title)));
        let existing = self.cleaner.find_directories(&candidates);
        if existing.is_empty() {
            self.say(format!("  no {title} directories found"));
            return;
        }

        if matches!(kind, StandardDirs::Data) && self.config.keep_data {
            self.say("  data directories kept (--keep-data)");
            report
                .data_dirs_skipped
                .extend(existing.iter().map(|dir| path_string(dir)));
            return;
        }

        let outcome = match kind {
            StandardDirs::Cache => &mut report.cache_dirs,
            StandardDirs::Data => &mut report.data_dirs,
            StandardDirs::State => &mut report.state_dirs,
        };
        let cleaner = self.cleaner;
        self.remove_each(&existing, outcome, |path| cleaner.remove_directory(path));
    }

    fn process_project_dirs(&mut self, report: &mut UninstallReport) {
        let marker = self.scanner.marker().to_string();
        self.say(format!("\n[Project {marker} directories]"));

        // The scan needs a root typed by the user, which a forced run cannot supply.
        if self.config.force {
            self.say("  project scan skipped (--force)");
            report.project_scan_skipped = true;
            return;
        }

        if !self.confirm(&format!("  Scan projects for {marker} directories? (y/n): ")) {
            self.say("  project scan skipped");
            report.project_scan_skipped = true;
            return;
        }

        let answer = self.prompt("  Root directory to scan: ");
        if answer.is_empty() {
            self.say("  no path given, scan skipped");
            report.project_scan_skipped = true;
            return;
        }
        let root = normalize_user_path(&answer, self.platform.home_dir());
        if !root.exists() {
            self.say(format!("  path does not exist: {}", root.display()));
            report.project_scan_skipped = true;
            return;
        }

        self.say(format!("  scanning {}", root.display()));
        let found = self.scanner.scan(&root);
        if found.is_empty() {
            self.say(format!("  no {marker} directories found"));
            return;
        }

        self.say(format!("  found {} {marker} directory(ies):", found.len()));
        for dir in &found {
            self.say(format!("    - {}", dir.display()));
        }
        if !self.confirm("\n  Delete these directories? (y/n): ") {
            self.say("  project directories kept");
            return;
        }

        let cleaner = self.cleaner;
        self.remove_each(&found, &mut report.project_dirs, |path| {
            cleaner.remove_directory(path)
        });
    }

    /// Applies `remove` to every path in order. A panic inside one removal becomes a
    /// failure for that path only.
    fn remove_each<F>(&mut self, paths: &[PathBuf], outcome: &mut RemovalOutcome, remove: F)
    where
        F: Fn(&Path) -> RemoveResult,
    {
        for path in paths {
            let result = panic::catch_unwind(AssertUnwindSafe(|| remove(path))).unwrap_or_else(
                |_| {
                    RemoveResult::failed(
                        path.clone(),
                        &RemoveError::Unexpected("removal aborted".to_string()),
                    )
                },
            );
            self.announce(&result);
            outcome.record(&result);
        }
    }

    fn announce(&mut self, result: &RemoveResult) {
        let path = result.display_path();
        let line = match (&result.error, self.config.dry_run) {
            (None, true) => format!("  [preview] would remove: {path}"),
            (None, false) => format!("  ✓ removed: {path}"),
            (Some(error), _) => format!("  ✗ failed: {path} ({error})"),
        };
        self.say(line);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use std::time::Duration;

    use super::*;
    use crate::error::CommandError;
    use crate::model::PlatformId;
    use crate::platform::PlatformEnv;
    use crate::process::CommandOutput;

    #[derive(Default)]
    struct ScriptedPrompter {
        answers: VecDeque<Option<String>>,
        asked: Vec<String>,
    }

    impl ScriptedPrompter {
        fn answering(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| Some(a.to_string())).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, question: &str) -> Option<String> {
            self.asked.push(question.to_string());
            self.answers.pop_front().flatten()
        }
    }

    #[derive(Default)]
    struct Transcript(Vec<String>);

    impl Reporter for Transcript {
        fn emit(&mut self, line: &str) {
            self.0.push(line.to_string());
        }
    }

    /// Only `npm` exists; everything else is missing from the search path.
    #[derive(Default)]
    struct NpmOnly {
        calls: RefCell<Vec<String>>,
    }

    impl CommandRunner for NpmOnly {
        fn run(
            &self,
            program: &str,
            args: &[String],
            _timeout: Duration,
        ) -> Result<CommandOutput, CommandError> {
            self.calls
                .borrow_mut()
                .push(format!("{program} {}", args.join(" ")));
            if program != "npm" {
                return Err(CommandError::NotFound {
                    program: program.to_string(),
                });
            }
            Ok(CommandOutput {
                code: Some(0),
                success: true,
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    fn fixture(
        home: &Path,
        dry_run: bool,
        prompter: ScriptedPrompter,
    ) -> (Uninstaller<ScriptedPrompter, Transcript>, Arc<NpmOnly>) {
        let config = UninstallConfig {
            dry_run,
            ..UninstallConfig::default()
        };
        fixture_with(home, config, prompter)
    }

    fn fixture_with(
        home: &Path,
        mut config: UninstallConfig,
        prompter: ScriptedPrompter,
    ) -> (Uninstaller<ScriptedPrompter, Transcript>, Arc<NpmOnly>) {
        // Keeps real binaries in /usr/local/bin out of reach.
        config.profile.binary_names = vec!["opencode-fixture-bin".to_string()];
        let platform =
            PlatformDetector::for_platform(PlatformId::Linux, PlatformEnv::with_home(home), &config.profile);
        let runner = Arc::new(NpmOnly::default());
        let uninstaller =
            Uninstaller::new(config, platform, runner.clone(), prompter, Transcript::default());
        (uninstaller, runner)
    }

    fn seed_home(home: &Path) {
        for dir in [".opencode", ".cache/opencode", ".local/share/opencode/db"] {
            fs::create_dir_all(home.join(dir)).expect("mkdir");
        }
    }

    #[test]
    fn affirmative_vocabulary_is_case_insensitive() {
        for answer in ["y", "Y", " yes ", "YES", "是", "确定"] {
            assert!(is_affirmative(answer), "{answer}");
        }
        for answer in ["", "n", "no", "yep", "ok"] {
            assert!(!is_affirmative(answer), "{answer}");
        }
    }

    #[test]
    fn declined_start_touches_nothing() {
        let home = tempfile::tempdir().expect("tempdir");
        seed_home(home.path());
        let (mut uninstaller, runner) =
            fixture(home.path(), false, ScriptedPrompter::answering(&["n"]));

        let report = uninstaller.run();

        assert_eq!(uninstaller.phase(), Phase::Done);
        assert_eq!(report.total_removed(), 0);
        assert!(report.package_managers.is_empty());
        assert!(runner.calls.borrow().is_empty());
        assert!(home.path().join(".opencode").is_dir());
        assert!(uninstaller
            .reporter()
            .0
            .iter()
            .any(|line| line.contains("Uninstall cancelled")));
    }

    #[test]
    fn closed_input_counts_as_decline() {
        let home = tempfile::tempdir().expect("tempdir");
        seed_home(home.path());
        let (mut uninstaller, _) = fixture(home.path(), false, ScriptedPrompter::default());

        let report = uninstaller.run();
        assert_eq!(report.total_removed(), 0);
        assert!(home.path().join(".cache/opencode").is_dir());
    }

    #[test]
    fn full_run_removes_every_category() {
        let home = tempfile::tempdir().expect("tempdir");
        seed_home(home.path());
        let projects = home.path().join("code");
        fs::create_dir_all(projects.join("app/.opencode")).expect("mkdir");
        let root = projects.to_string_lossy().into_owned();
        let prompter = ScriptedPrompter::answering(&["y", "y", "yes", &root, "是"]);
        let (mut uninstaller, runner) = fixture(home.path(), false, prompter);

        let report = uninstaller.run();

        assert!(report.is_complete(), "{report:?}");
        assert_eq!(report.config_dirs.removed.len(), 1);
        assert_eq!(report.cache_dirs.removed.len(), 1);
        assert_eq!(report.data_dirs.removed.len(), 1);
        assert_eq!(report.project_dirs.removed.len(), 1);
        assert_eq!(report.package_managers.succeeded, vec!["npm".to_string()]);
        assert!(report.package_managers.skipped.contains(&"bun".to_string()));
        assert!(!home.path().join(".opencode").exists());
        assert!(!home.path().join(".local/share/opencode").exists());
        assert!(!projects.join("app/.opencode").exists());
        assert!(projects.join("app").is_dir());
        assert!(runner
            .calls
            .borrow()
            .contains(&"npm uninstall -g opencode-ai".to_string()));

        let (prompter, transcript) = uninstaller.into_parts();
        assert_eq!(prompter.asked.len(), 5);
        assert!(transcript.0.iter().any(|line| line == "Uninstall complete"));
    }

    #[test]
    fn declined_config_gate_keeps_config_but_not_cache() {
        let home = tempfile::tempdir().expect("tempdir");
        seed_home(home.path());
        let prompter = ScriptedPrompter::answering(&["y", "n", "n"]);
        let (mut uninstaller, _) = fixture(home.path(), false, prompter);

        let report = uninstaller.run();

        assert!(home.path().join(".opencode").is_dir());
        assert!(!home.path().join(".cache/opencode").exists());
        assert_eq!(report.config_dirs_skipped.len(), 1);
        assert!(report.config_dirs.is_empty());
        assert!(report.project_scan_skipped);
    }

    #[test]
    fn declined_project_deletion_keeps_markers() {
        let home = tempfile::tempdir().expect("tempdir");
        let marker = home.path().join("p/.opencode");
        fs::create_dir_all(&marker).expect("mkdir");
        let root = home.path().join("p").to_string_lossy().into_owned();
        // No config dirs exist, so there is no config gate.
        let prompter = ScriptedPrompter::answering(&["y", "y", &root, "n"]);
        let (mut uninstaller, _) = fixture(home.path(), false, prompter);

        let report = uninstaller.run();

        assert!(marker.is_dir());
        assert!(report.project_dirs.is_empty());
        assert!(!report.project_scan_skipped);
    }

    #[test]
    fn empty_or_missing_root_skips_scan() {
        for root in ["", "/definitely/not/here"] {
            let home = tempfile::tempdir().expect("tempdir");
            let prompter = ScriptedPrompter::answering(&["y", "y", root]);
            let (mut uninstaller, _) = fixture(home.path(), false, prompter);
            let report = uninstaller.run();
            assert!(report.project_scan_skipped, "{root:?}");
        }
    }

    #[test]
    fn preview_leaves_filesystem_and_packages_alone() {
        let home = tempfile::tempdir().expect("tempdir");
        seed_home(home.path());
        let prompter = ScriptedPrompter::answering(&["y", "y", "n"]);
        let (mut uninstaller, runner) = fixture(home.path(), true, prompter);

        let report = uninstaller.run();

        assert!(report.dry_run);
        assert_eq!(report.total_removed(), 3);
        assert!(home.path().join(".opencode").is_dir());
        assert!(home.path().join(".cache/opencode").is_dir());
        assert_eq!(report.package_managers.succeeded, vec!["npm".to_string()]);
        assert!(runner
            .calls
            .borrow()
            .iter()
            .all(|call| !call.contains("uninstall")));
        assert!(uninstaller
            .reporter()
            .0
            .iter()
            .any(|line| line.starts_with("  [preview] would remove:")));
    }

    #[test]
    fn interrupted_answer_declines_and_run_still_reports() {
        let home = tempfile::tempdir().expect("tempdir");
        seed_home(home.path());
        let prompter = ScriptedPrompter {
            answers: VecDeque::from([Some("y".to_string()), None, None]),
            asked: Vec::new(),
        };
        let (mut uninstaller, _) = fixture(home.path(), false, prompter);

        let report = uninstaller.run();

        assert_eq!(uninstaller.phase(), Phase::Done);
        assert!(home.path().join(".opencode").is_dir());
        assert_eq!(report.config_dirs_skipped.len(), 1);
        assert!(!home.path().join(".cache/opencode").exists());
        assert!(report.project_scan_skipped);
        assert!(uninstaller
            .reporter()
            .0
            .iter()
            .any(|line| line == "Uninstall complete"));
    }

    #[test]
    fn state_directory_is_removed_without_a_gate() {
        let home = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(home.path().join(".local/state/opencode")).expect("mkdir");
        let prompter = ScriptedPrompter::answering(&["y", "n"]);
        let (mut uninstaller, _) = fixture(home.path(), false, prompter);

        let report = uninstaller.run();

        assert_eq!(report.state_dirs.removed.len(), 1);
        assert!(!home.path().join(".local/state/opencode").exists());
        let (prompter, _) = uninstaller.into_parts();
        assert_eq!(prompter.asked.len(), 2);
    }

    #[test]
    fn force_answers_every_gate_and_skips_the_project_scan() {
        let home = tempfile::tempdir().expect("tempdir");
        seed_home(home.path());
        fs::create_dir_all(home.path().join("p/.opencode")).expect("mkdir");
        let config = UninstallConfig {
            force: true,
            ..UninstallConfig::default()
        };
        let (mut uninstaller, _) = fixture_with(home.path(), config, ScriptedPrompter::default());

        let report = uninstaller.run();

        assert_eq!(report.config_dirs.removed.len(), 1);
        assert_eq!(report.cache_dirs.removed.len(), 1);
        assert_eq!(report.data_dirs.removed.len(), 1);
        assert!(report.project_scan_skipped);
        assert!(home.path().join("p/.opencode").is_dir());
        let (prompter, _) = uninstaller.into_parts();
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn keep_flags_leave_config_and_data_as_skipped() {
        let home = tempfile::tempdir().expect("tempdir");
        seed_home(home.path());
        let config = UninstallConfig {
            keep_config: true,
            keep_data: true,
            ..UninstallConfig::default()
        };
        let prompter = ScriptedPrompter::answering(&["y", "n"]);
        let (mut uninstaller, _) = fixture_with(home.path(), config, prompter);

        let report = uninstaller.run();

        assert!(home.path().join(".opencode").is_dir());
        assert!(home.path().join(".local/share/opencode/db").is_dir());
        assert!(!home.path().join(".cache/opencode").exists());
        assert_eq!(report.config_dirs_skipped.len(), 1);
        assert_eq!(report.data_dirs_skipped.len(), 1);
        assert!(report.config_dirs.is_empty());
        assert!(report.data_dirs.is_empty());
        assert!(report.is_complete());
        // Only the start gate and the scan gate were asked.
        let (prompter, _) = uninstaller.into_parts();
        assert_eq!(prompter.asked.len(), 2);
    }

    #[test]
    fn capitalize_handles_empty_and_ascii() {
        assert_eq!(capitalize("cache"), "Cache");
        assert_eq!(capitalize(""), "");
    }
}
