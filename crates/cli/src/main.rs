mod console;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use opencode_uninstaller_core::paths::normalize_user_path;
use opencode_uninstaller_core::{
    load_config, validate_config, PlatformDetector, PlatformEnv, PlatformPaths, ProjectScanner,
    SystemRunner, UninstallConfig, Uninstaller,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::{ConsolePrompter, ConsoleReporter};

#[derive(Debug, Parser)]
#[command(
    name = "opencode-uninstall",
    version,
    about = "Remove opencode executables, package installs, and leftover directories."
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Show what would be removed without deleting anything.
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Answer yes to every confirmation. The project scan is skipped.
    #[arg(short = 'f', long)]
    force: bool,

    /// Leave config directories in place.
    #[arg(short = 'c', long)]
    keep_config: bool,

    /// Leave data directories (sessions, snapshots) in place.
    #[arg(short = 'd', long)]
    keep_data: bool,

    /// JSON file overriding the tool profile and timeouts.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Maximum project-scan depth below each root.
    #[arg(long, global = true)]
    max_depth: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the directories that would be inspected on this machine.
    Paths(PathsArgs),
    /// List project marker directories under the given roots without deleting them.
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct PathsArgs {
    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Root directories to search.
    #[arg(value_name = "ROOT", required = true, num_args = 1.., action = ArgAction::Append)]
    roots: Vec<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let outcome = resolve_config(&cli.run).and_then(|config| match cli.command {
        None => run_uninstall(config),
        Some(Commands::Paths(args)) => run_paths_command(config, args),
        Some(Commands::Scan(args)) => run_scan_command(config, args),
    });

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn resolve_config(args: &RunArgs) -> Result<UninstallConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => UninstallConfig::default(),
    };
    if args.dry_run {
        config.dry_run = true;
    }
    if args.force {
        config.force = true;
    }
    if args.keep_config {
        config.keep_config = true;
    }
    if args.keep_data {
        config.keep_data = true;
    }
    if let Some(depth) = args.max_depth {
        config.scan_max_depth = depth;
    }
    validate_config(&config)?;
    Ok(config)
}

fn run_uninstall(config: UninstallConfig) -> Result<bool> {
    let platform = PlatformDetector::new(PlatformEnv::from_process(), &config.profile);
    info!("running on {}", platform.detect());
    let prompter = ConsolePrompter::install()?;
    let mut uninstaller = Uninstaller::new(
        config,
        platform,
        Arc::new(SystemRunner),
        prompter,
        ConsoleReporter,
    );
    let report = uninstaller.run();
    Ok(report.is_complete())
}

fn run_paths_command(config: UninstallConfig, args: PathsArgs) -> Result<bool> {
    let platform = PlatformDetector::new(PlatformEnv::from_process(), &config.profile);
    let paths = platform.all_paths();

    if args.json {
        let payload =
            serde_json::to_string_pretty(&paths).context("failed to serialize platform paths")?;
        println!("{payload}");
        return Ok(true);
    }

    print_paths(&config, &paths);
    Ok(true)
}

fn print_paths(config: &UninstallConfig, paths: &PlatformPaths) {
    let platform = paths
        .platform
        .map(|platform| platform.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!("{} paths on {}", config.profile.name, platform);

    let sections = [
        ("Config directories", &paths.config_dirs),
        ("Cache directories", &paths.cache_dirs),
        ("Data directories", &paths.data_dirs),
        ("State directories", &paths.state_dirs),
        ("Package manager directories", &paths.package_manager_dirs),
    ];
    for (title, dirs) in sections {
        println!("{title}:");
        for dir in dirs {
            let marker = if dir.exists() { "present" } else { "absent" };
            println!("- {} ({marker})", dir.display());
        }
    }
    println!(
        "Executable extensions: {}",
        paths
            .executable_extensions
            .iter()
            .map(|ext| if ext.is_empty() { "(none)" } else { ext.as_str() })
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn run_scan_command(config: UninstallConfig, args: ScanArgs) -> Result<bool> {
    let scanner =
        ProjectScanner::new(config.profile.marker_dir.clone()).with_max_depth(config.scan_max_depth);
    let home = PlatformEnv::from_process().home;
    let roots = args
        .roots
        .iter()
        .map(|root| normalize_user_path(root, &home))
        .collect::<Vec<_>>();
    let found = scanner.scan_multiple(&roots);

    if found.is_empty() {
        println!("No {} directories found.", scanner.marker());
        return Ok(true);
    }
    println!("Found {} {} director(ies):", found.len(), scanner.marker());
    for dir in &found {
        println!("- {}", dir.display());
    }
    Ok(true)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use opencode_uninstaller_core::Phase;

    use super::*;
    use crate::console::ConsoleEvent;

    #[test]
    fn bare_invocation_runs_the_uninstaller() {
        let cli = Cli::try_parse_from(["opencode-uninstall", "-n"]).expect("parses");
        assert!(cli.command.is_none());
        assert!(cli.run.dry_run);
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::try_parse_from(["opencode-uninstall", "scan", "/a", "/b", "--max-depth", "3"])
            .expect("parses");
        assert_eq!(cli.run.max_depth, Some(3));
        match cli.command {
            Some(Commands::Scan(args)) => assert_eq!(args.roots.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn scan_requires_a_root() {
        assert!(Cli::try_parse_from(["opencode-uninstall", "scan"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = RunArgs {
            dry_run: true,
            force: false,
            keep_config: true,
            keep_data: false,
            config: None,
            max_depth: Some(4),
        };
        let config = resolve_config(&args).expect("resolves");
        assert!(config.dry_run);
        assert!(config.keep_config);
        assert!(!config.keep_data);
        assert_eq!(config.scan_max_depth, 4);
    }

    #[test]
    fn short_flags_select_force_and_keep_options() {
        let cli = Cli::try_parse_from(["opencode-uninstall", "-f", "-c", "-d"]).expect("parses");
        assert!(cli.run.force);
        assert!(cli.run.keep_config);
        assert!(cli.run.keep_data);
        let config = resolve_config(&cli.run).expect("resolves");
        assert!(config.force && config.keep_config && config.keep_data);
    }

    #[test]
    fn interrupt_at_the_first_prompt_still_reports() {
        let (tx, rx) = std::sync::mpsc::channel();
        tx.send(ConsoleEvent::Interrupted).expect("send");
        let config = UninstallConfig::default();
        let platform = PlatformDetector::new(
            PlatformEnv::with_home("/nonexistent-uninstall-home"),
            &config.profile,
        );
        let mut uninstaller = Uninstaller::new(
            config,
            platform,
            Arc::new(SystemRunner),
            ConsolePrompter::from_events(rx),
            ConsoleReporter,
        );

        let report = uninstaller.run();

        assert_eq!(uninstaller.phase(), Phase::Done);
        assert_eq!(report.total_removed(), 0);
        assert!(report.is_complete());
    }
}
