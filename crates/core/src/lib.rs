pub mod cleaner;
pub mod config;
pub mod error;
pub mod executables;
pub mod model;
pub mod package_manager;
pub mod paths;
pub mod platform;
pub mod process;
pub mod project_scan;
pub mod report;
pub mod uninstaller;

pub use cleaner::DirectoryCleaner;
pub use config::{load_config, validate_config, ToolProfile, UninstallConfig};
pub use error::{CommandError, RemoveError, UninstallFailure};
pub use executables::ExecutableDetector;
pub use model::{
    FailedItem, PackageManagerOutcome, PlatformId, PlatformPaths, RemovalOutcome, RemoveResult,
    UninstallReport, UninstallResult,
};
pub use package_manager::{default_registry, Availability, ManagerSpec, PackageManagerUninstaller};
pub use platform::{PlatformDetector, PlatformEnv};
pub use process::{CommandOutput, CommandRunner, SystemRunner};
pub use project_scan::{ProjectScanner, DEFAULT_MAX_DEPTH, SKIP_DIRS};
pub use report::render_text_report;
pub use uninstaller::{is_affirmative, Phase, Prompter, Reporter, Uninstaller, AFFIRMATIVE_ANSWERS};
