use std::io;
use std::time::Duration;

use thiserror::Error;

/// Failure to obtain any exit status from a child process.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("executable not found: {program}")]
    NotFound { program: String },
    #[error("{program} timed out after {}s", after.as_secs())]
    TimedOut { program: String, after: Duration },
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoveError {
    #[error("not a directory")]
    NotADirectory,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl RemoveError {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => RemoveError::PermissionDenied(err.to_string()),
            _ => RemoveError::DeleteFailed(err.to_string()),
        }
    }
}

/// Why a package-manager uninstall did not succeed. The display strings of the unit
/// variants are stable tags.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UninstallFailure {
    #[error("unsupported")]
    Unsupported,
    #[error("not_installed")]
    NotInstalled,
    #[error("timeout")]
    Timeout,
    #[error("{0}")]
    CommandFailed(String),
    #[error("{0}")]
    Spawn(String),
}
