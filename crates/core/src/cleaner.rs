use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::RemoveError;
use crate::model::RemoveResult;
use crate::paths::normalize;

/// Deletes files and directory trees. In preview mode every removal that would be
/// attempted reports success and the filesystem is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryCleaner {
    dry_run: bool,
}

impl DirectoryCleaner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn find_directories(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths
            .iter()
            .map(|path| normalize(path))
            .filter(|path| path.is_dir())
            .collect()
    }

    pub fn find_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths
            .iter()
            .map(|path| normalize(path))
            .filter(|path| path.is_file())
            .collect()
    }

    /// Recursively removes a directory. A path that does not exist counts as removed.
    pub fn remove_directory(&self, path: &Path) -> RemoveResult {
        let path = normalize(path);
        let metadata = match lstat(&path) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => return RemoveResult::removed(path),
            Err(err) => return RemoveResult::failed(path, &RemoveError::from_io(&err)),
        };

        // A link to a directory is unlinked; its target is never walked.
        let is_link = metadata.file_type().is_symlink();
        if !(metadata.is_dir() || (is_link && path.is_dir())) {
            return RemoveResult::failed(path, &RemoveError::NotADirectory);
        }
        if self.dry_run {
            return RemoveResult::removed(path);
        }

        let outcome = if is_link {
            remove_link(&path)
        } else {
            remove_tree(&path)
        };
        match outcome {
            Ok(()) => RemoveResult::removed(path),
            Err(err) => {
                debug!("failed to remove {}: {}", path.display(), err);
                RemoveResult::failed(path, &RemoveError::from_io(&err))
            }
        }
    }

    /// Removes a single file, delegating to [`Self::remove_directory`] for directories.
    pub fn remove_file(&self, path: &Path) -> RemoveResult {
        let path = normalize(path);
        let metadata = match lstat(&path) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => return RemoveResult::removed(path),
            Err(err) => return RemoveResult::failed(path, &RemoveError::from_io(&err)),
        };

        if metadata.is_dir() {
            return self.remove_directory(&path);
        }
        if self.dry_run {
            return RemoveResult::removed(path);
        }

        let outcome = if metadata.file_type().is_symlink() {
            remove_link(&path)
        } else {
            remove_entry(&path, false)
        };
        match outcome {
            Ok(()) => RemoveResult::removed(path),
            Err(err) => RemoveResult::failed(path, &RemoveError::from_io(&err)),
        }
    }

    /// Dispatches on what is on disk right now rather than on what was discovered.
    pub fn remove_path(&self, path: &Path) -> RemoveResult {
        let path = normalize(path);
        if path.is_dir() {
            self.remove_directory(&path)
        } else {
            self.remove_file(&path)
        }
    }

    pub fn remove_directories(&self, paths: &[PathBuf]) -> Vec<RemoveResult> {
        paths.iter().map(|path| self.remove_directory(path)).collect()
    }

    pub fn remove_files(&self, paths: &[PathBuf]) -> Vec<RemoveResult> {
        paths.iter().map(|path| self.remove_file(path)).collect()
    }

    pub fn remove_paths(&self, paths: &[PathBuf]) -> Vec<RemoveResult> {
        paths.iter().map(|path| self.remove_path(path)).collect()
    }
}

fn lstat(path: &Path) -> io::Result<Option<Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn remove_tree(root: &Path) -> io::Result<()> {
    for item in WalkDir::new(root).follow_links(false).contents_first(true) {
        let entry = item.map_err(io::Error::from)?;
        remove_entry(entry.path(), entry.file_type().is_dir())?;
    }
    Ok(())
}

fn remove_link(path: &Path) -> io::Result<()> {
    // Windows directory links must go through remove_dir.
    fs::remove_file(path).or_else(|err| {
        if cfg!(windows) {
            fs::remove_dir(path)
        } else {
            Err(err)
        }
    })
}

/// Removes one entry, clearing read-only bits on it and its parent once if the first
/// attempt is refused.
fn remove_entry(path: &Path, is_dir: bool) -> io::Result<()> {
    let remove = |path: &Path| {
        if is_dir {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        }
    };

    match remove(path) {
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            if clear_readonly(path).is_err() {
                return Err(err);
            }
            if let Some(parent) = path.parent() {
                let _ = clear_readonly(parent);
            }
            remove(path)
        }
        other => other,
    }
}

#[allow(clippy::permissions_set_readonly_false)]
fn clear_readonly(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }
    let mut permissions = metadata.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        permissions.set_readonly(false);
    }
    fs::set_permissions(path, permissions)
}
