//! Repository root discovery and hooks directory resolution

use std::fs;
use std::path::{Path, PathBuf};

use crate::{InstallError, InstallResult};

const DOT_GIT: &str = ".git";

fn has_dot_git(dir: &Path) -> bool {
    fs::symlink_metadata(dir.join(DOT_GIT)).is_ok()
}

/// Walk upward from `start` until a directory containing a `.git` entry is found
pub fn discover_root(start: impl AsRef<Path>) -> InstallResult<PathBuf> {
    let start = start.as_ref();
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    match start.ancestors().find(|dir| has_dot_git(dir)) {
        Some(root) => {
            tracing::debug!(root = %root.display(), "discovered repository root");
            Ok(root.to_path_buf())
        }
        None => Err(InstallError::RepoNotFound { path: start }),
    }
}

/// Check that `path` is an existing directory with a `.git` entry and return it canonicalized
pub fn ensure_repo_root(path: impl AsRef<Path>) -> InstallResult<PathBuf> {
    let path = path.as_ref();
    let root = path
        .canonicalize()
        .map_err(|_| InstallError::RepoNotFound {
            path: path.to_path_buf(),
        })?;

    if !root.is_dir() || !has_dot_git(&root) {
        return Err(InstallError::RepoNotFound { path: root });
    }
    Ok(root)
}

/// Resolve the hooks directory for a repository root
///
/// A `.git` directory yields `.git/hooks`. A `.git` file (worktrees and
/// submodules) is followed through its `gitdir:` line; linked worktrees
/// share the hooks of their common git directory.
pub fn hooks_dir(repo_root: &Path) -> InstallResult<PathBuf> {
    let dot_git = repo_root.join(DOT_GIT);
    let metadata = fs::metadata(&dot_git).map_err(|_| InstallError::RepoNotFound {
        path: repo_root.to_path_buf(),
    })?;

    if metadata.is_dir() {
        return Ok(dot_git.join("hooks"));
    }

    let git_dir = read_gitdir_file(&dot_git, repo_root)?;
    let base = match fs::read_to_string(git_dir.join("commondir")) {
        Ok(common) => resolve(&git_dir, common.trim()),
        Err(_) => git_dir,
    };
    Ok(base.join("hooks"))
}

fn read_gitdir_file(dot_git: &Path, repo_root: &Path) -> InstallResult<PathBuf> {
    let content = fs::read_to_string(dot_git).map_err(|e| InstallError::InvalidGitFile {
        path: dot_git.to_path_buf(),
        reason: e.to_string(),
    })?;

    let target = content
        .lines()
        .find_map(|line| line.strip_prefix("gitdir:"))
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .ok_or_else(|| InstallError::InvalidGitFile {
            path: dot_git.to_path_buf(),
            reason: "missing `gitdir:` line".to_string(),
        })?;

    let git_dir = resolve(repo_root, target);
    if !git_dir.is_dir() {
        return Err(InstallError::InvalidGitFile {
            path: dot_git.to_path_buf(),
            reason: format!("git directory {} does not exist", git_dir.display()),
        });
    }
    Ok(git_dir)
}

fn resolve(base: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    if target.is_absolute() {
        target.to_path_buf()
    } else {
        base.join(target)
    }
}
