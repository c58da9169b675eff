//! Hook Installer - Install managed git hook links into a repository
//!
//! This crate links checked-in hook scripts (e.g. `scripts/pre-commit.hook`)
//! into a repository's git hooks directory. Installation is idempotent: any
//! existing hook at the destination is replaced, and re-running produces the
//! same end state.
//!
//! # Example
//!
//! ```no_run
//! use hook_installer::{install, HookMapping};
//!
//! let mappings = vec!["pre-commit=scripts/pre-commit.hook".parse::<HookMapping>().unwrap()];
//! let report = install(".", &mappings).unwrap();
//! for entry in &report.entries {
//!     println!("{}", entry);
//! }
//! ```

mod config;
mod installer;
mod link;
mod mapping;
mod report;
mod repo;

use std::path::PathBuf;
use thiserror::Error;

pub use config::{select_mappings, ProjectConfig, CONFIG_FILE_NAME};
pub use installer::{install, install_with_options, InstallOptions};
pub use link::{InstallMethod, LinkMode};
pub use mapping::{validate_mappings, DEFAULT_HOOK, DEFAULT_SOURCE};
pub use report::{EntrySummary, HookOutcome, InstallReport, ReportEntry, ReportSummary};
pub use repo::{discover_root, ensure_repo_root, hooks_dir};

/// A declared hook: the hook's file name and the script it should point at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookMapping {
    /// Hook file name inside the hooks directory (e.g. "pre-commit")
    name: String,
    /// Script path relative to the repository root
    source: PathBuf,
}

/// Errors that abort a whole run before any hook is touched
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("not a git repository (no .git found from {})", path.display())]
    RepoNotFound { path: PathBuf },

    #[error("invalid .git file {}: {reason}", path.display())]
    InvalidGitFile { path: PathBuf, reason: String },

    #[error("no hook mappings given")]
    NoMappings,

    #[error("hook `{0}` is mapped more than once")]
    DuplicateHook(String),

    #[error("invalid mapping `{value}`: {reason}")]
    InvalidMapping { value: String, reason: String },

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallError {
    /// True for malformed or conflicting hook mappings
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            InstallError::NoMappings
                | InstallError::DuplicateHook(_)
                | InstallError::InvalidMapping { .. }
        )
    }
}

/// Errors for a single hook; recorded in the report instead of aborting the run
#[derive(Error, Debug)]
pub enum HookError {
    #[error("source {} is not usable: {reason}", path.display())]
    Source { path: PathBuf, reason: String },

    #[error("cannot create hooks directory {}: {source}", path.display())]
    HooksDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot remove existing hook: {0}")]
    Removal(#[source] std::io::Error),

    #[error("cannot install hook: {0}")]
    Link(#[source] std::io::Error),

    #[error("installed hook failed verification: {0}")]
    Verify(#[source] std::io::Error),
}

/// Result type for install operations
pub type InstallResult<T> = Result<T, InstallError>;
