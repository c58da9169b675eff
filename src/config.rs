//! Optional `.hooks.toml` project config
//!
//! ```toml
//! mode = "auto"          # or "copy"
//!
//! [[hook]]
//! name = "pre-commit"
//! source = "scripts/pre-commit.hook"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::link::LinkMode;
use crate::{HookMapping, InstallError, InstallResult};

/// Config file looked up at the repository root
pub const CONFIG_FILE_NAME: &str = ".hooks.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Placement mode; the CLI's `--copy` overrides it
    #[serde(default)]
    pub mode: Option<LinkMode>,
    #[serde(default, rename = "hook")]
    hooks: Vec<HookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct HookEntry {
    name: String,
    source: PathBuf,
}

impl ProjectConfig {
    /// Load a config file that must exist
    pub fn load(path: &Path) -> InstallResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| InstallError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| InstallError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `.hooks.toml` from the repository root if there is one
    pub fn discover(repo_root: &Path) -> InstallResult<Option<Self>> {
        let path = repo_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!(config = %path.display(), "loading project config");
        Self::load(&path).map(Some)
    }

    /// Hook mappings declared in the file, in file order
    pub fn mappings(&self) -> InstallResult<Vec<HookMapping>> {
        self.hooks
            .iter()
            .map(|entry| HookMapping::new(entry.name.as_str(), entry.source.as_path()))
            .collect()
    }
}

/// Pick the mappings for a run: CLI flags, then the config file, then the default
pub fn select_mappings(
    cli: Vec<HookMapping>,
    config: Option<&ProjectConfig>,
) -> InstallResult<Vec<HookMapping>> {
    if !cli.is_empty() {
        return Ok(cli);
    }
    if let Some(config) = config {
        let mappings = config.mappings()?;
        if !mappings.is_empty() {
            return Ok(mappings);
        }
    }
    Ok(HookMapping::default_mappings())
}
