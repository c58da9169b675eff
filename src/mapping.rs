//! Parsing and validation of `name=relativePath` hook mappings

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{HookMapping, InstallError};

/// Hook installed when no mapping is given
pub const DEFAULT_HOOK: &str = "pre-commit";

/// Script the default hook points at, relative to the repository root
pub const DEFAULT_SOURCE: &str = "scripts/pre-commit.hook";

impl HookMapping {
    /// Create a mapping, checking that the name is a plain file name and
    /// the source is a relative path
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Result<Self, InstallError> {
        let mapping = HookMapping {
            name: name.into(),
            source: source.into(),
        };

        if let Err(reason) = check_name(&mapping.name).and_then(|_| check_source(&mapping.source)) {
            return Err(InstallError::InvalidMapping {
                value: mapping.to_string(),
                reason: reason.to_string(),
            });
        }

        Ok(mapping)
    }

    /// The mapping used when nothing else is configured
    pub fn default_mappings() -> Vec<HookMapping> {
        vec![HookMapping {
            name: DEFAULT_HOOK.to_string(),
            source: PathBuf::from(DEFAULT_SOURCE),
        }]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

fn check_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("hook name is empty");
    }
    if name == "." || name == ".." {
        return Err("hook name must be a file name");
    }
    if name.contains(['/', '\\', '\0']) {
        return Err("hook name must not contain path separators");
    }
    Ok(())
}

fn check_source(source: &Path) -> Result<(), &'static str> {
    if source.as_os_str().is_empty() {
        return Err("source path is empty");
    }
    if source.is_absolute() || source.has_root() {
        return Err("source path must be relative to the repository root");
    }
    Ok(())
}

impl FromStr for HookMapping {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, source) = s.split_once('=').ok_or_else(|| InstallError::InvalidMapping {
            value: s.to_string(),
            reason: "expected name=relativePath".to_string(),
        })?;
        HookMapping::new(name.trim(), source.trim())
    }
}

impl fmt::Display for HookMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.source.display())
    }
}

/// Reject an empty mapping set or one that names the same hook twice
pub fn validate_mappings(mappings: &[HookMapping]) -> Result<(), InstallError> {
    if mappings.is_empty() {
        return Err(InstallError::NoMappings);
    }

    let mut seen = HashSet::new();
    for mapping in mappings {
        if !seen.insert(mapping.name()) {
            return Err(InstallError::DuplicateHook(mapping.name().to_string()));
        }
    }
    Ok(())
}
