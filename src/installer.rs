//! The install operation: realize each hook mapping as a working link

use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::link::{self, InstallMethod, LinkMode};
use crate::mapping::validate_mappings;
use crate::report::{HookOutcome, InstallReport, ReportEntry};
use crate::repo;
use crate::{HookError, HookMapping, InstallResult};

/// Options for customizing an install run
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Whether to symlink (with copy fallback) or always copy
    pub link_mode: LinkMode,
}

/// Install hooks into the repository at `repo_root` using default options
pub fn install(repo_root: impl AsRef<Path>, mappings: &[HookMapping]) -> InstallResult<InstallReport> {
    install_with_options(repo_root, mappings, InstallOptions::default())
}

/// Install hooks with custom options
///
/// Mapping and repository problems are returned as errors before anything
/// on disk changes. Failures of individual hooks are recorded in the report
/// and don't stop the remaining hooks.
pub fn install_with_options(
    repo_root: impl AsRef<Path>,
    mappings: &[HookMapping],
    options: InstallOptions,
) -> InstallResult<InstallReport> {
    validate_mappings(mappings)?;
    let repo_root = repo::ensure_repo_root(repo_root)?;
    let hooks_dir = repo::hooks_dir(&repo_root)?;

    tracing::debug!(
        repo = %repo_root.display(),
        hooks_dir = %hooks_dir.display(),
        mode = ?options.link_mode,
        "installing {} hook(s)",
        mappings.len()
    );

    let mut report = InstallReport::new(repo_root.clone(), hooks_dir.clone());
    install_each(&mut report, mappings, |mapping| {
        install_hook(&repo_root, &hooks_dir, mapping, options.link_mode)
    });
    Ok(report)
}

/// Run `install_one` for every mapping in order, turning each result into a report entry
fn install_each<F>(report: &mut InstallReport, mappings: &[HookMapping], mut install_one: F)
where
    F: FnMut(&HookMapping) -> Result<InstallMethod, HookError>,
{
    for mapping in mappings {
        let outcome = match install_one(mapping) {
            Ok(InstallMethod::Linked) => HookOutcome::Linked,
            Ok(InstallMethod::Copied) => HookOutcome::Copied,
            Err(err) => {
                tracing::warn!(hook = mapping.name(), error = %err, "hook not installed");
                HookOutcome::Failed(err)
            }
        };
        if !outcome.is_failed() {
            tracing::info!(hook = mapping.name(), status = outcome.status(), "hook installed");
        }

        let destination = report.hooks_dir.join(mapping.name());
        report.push(ReportEntry {
            hook: mapping.name().to_string(),
            destination,
            outcome,
        });
    }
}

fn install_hook(
    repo_root: &Path,
    hooks_dir: &Path,
    mapping: &HookMapping,
    mode: LinkMode,
) -> Result<InstallMethod, HookError> {
    let source_path = repo_root.join(mapping.source());
    let source = source_path.canonicalize().map_err(|e| HookError::Source {
        path: source_path.clone(),
        reason: e.to_string(),
    })?;
    if !source.is_file() {
        return Err(HookError::Source {
            path: source_path,
            reason: "not a regular file".to_string(),
        });
    }

    fs::create_dir_all(hooks_dir).map_err(|e| HookError::HooksDir {
        path: hooks_dir.to_path_buf(),
        source: e,
    })?;
    let hooks_dir = hooks_dir.canonicalize().map_err(|e| HookError::HooksDir {
        path: hooks_dir.to_path_buf(),
        source: e,
    })?;
    let destination = hooks_dir.join(mapping.name());

    // Removing the destination would delete the script itself
    if source.starts_with(&destination) {
        return Err(HookError::Source {
            path: source_path,
            reason: "source lies inside the hook destination".to_string(),
        });
    }

    tracing::debug!(hook = mapping.name(), source = %source.display(), "replacing hook");
    remove_existing(&destination).map_err(HookError::Removal)?;
    let method = link::place(&source, &destination, mode).map_err(HookError::Link)?;
    verify(&source, &destination, method).map_err(HookError::Verify)?;
    Ok(method)
}

/// Remove whatever sits at `destination`: file, link (dangling or not), or directory
fn remove_existing(destination: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(destination) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(destination)
    } else {
        fs::remove_file(destination)
    }
}

fn verify(source: &Path, destination: &Path, method: InstallMethod) -> io::Result<()> {
    File::open(destination)?;

    if method == InstallMethod::Linked {
        let resolved = destination.canonicalize()?;
        if resolved != source {
            return Err(io::Error::other(format!(
                "link resolves to {} instead of {}",
                resolved.display(),
                source.display()
            )));
        }
    }
    Ok(())
}
