//! Per-hook results of an install run

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::HookError;

/// What happened to a single hook
#[derive(Debug)]
pub enum HookOutcome {
    Linked,
    Copied,
    Failed(HookError),
}

impl HookOutcome {
    /// Short machine-readable status ("linked", "copied", "failed")
    pub fn status(&self) -> &'static str {
        match self {
            HookOutcome::Linked => "linked",
            HookOutcome::Copied => "copied",
            HookOutcome::Failed(_) => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, HookOutcome::Failed(_))
    }
}

impl fmt::Display for HookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookOutcome::Failed(err) => write!(f, "FAILED ({})", err),
            other => f.write_str(other.status()),
        }
    }
}

/// One line of the report
#[derive(Debug)]
pub struct ReportEntry {
    /// Hook name (e.g. "pre-commit")
    pub hook: String,
    /// Where the hook was (or should have been) installed
    pub destination: PathBuf,
    pub outcome: HookOutcome,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.hook, self.outcome)
    }
}

/// Ordered results of an install run, one entry per mapping
#[derive(Debug)]
pub struct InstallReport {
    pub repo_root: PathBuf,
    pub hooks_dir: PathBuf,
    pub entries: Vec<ReportEntry>,
}

impl InstallReport {
    pub(crate) fn new(repo_root: PathBuf, hooks_dir: PathBuf) -> Self {
        Self {
            repo_root,
            hooks_dir,
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// True if any hook failed; callers use this to pick a nonzero exit code
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|entry| entry.outcome.is_failed())
    }

    /// Serializable view of the report
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            repo_root: &self.repo_root,
            hooks_dir: &self.hooks_dir,
            hooks: self
                .entries
                .iter()
                .map(|entry| EntrySummary {
                    hook: &entry.hook,
                    destination: &entry.destination,
                    status: entry.outcome.status(),
                    reason: match &entry.outcome {
                        HookOutcome::Failed(err) => Some(err.to_string()),
                        _ => None,
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub repo_root: &'a Path,
    pub hooks_dir: &'a Path,
    pub hooks: Vec<EntrySummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EntrySummary<'a> {
    pub hook: &'a str,
    pub destination: &'a Path,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn sample_report() -> InstallReport {
        let mut report = InstallReport::new(PathBuf::from("/repo"), PathBuf::from("/repo/.git/hooks"));
        report.push(ReportEntry {
            hook: "pre-commit".to_string(),
            destination: PathBuf::from("/repo/.git/hooks/pre-commit"),
            outcome: HookOutcome::Linked,
        });
        report.push(ReportEntry {
            hook: "pre-push".to_string(),
            destination: PathBuf::from("/repo/.git/hooks/pre-push"),
            outcome: HookOutcome::Failed(HookError::Removal(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ))),
        });
        report
    }

    #[test]
    fn test_entry_lines() {
        let report = sample_report();
        let lines: Vec<String> = report.entries.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "pre-commit: linked",
                "pre-push: FAILED (cannot remove existing hook: permission denied)",
            ]
        );
        assert!(report.has_failures());
    }

    #[test]
    fn test_summary_json() {
        let report = sample_report();
        let json = serde_json::to_value(report.summary()).unwrap();

        assert_eq!(json["hooks_dir"], "/repo/.git/hooks");
        assert_eq!(json["hooks"][0]["status"], "linked");
        assert!(json["hooks"][0].get("reason").is_none());
        assert_eq!(json["hooks"][1]["status"], "failed");
        assert_eq!(
            json["hooks"][1]["reason"],
            "cannot remove existing hook: permission denied"
        );
    }
}
