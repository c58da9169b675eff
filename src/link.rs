//! Placing a hook at its destination: relative symlink, or a copy where links are unavailable

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// How hooks should be placed into the hooks directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Symlink, falling back to a copy when the platform can't link
    #[default]
    Auto,
    /// Always copy the file's bytes
    Copy,
}

/// How a hook ended up installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    Linked,
    Copied,
}

/// Place `source` at `destination`. Both paths must be absolute and
/// normalized, and `destination` must not exist.
pub fn place(source: &Path, destination: &Path, mode: LinkMode) -> io::Result<InstallMethod> {
    if mode == LinkMode::Copy {
        copy_hook(source, destination)?;
        return Ok(InstallMethod::Copied);
    }

    let target = link_target(source, destination);
    match symlink(&target, destination) {
        Ok(()) => Ok(InstallMethod::Linked),
        Err(err) if links_unsupported(&err) => {
            tracing::warn!(
                destination = %destination.display(),
                error = %err,
                "symbolic links unavailable, copying hook instead"
            );
            copy_hook(source, destination)?;
            Ok(InstallMethod::Copied)
        }
        Err(err) => Err(err),
    }
}

/// The path a link at `destination` should store to reach `source`
///
/// Relative to the link's directory so the link survives moving the clone;
/// absolute when the two paths share no root (e.g. different drives).
pub fn link_target(source: &Path, destination: &Path) -> PathBuf {
    destination
        .parent()
        .and_then(|dir| relative_to(source, dir))
        .unwrap_or_else(|| source.to_path_buf())
}

fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if !path.is_absolute() || !base.is_absolute() {
        return None;
    }

    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();
    if path.first() != base.first() {
        return None;
    }

    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();
    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &path[common..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}

/// Errors meaning "this filesystem or account can't create links", as opposed
/// to a real failure that a copy would hit too
fn links_unsupported(err: &io::Error) -> bool {
    // EPERM from symlink(2): the filesystem doesn't support symlinks
    const EPERM: i32 = 1;
    // Windows: creating symlinks needs developer mode or admin
    const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;

    if err.kind() == io::ErrorKind::Unsupported {
        return true;
    }
    match err.raw_os_error() {
        Some(EPERM) => cfg!(unix),
        Some(ERROR_PRIVILEGE_NOT_HELD) => cfg!(windows),
        _ => false,
    }
}

fn copy_hook(source: &Path, destination: &Path) -> io::Result<()> {
    fs::copy(source, destination)?;

    // Make executable on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(destination)?.permissions();
        perms.set_mode(perms.mode() | 0o111);
        fs::set_permissions(destination, perms)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_link_target_is_relative() {
        let target = link_target(
            Path::new("/repo/scripts/pre-commit.hook"),
            Path::new("/repo/.git/hooks/pre-commit"),
        );
        assert_eq!(target, PathBuf::from("../../scripts/pre-commit.hook"));
    }

    #[test]
    fn test_link_target_keeps_relative_input() {
        let target = link_target(Path::new("scripts/x"), Path::new(".git/hooks/x"));
        assert_eq!(target, PathBuf::from("scripts/x"));
    }

    #[cfg(unix)]
    #[test]
    fn test_place_symlink() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("scripts")).unwrap();
        fs::create_dir_all(root.join(".git/hooks")).unwrap();
        let source = root.join("scripts/pre-commit.hook");
        fs::write(&source, "#!/bin/sh\nexit 0\n").unwrap();
        let destination = root.join(".git/hooks/pre-commit");

        let method = place(&source, &destination, LinkMode::Auto).unwrap();

        assert_eq!(method, InstallMethod::Linked);
        assert_eq!(
            fs::read_link(&destination).unwrap(),
            PathBuf::from("../../scripts/pre-commit.hook")
        );
        assert_eq!(destination.canonicalize().unwrap(), source);
    }

    #[test]
    fn test_place_copy_mode() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("hook.sh");
        fs::write(&source, "#!/bin/sh\necho hi\n").unwrap();
        let destination = dir.path().join("pre-commit");

        let method = place(&source, &destination, LinkMode::Copy).unwrap();

        assert_eq!(method, InstallMethod::Copied);
        assert!(!fs::symlink_metadata(&destination).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "#!/bin/sh\necho hi\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&destination).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn test_unsupported_error_classification() {
        assert!(links_unsupported(&io::Error::new(io::ErrorKind::Unsupported, "no")));
        assert!(!links_unsupported(&io::Error::new(io::ErrorKind::NotFound, "no")));
        #[cfg(unix)]
        {
            assert!(links_unsupported(&io::Error::from_raw_os_error(1)));
            // EACCES is a real permission problem, not missing link support
            assert!(!links_unsupported(&io::Error::from_raw_os_error(13)));
        }
    }
}
