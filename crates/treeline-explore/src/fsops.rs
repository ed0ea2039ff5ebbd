//! Blocking filesystem primitives used by populate and refresh.
//!
//! Everything here is best-effort apart from [`scan_dir`]: a failed stat,
//! permission check or realpath degrades to a default value and the
//! surrounding scan continues.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use treeline_core::ExploreError;

/// On-disk type reported by the directory scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
}

/// List a directory, yielding `(name, kind)` pairs in scan order.
///
/// The order is whatever the OS returns; callers must not assume it is
/// sorted. Entries whose type cannot be read, and entries that are neither
/// a directory, a regular file nor a symlink (sockets, devices), are
/// dropped.
pub fn scan_dir(path: &Path) -> Result<Vec<(String, EntryKind)>, ExploreError> {
    let read = fs::read_dir(path).map_err(|e| ExploreError::io(path, e))?;
    let mut out = Vec::new();
    for entry in read {
        let Ok(entry) = entry else { continue };
        // file_type on a DirEntry does not follow symlinks.
        let kind = match entry.file_type() {
            Ok(t) if t.is_symlink() => EntryKind::Symlink,
            Ok(t) if t.is_dir() => EntryKind::Directory,
            Ok(t) if t.is_file() => EntryKind::File,
            _ => continue,
        };
        out.push((entry.file_name().to_string_lossy().into_owned(), kind));
    }
    Ok(out)
}

/// Modification time in whole seconds since the epoch, `0` on any failure.
pub fn mtime_secs(path: &Path) -> u64 {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Check if a file has an executable permission bit set (Unix).
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    false
}

/// Resolve a symlink to its canonical absolute target.
///
/// `None` covers both broken links and OS-level resolution failures on
/// otherwise valid links; callers treat it as "keep out of the tree".
pub fn resolve_link(path: &Path) -> Option<PathBuf> {
    fs::canonicalize(path).ok()
}

/// Check if a path can be listed. Used as the grouping and insertion gate
/// for directories.
pub fn is_readable_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok()
}

/// Check if a directory has at least one entry without listing all of it.
pub fn peek_has_children(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut it| it.next().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_dir_partitions_kinds() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("file.txt"), "x").unwrap();

        let mut entries = scan_dir(temp.path()).unwrap();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            entries,
            vec![
                ("file.txt".to_string(), EntryKind::File),
                ("sub".to_string(), EntryKind::Directory),
            ]
        );
    }

    #[test]
    fn test_scan_dir_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");
        assert!(scan_dir(&missing).is_err());
    }

    #[test]
    fn test_mtime_secs_defaults_to_zero() {
        let temp = TempDir::new().unwrap();
        assert!(mtime_secs(temp.path()) > 0);
        assert_eq!(mtime_secs(&temp.path().join("gone")), 0);
    }

    #[test]
    fn test_peek_has_children() {
        let temp = TempDir::new().unwrap();
        assert!(!peek_has_children(temp.path()));
        fs::write(temp.path().join("a"), "").unwrap();
        assert!(peek_has_children(temp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        assert!(!is_executable(&script));

        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&script));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_link() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real");
        fs::create_dir(&target).unwrap();
        let link = temp.path().join("alias");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let resolved = resolve_link(&link).unwrap();
        assert_eq!(resolved, target.canonicalize().unwrap());

        let dangling = temp.path().join("dangling");
        std::os::unix::fs::symlink(temp.path().join("void"), &dangling).unwrap();
        assert!(resolve_link(&dangling).is_none());
    }
}
