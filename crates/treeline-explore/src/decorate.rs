//! Entry-list decoration.

use std::path::Path;

use treeline_core::Node;

/// Annotates a finished entry list with per-node metadata.
///
/// Implementations write [`Node::status`] only; the contract forbids
/// reordering entries (adding and removing is ruled out by the slice).
pub trait Decorate {
    /// Annotate `entries`, the finished child list of `dir`.
    fn decorate(&self, dir: &Path, entries: &mut [Node]);
}

#[cfg(feature = "git")]
pub use git::GitStatusDecorator;

#[cfg(feature = "git")]
mod git {
    use std::path::Path;

    use compact_str::CompactString;
    use treeline_core::Node;

    use super::Decorate;

    /// Annotates entries with status codes from the containing git
    /// repository.
    ///
    /// Files get a porcelain-style code (`M`, `A`, `D`, `R`, `U`, `??`);
    /// directories and directory links get `dirty` when any descendant has
    /// a status. Every git failure degrades to "no annotation".
    #[derive(Debug, Default)]
    pub struct GitStatusDecorator;

    impl GitStatusDecorator {
        /// Create a new decorator.
        pub fn new() -> Self {
            Self
        }
    }

    impl Decorate for GitStatusDecorator {
        fn decorate(&self, dir: &Path, entries: &mut [Node]) {
            let Ok(repo) = git2::Repository::discover(dir) else {
                return;
            };
            let Some(workdir) = repo.workdir().map(Path::to_path_buf) else {
                return;
            };

            let mut opts = git2::StatusOptions::new();
            opts.include_untracked(true)
                .recurse_untracked_dirs(true)
                .include_ignored(false);
            let Ok(statuses) = repo.statuses(Some(&mut opts)) else {
                return;
            };

            for node in entries.iter_mut() {
                let Ok(rel) = node.path.strip_prefix(&workdir) else {
                    continue;
                };
                let rel = rel.to_string_lossy();
                node.status = if node.is_dir() || node.is_dir_link() {
                    statuses
                        .iter()
                        .any(|entry| {
                            entry.path().is_some_and(|p| {
                                p.strip_prefix(rel.as_ref())
                                    .is_some_and(|rest| rest.starts_with('/'))
                            })
                        })
                        .then(|| CompactString::const_new("dirty"))
                } else {
                    statuses
                        .iter()
                        .find(|entry| entry.path() == Some(rel.as_ref()))
                        .and_then(|entry| short_code(entry.status()))
                };
            }
        }
    }

    fn short_code(status: git2::Status) -> Option<CompactString> {
        let code = if status.is_conflicted() {
            "U"
        } else if status.is_wt_new() {
            "??"
        } else if status.is_index_new() {
            "A"
        } else if status.is_wt_modified() || status.is_index_modified() {
            "M"
        } else if status.is_wt_deleted() || status.is_index_deleted() {
            "D"
        } else if status.is_wt_renamed() || status.is_index_renamed() {
            "R"
        } else {
            return None;
        };
        Some(CompactString::const_new(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;

    struct Marker;

    impl Decorate for Marker {
        fn decorate(&self, _dir: &Path, entries: &mut [Node]) {
            for node in entries.iter_mut() {
                node.status = Some(CompactString::const_new("seen"));
            }
        }
    }

    #[test]
    fn test_decorator_writes_status_only() {
        let mut entries = vec![
            Node::directory(Path::new("/t"), "src", 0, false),
            Node::file(Path::new("/t"), "a.txt", false),
        ];
        Marker.decorate(Path::new("/t"), &mut entries);
        assert!(entries.iter().all(|n| n.status.as_deref() == Some("seen")));
        assert_eq!(entries[0].name.as_str(), "src");
        assert_eq!(entries[1].name.as_str(), "a.txt");
    }
}
