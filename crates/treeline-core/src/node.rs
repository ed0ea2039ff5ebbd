//! Tree node types.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Extension of a file name: the substring after the last `.`, empty if the
/// name contains no dot.
///
/// Both the classifier and the ignore filter derive extensions through this
/// function so a name like `archive.tar.gz` matches a `*.gz` rule and a
/// `*.tar.gz` rule never fires.
pub fn extension_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

/// Variant-specific fields of a tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    /// Directory.
    Directory {
        /// Modification time in seconds since the epoch; `0` when the stat
        /// failed (listing permission does not imply stat permission).
        last_modified: u64,
        /// Whether a scan-and-peek at creation time saw at least one entry.
        has_children: bool,
        /// Whether the row is displayed expanded.
        open: bool,
        /// Next link of a collapsed single-child chain, if any.
        group_next: Option<Box<Node>>,
        /// Child nodes; empty until the directory is expanded.
        entries: Vec<Node>,
    },
    /// Regular file.
    File {
        /// Whether the file has an executable permission bit set.
        executable: bool,
        /// Name extension, empty if none.
        extension: CompactString,
    },
    /// Symbolic link.
    Symlink {
        /// Resolved absolute target; `None` when resolution failed, which
        /// keeps the node out of the tree without being an error.
        target: Option<PathBuf>,
        /// Whether the resolved target is a directory.
        target_is_dir: bool,
        /// Whether the row is displayed expanded (directory targets only).
        open: bool,
        /// Child nodes of the target (directory targets only).
        entries: Vec<Node>,
    },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, NodeKind::Symlink { .. })
    }
}

/// A single element of the tree: directory, file or symlink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Final path segment.
    pub name: CompactString,

    /// Absolute path, joined from the owning directory's path and `name`
    /// once at construction, never recomputed.
    pub path: PathBuf,

    /// Lowercased `name`, precomputed for external fuzzy matching.
    pub match_name: CompactString,

    /// Lowercased `path`, precomputed for external fuzzy matching.
    pub match_path: String,

    /// Annotation slot written by decorators (e.g. a git status code).
    /// Never read by the tree engine itself.
    pub status: Option<CompactString>,

    /// Variant and its fields.
    pub kind: NodeKind,
}

impl Node {
    /// Create a node under `parent`.
    pub fn new(parent: &Path, name: &str, kind: NodeKind) -> Self {
        let path = parent.join(name);
        let match_path = path.to_string_lossy().to_lowercase();
        Self {
            name: name.into(),
            match_name: name.to_lowercase().into(),
            path,
            match_path,
            status: None,
            kind,
        }
    }

    /// Create a directory node with no chain link and no entries.
    pub fn directory(parent: &Path, name: &str, last_modified: u64, has_children: bool) -> Self {
        Self::new(
            parent,
            name,
            NodeKind::Directory {
                last_modified,
                has_children,
                open: false,
                group_next: None,
                entries: Vec::new(),
            },
        )
    }

    /// Create a file node. The extension is derived from `name`.
    pub fn file(parent: &Path, name: &str, executable: bool) -> Self {
        Self::new(
            parent,
            name,
            NodeKind::File {
                executable,
                extension: extension_of(name).into(),
            },
        )
    }

    /// Create a symlink node.
    pub fn symlink(parent: &Path, name: &str, target: Option<PathBuf>, target_is_dir: bool) -> Self {
        Self::new(
            parent,
            name,
            NodeKind::Symlink {
                target,
                target_is_dir,
                open: false,
                entries: Vec::new(),
            },
        )
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this node is a symlink.
    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }

    /// Check if this node is a symlink whose target is a directory.
    pub fn is_dir_link(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Symlink {
                target_is_dir: true,
                ..
            }
        )
    }

    /// Check if this node can be expanded into child entries.
    pub fn is_navigable(&self) -> bool {
        self.is_dir() || self.is_dir_link()
    }

    /// Resolved symlink target, if this node is a symlink that resolved.
    pub fn link_target(&self) -> Option<&Path> {
        match &self.kind {
            NodeKind::Symlink { target, .. } => target.as_deref(),
            _ => None,
        }
    }

    /// Expanded/collapsed display state. Always `false` for files.
    pub fn open(&self) -> bool {
        match &self.kind {
            NodeKind::Directory { open, .. } | NodeKind::Symlink { open, .. } => *open,
            NodeKind::File { .. } => false,
        }
    }

    /// Set the expanded/collapsed display state. No-op for files.
    pub fn set_open(&mut self, value: bool) {
        match &mut self.kind {
            NodeKind::Directory { open, .. } | NodeKind::Symlink { open, .. } => *open = value,
            NodeKind::File { .. } => {}
        }
    }

    /// Child entries, if this node can have any.
    pub fn entries(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Directory { entries, .. } | NodeKind::Symlink { entries, .. } => {
                Some(entries)
            }
            NodeKind::File { .. } => None,
        }
    }

    /// Mutable child entries, if this node can have any.
    pub fn entries_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Directory { entries, .. } | NodeKind::Symlink { entries, .. } => {
                Some(entries)
            }
            NodeKind::File { .. } => None,
        }
    }

    /// Next link of a collapsed single-child chain.
    pub fn group_next(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Directory { group_next, .. } => group_next.as_deref(),
            _ => None,
        }
    }

    /// Replace the chain link. Chain links live on directory nodes only;
    /// no-op for other variants.
    pub fn set_group_next(&mut self, next: Option<Box<Node>>) {
        if let NodeKind::Directory { group_next, .. } = &mut self.kind {
            *group_next = next;
        }
    }
}
