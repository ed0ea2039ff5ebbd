//! Node classification.

use std::fs;
use std::path::Path;

use treeline_core::Node;

use crate::fsops::{self, EntryKind};

/// Build a node for one scanned entry, performing the minimal filesystem
/// reads each variant needs.
///
/// Directory: stat for mtime (0 on failure) and a scan-and-peek for
/// `has_children` (false on failure). File: executable bit and extension.
/// Symlink: best-effort realpath; an unresolvable link yields a node with
/// no target, which populate and refresh keep out of the tree.
pub(crate) fn classify(parent: &Path, name: &str, kind: EntryKind) -> Node {
    let path = parent.join(name);
    match kind {
        EntryKind::Directory => Node::directory(
            parent,
            name,
            fsops::mtime_secs(&path),
            fsops::peek_has_children(&path),
        ),
        EntryKind::File => Node::file(parent, name, fsops::is_executable(&path)),
        EntryKind::Symlink => {
            let target = fsops::resolve_link(&path);
            // metadata follows the link, so this is the target's type.
            let target_is_dir = fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);
            Node::symlink(parent, name, target, target_is_dir)
        }
    }
}
