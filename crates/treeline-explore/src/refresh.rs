//! Incremental refresh of an already-populated entry list.
//!
//! Refresh re-scans a directory and reconciles the cached entries with what
//! is now on disk: vanished names are removed in place, new names are
//! spliced in next to their logical neighbors, and surviving nodes keep
//! their identity, so an open subtree is never collapsed just because a
//! sibling changed.

use std::collections::HashSet;
use std::path::Path;

use compact_str::CompactString;
use treeline_core::{ExploreError, Node, NodeKind};

use crate::classify::classify;
use crate::explore::Explorer;
use crate::fsops::{self, EntryKind};

/// One step of the stable-order merge.
pub(crate) enum MergeOp {
    /// An existing entry was seen again; advances the cursor to it.
    Keep(CompactString),
    /// A new entry passed its gate; spliced in right after the cursor.
    Insert(Node),
}

/// Replay merge ops against `entries`.
///
/// `Keep` moves the cursor onto an existing entry without touching it;
/// `Insert` places the new node immediately after the cursor position, or
/// at the front when nothing has been kept or inserted yet. A candidate
/// that failed its gate produces no op at all, so the next accepted name
/// lands at the same relative position.
pub(crate) fn apply_merge(entries: &mut Vec<Node>, ops: Vec<MergeOp>) {
    let mut cursor: Option<CompactString> = None;
    for op in ops {
        match op {
            MergeOp::Keep(name) => cursor = Some(name),
            MergeOp::Insert(node) => {
                let at = match &cursor {
                    None => 0,
                    Some(prev) => entries
                        .iter()
                        .position(|n| n.name == *prev)
                        .map_or(entries.len(), |i| i + 1),
                };
                cursor = Some(node.name.clone());
                entries.insert(at, node);
            }
        }
    }
}

impl Explorer {
    /// Re-synchronize the entries of an expanded `node` with the disk.
    ///
    /// On scan failure the cached entries are left untouched. Surviving
    /// nodes are mutated in place, never rebuilt, so externally held state
    /// on them (open flags, cached descendants) is preserved.
    pub fn refresh(&self, node: &mut Node) -> Result<(), ExploreError> {
        if !node.is_navigable() {
            return Err(ExploreError::NotADirectory {
                path: node.path.clone(),
            });
        }

        let path = node.path.clone();
        let open = node.open();
        match &mut node.kind {
            NodeKind::Directory {
                group_next,
                entries,
                ..
            } => {
                self.refresh_dir(entries, &path, open, group_next)?;
            }
            NodeKind::Symlink { entries, .. } => {
                let mut no_chain = None;
                self.refresh_dir(entries, &path, open, &mut no_chain)?;
            }
            NodeKind::File { .. } => {}
        }

        if let Some(entries) = node.entries_mut() {
            self.decorate(&path, entries);
        }
        tracing::debug!(
            target: "explore",
            "refreshed {} ({} entries)",
            path.display(),
            node.entries().map(|e| e.len()).unwrap_or(0)
        );
        Ok(())
    }

    /// Re-synchronize the top-level listing for `path`.
    pub fn refresh_root(&self, entries: &mut Vec<Node>, path: &Path) -> Result<(), ExploreError> {
        let mut no_chain = None;
        self.refresh_dir(entries, path, false, &mut no_chain)?;
        self.decorate(path, entries);
        tracing::debug!(
            target: "explore",
            "refreshed {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(())
    }

    fn refresh_dir(
        &self,
        entries: &mut Vec<Node>,
        path: &Path,
        open: bool,
        group_next: &mut Option<Box<Node>>,
    ) -> Result<(), ExploreError> {
        let listing = match self.scan(path) {
            Ok(listing) => listing,
            Err(err) => {
                tracing::warn!(target: "explore", "scan failed: {err}");
                return Err(err);
            }
        };

        // Chain continuation: the chain stays only while the scan still
        // shows exactly the chained name. The open state flows down the
        // chain either way.
        let mut severed: Option<Box<Node>> = None;
        if let Some(next) = group_next.as_deref_mut() {
            next.set_open(open);
            if listing.sole_name() == Some(next.name.as_str()) {
                let next_path = next.path.clone();
                let next_open = next.open();
                return match &mut next.kind {
                    NodeKind::Directory { group_next, .. } => {
                        self.refresh_dir(entries, &next_path, next_open, group_next)
                    }
                    // A symlink link ends the chain; the shared entries
                    // list still belongs to the chain root.
                    _ => {
                        let mut no_chain = None;
                        self.refresh_dir(entries, &next_path, next_open, &mut no_chain)
                    }
                };
            }
            severed = group_next.take();
            tracing::trace!(target: "explore", "chain severed at {}", path.display());
        }

        // Removal pass: drop entries whose name vanished, keep the rest in
        // relative order.
        let mut present: HashSet<&str> = HashSet::with_capacity(listing.total());
        for name in listing.dirs.iter().chain(&listing.links).chain(&listing.files) {
            present.insert(name.as_str());
        }
        entries.retain(|n| present.contains(n.name.as_str()));

        // Survivor index: membership is enough, node identity stays in the
        // list. A severed chain link rejoins as an ordinary entry.
        let mut kept: HashSet<CompactString> = entries.iter().map(|n| n.name.clone()).collect();
        if let Some(node) = &severed {
            kept.insert(node.name.clone());
        }

        // Insertion pass, in the fixed category order with populate's
        // gating.
        let mut ops = Vec::new();
        for name in &listing.dirs {
            if kept.contains(name.as_str()) {
                ops.push(MergeOp::Keep(name.as_str().into()));
                continue;
            }
            let node = classify(path, name, EntryKind::Directory);
            if fsops::is_readable_dir(&node.path) {
                ops.push(MergeOp::Insert(node));
            }
        }
        for name in &listing.links {
            if kept.contains(name.as_str()) {
                ops.push(MergeOp::Keep(name.as_str().into()));
                continue;
            }
            let node = classify(path, name, EntryKind::Symlink);
            if node.link_target().is_some() {
                ops.push(MergeOp::Insert(node));
            }
        }
        for name in &listing.files {
            if kept.contains(name.as_str()) {
                ops.push(MergeOp::Keep(name.as_str().into()));
                continue;
            }
            ops.push(MergeOp::Insert(classify(path, name, EntryKind::File)));
        }
        apply_merge(entries, ops);

        if let Some(node) = severed {
            entries.insert(0, *node);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(name: &str) -> Node {
        Node::directory(Path::new("/t"), name, 0, false)
    }

    fn file(name: &str) -> Node {
        Node::file(Path::new("/t"), name, false)
    }

    fn names(entries: &[Node]) -> Vec<&str> {
        entries.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_insert_with_no_cursor_goes_first() {
        let mut entries = vec![file("z.txt")];
        apply_merge(&mut entries, vec![MergeOp::Insert(dir("src"))]);
        assert_eq!(names(&entries), vec!["src", "z.txt"]);
    }

    #[test]
    fn test_insert_lands_after_kept_name() {
        let mut entries = vec![dir("a"), dir("b"), file("z.txt")];
        let ops = vec![
            MergeOp::Keep("a".into()),
            MergeOp::Insert(dir("fresh")),
            MergeOp::Keep("b".into()),
        ];
        apply_merge(&mut entries, ops);
        assert_eq!(names(&entries), vec!["a", "fresh", "b", "z.txt"]);
    }

    #[test]
    fn test_gated_out_candidate_does_not_advance_cursor() {
        // A candidate that failed its gate emits no op; the next accepted
        // name inserts at the position the skipped one would have taken.
        let mut entries = vec![dir("a"), file("z.txt")];
        let ops = vec![MergeOp::Keep("a".into()), MergeOp::Insert(dir("c"))];
        apply_merge(&mut entries, ops);
        assert_eq!(names(&entries), vec!["a", "c", "z.txt"]);
    }

    #[test]
    fn test_consecutive_inserts_stay_adjacent() {
        let mut entries = vec![file("z.txt")];
        let ops = vec![MergeOp::Insert(dir("a")), MergeOp::Insert(dir("b"))];
        apply_merge(&mut entries, ops);
        assert_eq!(names(&entries), vec!["a", "b", "z.txt"]);
    }

    #[test]
    fn test_missing_cursor_name_falls_back_to_tail() {
        // The severed-chain path advances the cursor onto a name that is
        // not in the list yet; inserts then append.
        let mut entries = Vec::new();
        let ops = vec![MergeOp::Keep("lib".into()), MergeOp::Insert(file("new.txt"))];
        apply_merge(&mut entries, ops);
        assert_eq!(names(&entries), vec!["new.txt"]);
    }

    #[test]
    fn test_keep_does_not_touch_nodes() {
        let mut entries = vec![dir("a")];
        entries[0].set_open(true);
        entries[0].status = Some("M".into());
        apply_merge(&mut entries, vec![MergeOp::Keep("a".into())]);
        assert!(entries[0].open());
        assert_eq!(entries[0].status.as_deref(), Some("M"));
    }
}
