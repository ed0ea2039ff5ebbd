//! Tree population and single-child chain grouping.

use std::path::Path;

use treeline_core::{ExploreConfig, ExploreError, IgnoreFilter, Node};

use crate::classify::classify;
use crate::decorate::Decorate;
use crate::fsops::{self, EntryKind};

/// One directory listing, ignore-filtered and partitioned by kind.
///
/// Each category keeps the underlying scan order; the OS gives no ordering
/// guarantee and none is assumed.
#[derive(Debug, Default)]
pub(crate) struct Listing {
    pub dirs: Vec<String>,
    pub links: Vec<String>,
    pub files: Vec<String>,
}

impl Listing {
    pub fn total(&self) -> usize {
        self.dirs.len() + self.links.len() + self.files.len()
    }

    /// The single listed name, when the listing holds exactly one.
    pub fn sole_name(&self) -> Option<&str> {
        if self.total() != 1 {
            return None;
        }
        self.dirs
            .first()
            .or_else(|| self.links.first())
            .or_else(|| self.files.first())
            .map(String::as_str)
    }
}

/// True when a directory's entire visible content is a single subdirectory,
/// or a single symlink resolving to a directory.
///
/// Such a directory is visual noise on its own row; collapsing it into
/// `parent/child` keeps the tree navigable with less clutter.
pub(crate) fn should_group(parent: &Path, listing: &Listing) -> bool {
    match (
        listing.dirs.len(),
        listing.links.len(),
        listing.files.len(),
    ) {
        (1, 0, 0) => true,
        (0, 1, 0) => fsops::resolve_link(&parent.join(&listing.links[0]))
            .map(|target| target.is_dir())
            .unwrap_or(false),
        _ => false,
    }
}

/// Builds and re-synchronizes entry lists for directories on disk.
///
/// All filesystem work is blocking and happens on the calling thread; a
/// given entry list must not be populated or refreshed concurrently.
pub struct Explorer {
    pub(crate) config: ExploreConfig,
    pub(crate) ignore: IgnoreFilter,
    decorator: Option<Box<dyn Decorate>>,
}

impl Explorer {
    /// Create an explorer, compiling the ignore rules from `config` once.
    pub fn new(config: ExploreConfig) -> Self {
        let ignore = IgnoreFilter::new(&config);
        Self {
            config,
            ignore,
            decorator: None,
        }
    }

    /// Attach a decoration hook, run over every finished entry list unless
    /// decoration is disabled in the configuration.
    pub fn with_decorator(mut self, decorator: Box<dyn Decorate>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    /// Expand `node` into its child entries.
    ///
    /// `node` must be a directory or a symlink resolving to one. On scan
    /// failure the node is left untouched and the error describes the
    /// directory that could not be listed.
    pub fn populate(&self, node: &mut Node) -> Result<(), ExploreError> {
        if !node.is_navigable() {
            return Err(ExploreError::NotADirectory {
                path: node.path.clone(),
            });
        }

        let path = node.path.clone();
        let mut out = Vec::new();
        // Chain links live on directory nodes only, so expanding a
        // symlink-to-directory never starts a chain.
        let next = match self.populate_into(&mut out, &path, node.is_dir()) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(target: "explore", "scan failed: {err}");
                return Err(err);
            }
        };
        self.decorate(&path, &mut out);

        node.set_group_next(next);
        if let Some(entries) = node.entries_mut() {
            *entries = out;
        }
        tracing::debug!(
            target: "explore",
            "populated {} ({} entries)",
            path.display(),
            node.entries().map(|e| e.len()).unwrap_or(0)
        );
        Ok(())
    }

    /// Build the top-level listing for `path` into `entries`.
    ///
    /// The top-level listing has no owning row, so grouping never applies.
    /// On scan failure `entries` is left unchanged.
    pub fn populate_root(&self, entries: &mut Vec<Node>, path: &Path) -> Result<(), ExploreError> {
        let mut out = Vec::new();
        match self.populate_into(&mut out, path, false) {
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(target: "explore", "scan failed: {err}");
                return Err(err);
            }
        }
        self.decorate(path, &mut out);
        *entries = out;
        tracing::debug!(
            target: "explore",
            "populated {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(())
    }

    /// Scan `path`, drop ignored names, partition the rest by kind.
    pub(crate) fn scan(&self, path: &Path) -> Result<Listing, ExploreError> {
        let mut listing = Listing::default();
        for (name, kind) in fsops::scan_dir(path)? {
            if self.ignore.should_ignore(&name) {
                continue;
            }
            match kind {
                EntryKind::Directory => listing.dirs.push(name),
                EntryKind::Symlink => listing.links.push(name),
                EntryKind::File => listing.files.push(name),
            }
        }
        Ok(listing)
    }

    /// Fill `out` with the children of `path`: directories first, then
    /// symlinks, then files, each category in scan order.
    ///
    /// When grouping fires, the recursion has already filled `out` through
    /// the end of the chain and the returned node is the chain link the
    /// caller adopts as `group_next`.
    fn populate_into(
        &self,
        out: &mut Vec<Node>,
        path: &Path,
        allow_group: bool,
    ) -> Result<Option<Box<Node>>, ExploreError> {
        let listing = self.scan(path)?;

        if allow_group && self.config.group_empty_dirs && should_group(path, &listing) {
            if let Some(chained) = self.group_into(out, path, &listing)? {
                return Ok(Some(chained));
            }
            // Sole child failed its gate: fall through to per-entry handling.
        }

        for name in &listing.dirs {
            let node = classify(path, name, EntryKind::Directory);
            // Unreadable directories are silently excluded, not an error.
            if fsops::is_readable_dir(&node.path) {
                out.push(node);
            }
        }
        for name in &listing.links {
            let node = classify(path, name, EntryKind::Symlink);
            // A link that did not resolve cannot be classified as file or
            // directory and stays out of the tree.
            if node.link_target().is_some() {
                out.push(node);
            }
        }
        for name in &listing.files {
            out.push(classify(path, name, EntryKind::File));
        }
        Ok(None)
    }

    /// Thread the sole navigable child into a chain link and continue
    /// populating `out` through it.
    fn group_into(
        &self,
        out: &mut Vec<Node>,
        path: &Path,
        listing: &Listing,
    ) -> Result<Option<Box<Node>>, ExploreError> {
        if let Some(name) = listing.dirs.first() {
            let mut child = classify(path, name, EntryKind::Directory);
            if !fsops::is_readable_dir(&child.path) {
                return Ok(None);
            }
            let next = self.populate_into(out, &child.path, true)?;
            child.set_group_next(next);
            return Ok(Some(Box::new(child)));
        }

        // should_group already resolved the link to a directory; the chain
        // ends here because only directory nodes carry a chain link.
        let name = &listing.links[0];
        let child = classify(path, name, EntryKind::Symlink);
        if !child.is_dir_link()
            || child.link_target().is_none()
            || !fsops::is_readable_dir(&child.path)
        {
            return Ok(None);
        }
        self.populate_into(out, &child.path, false)?;
        Ok(Some(Box::new(child)))
    }

    pub(crate) fn decorate(&self, dir: &Path, entries: &mut [Node]) {
        if !self.config.decorate {
            return;
        }
        if let Some(decorator) = &self.decorator {
            decorator.decorate(dir, entries);
        }
    }
}
