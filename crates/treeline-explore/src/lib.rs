//! Directory tree population and incremental refresh for treeline.
//!
//! This crate maintains an in-memory, lazily-expanded tree mirroring a
//! directory hierarchy on disk. Two operations cover the whole lifecycle:
//!
//! - **Populate** expands a directory into child nodes, optionally
//!   collapsing chains of single-child directories into one logical row.
//! - **Refresh** re-synchronizes an already-expanded directory against the
//!   current on-disk state without discarding unrelated subtree state:
//!   surviving nodes keep their identity, their open flags and their cached
//!   descendants.
//!
//! All filesystem access is blocking and runs on the calling thread; there
//! is no background scanning. Callers must not run overlapping calls
//! against the same entry list.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use treeline_explore::{Explorer, ExploreConfig};
//!
//! let config = ExploreConfig::builder()
//!     .group_empty_dirs(true)
//!     .ignore_names(vec!["*.log".to_string()])
//!     .build()
//!     .unwrap();
//! let explorer = Explorer::new(config);
//!
//! let mut entries = Vec::new();
//! explorer.populate_root(&mut entries, Path::new("/home/user/project")).unwrap();
//!
//! // Later, after the directory changed on disk:
//! explorer.refresh_root(&mut entries, Path::new("/home/user/project")).unwrap();
//! ```

mod classify;
mod decorate;
mod explore;
mod fsops;
mod refresh;

pub use decorate::Decorate;
#[cfg(feature = "git")]
pub use decorate::GitStatusDecorator;
pub use explore::Explorer;
pub use fsops::EntryKind;

// Re-export core types for convenience
pub use treeline_core::{ExploreConfig, ExploreError, IgnoreFilter, Node, NodeKind};
