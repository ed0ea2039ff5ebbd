//! Exploration configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration threaded into populate and refresh calls.
///
/// This is an immutable value object; toggles are read at call time and the
/// ignore rules are compiled once into an
/// [`IgnoreFilter`](crate::IgnoreFilter).
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct ExploreConfig {
    /// Show entries whose name starts with a dot.
    #[builder(default = "false")]
    #[serde(default)]
    pub show_dotfiles: bool,

    /// Show entries the ignore rules would hide. Bypasses the explicit and
    /// gitignore-derived rules; dotfile visibility stays governed by
    /// `show_dotfiles`.
    #[builder(default = "false")]
    #[serde(default)]
    pub show_ignored: bool,

    /// Apply the supplied gitignore patterns.
    #[builder(default = "false")]
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Gitignore content: newline-separated patterns, supplied by the host.
    #[builder(default)]
    #[serde(default)]
    pub gitignore: Option<String>,

    /// Literal names or `*.ext` wildcards to hide.
    #[builder(default)]
    #[serde(default)]
    pub ignore_names: Vec<String>,

    /// Collapse chains of single-child directories into one row.
    #[builder(default = "false")]
    #[serde(default)]
    pub group_empty_dirs: bool,

    /// Run the decoration hook over finished entry lists.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub decorate: bool,
}

fn default_true() -> bool {
    true
}

impl ExploreConfig {
    /// Create a new config builder.
    pub fn builder() -> ExploreConfigBuilder {
        ExploreConfigBuilder::default()
    }
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            show_dotfiles: false,
            show_ignored: false,
            respect_gitignore: false,
            gitignore: None,
            ignore_names: Vec::new(),
            group_empty_dirs: false,
            decorate: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ExploreConfig::builder()
            .show_dotfiles(true)
            .group_empty_dirs(true)
            .ignore_names(vec!["node_modules".to_string(), "*.log".to_string()])
            .build()
            .unwrap();

        assert!(config.show_dotfiles);
        assert!(config.group_empty_dirs);
        assert_eq!(config.ignore_names.len(), 2);
        assert!(config.decorate);
    }

    #[test]
    fn test_config_defaults() {
        let config = ExploreConfig::default();
        assert!(!config.show_dotfiles);
        assert!(!config.show_ignored);
        assert!(!config.respect_gitignore);
        assert!(config.gitignore.is_none());
        assert!(config.ignore_names.is_empty());
        assert!(!config.group_empty_dirs);
        assert!(config.decorate);
    }
}
