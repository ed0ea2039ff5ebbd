//! Name-based ignore filtering.

use std::collections::HashSet;

use compact_str::CompactString;

use crate::config::ExploreConfig;
use crate::node::extension_of;

/// Flat ignore predicate compiled once from the configuration.
///
/// Matching is intentionally simple: a name is hidden when its extension
/// matches a stored `*.ext` wildcard, when the literal name is in the set,
/// or when dotfiles are hidden and the name starts with `.`. There is no
/// partial-path matching and no nested gitignore directory semantics.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    literals: HashSet<CompactString>,
    extensions: HashSet<CompactString>,
    show_dotfiles: bool,
}

impl IgnoreFilter {
    /// Compile the filter from `config`.
    pub fn new(config: &ExploreConfig) -> Self {
        let mut filter = Self {
            literals: HashSet::new(),
            extensions: HashSet::new(),
            show_dotfiles: config.show_dotfiles,
        };

        if !config.show_ignored {
            for name in &config.ignore_names {
                filter.add_pattern(name);
            }
            if config.respect_gitignore {
                if let Some(content) = &config.gitignore {
                    for line in content.lines() {
                        let line = line.trim_end_matches('/');
                        if !line.is_empty() {
                            filter.add_pattern(line);
                        }
                    }
                }
            }
        }

        filter
    }

    fn add_pattern(&mut self, pattern: &str) {
        if let Some(ext) = pattern.strip_prefix("*.") {
            self.extensions.insert(ext.into());
        } else {
            self.literals.insert(pattern.into());
        }
    }

    /// Whether `name` should be dropped from a listing.
    pub fn should_ignore(&self, name: &str) -> bool {
        let ext = extension_of(name);
        if !ext.is_empty() && self.extensions.contains(ext) {
            return true;
        }
        if self.literals.contains(name) {
            return true;
        }
        !self.show_dotfiles && name.starts_with('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with(names: &[&str], show_dotfiles: bool) -> IgnoreFilter {
        let config = ExploreConfig::builder()
            .show_dotfiles(show_dotfiles)
            .ignore_names(names.iter().map(|s| s.to_string()).collect::<Vec<_>>())
            .build()
            .unwrap();
        IgnoreFilter::new(&config)
    }

    #[test]
    fn test_literal_names() {
        let filter = filter_with(&["node_modules", "target"], true);
        assert!(filter.should_ignore("node_modules"));
        assert!(filter.should_ignore("target"));
        assert!(!filter.should_ignore("src"));
        // Literal matching is full-name only.
        assert!(!filter.should_ignore("node_modules_backup"));
    }

    #[test]
    fn test_extension_wildcards() {
        let filter = filter_with(&["*.log", "*.tmp"], true);
        assert!(filter.should_ignore("build.log"));
        assert!(filter.should_ignore("scratch.tmp"));
        assert!(!filter.should_ignore("log"));
        assert!(!filter.should_ignore("build.txt"));
        // Only the final extension is consulted.
        assert!(filter.should_ignore("trace.debug.log"));
    }

    #[test]
    fn test_dotfiles_hidden_by_default() {
        let filter = filter_with(&[], false);
        assert!(filter.should_ignore(".git"));
        assert!(filter.should_ignore(".env"));
        assert!(!filter.should_ignore("env"));
    }

    #[test]
    fn test_dotfiles_shown_when_enabled() {
        let filter = filter_with(&[], true);
        assert!(!filter.should_ignore(".git"));
    }

    #[test]
    fn test_gitignore_lines_trimmed_of_trailing_separators() {
        let config = ExploreConfig::builder()
            .show_dotfiles(true)
            .respect_gitignore(true)
            .gitignore(Some("target/\n*.log\n\nbuild/".to_string()))
            .build()
            .unwrap();
        let filter = IgnoreFilter::new(&config);

        assert!(filter.should_ignore("target"));
        assert!(filter.should_ignore("build"));
        assert!(filter.should_ignore("run.log"));
        assert!(!filter.should_ignore("src"));
    }

    #[test]
    fn test_gitignore_disabled_keeps_patterns_out() {
        let config = ExploreConfig::builder()
            .show_dotfiles(true)
            .respect_gitignore(false)
            .gitignore(Some("target/".to_string()))
            .build()
            .unwrap();
        let filter = IgnoreFilter::new(&config);
        assert!(!filter.should_ignore("target"));
    }

    #[test]
    fn test_show_ignored_bypasses_rules_but_not_dotfiles() {
        let config = ExploreConfig::builder()
            .show_ignored(true)
            .ignore_names(vec!["*.log".to_string(), "target".to_string()])
            .build()
            .unwrap();
        let filter = IgnoreFilter::new(&config);

        assert!(!filter.should_ignore("build.log"));
        assert!(!filter.should_ignore("target"));
        // show_dotfiles defaults to false and is independent.
        assert!(filter.should_ignore(".git"));
    }
}
