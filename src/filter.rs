//! Level and kind filtering for diff results.
//!
//! An empty selection means "everything". Level and kind selections combine:
//! an item must match both to be kept.
//!
//! # Examples
//!
//! ```
//! use hcsdiff::filter::FilterConfig;
//! use hcsdiff::model::{DiffLevel, ItemKind};
//!
//! let config = FilterConfig::new()
//!     .level(DiffLevel::Lexical)
//!     .kind(ItemKind::Add);
//! assert!(config.has_filters());
//! ```

use crate::model::{DiffItem, DiffLevel, DocumentDiff, ItemKind};

/// Configuration for filtering diff results.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Levels to keep (if non-empty, only these are shown)
    pub levels: Vec<DiffLevel>,
    /// Item kinds to keep (if non-empty, only these are shown)
    pub kinds: Vec<ItemKind>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: DiffLevel) -> Self {
        if !self.levels.contains(&level) {
            self.levels.push(level);
        }
        self
    }

    pub fn kind(mut self, kind: ItemKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    pub fn has_filters(&self) -> bool {
        !self.levels.is_empty() || !self.kinds.is_empty()
    }

    pub fn should_include(&self, item: &DiffItem) -> bool {
        let level_ok = self.levels.is_empty() || self.levels.contains(&item.level());
        let kind_ok = self.kinds.is_empty() || self.kinds.contains(&item.kind());
        level_ok && kind_ok
    }

    pub fn filter_items(&self, items: &[DiffItem]) -> Vec<DiffItem> {
        items
            .iter()
            .filter(|item| self.should_include(item))
            .cloned()
            .collect()
    }
}

/// Filters a diff based on the filter configuration.
pub fn filter_diff<'d>(diff: &DocumentDiff<'d>, config: &FilterConfig) -> DocumentDiff<'d> {
    if !config.has_filters() {
        return diff.clone();
    }

    let mut filtered = DocumentDiff::new(diff.left, diff.right);
    for item in diff.items() {
        if !config.should_include(&item) {
            continue;
        }
        match item {
            DiffItem::Edit(edit) => filtered.edits.push(edit),
            DiffItem::Similarity(similarity) => filtered.similarities.push(similarity),
        }
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{character_diff, DiffTool};
    use crate::document::Document;

    #[test]
    fn test_empty_config_keeps_everything() {
        let left = Document::new("string:left", "abc");
        let right = Document::new("string:right", "abd");
        let diff = character_diff(0).compare(&left, &right);

        let filtered = filter_diff(&diff, &FilterConfig::new());
        assert_eq!(filtered.edits, diff.edits);
        assert_eq!(filtered.similarities, diff.similarities);
    }

    #[test]
    fn test_kind_filter() {
        let left = Document::new("string:left", "abc");
        let right = Document::new("string:right", "abd");
        let diff = character_diff(0).compare(&left, &right);

        let config = FilterConfig::new().kind(ItemKind::Similarity);
        let filtered = filter_diff(&diff, &config);
        assert!(filtered.edits.is_empty());
        assert_eq!(filtered.similarities.len(), diff.similarities.len());
    }

    #[test]
    fn test_level_filter_drops_other_levels() {
        let left = Document::new("string:left", "abc");
        let right = Document::new("string:right", "abd");
        let diff = character_diff(0).compare(&left, &right);

        let config = FilterConfig::new().level(DiffLevel::Lexical);
        assert!(filter_diff(&diff, &config).items().is_empty());
    }

    #[test]
    fn test_builders_deduplicate() {
        let config = FilterConfig::new()
            .kind(ItemKind::Add)
            .kind(ItemKind::Add)
            .level(DiffLevel::Textual)
            .level(DiffLevel::Textual);
        assert_eq!(config.kinds.len(), 1);
        assert_eq!(config.levels.len(), 1);
    }
}
