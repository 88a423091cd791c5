//! Tool composition and the extension registry.
//!
//! [`compose`] runs several tools on the same document pair and concatenates
//! their results. Each item keeps the level of the tool that produced it and
//! no deduplication happens across tools.
//!
//! [`DiffToolRegistry`] maps file extensions to tool factories. Resolution
//! uses the left path's extension and falls back to character and line
//! diffs composed together.

use crate::config::DiffSettings;
use crate::diff::{character_diff, line_diff, DiffTool};
use crate::document::Document;
use crate::json::json_lexical_diff;
use crate::model::DocumentDiff;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Builds a diff tool from the active settings.
pub type DiffToolFactory = fn(&DiffSettings) -> Box<dyn DiffTool>;

/// Several tools run independently; their results are concatenated in order.
pub struct Composite {
    tools: Vec<Box<dyn DiffTool>>,
}

impl Composite {
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl DiffTool for Composite {
    fn compare<'d>(&self, left: &'d Document, right: &'d Document) -> DocumentDiff<'d> {
        let mut diff = DocumentDiff::new(left, right);
        for tool in &self.tools {
            let partial = tool.compare(left, right);
            diff.edits.extend(partial.edits);
            diff.similarities.extend(partial.similarities);
        }
        diff
    }
}

/// Composes tools into one whose output is the concatenation of theirs.
pub fn compose(tools: Vec<Box<dyn DiffTool>>) -> Composite {
    Composite { tools }
}

/// Character and line diffs composed, both textual.
pub fn default_tool(settings: &DiffSettings) -> Box<dyn DiffTool> {
    Box::new(compose(vec![
        Box::new(
            character_diff(settings.character.similarity_threshold)
                .with_max_move_passes(settings.max_move_passes),
        ),
        Box::new(
            line_diff(settings.line.similarity_threshold)
                .with_max_move_passes(settings.max_move_passes),
        ),
    ]))
}

/// Character diff composed with the JSON lexical diff.
pub fn json_tool(settings: &DiffSettings) -> Box<dyn DiffTool> {
    Box::new(compose(vec![
        Box::new(
            character_diff(settings.character.similarity_threshold)
                .with_max_move_passes(settings.max_move_passes),
        ),
        Box::new(
            json_lexical_diff(settings.lexical.similarity_threshold)
                .with_max_move_passes(settings.max_move_passes),
        ),
    ]))
}

/// Maps file extensions to diff tool factories.
pub struct DiffToolRegistry {
    factories: HashMap<String, DiffToolFactory>,
    fallback: DiffToolFactory,
}

impl fmt::Debug for DiffToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extensions: Vec<_> = self.factories.keys().collect();
        extensions.sort();
        f.debug_struct("DiffToolRegistry")
            .field("extensions", &extensions)
            .finish()
    }
}

impl Default for DiffToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffToolRegistry {
    /// Creates a registry with the built-in `json` tool registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_extension("json", json_tool);
        registry
    }

    /// Creates a registry with nothing registered; every path falls back.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            fallback: default_tool,
        }
    }

    /// Registers `factory` for `extension`, replacing any previous one.
    ///
    /// Extensions are matched without the leading dot and case-insensitively.
    pub fn register_extension(&mut self, extension: &str, factory: DiffToolFactory) {
        let key = normalize_extension(extension);
        debug!(extension = %key, "registered diff tool");
        self.factories.insert(key, factory);
    }

    pub fn is_registered(&self, extension: &str) -> bool {
        self.factories.contains_key(&normalize_extension(extension))
    }

    /// Resolves the tool for a pair of paths.
    ///
    /// The left path's extension decides. A differing right extension is
    /// logged and otherwise ignored.
    pub fn resolve(
        &self,
        left: impl AsRef<Path>,
        right: impl AsRef<Path>,
        settings: &DiffSettings,
    ) -> Box<dyn DiffTool> {
        let left_extension = extension_of(left.as_ref());
        let right_extension = extension_of(right.as_ref());
        if left_extension != right_extension {
            warn!(
                left = left_extension.as_deref().unwrap_or(""),
                right = right_extension.as_deref().unwrap_or(""),
                "extensions differ, using the left one"
            );
        }

        let factory = left_extension
            .as_deref()
            .and_then(|extension| self.factories.get(extension))
            .copied()
            .unwrap_or(self.fallback);
        factory(settings)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(normalize_extension)
}
