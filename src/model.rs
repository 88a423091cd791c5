//! Position, range and diff item model.
//!
//! Positions follow the editor convention: one-based lines, one-based
//! characters, where a character value names the gap *before* that character
//! (an insertion cursor). A range is half-open, so a range that contains a
//! whole line including its terminator ends at the start of the next line.
//!
//! # Examples
//!
//! ```
//! use hcsdiff::model::{Position, Range};
//!
//! let range = Range::new(Position::new(1, 1), Position::new(2, 1));
//! assert_eq!(range.to_string(), "[1:1; 2:1)");
//! assert!(Position::new(1, 9) < Position::new(2, 1));
//! ```

use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Weight of a matched excerpt. Weights are non-negative by construction.
pub type Weight = u64;

/// A cursor position between two characters of a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (one-based)
    pub line: usize,
    /// Character offset on the line (one-based); `len + 1` is end-of-line
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        debug_assert!(line >= 1 && character >= 1, "positions are one-based");
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// A half-open span `[start, end)` of a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "range end {} precedes start {}", end, start);
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true when `other` begins exactly where this range ends.
    pub fn touches(&self, other: &Range) -> bool {
        self.end == other.start
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}; {})", self.start, self.end)
    }
}

/// A range inside one specific document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub uri: Arc<str>,
    pub range: Range,
}

impl Location {
    pub fn new(uri: impl Into<Arc<str>>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            range,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.uri, self.range)
    }
}

/// The smallest comparable unit of a document: a character, a line or a token.
///
/// The number of characters in `content` always equals the span covered by
/// `location.range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    pub content: String,
    pub location: Location,
}

impl Excerpt {
    pub fn new(content: impl Into<String>, location: Location) -> Self {
        Self {
            content: content.into(),
            location,
        }
    }

    pub fn range(&self) -> &Range {
        &self.location.range
    }
}

/// Anything that can be aligned by the diff orchestrator.
pub trait Excerpted {
    fn excerpt(&self) -> &Excerpt;

    fn range(&self) -> &Range {
        &self.excerpt().location.range
    }

    fn content(&self) -> &str {
        &self.excerpt().content
    }
}

impl Excerpted for Excerpt {
    fn excerpt(&self) -> &Excerpt {
        self
    }
}

/// Granularity at which a diff item was computed.
///
/// The ordering is used for deterministic sorting only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DiffLevel {
    Binary,
    Textual,
    Lexical,
    Syntactic,
    Semantic,
    DataFlow,
}

impl fmt::Display for DiffLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiffLevel::Binary => "binary",
            DiffLevel::Textual => "textual",
            DiffLevel::Lexical => "lexical",
            DiffLevel::Syntactic => "syntactic",
            DiffLevel::Semantic => "semantic",
            DiffLevel::DataFlow => "data_flow",
        };
        f.write_str(name)
    }
}

/// The type of an edit. The orchestrator only produces `Add`, `Delete` and `Move`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EditType {
    Add,
    Delete,
    Change,
    Move,
    Copy,
    Rename,
}

/// A single reported edit between the left and right documents.
///
/// `Add` carries only `right`, `Delete` only `left`, `Move` both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    pub level: DiffLevel,
    #[serde(rename = "type")]
    pub edit_type: EditType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Location>,
}

impl Edit {
    pub fn add(level: DiffLevel, right: Location) -> Self {
        Self {
            level,
            edit_type: EditType::Add,
            left: None,
            right: Some(right),
        }
    }

    pub fn delete(level: DiffLevel, left: Location) -> Self {
        Self {
            level,
            edit_type: EditType::Delete,
            left: Some(left),
            right: None,
        }
    }

    pub fn moved(level: DiffLevel, left: Location, right: Location) -> Self {
        Self {
            level,
            edit_type: EditType::Move,
            left: Some(left),
            right: Some(right),
        }
    }
}

/// Left and right regions judged equivalent at a given level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Similarity {
    pub level: DiffLevel,
    pub left: Location,
    pub right: Location,
}

impl Similarity {
    pub fn new(level: DiffLevel, left: Location, right: Location) -> Self {
        Self { level, left, right }
    }
}

/// Discriminant shared by edits and similarities, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    Add,
    Delete,
    Change,
    Move,
    Copy,
    Rename,
    Similarity,
}

impl From<EditType> for ItemKind {
    fn from(edit_type: EditType) -> Self {
        match edit_type {
            EditType::Add => ItemKind::Add,
            EditType::Delete => ItemKind::Delete,
            EditType::Change => ItemKind::Change,
            EditType::Move => ItemKind::Move,
            EditType::Copy => ItemKind::Copy,
            EditType::Rename => ItemKind::Rename,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Add => "add",
            ItemKind::Delete => "delete",
            ItemKind::Change => "change",
            ItemKind::Move => "move",
            ItemKind::Copy => "copy",
            ItemKind::Rename => "rename",
            ItemKind::Similarity => "similarity",
        };
        f.write_str(name)
    }
}

/// Wire form of a diff item: an explicit `kind` tag plus the variant payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffItem {
    Edit(Edit),
    Similarity(Similarity),
}

impl DiffItem {
    pub fn level(&self) -> DiffLevel {
        match self {
            DiffItem::Edit(edit) => edit.level,
            DiffItem::Similarity(similarity) => similarity.level,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            DiffItem::Edit(edit) => edit.edit_type.into(),
            DiffItem::Similarity(_) => ItemKind::Similarity,
        }
    }

    pub fn left(&self) -> Option<&Location> {
        match self {
            DiffItem::Edit(edit) => edit.left.as_ref(),
            DiffItem::Similarity(similarity) => Some(&similarity.left),
        }
    }

    pub fn right(&self) -> Option<&Location> {
        match self {
            DiffItem::Edit(edit) => edit.right.as_ref(),
            DiffItem::Similarity(similarity) => Some(&similarity.right),
        }
    }
}

impl From<Edit> for DiffItem {
    fn from(edit: Edit) -> Self {
        DiffItem::Edit(edit)
    }
}

impl From<Similarity> for DiffItem {
    fn from(similarity: Similarity) -> Self {
        DiffItem::Similarity(similarity)
    }
}

/// Total order used when nesting highlights that share a boundary.
///
/// Higher levels come first, then item kind, then the right range and finally
/// the left range. A missing side sorts before a present one.
pub fn render_order(a: &DiffItem, b: &DiffItem) -> Ordering {
    b.level()
        .cmp(&a.level())
        .then_with(|| a.kind().cmp(&b.kind()))
        .then_with(|| range_of(a.right()).cmp(&range_of(b.right())))
        .then_with(|| range_of(a.left()).cmp(&range_of(b.left())))
}

fn range_of(location: Option<&Location>) -> Option<Range> {
    location.map(|location| location.range)
}

/// Counts of reported items by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub deleted: usize,
    pub moved: usize,
    pub similar: usize,
}

impl DiffStats {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a DiffItem>) -> Self {
        let mut stats = Self::default();
        for item in items {
            match item.kind() {
                ItemKind::Add => stats.added += 1,
                ItemKind::Delete => stats.deleted += 1,
                ItemKind::Move => stats.moved += 1,
                ItemKind::Similarity => stats.similar += 1,
                ItemKind::Change | ItemKind::Copy | ItemKind::Rename => {}
            }
        }
        stats
    }

    /// Number of edits (similarities excluded).
    pub fn total_edits(&self) -> usize {
        self.added + self.deleted + self.moved
    }

    pub fn is_empty(&self) -> bool {
        self.total_edits() == 0
    }
}

/// The result of comparing two documents.
///
/// Similarity and edit ranges together partition each document exactly when
/// the excerpt mapper covers the whole document (characters, lines).
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDiff<'d> {
    pub left: &'d Document,
    pub right: &'d Document,
    pub edits: Vec<Edit>,
    pub similarities: Vec<Similarity>,
}

impl<'d> DocumentDiff<'d> {
    pub fn new(left: &'d Document, right: &'d Document) -> Self {
        Self {
            left,
            right,
            edits: Vec::new(),
            similarities: Vec::new(),
        }
    }

    /// Edits followed by similarities, in production order.
    pub fn items(&self) -> Vec<DiffItem> {
        self.edits
            .iter()
            .cloned()
            .map(DiffItem::from)
            .chain(self.similarities.iter().cloned().map(DiffItem::from))
            .collect()
    }

    /// All items sorted by [`render_order`].
    pub fn sorted_items(&self) -> Vec<DiffItem> {
        let mut items = self.items();
        items.sort_by(render_order);
        items
    }

    pub fn stats(&self) -> DiffStats {
        DiffStats::from_items(&self.items())
    }

    /// Returns true when no edits were found.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}
