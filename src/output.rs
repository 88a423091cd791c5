//! Output formatting for diff results.
//!
//! This module renders a [`DocumentDiff`] as colored terminal text, plain
//! text or JSON. Items are always emitted in render order (see
//! [`render_order`](crate::model::render_order)).
//!
//! # Examples
//!
//! ```
//! use hcsdiff::{format_diff, line_diff, DiffTool, Document, OutputFormat, OutputOptions};
//!
//! let left = Document::new("string:left", "abc\n");
//! let right = Document::new("string:right", "abc\nxyz\n");
//! let diff = line_diff(0).compare(&left, &right);
//!
//! let output = format_diff(&diff, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert!(output.contains("xyz"));
//! assert!(output.contains("Summary: 1 added"));
//! ```

use crate::error::OutputError;
use crate::model::{DiffItem, DiffStats, DocumentDiff, ItemKind, Location};
use colored::*;
use serde_json::json;
use std::str::FromStr;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the diff
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(OutputError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Options for controlling output formatting.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Hide similarities (only show edits)
    pub compact: bool,
    /// Maximum number of characters shown per excerpt preview
    pub max_value_length: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            compact: false,
            max_value_length: 80,
        }
    }
}

/// Formats a diff according to the specified format and options.
///
/// # Arguments
///
/// * `diff` - The diff to format
/// * `format` - The output format (Terminal, JSON, or Plain)
/// * `options` - Formatting options
///
/// # Returns
///
/// Returns the formatted string on success, or an OutputError on failure.
pub fn format_diff(
    diff: &DocumentDiff<'_>,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_text(diff, options, true)),
        OutputFormat::Json => format_json(diff),
        OutputFormat::Plain => Ok(format_text(diff, options, false)),
    }
}

/// Formats a diff as text, one item per line, followed by a summary.
///
/// Color scheme:
/// - Add: green
/// - Delete: red
/// - Move: blue
/// - Similarity: dimmed (if shown)
fn format_text(diff: &DocumentDiff<'_>, options: &OutputOptions, colored: bool) -> String {
    let items: Vec<DiffItem> = diff
        .sorted_items()
        .into_iter()
        .filter(|item| should_show_item(item, options))
        .collect();

    if items.is_empty() {
        let message = "No changes detected.";
        return if colored {
            message.dimmed().to_string()
        } else {
            message.to_string()
        };
    }

    let mut output = String::new();
    for item in &items {
        let line = format_item(diff, item, options);
        if colored {
            output.push_str(&colorize(&line, item.kind()));
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format_summary(&diff.stats()));

    output
}

/// Formats a single item without colors.
fn format_item(diff: &DocumentDiff<'_>, item: &DiffItem, options: &OutputOptions) -> String {
    let symbol = item_symbol(item.kind());
    let level = item.level();

    match (item.left(), item.right()) {
        (Some(left), Some(right)) if item.kind() == ItemKind::Similarity => {
            format!("{symbol} [{level}] {} = {}", left.range, right.range)
        }
        (Some(left), Some(right)) => format!(
            "{symbol} [{level}] {} -> {}: {}",
            left.range,
            right.range,
            preview(diff, left, true, options.max_value_length)
        ),
        (Some(left), None) => format!(
            "{symbol} [{level}] {}: {}",
            left.range,
            preview(diff, left, true, options.max_value_length)
        ),
        (None, Some(right)) => format!(
            "{symbol} [{level}] {}: {}",
            right.range,
            preview(diff, right, false, options.max_value_length)
        ),
        (None, None) => format!("{symbol} [{level}]"),
    }
}

fn item_symbol(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Add => "+",
        ItemKind::Delete => "-",
        ItemKind::Move => "~",
        ItemKind::Similarity => "=",
        ItemKind::Change | ItemKind::Copy | ItemKind::Rename => "*",
    }
}

fn colorize(line: &str, kind: ItemKind) -> String {
    match kind {
        ItemKind::Add => line.green().to_string(),
        ItemKind::Delete => line.red().to_string(),
        ItemKind::Move => line.blue().to_string(),
        ItemKind::Similarity => line.dimmed().to_string(),
        ItemKind::Change | ItemKind::Copy | ItemKind::Rename => line.yellow().to_string(),
    }
}

/// Quoted, escaped text of `location`, truncated to `max_length` characters.
fn preview(diff: &DocumentDiff<'_>, location: &Location, left: bool, max_length: usize) -> String {
    let document = if left { diff.left } else { diff.right };
    let text = document.get_range(&location.range);

    let escaped: String = text.escape_debug().collect();
    if escaped.chars().count() > max_length {
        let truncated: String = escaped.chars().take(max_length).collect();
        format!("\"{truncated}...\"")
    } else {
        format!("\"{escaped}\"")
    }
}

/// Determines if an item should be shown based on options.
fn should_show_item(item: &DiffItem, options: &OutputOptions) -> bool {
    !(options.compact && item.kind() == ItemKind::Similarity)
}

/// Formats summary statistics.
fn format_summary(stats: &DiffStats) -> String {
    if stats.is_empty() {
        return "Summary: No changes".to_string();
    }

    let mut parts = Vec::new();
    if stats.added > 0 {
        parts.push(format!("{} added", stats.added));
    }
    if stats.deleted > 0 {
        parts.push(format!("{} deleted", stats.deleted));
    }
    if stats.moved > 0 {
        parts.push(format!("{} moved", stats.moved));
    }
    if stats.similar > 0 {
        parts.push(format!("{} similar", stats.similar));
    }

    format!("Summary: {}", parts.join(", "))
}

/// Formats a diff as JSON.
///
/// The document URIs, every item in its tagged wire form, and statistics.
fn format_json(diff: &DocumentDiff<'_>) -> Result<String, OutputError> {
    let items = serde_json::to_value(diff.sorted_items())
        .map_err(|e| OutputError::JsonSerializationError { source: e })?;
    let stats = diff.stats();

    let output = json!({
        "left": diff.left.uri(),
        "right": diff.right.uri(),
        "items": items,
        "stats": {
            "added": stats.added,
            "deleted": stats.deleted,
            "moved": stats.moved,
            "similar": stats.similar,
        }
    });

    serde_json::to_string_pretty(&output)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{line_diff, DiffTool};
    use crate::document::Document;

    fn documents() -> (Document, Document) {
        (
            Document::new("string:left", "abc\ndef"),
            Document::new("string:right", "def\nabc\nxyz"),
        )
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(OutputError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_format_summary_empty() {
        assert_eq!(format_summary(&DiffStats::default()), "Summary: No changes");
    }

    #[test]
    fn test_format_summary_with_changes() {
        let stats = DiffStats {
            added: 2,
            deleted: 1,
            moved: 3,
            similar: 5,
        };
        let summary = format_summary(&stats);
        assert!(summary.contains("2 added"));
        assert!(summary.contains("1 deleted"));
        assert!(summary.contains("3 moved"));
        assert!(summary.contains("5 similar"));
    }

    #[test]
    fn test_format_plain_lists_every_kind() {
        let (left, right) = documents();
        let diff = line_diff(0).compare(&left, &right);
        let output = format_diff(&diff, &OutputFormat::Plain, &OutputOptions::default()).unwrap();

        assert!(output.contains("+ [textual] [3:1; 4:1): \"xyz\\n\""));
        assert!(output.lines().any(|line| line.starts_with("~ [textual]")));
        assert!(output.lines().any(|line| line.starts_with("= [textual]")));
        assert!(output.contains("Summary: 1 added, 1 moved, 1 similar"));
    }

    #[test]
    fn test_compact_hides_similarities() {
        let (left, right) = documents();
        let diff = line_diff(0).compare(&left, &right);
        let options = OutputOptions {
            compact: true,
            ..Default::default()
        };
        let output = format_diff(&diff, &OutputFormat::Plain, &options).unwrap();
        assert!(!output.lines().any(|line| line.starts_with('=')));
    }

    #[test]
    fn test_format_plain_no_changes() {
        let left = Document::new("string:left", "same");
        let right = Document::new("string:right", "same");
        let diff = line_diff(0).compare(&left, &right);
        let options = OutputOptions {
            compact: true,
            ..Default::default()
        };
        let output = format_diff(&diff, &OutputFormat::Plain, &options).unwrap();
        assert_eq!(output, "No changes detected.");
    }

    #[test]
    fn test_preview_truncates() {
        let left = Document::new("string:left", &"a".repeat(100));
        let right = Document::new("string:right", "");
        let diff = line_diff(0).compare(&left, &right);
        let location = diff.edits[0].left.clone().unwrap();
        let text = preview(&diff, &location, true, 10);
        assert_eq!(text, "\"aaaaaaaaaa...\"");
    }

    #[test]
    fn test_format_json_is_tagged_and_sorted() {
        let (left, right) = documents();
        let diff = line_diff(0).compare(&left, &right);
        let output = format_diff(&diff, &OutputFormat::Json, &OutputOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let items = value["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["kind"], "edit");
        assert_eq!(items[0]["type"], "add");
        assert_eq!(items[2]["kind"], "similarity");
        assert_eq!(value["stats"]["added"], 1);
        assert_eq!(value["left"], "string:left");
    }
}
