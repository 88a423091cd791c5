//! Text documents and their excerpt sequences.
//!
//! A [`Document`] normalizes line endings to a single line feed and derives two
//! contiguous excerpt sequences from the normalized content: one excerpt per
//! line and one excerpt per Unicode scalar value (`char`). Characters are
//! counted in `char`s, not bytes and not grapheme clusters.
//!
//! Every line, including the last one, is treated as terminated by a line
//! feed. The last line's terminator is synthetic when the content does not
//! end with one, so both sequences always span `(1,1)` to `(lines + 1, 1)`.
//!
//! # Examples
//!
//! ```
//! use hcsdiff::Document;
//!
//! let document = Document::new("string:left", "ab\r\nc");
//! assert_eq!(document.content(), "ab\nc");
//! assert_eq!(document.lines().len(), 2);
//! assert_eq!(document.characters().len(), 5);
//! ```

use crate::model::{Excerpt, Excerpted, Location, Position, Range, Weight};
use serde::Serialize;
use std::sync::Arc;

/// The line terminator adopted for internal use.
pub const EOL: char = '\n';

/// A text document with its derived excerpt sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    uri: Arc<str>,
    content: String,
    #[serde(skip)]
    lines: Vec<Excerpt>,
    #[serde(skip)]
    characters: Vec<Excerpt>,
}

impl Document {
    pub fn new(uri: impl Into<Arc<str>>, content: &str) -> Self {
        let uri = uri.into();
        let content = normalize(content);
        let lines = build_lines(&uri, &content);
        let characters = build_characters(&uri, &content);

        Self {
            uri,
            content,
            lines,
            characters,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The normalized content.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn lines(&self) -> &[Excerpt] {
        &self.lines
    }

    pub fn characters(&self) -> &[Excerpt] {
        &self.characters
    }

    /// The range covering the whole document.
    pub fn extent(&self) -> Range {
        Range::new(Position::new(1, 1), Position::new(self.lines.len() + 1, 1))
    }

    pub fn location(&self, range: Range) -> Location {
        Location::new(Arc::clone(&self.uri), range)
    }

    /// Returns the text covered by `range`.
    ///
    /// Character offsets beyond a line's end are clipped to that line, and
    /// lines past the end of the document contribute nothing.
    pub fn get_range(&self, range: &Range) -> String {
        let mut text = String::new();
        let first = range.start.line;
        let last = range.end.line;

        for number in first..=last {
            let Some(line) = number.checked_sub(1).and_then(|i| self.lines.get(i)) else {
                continue;
            };
            let length = line.content.chars().count();
            let from = if number == first {
                range.start.character.saturating_sub(1).min(length)
            } else {
                0
            };
            let to = if number == last {
                range.end.character.saturating_sub(1).min(length)
            } else {
                length
            };
            if from < to {
                text.extend(line.content.chars().skip(from).take(to - from));
            }
        }

        text
    }
}

/// Replaces CRLF and lone CR line endings with LF.
pub fn normalize(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Builds one excerpt per line, each including its (possibly synthetic) terminator.
pub fn build_lines(uri: &Arc<str>, content: &str) -> Vec<Excerpt> {
    content
        .split(EOL)
        .enumerate()
        .map(|(offset, line)| {
            let number = offset + 1;
            let range = Range::new(Position::new(number, 1), Position::new(number + 1, 1));
            Excerpt::new(format!("{line}{EOL}"), Location::new(Arc::clone(uri), range))
        })
        .collect()
}

/// Builds one excerpt per `char`, plus one per line terminator.
pub fn build_characters(uri: &Arc<str>, content: &str) -> Vec<Excerpt> {
    let mut characters = Vec::with_capacity(content.len() + 1);

    for (offset, line) in content.split(EOL).enumerate() {
        let number = offset + 1;
        let mut column = 1;
        for character in line.chars() {
            let range = Range::new(
                Position::new(number, column),
                Position::new(number, column + 1),
            );
            characters.push(Excerpt::new(
                character.to_string(),
                Location::new(Arc::clone(uri), range),
            ));
            column += 1;
        }

        let range = Range::new(Position::new(number, column), Position::new(number + 1, 1));
        characters.push(Excerpt::new(
            EOL.to_string(),
            Location::new(Arc::clone(uri), range),
        ));
    }

    characters
}

/// Default equality: excerpts with identical content are equal.
pub fn same_content<T: Excerpted + ?Sized>(a: &T, b: &T) -> bool {
    a.content() == b.content()
}

/// Default weight: the number of characters in the excerpt.
pub fn content_length<T: Excerpted + ?Sized>(excerpt: &T) -> Weight {
    excerpt.content().chars().count() as Weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_all_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(normalize("\r\r\n"), "\n\n");
    }

    #[test]
    fn test_lines_cover_document() {
        let document = Document::new("string:test", "ab\ncd");
        let lines = document.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content, "ab\n");
        assert_eq!(lines[1].content, "cd\n");
        assert_eq!(lines[0].range().start, Position::new(1, 1));
        assert_eq!(lines[0].range().end, Position::new(2, 1));
        assert_eq!(lines[1].range().end, Position::new(3, 1));
        assert_eq!(document.extent().end, Position::new(3, 1));
    }

    #[test]
    fn test_characters_are_contiguous() {
        let document = Document::new("string:test", "ac\ndc\r\nb\rc");
        let characters = document.characters();
        for pair in characters.windows(2) {
            assert!(pair[0].range().touches(pair[1].range()));
        }
        assert_eq!(characters.first().unwrap().range().start, Position::new(1, 1));
        assert_eq!(characters.last().unwrap().range().end, document.extent().end);
    }

    #[test]
    fn test_line_terminator_excerpt() {
        let document = Document::new("string:test", "ab");
        let characters = document.characters();
        assert_eq!(characters.len(), 3);
        assert_eq!(characters[2].content, "\n");
        assert_eq!(characters[2].range().start, Position::new(1, 3));
        assert_eq!(characters[2].range().end, Position::new(2, 1));
    }

    #[test]
    fn test_multibyte_characters_count_once() {
        let document = Document::new("string:test", "héllo");
        assert_eq!(document.characters().len(), 6);
        assert_eq!(document.characters()[1].content, "é");
        assert_eq!(document.characters()[2].range().start, Position::new(1, 3));
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let document = Document::new("string:empty", "");
        assert_eq!(document.lines().len(), 1);
        assert_eq!(document.characters().len(), 1);
        assert_eq!(document.extent().end, Position::new(2, 1));
    }

    #[test]
    fn test_get_range_single_line() {
        let document = Document::new("string:test", "hello world");
        let range = Range::new(Position::new(1, 7), Position::new(1, 12));
        assert_eq!(document.get_range(&range), "world");
    }

    #[test]
    fn test_get_range_multi_line() {
        let document = Document::new("string:test", "abc\ndef\nghi");
        let range = Range::new(Position::new(1, 2), Position::new(3, 2));
        assert_eq!(document.get_range(&range), "bc\ndef\ng");
    }

    #[test]
    fn test_get_range_clips_at_line_end() {
        let document = Document::new("string:test", "abc\ndef");
        let range = Range::new(Position::new(1, 3), Position::new(1, 40));
        assert_eq!(document.get_range(&range), "c\n");

        let past_end = Range::new(Position::new(2, 1), Position::new(9, 1));
        assert_eq!(document.get_range(&past_end), "def\n");
    }

    #[test]
    fn test_default_comparators() {
        let document = Document::new("string:test", "aa");
        let characters = document.characters();
        assert!(same_content(&characters[0], &characters[1]));
        assert!(!same_content(&characters[0], &characters[2]));
        assert_eq!(content_length(&document.lines()[0]), 3);
    }
}
