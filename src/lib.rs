//! hcsdiff - Position-exact text diffing with move detection.
//!
//! This library compares two text documents and reports what changed as
//! located edits (`Add`, `Delete`, `Move`) plus the regions judged similar.
//! Alignment is done by a heaviest common subsequence solver over excerpts:
//! characters, lines or lexical tokens.
//!
//! # Example
//!
//! ```no_run
//! use hcsdiff::{
//!     format_diff, load_document, DiffSettings, DiffTool, DiffToolRegistry, OutputFormat,
//!     OutputOptions,
//! };
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load two files
//! let left = load_document(Path::new("old.json"))?;
//! let right = load_document(Path::new("new.json"))?;
//!
//! // Pick the tool for their extension and compare
//! let tool = DiffToolRegistry::new().resolve("old.json", "new.json", &DiffSettings::default());
//! let diff = tool.compare(&left, &right);
//!
//! // Format the output
//! let output = format_diff(&diff, &OutputFormat::Terminal, &OutputOptions::default())?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diff;
pub mod document;
pub mod error;
pub mod filter;
pub mod hcs;
pub mod json;
pub mod loader;
pub mod logging;
pub mod model;
pub mod output;
pub mod registry;
pub mod token;

// Re-export commonly used types for convenience
pub use config::{DiffSettings, ToolSettings};
pub use diff::{character_diff, line_diff, DiffOptions, DiffTool, HcsDiffTool};
pub use document::Document;
pub use error::{ConfigError, DiffError, LoadError, OutputError};
pub use filter::{filter_diff, FilterConfig};
pub use hcs::{heaviest_common_subsequence, heaviest_common_subsequence_by, HcsResult};
pub use json::json_lexical_diff;
pub use loader::load_document;
pub use model::{
    DiffItem, DiffLevel, DiffStats, DocumentDiff, Edit, EditType, Excerpt, Excerpted, ItemKind,
    Location, Position, Range, Similarity, Weight,
};
pub use output::{format_diff, OutputFormat, OutputOptions};
pub use registry::{compose, Composite, DiffToolFactory, DiffToolRegistry};
pub use token::{lexical_diff, Token, TokenValue, Tokenizer};
