//! Reading files into documents.
//!
//! # Examples
//!
//! ```no_run
//! use hcsdiff::loader::load_document;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let document = load_document(Path::new("notes.txt"))?;
//! println!("{} lines", document.lines().len());
//! # Ok(())
//! # }
//! ```

use crate::document::Document;
use crate::error::LoadError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads a UTF-8 text file as a [`Document`].
///
/// The document URI is `file://` followed by the path as given. Line endings
/// are normalized.
///
/// # Errors
///
/// This function will return an error if:
/// - The file does not exist (`LoadError::FileNotFound`)
/// - The file cannot be read or is not valid UTF-8 (`LoadError::ReadError`)
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    let display = path.to_string_lossy().to_string();
    if !path.exists() {
        return Err(LoadError::file_not_found(display));
    }

    let content = fs::read_to_string(path).map_err(|e| LoadError::read_error(&display, e))?;
    let document = Document::new(uri_for(path), &content);
    debug!(
        uri = document.uri(),
        lines = document.lines().len(),
        "loaded document"
    );

    Ok(document)
}

fn uri_for(path: &Path) -> String {
    format!("file://{}", path.to_string_lossy())
}
