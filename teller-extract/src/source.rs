//! Positioned-text dump loading.
//!
//! The PDF renderer is a black box: whatever backend extracts the document
//! writes a JSON dump of its pages, each page a list of `{text, x, y}` runs.
//! This module is the seam between that backend and the reconstructor.

use std::fs;
use std::path::Path;

use crate::glyph::Page;

/// Failure to obtain glyph runs for a document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The dump cannot be opened or read. Surfaced before any parsing begins.
    #[error("cannot read statement dump {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The dump is not valid positioned-text JSON.
    #[error("malformed statement dump {path}: {source}")]
    MalformedDump {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a positioned-text dump from a file.
///
/// A missing or unreadable file is a precondition failure. A dump with zero
/// pages is not: absence of content is the caller's signal, not an error.
pub fn load_dump(path: impl AsRef<Path>) -> Result<Vec<Page>, ExtractError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ExtractError::SourceUnavailable {
        path: path.display().to_string(),
        source,
    })?;
    parse_dump(&bytes, &path.display().to_string())
}

/// Load a positioned-text dump already held in memory.
pub fn load_dump_bytes(bytes: &[u8]) -> Result<Vec<Page>, ExtractError> {
    parse_dump(bytes, "<memory>")
}

fn parse_dump(bytes: &[u8], label: &str) -> Result<Vec<Page>, ExtractError> {
    serde_json::from_slice(bytes).map_err(|source| ExtractError::MalformedDump {
        path: label.to_string(),
        source,
    })
}
