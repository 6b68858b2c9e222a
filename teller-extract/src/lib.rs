//! teller-extract: positioned-text ingestion and line reconstruction.

pub mod glyph;
pub mod reconstruct;
pub mod source;

pub use glyph::{GlyphRun, Page};
pub use reconstruct::reconstruct;
pub use source::{load_dump, load_dump_bytes, ExtractError};
