//! Positioned glyph runs as produced by a PDF text-extraction backend.

use serde::{Deserialize, Serialize};

/// One positioned run of text on a page.
///
/// Coordinates are PDF user space: x grows rightward, y grows upward. A run
/// whose coordinate was absent in the dump carries NaN and cannot be ordered,
/// so reconstruction excludes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    pub text: String,
    #[serde(default = "missing_coord")]
    pub x: f64,
    #[serde(default = "missing_coord")]
    pub y: f64,
}

impl GlyphRun {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

fn missing_coord() -> f64 {
    f64::NAN
}

/// All runs extracted from one page, in no particular order.
pub type Page = Vec<GlyphRun>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_coordinate_deserializes_as_nan() {
        let run: GlyphRun = serde_json::from_str(r#"{"text": "orphan", "x": 10.0}"#).unwrap();
        assert_eq!(run.x, 10.0);
        assert!(run.y.is_nan());
    }
}
