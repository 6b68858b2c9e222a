//! Caller-facing configuration resolved once per parse.

use serde::{Deserialize, Serialize};

/// Options bag passed to every transition/action call of a parse.
///
/// Defaults are merged with caller overrides before `run` starts; plugins
/// never see a partially-populated bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Century prefix disambiguating two-digit years: "24" with prefix 20
    /// reads as 2024. Defaults to the 2000s.
    pub year_prefix: i32,
    /// Log every (state, line, next state) step through the `log` facade.
    /// Observability only; never affects the produced statement.
    pub trace: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            year_prefix: 20,
            trace: false,
        }
    }
}

impl ParseOptions {
    pub fn with_year_prefix(mut self, prefix: i32) -> Self {
        self.year_prefix = prefix;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
