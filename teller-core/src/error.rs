//! Typed failures surfaced by the parse machine.

/// Fatal failure of one document's parse.
///
/// The driver never recovers a plugin failure; it cannot know whether
/// recovery is safe. Per-document isolation in a batch is the caller's
/// decision.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// A plugin's action failed on a specific line.
    #[error("format logic failed at line {line_no} in state {state}: {source}")]
    PluginLogic {
        /// Zero-based index into the reconstructed line sequence.
        line_no: usize,
        /// Debug rendering of the parser state at the failing line.
        state: String,
        #[source]
        source: anyhow::Error,
    },
}
