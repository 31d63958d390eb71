//! Error type for the host-facing boundary.
//!
//! The layout engine itself never fails: lookup misses, empty beam groups,
//! capacity underflow and staff truncation all degrade to a defined result.
//! Errors only come from decoding host input or from coordinates that do
//! not exist in the document.

/// Result alias carrying [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed JSON from the host.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("page {index} does not exist (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("staff {index} does not exist (page has {count} staves)")]
    StaffOutOfRange { index: usize, count: usize },

    #[error("beat {beat} is outside the staff grid of {total_beats} beats")]
    BeatOutOfRange { beat: u32, total_beats: u32 },

    /// Raised by a [`crate::export::PageSink`] implementation.
    #[error("export failed: {0}")]
    Export(String),
}

impl EngineError {
    pub fn export<T: Into<String>>(msg: T) -> Self {
        Self::Export(msg.into())
    }
}
