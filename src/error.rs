//! Error types for the search and highlight engine.
//!
//! Most failures inside a search session are logged and swallowed; these
//! variants are what the collaborators report and what the geometry codec
//! returns to callers.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while locating or measuring text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Per-page text extraction failed
    #[error("Text extraction failed for page {page}: {reason}")]
    Extraction {
        /// Page number (1-based) that failed
        page: u32,
        /// Reason reported by the text source
        reason: String,
    },

    /// A text range could not be measured
    #[error("Failed to measure fragment {fragment}: {reason}")]
    Measure {
        /// Fragment id within the page text layer
        fragment: usize,
        /// Reason reported by the measurer
        reason: String,
    },

    /// A run referenced a fragment the text layer does not own
    #[error("Fragment not found: {0}")]
    FragmentNotFound(usize),

    /// Zoom factor that cannot be divided by
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f64),

    /// Highlight serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
