//! Error types for the tokenizer.

use thiserror::Error;

/// Errors that can occur while tokenizing a response.
///
/// The tokenizer only reports [`Error::Malformed`] when configured as
/// strict; in lenient mode malformed input degrades to partial tokens and
/// end-of-stream sentinels.
#[derive(Debug, Error)]
pub enum Error {
    /// The response violates the token grammar.
    #[error("Malformed response at position {position}: {reason}")]
    Malformed {
        /// Byte position where the problem was detected.
        position: usize,
        /// Description of what went wrong.
        reason: String,
    },

    /// Reading the response from its source failed.
    #[error(transparent)]
    Stream(#[from] imap_stream::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
