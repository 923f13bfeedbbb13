//! Error types for the stream crate.

use thiserror::Error;

/// Errors that can occur while framing server output into streams.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading from the underlying connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response line exceeded the configured maximum length.
    #[error("line too long: more than {max} bytes")]
    LineTooLong {
        /// Configured limit.
        max: usize,
    },

    /// A literal announcement exceeded the configured maximum size.
    #[error("literal too large: {size} bytes (max {max})")]
    LiteralTooLarge {
        /// Announced literal size.
        size: usize,
        /// Configured limit.
        max: usize,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
