//! # imap-stream
//!
//! Byte stream primitives for IMAP response parsing.
//!
//! - [`Stream`]: a seekable in-memory buffer with a read cursor. It supports
//!   the byte-level operations a tokenizer needs (read, peek, seek, tell,
//!   read exactly `n` bytes, read up to a delimiter).
//! - [`ResponseReader`]: frames raw server output from any
//!   [`tokio::io::AsyncRead`] into one [`Stream`] per response, pulling in
//!   literal payloads announced at line ends.
//!
//! ## Example
//!
//! ```
//! use imap_stream::Stream;
//!
//! let mut stream = Stream::from("{5}\r\nhello");
//! assert_eq!(stream.getc(), Some(b'{'));
//! let len = stream.get_to_char(b'}').unwrap();
//! assert_eq!(&len[..], b"5");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod reader;
mod stream;

pub use error::{Error, Result};
pub use reader::{ReaderConfig, ReaderConfigBuilder, ResponseReader};
pub use stream::Stream;
