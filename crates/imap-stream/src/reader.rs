//! Framing of raw server output into response streams.
//!
//! A server response is one line, except that a line ending in a literal
//! announcement (`{n}`, `{n+}` or the literal8 form `~{n}`) is followed by
//! exactly `n` raw bytes and then the rest of the response on a further
//! line. [`ResponseReader`] collects all of it into a single [`Stream`].

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::{Error, Result, Stream};

/// Default buffer size for reading.
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Default maximum line length.
const DEFAULT_MAX_LINE_LENGTH: usize = 1024 * 1024; // 1 MB

/// Default maximum literal size.
const DEFAULT_MAX_LITERAL_SIZE: usize = 100 * 1024 * 1024; // 100 MB

/// Limits applied while reading responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Capacity of the read buffer. Zero selects the default.
    pub buffer_size: usize,
    /// Longest line accepted, including its line ending.
    pub max_line_length: usize,
    /// Largest literal accepted.
    pub max_literal_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_literal_size: DEFAULT_MAX_LITERAL_SIZE,
        }
    }
}

impl ReaderConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }
}

/// Builder for [`ReaderConfig`].
#[derive(Debug, Clone, Default)]
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Sets the read buffer capacity.
    #[must_use]
    pub const fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Sets the maximum line length.
    #[must_use]
    pub const fn max_line_length(mut self, max: usize) -> Self {
        self.config.max_line_length = max;
        self
    }

    /// Sets the maximum literal size.
    #[must_use]
    pub const fn max_literal_size(mut self, max: usize) -> Self {
        self.config.max_literal_size = max;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub const fn build(self) -> ReaderConfig {
        self.config
    }
}

/// Reads complete responses, literals included, from an async source.
pub struct ResponseReader<S> {
    reader: BufReader<S>,
    config: ReaderConfig,
}

impl<S> ResponseReader<S>
where
    S: AsyncRead + Unpin,
{
    /// Creates a reader with the default limits.
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Creates a reader with the given limits.
    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        // A zero-capacity buffer reports EOF on every line read
        let capacity = match config.buffer_size {
            0 => DEFAULT_BUFFER_SIZE,
            size => size,
        };
        Self {
            reader: BufReader::with_capacity(capacity, source),
            config,
        }
    }

    /// Returns the active limits.
    #[must_use]
    pub const fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Reads one complete response.
    ///
    /// The returned stream contains the raw bytes exactly as received,
    /// including line endings and literal payloads.
    pub async fn read_response(&mut self) -> Result<Stream> {
        let mut response = BytesMut::new();

        loop {
            let line = self.read_line().await?;
            response.extend_from_slice(&line);

            let Some(literal_len) = parse_literal_length(&line) else {
                break;
            };

            if literal_len > self.config.max_literal_size {
                return Err(Error::LiteralTooLarge {
                    size: literal_len,
                    max: self.config.max_literal_size,
                });
            }

            tracing::trace!(literal_len, "reading literal");

            // Zero-length literals carry no payload
            if literal_len == 0 {
                continue;
            }

            let start = response.len();
            response.resize(start + literal_len, 0);
            self.reader.read_exact(&mut response[start..]).await?;
        }

        Ok(Stream::from(response))
    }

    /// Reads a single line, up to and including its LF.
    async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                if line.is_empty() {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed",
                    )));
                }
                // Unterminated final line
                break;
            }

            if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&buf[..=pos]);
                self.reader.consume(pos + 1);
                break;
            }

            let len = buf.len();
            line.extend_from_slice(buf);
            self.reader.consume(len);

            if line.len() > self.config.max_line_length {
                return Err(Error::LineTooLong {
                    max: self.config.max_line_length,
                });
            }
        }

        if line.len() > self.config.max_line_length {
            return Err(Error::LineTooLong {
                max: self.config.max_line_length,
            });
        }

        tracing::trace!(len = line.len(), "read line");
        Ok(line)
    }

    /// Consumes the reader and returns the inner source.
    ///
    /// Note: Any buffered data will be lost.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

/// Parses a literal length from the end of a line.
///
/// Matches `{123}`, `{123+}` and `~{123}` followed by CRLF or a bare LF.
fn parse_literal_length(line: &[u8]) -> Option<usize> {
    let line = line.strip_suffix(b"\n")?;
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let line = line.strip_suffix(b"}")?;
    let line = line.strip_suffix(b"+").unwrap_or(line);

    let open = line.iter().rposition(|&b| b == b'{')?;
    let digits = &line[open + 1..];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    std::str::from_utf8(digits).ok()?.parse().ok()
}
