//! Streaming tokenizer for IMAP server responses.
//!
//! The tokenizer reads one token per call from a [`Stream`], tracking how
//! many parenthesized lists are open. Callers ask for the next token *at a
//! level*: anything nested deeper than that level which the caller has not
//! read yet is skipped first, so a caller only ever sees tokens that belong
//! to its own list.
//!
//! # Grammar
//!
//! - Atoms end at a space, CR, LF or structural character.
//! - `"..."` is a quoted string; inside it a backslash takes the next byte
//!   verbatim. Outside quotes a backslash is ordinary atom text (`\Seen`).
//! - `{n}` (or `{n+}`) announces a literal: the line ending after the brace
//!   is skipped and exactly `n` raw bytes follow.
//! - `~` outside quotes is dropped (the literal8 marker).
//! - A three-byte atom equal to `NIL` in any case is [`Token::Nil`].
//! - A `)` directly after atom text is left for the next call, so `foo)`
//!   reads as the atom `foo` followed by the end of the list.

#![allow(clippy::missing_errors_doc)]

mod list;

pub use list::List;

use bytes::Bytes;
use imap_stream::{ResponseReader, Stream};
use tokio::io::AsyncRead;

use crate::{Error, ListHandle, Result, Token, TokenizerConfig, Value};

/// Pull-based tokenizer over one response.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stream: Stream,
    depth: usize,
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Creates a lenient tokenizer over `stream`.
    pub fn new(stream: impl Into<Stream>) -> Self {
        Self::with_config(stream, TokenizerConfig::default())
    }

    /// Creates a tokenizer with the given configuration.
    pub fn with_config(stream: impl Into<Stream>, config: TokenizerConfig) -> Self {
        Self {
            stream: stream.into(),
            depth: 0,
            config,
        }
    }

    /// Reads the next complete response from `reader` and tokenizes it.
    pub async fn read_from<S>(
        reader: &mut ResponseReader<S>,
        config: TokenizerConfig,
    ) -> Result<Self>
    where
        S: AsyncRead + Unpin,
    {
        let stream = reader.read_response().await?;
        Ok(Self::with_config(stream, config))
    }

    /// Number of lists currently open.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Current offset in the underlying stream.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.stream.tell()
    }

    /// Returns the underlying stream.
    #[must_use]
    pub const fn stream(&self) -> &Stream {
        &self.stream
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Consumes the tokenizer and returns the stream.
    #[must_use]
    pub fn into_stream(self) -> Stream {
        self.stream
    }

    /// Reads the next token at the outermost level.
    pub fn next_token(&mut self) -> Result<Token> {
        self.parse_next(0)
    }

    /// Reads the next token belonging to nesting level `level`.
    ///
    /// Unread contents of lists nested deeper than `level` are skipped.
    /// Returns [`Token::ListEnd`] when the list at `level` closes (or had
    /// already closed) and [`Token::EndOfStream`] when input runs out.
    pub fn parse_next(&mut self, level: usize) -> Result<Token> {
        if self.depth < level {
            return Ok(Token::ListEnd);
        }

        while self.depth > level {
            if self.scan(level)? == Token::EndOfStream {
                return Ok(Token::EndOfStream);
            }
        }

        self.scan(level)
    }

    /// Opens a view over the list identified by `handle`.
    pub fn list(&mut self, handle: ListHandle) -> List<'_> {
        List::new(self, handle)
    }

    /// Opens a view over the outermost level, starting at the current
    /// position.
    pub fn top_level(&mut self) -> List<'_> {
        let handle = ListHandle::new(0, self.stream.tell());
        List::new(self, handle)
    }

    /// Reads everything remaining at the outermost level into values.
    pub fn collect_values(&mut self) -> Result<Vec<Value>> {
        self.top_level().collect_values()
    }

    /// Moves the cursor back to a list's start and reopens it.
    pub(crate) fn reset_to(&mut self, handle: ListHandle) {
        self.stream.seek(handle.start());
        self.depth = handle.level();
    }

    /// Scans exactly one token from the cursor.
    fn scan(&mut self, level: usize) -> Result<Token> {
        let mut text = Vec::new();
        let mut in_quote = false;

        while let Some(c) = self.stream.getc() {
            if in_quote {
                match c {
                    b'\\' => {
                        if let Some(escaped) = self.stream.getc() {
                            text.push(escaped);
                        } else {
                            self.recover("dangling escape in quoted string")?;
                        }
                    }
                    b'"' => return Ok(Token::QuotedString(self.text(text)?)),
                    _ => text.push(c),
                }
                continue;
            }

            match c {
                b'"' => in_quote = true,
                b'(' | b'{' if !text.is_empty() => {
                    self.stream.seek_relative(-1);
                    break;
                }
                b'(' => return self.open_list(),
                b')' => {
                    if !text.is_empty() {
                        self.stream.seek_relative(-1);
                        break;
                    }
                    return self.close_list(level);
                }
                b'~' => {}
                b'{' => return self.literal(),
                b' ' | b'\r' | b'\n' => {
                    if !text.is_empty() {
                        break;
                    }
                }
                _ => text.push(c),
            }
        }

        if in_quote {
            self.recover("unterminated quoted string")?;
            return Ok(Token::QuotedString(self.text(text)?));
        }

        if text.is_empty() {
            return Ok(Token::EndOfStream);
        }

        if text.eq_ignore_ascii_case(b"NIL") {
            return Ok(Token::Nil);
        }

        Ok(Token::Atom(self.text(text)?))
    }

    fn open_list(&mut self) -> Result<Token> {
        if self.config.strict
            && self.config.max_depth.is_some_and(|max| self.depth >= max)
        {
            return Err(self.malformed(self.stream.tell() - 1, "list nesting too deep"));
        }

        self.depth += 1;
        tracing::trace!(depth = self.depth, "list opened");
        Ok(Token::ListStart(ListHandle::new(
            self.depth,
            self.stream.tell(),
        )))
    }

    fn close_list(&mut self, level: usize) -> Result<Token> {
        let Some(depth) = self.depth.checked_sub(1) else {
            // Depth never goes below zero
            self.recover_at(self.stream.tell() - 1, "unbalanced ')'")?;
            return Ok(Token::ListEnd);
        };

        tracing::trace!(depth, nested = self.depth != level, "list closed");
        self.depth = depth;
        Ok(Token::ListEnd)
    }

    /// Reads a literal whose opening `{` was just consumed.
    fn literal(&mut self) -> Result<Token> {
        let start = self.stream.tell() - 1;

        let Some(announced) = self.stream.get_to_char(b'}') else {
            self.recover_at(start, "unterminated literal announcement")?;
            return Ok(Token::EndOfStream);
        };

        let len = self.literal_length(start, &announced)?;

        let rest = self.stream.remaining();
        if rest.starts_with(b"\r\n") {
            self.stream.seek_relative(2);
        } else if rest.starts_with(b"\n") {
            self.stream.seek_relative(1);
        }

        let data = self.stream.read_exact(len);
        if data.len() < len {
            self.recover_at(start, "truncated literal")?;
        }

        tracing::trace!(len = data.len(), "literal");
        Ok(Token::Literal(data))
    }

    /// Parses the digits of `{n}` or `{n+}`.
    ///
    /// Leniently, a malformed length counts its leading digits, which is
    /// zero when there are none.
    fn literal_length(&self, start: usize, announced: &Bytes) -> Result<usize> {
        let digits = announced.strip_suffix(b"+").unwrap_or(&announced[..]);

        let parsed = if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            None
        } else {
            std::str::from_utf8(digits).ok().and_then(|s| s.parse().ok())
        };

        if let Some(len) = parsed {
            return Ok(len);
        }

        self.recover_at(start, "invalid literal length")?;
        Ok(digits
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .fold(0usize, |acc, &b| {
                acc.saturating_mul(10).saturating_add(usize::from(b - b'0'))
            }))
    }

    /// Converts scanned text, replacing invalid UTF-8 unless strict.
    fn text(&self, bytes: Vec<u8>) -> Result<String> {
        match String::from_utf8(bytes) {
            Ok(s) => Ok(s),
            Err(e) => {
                self.recover("invalid UTF-8")?;
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }

    fn recover(&self, reason: &str) -> Result<()> {
        self.recover_at(self.stream.tell(), reason)
    }

    /// Fails in strict mode; otherwise logs and lets the caller degrade.
    fn recover_at(&self, position: usize, reason: &str) -> Result<()> {
        if self.config.strict {
            return Err(self.malformed(position, reason));
        }
        tracing::debug!(position, reason, "recovering from malformed response");
        Ok(())
    }

    #[allow(clippy::unused_self)]
    fn malformed(&self, position: usize, reason: &str) -> Error {
        Error::Malformed {
            position,
            reason: reason.to_string(),
        }
    }
}
