//! Token types produced by the tokenizer.

use bytes::Bytes;

/// One step of tokenizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unquoted text delimited by whitespace or structural characters.
    Atom(String),
    /// Quoted string, with backslash escapes resolved.
    QuotedString(String),
    /// Length-prefixed raw payload.
    Literal(Bytes),
    /// The `NIL` keyword, in any case.
    Nil,
    /// A parenthesized list was opened.
    ListStart(ListHandle),
    /// The list being read at the requested level was closed.
    ListEnd,
    /// No more input.
    EndOfStream,
}

impl Token {
    /// Returns true for [`Token::ListEnd`] and [`Token::EndOfStream`].
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self, Self::ListEnd | Self::EndOfStream)
    }

    /// Returns the text of an atom or quoted string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Atom(s) | Self::QuotedString(s) => Some(s),
            _ => None,
        }
    }
}

/// Position of an opened list within the response.
///
/// A handle is a plain `(level, start)` pair: the nesting level the list's
/// contents live at, and the stream offset just past its opening
/// parenthesis. It does not borrow the tokenizer; pass it to
/// [`Tokenizer::list`](crate::Tokenizer::list) or
/// [`List::enter`](crate::List::enter) to read the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListHandle {
    level: usize,
    start: usize,
}

impl ListHandle {
    pub(crate) const fn new(level: usize, start: usize) -> Self {
        Self { level, start }
    }

    /// Nesting level of the list's contents (1 for a top-level list).
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Stream offset just past the opening parenthesis.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }
}
