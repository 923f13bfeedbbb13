//! Owned token trees.
//!
//! [`Value`] is the eager counterpart of the streaming [`Token`](crate::Token)
//! API: a whole list (or response) collected into memory. Useful when the
//! caller needs random access to the parts of a small response.

use std::{fmt, slice};

use bytes::Bytes;

/// A fully read token, with lists collected into vectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unquoted atom.
    Atom(String),
    /// Quoted string.
    String(String),
    /// Literal payload.
    Literal(Bytes),
    /// `NIL`.
    Nil,
    /// Parenthesized list.
    List(Vec<Value>),
}

impl Value {
    /// Returns the text of an atom, string, or UTF-8 literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Atom(s) | Self::String(s) => Some(s),
            Self::Literal(data) => std::str::from_utf8(data).ok(),
            Self::Nil | Self::List(_) => None,
        }
    }

    /// Returns the raw bytes of an atom, string, or literal.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Atom(s) | Self::String(s) => Some(s.as_bytes()),
            Self::Literal(data) => Some(data),
            Self::Nil | Self::List(_) => None,
        }
    }

    /// Returns the items of a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true for `NIL`.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Reads the value as an nstring: `NIL` or a string.
    ///
    /// Returns `Some(None)` for `NIL`, `Some(Some(text))` for a string-like
    /// value, and `None` for anything else.
    #[must_use]
    pub fn as_nstring(&self) -> Option<Option<&str>> {
        if self.is_nil() {
            return Some(None);
        }
        self.as_str().map(Some)
    }

    /// Writes the value in response syntax.
    ///
    /// Strings are quoted with `"` and `\` escaped; literals are written as
    /// `{n}` followed by CRLF and the payload.
    pub fn encode(&self, out: &mut Vec<u8>) {
        let mut open = Vec::new();
        self.encode_one(out, &mut open);

        while let Some((started, items)) = open.last_mut() {
            if let Some(item) = items.next() {
                if *started {
                    out.push(b' ');
                }
                *started = true;
                item.encode_one(out, &mut open);
            } else {
                out.push(b')');
                open.pop();
            }
        }
    }

    /// Writes a scalar, or opens a list and queues its items on `open`.
    fn encode_one<'a>(
        &'a self,
        out: &mut Vec<u8>,
        open: &mut Vec<(bool, slice::Iter<'a, Self>)>,
    ) {
        match self {
            Self::Atom(s) => out.extend_from_slice(s.as_bytes()),
            Self::String(s) => {
                out.push(b'"');
                for &b in s.as_bytes() {
                    if b == b'"' || b == b'\\' {
                        out.push(b'\\');
                    }
                    out.push(b);
                }
                out.push(b'"');
            }
            Self::Literal(data) => {
                out.extend_from_slice(format!("{{{}}}\r\n", data.len()).as_bytes());
                out.extend_from_slice(data);
            }
            Self::Nil => out.extend_from_slice(b"NIL"),
            Self::List(items) => {
                out.push(b'(');
                open.push((false, items.iter()));
            }
        }
    }

    /// Returns the value in response syntax.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

// Flattens nested lists so dropping a deep tree does not recurse.
impl Drop for Value {
    fn drop(&mut self) {
        if let Self::List(items) = self {
            let mut pending = std::mem::take(items);
            while let Some(mut value) = pending.pop() {
                if let Self::List(children) = &mut value {
                    pending.append(children);
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}
