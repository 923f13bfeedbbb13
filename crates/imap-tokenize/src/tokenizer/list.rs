//! Views over parenthesized lists.

use crate::{ListHandle, Result, Token, Tokenizer, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotStarted,
    Streaming(usize),
    Exhausted,
}

/// A cursor over the tokens of one list.
///
/// The view borrows its tokenizer and shares the tokenizer's stream
/// position, so only one view can be read at a time. Nested lists are read
/// through [`List::enter`], which reborrows the same tokenizer; a nested
/// list that is not entered (or not read to the end) is skipped on the
/// next call to [`List::next_token`].
#[derive(Debug)]
pub struct List<'a> {
    tokenizer: &'a mut Tokenizer,
    handle: ListHandle,
    state: State,
}

impl<'a> List<'a> {
    pub(crate) fn new(tokenizer: &'a mut Tokenizer, handle: ListHandle) -> Self {
        Self {
            tokenizer,
            handle,
            state: State::NotStarted,
        }
    }

    /// Returns the handle this view was opened with.
    #[must_use]
    pub const fn handle(&self) -> ListHandle {
        self.handle
    }

    /// Zero-based index of the token most recently returned.
    ///
    /// `None` before the first token and once the list is exhausted.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self.state {
            State::Streaming(index) => Some(index),
            State::NotStarted | State::Exhausted => None,
        }
    }

    /// Returns true once the end of the list has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Reads the next token of this list.
    ///
    /// Returns `None` when the list closes or input runs out; further calls
    /// keep returning `None` until [`List::rewind`].
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if self.state == State::Exhausted {
            return Ok(None);
        }

        let token = self.tokenizer.parse_next(self.handle.level())?;
        if token.is_sentinel() {
            self.state = State::Exhausted;
            return Ok(None);
        }

        self.state = match self.state {
            State::Streaming(index) => State::Streaming(index + 1),
            State::NotStarted | State::Exhausted => State::Streaming(0),
        };
        Ok(Some(token))
    }

    /// Restarts the list from its first token and returns that token.
    ///
    /// The contents are parsed again from the stream.
    pub fn rewind(&mut self) -> Result<Option<Token>> {
        self.tokenizer.reset_to(self.handle);
        self.state = State::NotStarted;
        self.next_token()
    }

    /// Opens a nested list returned by this view.
    pub fn enter(&mut self, handle: ListHandle) -> List<'_> {
        List::new(self.tokenizer, handle)
    }

    /// Reads the rest of the list and joins the tokens with spaces.
    ///
    /// Nested lists are rendered in parentheses, `NIL` as `NIL`, and
    /// literals as (lossy) UTF-8. Meant for logs and debugging.
    pub fn drain_to_string(&mut self) -> Result<String> {
        let parts = self.fold(
            None,
            |token| match token {
                Token::Atom(s) | Token::QuotedString(s) => s,
                Token::Literal(data) => String::from_utf8_lossy(&data).into_owned(),
                Token::Nil => "NIL".to_string(),
                Token::ListStart(_) | Token::ListEnd | Token::EndOfStream => {
                    unreachable!("structural tokens are consumed by fold")
                }
            },
            |parts| format!("({})", parts.join(" ")),
        )?;

        Ok(parts.join(" "))
    }

    /// Reads the rest of the list into owned values.
    ///
    /// Lists nested deeper than
    /// [`TokenizerConfig::value_depth_limit`](crate::TokenizerConfig::value_depth_limit)
    /// are rejected in strict mode and left out in lenient mode.
    pub fn collect_values(&mut self) -> Result<Vec<Value>> {
        let limit = self.tokenizer.config().value_depth_limit();

        self.fold(
            Some(limit),
            |token| match token {
                Token::Atom(s) => Value::Atom(s),
                Token::QuotedString(s) => Value::String(s),
                Token::Literal(data) => Value::Literal(data),
                Token::Nil => Value::Nil,
                Token::ListStart(_) | Token::ListEnd | Token::EndOfStream => {
                    unreachable!("structural tokens are consumed by fold")
                }
            },
            Value::List,
        )
    }

    /// Reads the rest of the list depth-first, turning each data token into
    /// an item with `leaf` and each closed nested list into one with `close`.
    ///
    /// Nested lists are tracked on an explicit stack, so arbitrarily deep
    /// input does not grow the call stack.
    fn fold<T>(
        &mut self,
        max_level: Option<usize>,
        mut leaf: impl FnMut(Token) -> T,
        mut close: impl FnMut(Vec<T>) -> T,
    ) -> Result<Vec<T>> {
        // Items of the enclosing lists, innermost last
        let mut open: Vec<Vec<T>> = Vec::new();
        let mut items = Vec::new();

        loop {
            let token = if open.is_empty() {
                match self.next_token()? {
                    Some(token) => token,
                    None => break,
                }
            } else {
                let token = self.tokenizer.parse_next(self.handle.level() + open.len())?;
                if token.is_sentinel() {
                    if let Some(parent) = open.pop() {
                        let inner = std::mem::replace(&mut items, parent);
                        items.push(close(inner));
                    }
                    continue;
                }
                token
            };

            match token {
                Token::ListStart(handle) => {
                    if max_level.is_some_and(|max| handle.level() > max) {
                        let position = handle.start().saturating_sub(1);
                        self.tokenizer.recover_at(position, "list nesting too deep")?;
                        // Not entered, so the next read at this level skips it
                        continue;
                    }
                    open.push(std::mem::take(&mut items));
                }
                token => items.push(leaf(token)),
            }
        }

        Ok(items)
    }
}
