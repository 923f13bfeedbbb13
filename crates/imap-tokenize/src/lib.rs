//! # imap-tokenize
//!
//! A streaming tokenizer for IMAP server responses.
//!
//! The tokenizer turns the raw bytes of one response into atoms, quoted
//! strings, literals, `NIL` and nested lists, one token per call, without
//! building the whole tree up front. Lists are read through [`List`] views
//! that share the tokenizer's stream position; lists a caller does not
//! care about are skipped automatically.
//!
//! Only the generic token grammar is handled here. Tags, status responses
//! and the meaning of FETCH items belong to the layer above.
//!
//! ## Example
//!
//! ```
//! use imap_tokenize::{Token, Tokenizer};
//!
//! let mut tok = Tokenizer::new("* 1 FETCH (FLAGS (\\Seen) UID 42)\r\n");
//!
//! assert_eq!(tok.next_token().unwrap(), Token::Atom("*".into()));
//! assert_eq!(tok.next_token().unwrap(), Token::Atom("1".into()));
//! assert_eq!(tok.next_token().unwrap(), Token::Atom("FETCH".into()));
//!
//! let Token::ListStart(handle) = tok.next_token().unwrap() else {
//!     panic!("expected a list");
//! };
//! let mut items = tok.list(handle);
//! assert_eq!(items.next_token().unwrap(), Some(Token::Atom("FLAGS".into())));
//! // The flag list is skipped because it is never entered
//! assert!(matches!(items.next_token().unwrap(), Some(Token::ListStart(_))));
//! assert_eq!(items.next_token().unwrap(), Some(Token::Atom("UID".into())));
//! assert_eq!(items.next_token().unwrap(), Some(Token::Atom("42".into())));
//! assert_eq!(items.next_token().unwrap(), None);
//! ```
//!
//! ## Malformed input
//!
//! By default the tokenizer never fails: unterminated strings and
//! truncated literals come back as partial tokens followed by
//! [`Token::EndOfStream`]. [`TokenizerConfig::strict`] turns those cases
//! into [`Error::Malformed`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod token;
pub mod tokenizer;
mod value;

pub use config::{DEFAULT_MAX_VALUE_DEPTH, TokenizerConfig, TokenizerConfigBuilder};
pub use error::{Error, Result};
pub use token::{ListHandle, Token};
pub use tokenizer::{List, Tokenizer};
pub use value::Value;

pub use imap_stream::{ReaderConfig, ResponseReader, Stream};
