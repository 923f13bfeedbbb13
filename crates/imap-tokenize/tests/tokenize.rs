//! Integration tests for the tokenizer.
//!
//! These run realistic server responses through the public API, including
//! responses framed by the async reader.

use bytes::Bytes;
use imap_tokenize::{
    List, ReaderConfig, ResponseReader, Token, Tokenizer, TokenizerConfig, Value,
};
use proptest::prelude::*;

fn atom(s: &str) -> Value {
    Value::Atom(s.to_string())
}

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

#[test]
fn test_fetch_response_values() {
    let input = "* 12 FETCH (FLAGS (\\Seen \\Answered) INTERNALDATE \"17-Jul-1996 02:44:25 -0700\" \
                 RFC822.SIZE 4286 BODY[HEADER.FIELDS (FROM)] {21}\r\nFrom: a@example.com\r\n)\r\n";
    let mut tok = Tokenizer::new(input);

    let values = tok.collect_values().unwrap();
    assert_eq!(
        values,
        vec![
            atom("*"),
            atom("12"),
            atom("FETCH"),
            Value::List(vec![
                atom("FLAGS"),
                Value::List(vec![atom("\\Seen"), atom("\\Answered")]),
                atom("INTERNALDATE"),
                string("17-Jul-1996 02:44:25 -0700"),
                atom("RFC822.SIZE"),
                atom("4286"),
                atom("BODY[HEADER.FIELDS"),
                Value::List(vec![atom("FROM")]),
                atom("]"),
                Value::Literal(Bytes::from_static(b"From: a@example.com\r\n")),
            ]),
        ]
    );
}

#[test]
fn test_envelope_with_nils() {
    let input = "(\"Wed, 17 Jul 1996\" \"IMAP4rev1 WG mtg summary\" \
                 ((\"Terry Gray\" NIL \"gray\" \"cac.washington.edu\")) NIL nil)";
    let mut tok = Tokenizer::new(input);

    let values = tok.collect_values().unwrap();
    let envelope = values[0].as_list().unwrap();

    assert_eq!(envelope[0].as_str(), Some("Wed, 17 Jul 1996"));
    let from = envelope[2].as_list().unwrap()[0].as_list().unwrap();
    assert_eq!(from[0].as_nstring(), Some(Some("Terry Gray")));
    assert_eq!(from[1].as_nstring(), Some(None));
    assert!(envelope[3].is_nil());
    assert!(envelope[4].is_nil());
}

#[test]
fn test_literal_hides_structure() {
    let mut tok = Tokenizer::new("(BODY[] {7}\r\n(\"x) {2\r\n) tail");

    let values = tok.collect_values().unwrap();
    assert_eq!(
        values,
        vec![
            Value::List(vec![
                atom("BODY[]"),
                Value::Literal(Bytes::from_static(b"(\"x) {2")),
            ]),
            atom("tail"),
        ]
    );
}

#[test]
fn test_selective_reading() {
    let mut tok = Tokenizer::new("* LIST (\\HasNoChildren \\Marked) \"/\" INBOX\r\n");

    let mut names = Vec::new();
    loop {
        let token = tok.next_token().unwrap();
        if let Some(name) = token.as_str() {
            names.push(name.to_string());
            continue;
        }
        match token {
            // Attribute list is skipped without being entered
            Token::ListStart(_) => {}
            Token::EndOfStream => break,
            other => panic!("unexpected {other:?}"),
        }
    }

    assert_eq!(names, vec!["*", "LIST", "/", "INBOX"]);
}

/// Records a token, descending into nested lists.
fn record(list: &mut List<'_>, token: Token, out: &mut Vec<String>) {
    if let Token::ListStart(handle) = token {
        out.push("(".to_string());
        record_rest(&mut list.enter(handle), out);
        out.push(")".to_string());
    } else {
        out.push(format!("{token:?}"));
    }
}

fn record_rest(list: &mut List<'_>, out: &mut Vec<String>) {
    while let Some(token) = list.next_token().unwrap() {
        record(list, token, out);
    }
}

/// Drains a list, rewinds it, and drains it again.
fn drain_twice(list: &mut List<'_>) -> (Vec<String>, Vec<String>) {
    let mut first = Vec::new();
    record_rest(list, &mut first);

    let mut second = Vec::new();
    if let Some(token) = list.rewind().unwrap() {
        record(list, token, &mut second);
        record_rest(list, &mut second);
    }
    (first, second)
}

#[test]
fn test_rewind_repeats_sequence() {
    let mut tok = Tokenizer::new("(a (b {2}\r\nc)) \"d\" NIL) tail");
    let Token::ListStart(handle) = tok.next_token().unwrap() else {
        panic!("expected list");
    };

    let (first, second) = drain_twice(&mut tok.list(handle));
    assert_eq!(first.len(), 7);
    assert_eq!(first, second);
    assert_eq!(tok.next_token().unwrap(), Token::Atom("tail".to_string()));
}

#[test]
fn test_rewind_returns_first_token() {
    let mut tok = Tokenizer::new("(a b c)");
    let Token::ListStart(handle) = tok.next_token().unwrap() else {
        panic!("expected list");
    };
    let mut list = tok.list(handle);

    assert_eq!(list.drain_to_string().unwrap(), "a b c");
    assert_eq!(list.rewind().unwrap(), Some(Token::Atom("a".to_string())));
    assert_eq!(list.drain_to_string().unwrap(), "b c");
}

#[test]
fn test_strict_mode_rejects_truncated_literal() {
    let mut tok = Tokenizer::with_config("(BODY {10}\r\nabc", TokenizerConfig::strict());

    let err = tok.collect_values().unwrap_err();
    assert!(err.to_string().contains("truncated literal"));
}

#[tokio::test]
async fn test_read_from_reader() {
    use tokio_test::io::Builder;

    let mock = Builder::new()
        .read(b"* 1 FETCH (UID 7 BODY[] {5}\r\n")
        .read(b"hello)\r\n")
        .read(b"* 2 EXISTS\r\n")
        .build();
    let mut reader = ResponseReader::new(mock);

    let mut first = Tokenizer::read_from(&mut reader, TokenizerConfig::strict())
        .await
        .unwrap();
    assert_eq!(
        first.collect_values().unwrap(),
        vec![
            atom("*"),
            atom("1"),
            atom("FETCH"),
            Value::List(vec![
                atom("UID"),
                atom("7"),
                atom("BODY[]"),
                Value::Literal(Bytes::from_static(b"hello")),
            ]),
        ]
    );

    let mut second = Tokenizer::read_from(&mut reader, TokenizerConfig::default())
        .await
        .unwrap();
    assert_eq!(
        second.collect_values().unwrap(),
        vec![atom("*"), atom("2"), atom("EXISTS")]
    );
}

#[tokio::test]
async fn test_reader_error_propagates() {
    use tokio_test::io::Builder;

    let config = ReaderConfig::builder().max_literal_size(4).build();
    let mock = Builder::new().read(b"* 1 FETCH (BODY[] {5}\r\n").build();
    let mut reader = ResponseReader::with_config(mock, config);

    let err = Tokenizer::read_from(&mut reader, TokenizerConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, imap_tokenize::Error::Stream(_)));
}

fn arb_atom() -> impl Strategy<Value = Value> {
    "[A-Za-z0-9.\\\\\\[\\]<>:-]{1,10}"
        .prop_filter("NIL is not an atom", |s| !s.eq_ignore_ascii_case("NIL"))
        .prop_map(Value::Atom)
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        arb_atom(),
        "[ -~]{0,12}".prop_map(Value::String),
        proptest::collection::vec(any::<u8>(), 0..24)
            .prop_map(|data| Value::Literal(Bytes::from(data))),
        Just(Value::Nil),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        proptest::collection::vec(inner, 0..6).prop_map(Value::List)
    })
}

fn encode(values: &[Value]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(b' ');
        }
        value.encode(&mut out);
    }
    out.extend_from_slice(b"\r\n");
    out
}

proptest! {
    #[test]
    fn values_survive_tokenizing(values in proptest::collection::vec(arb_value(), 0..6)) {
        let mut tok = Tokenizer::with_config(encode(&values), TokenizerConfig::strict());

        prop_assert_eq!(tok.collect_values().unwrap(), values);
        prop_assert_eq!(tok.depth(), 0);
    }

    #[test]
    fn rewind_is_idempotent(items in proptest::collection::vec(arb_value(), 0..6)) {
        let input = Value::List(items).to_bytes();
        let mut tok = Tokenizer::new(input);
        let Token::ListStart(handle) = tok.next_token().unwrap() else {
            panic!("expected list");
        };

        let (first, second) = drain_twice(&mut tok.list(handle));
        prop_assert_eq!(first, second);
        prop_assert_eq!(tok.depth(), 0);
    }

    #[test]
    fn atoms_tokenize_to_themselves(text in "[A-Za-z0-9.\\\\:-]{1,16}") {
        let mut tok = Tokenizer::new(format!("{text} ").as_str());
        let token = tok.next_token().unwrap();

        if text.eq_ignore_ascii_case("NIL") {
            prop_assert_eq!(token, Token::Nil);
        } else {
            prop_assert_eq!(token, Token::Atom(text));
        }
    }

    #[test]
    fn literal_payload_is_verbatim(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut input = format!("{{{}}}\r\n", data.len()).into_bytes();
        input.extend_from_slice(&data);
        let mut tok = Tokenizer::new(input);

        prop_assert_eq!(tok.next_token().unwrap(), Token::Literal(Bytes::from(data)));
        prop_assert_eq!(tok.next_token().unwrap(), Token::EndOfStream);
    }
}
