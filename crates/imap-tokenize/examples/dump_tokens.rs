#![allow(clippy::uninlined_format_args)]
//! Example: Dump the token tree of captured server responses
//!
//! Reads raw server output (for example a protocol trace saved from a
//! session) from a file or stdin, splits it into responses, and prints
//! each response as a tree of values.
//!
//! ## Running
//!
//! ```bash
//! cargo run --package imap-tokenize --example dump_tokens -- trace.txt
//! printf '* 1 FETCH (UID 7)\r\n' | cargo run --package imap-tokenize --example dump_tokens
//! ```
//!
//! Pass `--strict` to stop at the first malformed response. Set `RUST_LOG`
//! (e.g. `RUST_LOG=imap_tokenize=trace`) to see tokenizer events.

use std::io::ErrorKind;

use anyhow::Context;
use imap_tokenize::{ResponseReader, Tokenizer, TokenizerConfig, Value};
use tokio::io::AsyncRead;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imap_tokenize=info,imap_stream=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut strict = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--strict" {
            strict = true;
        } else {
            path = Some(arg);
        }
    }

    let config = TokenizerConfig::builder().strict(strict).build();

    match path {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening {path}"))?;
            dump(file, config).await
        }
        None => dump(tokio::io::stdin(), config).await,
    }
}

async fn dump<S>(source: S, config: TokenizerConfig) -> anyhow::Result<()>
where
    S: AsyncRead + Unpin,
{
    let mut reader = ResponseReader::new(source);

    for index in 1.. {
        let mut tok = match Tokenizer::read_from(&mut reader, config).await {
            Ok(tok) => tok,
            Err(imap_tokenize::Error::Stream(imap_stream::Error::Io(e)))
                if e.kind() == ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e).context("reading response"),
        };

        let values = tok
            .collect_values()
            .with_context(|| format!("tokenizing response {index}"))?;

        println!("response {}:", index);
        for value in &values {
            print_tree(value, 1);
        }
    }

    Ok(())
}

fn print_tree(value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::List(items) => {
            println!("{pad}(");
            for item in items {
                print_tree(item, indent + 1);
            }
            println!("{pad})");
        }
        Value::Literal(data) => match std::str::from_utf8(data) {
            Ok(text) => println!("{pad}literal[{}] {:?}", data.len(), text),
            Err(_) => println!("{pad}literal[{}] <binary>", data.len()),
        },
        Value::String(s) => println!("{pad}{:?}", s),
        Value::Atom(_) | Value::Nil => println!("{pad}{value}"),
    }
}
