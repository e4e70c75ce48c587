//! Lexical scanner: splits a title string into classified tokens.
//!
//! The scanner is a lazy iterator. It reads one code point at a time, groups
//! runs of word and whitespace characters, emits reserved characters one per
//! token and finishes with a single `End` token.

use crate::charclass::{classify, CharClass};
use crate::models::{Token, TokenKind};
use crossbeam_channel::IntoIter;
use std::iter::FusedIterator;
use std::thread;
use tracing::debug;

/// Lazy token stream over one input string.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    halted_at: Option<usize>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            halted_at: None,
            finished: false,
        }
    }

    /// Scan raw bytes. Tokens cover the longest valid UTF-8 prefix; at the
    /// first undecodable sequence scanning stops without an `End` token.
    pub fn from_bytes(input: &'a [u8]) -> Self {
        match std::str::from_utf8(input) {
            Ok(text) => Self::new(text),
            Err(err) => {
                let valid = err.valid_up_to();
                let prefix = std::str::from_utf8(&input[..valid]).unwrap_or_default();
                Self {
                    halted_at: Some(valid),
                    ..Self::new(prefix)
                }
            }
        }
    }

    /// Byte offset of the undecodable sequence that stopped scanning, if any.
    pub fn halted_at(&self) -> Option<usize> {
        self.halted_at
    }

    /// Length in bytes of the run of `class` characters at the start of `rest`.
    fn run_length(rest: &str, class: CharClass) -> usize {
        rest.char_indices()
            .find(|&(_, c)| classify(c) != class)
            .map(|(i, _)| i)
            .unwrap_or(rest.len())
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }

        let rest = &self.input[self.pos..];
        let Some(first) = rest.chars().next() else {
            self.finished = true;
            if let Some(offset) = self.halted_at {
                debug!(offset, "scanner halted on invalid UTF-8");
                return None;
            }
            return Some(Token::new(TokenKind::End, "", self.pos));
        };

        let class = classify(first);
        let (kind, len) = match class {
            CharClass::Word => (TokenKind::Word, Self::run_length(rest, class)),
            CharClass::Space => (TokenKind::Space, Self::run_length(rest, class)),
            CharClass::Separator => (TokenKind::Separator, first.len_utf8()),
            CharClass::Open => (TokenKind::Open, first.len_utf8()),
            CharClass::Close => (TokenKind::Close, first.len_utf8()),
        };

        let token = Token::new(kind, &rest[..len], self.pos);
        self.pos += len;
        Some(token)
    }
}

impl FusedIterator for Scanner<'_> {}

/// Scan `input` lazily.
pub fn scan(input: &str) -> Scanner<'_> {
    Scanner::new(input)
}

/// Scan `input` into a token list, `End` token included.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Scanner::new(input).collect()
}

/// Run the scanner on a producer thread and hand `consume` the receiving end.
///
/// Tokens cross an unbuffered rendezvous channel, so the producer is never
/// more than one token ahead of the consumer. The sender is dropped whenever
/// the producer stops, and the producer stops as soon as the receiver is gone,
/// so neither side can be left waiting.
pub fn with_pipelined<'a, R>(input: &'a str, consume: impl FnOnce(IntoIter<Token<'a>>) -> R) -> R {
    let (tx, rx) = crossbeam_channel::bounded::<Token<'a>>(0);
    thread::scope(|s| {
        s.spawn(move || {
            for token in Scanner::new(input) {
                if tx.send(token).is_err() {
                    debug!("token consumer went away, stopping scanner");
                    break;
                }
            }
        });
        consume(rx.into_iter())
    })
}

/// Scan `input` on a producer thread and collect the tokens.
pub fn tokenize_pipelined(input: &str) -> Vec<Token<'_>> {
    with_pipelined(input, |tokens| tokens.collect())
}
