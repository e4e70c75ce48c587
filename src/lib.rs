//! Song title parsing - extracts artist, title and tags from free-form
//! strings such as file names and stream titles.
//!
//! ```
//! let song = songtitle::parse("The Beatles - Hey Jude (Karaoke)");
//! assert_eq!(song.artist, "The Beatles");
//! assert_eq!(song.title, "Hey Jude");
//! assert_eq!(song.tags, vec!["Karaoke"]);
//! ```

pub mod charclass;
pub mod models;
pub mod parser;
pub mod progress;
pub mod safety;
pub mod scanner;

pub use models::{ParseOptions, Song, Token, TokenKind};

use rayon::prelude::*;
use scanner::Scanner;

/// Parse one string with default options. Never fails; unparseable input
/// yields empty fields.
pub fn parse(input: &str) -> Song {
    parse_with(input, &ParseOptions::default())
}

pub fn parse_with(input: &str, options: &ParseOptions) -> Song {
    parser::parse_tokens(Scanner::new(input), options).into()
}

/// Parse raw bytes. Only the text before the first invalid UTF-8 sequence
/// is considered.
pub fn parse_bytes(input: &[u8]) -> Song {
    parse_bytes_with(input, &ParseOptions::default())
}

pub fn parse_bytes_with(input: &[u8], options: &ParseOptions) -> Song {
    parser::parse_tokens(Scanner::from_bytes(input), options).into()
}

/// Parse with the scanner running on its own thread, feeding the parser
/// through a rendezvous channel. Same result as [`parse_with`].
pub fn parse_pipelined(input: &str, options: &ParseOptions) -> Song {
    scanner::with_pipelined(input, |tokens| parser::parse_tokens(tokens, options)).into()
}

/// Parse many inputs in parallel. Output order matches input order.
pub fn parse_batch<S>(inputs: &[S], options: &ParseOptions) -> Vec<Song>
where
    S: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|input| parse_bytes_with(input.as_ref(), options))
        .collect()
}
