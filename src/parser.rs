//! Stream parser: turns a token stream into artist, title and tags.
//!
//! A small state machine that looks only at token kinds:
//!
//! - `Expression` skips separators, whitespace and stray closing brackets,
//!   and dispatches on the first word or opening bracket it finds.
//! - `BareWords` collects words and whitespace into a span. The first span
//!   becomes the title; the second moves that title to artist and takes its
//!   place. Later spans are dropped.
//! - `Tag` collects the words between an opening and a closing bracket.
//!   Anything else inside a bracket (end of input included) stops parsing and
//!   drops the unfinished tag.
//!
//! Tokens are pulled from the source only when needed, so the parser can run
//! behind a scanner on another thread.

use crate::models::{ParseOptions, SongFields, Token, TokenKind};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Expression,
    BareWords,
    Tag,
}

pub struct Parser<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    source: I,
    /// Every token pulled so far. Spans are slices of this buffer.
    tokens: Vec<Token<'a>>,
    pos: usize,
    /// Index of the first token of the pending span.
    start: usize,
    fields: SongFields,
    options: ParseOptions,
}

impl<'a, I> Parser<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    pub fn new(source: I, options: ParseOptions) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            pos: 0,
            start: 0,
            fields: SongFields::default(),
            options,
        }
    }

    /// Drive the state machine until it halts and return what was collected.
    pub fn run(mut self) -> SongFields {
        let mut state = Some(State::Expression);
        while let Some(current) = state {
            trace!(?current, pos = self.pos, "parser state");
            state = match current {
                State::Expression => self.parse_expression(),
                State::BareWords => self.parse_bare_words(),
                State::Tag => self.parse_tag(),
            };
        }
        self.fields
    }

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos == self.tokens.len() {
            let token = self.source.next()?;
            self.tokens.push(token);
        }
        let token = self.tokens[self.pos];
        self.pos += 1;
        Some(token)
    }

    fn backup(&mut self) {
        self.pos -= 1;
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn parse_expression(&mut self) -> Option<State> {
        while let Some(token) = self.next() {
            match token.kind {
                TokenKind::Word => return Some(State::BareWords),
                TokenKind::Open => return Some(State::Tag),
                TokenKind::Separator | TokenKind::Space | TokenKind::Close => self.ignore(),
                TokenKind::End => return None,
            }
        }
        None
    }

    fn parse_bare_words(&mut self) -> Option<State> {
        loop {
            match self.next().map(|t| t.kind) {
                Some(TokenKind::Word | TokenKind::Space) => continue,
                Some(_) => {
                    self.backup();
                    break;
                }
                None => break,
            }
        }

        let value = join_literals(&self.tokens[self.start..self.pos]);
        self.assign_bare_words(value);
        self.start = self.pos;
        Some(State::Expression)
    }

    fn parse_tag(&mut self) -> Option<State> {
        loop {
            let Some(token) = self.next() else {
                debug!(offset = self.tokens[self.start].offset, "token stream ended inside a tag");
                return None;
            };
            match token.kind {
                TokenKind::Word | TokenKind::Space => continue,
                TokenKind::Close => {
                    // Content strictly between the brackets
                    let value = join_literals(&self.tokens[self.start + 1..self.pos - 1]);
                    self.push_tag(value);
                    self.start = self.pos;
                    return Some(State::Expression);
                }
                kind => {
                    debug!(%kind, offset = token.offset, "unterminated tag, stopping");
                    return None;
                }
            }
        }
    }

    fn assign_bare_words(&mut self, value: String) {
        let fields = &mut self.fields;
        match (&fields.artist, &fields.title) {
            (None, None) => fields.title = Some(value),
            (None, Some(_)) => {
                fields.artist = fields.title.take();
                fields.title = Some(value);
            }
            _ => debug!(span = %value, "artist and title already set, dropping span"),
        }
    }

    fn push_tag(&mut self, value: String) {
        if value.is_empty() && !self.options.keep_empty_tags {
            trace!("skipping empty tag");
            return;
        }
        self.fields.tags.push(value);
    }
}

/// Concatenate token literals and trim the ends.
/// Inner whitespace is kept exactly as written.
pub fn join_literals(tokens: &[Token<'_>]) -> String {
    let joined: String = tokens.iter().map(|t| t.literal).collect();
    joined.trim().to_string()
}

/// Parse a token stream with the given options.
pub fn parse_tokens<'a>(
    tokens: impl IntoIterator<Item = Token<'a>>,
    options: &ParseOptions,
) -> SongFields {
    Parser::new(tokens.into_iter(), *options).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::tokenize;
    use pretty_assertions::assert_eq;

    fn tok(kind: TokenKind, literal: &str) -> Token<'_> {
        Token::new(kind, literal, 0)
    }

    fn fields(input: &str) -> SongFields {
        parse_tokens(tokenize(input), &ParseOptions::default())
    }

    #[test]
    fn test_no_tokens() {
        assert_eq!(parse_tokens(Vec::new(), &ParseOptions::default()), SongFields::default());
    }

    #[test]
    fn test_single_span_is_title() {
        let parsed = fields("Everlong");
        assert_eq!(parsed.title.as_deref(), Some("Everlong"));
        assert_eq!(parsed.artist, None);
    }

    #[test]
    fn test_second_span_promotes_first() {
        let parsed = fields("Foo Fighters - Everlong");
        assert_eq!(parsed.artist.as_deref(), Some("Foo Fighters"));
        assert_eq!(parsed.title.as_deref(), Some("Everlong"));
    }

    #[test]
    fn test_third_span_dropped() {
        let parsed = fields("A - B - C");
        assert_eq!(parsed.artist.as_deref(), Some("A"));
        assert_eq!(parsed.title.as_deref(), Some("B"));
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_close_bracket_splits_spans() {
        let parsed = fields("Artist) Title");
        assert_eq!(parsed.artist.as_deref(), Some("Artist"));
        assert_eq!(parsed.title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_tag_before_words() {
        let parsed = fields("[HD] Artist - Title");
        assert_eq!(parsed.tags, vec!["HD"]);
        assert_eq!(parsed.artist.as_deref(), Some("Artist"));
        assert_eq!(parsed.title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_tag_inner_whitespace_kept() {
        let parsed = fields("Song (  Live  at   Wembley )");
        assert_eq!(parsed.tags, vec!["Live  at   Wembley"]);
    }

    #[test]
    fn test_mismatched_bracket_pairs_still_close() {
        let parsed = fields("Song (Live] «Remix)");
        assert_eq!(parsed.tags, vec!["Live", "Remix"]);
    }

    #[test]
    fn test_empty_tag_kept_by_default() {
        let parsed = fields("Song () [ ]");
        assert_eq!(parsed.tags, vec!["", ""]);
    }

    #[test]
    fn test_empty_tag_dropped_when_configured() {
        let options = ParseOptions {
            keep_empty_tags: false,
        };
        let parsed = parse_tokens(tokenize("Song () [Live] [ ]"), &options);
        assert_eq!(parsed.tags, vec!["Live"]);
    }

    #[test]
    fn test_separator_inside_tag_halts() {
        let parsed = fields("A - B (x) [Official • 4K] (never)");
        assert_eq!(parsed.tags, vec!["x"]);
        assert_eq!(parsed.title.as_deref(), Some("B"));
    }

    #[test]
    fn test_nested_open_halts() {
        let parsed = fields("Title ((x))");
        assert_eq!(parsed.title.as_deref(), Some("Title"));
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_unterminated_tag_at_end_of_stream() {
        // No End token, as after a scanner halt
        let tokens = vec![
            tok(TokenKind::Word, "Song"),
            tok(TokenKind::Space, " "),
            tok(TokenKind::Open, "("),
            tok(TokenKind::Word, "Live"),
        ];
        let parsed = parse_tokens(tokens, &ParseOptions::default());
        assert_eq!(parsed.title.as_deref(), Some("Song"));
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_span_closed_by_end_of_stream() {
        let tokens = vec![
            tok(TokenKind::Word, "Artist"),
            tok(TokenKind::Separator, "-"),
            tok(TokenKind::Word, "Title"),
        ];
        let parsed = parse_tokens(tokens, &ParseOptions::default());
        assert_eq!(parsed.artist.as_deref(), Some("Artist"));
        assert_eq!(parsed.title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_parsing_stops_at_end_token() {
        let tokens = vec![
            tok(TokenKind::Word, "Title"),
            tok(TokenKind::End, ""),
            tok(TokenKind::Word, "ignored"),
        ];
        let parsed = parse_tokens(tokens, &ParseOptions::default());
        assert_eq!(parsed.title.as_deref(), Some("Title"));
        assert_eq!(parsed.artist, None);
    }

    #[test]
    fn test_source_not_drained_after_halt() {
        let mut tokens = tokenize("A (b - c) D E F").into_iter();
        let parsed = Parser::new(tokens.by_ref(), ParseOptions::default()).run();
        assert_eq!(parsed.title.as_deref(), Some("A"));
        // Halted on the separator; the rest is still unread
        assert_eq!(tokens.next().map(|t| t.literal), Some(" "));
    }

    #[test]
    fn test_join_literals_trims_ends_only() {
        let tokens = vec![
            tok(TokenKind::Space, "\u{00A0} "),
            tok(TokenKind::Word, "Hey"),
            tok(TokenKind::Space, "  "),
            tok(TokenKind::Word, "Jude"),
            tok(TokenKind::Space, "\u{3000}"),
        ];
        assert_eq!(join_literals(&tokens), "Hey  Jude");
        assert_eq!(join_literals(&[]), "");
    }
}
