//! Core data models for song title parsing.
//!
//! This module contains the token vocabulary shared by the scanner and the
//! parser, the parsed song record, parse options and batch statistics.

use serde::Serialize;
use std::fmt;

// ============================================================================
// Tokens
// ============================================================================

/// Token classes produced by the scanner.
/// The parser only ever looks at these, never at raw characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Maximal run of unreserved characters.
    Word,
    /// Single artist/title divider such as "-" or "•".
    Separator,
    /// Single opening bracket or quote.
    Open,
    /// Single closing bracket or quote.
    Close,
    /// Maximal run of whitespace.
    Space,
    /// Input exhausted. Always has an empty literal.
    End,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Word => "word",
            TokenKind::Separator => "sep",
            TokenKind::Open => "open",
            TokenKind::Close => "close",
            TokenKind::Space => "space",
            TokenKind::End => "end",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A classified slice of the input.
/// `literal` is the exact input text, so concatenating all literals in order
/// gives back the original string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub literal: &'a str,
    /// Byte offset of `literal` within the scanned input.
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, literal: &'a str, offset: usize) -> Self {
        Self {
            kind,
            literal,
            offset,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {:?}}}", self.kind, self.literal)
    }
}

// ============================================================================
// Song Records
// ============================================================================

/// Parsed song identity.
/// Unset artist or title are empty strings; tags keep input order and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Song {
    pub artist: String,
    pub title: String,
    pub tags: Vec<String>,
}

impl Song {
    pub fn has_artist(&self) -> bool {
        !self.artist.is_empty()
    }

    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)?;
        for tag in &self.tags {
            write!(f, "\n\t- {}", tag)?;
        }
        Ok(())
    }
}

/// Working record filled in by the parser.
/// Keeps "unset" distinct from "empty" so the promotion rule can tell a
/// missing title from a genuinely empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFields {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub tags: Vec<String>,
}

impl From<SongFields> for Song {
    fn from(fields: SongFields) -> Self {
        Song {
            artist: fields.artist.unwrap_or_default(),
            title: fields.title.unwrap_or_default(),
            tags: fields.tags,
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Knobs for the parser. The defaults keep every bracket pair as a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Record a tag for bracket pairs whose content is empty after `str::trim`.
    /// "Song ()" yields `[""]` when set and `[]` when not. A BOM (U+FEFF)
    /// splits tokens like whitespace but survives trimming, so "(\u{FEFF})"
    /// is not an empty tag.
    pub keep_empty_tags: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_empty_tags: true,
        }
    }
}

// ============================================================================
// Batch Statistics
// ============================================================================

/// Counters for a batch run of the CLI.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    pub total_inputs: usize,
    pub with_artist: usize,
    pub with_title: usize,
    pub empty_results: usize,
    pub total_tags: usize,

    /// Inputs that were not valid UTF-8 and were only parsed up to the bad byte.
    pub truncated_inputs: usize,

    // Timing
    pub elapsed_seconds: f64,
}

impl BatchStats {
    /// Fold one parsed song into the counters.
    pub fn record(&mut self, song: &Song) {
        self.total_inputs += 1;
        if song.has_artist() {
            self.with_artist += 1;
        }
        if song.has_title() {
            self.with_title += 1;
        }
        if !song.has_artist() && !song.has_title() && song.tags.is_empty() {
            self.empty_results += 1;
        }
        self.total_tags += song.tags.len();
    }

    /// Share of inputs where both artist and title were found, as a percentage.
    /// Artist is only ever set alongside a title, so `with_artist` counts those.
    pub fn split_rate(&self) -> f64 {
        if self.total_inputs == 0 {
            0.0
        } else {
            100.0 * self.with_artist as f64 / self.total_inputs as f64
        }
    }

    /// Log stats to stderr in JSON format
    pub fn log_phase(&self, phase: &str) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            eprintln!("[STATS:{}]\n{}", phase, json);
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_from_fields_collapses_unset() {
        let song: Song = SongFields {
            artist: None,
            title: Some("Everlong".to_string()),
            tags: vec!["CC".to_string()],
        }
        .into();
        assert_eq!(song.artist, "");
        assert_eq!(song.title, "Everlong");
        assert_eq!(song.tags, vec!["CC"]);
    }

    #[test]
    fn test_song_display() {
        let song = Song {
            artist: "Foo Fighters".to_string(),
            title: "Everlong".to_string(),
            tags: vec!["CC".to_string(), "Karaoke".to_string()],
        };
        assert_eq!(
            song.to_string(),
            "Foo Fighters - Everlong\n\t- CC\n\t- Karaoke"
        );
    }

    #[test]
    fn test_song_serializes_to_json() {
        let song = Song {
            artist: "The Beatles".to_string(),
            title: "Hey Jude".to_string(),
            tags: vec!["Karaoke".to_string()],
        };
        let json = serde_json::to_string(&song).unwrap();
        assert_eq!(
            json,
            r#"{"artist":"The Beatles","title":"Hey Jude","tags":["Karaoke"]}"#
        );
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Word, "Hey Jude", 0);
        assert_eq!(token.to_string(), r#"{word "Hey Jude"}"#);
        assert_eq!(Token::new(TokenKind::End, "", 8).to_string(), r#"{end ""}"#);
    }

    #[test]
    fn test_batch_stats_record() {
        let mut stats = BatchStats::default();
        stats.record(&Song {
            artist: "A".to_string(),
            title: "B".to_string(),
            tags: vec!["x".to_string(), "y".to_string()],
        });
        stats.record(&Song {
            artist: String::new(),
            title: "Solo".to_string(),
            tags: vec![],
        });
        stats.record(&Song::default());

        assert_eq!(stats.total_inputs, 3);
        assert_eq!(stats.with_artist, 1);
        assert_eq!(stats.with_title, 2);
        assert_eq!(stats.empty_results, 1);
        assert_eq!(stats.total_tags, 2);
        assert!((stats.split_rate() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_rate_empty_batch() {
        assert_eq!(BatchStats::default().split_rate(), 0.0);
    }
}
