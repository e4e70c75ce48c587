//! Character classification tables for the scanner.
//!
//! Every code point falls into exactly one class. Reserved characters live in
//! a single lookup map; anything missing from it is a word character.
//!
//! CRITICAL: These tables decide how every title is split. Keep them in sync
//! with the membership tests at the bottom of this file.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

// ============================================================================
// CLASSES
// ============================================================================

/// Lexical class of a single code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Separator,
    Space,
    Open,
    Close,
    Word,
}

// ============================================================================
// TABLES
// ============================================================================

/// Artist/title dividers: dashes, bullets, wave dashes, fullwidth and small
/// form punctuation.
pub const SEPARATORS: &[char] = &[
    '\u{2022}', // • bullet
    '\u{002D}', // - hyphen-minus
    '\u{2013}', // – en dash
    '\u{2014}', // — em dash
    '\u{2015}', // ― horizontal bar
    '\u{2012}', // ‒ figure dash
    '\u{2212}', // − minus sign
    '\u{02D7}', // ˗ modifier letter minus
    '\u{2043}', // ⁃ hyphen bullet
    '\u{223C}', // ∼ tilde operator
    '\u{223E}', // ∾ inverted lazy s
    '\u{223F}', // ∿ sine wave
    '\u{301C}', // 〜 wave dash
    '\u{3030}', // 〰 wavy dash
    '\u{FE4F}', // ﹏ wavy low line
    '\u{FE31}', // ︱ vertical em dash
    '\u{FE32}', // ︲ vertical en dash
    '\u{FE4D}', // ﹍ dashed low line
    '\u{FE4E}', // ﹎ centreline low line
    '\u{FE49}', // ﹉ dashed overline
    '\u{FE4A}', // ﹊ centreline overline
    '\u{FE4B}', // ﹋ wavy overline
    '\u{FE4C}', // ﹌ double wavy overline
    '\u{FF0B}', // ＋
    '\u{FF0D}', // －
    '\u{FF0F}', // ／
    '\u{FF3C}', // ＼
    '\u{FF1D}', // ＝
    '\u{FF3F}', // ＿
    '\u{FF5E}', // ～
    '\u{FF5C}', // ｜
    '\u{FFE8}', // halfwidth light vertical
    '\u{FFE9}', // halfwidth arrows
    '\u{FFEA}',
    '\u{FFEB}',
    '\u{FFEC}',
    '\u{FFED}', // halfwidth black square
    '\u{FFEE}', // halfwidth white circle
    '\u{FE62}', // small form variants
    '\u{FE63}',
    '\u{FE64}',
    '\u{FE65}',
    '\u{FE66}',
    '\u{FE68}',
    '\u{FE69}',
    '\u{FE6A}',
    '\u{FE6B}',
];

/// Opening brackets and quotes that start a tag.
pub const OPEN_BRACKETS: &[char] = &[
    '(', '[', '{', '<',
    '\u{00AB}', // «
    '\u{201C}', // “
    '\u{201E}', // „ (also listed as closing, opening wins)
    '\u{2039}', // ‹
    '\u{300C}', // 「
    '\u{300E}', // 『
    '\u{3008}', // 〈
    '\u{300A}', // 《
    '\u{3010}', // 【
    '\u{3014}', // 〔
    '\u{3016}', // 〖
    '\u{3018}', // 〘
    '\u{301A}', // 〚
    '\u{301D}', // 〝
    '\u{301F}', // 〟 (also listed as closing, opening wins)
    '\u{FE41}', // ﹁
    '\u{FE43}', // ﹃
    '\u{FF3B}', // ［
    '\u{FF5B}', // ｛
    '\u{FF5F}', // ｟
    '\u{FF62}', // ｢
];

/// Closing brackets and quotes that end a tag.
pub const CLOSE_BRACKETS: &[char] = &[
    ')', ']', '}', '>',
    '\u{00BB}', // »
    '\u{201D}', // ”
    '\u{201E}', // „
    '\u{203A}', // ›
    '\u{300D}', // 」
    '\u{300F}', // 』
    '\u{3009}', // 〉
    '\u{300B}', // 》
    '\u{3011}', // 】
    '\u{3015}', // 〕
    '\u{3017}', // 〗
    '\u{3019}', // 〙
    '\u{301B}', // 〛
    '\u{301E}', // 〞
    '\u{301F}', // 〟
    '\u{FE42}', // ﹂
    '\u{FE44}', // ﹄
    '\u{FF3D}', // ］
    '\u{FF5D}', // ｝
    '\u{FF60}', // ｠
    '\u{FF63}', // ｣
];

/// ASCII control whitespace, the Unicode space separators, line/paragraph
/// separators and the BOM.
pub const WHITESPACE: &[char] = &[
    ' ', '\t', '\n', '\u{000B}', '\u{000C}', '\r',
    '\u{0085}', // next line
    '\u{00A0}', // no-break space
    '\u{1680}', // ogham space mark
    '\u{2000}', '\u{2001}', '\u{2002}', '\u{2003}', '\u{2004}', '\u{2005}',
    '\u{2006}', '\u{2007}', '\u{2008}', '\u{2009}', '\u{200A}',
    '\u{2028}', // line separator
    '\u{2029}', // paragraph separator
    '\u{202F}', // narrow no-break space
    '\u{205F}', // medium mathematical space
    '\u{3000}', // ideographic space
    '\u{FEFF}', // zero width no-break space (BOM)
];

/// Reserved characters keyed to their class.
/// Filled in priority order (separator, space, open, close) and the first
/// class to claim a character keeps it.
static CLASS_TABLE: Lazy<FxHashMap<char, CharClass>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    let tables = [
        (SEPARATORS, CharClass::Separator),
        (WHITESPACE, CharClass::Space),
        (OPEN_BRACKETS, CharClass::Open),
        (CLOSE_BRACKETS, CharClass::Close),
    ];
    for (chars, class) in tables {
        for &c in chars {
            m.entry(c).or_insert(class);
        }
    }
    m
});

// ============================================================================
// LOOKUP
// ============================================================================

/// Classify a single code point.
pub fn classify(c: char) -> CharClass {
    CLASS_TABLE.get(&c).copied().unwrap_or(CharClass::Word)
}

/// True for characters that belong inside a word token.
pub fn is_unreserved(c: char) -> bool {
    classify(c) == CharClass::Word
}

// ============================================================================
// TESTS
// ============================================================================
