//! # Song Types
//!
//! This module defines the structure produced by the chord-sheet parser.
//!
//! ## Type Hierarchy
//! ```text
//! ParsedSong
//!   ├── Song
//!   │     ├── title, author, key (optional, from front matter)
//!   │     └── Vec<Section>
//!   │           ├── label ("V1", "Chorus", ...)
//!   │           └── Vec<Line>
//!   │                 ├── Chord(ChordLine)  -> Vec<ChordToken { symbol, offset }>
//!   │                 ├── Lyric(LyricLine)  -> text, paired with the chord line above?
//!   │                 └── Blank
//!   └── chords: distinct chord symbols in first-occurrence order
//! ```
//!
//! ## Chord Offsets
//! `ChordToken::offset` is the character column of the symbol in the raw chord
//! line, counting the leading dot as column 0. Lyric lines conventionally start
//! with a space in place of the dot, so the same column in the lyric line is the
//! syllable the chord belongs to.

use crate::key::Key;

/// One chord symbol on a chord line
#[derive(Debug, Clone, PartialEq)]
pub struct ChordToken {
    pub symbol: String,
    /// Character column in the whole raw line, dot included; not relative to the text after the dot
    pub offset: usize,
}

/// A dot-prefixed line of chord symbols
#[derive(Debug, Clone, PartialEq)]
pub struct ChordLine {
    pub number: usize, // 1-based line number in the source
    pub raw: String,
    pub chords: Vec<ChordToken>,
}

/// Any other non-empty line
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    pub number: usize,
    pub text: String,
    pub paired: bool, // directly below a chord line
}

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Chord(ChordLine),
    Lyric(LyricLine),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub label: String,
    pub lines: Vec<Line>,
}

impl Section {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            lines: Vec::new(),
        }
    }

    pub fn chord_lines(&self) -> impl Iterator<Item = &ChordLine> {
        self.lines.iter().filter_map(|line| match line {
            Line::Chord(chord_line) => Some(chord_line),
            _ => None,
        })
    }

    /// Chord lines with the lyric line printed under them, if any
    pub fn pairs(&self) -> Vec<(&ChordLine, Option<&LyricLine>)> {
        let mut pairs = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if let Line::Chord(chord_line) = line {
                let lyric = match self.lines.get(i + 1) {
                    Some(Line::Lyric(lyric)) if lyric.paired => Some(lyric),
                    _ => None,
                };
                pairs.push((chord_line, lyric));
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Song {
    pub title: String,
    pub author: String,
    pub key: Option<Key>,
    pub sections: Vec<Section>,
}

impl Song {
    /// Every chord occurrence in song order, with the label of its section
    pub fn chord_occurrences(&self) -> impl Iterator<Item = (&str, &ChordToken)> {
        self.sections.iter().flat_map(|section| {
            section
                .chord_lines()
                .flat_map(move |line| line.chords.iter().map(move |token| (section.label.as_str(), token)))
        })
    }
}

/// Parser output: the song plus its distinct chord symbols
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedSong {
    pub song: Song,
    pub chords: Vec<String>,
}
