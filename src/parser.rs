//! # Chord-Sheet Parser
//!
//! Reads the plain-text song format:
//!
//! ```text
//! ---
//! title: Song title
//! author: Someone
//! ---
//! [V1]
//! .Em
//!  First line of lyrics,
//! .   C            B
//!  second line of lyrics
//! ```
//!
//! - `[label]` starts a section
//! - a line starting with `.` is a chord line; the symbols after the dot are split on whitespace
//! - a non-empty line right below a chord line is its lyric line
//! - the optional `---` block at the top is YAML metadata (`title`, `author`, `key`)
//!
//! Parsing never fails. A leading `---` block that is not a YAML mapping is read
//! as ordinary song text, so `---` also works as a separator. Any line that is
//! not a marker or chord line is kept as lyrics.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::BassistError;
use crate::key::Key;
use crate::song::{ChordLine, ChordToken, Line, LyricLine, ParsedSong, Section, Song};

const FRONT_MATTER_MARKER: &str = "---";

/// Raw metadata for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawMetadata {
    title: Option<String>,
    author: Option<String>,
    key: Option<String>,
}

/// Line-by-line parser state
struct Parser {
    sections: Vec<Section>,
    after_chord_line: bool,
    chords: Vec<String>,
    seen: HashSet<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            sections: Vec::new(),
            after_chord_line: false,
            chords: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Section receiving new lines; content before the first marker goes to an unlabeled section
    fn current_section(&mut self) -> &mut Section {
        if self.sections.is_empty() {
            self.sections.push(Section::default());
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    fn parse_line(&mut self, number: usize, line: &str) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            // Leading blank lines carry no structure
            if !self.sections.is_empty() {
                self.current_section().lines.push(Line::Blank);
            }
            self.after_chord_line = false;
            return;
        }

        if let Some(label) = section_label(trimmed) {
            log::debug!("Line {}: section [{}]", number, label);
            self.sections.push(Section::new(label));
            self.after_chord_line = false;
            return;
        }

        if trimmed.starts_with('.') {
            let chords = tokenize_chords(line);
            if chords.is_empty() {
                log::debug!("Line {}: chord line without chords", number);
            }
            for token in &chords {
                if self.seen.insert(token.symbol.clone()) {
                    self.chords.push(token.symbol.clone());
                }
            }
            self.current_section().lines.push(Line::Chord(ChordLine {
                number,
                raw: line.to_string(),
                chords,
            }));
            self.after_chord_line = true;
            return;
        }

        let paired = self.after_chord_line;
        self.current_section().lines.push(Line::Lyric(LyricLine {
            number,
            text: line.to_string(),
            paired,
        }));
        self.after_chord_line = false;
    }

    fn finish(self, metadata: RawMetadata) -> ParsedSong {
        let key = metadata.key.and_then(|k| match k.parse::<Key>() {
            Ok(key) => Some(key),
            Err(e) => {
                log::warn!("Ignoring key in front matter: {}", e);
                None
            }
        });

        ParsedSong {
            song: Song {
                title: metadata.title.unwrap_or_default(),
                author: metadata.author.unwrap_or_default(),
                key,
                sections: self.sections,
            },
            chords: self.chords,
        }
    }
}

/// Label of a `[label]` section marker
fn section_label(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

/// Split a chord line into symbols with their character columns.
///
/// The dot counts as a column so offsets line up with the lyric line below.
fn tokenize_chords(line: &str) -> Vec<ChordToken> {
    let mut tokens = Vec::new();
    let mut current: Option<ChordToken> = None;
    let mut dot_seen = false;

    for (column, c) in line.chars().enumerate() {
        let separator = c.is_whitespace() || (!dot_seen && c == '.');
        if c == '.' && !dot_seen {
            dot_seen = true;
        }
        if separator {
            if let Some(token) = current.take() {
                tokens.push(token);
            }
            continue;
        }
        match current.as_mut() {
            Some(token) => token.symbol.push(c),
            None => {
                current = Some(ChordToken {
                    symbol: c.to_string(),
                    offset: column,
                })
            }
        }
    }
    if let Some(token) = current {
        tokens.push(token);
    }
    tokens
}

/// Split off a leading `---` YAML block.
///
/// Returns the metadata, the remaining body and the number of lines consumed.
fn split_front_matter(source: &str) -> (RawMetadata, &str, usize) {
    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (RawMetadata::default(), source, 0);
    };
    if first.trim() != FRONT_MATTER_MARKER {
        return (RawMetadata::default(), source, 0);
    }

    let mut consumed = first.len();
    let mut yaml_end = None;
    let mut line_count = 1;
    for line in lines {
        line_count += 1;
        if line.trim() == FRONT_MATTER_MARKER {
            yaml_end = Some(consumed);
            consumed += line.len();
            break;
        }
        consumed += line.len();
    }

    let Some(yaml_end) = yaml_end else {
        log::warn!("Front matter is not closed with '---', reading it as song text");
        return (RawMetadata::default(), source, 0);
    };

    let yaml = &source[first.len()..yaml_end];
    if yaml.trim().is_empty() {
        return (RawMetadata::default(), &source[consumed..], line_count);
    }

    // Anything but a YAML mapping is a `---` separator inside the song
    let metadata = serde_yaml::from_str::<serde_yaml::Value>(yaml)
        .map_err(|e| e.to_string())
        .and_then(|value| {
            if value.is_mapping() {
                serde_yaml::from_value::<RawMetadata>(value).map_err(|e| e.to_string())
            } else {
                Err("not a YAML mapping".to_string())
            }
        });
    match metadata {
        Ok(metadata) => (metadata, &source[consumed..], line_count),
        Err(e) => {
            log::warn!("Block between '---' lines is not front matter ({}), reading it as song text", e);
            (RawMetadata::default(), source, 0)
        }
    }
}

/// Parse a chord sheet.
///
/// # Example
/// ```rust
/// use bassist::parse;
///
/// let parsed = parse("[V1]\n.Em\n line1\n.C B\n line2");
/// assert_eq!(parsed.song.sections.len(), 1);
/// assert_eq!(parsed.song.sections[0].label, "V1");
/// assert_eq!(parsed.chords, vec!["Em", "C", "B"]);
/// ```
pub fn parse(source: &str) -> ParsedSong {
    let (metadata, body, offset) = split_front_matter(source);
    let mut parser = Parser::new();

    for (i, line) in body.lines().enumerate() {
        parser.parse_line(offset + i + 1, line);
    }

    parser.finish(metadata)
}

/// Read and parse a chord sheet file
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedSong, BassistError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| BassistError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    log::debug!("Read chord sheet {}", path.display());
    Ok(parse(&source))
}
