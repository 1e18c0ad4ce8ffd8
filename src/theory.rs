//! # Music Theory Tables
//!
//! Note names, pitch classes and the chord-quality table used by the resolver.
//!
//! ## Pitch Classes
//! Pitch classes are semitones above C, in `0..12`:
//! `C=0, C#/Db=1, D=2, D#/Eb=3, E=4, F=5, F#/Gb=6, G=7, G#/Ab=8, A=9, A#/Bb=10, B=11`.
//!
//! ## Chord Qualities
//! A chord suffix (`"m"`, `"7"`, `"maj7"`, ...) is looked up in [`QUALITY_TABLE`], a
//! static list of `(suffix, Quality)` pairs. Lookup is case-sensitive so that
//! `M7` (major seventh) and `m7` (minor seventh) stay distinct.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BassistError;

/// Semitones above C, always in `0..12`
pub type PitchClass = u8;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'F' => Some(Self::F),
            'G' => Some(Self::G),
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    /// Semitone offset from C
    pub const fn semitone(self) -> i8 {
        match self {
            Self::C => 0,
            Self::D => 2,
            Self::E => 4,
            Self::F => 5,
            Self::G => 7,
            Self::A => 9,
            Self::B => 11,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::A => 'A',
            Self::B => 'B',
        }
    }
}

/// Accidental written after a note letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    const fn offset(self) -> i8 {
        match self {
            Self::Natural => 0,
            Self::Sharp => 1,
            Self::Flat => -1,
        }
    }
}

/// A note as written in a chord symbol or key name, e.g. `F#` or `Bb`.
///
/// Serialized as its written form so card files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteName {
    pub letter: NoteLetter,
    pub accidental: Accidental,
}

impl NoteName {
    pub const fn new(letter: NoteLetter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    /// Parse a note at the start of `s`, returning the note and the unparsed rest.
    ///
    /// ```
    /// use bassist::theory::{NoteName, NoteLetter, Accidental};
    ///
    /// let (note, rest) = NoteName::parse_prefix("Bbm7").unwrap();
    /// assert_eq!(note, NoteName::new(NoteLetter::B, Accidental::Flat));
    /// assert_eq!(rest, "m7");
    /// assert!(NoteName::parse_prefix("Hm").is_none());
    /// ```
    pub fn parse_prefix(s: &str) -> Option<(Self, &str)> {
        let mut chars = s.chars();
        let letter = NoteLetter::from_char(chars.next()?)?;
        let rest = chars.as_str();

        let mut after = rest.chars();
        let (accidental, rest) = match after.next() {
            Some('#') | Some('♯') => (Accidental::Sharp, after.as_str()),
            Some('b') | Some('♭') => (Accidental::Flat, after.as_str()),
            _ => (Accidental::Natural, rest),
        };
        Some((Self { letter, accidental }, rest))
    }

    pub fn pitch_class(self) -> PitchClass {
        (self.letter.semitone() + self.accidental.offset()).rem_euclid(12) as PitchClass
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => write!(f, "#"),
            Accidental::Flat => write!(f, "b"),
        }
    }
}

impl FromStr for NoteName {
    type Err = BassistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse_prefix(s.trim()) {
            Some((note, "")) => Ok(note),
            _ => Err(BassistError::MalformedCards(format!("Invalid note name: {}", s))),
        }
    }
}

impl TryFrom<String> for NoteName {
    type Error = BassistError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteName> for String {
    fn from(note: NoteName) -> Self {
        note.to_string()
    }
}

/// Whether notes are written with sharps or flats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Sharps,
    Flats,
}

/// Name of a pitch class in the given spelling
pub fn spell(pitch_class: PitchClass, spelling: Spelling) -> &'static str {
    let index = (pitch_class % 12) as usize;
    match spelling {
        Spelling::Sharps => SHARP_NAMES[index],
        Spelling::Flats => FLAT_NAMES[index],
    }
}

/// Mode of a key or triad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// Chord quality, selected by the chord suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quality {
    Major,
    Minor,
    Power,
    Dominant7,
    Major7,
    Minor7,
    Diminished,
    Diminished7,
    HalfDiminished,
    Augmented,
    Sus2,
    Sus4,
    Dominant7Sus4,
    Major6,
    Minor6,
    Dominant9,
    Major9,
    Minor9,
    Add9,
}

/// Suffix → quality lookup table.
///
/// Several spellings map to the same quality, e.g. `m`, `min` and `-` are all minor.
pub static QUALITY_TABLE: &[(&str, Quality)] = &[
    ("", Quality::Major),
    ("maj", Quality::Major),
    ("M", Quality::Major),
    ("m", Quality::Minor),
    ("min", Quality::Minor),
    ("-", Quality::Minor),
    ("5", Quality::Power),
    ("7", Quality::Dominant7),
    ("maj7", Quality::Major7),
    ("M7", Quality::Major7),
    ("Maj7", Quality::Major7),
    ("m7", Quality::Minor7),
    ("min7", Quality::Minor7),
    ("-7", Quality::Minor7),
    ("dim", Quality::Diminished),
    ("°", Quality::Diminished),
    ("o", Quality::Diminished),
    ("dim7", Quality::Diminished7),
    ("°7", Quality::Diminished7),
    ("o7", Quality::Diminished7),
    ("m7b5", Quality::HalfDiminished),
    ("ø", Quality::HalfDiminished),
    ("aug", Quality::Augmented),
    ("+", Quality::Augmented),
    ("sus2", Quality::Sus2),
    ("sus4", Quality::Sus4),
    ("sus", Quality::Sus4),
    ("7sus4", Quality::Dominant7Sus4),
    ("7sus", Quality::Dominant7Sus4),
    ("6", Quality::Major6),
    ("m6", Quality::Minor6),
    ("9", Quality::Dominant9),
    ("maj9", Quality::Major9),
    ("M9", Quality::Major9),
    ("m9", Quality::Minor9),
    ("min9", Quality::Minor9),
    ("add9", Quality::Add9),
];

impl Quality {
    /// Look up a chord suffix in [`QUALITY_TABLE`]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        QUALITY_TABLE
            .iter()
            .find(|(name, _)| *name == suffix)
            .map(|(_, quality)| *quality)
    }

    /// Semitone offsets from the root
    pub const fn intervals(self) -> &'static [u8] {
        match self {
            Self::Major => &[0, 4, 7],
            Self::Minor => &[0, 3, 7],
            Self::Power => &[0, 7],
            Self::Dominant7 => &[0, 4, 7, 10],
            Self::Major7 => &[0, 4, 7, 11],
            Self::Minor7 => &[0, 3, 7, 10],
            Self::Diminished => &[0, 3, 6],
            Self::Diminished7 => &[0, 3, 6, 9],
            Self::HalfDiminished => &[0, 3, 6, 10],
            Self::Augmented => &[0, 4, 8],
            Self::Sus2 => &[0, 2, 7],
            Self::Sus4 => &[0, 5, 7],
            Self::Dominant7Sus4 => &[0, 5, 7, 10],
            Self::Major6 => &[0, 4, 7, 9],
            Self::Minor6 => &[0, 3, 7, 9],
            Self::Dominant9 => &[0, 4, 7, 10, 14],
            Self::Major9 => &[0, 4, 7, 11, 14],
            Self::Minor9 => &[0, 3, 7, 10, 14],
            Self::Add9 => &[0, 4, 7, 14],
        }
    }

    /// Mode when the chord is a plain major or minor triad, `None` otherwise
    pub const fn triad_mode(self) -> Option<Mode> {
        match self {
            Self::Major => Some(Mode::Major),
            Self::Minor => Some(Mode::Minor),
            _ => None,
        }
    }

    /// True when the chord is built on a minor third
    pub fn has_minor_third(self) -> bool {
        let intervals = self.intervals();
        intervals.contains(&3) && !intervals.contains(&4)
    }

    /// Symbol written after a roman numeral: `°`, `ø` or `+`
    pub const fn degree_mark(self) -> &'static str {
        match self {
            Self::Diminished | Self::Diminished7 => "°",
            Self::HalfDiminished => "ø",
            Self::Augmented => "+",
            _ => "",
        }
    }

    /// Extension written after the roman numeral and mark, e.g. `V7`, `IVmaj7`
    pub const fn degree_extension(self) -> &'static str {
        match self {
            Self::Major | Self::Minor | Self::Diminished | Self::Augmented => "",
            Self::Power => "5",
            Self::Dominant7 | Self::Minor7 | Self::Diminished7 | Self::HalfDiminished => "7",
            Self::Major7 => "maj7",
            Self::Sus2 => "sus2",
            Self::Sus4 => "sus4",
            Self::Dominant7Sus4 => "7sus4",
            Self::Major6 | Self::Minor6 => "6",
            Self::Dominant9 | Self::Minor9 => "9",
            Self::Major9 => "maj9",
            Self::Add9 => "add9",
        }
    }
}
