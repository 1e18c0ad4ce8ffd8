//! # Key Detection and Scale Degrees
//!
//! ## Detection
//! The key is guessed from how often each chord occurs in the song:
//! 1. Only chords with a root and a known quality are counted.
//! 2. The most frequent plain major or minor triad is the tonic; its quality
//!    decides the mode. Ties go to the chord that appears first.
//! 3. If the song has no plain triads, the most frequent root is used instead,
//!    minor when that chord is built on a minor third.
//!
//! A song without any resolvable chord has no key.
//!
//! ## Scale Degrees
//! Degrees are measured in semitones from the tonic and matched against the
//! diatonic steps of the key:
//! - major: `0 2 4 5 7 9 11`
//! - natural minor: `0 2 3 5 7 8 10`
//!
//! The roman numeral is upper case for chords with a major third and lower case
//! for chords with a minor third, followed by `°`/`ø`/`+` and the extension:
//! `V7`, `ii`, `vii°`, `IVmaj7`. A root outside the scale is written relative to
//! a neighbouring degree (`bVII` in major keys, `#VI` in minor keys).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BassistError;
use crate::resolver::ResolvedChord;
use crate::theory::{Accidental, Mode, NoteName, PitchClass, Quality, Spelling};

const MAJOR_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_STEPS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];
const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Relative-major pitch classes of keys written with flats: F Bb Eb Ab Db
const FLAT_KEYS: [PitchClass; 5] = [5, 10, 3, 8, 1];

/// Musical key: tonic plus mode. Written as `E` or `Em`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
    pub tonic: NoteName,
    pub mode: Mode,
}

/// Position of a chord root within a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleDegree {
    /// Semitones above the tonic
    pub semitones: u8,
    /// Roman numeral with quality annotation, e.g. `V7`
    pub label: String,
    pub diatonic: bool,
}

impl fmt::Display for ScaleDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl Key {
    pub const fn new(tonic: NoteName, mode: Mode) -> Self {
        Self { tonic, mode }
    }

    const fn steps(&self) -> &'static [u8; 7] {
        match self.mode {
            Mode::Major => &MAJOR_STEPS,
            Mode::Minor => &MINOR_STEPS,
        }
    }

    /// Whether notes in this key are conventionally spelled with flats
    pub fn spelling(&self) -> Spelling {
        match self.tonic.accidental {
            Accidental::Flat => Spelling::Flats,
            Accidental::Sharp => Spelling::Sharps,
            Accidental::Natural => {
                let relative_major = match self.mode {
                    Mode::Major => self.tonic.pitch_class(),
                    Mode::Minor => (self.tonic.pitch_class() + 3) % 12,
                };
                if FLAT_KEYS.contains(&relative_major) {
                    Spelling::Flats
                } else {
                    Spelling::Sharps
                }
            }
        }
    }

    /// Scale degree of a chord with the given root and quality.
    ///
    /// ```
    /// use bassist::Key;
    /// use bassist::theory::Quality;
    ///
    /// let key: Key = "Em".parse().unwrap();
    /// let b7 = key.degree_of(11, Quality::Dominant7);
    /// assert_eq!(b7.label, "V7");
    /// assert!(b7.diatonic);
    /// ```
    pub fn degree_of(&self, root: PitchClass, quality: Quality) -> ScaleDegree {
        let semitones = (root + 12 - self.tonic.pitch_class()) % 12;
        let steps = self.steps();

        let (prefix, step, diatonic) = match steps.iter().position(|s| *s == semitones) {
            Some(step) => ("", step, true),
            None => match self.mode {
                // Every chromatic semitone has a diatonic neighbour on the relevant side
                Mode::Major => {
                    let above = (semitones + 1) % 12;
                    let step = steps.iter().position(|s| *s == above).unwrap_or(0);
                    ("b", step, false)
                }
                Mode::Minor => {
                    let below = (semitones + 11) % 12;
                    let step = steps.iter().position(|s| *s == below).unwrap_or(0);
                    ("#", step, false)
                }
            },
        };

        let numeral = if quality.has_minor_third() {
            NUMERALS[step].to_lowercase()
        } else {
            NUMERALS[step].to_string()
        };

        ScaleDegree {
            semitones,
            label: format!(
                "{}{}{}{}",
                prefix,
                numeral,
                quality.degree_mark(),
                quality.degree_extension()
            ),
            diatonic,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Major => write!(f, "{}", self.tonic),
            Mode::Minor => write!(f, "{}m", self.tonic),
        }
    }
}

impl FromStr for Key {
    type Err = BassistError;

    /// Parse `"E"`, `"Em"`, `"F#min"`, `"Bb major"` or `"C minor"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (tonic, rest) = NoteName::parse_prefix(trimmed)
            .ok_or_else(|| BassistError::InvalidKey(trimmed.to_string()))?;
        let mode = match rest.trim() {
            "" | "M" | "maj" | "major" => Mode::Major,
            "m" | "min" | "minor" => Mode::Minor,
            _ => return Err(BassistError::InvalidKey(trimmed.to_string())),
        };
        Ok(Self { tonic, mode })
    }
}

impl TryFrom<String> for Key {
    type Error = BassistError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

/// Running tally of one candidate, kept in first-occurrence order
struct Candidate {
    root: NoteName,
    mode: Mode,
    count: usize,
}

fn most_frequent(candidates: Vec<Candidate>) -> Option<Key> {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        // Strictly greater keeps the earlier candidate on ties
        if best.as_ref().map_or(true, |b| candidate.count > b.count) {
            best = Some(candidate);
        }
    }
    best.map(|c| Key::new(c.root, c.mode))
}

fn tally(candidates: &mut Vec<Candidate>, root: NoteName, mode: Mode) {
    let pitch = root.pitch_class();
    match candidates
        .iter_mut()
        .find(|c| c.root.pitch_class() == pitch && c.mode == mode)
    {
        Some(candidate) => candidate.count += 1,
        None => candidates.push(Candidate { root, mode, count: 1 }),
    }
}

/// Detect the key from every chord occurrence of a song, in song order.
///
/// ```
/// use bassist::key::detect_key;
/// use bassist::resolver::resolve;
///
/// let chords: Vec<_> = ["Em", "C", "B", "Am", "D", "B7", "F#", "F#7"]
///     .iter()
///     .map(|s| resolve(s))
///     .collect();
/// assert_eq!(detect_key(&chords).unwrap().to_string(), "Em");
/// ```
pub fn detect_key<'a>(chords: impl IntoIterator<Item = &'a ResolvedChord>) -> Option<Key> {
    let mut triads: Vec<Candidate> = Vec::new();
    let mut roots: Vec<Candidate> = Vec::new();

    for chord in chords {
        if !chord.is_resolved() {
            continue;
        }
        let Some(root) = chord.symbol.root else {
            continue;
        };
        if let Some(mode) = chord.quality.triad_mode() {
            tally(&mut triads, root, mode);
        }
        let mode = if chord.quality.has_minor_third() {
            Mode::Minor
        } else {
            Mode::Major
        };
        // Fallback tally counts roots only; the first chord seen on a root decides its mode
        match roots
            .iter_mut()
            .find(|c| c.root.pitch_class() == root.pitch_class())
        {
            Some(candidate) => candidate.count += 1,
            None => roots.push(Candidate { root, mode, count: 1 }),
        }
    }

    let key = most_frequent(triads).or_else(|| {
        log::debug!("No plain triads found, falling back to most frequent root");
        most_frequent(roots)
    });
    if let Some(key) = key {
        log::debug!("Detected key {}", key);
    }
    key
}
