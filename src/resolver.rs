//! Chord symbol parsing and resolution.
//!
//! Turns tokens like `Am`, `F#7` or `C/E` into a root, a quality and a set of
//! pitch classes. Resolution never fails: symbols that cannot be understood are
//! resolved as well as possible and carry a [`ChordFlag`].

use serde::{Deserialize, Serialize};

use crate::theory::{NoteName, PitchClass, Quality};

/// Annotation on a chord that could not be resolved cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChordFlag {
    /// The symbol does not start with a note letter A-G
    UnresolvedRoot,
    /// The suffix is not in the quality table; a major triad is assumed
    UnknownQuality,
    /// The root is outside the diatonic scale of the song's key
    Chromatic,
}

impl ChordFlag {
    /// Name as written in card files
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnresolvedRoot => "unresolved-root",
            Self::UnknownQuality => "unknown-quality",
            Self::Chromatic => "chromatic",
        }
    }
}

/// A chord symbol split into its parts
#[derive(Debug, Clone, PartialEq)]
pub struct ChordSymbol {
    pub raw: String,
    pub root: Option<NoteName>,
    pub suffix: String,
    /// Slash bass note, e.g. `E` in `C/E`
    pub bass: Option<NoteName>,
}

impl ChordSymbol {
    /// Split a chord token into root, suffix and slash bass.
    ///
    /// ```
    /// use bassist::resolver::ChordSymbol;
    ///
    /// let chord = ChordSymbol::parse("F#m7/E");
    /// assert_eq!(chord.root.unwrap().to_string(), "F#");
    /// assert_eq!(chord.suffix, "m7");
    /// assert_eq!(chord.bass.unwrap().to_string(), "E");
    /// ```
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        // Only treat the slash as a bass note when what follows is a note: `6/9` stays a suffix
        let (chord_part, bass) = match raw.split_once('/') {
            Some((chord, bass)) => match bass.trim().parse::<NoteName>() {
                Ok(note) => (chord, Some(note)),
                Err(_) => (raw, None),
            },
            None => (raw, None),
        };

        match NoteName::parse_prefix(chord_part) {
            Some((root, suffix)) => Self {
                raw: raw.to_string(),
                root: Some(root),
                suffix: suffix.trim().to_string(),
                bass,
            },
            None => {
                // Keep everything after the first character as the suffix
                let mut chars = chord_part.chars();
                chars.next();
                Self {
                    raw: raw.to_string(),
                    root: None,
                    suffix: chars.as_str().trim().to_string(),
                    bass,
                }
            }
        }
    }
}

/// A chord symbol resolved against the quality table
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChord {
    pub symbol: ChordSymbol,
    pub quality: Quality,
    /// Chord tones in interval order, slash bass appended when it is not a chord tone
    pub pitch_classes: Vec<PitchClass>,
    pub flags: Vec<ChordFlag>,
}

impl ResolvedChord {
    pub fn root_pitch(&self) -> Option<PitchClass> {
        self.symbol.root.map(NoteName::pitch_class)
    }

    /// Note sounded by the bass: the slash note if present, else the root
    pub fn bass_note(&self) -> Option<NoteName> {
        self.symbol.bass.or(self.symbol.root)
    }

    pub fn has_flag(&self, flag: ChordFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Root known and suffix found in the quality table
    pub fn is_resolved(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Resolve a chord symbol.
///
/// Unknown suffixes degrade to a major triad flagged [`ChordFlag::UnknownQuality`];
/// a symbol without a recognizable root is flagged [`ChordFlag::UnresolvedRoot`]
/// and has no pitch classes.
///
/// ```
/// use bassist::resolver::{resolve, ChordFlag};
/// use bassist::theory::Quality;
///
/// let am = resolve("Am");
/// assert_eq!(am.quality, Quality::Minor);
/// assert_eq!(am.pitch_classes, vec![9, 0, 4]); // A C E
///
/// let odd = resolve("Gmaj13#11");
/// assert_eq!(odd.quality, Quality::Major);
/// assert!(odd.has_flag(ChordFlag::UnknownQuality));
/// ```
pub fn resolve(raw: &str) -> ResolvedChord {
    let symbol = ChordSymbol::parse(raw);
    let mut flags = Vec::new();

    let quality = match Quality::from_suffix(&symbol.suffix) {
        Some(quality) => quality,
        None => {
            log::warn!("Unknown chord quality '{}' in '{}', assuming major", symbol.suffix, symbol.raw);
            flags.push(ChordFlag::UnknownQuality);
            Quality::Major
        }
    };

    let pitch_classes = match symbol.root {
        Some(root) => {
            let root = root.pitch_class();
            let mut pitches: Vec<PitchClass> = quality
                .intervals()
                .iter()
                .map(|interval| (root + interval) % 12)
                .collect();
            if let Some(bass) = symbol.bass.map(NoteName::pitch_class) {
                if !pitches.contains(&bass) {
                    pitches.push(bass);
                }
            }
            pitches
        }
        None => {
            log::warn!("Cannot find a root note in chord '{}'", symbol.raw);
            flags.insert(0, ChordFlag::UnresolvedRoot);
            vec![]
        }
    };

    ResolvedChord {
        symbol,
        quality,
        pitch_classes,
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_parsing() {
        // Major triad
        let c = resolve("C");
        assert_eq!(c.pitch_classes, vec![0, 4, 7]); // C E G
        assert!(c.is_resolved());

        // Minor with accidental
        let bbm = resolve("Bbm");
        assert_eq!(bbm.pitch_classes, vec![10, 1, 5]); // Bb Db F

        // Dominant seventh
        let b7 = resolve("B7");
        assert_eq!(b7.quality, Quality::Dominant7);
        assert_eq!(b7.pitch_classes, vec![11, 3, 6, 9]); // B D# F# A

        // Ninth wraps into the pitch-class range
        let d9 = resolve("D9");
        assert_eq!(d9.pitch_classes, vec![2, 6, 9, 0, 4]);
    }

    #[test]
    fn test_unknown_suffix_degrades_to_major() {
        let chord = resolve("Xmaj9x");
        assert_eq!(chord.quality, Quality::Major);
        assert!(chord.has_flag(ChordFlag::UnknownQuality));
        assert!(chord.has_flag(ChordFlag::UnresolvedRoot));
        assert!(chord.pitch_classes.is_empty());

        let chord = resolve("Emaj9x");
        assert_eq!(chord.quality, Quality::Major);
        assert_eq!(chord.flags, vec![ChordFlag::UnknownQuality]);
        assert_eq!(chord.pitch_classes, vec![4, 8, 11]);
    }

    #[test]
    fn test_slash_chords() {
        let chord = resolve("C/E");
        assert_eq!(chord.bass_note().unwrap().to_string(), "E");
        // E is already a chord tone
        assert_eq!(chord.pitch_classes, vec![0, 4, 7]);

        let chord = resolve("Am/G");
        assert_eq!(chord.pitch_classes, vec![9, 0, 4, 7]);

        // 6/9 is a suffix, not a slash chord
        let symbol = ChordSymbol::parse("C6/9");
        assert!(symbol.bass.is_none());
        assert_eq!(symbol.suffix, "6/9");
    }

    #[test]
    fn test_bass_note_defaults_to_root() {
        let chord = resolve("F#7");
        assert_eq!(chord.bass_note().unwrap().to_string(), "F#");
        assert_eq!(chord.root_pitch(), Some(6));
    }
}
