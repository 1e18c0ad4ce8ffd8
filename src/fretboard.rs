//! # Bass Fretboard
//!
//! Tunings for 4- and 5-string basses, the lowest-fret position search, and the
//! small fret-window diagrams printed on each card.
//!
//! Strings are indexed from the highest to the lowest pitch, the way bass
//! diagrams are drawn:
//!
//! ```text
//! index  4-string  5-string
//!   0      G2        G2
//!   1      D2        D2
//!   2      A1        A1
//!   3      E1        E1
//!   4      -         B0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::BassistError;
use crate::theory::{spell, PitchClass, Spelling};

/// Highest fret searched for positions
pub const MAX_FRET: u8 = 12;

/// Frets shown in a diagram unless configured otherwise
pub const DEFAULT_DIAGRAM_FRETS: u8 = 5;

/// An open string: display name and MIDI note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenString {
    pub name: &'static str,
    pub midi: u8,
}

impl OpenString {
    pub const fn pitch_class(self) -> PitchClass {
        self.midi % 12
    }
}

const FOUR_STRING: [OpenString; 4] = [
    OpenString { name: "G", midi: 43 },
    OpenString { name: "D", midi: 38 },
    OpenString { name: "A", midi: 33 },
    OpenString { name: "E", midi: 28 },
];

const FIVE_STRING: [OpenString; 5] = [
    OpenString { name: "G", midi: 43 },
    OpenString { name: "D", midi: 38 },
    OpenString { name: "A", midi: 33 },
    OpenString { name: "E", midi: 28 },
    OpenString { name: "B", midi: 23 },
];

/// Supported bass variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Instrument {
    #[default]
    #[serde(rename = "4-string")]
    FourString,
    #[serde(rename = "5-string")]
    FiveString,
}

impl Instrument {
    pub const ALL: [Instrument; 2] = [Instrument::FourString, Instrument::FiveString];

    pub const fn from_string_count(count: u8) -> Option<Self> {
        match count {
            4 => Some(Self::FourString),
            5 => Some(Self::FiveString),
            _ => None,
        }
    }

    pub const fn string_count(self) -> u8 {
        match self {
            Self::FourString => 4,
            Self::FiveString => 5,
        }
    }

    pub const fn tuning(self) -> &'static [OpenString] {
        match self {
            Self::FourString => &FOUR_STRING,
            Self::FiveString => &FIVE_STRING,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-string", self.string_count())
    }
}

impl FromStr for Instrument {
    type Err = BassistError;

    /// Accepts `4`, `5`, `4-string` or `5-string`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.trim().trim_end_matches("-string");
        count
            .parse::<u8>()
            .ok()
            .and_then(Self::from_string_count)
            .ok_or_else(|| BassistError::ConfigError(format!("unsupported bass type '{}', expected 4 or 5 strings", s)))
    }
}

/// A string and fret; ordered by string, then fret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FretPosition {
    pub string: u8,
    pub fret: u8,
}

/// Lowest fret in `0..=MAX_FRET` on a string that sounds the pitch class
pub fn lowest_fret(open: OpenString, pitch_class: PitchClass) -> Option<u8> {
    (0..=MAX_FRET).find(|fret| (open.pitch_class() + fret) % 12 == pitch_class % 12)
}

/// Lowest-fret position of every pitch class on every string.
///
/// ```
/// use bassist::fretboard::{positions, FretPosition, Instrument};
///
/// // E on a 4-string bass: fret 9 on G, 2 on D, 7 on A, open E
/// let e = positions(&[4], Instrument::FourString);
/// let expected = [(0, 9), (1, 2), (2, 7), (3, 0)]
///     .map(|(string, fret)| FretPosition { string, fret });
/// assert!(e.iter().eq(expected.iter()));
/// ```
pub fn positions(pitch_classes: &[PitchClass], instrument: Instrument) -> BTreeSet<FretPosition> {
    let mut found = BTreeSet::new();
    for &pitch in pitch_classes {
        for (string, open) in instrument.tuning().iter().enumerate() {
            if let Some(fret) = lowest_fret(*open, pitch) {
                found.insert(FretPosition {
                    string: string as u8,
                    fret,
                });
            }
        }
    }
    found
}

/// How a diagram cell is marked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// `B` for the bass note, `X` for other chord tones
    #[default]
    Standard,
    /// Note names for every chord tone
    Educational,
}

impl FromStr for DisplayMode {
    type Err = BassistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "educational" => Ok(Self::Educational),
            other => Err(BassistError::ConfigError(format!(
                "unknown display mode '{}', expected 'standard' or 'educational'",
                other
            ))),
        }
    }
}

/// Role of the note under a diagram cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRole {
    Bass,
    Chord,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramCell {
    pub fret: u8,
    pub role: NoteRole,
    pub note: &'static str,
}

impl DiagramCell {
    /// Text shown in the cell for the given display mode
    pub fn marker(&self, mode: DisplayMode) -> &'static str {
        match (self.role, mode) {
            (NoteRole::Other, _) => ".",
            (NoteRole::Bass, DisplayMode::Standard) => "B",
            (NoteRole::Chord, DisplayMode::Standard) => "X",
            (_, DisplayMode::Educational) => self.note,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramRow {
    pub string_name: &'static str,
    pub cells: Vec<DiagramCell>,
}

/// Fret window `0..=frets` for every string, top row is the highest string.
/// `frets` is capped at [`MAX_FRET`].
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub frets: u8,
    pub rows: Vec<DiagramRow>,
}

impl Diagram {
    pub fn build(
        instrument: Instrument,
        pitch_classes: &[PitchClass],
        bass: Option<PitchClass>,
        spelling: Spelling,
        frets: u8,
    ) -> Self {
        // The diagram never extends past the searched fret range
        let frets = frets.min(MAX_FRET);
        let rows = instrument
            .tuning()
            .iter()
            .map(|open| DiagramRow {
                string_name: open.name,
                cells: (0..=frets)
                    .map(|fret| {
                        let pitch = (open.pitch_class() + fret) % 12;
                        let role = if Some(pitch) == bass {
                            NoteRole::Bass
                        } else if pitch_classes.contains(&pitch) {
                            NoteRole::Chord
                        } else {
                            NoteRole::Other
                        };
                        DiagramCell {
                            fret,
                            role,
                            note: spell(pitch, spelling),
                        }
                    })
                    .collect(),
            })
            .collect();
        Self { frets, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(set: &BTreeSet<FretPosition>) -> Vec<(u8, u8)> {
        set.iter().map(|p| (p.string, p.fret)).collect()
    }

    #[test]
    fn test_open_string_pitch_classes() {
        let four: Vec<_> = Instrument::FourString.tuning().iter().map(|s| s.pitch_class()).collect();
        assert_eq!(four, vec![7, 2, 9, 4]); // G D A E
        assert_eq!(Instrument::FiveString.tuning()[4].pitch_class(), 11); // low B
    }

    #[test]
    fn test_e_minor_positions() {
        // E G B
        let found = positions(&[4, 7, 11], Instrument::FourString);
        assert_eq!(
            pairs(&found),
            vec![
                (0, 0), (0, 4), (0, 9),   // G string: G, B, E
                (1, 2), (1, 5), (1, 9),   // D string: E, G, B
                (2, 2), (2, 7), (2, 10),  // A string: B, E, G
                (3, 0), (3, 3), (3, 7),   // E string: E, G, B
            ]
        );
    }

    #[test]
    fn test_five_string_adds_low_b_positions() {
        let four = positions(&[11], Instrument::FourString);
        let five = positions(&[11], Instrument::FiveString);
        assert_eq!(five.len(), four.len() + 1);
        assert!(five.contains(&FretPosition { string: 4, fret: 0 }));
    }

    #[test]
    fn test_positions_are_deterministic_and_deduplicated() {
        let first = positions(&[0, 4, 7, 0], Instrument::FiveString);
        let second = positions(&[0, 4, 7], Instrument::FiveString);
        assert_eq!(first, second);
        assert_eq!(first.len(), 15);
    }

    #[test]
    fn test_positions_stay_within_fret_range() {
        for pitch in 0..12 {
            for instrument in Instrument::ALL {
                assert!(positions(&[pitch], instrument).iter().all(|p| p.fret <= MAX_FRET));
            }
        }
    }

    #[test]
    fn test_instrument_parsing() {
        assert_eq!("4".parse::<Instrument>().unwrap(), Instrument::FourString);
        assert_eq!("5-string".parse::<Instrument>().unwrap(), Instrument::FiveString);
        assert!("6".parse::<Instrument>().is_err());
        assert_eq!(Instrument::FiveString.to_string(), "5-string");
    }

    #[test]
    fn test_diagram_roles() {
        // C/E: bass E, chord tones C E G
        let diagram = Diagram::build(Instrument::FourString, &[0, 4, 7], Some(4), Spelling::Sharps, 5);
        assert_eq!(diagram.rows.len(), 4);
        assert!(diagram.rows.iter().all(|row| row.cells.len() == 6));

        let e_string = &diagram.rows[3];
        assert_eq!(e_string.string_name, "E");
        assert_eq!(e_string.cells[0].role, NoteRole::Bass); // open E
        assert_eq!(e_string.cells[1].role, NoteRole::Other); // F
        assert_eq!(e_string.cells[3].role, NoteRole::Chord); // G
    }

    #[test]
    fn test_diagram_caps_fret_window() {
        let diagram = Diagram::build(Instrument::FiveString, &[4, 8, 11], Some(4), Spelling::Sharps, 250);
        assert_eq!(diagram.frets, MAX_FRET);
        assert!(diagram.rows.iter().all(|row| row.cells.len() == 13));
        // open E and its octave
        assert_eq!(diagram.rows[3].cells[12].role, NoteRole::Bass);

        let diagram = Diagram::build(Instrument::FourString, &[4], Some(4), Spelling::Sharps, u8::MAX);
        assert_eq!(diagram.frets, MAX_FRET);
    }

    #[test]
    fn test_markers() {
        let diagram = Diagram::build(Instrument::FourString, &[10, 2, 5], Some(10), Spelling::Flats, 5);
        // A string, fret 1 is Bb
        let cell = &diagram.rows[2].cells[1];
        assert_eq!(cell.marker(DisplayMode::Standard), "B");
        assert_eq!(cell.marker(DisplayMode::Educational), "Bb");

        // A string, open A is not in Bb major
        let cell = &diagram.rows[2].cells[0];
        assert_eq!(cell.marker(DisplayMode::Educational), ".");
    }

    #[test]
    fn test_display_mode_parsing() {
        assert_eq!("Educational".parse::<DisplayMode>().unwrap(), DisplayMode::Educational);
        assert!("fancy".parse::<DisplayMode>().is_err());
    }
}
