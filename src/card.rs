//! Chord cards: the per-chord summary shown, saved and exported.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::fretboard::{positions, Diagram, FretPosition, Instrument};
use crate::key::{detect_key, Key, ScaleDegree};
use crate::resolver::{resolve, ChordFlag, ResolvedChord};
use crate::song::ParsedSong;
use crate::theory::{spell, Accidental, NoteName, PitchClass, Quality, Spelling};

/// Everything known about one distinct chord of a song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChordCard {
    pub symbol: String,
    /// Labels of the sections the chord appears in, in song order
    #[serde(default)]
    pub sections: Vec<String>,
    pub root: Option<NoteName>,
    pub bass_note: Option<NoteName>,
    pub quality: Quality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<ScaleDegree>,
    pub notes: Vec<String>,
    pub pitch_classes: Vec<PitchClass>,
    #[serde(default)]
    pub spelling: Spelling,
    pub positions: BTreeMap<Instrument, BTreeSet<FretPosition>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<ChordFlag>,
}

impl ChordCard {
    pub fn new(chord: &ResolvedChord, key: Option<&Key>, sections: Vec<String>) -> Self {
        let spelling = match chord.symbol.root.map(|r| r.accidental) {
            Some(Accidental::Flat) => Spelling::Flats,
            Some(Accidental::Sharp) => Spelling::Sharps,
            _ => key.map(Key::spelling).unwrap_or_default(),
        };

        let mut flags = chord.flags.clone();
        let degree = match (key, chord.root_pitch()) {
            (Some(key), Some(root)) => {
                let degree = key.degree_of(root, chord.quality);
                if !degree.diatonic {
                    flags.push(ChordFlag::Chromatic);
                }
                Some(degree)
            }
            _ => None,
        };

        let positions = Instrument::ALL
            .iter()
            .map(|instrument| (*instrument, positions(&chord.pitch_classes, *instrument)))
            .collect();

        Self {
            symbol: chord.symbol.raw.clone(),
            sections,
            root: chord.symbol.root,
            bass_note: chord.bass_note(),
            quality: chord.quality,
            degree,
            notes: chord
                .pitch_classes
                .iter()
                .map(|p| spell(*p, spelling).to_string())
                .collect(),
            pitch_classes: chord.pitch_classes.clone(),
            spelling,
            positions,
            flags,
        }
    }

    pub fn bass_pitch(&self) -> Option<PitchClass> {
        self.bass_note.map(NoteName::pitch_class)
    }

    pub fn has_flag(&self, flag: ChordFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Fret-window diagram for one instrument
    pub fn diagram(&self, instrument: Instrument, frets: u8) -> Diagram {
        Diagram::build(
            instrument,
            &self.pitch_classes,
            self.bass_pitch(),
            self.spelling,
            frets,
        )
    }

    pub fn positions_for(&self, instrument: Instrument) -> Option<&BTreeSet<FretPosition>> {
        self.positions.get(&instrument)
    }
}

/// The result of one analysis: song metadata plus its cards
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardSet {
    pub title: String,
    pub author: String,
    pub key: Option<Key>,
    pub cards: Vec<ChordCard>,
}

impl CardSet {
    pub fn card(&self, symbol: &str) -> Option<&ChordCard> {
        self.cards.iter().find(|card| card.symbol == symbol)
    }
}

/// Build the cards for a parsed song.
///
/// The key is, in order of preference: `key_override`, the key declared in the
/// song's front matter, the detected key.
pub fn build_cards(parsed: &ParsedSong, key_override: Option<Key>) -> CardSet {
    let resolved: HashMap<&str, ResolvedChord> = parsed
        .chords
        .iter()
        .map(|symbol| (symbol.as_str(), resolve(symbol)))
        .collect();

    let mut sections: HashMap<&str, Vec<String>> = HashMap::new();
    for (label, token) in parsed.song.chord_occurrences() {
        let labels = sections.entry(token.symbol.as_str()).or_default();
        if !label.is_empty() && !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }

    let key = key_override.or(parsed.song.key).or_else(|| {
        let occurrences = parsed
            .song
            .chord_occurrences()
            .filter_map(|(_, token)| resolved.get(token.symbol.as_str()));
        detect_key(occurrences)
    });
    match &key {
        Some(key) => log::info!("Song key: {}", key),
        None if !parsed.chords.is_empty() => log::warn!("Could not detect a key, scale degrees are skipped"),
        None => log::warn!("No chords found"),
    }

    let cards = parsed
        .chords
        .iter()
        .filter_map(|symbol| {
            let chord = resolved.get(symbol.as_str())?;
            let labels = sections.remove(symbol.as_str()).unwrap_or_default();
            Some(ChordCard::new(chord, key.as_ref(), labels))
        })
        .collect();

    CardSet {
        title: parsed.song.title.clone(),
        author: parsed.song.author.clone(),
        key,
        cards,
    }
}
