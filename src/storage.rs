//! # Card Files
//!
//! Saves and loads a [`CardSet`] as YAML, together with the view settings it was
//! saved with:
//!
//! ```yaml
//! song:
//!   title: Night Song
//!   author: Someone
//!   key: Em
//! settings:
//!   instrument: 4-string
//!   display-mode: standard
//! chords:
//!   - symbol: Em
//!     sections: [V1, C1]
//!     root: E
//!     bass-note: E
//!     quality: minor
//!     ...
//! ```
//!
//! A card file is a snapshot: loading it does not re-analyze anything, so a
//! save/load round trip gives back exactly the same cards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::card::{CardSet, ChordCard};
use crate::error::BassistError;
use crate::fretboard::{DisplayMode, Instrument, MAX_FRET};
use crate::key::Key;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SongInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<Key>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct SavedSettings {
    instrument: Instrument,
    display_mode: DisplayMode,
}

/// On-disk layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCardFile {
    #[serde(default)]
    song: SongInfo,
    #[serde(default)]
    settings: SavedSettings,
    #[serde(default)]
    chords: Vec<ChordCard>,
}

/// A card set with the view settings stored alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct CardFile {
    pub set: CardSet,
    pub instrument: Instrument,
    pub display_mode: DisplayMode,
}

impl CardFile {
    pub fn new(set: CardSet, instrument: Instrument, display_mode: DisplayMode) -> Self {
        Self {
            set,
            instrument,
            display_mode,
        }
    }

    pub fn to_yaml(&self) -> Result<String, BassistError> {
        let raw = RawCardFile {
            song: SongInfo {
                title: self.set.title.clone(),
                author: self.set.author.clone(),
                key: self.set.key,
            },
            settings: SavedSettings {
                instrument: self.instrument,
                display_mode: self.display_mode,
            },
            chords: self.set.cards.clone(),
        };
        serde_yaml::to_string(&raw).map_err(|e| BassistError::MalformedCards(e.to_string()))
    }

    pub fn from_yaml(content: &str) -> Result<Self, BassistError> {
        let raw: RawCardFile =
            serde_yaml::from_str(content).map_err(|e| BassistError::MalformedCards(e.to_string()))?;
        for card in &raw.chords {
            validate_card(card)?;
        }
        Ok(Self {
            set: CardSet {
                title: raw.song.title,
                author: raw.song.author,
                key: raw.song.key,
                cards: raw.chords,
            },
            instrument: raw.settings.instrument,
            display_mode: raw.settings.display_mode,
        })
    }
}

/// Reject values the rest of the crate cannot draw
fn validate_card(card: &ChordCard) -> Result<(), BassistError> {
    if let Some(pitch) = card.pitch_classes.iter().find(|p| **p >= 12) {
        return Err(BassistError::MalformedCards(format!(
            "chord '{}' has pitch class {} (expected 0-11)",
            card.symbol, pitch
        )));
    }
    for (instrument, positions) in &card.positions {
        for position in positions {
            if position.string >= instrument.string_count() || position.fret > MAX_FRET {
                return Err(BassistError::MalformedCards(format!(
                    "chord '{}' has position string {} fret {} outside a {} bass",
                    card.symbol, position.string, position.fret, instrument
                )));
            }
        }
    }
    Ok(())
}

/// Write a card file. The YAML is rendered before the file is touched.
pub fn save_cards(path: impl AsRef<Path>, file: &CardFile) -> Result<(), BassistError> {
    let path = path.as_ref();
    let yaml = file.to_yaml()?;
    fs::write(path, yaml).map_err(|e| BassistError::FileWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    log::info!("Saved {} cards to {}", file.set.cards.len(), path.display());
    Ok(())
}

pub fn load_cards(path: impl AsRef<Path>) -> Result<CardFile, BassistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| BassistError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let file = CardFile::from_yaml(&content)?;
    log::debug!("Loaded {} cards from {}", file.set.cards.len(), path.display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::build_cards;
    use crate::parser::parse;

    fn sample() -> CardFile {
        let parsed = parse("---\ntitle: Test\nauthor: Me\n---\n[V1]\n.Em C/G B7\n[C1]\n.Am7 Xyz Bb");
        CardFile::new(build_cards(&parsed, None), Instrument::FiveString, DisplayMode::Educational)
    }

    #[test]
    fn test_yaml_round_trip() {
        let file = sample();
        let yaml = file.to_yaml().unwrap();
        let loaded = CardFile::from_yaml(&yaml).unwrap();
        assert_eq!(loaded, file);

        // Saving what was loaded gives the same document
        assert_eq!(loaded.to_yaml().unwrap(), yaml);
    }

    #[test]
    fn test_yaml_layout() {
        let yaml = sample().to_yaml().unwrap();
        assert!(yaml.contains("title: Test"));
        assert!(yaml.contains("key: Em"));
        assert!(yaml.contains("instrument: 5-string"));
        assert!(yaml.contains("display-mode: educational"));
        assert!(yaml.contains("unresolved-root"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = CardFile::from_yaml("song:\n  title: Only a title\n").unwrap();
        assert_eq!(file.set.title, "Only a title");
        assert!(file.set.cards.is_empty());
        assert!(file.set.key.is_none());
        assert_eq!(file.instrument, Instrument::FourString);
    }

    #[test]
    fn test_malformed_yaml() {
        let result = CardFile::from_yaml("song: [unclosed");
        assert!(matches!(result, Err(BassistError::MalformedCards(_))));

        let result = CardFile::from_yaml("song:\n  key: H#\n");
        assert!(matches!(result, Err(BassistError::MalformedCards(_))));
    }

    #[test]
    fn test_out_of_range_position_is_rejected() {
        let mut file = sample();
        let card = &mut file.set.cards[0];
        card.positions
            .get_mut(&Instrument::FourString)
            .unwrap()
            .insert(crate::fretboard::FretPosition { string: 4, fret: 0 });
        let yaml = file.to_yaml().unwrap();
        assert!(matches!(CardFile::from_yaml(&yaml), Err(BassistError::MalformedCards(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_cards("/nonexistent/cards.yaml");
        assert!(matches!(result, Err(BassistError::FileRead { .. })));
    }
}
