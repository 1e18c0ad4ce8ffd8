pub mod card;
pub mod config;
pub mod error;
pub mod fretboard;
pub mod html;
pub mod key;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod song;
pub mod storage;
pub mod theory;

pub use card::{build_cards, CardSet, ChordCard};
pub use config::Settings;
pub use error::*;
pub use fretboard::{DisplayMode, Instrument};
pub use html::to_html;
pub use key::Key;
pub use parser::{parse, parse_file};
pub use render::render_text;
pub use storage::{load_cards, save_cards, CardFile};

/// Analyze a chord sheet into chord cards.
/// This is the main entry point for the library.
pub fn analyze(source: &str) -> CardSet {
    build_cards(&parse(source), None)
}

/// Analyze with a fixed key instead of the declared or detected one
pub fn analyze_with_key(source: &str, key: Key) -> CardSet {
    build_cards(&parse(source), Some(key))
}
