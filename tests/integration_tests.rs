//! Integration tests for bassist
//!
//! Tests the full pipeline from chord sheet to cards, card files and HTML.

use bassist::resolver::ChordFlag;
use bassist::{analyze, analyze_with_key, load_cards, parse, parse_file, save_cards, to_html, BassistError, CardFile, Settings};
use bassist::{DisplayMode, Instrument, Key};

const EXAMPLE_SONG: &str = include_str!("../songs/example.txt");

#[test]
fn test_parse_example_song() {
    let parsed = parse(EXAMPLE_SONG);
    assert_eq!(parsed.song.title, "Example Song");
    assert_eq!(parsed.song.author, "Unknown");

    let labels: Vec<_> = parsed.song.sections.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["V1", "P1", "C1"]);
    assert_eq!(parsed.song.sections[0].chord_lines().count(), 8);
    assert_eq!(parsed.song.sections[1].chord_lines().count(), 2);

    assert_eq!(
        parsed.chords,
        vec!["Em", "C", "B", "Am", "F#", "F#7", "D", "B7", "Am7"]
    );
}

#[test]
fn test_chord_offsets_line_up_with_lyrics() {
    let parsed = parse(EXAMPLE_SONG);
    let (chords, lyric) = parsed.song.sections[0].pairs()[1];
    let offsets: Vec<_> = chords.chords.iter().map(|c| (c.symbol.as_str(), c.offset)).collect();
    assert_eq!(offsets, vec![("C", 4), ("B", 17)]);

    let lyric = lyric.expect("chord line should have lyrics below it");
    assert!(lyric.text.contains("Соблазны"));
}

#[test]
fn test_short_section_example() {
    let parsed = parse("[V1]\n.Em\n line1\n.C B\n line2");
    assert_eq!(parsed.song.sections.len(), 1);

    let section = &parsed.song.sections[0];
    assert_eq!(section.label, "V1");
    let lines: Vec<Vec<&str>> = section
        .chord_lines()
        .map(|line| line.chords.iter().map(|c| c.symbol.as_str()).collect())
        .collect();
    assert_eq!(lines, vec![vec!["Em"], vec!["C", "B"]]);
    assert_eq!(parsed.chords, vec!["Em", "C", "B"]);
}

#[test]
fn test_analyze_example_song() {
    let set = analyze(EXAMPLE_SONG);
    assert_eq!(set.key.map(|k| k.to_string()), Some("Em".to_string()));
    assert_eq!(set.cards.len(), 9);

    let degree = |symbol: &str| set.card(symbol).and_then(|c| c.degree.clone()).map(|d| d.label);
    assert_eq!(degree("Em").as_deref(), Some("i"));
    assert_eq!(degree("C").as_deref(), Some("VI"));
    assert_eq!(degree("B").as_deref(), Some("V"));
    assert_eq!(degree("Am").as_deref(), Some("iv"));
    assert_eq!(degree("D").as_deref(), Some("VII"));
    assert_eq!(degree("B7").as_deref(), Some("V7"));

    let em = set.card("Em").unwrap();
    assert_eq!(em.sections, vec!["V1", "C1"]);
    assert_eq!(em.notes, vec!["E", "G", "B"]);
    assert_eq!(em.positions_for(Instrument::FourString).unwrap().len(), 12);
    assert_eq!(em.positions_for(Instrument::FiveString).unwrap().len(), 15);

    assert!(set.cards.iter().all(|c| !c.has_flag(ChordFlag::UnknownQuality)));
}

#[test]
fn test_key_override() {
    let key: Key = "G".parse().unwrap();
    let set = analyze_with_key(EXAMPLE_SONG, key);
    assert_eq!(set.key, Some(key));
    assert_eq!(set.card("Em").unwrap().degree.as_ref().unwrap().label, "vi");
}

#[test]
fn test_unknown_chords_degrade() {
    let set = analyze("[V1]\n.Em Xmaj9x Em\n[C1]\n.Gmaj13#11");
    let odd = set.card("Gmaj13#11").unwrap();
    assert!(odd.has_flag(ChordFlag::UnknownQuality));
    assert_eq!(odd.notes, vec!["G", "B", "D"]);
    assert!(set.card("Xmaj9x").unwrap().has_flag(ChordFlag::UnresolvedRoot));
    assert_eq!(set.key.unwrap().to_string(), "Em");
}

#[test]
fn test_card_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.yaml");

    let file = CardFile::new(analyze(EXAMPLE_SONG), Instrument::FiveString, DisplayMode::Educational);
    let result = save_cards(&path, &file);
    assert!(result.is_ok(), "Should save the card file");

    let loaded = load_cards(&path).unwrap();
    assert_eq!(loaded, file);

    // Saving again gives the same cards back
    let again = dir.path().join("again.yaml");
    save_cards(&again, &loaded).unwrap();
    assert_eq!(load_cards(&again).unwrap().set.cards, file.set.cards);
}

#[test]
fn test_malformed_card_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "chords:\n  - symbol: [not, a, string]\n").unwrap();

    let result = load_cards(&path);
    assert!(matches!(result, Err(BassistError::MalformedCards(_))));
}

#[test]
fn test_missing_card_file() {
    let result = load_cards("/nonexistent/dir/cards.yaml");
    assert!(matches!(result, Err(BassistError::FileRead { .. })));
}

#[test]
fn test_parse_song_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/songs/example.txt");
    let parsed = parse_file(path);
    assert!(parsed.is_ok(), "Should read the example song");
    assert_eq!(parsed.unwrap(), parse(EXAMPLE_SONG));
}

#[test]
fn test_missing_song_file() {
    let result = parse_file("/nonexistent/dir/song.txt");
    assert!(matches!(result, Err(BassistError::FileRead { .. })));
}

#[test]
fn test_dashes_between_sections_keep_every_chord_line() {
    let set = analyze("---\n[V1]\n.Em C\n lyric\n---\n.G");
    let symbols: Vec<_> = set.cards.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["Em", "C", "G"]);
    assert_eq!(set.card("Em").unwrap().sections, vec!["V1"]);
}

#[test]
fn test_save_into_missing_directory() {
    let file = CardFile::new(analyze(".Em"), Instrument::FourString, DisplayMode::Standard);
    let result = save_cards("/nonexistent/dir/cards.yaml", &file);
    assert!(matches!(result, Err(BassistError::FileWrite { .. })));
}

#[test]
fn test_html_export() {
    let set = analyze(EXAMPLE_SONG);
    let settings = Settings {
        columns: 4,
        instrument: Instrument::FiveString,
        ..Settings::default()
    };
    let html = to_html(&set, &settings, true);

    assert!(html.contains("<title>Bass Chord Cards - Example Song</title>"));
    assert!(html.contains("<strong>Key:</strong> Em"));
    assert!(html.contains("<strong>Bass Type:</strong> 5-string"));
    assert!(html.contains("min-width: 23%"));
    assert!(html.contains("@page"));
    assert_eq!(html.matches("<div class=\"card\">").count(), 9);
    assert_eq!(html.matches("class=\"string-row\"").count(), 9 * 5);
}
