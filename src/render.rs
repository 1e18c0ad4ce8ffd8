//! Plain-text rendering of a card set for the terminal.
//!
//! ```text
//! Chord: B7 (Section: V1)
//!   Scale Degree: V7   Bass Note: B   Chord Notes: B, D#, F#, A
//!   G  . | . X . B .
//!   D  . | X . . X .
//!   ...
//!      0 | 1 2 3 4 5
//! ```

use crate::card::{CardSet, ChordCard};
use crate::config::Settings;

pub fn render_text(set: &CardSet, settings: &Settings) -> String {
    let mut out = String::new();
    let title = if set.title.is_empty() { "Untitled" } else { set.title.as_str() };

    out.push_str(&format!("Title: {}\n", title));
    if !set.author.is_empty() {
        out.push_str(&format!("Author: {}\n", set.author));
    }
    match &set.key {
        Some(key) => out.push_str(&format!("Key: {}\n", key)),
        None => out.push_str("Key: unknown\n"),
    }
    out.push_str(&format!("Bass Type: {}\n", settings.instrument));

    if set.cards.is_empty() {
        out.push_str("\nNo chords found.\n");
    }
    for card in &set.cards {
        out.push('\n');
        out.push_str(&render_card(card, settings));
    }
    out
}

fn render_card(card: &ChordCard, settings: &Settings) -> String {
    let mut out = String::new();

    if card.sections.is_empty() {
        out.push_str(&format!("Chord: {}\n", card.symbol));
    } else {
        out.push_str(&format!(
            "Chord: {} (Section: {})\n",
            card.symbol,
            card.sections.join(", ")
        ));
    }

    let degree = card.degree.as_ref().map(|d| d.label.as_str()).unwrap_or("?");
    let bass = card.bass_note.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string());
    out.push_str(&format!(
        "  Scale Degree: {}   Bass Note: {}   Chord Notes: {}\n",
        degree,
        bass,
        card.notes.join(", ")
    ));
    if !card.flags.is_empty() {
        let flags: Vec<&str> = card.flags.iter().map(|f| f.as_str()).collect();
        out.push_str(&format!("  Flags: {}\n", flags.join(", ")));
    }

    let diagram = card.diagram(settings.instrument, settings.diagram_frets);
    // Educational markers are note names up to two characters wide
    let width = diagram
        .rows
        .iter()
        .flat_map(|row| row.cells.iter())
        .map(|cell| cell.marker(settings.display_mode).chars().count())
        .chain(std::iter::once(diagram.frets.to_string().len()))
        .max()
        .unwrap_or(1);

    for row in &diagram.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| format!("{:<width$}", cell.marker(settings.display_mode), width = width))
            .collect();
        out.push_str(&format!("  {:<2}{}\n", row.string_name, fret_row(&cells)));
    }

    let numbers: Vec<String> = (0..=diagram.frets)
        .map(|fret| format!("{:<width$}", fret, width = width))
        .collect();
    out.push_str(&format!("  {:<2}{}\n", "", fret_row(&numbers)));
    out
}

/// Join cells with a nut divider after the open string
fn fret_row(cells: &[String]) -> String {
    match cells.split_first() {
        Some((open, rest)) => format!(" {} | {}", open, rest.join(" ")).trim_end().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::build_cards;
    use crate::fretboard::{DisplayMode, Instrument};
    use crate::parser::parse;

    fn sample() -> CardSet {
        build_cards(&parse("---\ntitle: Night Song\nauthor: Band\n---\n[V1]\n.Em C B7"), None)
    }

    #[test]
    fn test_header() {
        let text = render_text(&sample(), &Settings::default());
        assert!(text.starts_with("Title: Night Song\nAuthor: Band\nKey: Em\nBass Type: 4-string\n"));
    }

    #[test]
    fn test_card_lines() {
        let text = render_text(&sample(), &Settings::default());
        assert!(text.contains("Chord: B7 (Section: V1)"));
        assert!(text.contains("Scale Degree: V7   Bass Note: B   Chord Notes: B, D#, F#, A"));
    }

    #[test]
    fn test_standard_diagram() {
        let set = build_cards(&parse(".E"), None);
        let text = render_text(&set, &Settings::default());
        // E major on the open E string: E bass at 0, G# at 4
        assert!(text.contains("  E  B | . . . X ."));
        assert!(text.contains("     0 | 1 2 3 4 5"));
        assert_eq!(text.lines().filter(|l| l.contains(" | ")).count(), 5);
    }

    #[test]
    fn test_five_string_and_educational() {
        let settings = Settings {
            instrument: Instrument::FiveString,
            display_mode: DisplayMode::Educational,
            ..Settings::default()
        };
        let text = render_text(&build_cards(&parse(".E"), None), &settings);
        assert!(text.contains("Bass Type: 5-string"));
        assert!(text.contains("  B  B  | .  .  .  .  E"));
        assert!(text.contains("  E  E  | .  .  .  G#"));
    }

    #[test]
    fn test_unvalidated_fret_count_is_capped() {
        let settings = Settings {
            diagram_frets: 250,
            ..Settings::default()
        };
        let text = render_text(&build_cards(&parse(".E"), None), &settings);
        assert!(text.contains("10 11 12"));
        assert!(!text.contains(" 13"));
    }

    #[test]
    fn test_flags_and_empty_set() {
        let text = render_text(&build_cards(&parse(".Xyz"), None), &Settings::default());
        assert!(text.contains("Key: unknown"));
        assert!(text.contains("Flags: unresolved-root, unknown-quality"));

        let text = render_text(&CardSet::default(), &Settings::default());
        assert!(text.contains("No chords found."));
    }
}
