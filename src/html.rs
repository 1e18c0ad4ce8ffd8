//! HTML export of a card set.
//!
//! Builds a standalone page: song metadata, then one card per chord with its
//! details and a fretboard grid. Column count and print layout only change the
//! stylesheet.

use crate::card::{CardSet, ChordCard};
use crate::config::Settings;
use crate::fretboard::{DisplayMode, NoteRole};

/// Convert a card set to a standalone HTML page.
///
/// `print` switches to the compact print layout with A4 page rules.
pub fn to_html(set: &CardSet, settings: &Settings, print: bool) -> String {
    let mut html = String::new();
    let title = if set.title.is_empty() { "Untitled" } else { set.title.as_str() };

    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("  <title>Bass Chord Cards - {}</title>\n", escape_html(title)));
    html.push_str(&stylesheet(settings, print));
    html.push_str("</head>\n");
    html.push_str("<body>\n");

    // Song metadata
    html.push_str("  <div class=\"song-meta\">\n");
    html.push_str(&format!("    <h1>{}</h1>\n", escape_html(title)));
    html.push_str(&format!(
        "    <p><strong>Author:</strong> {}</p>\n",
        escape_html(&set.author)
    ));
    let key = set.key.map(|k| k.to_string()).unwrap_or_else(|| "unknown".to_string());
    html.push_str(&format!("    <p><strong>Key:</strong> {}</p>\n", escape_html(&key)));
    html.push_str(&format!(
        "    <p><strong>Bass Type:</strong> {}</p>\n",
        settings.instrument
    ));
    html.push_str("  </div>\n");

    html.push_str("  <div class=\"cards-container\">\n");
    for card in &set.cards {
        html.push_str(&card_to_html(card, settings));
    }
    html.push_str("  </div>\n");

    html.push_str("</body>\n");
    html.push_str("</html>\n");

    html
}

fn card_to_html(card: &ChordCard, settings: &Settings) -> String {
    let mut html = String::new();

    html.push_str("    <div class=\"card\">\n");
    if card.sections.is_empty() {
        html.push_str(&format!(
            "      <div class=\"card-title\">Chord: {}</div>\n",
            escape_html(&card.symbol)
        ));
    } else {
        html.push_str(&format!(
            "      <div class=\"card-title\">Chord: {} <span class=\"sections\">(Section: {})</span></div>\n",
            escape_html(&card.symbol),
            escape_html(&card.sections.join(", "))
        ));
    }

    html.push_str("      <div class=\"card-details\">\n");
    let degree = card.degree.as_ref().map(|d| d.label.as_str()).unwrap_or("?");
    let bass = card.bass_note.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string());
    html.push_str(&detail_item("Scale Degree", degree));
    html.push_str(&detail_item("Bass Note", &bass));
    html.push_str(&detail_item("Chord Notes", &card.notes.join(", ")));
    html.push_str("      </div>\n");

    if !card.flags.is_empty() {
        let flags: Vec<&str> = card.flags.iter().map(|f| f.as_str()).collect();
        html.push_str(&format!(
            "      <div class=\"flags\">{}</div>\n",
            escape_html(&flags.join(", "))
        ));
    }

    let diagram = card.diagram(settings.instrument, settings.diagram_frets);
    html.push_str("      <div class=\"fretboard\">\n");
    for row in &diagram.rows {
        html.push_str("        <div class=\"string-row\">\n");
        html.push_str(&format!(
            "          <div class=\"string-label\">{}</div>\n",
            row.string_name
        ));
        for cell in &row.cells {
            let mut class = String::from("fret-cell");
            if cell.fret == 0 {
                class.push_str(" open-string");
            }
            match cell.role {
                NoteRole::Bass => class.push_str(" bass-note"),
                NoteRole::Chord => class.push_str(" chord-note"),
                NoteRole::Other => {}
            }
            html.push_str(&format!(
                "          <div class=\"{}\">{}</div>\n",
                class,
                escape_html(cell.marker(settings.display_mode))
            ));
            if cell.fret == 0 {
                html.push_str("          <div class=\"divider\">|</div>\n");
            }
        }
        html.push_str("        </div>\n");
    }

    // Fret numbers, aligned with the cells above
    html.push_str("        <div class=\"fret-numbers\">\n");
    html.push_str("          <div class=\"string-label\"></div>\n");
    for fret in 0..=diagram.frets {
        html.push_str(&format!("          <div class=\"fret-number\">{}</div>\n", fret));
        if fret == 0 {
            html.push_str("          <div class=\"divider\">|</div>\n");
        }
    }
    html.push_str("        </div>\n");
    html.push_str("      </div>\n");
    html.push_str("    </div>\n");

    html
}

fn detail_item(label: &str, value: &str) -> String {
    format!(
        "        <div class=\"detail-item\"><div class=\"detail-label\">{}:</div><div>{}</div></div>\n",
        label,
        escape_html(value)
    )
}

fn stylesheet(settings: &Settings, print: bool) -> String {
    // Two percent of each column goes to the gap between cards
    let column_width = (100 / u32::from(settings.columns.max(1))).saturating_sub(2);
    let cell_width = match (settings.display_mode, print) {
        (DisplayMode::Educational, true) => 35,
        (DisplayMode::Educational, false) => 40,
        (DisplayMode::Standard, _) => 30,
    };

    let mut css = String::new();
    css.push_str("  <style>\n");
    css.push_str("    body { font-family: Arial, sans-serif; margin: 20px; color: #333; }\n");
    css.push_str("    .song-meta { background-color: #f0f0f0; padding: 15px; border-radius: 8px; margin-bottom: 20px; }\n");
    css.push_str("    .cards-container { display: flex; flex-wrap: wrap; gap: 20px; }\n");
    css.push_str(&format!(
        "    .card {{ border: 1px solid #ccc; border-radius: 8px; padding: 15px; background-color: #fff; flex: 1; min-width: {}%; max-width: {}%; box-sizing: border-box; }}\n",
        column_width, column_width
    ));
    css.push_str("    .card-title { font-size: 18px; font-weight: bold; color: #2c3e50; margin-bottom: 10px; }\n");
    css.push_str("    .sections { font-weight: normal; }\n");
    css.push_str("    .card-details { display: flex; flex-wrap: wrap; gap: 20px; margin-bottom: 15px; }\n");
    css.push_str("    .detail-label { font-weight: bold; color: #3498db; }\n");
    css.push_str("    .flags { color: #c0392b; font-size: 12px; margin-bottom: 10px; }\n");
    css.push_str("    .fretboard { font-family: monospace; }\n");
    css.push_str("    .string-row, .fret-numbers { display: flex; align-items: center; margin-bottom: 2px; }\n");
    css.push_str("    .string-label { font-weight: bold; width: 25px; text-align: center; }\n");
    css.push_str(&format!(
        "    .fret-cell {{ width: {}px; height: 25px; line-height: 25px; text-align: center; border: 1px solid #999; margin: 1px; font-weight: bold; }}\n",
        cell_width
    ));
    css.push_str(&format!(
        "    .fret-number {{ width: {}px; margin: 0 1px; text-align: center; font-size: 10px; color: #666; }}\n",
        cell_width + 2
    ));
    css.push_str("    .divider { width: 15px; text-align: center; font-weight: bold; }\n");
    css.push_str("    .bass-note { background-color: #ff7675; color: white; }\n");
    css.push_str("    .chord-note { background-color: #74b9ff; color: white; }\n");
    css.push_str("    .open-string { border-right: 2px solid #333; }\n");

    if print {
        css.push_str("    body { margin: 0.5cm; }\n");
        css.push_str("    .cards-container { gap: 5px; }\n");
        css.push_str("    .card { padding: 8px; page-break-inside: avoid; border: 1px solid #000; }\n");
        css.push_str("    .card-title { font-size: 14px; margin-bottom: 5px; }\n");
        css.push_str("    .card-details { gap: 10px; margin-bottom: 8px; font-size: 9px; }\n");
        css.push_str("    .fret-cell { height: 22px; line-height: 22px; font-size: 10px; margin: 0; border: 1px solid #666; }\n");
        css.push_str("    @page { size: A4; margin: 0.5cm; }\n");
    }
    css.push_str("  </style>\n");
    css
}

/// Escape special HTML characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
