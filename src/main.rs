use bassist::{
    build_cards, load_cards, parse_file, render_text, save_cards, to_html, BassistError, CardFile, CardSet, DisplayMode,
    Instrument, Key, Settings,
};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("bassist=info")).init();

    let args = CliArgs::parse();
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match args.command {
        Command::Analyze {
            song,
            title,
            author,
            key,
            view,
            save,
            html,
            print,
        } => {
            let mut parsed = parse_file(&song)?;
            log::info!("Analyzing {song:?}");

            if let Some(title) = title {
                parsed.song.title = title;
            }
            if let Some(author) = author {
                parsed.song.author = author;
            }
            let set = build_cards(&parsed, key);
            let settings = view.apply(settings)?;

            print!("{}", render_text(&set, &settings));
            if let Some(path) = save {
                let file = CardFile::new(set.clone(), settings.instrument, settings.display_mode);
                save_cards(&path, &file)?;
            }
            if let Some(path) = html {
                write_html(&path, &set, &settings, print)?;
            }
        }
        Command::Show { cards, view } => {
            let file = load_cards(&cards)?;
            let settings = view.apply(with_saved(settings, &file))?;
            print!("{}", render_text(&file.set, &settings));
        }
        Command::Export {
            cards,
            output,
            print,
            view,
        } => {
            let file = load_cards(&cards)?;
            let settings = view.apply(with_saved(settings, &file))?;
            write_html(&output, &file.set, &settings, print)?;
        }
    }
    Ok(())
}

/// A card file remembers the bass type and display mode it was saved with
fn with_saved(settings: Settings, file: &CardFile) -> Settings {
    Settings {
        instrument: file.instrument,
        display_mode: file.display_mode,
        ..settings
    }
}

fn write_html(path: &Path, set: &CardSet, settings: &Settings, print: bool) -> Result<(), AppError> {
    let html = to_html(set, settings, print);
    fs::write(path, html).map_err(|e| BassistError::FileWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    log::info!("Wrote HTML to {path:?}");
    Ok(())
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Optional path to a settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a chord sheet and print its chord cards.
    Analyze {
        /// Path to the chord sheet.
        song: PathBuf,
        /// Override the song title.
        #[arg(long)]
        title: Option<String>,
        /// Override the song author.
        #[arg(long)]
        author: Option<String>,
        /// Force the key, e.g. "Em" or "Bb".
        #[arg(long)]
        key: Option<Key>,
        #[command(flatten)]
        view: ViewArgs,
        /// Save the cards to a YAML file.
        #[arg(long)]
        save: Option<PathBuf>,
        /// Export the cards to an HTML file.
        #[arg(long)]
        html: Option<PathBuf>,
        /// Use the print layout for the HTML export.
        #[arg(long, default_value_t = false, requires = "html")]
        print: bool,
    },
    /// Print the cards stored in a card file.
    Show {
        /// Path to the card file.
        cards: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Export a card file to HTML.
    Export {
        /// Path to the card file.
        cards: PathBuf,
        /// Output HTML file.
        #[arg(long, short)]
        output: PathBuf,
        /// Use the print layout.
        #[arg(long, default_value_t = false)]
        print: bool,
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Number of strings: 4 or 5.
    #[arg(long = "strings")]
    instrument: Option<Instrument>,
    /// Diagram markers: standard or educational.
    #[arg(long)]
    mode: Option<DisplayMode>,
    /// Cards per row in HTML export (1-4).
    #[arg(long)]
    columns: Option<u8>,
    /// Highest fret drawn in diagrams (1-12).
    #[arg(long)]
    frets: Option<u8>,
}

impl ViewArgs {
    fn apply(&self, mut settings: Settings) -> Result<Settings, AppError> {
        if let Some(instrument) = self.instrument {
            settings.instrument = instrument;
        }
        if let Some(mode) = self.mode {
            settings.display_mode = mode;
        }
        if let Some(columns) = self.columns {
            settings.columns = columns;
        }
        if let Some(frets) = self.frets {
            settings.diagram_frets = frets;
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Bassist(#[from] BassistError),
}
