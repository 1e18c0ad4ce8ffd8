//! # Error Types
//!
//! This module defines the error type returned by fallible `bassist` operations.
//!
//! Only file-level problems are errors. Problems inside a chord sheet (a chord
//! symbol with an unknown suffix, a song without a detectable key) never abort
//! an analysis; they show up as flags on the affected [`ChordCard`](crate::ChordCard)
//! or as a missing key on the [`CardSet`](crate::CardSet).
//!
//! ## Error Types
//! - `FileRead` / `FileWrite` - I/O failures, with the offending path
//! - `MalformedCards` - a saved card file that does not match the card schema
//! - `ConfigError` - invalid settings (file or command line)
//! - `InvalidKey` - a key name that cannot be parsed, e.g. `"H#m"`
//!
//! ## Usage
//! ```rust
//! use bassist::{load_cards, BassistError};
//!
//! match load_cards("missing.yaml") {
//!     Ok(file) => println!("{} cards", file.set.cards.len()),
//!     Err(BassistError::FileRead { path, message }) => {
//!         eprintln!("Could not read {}: {}", path, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BassistError {
    /// A file could not be read.
    ///
    /// # Example
    /// ```
    /// # use bassist::BassistError;
    /// let err = BassistError::FileRead {
    ///     path: "song.txt".to_string(),
    ///     message: "No such file or directory".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Failed to read 'song.txt': No such file or directory");
    /// ```
    #[error("Failed to read '{path}': {message}")]
    FileRead { path: String, message: String },

    /// A file could not be written.
    #[error("Failed to write '{path}': {message}")]
    FileWrite { path: String, message: String },

    /// A saved card file is not valid YAML or does not follow the card schema.
    #[error("Malformed card file: {0}")]
    MalformedCards(String),

    /// Settings are out of range or the settings file is malformed.
    ///
    /// # Example
    /// ```
    /// # use bassist::BassistError;
    /// let err = BassistError::ConfigError("columns must be between 1 and 4, got 6".to_string());
    /// assert_eq!(err.to_string(), "Invalid settings: columns must be between 1 and 4, got 6");
    /// ```
    #[error("Invalid settings: {0}")]
    ConfigError(String),

    /// A key name such as `"Em"` or `"Bb major"` could not be parsed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}
