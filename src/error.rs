//! Error types for mdpdf library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mdpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during Markdown to PDF conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid UTF-8 text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A font file could not be read or parsed.
    #[error("Failed to load font {path}: {reason}")]
    FontLoad {
        /// Path of the font candidate
        path: PathBuf,
        /// Why loading failed
        reason: String,
    },

    /// The font container cannot be embedded.
    #[error("Unsupported font format: {0}")]
    UnsupportedFont(String),

    /// Error during layout or PDF serialization.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error serializing the story to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a font load error for the given path.
    pub fn font_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::FontLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<ttf_parser::FaceParsingError> for Error {
    fn from(err: ttf_parser::FaceParsingError) -> Self {
        Error::UnsupportedFont(err.to_string())
    }
}
