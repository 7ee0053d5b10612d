//! Reading Markdown sources and deriving output paths.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Input document used when no path is given.
pub const DEFAULT_INPUT: &str = "検証レポート.md";

/// Extension of the produced document.
pub const OUTPUT_EXTENSION: &str = "pdf";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Read a Markdown file as UTF-8 text.
pub fn read_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    log::debug!("read {} bytes from {}", data.len(), path.display());
    decode_markdown(&data)
}

/// Decode raw bytes into NFC-normalised Markdown text.
///
/// A leading UTF-8 byte order mark is dropped. Invalid UTF-8 is an error
/// reporting the byte offset of the first bad sequence.
pub fn decode_markdown(data: &[u8]) -> Result<String> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let text = std::str::from_utf8(data).map_err(|e| {
        Error::Encoding(format!(
            "input is not valid UTF-8 (invalid byte at offset {})",
            e.valid_up_to()
        ))
    })?;
    Ok(text.nfc().collect())
}

/// Output path for an input: same base name, `.pdf` extension.
pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension(OUTPUT_EXTENSION)
}

/// Document title derived from the file stem.
pub fn title_from_path<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}
