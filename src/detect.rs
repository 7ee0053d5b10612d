//! Font container detection and PDF output validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Container format of a font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    /// TrueType outlines (`glyf` table), embeddable as FontFile2
    TrueType,
    /// OpenType with CFF outlines
    OpenTypeCff,
    /// TrueType/OpenType collection holding several faces
    Collection,
}

const TRUETYPE_MAGIC: &[u8] = &[0x00, 0x01, 0x00, 0x00];
const TRUETYPE_MAC_MAGIC: &[u8] = b"true";
const CFF_MAGIC: &[u8] = b"OTTO";
const COLLECTION_MAGIC: &[u8] = b"ttcf";
const MAGIC_LEN: usize = 4;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Detect the font container format from the leading bytes of a font file.
pub fn detect_font_format_from_bytes(data: &[u8]) -> Result<FontFormat> {
    if data.len() < MAGIC_LEN {
        return Err(Error::UnsupportedFont("file too short".into()));
    }

    let magic = &data[..MAGIC_LEN];
    if magic == TRUETYPE_MAGIC || magic == TRUETYPE_MAC_MAGIC {
        Ok(FontFormat::TrueType)
    } else if magic == CFF_MAGIC {
        Ok(FontFormat::OpenTypeCff)
    } else if magic == COLLECTION_MAGIC {
        Ok(FontFormat::Collection)
    } else {
        Err(Error::UnsupportedFont(format!(
            "unknown magic {:02X?}",
            magic
        )))
    }
}

/// Check if bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Check if a file looks like a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut header = [0u8; 5];
    BufReader::new(file).read_exact(&mut header).is_ok() && is_pdf_bytes(&header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_truetype() {
        let data = [0x00, 0x01, 0x00, 0x00, 0x00, 0x10];
        assert_eq!(
            detect_font_format_from_bytes(&data).unwrap(),
            FontFormat::TrueType
        );
        assert_eq!(
            detect_font_format_from_bytes(b"true....").unwrap(),
            FontFormat::TrueType
        );
    }

    #[test]
    fn test_detect_cff_and_collection() {
        let cff = detect_font_format_from_bytes(b"OTTO\x00\x0A").unwrap();
        assert_eq!(cff, FontFormat::OpenTypeCff);

        let ttc = detect_font_format_from_bytes(b"ttcf\x00\x01").unwrap();
        assert_eq!(ttc, FontFormat::Collection);
    }

    #[test]
    fn test_detect_unknown() {
        assert!(detect_font_format_from_bytes(b"").is_err());
        assert!(detect_font_format_from_bytes(b"tt").is_err());
        assert!(matches!(
            detect_font_format_from_bytes(b"%PDF-1.7"),
            Err(Error::UnsupportedFont(_))
        ));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.7\n%test"));
        assert!(!is_pdf_bytes(b"Not a PDF file"));
        assert!(!is_pdf_bytes(b""));
    }

    #[test]
    fn test_is_pdf_missing_file() {
        assert!(!is_pdf("/definitely/not/here.pdf"));
    }
}
