//! TrueType fonts loaded from disk for embedding.

use crate::detect::{detect_font_format_from_bytes, FontFormat};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use ttf_parser::{name_id, Face};

/// A glyph of an embedded font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Glyph id, written as CID with an identity CID-to-GID map
    pub id: u16,
    /// Advance width in 1/1000 em
    pub advance: f32,
}

/// Font-wide metrics in 1/1000 em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    /// Bounding box as `[x_min, y_min, x_max, y_max]`
    pub bbox: [f32; 4],
}

/// A parsed TrueType font program.
///
/// The whole program is kept for embedding; the character map is resolved
/// once at load time so layout never has to re-parse the face.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    data: Vec<u8>,
    postscript_name: String,
    metrics: FontMetrics,
    glyphs: HashMap<char, Glyph>,
}

impl TrueTypeFont {
    /// Load the face at `index` from a font file.
    pub fn from_path<P: AsRef<Path>>(path: P, index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| Error::font_load(path, e.to_string()))?;
        Self::from_bytes(data, index).map_err(|e| match e {
            Error::UnsupportedFont(reason) => Error::font_load(path, reason),
            other => other,
        })
    }

    /// Parse a font program. Collections are unpacked to the face at `index`.
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self> {
        let data = match detect_font_format_from_bytes(&data)? {
            FontFormat::TrueType => data,
            FontFormat::Collection => extract_collection_face(&data, index)?,
            FontFormat::OpenTypeCff => {
                return Err(Error::UnsupportedFont(
                    "CFF outlines cannot be embedded as TrueType".into(),
                ))
            }
        };
        // An extracted face is always at index 0.
        let face_index = 0;
        let face = Face::parse(&data, face_index)?;
        if face.tables().glyf.is_none() {
            return Err(Error::UnsupportedFont("font has no glyf table".into()));
        }

        let units = f32::from(face.units_per_em());
        let scale = |v: i16| f32::from(v) * 1000.0 / units;
        let bbox = face.global_bounding_box();
        let metrics = FontMetrics {
            ascent: scale(face.ascender()),
            descent: scale(face.descender()),
            cap_height: face.capital_height().map(scale).unwrap_or(700.0),
            bbox: [
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ],
        };

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|code| {
                    let Some(ch) = char::from_u32(code) else {
                        return;
                    };
                    if glyphs.contains_key(&ch) {
                        return;
                    }
                    if let Some(gid) = subtable.glyph_index(code) {
                        let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                        glyphs.insert(
                            ch,
                            Glyph {
                                id: gid.0,
                                advance: f32::from(advance) * 1000.0 / units,
                            },
                        );
                    }
                });
            }
        }
        if glyphs.is_empty() {
            return Err(Error::UnsupportedFont("font has no Unicode cmap".into()));
        }

        let postscript_name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string())
            .map(|n| sanitize_name(&n))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        log::debug!(
            "parsed font {} with {} mapped characters",
            postscript_name,
            glyphs.len()
        );

        Ok(Self {
            data,
            postscript_name,
            metrics,
            glyphs,
        })
    }

    /// The font program bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// PostScript name, safe for use as a PDF name.
    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Glyph for a character, if the font maps it.
    pub fn glyph(&self, ch: char) -> Option<Glyph> {
        self.glyphs.get(&ch).copied()
    }

    /// Number of mapped characters.
    pub fn char_count(&self) -> usize {
        self.glyphs.len()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
        .collect()
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    data.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| Error::UnsupportedFont("truncated font file".into()))
}

fn read_u32(data: &[u8], at: usize) -> Result<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| Error::UnsupportedFont("truncated font file".into()))
}

/// Copy one face of a TrueType collection into a standalone font file.
///
/// The table directory is rewritten with fresh offsets and every table is
/// copied, padded to a four byte boundary.
pub fn extract_collection_face(data: &[u8], index: u32) -> Result<Vec<u8>> {
    let num_fonts = read_u32(data, 8)?;
    if index >= num_fonts {
        return Err(Error::UnsupportedFont(format!(
            "collection has {} faces, index {} requested",
            num_fonts, index
        )));
    }
    let face_offset = read_u32(data, 12 + 4 * index as usize)? as usize;
    let num_tables = read_u16(data, face_offset + 4)? as usize;

    let header_len = 12 + 16 * num_tables;
    let header = data
        .get(face_offset..face_offset + 12)
        .ok_or_else(|| Error::UnsupportedFont("truncated font file".into()))?;

    let mut out = Vec::with_capacity(data.len() / num_fonts.max(1) as usize);
    out.extend_from_slice(header);
    let mut tables = Vec::with_capacity(num_tables);
    let mut next_offset = header_len;
    for i in 0..num_tables {
        let record = face_offset + 12 + 16 * i;
        let tag = read_u32(data, record)?;
        let checksum = read_u32(data, record + 4)?;
        let offset = read_u32(data, record + 8)? as usize;
        let length = read_u32(data, record + 12)? as usize;
        let table = data
            .get(offset..offset + length)
            .ok_or_else(|| Error::UnsupportedFont("table outside of file".into()))?;

        out.extend_from_slice(&tag.to_be_bytes());
        out.extend_from_slice(&checksum.to_be_bytes());
        out.extend_from_slice(&(next_offset as u32).to_be_bytes());
        out.extend_from_slice(&(length as u32).to_be_bytes());
        tables.push(table);
        next_offset += (length + 3) & !3;
    }
    for table in tables {
        out.extend_from_slice(table);
        out.resize((out.len() + 3) & !3, 0);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_record(tag: &[u8; 4], offset: u32, length: u32) -> Vec<u8> {
        let mut r = tag.to_vec();
        r.extend_from_slice(&0u32.to_be_bytes());
        r.extend_from_slice(&offset.to_be_bytes());
        r.extend_from_slice(&length.to_be_bytes());
        r
    }

    #[test]
    fn test_extract_collection_face() {
        // ttcf header with one face holding a single 5-byte table.
        let mut data = b"ttcf".to_vec();
        data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&16u32.to_be_bytes());
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0, 1, 0, 16, 0, 0, 0, 0]);
        data.extend_from_slice(&table_record(b"test", 44, 5));
        data.extend_from_slice(b"hello");

        let face = extract_collection_face(&data, 0).unwrap();
        assert_eq!(&face[..4], &[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(read_u32(&face, 12 + 8).unwrap(), 28);
        assert_eq!(&face[28..33], b"hello");
        assert_eq!(face.len() % 4, 0);
    }

    const TEST_TTC: &[u8] = include_bytes!("../../tests/fixtures/TestTTF.ttc");
    const TEST_TTF: &[u8] = include_bytes!("../../tests/fixtures/TestTTF.ttf");

    #[test]
    fn test_extract_face_of_real_collection() {
        let face = extract_collection_face(TEST_TTC, 0).unwrap();
        assert_eq!(face, TEST_TTF);
        assert!(Face::parse(&face, 0).is_ok());
    }

    #[test]
    fn test_load_collection_face() {
        let font = TrueTypeFont::from_bytes(TEST_TTC.to_vec(), 1).unwrap();
        assert_eq!(font.postscript_name(), "TestTTF-Regular");
        assert!(font.glyph('.').is_some());
        assert!(font.glyph('\u{2026}').is_some());
        assert!(font.glyph('A').is_none());
        assert_eq!(&font.data()[..4], &[0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_load_truetype_file() {
        let font = TrueTypeFont::from_bytes(TEST_TTF.to_vec(), 0).unwrap();
        assert_eq!(font.data(), TEST_TTF);
        assert!(font.char_count() >= 3);
        let metrics = font.metrics();
        assert!(metrics.ascent > 0.0);
        assert!(metrics.descent <= 0.0);
    }

    #[test]
    fn test_extract_rejects_bad_index() {
        let mut data = b"ttcf".to_vec();
        data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&16u32.to_be_bytes());
        assert!(matches!(
            extract_collection_face(&data, 3),
            Err(Error::UnsupportedFont(_))
        ));
    }

    #[test]
    fn test_cff_rejected() {
        let result = TrueTypeFont::from_bytes(b"OTTO\x00\x01\x00\x00".to_vec(), 0);
        assert!(matches!(result, Err(Error::UnsupportedFont(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let result = TrueTypeFont::from_bytes(vec![0x00, 0x01, 0x00, 0x00, 0xFF], 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_font_load_error() {
        let result = TrueTypeFont::from_path("/no/such/font.ttf", 0);
        assert!(matches!(result, Err(Error::FontLoad { .. })));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("IPA Gothic(Regular)"), "IPAGothicRegular");
    }
}
