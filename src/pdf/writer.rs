//! Serialisation of laid out pages with pdf-writer.

use super::layout::{DrawItem, PageLayout};
use crate::error::{Error, Result};
use crate::font::{winansi_byte, FontId, FontRegistry, TrueTypeFont};
use chrono::{Datelike, Timelike, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, TextRenderingMode};
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use std::collections::BTreeMap;
use std::io::Write;
use subsetter::GlyphRemapper;

/// Horizontal shear of synthesised italics (tan 12°).
const ITALIC_SHEAR: f32 = 0.2126;

/// Outline stroke width of synthesised bold, relative to the font size.
const BOLD_STROKE: f32 = 0.03;

/// Default glyph width of CID fonts in 1/1000 em.
const CID_DEFAULT_WIDTH: f32 = 1000.0;

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub producer: String,
}

struct RefAllocator {
    next: i32,
}

impl RefAllocator {
    fn bump(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

/// A font used by the content streams.
struct UsedFont {
    resource: String,
    /// CID to character and width, for `/W` and ToUnicode
    glyphs: BTreeMap<u16, (char, f32)>,
    /// Original glyph ids to CIDs, which are the glyph ids of the subset
    remapper: GlyphRemapper,
}

#[derive(Default)]
struct FontTable {
    fonts: BTreeMap<FontId, UsedFont>,
}

impl FontTable {
    fn resource(&mut self, font: &FontId) -> String {
        let next = self.fonts.len() + 1;
        self.fonts
            .entry(font.clone())
            .or_insert_with(|| {
                let mut remapper = GlyphRemapper::new();
                remapper.remap(0);
                UsedFont {
                    resource: format!("F{}", next),
                    glyphs: BTreeMap::new(),
                    remapper,
                }
            })
            .resource
            .clone()
    }

    /// Encode text for a font: WinAnsi bytes or big-endian CIDs.
    ///
    /// Embedded glyphs are numbered in order of first use, matching the
    /// glyph order of the subset written later.
    fn encode(&mut self, registry: &FontRegistry, font: &FontId, text: &str) -> Vec<u8> {
        match font {
            FontId::Builtin(_) => text.chars().map(|c| winansi_byte(c).unwrap_or(b'?')).collect(),
            FontId::Embedded(name) => {
                let program = registry.embedded(name);
                let mut used = self.fonts.get_mut(font);
                let mut out = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let glyph = program.and_then(|p| p.glyph(ch));
                    let cid = match (glyph, used.as_mut()) {
                        (Some(g), Some(used)) => {
                            let cid = used.remapper.remap(g.id);
                            used.glyphs.entry(cid).or_insert((ch, g.advance));
                            cid
                        }
                        _ => 0,
                    };
                    out.extend_from_slice(&cid.to_be_bytes());
                }
                out
            }
        }
    }
}

/// Compress data with zlib for a `FlateDecode` stream.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Write the pages into a complete PDF file.
pub fn write_document(
    pages: &[PageLayout],
    registry: &FontRegistry,
    info: &DocumentInfo,
) -> Result<Vec<u8>> {
    let mut fonts = FontTable::default();
    let mut contents = Vec::with_capacity(pages.len());
    for page in pages {
        contents.push(encode_page(page, registry, &mut fonts)?);
    }

    let mut alloc = RefAllocator { next: 1 };
    let catalog_id = alloc.bump();
    let pages_id = alloc.bump();
    let info_id = alloc.bump();
    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc.bump()).collect();
    let content_ids: Vec<Ref> = pages.iter().map(|_| alloc.bump()).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);

    let mut font_refs = Vec::with_capacity(fonts.fonts.len());
    for (font, used) in &fonts.fonts {
        let font_ref = alloc.bump();
        match font {
            FontId::Builtin(builtin) => {
                pdf.type1_font(font_ref)
                    .base_font(Name(builtin.postscript_name().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            FontId::Embedded(name) => {
                let program = registry
                    .embedded(name)
                    .ok_or_else(|| Error::Render(format!("font {} is not registered", name)))?;
                write_cid_font(&mut pdf, &mut alloc, font_ref, program, used)?;
            }
        }
        font_refs.push((used.resource.clone(), font_ref));
    }

    for ((page, page_id), content_id) in pages.iter().zip(&page_ids).zip(&content_ids) {
        let mut page_writer = pdf.page(*page_id);
        page_writer
            .media_box(Rect::new(0.0, 0.0, page.width, page.height))
            .parent(pages_id)
            .contents(*content_id);
        let mut resources = page_writer.resources();
        let mut font_dict = resources.fonts();
        for (resource, font_ref) in &font_refs {
            font_dict.pair(Name(resource.as_bytes()), *font_ref);
        }
    }

    for (content, content_id) in contents.iter().zip(&content_ids) {
        pdf.stream(*content_id, content).filter(Filter::FlateDecode);
    }

    let mut document_info = pdf.document_info(info_id);
    if let Some(title) = &info.title {
        document_info.title(TextStr(title));
    }
    document_info.producer(TextStr(&info.producer));
    document_info.creation_date(now());
    document_info.finish();

    Ok(pdf.finish())
}

fn now() -> Date {
    let now = Utc::now();
    Date::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8)
        .utc_offset_hour(0)
        .utc_offset_minute(0)
}

fn encode_page(page: &PageLayout, registry: &FontRegistry, fonts: &mut FontTable) -> Result<Vec<u8>> {
    let mut content = Content::new();
    for item in &page.items {
        match item {
            DrawItem::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                content.save_state();
                if let Some(fill) = fill {
                    content.set_fill_rgb(fill.r, fill.g, fill.b);
                }
                if let Some(stroke) = stroke {
                    content.set_stroke_rgb(stroke.color.r, stroke.color.g, stroke.color.b);
                    content.set_line_width(stroke.width);
                }
                content.rect(*x, *y, *width, *height);
                match (fill.is_some(), stroke.is_some()) {
                    (true, true) => content.fill_nonzero_and_stroke(),
                    (true, false) => content.fill_nonzero(),
                    (false, true) => content.stroke(),
                    (false, false) => content.end_path(),
                };
                content.restore_state();
            }
            DrawItem::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                let resource = fonts.resource(&face.font);
                let encoded = fonts.encode(registry, &face.font, text);
                content.save_state();
                content.set_fill_rgb(color.r, color.g, color.b);
                if face.synthetic_bold {
                    content.set_stroke_rgb(color.r, color.g, color.b);
                    content.set_line_width(size * BOLD_STROKE);
                    content.set_text_rendering_mode(TextRenderingMode::FillStroke);
                }
                let shear = if face.synthetic_italic { ITALIC_SHEAR } else { 0.0 };
                content.begin_text();
                content.set_font(Name(resource.as_bytes()), *size);
                content.set_text_matrix([1.0, 0.0, shear, 1.0, *x, *y]);
                content.show(Str(&encoded));
                content.end_text();
                content.restore_state();
            }
        }
    }
    let raw = content.finish();
    deflate(&raw)
}

/// Cut a font program down to the glyphs in `remapper`, renumbered.
fn subset_program(font: &TrueTypeFont, remapper: &GlyphRemapper) -> Result<Vec<u8>> {
    subsetter::subset(font.data(), 0, remapper).map_err(|e| {
        Error::Render(format!("cannot subset font {}: {:?}", font.postscript_name(), e))
    })
}

/// Six-letter tag naming a subset, derived from the characters it holds.
fn subset_tag(glyphs: &BTreeMap<u16, (char, f32)>) -> String {
    let mut hash: u32 = 0x811C_9DC5;
    for (ch, _) in glyphs.values() {
        hash = (hash ^ u32::from(*ch)).wrapping_mul(0x0100_0193);
    }
    (0..6)
        .map(|i| char::from(b'A' + ((hash >> (i * 5)) % 26) as u8))
        .collect()
}

fn write_cid_font(
    pdf: &mut Pdf,
    alloc: &mut RefAllocator,
    type0_ref: Ref,
    font: &TrueTypeFont,
    used: &UsedFont,
) -> Result<()> {
    let cid_ref = alloc.bump();
    let descriptor_ref = alloc.bump();
    let file_ref = alloc.bump();
    let cmap_ref = alloc.bump();
    let glyphs = &used.glyphs;
    let subset_name = format!("{}+{}", subset_tag(glyphs), font.postscript_name());
    let base_font = Name(subset_name.as_bytes());

    pdf.type0_font(type0_ref)
        .base_font(base_font)
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_ref)
        .to_unicode(cmap_ref);

    {
        let mut cid = pdf.cid_font(cid_ref);
        cid.subtype(CidFontType::Type2);
        cid.base_font(base_font);
        cid.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid.font_descriptor(descriptor_ref);
        cid.default_width(CID_DEFAULT_WIDTH);
        {
            let mut widths = cid.widths();
            for (id, (_, width)) in glyphs {
                widths.consecutive(*id, [*width]);
            }
        }
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
    }

    let metrics = font.metrics();
    pdf.font_descriptor(descriptor_ref)
        .name(base_font)
        .flags(FontFlags::SYMBOLIC)
        .bbox(Rect::new(
            metrics.bbox[0],
            metrics.bbox[1],
            metrics.bbox[2],
            metrics.bbox[3],
        ))
        .italic_angle(0.0)
        .ascent(metrics.ascent)
        .descent(metrics.descent)
        .cap_height(metrics.cap_height)
        .stem_v(80.0)
        .font_file2(file_ref);

    let subset = subset_program(font, &used.remapper)?;
    log::debug!(
        "embedding {} glyphs of {} ({} of {} bytes)",
        glyphs.len(),
        font.postscript_name(),
        subset.len(),
        font.data().len()
    );
    let program = deflate(&subset)?;
    let length = i32::try_from(subset.len())
        .map_err(|_| Error::Render("font program too large".into()))?;
    {
        let mut stream = pdf.stream(file_ref, &program);
        stream.filter(Filter::FlateDecode);
        stream.pair(Name(b"Length1"), length);
    }

    let cmap = deflate(to_unicode_cmap(glyphs).as_bytes())?;
    pdf.stream(cmap_ref, &cmap).filter(Filter::FlateDecode);
    Ok(())
}

/// ToUnicode CMap mapping glyph ids back to characters.
pub fn to_unicode_cmap(glyphs: &BTreeMap<u16, (char, f32)>) -> String {
    let mut out = String::new();
    out.push_str("/CIDInit /ProcSet findresource begin\n");
    out.push_str("12 dict begin\n");
    out.push_str("begincmap\n");
    out.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    out.push_str("/CMapName /Adobe-Identity-UCS def\n");
    out.push_str("/CMapType 2 def\n");
    out.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    let entries: Vec<_> = glyphs.iter().collect();
    for chunk in entries.chunks(100) {
        out.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (id, (ch, _)) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            out.push_str(&format!("<{:04X}> <{}>\n", id, hex));
        }
        out.push_str("endbfchar\n");
    }

    out.push_str("endcmap\n");
    out.push_str("CMapName currentdict /CMap defineresource pop\n");
    out.push_str("end\nend\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::is_pdf_bytes;
    use crate::font::{BuiltinFont, Face};
    use crate::model::Color;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn text_item(font: BuiltinFont, text: &str) -> DrawItem {
        DrawItem::Text {
            x: 10.0,
            y: 20.0,
            face: Face {
                font: FontId::Builtin(font),
                synthetic_bold: false,
                synthetic_italic: false,
            },
            size: 11.0,
            color: Color::BLACK,
            text: text.into(),
        }
    }

    fn page(items: Vec<DrawItem>) -> PageLayout {
        PageLayout {
            width: 595.28,
            height: 841.89,
            items,
        }
    }

    #[test]
    fn test_write_minimal_document() {
        let pages = vec![page(vec![text_item(BuiltinFont::Helvetica, "Hello")])];
        let info = DocumentInfo {
            title: Some("検証".into()),
            producer: "mdpdf".into(),
        };
        let bytes = write_document(&pages, &FontRegistry::new(), &info).unwrap();
        assert!(is_pdf_bytes(&bytes));

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("/WinAnsiEncoding"));
        assert!(text.contains("/Count 1"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn test_fonts_get_distinct_resources() {
        let pages = vec![
            page(vec![text_item(BuiltinFont::Helvetica, "a")]),
            page(vec![
                text_item(BuiltinFont::HelveticaBold, "b"),
                text_item(BuiltinFont::Helvetica, "c"),
            ]),
        ];
        let mut fonts = FontTable::default();
        let registry = FontRegistry::new();
        for p in &pages {
            encode_page(p, &registry, &mut fonts).unwrap();
        }
        assert_eq!(fonts.fonts.len(), 2);
        assert_eq!(fonts.resource(&FontId::Builtin(BuiltinFont::Helvetica)), "F1");
        assert_eq!(fonts.resource(&FontId::Builtin(BuiltinFont::HelveticaBold)), "F2");
    }

    #[test]
    fn test_content_stream_is_compressed() {
        let mut fonts = FontTable::default();
        let stream = encode_page(
            &page(vec![text_item(BuiltinFont::Courier, "(x)")]),
            &FontRegistry::new(),
            &mut fonts,
        )
        .unwrap();
        let mut raw = String::new();
        ZlibDecoder::new(stream.as_slice()).read_to_string(&mut raw).unwrap();
        assert!(raw.contains("BT"));
        assert!(raw.contains("/F1 11 Tf"));
        assert!(raw.contains("ET"));
    }

    #[test]
    fn test_winansi_encoding_of_text() {
        let mut fonts = FontTable::default();
        let registry = FontRegistry::new();
        let font = FontId::Builtin(BuiltinFont::Helvetica);
        assert_eq!(fonts.encode(&registry, &font, "a•é"), vec![b'a', 0x95, 0xE9]);
    }

    const TEST_TTF: &[u8] = include_bytes!("../../tests/fixtures/TestTTF.ttf");

    fn embedded_registry() -> FontRegistry {
        let mut registry = FontRegistry::new();
        registry.register("Japanese", TrueTypeFont::from_bytes(TEST_TTF.to_vec(), 0).unwrap());
        registry
    }

    #[test]
    fn test_embedded_glyphs_are_renumbered() {
        let registry = embedded_registry();
        let font = FontId::Embedded("Japanese".into());
        let mut fonts = FontTable::default();
        fonts.resource(&font);

        let encoded = fonts.encode(&registry, &font, ". .A");
        // '.' and ' ' become CIDs 1 and 2; 'A' is unmapped.
        assert_eq!(encoded, vec![0, 1, 0, 2, 0, 1, 0, 0]);
        let used = &fonts.fonts[&font];
        assert_eq!(used.glyphs.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(used.glyphs[&1].0, '.');
    }

    #[test]
    fn test_subset_is_smaller_than_font() {
        let registry = embedded_registry();
        let program = registry.embedded("Japanese").unwrap();
        let font = FontId::Embedded("Japanese".into());
        let mut fonts = FontTable::default();
        fonts.resource(&font);
        fonts.encode(&registry, &font, ". ");

        let subset = subset_program(program, &fonts.fonts[&font].remapper).unwrap();
        assert!(subset.len() < program.data().len());
        let face = ttf_parser::Face::parse(&subset, 0).unwrap();
        let original = ttf_parser::Face::parse(program.data(), 0).unwrap();
        assert!(face.number_of_glyphs() < original.number_of_glyphs());
    }

    #[test]
    fn test_write_embedded_font() {
        let item = DrawItem::Text {
            x: 10.0,
            y: 20.0,
            face: Face {
                font: FontId::Embedded("Japanese".into()),
                synthetic_bold: false,
                synthetic_italic: false,
            },
            size: 11.0,
            color: Color::BLACK,
            text: ". \u{2026}".into(),
        };
        let bytes = write_document(&[page(vec![item])], &embedded_registry(), &DocumentInfo::default())
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Type0"));
        assert!(text.contains("/CIDFontType2"));
        assert!(text.contains("/Identity-H"));
        assert!(text.contains("/CIDToGIDMap /Identity"));
        assert!(text.contains("/ToUnicode"));
        assert!(text.contains("/FontFile2"));
        assert!(text.contains("+TestTTF-Regular"));
    }

    #[test]
    fn test_subset_tag_shape() {
        let mut glyphs = BTreeMap::new();
        glyphs.insert(1u16, ('.', 250.0));
        let tag = subset_tag(&glyphs);
        assert_eq!(tag.len(), 6);
        assert!(tag.chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(tag, subset_tag(&glyphs));
    }

    #[test]
    fn test_to_unicode_cmap() {
        let mut glyphs = BTreeMap::new();
        glyphs.insert(3u16, ('A', 600.0));
        glyphs.insert(4u16, ('😀', 1000.0));
        glyphs.insert(0x1234u16, ('日', 1000.0));
        let cmap = to_unicode_cmap(&glyphs);
        assert!(cmap.contains("3 beginbfchar"));
        assert!(cmap.contains("<0003> <0041>"));
        assert!(cmap.contains("<0004> <D83DDE00>"));
        assert!(cmap.contains("<1234> <65E5>"));
    }

    #[test]
    fn test_deflate_round_trip() {
        let compressed = deflate(b"stream data").unwrap();
        let mut out = Vec::new();
        ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut out).unwrap();
        assert_eq!(out, b"stream data");
    }
}
