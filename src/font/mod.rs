//! Font resolution, metrics and the font registry.
//!
//! Fonts are referenced by name from the style sheet. A name either denotes
//! a registered TrueType font (embedded into the PDF) or one of the base-14
//! fonts every viewer provides. Bold and italic are real font variants for
//! the base-14 families and synthesised for embedded fonts.

mod builtin;
mod resolver;
mod truetype;

pub use builtin::{winansi_byte, BuiltinFont};
pub use resolver::{
    default_candidates, FontCandidate, FontResolution, FontResolver, FALLBACK_FONT, JAPANESE_FONT,
};
pub use truetype::{extract_collection_face, FontMetrics, Glyph, TrueTypeFont};

use std::collections::BTreeMap;
use std::sync::Arc;

/// Identifies a font program in the output document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontId {
    /// A base-14 font
    Builtin(BuiltinFont),
    /// A registered TrueType font, by registry name
    Embedded(String),
}

/// A font program plus the styling synthesised on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Face {
    pub font: FontId,
    /// Emulate bold by stroking glyph outlines
    pub synthetic_bold: bool,
    /// Emulate italic by shearing the text matrix
    pub synthetic_italic: bool,
}

impl Face {
    fn plain(font: FontId) -> Self {
        Self {
            font,
            synthetic_bold: false,
            synthetic_italic: false,
        }
    }
}

/// Fonts known to the emitter, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    fonts: BTreeMap<String, Arc<TrueTypeFont>>,
}

impl FontRegistry {
    /// Create an empty registry. Base-14 fonts are always available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a TrueType font under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, font: TrueTypeFont) {
        self.fonts.insert(name.into(), Arc::new(font));
    }

    /// Whether `name` is a registered TrueType font.
    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Whether `name` can be used at all.
    pub fn is_available(&self, name: &str) -> bool {
        self.contains(name) || BuiltinFont::from_name(name).is_some()
    }

    /// A registered TrueType font.
    pub fn embedded(&self, name: &str) -> Option<&TrueTypeFont> {
        self.fonts.get(name).map(|f| f.as_ref())
    }

    /// All registered TrueType fonts in name order.
    pub fn iter_embedded(&self) -> impl Iterator<Item = (&str, &TrueTypeFont)> {
        self.fonts.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Select the face for a font name with the requested weight and slant.
    pub fn face(&self, name: &str, bold: bool, italic: bool) -> Option<Face> {
        if self.contains(name) {
            return Some(Face {
                font: FontId::Embedded(name.to_string()),
                synthetic_bold: bold,
                synthetic_italic: italic,
            });
        }
        BuiltinFont::from_name(name).map(|b| Face::plain(FontId::Builtin(b.variant(bold, italic))))
    }

    /// Face used for characters the selected face cannot show.
    pub fn fallback_face(&self, bold: bool, italic: bool) -> Option<Face> {
        let name = self.fonts.keys().next()?;
        self.face(name, bold, italic)
    }

    /// Advance width in 1/1000 em, `None` when the font cannot show `ch`.
    pub fn advance(&self, font: &FontId, ch: char) -> Option<f32> {
        match font {
            FontId::Builtin(b) => b.advance(ch),
            FontId::Embedded(name) => self.embedded(name)?.glyph(ch).map(|g| g.advance),
        }
    }

    /// Whether `font` can show `ch`.
    pub fn can_encode(&self, font: &FontId, ch: char) -> bool {
        self.advance(font, ch).is_some()
    }

    /// Ascent and descent in 1/1000 em.
    pub fn vertical_metrics(&self, font: &FontId) -> (f32, f32) {
        match font {
            FontId::Builtin(b) => (b.ascent(), b.descent()),
            FontId::Embedded(name) => self
                .embedded(name)
                .map(|f| (f.metrics().ascent, f.metrics().descent))
                .unwrap_or((800.0, -200.0)),
        }
    }
}
