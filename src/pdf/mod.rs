//! PDF emitter: page layout and document serialisation.
//!
//! The emitter works in two passes. [`PdfEmitter::layout`] places every
//! node of a story onto fixed-size pages and yields a display list per page;
//! [`PdfEmitter::render`] then serialises the display lists with
//! `pdf-writer`. Nothing touches the file system until the whole document
//! has been produced.

mod layout;
mod text;
mod writer;

pub use layout::{fit_columns, DrawItem, PageLayout, Stroke};
pub use text::{can_break_between, is_cjk};
pub use writer::{deflate, to_unicode_cmap, DocumentInfo};

use crate::error::Result;
use crate::font::FontRegistry;
use crate::model::{StyleSheet, Story, CM};
use layout::LayoutEngine;
use std::fs;
use std::path::Path;

/// Producer string written into the document info.
pub const PRODUCER: &str = concat!("mdpdf ", env!("CARGO_PKG_VERSION"));

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageSetup {
    /// A4 portrait with 2 cm margins on every side.
    pub fn a4() -> Self {
        let margin = 2.0 * CM;
        Self {
            width: 595.2756,
            height: 841.8898,
            margin_top: margin,
            margin_bottom: margin,
            margin_left: margin,
            margin_right: margin,
        }
    }

    /// Width of the text frame.
    pub fn frame_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Height of the text frame.
    pub fn frame_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Y coordinate of the frame top.
    pub fn frame_top(&self) -> f32 {
        self.height - self.margin_top
    }

    /// Y coordinate of the frame bottom.
    pub fn frame_bottom(&self) -> f32 {
        self.margin_bottom
    }
}

/// Lays out a story and writes it as PDF.
#[derive(Debug, Clone)]
pub struct PdfEmitter<'a> {
    setup: PageSetup,
    registry: &'a FontRegistry,
    title: Option<String>,
}

impl<'a> PdfEmitter<'a> {
    /// Create an emitter for the registered fonts. Pages are always A4.
    pub fn new(registry: &'a FontRegistry) -> Self {
        Self {
            setup: PageSetup::a4(),
            registry,
            title: None,
        }
    }

    /// Set the document title. Defaults to the story's first title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn page_setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Place the story onto pages.
    pub fn layout(&self, story: &Story, styles: &StyleSheet) -> Result<Vec<PageLayout>> {
        LayoutEngine::new(&self.setup, styles, self.registry).run(story)
    }

    /// Serialise laid out pages of `story` into a PDF document.
    pub fn serialize(&self, pages: &[PageLayout], story: &Story) -> Result<Vec<u8>> {
        let info = DocumentInfo {
            title: self.title.clone().or_else(|| story.title()),
            producer: PRODUCER.to_string(),
        };
        let bytes = writer::write_document(pages, self.registry, &info)?;
        log::info!("rendered {} pages ({} bytes)", pages.len(), bytes.len());
        Ok(bytes)
    }

    /// Produce the complete PDF document in memory.
    pub fn render(&self, story: &Story, styles: &StyleSheet) -> Result<Vec<u8>> {
        let pages = self.layout(story, styles)?;
        self.serialize(&pages, story)
    }

    /// Render the story and write it to `path` in one call.
    pub fn write<P: AsRef<Path>>(&self, path: P, story: &Story, styles: &StyleSheet) -> Result<()> {
        let bytes = self.render(story, styles)?;
        fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}
