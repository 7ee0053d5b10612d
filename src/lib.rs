//! # mdpdf
//!
//! Markdown to PDF conversion with Japanese font substitution.
//!
//! This library turns a Markdown document into a styled, paginated A4 PDF.
//! Markdown is rendered to HTML, the HTML tree is walked into a flat
//! *story* of layout nodes, and the story is laid out and written as PDF
//! with a Japanese-capable TrueType font when one is installed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdpdf::convert_file;
//!
//! fn main() -> mdpdf::Result<()> {
//!     let result = convert_file("検証レポート.md", "検証レポート.pdf")?;
//!     if let Some(warning) = &result.font.warning {
//!         eprintln!("{}", warning);
//!     }
//!     println!("{} pages", result.stats.page_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **CJK text**: Japanese fonts are located per platform and embedded
//! - **Styled blocks**: Headings, paragraphs, lists, tables and code blocks
//! - **Line breaking**: Word wrap with CJK break opportunities
//! - **Story dumps**: Inspect the intermediate story as JSON or text

pub mod convert;
pub mod detect;
pub mod error;
pub mod font;
pub mod html;
pub mod markdown;
pub mod model;
pub mod pdf;
pub mod render;
pub mod source;
pub mod walk;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConvertResult, Converter, OutputFormat};
pub use detect::{detect_font_format_from_bytes, is_pdf, FontFormat};
pub use error::{Error, Result};
pub use font::{FontCandidate, FontRegistry, FontResolution, FontResolver};
pub use model::{
    Alignment, Color, InlineSpan, InlineText, LayoutNode, Paragraph, SpanKind, Story, Style,
    StyleName, StyleSheet, Table, TableStyle, CM,
};
pub use pdf::{PageLayout, PageSetup, PdfEmitter};
pub use render::{JsonFormat, StoryStats};
pub use source::{default_output_path, DEFAULT_INPUT};
pub use walk::{StoryBuilder, WalkOptions};

use std::path::Path;

/// Convert Markdown source to a story with default walk options.
///
/// # Example
///
/// ```
/// use mdpdf::build_story;
///
/// let story = build_story("# Title\n\nHello **world**.");
/// assert_eq!(story.len(), 3);
/// assert_eq!(story.title().as_deref(), Some("Title"));
/// ```
pub fn build_story(markdown: &str) -> Story {
    build_story_with_options(markdown, &WalkOptions::default())
}

/// Convert Markdown source to a story with custom walk options.
pub fn build_story_with_options(markdown: &str, options: &WalkOptions) -> Story {
    let html = markdown::markdown_to_html(markdown);
    let root = html::parse_fragment(&html);
    StoryBuilder::new(options.clone()).build(&root)
}

/// Render Markdown source to PDF bytes.
///
/// # Example
///
/// ```no_run
/// use mdpdf::{render_pdf, ConvertOptions};
///
/// let bytes = render_pdf("# Report\n\n本文", &ConvertOptions::default()).unwrap();
/// std::fs::write("report.pdf", bytes).unwrap();
/// ```
pub fn render_pdf(markdown: &str, options: &ConvertOptions) -> Result<Vec<u8>> {
    let options = options.clone().with_format(OutputFormat::Pdf);
    let result = Converter::new(options).convert_str(markdown)?;
    Ok(result.content)
}

/// Convert a Markdown file to a PDF file.
///
/// # Arguments
///
/// * `input` - Path to the Markdown file
/// * `output` - Path of the PDF to write
///
/// # Example
///
/// ```no_run
/// use mdpdf::convert_file;
///
/// convert_file("notes.md", "notes.pdf").unwrap();
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertResult> {
    convert_file_with_options(input, output, ConvertOptions::default())
}

/// Convert a Markdown file with custom options.
///
/// # Example
///
/// ```no_run
/// use mdpdf::{convert_file_with_options, ConvertOptions};
///
/// let options = ConvertOptions::new()
///     .with_font("/usr/share/fonts/opentype/ipafont-gothic/ipag.ttf")
///     .with_numbered_lists(true);
/// convert_file_with_options("notes.md", "notes.pdf", options).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: ConvertOptions,
) -> Result<ConvertResult> {
    Converter::new(options).convert_file(input, output)
}

/// Builder for converting Markdown documents.
///
/// # Example
///
/// ```no_run
/// use mdpdf::MdPdf;
///
/// let result = MdPdf::new()
///     .with_font("fonts/NotoSansJP.ttf")
///     .with_numbered_lists()
///     .with_title("検証レポート")
///     .parse_file("検証レポート.md")?;
/// result.write_pdf("検証レポート.pdf")?;
/// # Ok::<(), mdpdf::Error>(())
/// ```
pub struct MdPdf {
    options: ConvertOptions,
}

impl MdPdf {
    /// Create a new MdPdf builder.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
        }
    }

    /// Try a font file before the platform candidates.
    pub fn with_font(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.options = self.options.with_font(path);
        self
    }

    /// Do not search the platform font locations.
    pub fn without_system_fonts(mut self) -> Self {
        self.options.font_candidates.clear();
        self
    }

    /// Number ordered list items.
    pub fn with_numbered_lists(mut self) -> Self {
        self.options = self.options.with_numbered_lists(true);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Parse Markdown source and return a result wrapper.
    pub fn parse(self, markdown: &str) -> MdPdfResult {
        self.parse_with_fallback_title(markdown, None)
    }

    /// Read and parse a Markdown file.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<MdPdfResult> {
        let markdown = source::read_markdown(path.as_ref())?;
        let title = source::title_from_path(path.as_ref());
        Ok(self.parse_with_fallback_title(&markdown, title))
    }

    fn parse_with_fallback_title(self, markdown: &str, fallback: Option<String>) -> MdPdfResult {
        let converter = Converter::new(self.options);
        let story = converter.build_story(markdown);
        let title = converter
            .options()
            .title
            .clone()
            .or_else(|| story.title())
            .or(fallback);
        MdPdfResult {
            story,
            converter,
            title,
        }
    }
}

impl Default for MdPdf {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a Markdown document.
pub struct MdPdfResult {
    /// The story built from the document
    pub story: Story,
    converter: Converter,
    title: Option<String>,
}

impl MdPdfResult {
    /// Render to PDF bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        let mut emitter = PdfEmitter::new(self.converter.registry());
        if let Some(title) = &self.title {
            emitter = emitter.with_title(title.clone());
        }
        emitter.render(&self.story, self.converter.styles())
    }

    /// Render and write the PDF in one call.
    pub fn write_pdf<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_pdf()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Dump the story as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.story, format)
    }

    /// Dump the story as plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.story)
    }

    /// Story statistics, without page count.
    pub fn stats(&self) -> StoryStats {
        StoryStats::from_story(&self.story)
    }

    /// How the text font was chosen.
    pub fn font(&self) -> &FontResolution {
        self.converter.font_resolution()
    }

    /// Get the story.
    pub fn story(&self) -> &Story {
        &self.story
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> MdPdf {
        MdPdf::new().without_system_fonts()
    }

    #[test]
    fn test_minimal_document_story() {
        let story = build_story("# Title\n\nHello **world**.");
        let nodes = story.nodes();
        assert_eq!(nodes.len(), 3);

        match &nodes[0] {
            LayoutNode::Paragraph(p) => {
                assert_eq!(p.style, StyleName::Title);
                assert_eq!(p.markup(), "Title");
            }
            other => panic!("expected title, got {:?}", other),
        }
        match &nodes[1] {
            LayoutNode::Spacer { height } => assert!((height - 0.5 * CM).abs() < 1e-4),
            other => panic!("expected spacer, got {:?}", other),
        }
        match &nodes[2] {
            LayoutNode::Paragraph(p) => {
                assert_eq!(p.style, StyleName::Body);
                assert_eq!(p.markup(), "Hello <b>world</b>.");
            }
            other => panic!("expected body, got {:?}", other),
        }
    }

    #[test]
    fn test_build_story_empty() {
        assert!(build_story("").is_empty());
        assert!(build_story("\n\n   \n").is_empty());
    }

    #[test]
    fn test_build_story_with_numbering() {
        let options = WalkOptions::new().with_list_numbering(true);
        let story = build_story_with_options("1. one\n2. two\n", &options);
        let texts: Vec<String> = story.iter().map(|n| n.plain_text()).collect();
        assert!(texts.contains(&"1. one".to_string()));
        assert!(texts.contains(&"2. two".to_string()));
    }

    #[test]
    fn test_build_story_ordered_list_unnumbered_by_default() {
        let story = build_story("1. one\n2. two\n");
        let texts: Vec<String> = story.iter().map(|n| n.plain_text()).collect();
        assert!(texts.contains(&"one".to_string()));
    }

    #[test]
    fn test_render_pdf_fallback() {
        let options = ConvertOptions::new().with_font_candidates(Vec::new());
        let bytes = render_pdf("# 見出し\n\nbody", &options).unwrap();
        assert!(detect::is_pdf_bytes(&bytes));
    }

    #[test]
    fn test_mdpdf_builder() {
        let builder = MdPdf::new()
            .with_font("custom.ttf")
            .with_numbered_lists()
            .with_title("T");
        assert_eq!(
            builder.options.font_candidates[0].path,
            std::path::PathBuf::from("custom.ttf")
        );
        assert!(builder.options.walk.number_ordered_lists);
        assert_eq!(builder.options.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_mdpdf_default() {
        let builder = MdPdf::default();
        assert!(!builder.options.walk.number_ordered_lists);
        assert!(builder.options.title.is_none());
    }

    #[test]
    fn test_mdpdf_parse_and_dump() {
        let result = offline().parse("# Title\n\n- a\n- b\n");
        assert!(result.font().is_fallback());
        assert_eq!(result.stats().list_item_count, 2);
        assert_eq!(result.to_text(), "Title\n\n• a\n\n• b");
        let json = result.to_json(JsonFormat::Compact).unwrap();
        assert!(json.contains("\"paragraph\""));
    }

    #[test]
    fn test_mdpdf_write_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        offline().parse("# Title\n\ntext").write_pdf(&path).unwrap();
        assert!(is_pdf(&path));
    }

    #[test]
    fn test_mdpdf_parse_missing_file() {
        let result = offline().parse_file("/nonexistent/input.md");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_mdpdf_ragged_table_fails() {
        let result = offline().parse("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>");
        assert!(matches!(result.to_pdf(), Err(Error::Render(_))));
    }
}
