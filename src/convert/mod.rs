//! The conversion pipeline and its options.
//!
//! A [`Converter`] resolves the text font once and then runs the linear
//! pipeline: Markdown to HTML, HTML to story, story to PDF (or to one of the
//! story dumps).
//!
//! # Example
//!
//! ```no_run
//! use mdpdf::convert::{ConvertOptions, Converter};
//!
//! fn main() -> mdpdf::Result<()> {
//!     let converter = Converter::new(ConvertOptions::new().with_numbered_lists(true));
//!     let result = converter.convert_file("report.md", "report.pdf")?;
//!     println!("{} pages", result.stats.page_count);
//!     Ok(())
//! }
//! ```

use crate::error::Result;
use crate::font::{default_candidates, FontCandidate, FontRegistry, FontResolution, FontResolver};
use crate::html::parse_fragment;
use crate::markdown::markdown_to_html;
use crate::model::{Story, StyleSheet};
use crate::pdf::PdfEmitter;
use crate::render::{to_json, to_text, JsonFormat, StoryStats};
use crate::source::{read_markdown, title_from_path};
use crate::walk::{StoryBuilder, WalkOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Paginated PDF document
    #[default]
    Pdf,

    /// The story as JSON
    Json,

    /// The story as plain text
    Text,
}

impl OutputFormat {
    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Json => "application/json",
            OutputFormat::Text => "text/plain",
        }
    }
}

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Font files tried in order for the text font
    pub font_candidates: Vec<FontCandidate>,

    /// Story building options
    pub walk: WalkOptions,

    /// Document title; defaults to the first heading, then the file stem
    pub title: Option<String>,

    /// Output format
    pub output_format: OutputFormat,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            font_candidates: default_candidates(),
            walk: WalkOptions::default(),
            title: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try a font file before the platform candidates.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_candidates.insert(0, FontCandidate::new(path));
        self
    }

    /// Replace the font candidate list.
    pub fn with_font_candidates(mut self, candidates: Vec<FontCandidate>) -> Self {
        self.font_candidates = candidates;
        self
    }

    /// Number ordered list items.
    pub fn with_numbered_lists(mut self, number: bool) -> Self {
        self.walk.number_ordered_lists = number;
        self
    }

    /// Keep Markdown line breaks as forced breaks.
    pub fn with_line_breaks(mut self, keep: bool) -> Self {
        self.walk.keep_line_breaks = keep;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Converted content: PDF bytes or UTF-8 text
    pub content: Vec<u8>,

    /// The story the content was produced from
    pub story: Story,

    /// Story statistics
    pub stats: StoryStats,

    /// How the text font was chosen
    pub font: FontResolution,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// Content as text, for the JSON and text formats.
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Runs the Markdown to PDF pipeline with resolved fonts.
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
    registry: FontRegistry,
    resolution: FontResolution,
    styles: StyleSheet,
}

impl Converter {
    /// Resolve fonts and build the style sheet.
    pub fn new(options: ConvertOptions) -> Self {
        let mut registry = FontRegistry::new();
        let resolution =
            FontResolver::with_candidates(options.font_candidates.clone()).resolve(&mut registry);
        let styles = StyleSheet::new(&resolution.font_name);
        Self {
            options,
            registry,
            resolution,
            styles,
        }
    }

    /// How the text font was chosen.
    pub fn font_resolution(&self) -> &FontResolution {
        &self.resolution
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Fonts available to the emitter.
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert Markdown source to a story.
    pub fn build_story(&self, markdown: &str) -> Story {
        let html = markdown_to_html(markdown);
        log::debug!("markdown produced {} bytes of HTML", html.len());
        let root = parse_fragment(&html);
        StoryBuilder::new(self.options.walk.clone()).build(&root)
    }

    /// Convert Markdown source in the configured output format.
    pub fn convert_str(&self, markdown: &str) -> Result<ConvertResult> {
        self.convert_with_title(markdown, None)
    }

    fn convert_with_title(&self, markdown: &str, fallback_title: Option<String>) -> Result<ConvertResult> {
        let story = self.build_story(markdown);
        let mut stats = StoryStats::from_story(&story);
        log::info!("story has {} nodes", story.len());

        let content = match self.options.output_format {
            OutputFormat::Pdf => {
                let mut emitter = PdfEmitter::new(&self.registry);
                if let Some(title) = self.options.title.clone().or_else(|| story.title()).or(fallback_title) {
                    emitter = emitter.with_title(title);
                }
                let pages = emitter.layout(&story, &self.styles)?;
                stats = stats.with_pages(pages.len());
                emitter.serialize(&pages, &story)?
            }
            OutputFormat::Json => to_json(&story, JsonFormat::Pretty)?.into_bytes(),
            OutputFormat::Text => to_text(&story).into_bytes(),
        };

        Ok(ConvertResult {
            content,
            story,
            stats,
            font: self.resolution.clone(),
            mime_type: self.options.output_format.mime_type(),
        })
    }

    /// Convert a Markdown file and write the output in one call.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<ConvertResult> {
        let input = input.as_ref();
        let output = output.as_ref();
        log::info!("converting {}", input.display());
        let markdown = read_markdown(input)?;
        let result = self.convert_with_title(&markdown, title_from_path(input))?;
        fs::write(output, &result.content)?;
        log::info!("wrote {} ({} bytes)", output.display(), result.content_len());
        Ok(result)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::is_pdf_bytes;

    fn converter(format: OutputFormat) -> Converter {
        Converter::new(
            ConvertOptions::new()
                .with_font_candidates(Vec::new())
                .with_format(format),
        )
    }

    #[test]
    fn test_options_builder() {
        let options = ConvertOptions::new()
            .with_font_candidates(vec![FontCandidate::new("b.ttf")])
            .with_font("a.ttf")
            .with_numbered_lists(true)
            .with_title("Report")
            .with_format(OutputFormat::Json);
        assert_eq!(options.font_candidates[0].path, PathBuf::from("a.ttf"));
        assert_eq!(options.font_candidates.len(), 2);
        assert!(options.walk.number_ordered_lists);
        assert_eq!(options.title.as_deref(), Some("Report"));
        assert_eq!(options.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_fallback_font_without_candidates() {
        let converter = converter(OutputFormat::Pdf);
        assert!(converter.font_resolution().is_fallback());
        assert_eq!(converter.styles().text_font(), "Helvetica");
    }

    #[test]
    fn test_convert_str_pdf() {
        let result = converter(OutputFormat::Pdf)
            .convert_str("# Title\n\nHello **world**.")
            .unwrap();
        assert!(is_pdf_bytes(&result.content));
        assert_eq!(result.mime_type, "application/pdf");
        assert_eq!(result.stats.page_count, 1);
        assert_eq!(result.stats.heading_count, 1);
    }

    #[test]
    fn test_convert_str_json_and_text() {
        let json = converter(OutputFormat::Json).convert_str("# T\n\nx").unwrap();
        assert!(json.content_str().unwrap().contains("\"Title\""));

        let text = converter(OutputFormat::Text).convert_str("# T\n\nx").unwrap();
        assert_eq!(text.content_str(), Some("T\n\nx"));
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.md");
        let output = dir.path().join("report.pdf");
        fs::write(&input, "本文です。\n\n| A | B |\n|---|---|\n| 1 | 2 |\n").unwrap();

        let result = converter(OutputFormat::Pdf).convert_file(&input, &output).unwrap();
        assert!(output.exists());
        assert_eq!(result.stats.table_count, 1);
        assert_eq!(fs::read(&output).unwrap(), result.content);
    }

    #[test]
    fn test_convert_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = converter(OutputFormat::Pdf)
            .convert_file(dir.path().join("missing.md"), dir.path().join("out.pdf"));
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
        assert!(!dir.path().join("out.pdf").exists());
    }
}
