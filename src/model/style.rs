//! Paragraph styles and the fixed style sheet.

use serde::{Deserialize, Serialize};

/// Points per centimetre.
pub const CM: f32 = 72.0 / 2.54;

/// Font used for inline code and preformatted blocks.
pub const MONOSPACE_FONT: &str = "Courier";

/// Font size of inline code spans.
pub const INLINE_CODE_SIZE: f32 = 9.0;

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color::gray(0.0);
    /// Mid grey, used for table header shading.
    pub const GREY: Color = Color::gray(0.5);
    /// Whitesmoke, used for table header text.
    pub const WHITESMOKE: Color = Color::gray(0.96);

    /// Create a colour from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a grey level.
    pub const fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }

    /// Whether all components are equal.
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

/// Names of the fixed paragraph styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleName {
    /// Document title (`h1`)
    Title,
    /// Section heading (`h2`)
    Heading1,
    /// Subsection heading (`h3`)
    Heading2,
    /// Running text, list items and orphan text
    Body,
    /// Preformatted code blocks
    Code,
}

impl StyleName {
    /// All style names in sheet order.
    pub const ALL: [StyleName; 5] = [
        StyleName::Title,
        StyleName::Heading1,
        StyleName::Heading2,
        StyleName::Body,
        StyleName::Code,
    ];

    /// Display name of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleName::Title => "Title",
            StyleName::Heading1 => "Heading1",
            StyleName::Heading2 => "Heading2",
            StyleName::Body => "Body",
            StyleName::Code => "Code",
        }
    }
}

impl std::fmt::Display for StyleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text rendering attributes of a paragraph style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Style name
    pub name: StyleName,

    /// Registered font name (e.g. "Japanese", "Helvetica", "Courier")
    pub font_name: String,

    /// Font size in points
    pub font_size: f32,

    /// Baseline-to-baseline distance in points
    pub leading: f32,

    /// Space before the paragraph in points
    pub space_before: f32,

    /// Space after the paragraph in points
    pub space_after: f32,

    /// Text colour
    pub color: Color,

    /// Left indent in points
    pub left_indent: f32,
}

impl Style {
    fn text(name: StyleName, font_name: &str, font_size: f32, leading: f32) -> Self {
        Self {
            name,
            font_name: font_name.to_string(),
            font_size,
            leading,
            space_before: 0.0,
            space_after: 0.0,
            color: Color::BLACK,
            left_indent: 0.0,
        }
    }
}

/// The immutable set of styles shared by the walker and the emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    title: Style,
    heading1: Style,
    heading2: Style,
    body: Style,
    code: Style,
}

impl StyleSheet {
    /// Build the fixed styles around the resolved text font.
    pub fn new(font_name: &str) -> Self {
        let title = Style {
            space_after: 12.0,
            ..Style::text(StyleName::Title, font_name, 24.0, 28.8)
        };
        let heading1 = Style {
            space_before: 6.0,
            space_after: 12.0,
            ..Style::text(StyleName::Heading1, font_name, 18.0, 21.6)
        };
        let heading2 = Style {
            space_before: 6.0,
            space_after: 10.0,
            ..Style::text(StyleName::Heading2, font_name, 14.0, 16.8)
        };
        let body = Style {
            space_after: 6.0,
            ..Style::text(StyleName::Body, font_name, 11.0, 16.0)
        };
        let code = Style {
            left_indent: 36.0,
            ..Style::text(StyleName::Code, MONOSPACE_FONT, 8.0, 8.8)
        };

        Self {
            title,
            heading1,
            heading2,
            body,
            code,
        }
    }

    /// Look up a style by name.
    pub fn get(&self, name: StyleName) -> &Style {
        match name {
            StyleName::Title => &self.title,
            StyleName::Heading1 => &self.heading1,
            StyleName::Heading2 => &self.heading2,
            StyleName::Body => &self.body,
            StyleName::Code => &self.code,
        }
    }

    /// The text font every non-code style uses.
    pub fn text_font(&self) -> &str {
        &self.body.font_name
    }

    /// Iterate over all styles.
    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        StyleName::ALL.into_iter().map(move |name| self.get(name))
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new("Helvetica")
    }
}
