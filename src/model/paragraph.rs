//! Paragraph and inline span types.

use super::style::{StyleName, INLINE_CODE_SIZE, MONOSPACE_FONT};
use serde::{Deserialize, Serialize};

/// Inline formatting of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Plain text
    Text,
    /// Bold text (`b`, `strong`)
    Bold,
    /// Italic text (`i`, `em`)
    Italic,
    /// Monospace text (`code`)
    Code,
    /// Forced line break (`br`)
    LineBreak,
}

/// A run of literal text with one formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    /// Formatting of the run
    pub kind: SpanKind,

    /// Literal text, never markup
    pub text: String,
}

impl InlineSpan {
    /// Create a span.
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Create a line break span.
    pub fn line_break() -> Self {
        Self::new(SpanKind::LineBreak, "")
    }
}

/// Paragraph text as an ordered list of spans.
///
/// Literal text and formatting are kept apart, so rendering to markup
/// escapes every literal once and only the span boundaries become live
/// markers. Source text such as `<b>` can never turn into formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineText {
    spans: Vec<InlineSpan>,
}

impl InlineText {
    /// Create empty inline text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create inline text holding a single plain span.
    pub fn plain(text: impl Into<String>) -> Self {
        let mut t = Self::new();
        t.push(SpanKind::Text, text);
        t
    }

    /// Append a span. Adjacent plain spans are merged.
    pub fn push(&mut self, kind: SpanKind, text: impl Into<String>) {
        let text = text.into();
        if kind == SpanKind::Text {
            if let Some(last) = self.spans.last_mut() {
                if last.kind == SpanKind::Text {
                    last.text.push_str(&text);
                    return;
                }
            }
        }
        self.spans.push(InlineSpan { kind, text });
    }

    /// Append a forced line break.
    pub fn push_line_break(&mut self) {
        self.spans.push(InlineSpan::line_break());
    }

    /// Insert plain text before all spans.
    pub fn prepend(&mut self, text: &str) {
        match self.spans.first_mut() {
            Some(first) if first.kind == SpanKind::Text => first.text.insert_str(0, text),
            _ => self.spans.insert(0, InlineSpan::new(SpanKind::Text, text)),
        }
    }

    /// The spans in order.
    pub fn spans(&self) -> &[InlineSpan] {
        &self.spans
    }

    /// Text without any formatting; line breaks become `\n`.
    pub fn plain_text(&self) -> String {
        self.spans
            .iter()
            .map(|s| match s.kind {
                SpanKind::LineBreak => "\n",
                _ => s.text.as_str(),
            })
            .collect()
    }

    /// Whether the text is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }

    /// Render to the restricted markup vocabulary.
    ///
    /// Only `<b>`, `<i>`, `<font name="Courier" size="9">` and `<br/>` are
    /// emitted as live markup; `&`, `<` and `>` in literal text are escaped.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span.kind {
                SpanKind::Text => escape_into(&mut out, &span.text),
                SpanKind::Bold => {
                    out.push_str("<b>");
                    escape_into(&mut out, &span.text);
                    out.push_str("</b>");
                }
                SpanKind::Italic => {
                    out.push_str("<i>");
                    escape_into(&mut out, &span.text);
                    out.push_str("</i>");
                }
                SpanKind::Code => {
                    out.push_str(&format!(
                        "<font name=\"{}\" size=\"{}\">",
                        MONOSPACE_FONT, INLINE_CODE_SIZE
                    ));
                    escape_into(&mut out, &span.text);
                    out.push_str("</font>");
                }
                SpanKind::LineBreak => out.push_str("<br/>"),
            }
        }
        out
    }
}

impl From<&str> for InlineText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// A styled paragraph in the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph content
    pub text: InlineText,

    /// Style the paragraph is set in
    pub style: StyleName,
}

impl Paragraph {
    /// Create a paragraph.
    pub fn new(text: impl Into<InlineText>, style: StyleName) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.text.plain_text()
    }

    /// Markup form of the paragraph text.
    pub fn markup(&self) -> String {
        self.text.to_markup()
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(
            self.style,
            StyleName::Title | StyleName::Heading1 | StyleName::Heading2
        )
    }
}
