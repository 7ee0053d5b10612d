//! Inline content of paragraphs and list items.

use crate::html::HtmlNode;
use crate::model::{InlineText, SpanKind};

/// Inline formatting recognised on a direct child element.
fn span_kind(tag: &str, line_breaks: bool) -> SpanKind {
    match tag {
        "b" | "strong" => SpanKind::Bold,
        "i" | "em" => SpanKind::Italic,
        "code" => SpanKind::Code,
        "br" if line_breaks => SpanKind::LineBreak,
        _ => SpanKind::Text,
    }
}

/// Build inline text from the direct children of a paragraph or list item.
///
/// Formatted children contribute their whole text content as one span, so
/// nested formatting is flattened (`**a *b***` is bold "a b"). Block
/// elements nested inside are flattened to their text the same way, and a
/// `br` contributes nothing unless `line_breaks` is set.
pub fn build_inline_text(children: &[HtmlNode], line_breaks: bool) -> InlineText {
    let mut text = InlineText::new();
    for child in children {
        match child {
            HtmlNode::Text(literal) => text.push(SpanKind::Text, literal.as_str()),
            HtmlNode::Element { tag, .. } => match span_kind(tag, line_breaks) {
                SpanKind::LineBreak => text.push_line_break(),
                kind => text.push(kind, child.text_content()),
            },
        }
    }
    text
}
