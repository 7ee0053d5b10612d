//! Plain text rendering of the story.

use crate::model::{LayoutNode, Story};

/// Render a story as plain text, one block per node.
///
/// Spacers and page breaks produce no text; tables are tab separated.
pub fn to_text(story: &Story) -> String {
    story
        .iter()
        .filter_map(|node| match node {
            LayoutNode::Spacer { .. } | LayoutNode::PageBreak => None,
            LayoutNode::Preformatted { text, .. } => Some(text.trim_end().to_string()),
            other => Some(other.plain_text().trim().to_string()),
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StyleName, Table};

    #[test]
    fn test_to_text() {
        let mut story = Story::new();
        story.push(LayoutNode::paragraph("Hello, world!", StyleName::Title));
        story.push(LayoutNode::spacer(12.0));
        story.push(LayoutNode::paragraph("Second paragraph.", StyleName::Body));
        story.push(LayoutNode::Table(Table::from_strings([["A", "B"]])));
        story.push(LayoutNode::Preformatted {
            text: "  indented\n".into(),
            style: StyleName::Code,
        });

        assert_eq!(
            to_text(&story),
            "Hello, world!\n\nSecond paragraph.\n\nA\tB\n\n  indented"
        );
    }
}
