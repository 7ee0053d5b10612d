//! The story: ordered layout nodes produced by the walker.

use super::{InlineText, Paragraph, StyleName, Table};
use serde::{Deserialize, Serialize};

/// A renderer-level instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNode {
    /// Styled paragraph of inline text
    Paragraph(Paragraph),

    /// Vertical whitespace
    Spacer {
        /// Height in points
        height: f32,
    },

    /// Table of plain-text cells
    Table(Table),

    /// Verbatim text block
    Preformatted {
        /// Text with line breaks preserved
        text: String,
        /// Style the block is set in
        style: StyleName,
    },

    /// Forced page break
    PageBreak,
}

impl LayoutNode {
    /// Create a paragraph node.
    pub fn paragraph(text: impl Into<InlineText>, style: StyleName) -> Self {
        LayoutNode::Paragraph(Paragraph::new(text, style))
    }

    /// Create a spacer node.
    pub fn spacer(height: f32) -> Self {
        LayoutNode::Spacer { height }
    }

    /// Short name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutNode::Paragraph(_) => "paragraph",
            LayoutNode::Spacer { .. } => "spacer",
            LayoutNode::Table(_) => "table",
            LayoutNode::Preformatted { .. } => "preformatted",
            LayoutNode::PageBreak => "page_break",
        }
    }

    /// Get plain text content of the node.
    pub fn plain_text(&self) -> String {
        match self {
            LayoutNode::Paragraph(p) => p.plain_text(),
            LayoutNode::Table(t) => t.plain_text(),
            LayoutNode::Preformatted { text, .. } => text.clone(),
            LayoutNode::Spacer { .. } | LayoutNode::PageBreak => String::new(),
        }
    }
}

/// Append-only sequence of layout nodes in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    nodes: Vec<LayoutNode>,
}

impl Story {
    /// Create an empty story.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node.
    pub fn push(&mut self, node: LayoutNode) {
        self.nodes.push(node);
    }

    /// The nodes in document order.
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// Iterate over the nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, LayoutNode> {
        self.nodes.iter()
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the story is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Text of the first Title paragraph, if any.
    pub fn title(&self) -> Option<String> {
        self.nodes.iter().find_map(|n| match n {
            LayoutNode::Paragraph(p) if p.style == StyleName::Title => {
                Some(p.plain_text().trim().to_string())
            }
            _ => None,
        })
    }

    /// Get plain text content of the entire story.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl<'a> IntoIterator for &'a Story {
    type Item = &'a LayoutNode;
    type IntoIter = std::slice::Iter<'a, LayoutNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
