//! Statistics over a story.

use crate::model::{LayoutNode, Story};
use crate::walk::BULLET;
use serde::{Deserialize, Serialize};

/// Counts of the nodes and text in a story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryStats {
    /// Number of pages in the rendered document
    pub page_count: u32,

    /// Number of body paragraphs, list items included
    pub paragraph_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of bulleted list items
    pub list_item_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of preformatted blocks
    pub code_block_count: u32,

    /// Number of spacers
    pub spacer_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl StoryStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a story.
    pub fn from_story(story: &Story) -> Self {
        let mut stats = Self::new();
        for node in story {
            match node {
                LayoutNode::Paragraph(p) if p.is_heading() => stats.heading_count += 1,
                LayoutNode::Paragraph(p) => {
                    stats.paragraph_count += 1;
                    if p.plain_text().starts_with(BULLET) {
                        stats.list_item_count += 1;
                    }
                }
                LayoutNode::Table(_) => stats.table_count += 1,
                LayoutNode::Preformatted { .. } => stats.code_block_count += 1,
                LayoutNode::Spacer { .. } => stats.spacer_count += 1,
                LayoutNode::PageBreak => {}
            }
            stats.count_text(&node.plain_text());
        }
        stats
    }

    /// Record the number of rendered pages.
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.page_count = pages as u32;
        self
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
