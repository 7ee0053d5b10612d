//! HTML tree walker producing the story.
//!
//! The walker visits the parsed HTML in document order and appends layout
//! nodes to a [`Story`]. It never fails: unknown tags fall through to a
//! recursive descent that keeps any orphan text as body paragraphs.

mod inline;

pub use inline::build_inline_text;

use crate::html::HtmlNode;
use crate::model::{LayoutNode, StyleName, Story, Table, CM};

/// Glyph prefixed to unordered list items.
pub const BULLET: &str = "• ";

/// Options for building the story.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Prefix ordered list items with their number (`"1. "`).
    ///
    /// Off by default: ordered lists render like unordered lists without
    /// a bullet.
    pub number_ordered_lists: bool,

    /// Keep `br` elements as forced line breaks (`<br/>`).
    ///
    /// Off by default: a `br` contributes no text, and the line's newline
    /// is collapsed like any other whitespace.
    pub keep_line_breaks: bool,
}

impl WalkOptions {
    /// Create new walk options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable ordered list numbering.
    pub fn with_list_numbering(mut self, number: bool) -> Self {
        self.number_ordered_lists = number;
        self
    }

    /// Enable or disable forced line breaks.
    pub fn with_line_breaks(mut self, keep: bool) -> Self {
        self.keep_line_breaks = keep;
        self
    }
}

/// Block-level handling selected by tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// `h1`..`h3`, mapped to a heading style
    Heading(StyleName),
    /// `p`
    Paragraph,
    /// `ul`
    UnorderedList,
    /// `ol`
    OrderedList,
    /// `table`
    Table,
    /// `pre` or a top-level `code`
    Preformatted,
    /// `hr`
    HorizontalRule,
    /// Anything else: recurse into children
    Container,
}

impl BlockTag {
    /// Classify a tag name (case-insensitive).
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "h1" => BlockTag::Heading(StyleName::Title),
            "h2" => BlockTag::Heading(StyleName::Heading1),
            "h3" => BlockTag::Heading(StyleName::Heading2),
            "p" => BlockTag::Paragraph,
            "ul" => BlockTag::UnorderedList,
            "ol" => BlockTag::OrderedList,
            "table" => BlockTag::Table,
            "pre" | "code" => BlockTag::Preformatted,
            "hr" => BlockTag::HorizontalRule,
            _ => BlockTag::Container,
        }
    }
}

/// Space emitted after a heading of the given style.
pub fn heading_spacing(style: StyleName) -> f32 {
    match style {
        StyleName::Title => 0.5 * CM,
        StyleName::Heading1 => 0.3 * CM,
        _ => 0.2 * CM,
    }
}

/// Space after lists.
pub const LIST_SPACING: f32 = 0.2 * CM;
/// Space after tables and preformatted blocks.
pub const BLOCK_SPACING: f32 = 0.3 * CM;
/// Space standing in for a horizontal rule.
pub const RULE_SPACING: f32 = 0.5 * CM;

/// Builds a story from an HTML tree.
#[derive(Debug, Clone, Default)]
pub struct StoryBuilder {
    options: WalkOptions,
}

impl StoryBuilder {
    /// Create a story builder.
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    /// Walk a whole tree into a new story.
    pub fn build(&self, root: &HtmlNode) -> Story {
        let mut story = Story::new();
        self.walk(root, &mut story);
        log::debug!("built story with {} nodes", story.len());
        story
    }

    /// Append the layout nodes for `node` to `story`.
    pub fn walk(&self, node: &HtmlNode, story: &mut Story) {
        let tag = match node {
            HtmlNode::Element { tag, .. } => tag,
            HtmlNode::Text(text) => {
                push_orphan_text(text, story);
                return;
            }
        };

        match BlockTag::from_tag(tag) {
            BlockTag::Heading(style) => {
                let text = node.text_content();
                story.push(LayoutNode::paragraph(text.trim(), style));
                story.push(LayoutNode::spacer(heading_spacing(style)));
            }
            BlockTag::Paragraph => {
                let text = build_inline_text(node.children(), self.options.keep_line_breaks);
                if !text.is_blank() {
                    story.push(LayoutNode::paragraph(text, StyleName::Body));
                }
            }
            BlockTag::UnorderedList => self.walk_list(node, story, ListKind::Bullet),
            BlockTag::OrderedList => {
                let kind = if self.options.number_ordered_lists {
                    ListKind::Numbered(list_start(node))
                } else {
                    ListKind::Plain
                };
                self.walk_list(node, story, kind);
            }
            BlockTag::Table => {
                let rows = table_rows(node);
                if !rows.is_empty() {
                    story.push(LayoutNode::Table(Table::new(rows)));
                    story.push(LayoutNode::spacer(BLOCK_SPACING));
                }
            }
            BlockTag::Preformatted => {
                story.push(LayoutNode::Preformatted {
                    text: node.text_content(),
                    style: StyleName::Code,
                });
                story.push(LayoutNode::spacer(BLOCK_SPACING));
            }
            BlockTag::HorizontalRule => story.push(LayoutNode::spacer(RULE_SPACING)),
            BlockTag::Container => {
                for child in node.children() {
                    self.walk(child, story);
                }
            }
        }
    }

    fn walk_list(&self, node: &HtmlNode, story: &mut Story, kind: ListKind) {
        for (index, item) in node.children_by_tag(&["li"]).enumerate() {
            let mut text = build_inline_text(item.children(), self.options.keep_line_breaks);
            if text.is_blank() {
                continue;
            }
            match kind {
                ListKind::Bullet => text.prepend(BULLET),
                ListKind::Numbered(start) => {
                    text.prepend(&format!("{}. ", start + index as i64))
                }
                ListKind::Plain => {}
            }
            story.push(LayoutNode::paragraph(text, StyleName::Body));
        }
        story.push(LayoutNode::spacer(LIST_SPACING));
    }
}

#[derive(Debug, Clone, Copy)]
enum ListKind {
    Bullet,
    Plain,
    Numbered(i64),
}

fn list_start(node: &HtmlNode) -> i64 {
    node.attr("start")
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1)
}

fn push_orphan_text(text: &str, story: &mut Story) {
    let text = text.trim();
    if !text.is_empty() {
        story.push(LayoutNode::paragraph(text, StyleName::Body));
    }
}

/// Cell texts of every row in a table, header rows included.
fn table_rows(table: &HtmlNode) -> Vec<Vec<String>> {
    table
        .descendants_by_tag(&["tr"])
        .into_iter()
        .map(|tr| {
            tr.descendants_by_tag(&["td", "th"])
                .into_iter()
                .map(|cell| cell.text_content().trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}
