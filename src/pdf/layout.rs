//! Page layout: turns a story into positioned draw items.

use super::text::{break_lines, Line, Shaper, TextFormat, TokenStream};
use super::PageSetup;
use crate::error::{Error, Result};
use crate::font::{Face, FontRegistry};
use crate::model::{
    Alignment, Color, LayoutNode, Paragraph, StyleName, StyleSheet, Table, VerticalAlignment,
};

/// Tab stop width of preformatted text, in columns.
const TAB_WIDTH: usize = 8;

/// Share of the font size kept below the baseline of a line.
const DESCENT_RATIO: f32 = 0.25;

/// Line height of table cells relative to the font size.
const CELL_LEADING: f32 = 1.2;

const EPSILON: f32 = 0.01;

/// Stroke attributes of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// A positioned drawing operation in page coordinates (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    /// Text drawn from a baseline origin
    Text {
        x: f32,
        y: f32,
        face: Face,
        size: f32,
        color: Color,
        text: String,
    },
    /// Rectangle with optional fill and outline
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
}

/// The draw items of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub items: Vec<DrawItem>,
}

impl PageLayout {
    fn new(setup: &PageSetup) -> Self {
        Self {
            width: setup.width,
            height: setup.height,
            items: Vec::new(),
        }
    }

    /// Concatenated text of the page in drawing order.
    pub fn text(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| match item {
                DrawItem::Text { text, .. } => Some(text.as_str()),
                DrawItem::Rect { .. } => None,
            })
            .collect()
    }
}

/// Places story nodes onto pages top to bottom.
pub(crate) struct LayoutEngine<'a> {
    setup: &'a PageSetup,
    styles: &'a StyleSheet,
    shaper: Shaper<'a>,
    pages: Vec<PageLayout>,
    page: PageLayout,
    /// Top of the free area on the current page
    cursor: f32,
    page_has_content: bool,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(setup: &'a PageSetup, styles: &'a StyleSheet, registry: &'a FontRegistry) -> Self {
        Self {
            setup,
            styles,
            shaper: Shaper::new(registry),
            pages: Vec::new(),
            page: PageLayout::new(setup),
            cursor: setup.frame_top(),
            page_has_content: false,
        }
    }

    /// Lay out every node and return the finished pages.
    pub fn run<'n>(mut self, nodes: impl IntoIterator<Item = &'n LayoutNode>) -> Result<Vec<PageLayout>> {
        for node in nodes {
            match node {
                LayoutNode::Paragraph(p) => self.paragraph(p),
                LayoutNode::Spacer { height } => self.spacer(*height),
                LayoutNode::Table(table) => self.table(table)?,
                LayoutNode::Preformatted { text, style } => self.preformatted(text, *style),
                LayoutNode::PageBreak => {
                    if self.page_has_content {
                        self.new_page();
                    }
                }
            }
        }
        self.pages.push(self.page);
        log::debug!("laid out {} pages", self.pages.len());
        Ok(self.pages)
    }

    fn new_page(&mut self) {
        let page = std::mem::replace(&mut self.page, PageLayout::new(self.setup));
        self.pages.push(page);
        self.cursor = self.setup.frame_top();
        self.page_has_content = false;
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.setup.frame_bottom()
    }

    /// Start a new page unless `height` fits or the page is still empty.
    fn ensure_room(&mut self, height: f32) {
        if self.page_has_content && height > self.remaining() + EPSILON {
            self.new_page();
        }
    }

    fn spacer(&mut self, height: f32) {
        if !self.page_has_content {
            return;
        }
        self.cursor -= height;
        if self.cursor < self.setup.frame_bottom() {
            self.new_page();
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        let styles = self.styles;
        let style = styles.get(paragraph.style);
        let width = self.setup.frame_width() - style.left_indent;
        let stream = self.shaper.tokenize_inline(&paragraph.text, style);
        let lines = break_lines(&stream, width);

        if self.page_has_content {
            self.cursor -= style.space_before;
        }
        let x = self.setup.margin_left + style.left_indent;
        for line in &lines {
            let height = style.leading.max(self.shaper.max_size(line) * CELL_LEADING);
            self.ensure_room(height);
            let baseline = self.cursor - height + DESCENT_RATIO * self.line_size(line, style.font_size);
            self.draw_line(line, x, baseline);
            self.cursor -= height;
            self.page_has_content = true;
        }
        self.cursor -= style.space_after;
    }

    fn preformatted(&mut self, text: &str, style_name: StyleName) {
        let styles = self.styles;
        let style = styles.get(style_name);
        let format = TextFormat::from_style(style);
        let x = self.setup.margin_left + style.left_indent;

        for raw in text.trim_end_matches(['\n', '\r']).split('\n') {
            let expanded = expand_tabs(raw.trim_end_matches('\r'));
            let line = self.shaper.shape_verbatim(&expanded, &format);
            self.ensure_room(style.leading);
            let baseline = self.cursor - style.leading + DESCENT_RATIO * style.font_size;
            self.draw_line(&line, x, baseline);
            self.cursor -= style.leading;
            self.page_has_content = true;
        }
        self.cursor -= style.space_after;
    }

    fn line_size(&self, line: &Line, default: f32) -> f32 {
        let size = self.shaper.max_size(line);
        if size > 0.0 {
            size
        } else {
            default
        }
    }

    fn draw_line(&mut self, line: &Line, x: f32, baseline: f32) {
        for fragment in self.shaper.fragments(line) {
            let format = self.shaper.format(fragment.format);
            self.page.items.push(DrawItem::Text {
                x: x + fragment.x,
                y: baseline,
                face: format.face.clone(),
                size: format.size,
                color: format.color,
                text: fragment.text,
            });
        }
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        if let Some((row, cells)) = table.first_ragged_row() {
            return Err(Error::Render(format!(
                "table row {} has {} cells, expected {}",
                row + 1,
                cells,
                table.column_count()
            )));
        }
        let style = &table.style;
        let pad_x = style.padding_x;

        let mut cells: Vec<Vec<TokenStream>> = Vec::with_capacity(table.row_count());
        for (r, row) in table.rows.iter().enumerate() {
            let format = TextFormat {
                font_name: self.styles.text_font().to_string(),
                size: style.font_size(r),
                bold: false,
                italic: false,
                color: style.text_color(r),
            };
            let mut shaped = Vec::with_capacity(row.len());
            for cell in row {
                shaped.push(self.shaper.tokenize(cell, &format));
            }
            cells.push(shaped);
        }

        let columns = table.column_count();
        let mut natural = vec![0.0f32; columns];
        let mut minimum = vec![0.0f32; columns];
        for row in &cells {
            for (c, stream) in row.iter().enumerate() {
                natural[c] = natural[c].max(stream.natural_width() + 2.0 * pad_x);
                minimum[c] = minimum[c].max(stream.min_width() + 2.0 * pad_x);
            }
        }
        let widths = fit_columns(&natural, &minimum, self.setup.frame_width());
        let table_width: f32 = widths.iter().sum();
        let left = self.setup.margin_left + (self.setup.frame_width() - table_width).max(0.0) / 2.0;

        for (r, row) in cells.iter().enumerate() {
            let size = style.font_size(r);
            let leading = size * CELL_LEADING;
            let top_pad = style.padding_y;
            let bottom_pad = style.bottom_padding(r);

            let wrapped: Vec<Vec<Line>> = row
                .iter()
                .zip(&widths)
                .map(|(stream, w)| break_lines(stream, (w - 2.0 * pad_x).max(0.0)))
                .collect();
            let text_height = wrapped
                .iter()
                .map(|lines| lines.len() as f32 * leading)
                .fold(0.0, f32::max);
            let row_height = top_pad + text_height + bottom_pad;

            if row_height > self.setup.frame_height() + EPSILON {
                return Err(Error::Render(format!(
                    "table row {} is {:.1}pt tall and does not fit on a page ({:.1}pt)",
                    r + 1,
                    row_height,
                    self.setup.frame_height()
                )));
            }
            self.ensure_room(row_height);

            let row_bottom = self.cursor - row_height;
            if style.is_shaded(r) {
                self.page.items.push(DrawItem::Rect {
                    x: left,
                    y: row_bottom,
                    width: table_width,
                    height: row_height,
                    fill: Some(style.header_background),
                    stroke: None,
                });
            }

            let mut x = left;
            for (lines, width) in wrapped.iter().zip(&widths) {
                let block = lines.len() as f32 * leading;
                let free = row_height - top_pad - bottom_pad - block;
                let offset = match style.vertical_alignment {
                    VerticalAlignment::Top => top_pad,
                    VerticalAlignment::Middle => top_pad + free / 2.0,
                    VerticalAlignment::Bottom => top_pad + free,
                };
                let mut line_top = self.cursor - offset;
                for line in lines {
                    let line_x = match style.alignment {
                        Alignment::Left => x + pad_x,
                        Alignment::Center => x + (width - line.width) / 2.0,
                        Alignment::Right => x + width - pad_x - line.width,
                    };
                    let baseline = line_top - leading + DESCENT_RATIO * size;
                    self.draw_line(line, line_x, baseline);
                    line_top -= leading;
                }
                if style.grid_width > 0.0 {
                    self.page.items.push(DrawItem::Rect {
                        x,
                        y: row_bottom,
                        width: *width,
                        height: row_height,
                        fill: None,
                        stroke: Some(Stroke {
                            color: style.grid_color,
                            width: style.grid_width,
                        }),
                    });
                }
                x += width;
            }

            self.cursor = row_bottom;
            self.page_has_content = true;
        }
        Ok(())
    }
}

/// Column widths within `available`.
///
/// Natural widths are used when they fit. Otherwise every column keeps its
/// minimum and the remaining space is shared in proportion to how much each
/// column would like to grow. When even the minimums do not fit they are
/// scaled down and long words break between characters.
pub fn fit_columns(natural: &[f32], minimum: &[f32], available: f32) -> Vec<f32> {
    let total_natural: f32 = natural.iter().sum();
    if total_natural <= available {
        return natural.to_vec();
    }
    let total_min: f32 = minimum.iter().sum();
    if total_min >= available || total_natural - total_min <= EPSILON {
        let scale = if total_min > 0.0 { available / total_min } else { 0.0 };
        return minimum.iter().map(|m| m * scale).collect();
    }
    let share = (available - total_min) / (total_natural - total_min);
    natural
        .iter()
        .zip(minimum)
        .map(|(n, m)| m + (n - m) * share)
        .collect()
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let spaces = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}
