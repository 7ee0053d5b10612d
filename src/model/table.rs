//! Table types.

use super::style::Color;
use serde::{Deserialize, Serialize};

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

/// Vertical alignment for table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Top alignment
    Top,
    /// Middle/center alignment
    #[default]
    Middle,
    /// Bottom alignment
    Bottom,
}

/// Visual style of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStyle {
    /// Number of leading rows drawn as header
    pub header_rows: usize,

    /// Header background
    pub header_background: Color,

    /// Header text colour
    pub header_text: Color,

    /// Body text colour
    pub body_text: Color,

    /// Header font size in points
    pub header_font_size: f32,

    /// Body font size in points
    pub body_font_size: f32,

    /// Extra bottom padding of header cells in points
    pub header_bottom_padding: f32,

    /// Horizontal cell padding in points
    pub padding_x: f32,

    /// Vertical cell padding in points
    pub padding_y: f32,

    /// Grid line width in points (0 = no grid)
    pub grid_width: f32,

    /// Grid line colour
    pub grid_color: Color,

    /// Horizontal alignment of every cell
    pub alignment: Alignment,

    /// Vertical alignment of every cell
    pub vertical_alignment: VerticalAlignment,
}

impl TableStyle {
    /// Whether the given row is shaded as a header row.
    pub fn is_shaded(&self, row: usize) -> bool {
        row < self.header_rows
    }

    /// Font size for the given row.
    pub fn font_size(&self, row: usize) -> f32 {
        if self.is_shaded(row) {
            self.header_font_size
        } else {
            self.body_font_size
        }
    }

    /// Text colour for the given row.
    pub fn text_color(&self, row: usize) -> Color {
        if self.is_shaded(row) {
            self.header_text
        } else {
            self.body_text
        }
    }

    /// Bottom padding for the given row.
    pub fn bottom_padding(&self, row: usize) -> f32 {
        if self.is_shaded(row) {
            self.header_bottom_padding
        } else {
            self.padding_y
        }
    }
}

impl Default for TableStyle {
    /// Header row shaded, all cells gridlined, left aligned, vertically centred.
    fn default() -> Self {
        Self {
            header_rows: 1,
            header_background: Color::GREY,
            header_text: Color::WHITESMOKE,
            body_text: Color::BLACK,
            header_font_size: 11.0,
            body_font_size: 10.0,
            header_bottom_padding: 12.0,
            padding_x: 6.0,
            padding_y: 3.0,
            grid_width: 1.0,
            grid_color: Color::BLACK,
            alignment: Alignment::Left,
            vertical_alignment: VerticalAlignment::Middle,
        }
    }
}

/// A table of plain-text cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows of cell texts
    pub rows: Vec<Vec<String>>,

    /// Table style
    pub style: TableStyle,
}

impl Table {
    /// Create a table with the default style.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            style: TableStyle::default(),
        }
    }

    /// Create a table from string slices.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether every row has the same number of cells.
    pub fn is_rectangular(&self) -> bool {
        let columns = self.column_count();
        self.rows.iter().all(|r| r.len() == columns)
    }

    /// Index and length of the first row whose cell count differs from row 0.
    pub fn first_ragged_row(&self) -> Option<(usize, usize)> {
        let columns = self.column_count();
        self.rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns)
            .map(|(i, r)| (i, r.len()))
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let table = Table::from_strings([["A", "B"], ["1", "2"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert!(table.is_rectangular());
        assert_eq!(table.first_ragged_row(), None);
        assert_eq!(table.plain_text(), "A\tB\n1\t2");
    }

    #[test]
    fn test_header_shading_only_first_row() {
        let style = TableStyle::default();
        assert!(style.is_shaded(0));
        assert!(!style.is_shaded(1));
        assert_eq!(style.font_size(0), 11.0);
        assert_eq!(style.font_size(1), 10.0);
        assert_eq!(style.text_color(0), Color::WHITESMOKE);
        assert_eq!(style.bottom_padding(0), 12.0);
    }

    #[test]
    fn test_ragged_table() {
        let table = Table::new(vec![
            vec!["A".into(), "B".into()],
            vec!["1".into()],
        ]);
        assert!(!table.is_rectangular());
        assert_eq!(table.first_ragged_row(), Some((1, 1)));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }
}
