//! Document model types for the story.
//!
//! This module defines the intermediate representation that bridges the
//! HTML walker and the PDF emitter: styles, inline spans, tables and the
//! ordered story of layout nodes.

mod paragraph;
mod story;
mod style;
mod table;

pub use paragraph::{InlineSpan, InlineText, Paragraph, SpanKind};
pub use story::{LayoutNode, Story};
pub use style::{Color, Style, StyleName, StyleSheet, CM, INLINE_CODE_SIZE, MONOSPACE_FONT};
pub use table::{Alignment, Table, TableStyle, VerticalAlignment};
