//! JSON rendering of the story.

use crate::error::Result;
use crate::model::Story;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a story to JSON.
pub fn to_json(story: &Story, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(story)?,
        JsonFormat::Compact => serde_json::to_string(story)?,
    };
    Ok(json)
}

/// Parse a story back from JSON.
pub fn from_json(json: &str) -> Result<Story> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayoutNode, SpanKind, StyleName, Table};

    #[test]
    fn test_to_json_pretty() {
        let mut story = Story::new();
        story.push(LayoutNode::paragraph("Test", StyleName::Title));
        story.push(LayoutNode::spacer(14.0));

        let json = to_json(&story, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"type\": \"paragraph\""));
        assert!(json.contains("\"Title\""));
        assert!(json.contains("\"type\": \"spacer\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let mut story = Story::new();
        story.push(LayoutNode::PageBreak);

        let json = to_json(&story, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"page_break\""));
    }

    #[test]
    fn test_spans_serialize_as_list() {
        let mut story = Story::new();
        let mut text = crate::model::InlineText::plain("a ");
        text.push(SpanKind::Bold, "b");
        story.push(LayoutNode::paragraph(text, StyleName::Body));
        story.push(LayoutNode::Table(Table::from_strings([["A"], ["1"]])));

        let json = to_json(&story, JsonFormat::Compact).unwrap();
        assert!(json.contains("\"kind\":\"bold\""));
        assert_eq!(from_json(&json).unwrap(), story);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            from_json("{not json"),
            Err(crate::error::Error::Json(_))
        ));
    }
}
