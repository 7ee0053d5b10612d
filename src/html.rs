//! Owned, read-only HTML tree built with html5ever.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// A node of the parsed HTML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    /// Character data
    Text(String),

    /// An element with lower-case tag name
    Element {
        /// Tag name
        tag: String,
        /// Attributes in source order
        attrs: Vec<(String, String)>,
        /// Child nodes in document order
        children: Vec<HtmlNode>,
    },
}

impl HtmlNode {
    /// Create an element node.
    pub fn element(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Element {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            children,
        }
    }

    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        HtmlNode::Text(text.into())
    }

    /// Tag name for elements, `None` for text.
    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Element { tag, .. } => Some(tag),
            HtmlNode::Text(_) => None,
        }
    }

    /// Whether this is an element with the given tag.
    pub fn is_tag(&self, name: &str) -> bool {
        self.tag().is_some_and(|t| t.eq_ignore_ascii_case(name))
    }

    /// Child nodes (empty for text).
    pub fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Element { children, .. } => children,
            HtmlNode::Text(_) => &[],
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            HtmlNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            HtmlNode::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            HtmlNode::Text(text) => out.push_str(text),
            HtmlNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Direct element children with one of the given tags.
    pub fn children_by_tag<'a>(
        &'a self,
        tags: &'a [&'a str],
    ) -> impl Iterator<Item = &'a HtmlNode> + 'a {
        self.children()
            .iter()
            .filter(move |c| tags.iter().any(|t| c.is_tag(t)))
    }

    /// All descendant elements with one of the given tags, in document order.
    pub fn descendants_by_tag<'a>(&'a self, tags: &[&str]) -> Vec<&'a HtmlNode> {
        let mut found = Vec::new();
        for child in self.children() {
            child.collect_by_tag(tags, &mut found);
        }
        found
    }

    fn collect_by_tag<'a>(&'a self, tags: &[&str], found: &mut Vec<&'a HtmlNode>) {
        if tags.iter().any(|t| self.is_tag(t)) {
            found.push(self);
        }
        for child in self.children() {
            child.collect_by_tag(tags, found);
        }
    }
}

/// Parse an HTML fragment and return its `<body>` element.
///
/// Parsing never fails; malformed markup is repaired the way browsers do.
pub fn parse_fragment(html: &str) -> HtmlNode {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    find_body(&dom.document)
        .and_then(|body| convert(&body))
        .unwrap_or_else(|| HtmlNode::element("body", Vec::new()))
}

fn find_body(handle: &Handle) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = handle.data {
        if &*name.local == "body" {
            return Some(handle.clone());
        }
    }
    handle.children.borrow().iter().find_map(find_body)
}

fn convert(handle: &Handle) -> Option<HtmlNode> {
    match handle.data {
        NodeData::Text { ref contents } => Some(HtmlNode::Text(contents.borrow().to_string())),
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();
            let children = handle.children.borrow().iter().filter_map(convert).collect();
            Some(HtmlNode::Element {
                tag: name.local.to_string().to_ascii_lowercase(),
                attrs,
                children,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_returns_body() {
        let body = parse_fragment("<h1>Title</h1>\n<p>Hello <strong>world</strong>.</p>\n");
        assert!(body.is_tag("body"));
        let tags: Vec<_> = body.children().iter().filter_map(|c| c.tag()).collect();
        assert_eq!(tags, ["h1", "p"]);
    }

    #[test]
    fn test_text_content() {
        let body = parse_fragment("<p>a <b>b</b> <i>c</i></p>");
        assert_eq!(body.children()[0].text_content(), "a b c");
    }

    #[test]
    fn test_entities_decoded() {
        let body = parse_fragment("<p>a &lt; b &amp; c</p>");
        assert_eq!(body.children()[0].text_content(), "a < b & c");
    }

    #[test]
    fn test_attributes() {
        let body = parse_fragment("<ol start=\"3\"><li>x</li></ol>");
        let ol = &body.children()[0];
        assert_eq!(ol.attr("start"), Some("3"));
        assert_eq!(ol.attr("missing"), None);
    }

    #[test]
    fn test_descendants_by_tag() {
        let body = parse_fragment(
            "<table><thead><tr><th>A</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>",
        );
        let table = &body.children()[0];
        let rows = table.descendants_by_tag(&["tr"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].descendants_by_tag(&["td", "th"]).len(), 1);
    }

    #[test]
    fn test_children_by_tag() {
        let node = HtmlNode::element(
            "ul",
            vec![
                HtmlNode::text("\n"),
                HtmlNode::element("li", vec![HtmlNode::text("a")]),
                HtmlNode::element("LI", vec![HtmlNode::text("b")]),
            ],
        );
        assert_eq!(node.children_by_tag(&["li"]).count(), 2);
    }

    #[test]
    fn test_comments_dropped() {
        let body = parse_fragment("<p>x<!-- hidden --></p>");
        assert_eq!(body.children()[0].children().len(), 1);
    }
}
