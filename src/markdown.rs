//! Markdown to HTML conversion.

use pulldown_cmark::{html, Event, Options, Parser};

/// Markdown extensions enabled for conversion.
///
/// Fenced code blocks are part of CommonMark and need no flag.
pub fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options
}

/// Convert Markdown source to an HTML fragment.
///
/// Every soft line break becomes a hard break (`<br />`), so single
/// newlines inside a paragraph are kept as line breaks.
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, markdown_options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}
