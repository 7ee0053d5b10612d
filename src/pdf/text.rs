//! Text shaping and greedy line breaking.

use crate::font::{BuiltinFont, Face, FontId, FontRegistry};
use crate::model::{Color, InlineText, SpanKind, Style, INLINE_CODE_SIZE, MONOSPACE_FONT};
use std::collections::HashSet;

/// Characters that must not start a line.
const NO_LINE_START: &str = "、。，．・：；？！゛゜ヽヾゝゞ々ー）］｝」』】〕〉》〙〗〟’”｠»\
    ぁぃぅぇぉっゃゅょゎァィゥェォッャュョヮヵヶ‐…‥,.:;!?)]}";

/// Characters that must not end a line.
const NO_LINE_END: &str = "（［｛「『【〔〈《〘〖〝‘“｟«([{";

/// Whether a character is set ideographically (breakable on either side).
pub fn is_cjk(ch: char) -> bool {
    matches!(ch as u32,
        0x3000..=0x303F
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7AF
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFFEF
        | 0x20000..=0x2FFFF)
}

/// Whether a line may break between `prev` and `next` without whitespace.
pub fn can_break_between(prev: char, next: char) -> bool {
    (is_cjk(prev) || is_cjk(next)) && !NO_LINE_START.contains(next) && !NO_LINE_END.contains(prev)
}

/// Requested font attributes of a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFormat {
    pub font_name: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
}

impl TextFormat {
    /// The format of plain text in a style.
    pub fn from_style(style: &Style) -> Self {
        Self {
            font_name: style.font_name.clone(),
            size: style.font_size,
            bold: false,
            italic: false,
            color: style.color,
        }
    }

    /// The format of a span inside a paragraph of `style`.
    pub fn for_span(style: &Style, kind: SpanKind) -> Self {
        let base = Self::from_style(style);
        match kind {
            SpanKind::Bold => Self { bold: true, ..base },
            SpanKind::Italic => Self { italic: true, ..base },
            SpanKind::Code => Self {
                font_name: MONOSPACE_FONT.to_string(),
                size: INLINE_CODE_SIZE,
                ..base
            },
            SpanKind::Text | SpanKind::LineBreak => base,
        }
    }
}

/// A resolved face at a size and colour.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFormat {
    pub face: Face,
    pub size: f32,
    pub color: Color,
}

/// A character placed in a resolved format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedChar {
    pub ch: char,
    /// Index into the shaper's formats
    pub format: usize,
    /// Advance in points
    pub width: f32,
}

/// Input of the tokenizer.
#[derive(Debug, Clone, Copy)]
pub enum Token {
    /// An unbreakable run of characters
    Word(usize, usize),
    /// Collapsed whitespace
    Space(ShapedChar),
    /// Forced line break
    Break,
}

/// Tokens referencing a shared character buffer.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    chars: Vec<ShapedChar>,
    tokens: Vec<Token>,
}

impl TokenStream {
    fn word(&self, start: usize, end: usize) -> &[ShapedChar] {
        &self.chars[start..end]
    }

    /// Widest unbreakable word in points.
    pub fn min_width(&self) -> f32 {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word(s, e) => Some(self.word(*s, *e).iter().map(|c| c.width).sum()),
                _ => None,
            })
            .fold(0.0, f32::max)
    }

    /// Width of the longest line when nothing wraps.
    pub fn natural_width(&self) -> f32 {
        break_lines(self, f32::INFINITY)
            .iter()
            .map(|l| l.width)
            .fold(0.0, f32::max)
    }
}

/// A laid out line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub chars: Vec<ShapedChar>,
    pub width: f32,
}

impl Line {
    fn push(&mut self, ch: ShapedChar) {
        self.width += ch.width;
        self.chars.push(ch);
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// A run of characters sharing one format within a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub format: usize,
    /// Offset from the line start in points
    pub x: f32,
}

/// Maps characters to faces and measures them.
#[derive(Debug)]
pub struct Shaper<'a> {
    registry: &'a FontRegistry,
    formats: Vec<RunFormat>,
    warned: HashSet<char>,
}

impl<'a> Shaper<'a> {
    pub fn new(registry: &'a FontRegistry) -> Self {
        Self {
            registry,
            formats: Vec::new(),
            warned: HashSet::new(),
        }
    }

    pub fn format(&self, index: usize) -> &RunFormat {
        &self.formats[index]
    }

    fn intern(&mut self, format: RunFormat) -> usize {
        if let Some(i) = self.formats.iter().position(|f| *f == format) {
            return i;
        }
        self.formats.push(format);
        self.formats.len() - 1
    }

    fn primary_face(&self, format: &TextFormat) -> Face {
        self.registry
            .face(&format.font_name, format.bold, format.italic)
            .unwrap_or_else(|| Face {
                font: FontId::Builtin(BuiltinFont::Helvetica.variant(format.bold, format.italic)),
                synthetic_bold: false,
                synthetic_italic: false,
            })
    }

    /// Resolve the face for one character, falling back to the embedded
    /// font and finally to `?`.
    pub fn shape(&mut self, ch: char, format: &TextFormat) -> ShapedChar {
        let primary = self.primary_face(format);
        let (face, ch) = if self.registry.can_encode(&primary.font, ch) {
            (primary, ch)
        } else if let Some(fallback) = self
            .registry
            .fallback_face(format.bold, format.italic)
            .filter(|f| self.registry.can_encode(&f.font, ch))
        {
            (fallback, ch)
        } else {
            if self.warned.insert(ch) {
                log::warn!("no font can display {:?} (U+{:04X}), using '?'", ch, ch as u32);
            }
            (primary, '?')
        };
        let width = self.registry.advance(&face.font, ch).unwrap_or(0.0) * format.size / 1000.0;
        let format = self.intern(RunFormat {
            face,
            size: format.size,
            color: format.color,
        });
        ShapedChar { ch, format, width }
    }

    /// Tokenize paragraph text set in `style`.
    pub fn tokenize_inline(&mut self, text: &InlineText, style: &Style) -> TokenStream {
        let mut builder = TokenBuilder::default();
        for span in text.spans() {
            if span.kind == SpanKind::LineBreak {
                builder.line_break();
                continue;
            }
            let format = TextFormat::for_span(style, span.kind);
            for ch in span.text.chars() {
                builder.push(self, ch, &format);
            }
        }
        builder.finish()
    }

    /// Tokenize plain text in one format.
    pub fn tokenize(&mut self, text: &str, format: &TextFormat) -> TokenStream {
        let mut builder = TokenBuilder::default();
        for ch in text.chars() {
            builder.push(self, ch, format);
        }
        builder.finish()
    }

    /// Shape a line verbatim: no collapsing, no wrapping.
    pub fn shape_verbatim(&mut self, text: &str, format: &TextFormat) -> Line {
        let mut line = Line::default();
        for ch in text.chars().filter(|c| !c.is_control()) {
            let shaped = self.shape(ch, format);
            line.push(shaped);
        }
        line
    }

    /// Split a line into runs of equal format.
    pub fn fragments(&self, line: &Line) -> Vec<Fragment> {
        let mut fragments: Vec<Fragment> = Vec::new();
        let mut x = 0.0;
        for c in &line.chars {
            match fragments.last_mut() {
                Some(last) if last.format == c.format => last.text.push(c.ch),
                _ => fragments.push(Fragment {
                    text: c.ch.to_string(),
                    format: c.format,
                    x,
                }),
            }
            x += c.width;
        }
        fragments
    }

    /// Largest font size used on a line.
    pub fn max_size(&self, line: &Line) -> f32 {
        line.chars
            .iter()
            .map(|c| self.formats[c.format].size)
            .fold(0.0, f32::max)
    }
}

#[derive(Default)]
struct TokenBuilder {
    stream: TokenStream,
    word_start: Option<usize>,
}

impl TokenBuilder {
    fn end_word(&mut self) {
        if let Some(start) = self.word_start.take() {
            let end = self.stream.chars.len();
            self.stream.tokens.push(Token::Word(start, end));
        }
    }

    fn line_break(&mut self) {
        self.end_word();
        self.stream.tokens.push(Token::Break);
    }

    fn push(&mut self, shaper: &mut Shaper<'_>, ch: char, format: &TextFormat) {
        if ch.is_whitespace() && ch != '\u{A0}' {
            self.end_word();
            if matches!(self.stream.tokens.last(), Some(Token::Word(..))) {
                let space = shaper.shape(' ', format);
                self.stream.tokens.push(Token::Space(space));
            }
            return;
        }
        if ch.is_control() {
            return;
        }

        if self.word_start.is_some() {
            let prev = self.stream.chars.last().map(|c| c.ch);
            if prev.is_some_and(|prev| can_break_between(prev, ch)) {
                self.end_word();
            }
        }
        let shaped = shaper.shape(ch, format);
        if self.word_start.is_none() {
            self.word_start = Some(self.stream.chars.len());
        }
        self.stream.chars.push(shaped);
    }

    fn finish(mut self) -> TokenStream {
        self.end_word();
        self.stream
    }
}

/// Greedy line breaking at spaces and word boundaries.
///
/// Words wider than `max_width` are split between characters.
pub fn break_lines(stream: &TokenStream, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();
    let mut pending: Option<ShapedChar> = None;

    for token in &stream.tokens {
        match *token {
            Token::Break => {
                lines.push(std::mem::take(&mut line));
                pending = None;
            }
            Token::Space(space) => {
                if !line.is_empty() {
                    pending = Some(space);
                }
            }
            Token::Word(start, end) => {
                let word = stream.word(start, end);
                let word_width: f32 = word.iter().map(|c| c.width).sum();
                let space_width = pending.map_or(0.0, |s| s.width);
                if !line.is_empty() && line.width + space_width + word_width > max_width {
                    lines.push(std::mem::take(&mut line));
                    pending = None;
                }
                if let Some(space) = pending.take() {
                    line.push(space);
                }
                for &c in word {
                    if !line.is_empty() && line.width + c.width > max_width {
                        lines.push(std::mem::take(&mut line));
                    }
                    line.push(c);
                }
            }
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StyleName, StyleSheet};

    fn helvetica(size: f32) -> TextFormat {
        TextFormat {
            font_name: "Helvetica".into(),
            size,
            bold: false,
            italic: false,
            color: Color::BLACK,
        }
    }

    fn text_of(line: &Line) -> String {
        line.chars.iter().map(|c| c.ch).collect()
    }

    #[test]
    fn test_headings_use_regular_weight() {
        let sheet = StyleSheet::new("Japanese");
        for name in [StyleName::Title, StyleName::Heading1, StyleName::Heading2] {
            let format = TextFormat::from_style(sheet.get(name));
            assert_eq!(format.font_name, "Japanese");
            assert!(!format.bold);
        }
        assert!(TextFormat::for_span(sheet.get(StyleName::Title), SpanKind::Bold).bold);
    }

    #[test]
    fn test_whitespace_collapses() {
        let registry = FontRegistry::new();
        let mut shaper = Shaper::new(&registry);
        let stream = shaper.tokenize("  a \n\t b  ", &helvetica(10.0));
        let lines = break_lines(&stream, 1000.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "a b");
    }

    #[test]
    fn test_wraps_at_spaces() {
        let registry = FontRegistry::new();
        let mut shaper = Shaper::new(&registry);
        // "aaaa" at 10pt is 4 * 5.56 = 22.24pt wide.
        let stream = shaper.tokenize("aaaa aaaa aaaa", &helvetica(10.0));
        let lines = break_lines(&stream, 50.0);
        let texts: Vec<_> = lines.iter().map(text_of).collect();
        assert_eq!(texts, ["aaaa aaaa", "aaaa"]);
        assert!(lines.iter().all(|l| l.width <= 50.0));
    }

    #[test]
    fn test_long_word_is_split() {
        let registry = FontRegistry::new();
        let mut shaper = Shaper::new(&registry);
        let stream = shaper.tokenize("aaaaaaaaaa", &helvetica(10.0));
        let lines = break_lines(&stream, 20.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.iter().map(text_of).collect::<String>(), "aaaaaaaaaa");
    }

    #[test]
    fn test_cjk_break_opportunities() {
        assert!(can_break_between('日', '本'));
        assert!(can_break_between('a', '日'));
        assert!(!can_break_between('a', 'b'));
        assert!(!can_break_between('日', '。'));
        assert!(!can_break_between('「', '日'));
        assert!(is_cjk('ア'));
        assert!(!is_cjk('é'));
    }

    #[test]
    fn test_unencodable_becomes_question_mark() {
        let registry = FontRegistry::new();
        let mut shaper = Shaper::new(&registry);
        let shaped = shaper.shape('日', &helvetica(10.0));
        assert_eq!(shaped.ch, '?');
        assert!((shaped.width - 5.56).abs() < 0.01);
    }

    #[test]
    fn test_line_break_and_fragments() {
        let registry = FontRegistry::new();
        let mut shaper = Shaper::new(&registry);
        let sheet = StyleSheet::default();
        let mut text = InlineText::plain("Hello ");
        text.push(SpanKind::Bold, "world");
        text.push_line_break();
        text.push(SpanKind::Code, "x");

        let stream = shaper.tokenize_inline(&text, sheet.get(StyleName::Body));
        let lines = break_lines(&stream, 1000.0);
        assert_eq!(lines.len(), 2);

        let fragments = shaper.fragments(&lines[0]);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "Hello ");
        assert_eq!(fragments[1].text, "world");
        assert_eq!(
            shaper.format(fragments[1].format).face.font,
            FontId::Builtin(BuiltinFont::HelveticaBold)
        );

        let code = shaper.format(lines[1].chars[0].format);
        assert_eq!(code.face.font, FontId::Builtin(BuiltinFont::Courier));
        assert_eq!(code.size, INLINE_CODE_SIZE);
        assert_eq!(shaper.max_size(&lines[1]), INLINE_CODE_SIZE);
    }

    #[test]
    fn test_empty_text_yields_one_empty_line() {
        let registry = FontRegistry::new();
        let mut shaper = Shaper::new(&registry);
        let stream = shaper.tokenize("", &helvetica(10.0));
        let lines = break_lines(&stream, 100.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
        assert_eq!(stream.natural_width(), 0.0);
    }

    #[test]
    fn test_min_and_natural_width() {
        let registry = FontRegistry::new();
        let mut shaper = Shaper::new(&registry);
        let stream = shaper.tokenize("aa aaaa", &helvetica(10.0));
        assert!((stream.min_width() - 22.24).abs() < 0.01);
        assert!((stream.natural_width() - (6.0 * 5.56 + 2.78)).abs() < 0.01);
    }
}
