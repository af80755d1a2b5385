//! Inline spans: collection from the comrak AST and word wrapping.

use comrak::nodes::{AstNode, NodeValue};
use unicode_width::UnicodeWidthStr;

/// RGB color carried by highlighted code spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Inline text attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
    /// Explicit foreground, set by the syntax highlighter
    pub fg: Option<Rgb>,
}

impl InlineStyle {
    pub fn code() -> Self {
        Self {
            code: true,
            ..Self::default()
        }
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineStyle::default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }

    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// Plain text of a node, with inline code kept in backticks.
pub fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_into(node, &mut text);
    text
}

fn extract_text_into<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => {
            text.push('`');
            text.push_str(&c.literal);
            text.push('`');
        }
        NodeValue::FootnoteReference(reference) => {
            text.push_str("[^");
            text.push_str(&reference.name);
            text.push(']');
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
        _ => {
            for child in node.children() {
                extract_text_into(child, text);
            }
        }
    }
}

/// Styled spans for the inline content of a block, skipping nested lists.
pub fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_into(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_into<'a>(node: &'a AstNode<'a>, style: InlineStyle, spans: &mut Vec<InlineSpan>) {
    let next = match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) => return,
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.as_str(), style));
            return;
        }
        NodeValue::Code(code) => {
            spans.push(InlineSpan::new(code.literal.as_str(), InlineStyle::code()));
            return;
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
            return;
        }
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { image.url.as_str() } else { alt.as_str() };
            spans.push(InlineSpan::new(format!("[Image: {label}]"), style));
            return;
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ", style));
            return;
        }
        NodeValue::Emph => InlineStyle {
            emphasis: true,
            ..style
        },
        NodeValue::Strong => InlineStyle {
            strong: true,
            ..style
        },
        NodeValue::Strikethrough => InlineStyle {
            strikethrough: true,
            ..style
        },
        NodeValue::Link(_) => InlineStyle { link: true, ..style },
        _ => style,
    };

    for child in node.children() {
        collect_into(child, next, spans);
    }
}

/// Word-wrap spans to `width` display columns.
///
/// The first output line starts with `prefix_first`, continuation lines with
/// `prefix_next`. Words longer than the width are left on their own line.
pub fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens = spans.iter().flat_map(split_words);

    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut current_width = start_line(&mut current, prefix_first);
    let mut has_word = false;

    for token in tokens {
        let token_width = token.width();
        let is_space = token.text().chars().all(char::is_whitespace);

        if has_word && current_width + token_width > width {
            trim_trailing_space(&mut current);
            lines.push(std::mem::take(&mut current));
            current_width = start_line(&mut current, prefix_next);
            has_word = false;
        }
        if is_space && !has_word {
            continue;
        }

        current_width += token_width;
        current.push(token);
        has_word = true;
    }

    trim_trailing_space(&mut current);
    lines.push(current);
    lines
}

fn start_line(current: &mut Vec<InlineSpan>, prefix: &str) -> usize {
    if prefix.is_empty() {
        return 0;
    }
    current.push(InlineSpan::plain(prefix));
    prefix.width()
}

fn trim_trailing_space(line: &mut Vec<InlineSpan>) {
    // Keep a lone prefix span even if it is all spaces
    while line.len() > 1 && line.last().is_some_and(|s| s.text().trim().is_empty()) {
        line.pop();
    }
}

/// Split a span into alternating runs of whitespace and non-whitespace.
fn split_words(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_space: Option<bool> = None;

    for ch in span.text().chars() {
        let is_space = ch.is_whitespace();
        if in_space.is_some_and(|state| state != is_space) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        in_space = Some(is_space);
    }
    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

pub fn spans_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

/// Cut spans down to at most `max_width` display columns.
pub fn truncate_spans(spans: &[InlineSpan], max_width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_width;
    for span in spans {
        if remaining == 0 {
            break;
        }
        let taken = truncate_text(span.text(), remaining);
        let taken_width = taken.width();
        if !taken.is_empty() {
            out.push(InlineSpan::new(taken, span.style()));
            remaining = remaining.saturating_sub(taken_width);
        }
        if taken_width < span.width() {
            break;
        }
    }
    out
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Vec<InlineSpan>]) -> Vec<String> {
        lines.iter().map(|l| spans_text(l)).collect()
    }

    #[test]
    fn test_wrap_breaks_at_word_boundaries() {
        let spans = vec![InlineSpan::plain("the quick brown fox jumps")];
        let lines = wrap_spans(&spans, 10, "", "");
        assert_eq!(texts(&lines), vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_applies_prefixes() {
        let spans = vec![InlineSpan::plain("alpha beta gamma")];
        let lines = wrap_spans(&spans, 10, "- ", "  ");
        assert_eq!(texts(&lines), vec!["- alpha", "  beta", "  gamma"]);
    }

    #[test]
    fn test_wrap_keeps_long_word_whole() {
        let spans = vec![InlineSpan::plain("a supercalifragilistic b")];
        let lines = wrap_spans(&spans, 6, "", "");
        assert_eq!(texts(&lines), vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_preserves_styles_across_lines() {
        let bold = InlineStyle {
            strong: true,
            ..InlineStyle::default()
        };
        let spans = vec![InlineSpan::plain("plain "), InlineSpan::new("bold words", bold)];
        let lines = wrap_spans(&spans, 8, "", "");
        assert_eq!(texts(&lines), vec!["plain", "bold", "words"]);
        assert!(lines[2][0].style().strong);
    }

    #[test]
    fn test_wrap_counts_wide_characters() {
        let spans = vec![InlineSpan::plain("日本 語")];
        let lines = wrap_spans(&spans, 4, "", "");
        assert_eq!(texts(&lines), vec!["日本", "語"]);
    }

    #[test]
    fn test_wrap_empty_input_keeps_prefix() {
        let lines = wrap_spans(&[], 10, "> ", "> ");
        assert_eq!(texts(&lines), vec!["> "]);
    }

    #[test]
    fn test_truncate_spans_stops_at_width() {
        let spans = vec![InlineSpan::plain("abc"), InlineSpan::plain("def")];
        assert_eq!(spans_text(&truncate_spans(&spans, 4)), "abcd");
    }

    #[test]
    fn test_truncate_text_respects_wide_chars() {
        assert_eq!(truncate_text("日本語", 5), "日本");
    }
}
