//! Block layout: walks the comrak AST and produces styled, wrapped lines.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use unicode_width::UnicodeWidthStr;

use super::RenderError;
use super::inline::{
    InlineSpan, InlineStyle, collect_inline_spans, spans_text, truncate_spans, wrap_spans,
};
use super::table::render_table;
use crate::highlight::{Background, highlight_code};

/// Right padding inside code block frames.
const CODE_RIGHT_PADDING: usize = 3;

/// What kind of block a line belongs to; drives its base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Paragraph,
    ListItem,
    CodeBlock,
    BlockQuote,
    Table,
    Rule,
    Blank,
}

/// One output line before it is turned into ANSI text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub kind: LineKind,
    pub spans: Vec<InlineSpan>,
}

impl StyledLine {
    fn new(kind: LineKind, spans: Vec<InlineSpan>) -> Self {
        Self { kind, spans }
    }

    fn text(kind: LineKind, text: impl Into<String>) -> Self {
        Self::new(kind, vec![InlineSpan::plain(text)])
    }

    const fn blank() -> Self {
        Self {
            kind: LineKind::Blank,
            spans: Vec::new(),
        }
    }

    pub fn content(&self) -> String {
        spans_text(&self.spans)
    }
}

/// Accumulates laid-out lines for one document at one width.
pub struct BlockWriter {
    lines: Vec<StyledLine>,
    width: usize,
    background: Background,
}

impl BlockWriter {
    pub fn new(width: usize, background: Background) -> Self {
        Self {
            lines: Vec::new(),
            width: width.max(1),
            background,
        }
    }

    /// Lines written so far, without trailing blank lines.
    pub fn finish(mut self) -> Vec<StyledLine> {
        while self.lines.last().is_some_and(|l| l.kind == LineKind::Blank) {
            self.lines.pop();
        }
        self.lines
    }

    /// Separate the next block from whatever came before it.
    fn separate(&mut self) {
        if self.lines.last().is_some_and(|l| l.kind != LineKind::Blank) {
            self.lines.push(StyledLine::blank());
        }
    }

    fn push_wrapped(&mut self, kind: LineKind, spans: &[InlineSpan], first: &str, next: &str) {
        for line in wrap_spans(spans, self.width, first, next) {
            self.lines.push(StyledLine::new(kind, line));
        }
    }

    pub fn node<'a>(&mut self, node: &'a AstNode<'a>, depth: usize) -> Result<(), RenderError> {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                self.separate();
                let mut spans = vec![InlineSpan::plain(format!(
                    "{} ",
                    "#".repeat(usize::from(heading.level))
                ))];
                spans.extend(collect_inline_spans(node));
                self.push_wrapped(LineKind::Heading(heading.level), &spans, "", "");
                self.separate();
            }

            NodeValue::Paragraph => {
                self.push_wrapped(LineKind::Paragraph, &collect_inline_spans(node), "", "");
                self.separate();
            }

            NodeValue::CodeBlock(code) => {
                let language = code.info.split_whitespace().next();
                self.code_block(language, &code.literal)?;
                self.separate();
            }

            NodeValue::HtmlBlock(html) => {
                for line in html.literal.lines() {
                    self.lines.push(StyledLine::text(LineKind::Paragraph, line));
                }
                self.separate();
            }

            NodeValue::List(list) => {
                let number_width = (list.start + node.children().count().saturating_sub(1))
                    .to_string()
                    .len();
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                for (index, item) in node.children().enumerate() {
                    let marker = match (&item.data.borrow().value, list.list_type) {
                        (NodeValue::TaskItem(checked), _) => {
                            (if checked.is_some() { "✓ " } else { "□ " }).to_string()
                        }
                        (_, ListType::Bullet) => "• ".to_string(),
                        (_, ListType::Ordered) => format!(
                            "{:>number_width$}{delimiter} ",
                            list.start + index
                        ),
                    };
                    self.list_item(item, depth, &marker)?;
                }
                if depth == 0 {
                    self.separate();
                }
            }

            NodeValue::BlockQuote => {
                self.block_quote(node, 1);
                self.separate();
            }

            NodeValue::ThematicBreak => {
                self.lines
                    .push(StyledLine::text(LineKind::Rule, "─".repeat(self.width.min(80))));
                self.separate();
            }

            NodeValue::Table(_) => {
                for line in render_table(node, self.width) {
                    self.lines.push(StyledLine::text(LineKind::Table, line));
                }
                self.separate();
            }

            NodeValue::FootnoteDefinition(def) => {
                let label = format!("[^{}]: ", def.name);
                let indent = " ".repeat(label.width());
                self.push_wrapped(LineKind::Paragraph, &collect_inline_spans(node), &label, &indent);
                self.separate();
            }

            _ => {
                for child in node.children() {
                    self.node(child, depth)?;
                }
            }
        }
        Ok(())
    }

    fn list_item<'a>(
        &mut self,
        item: &'a AstNode<'a>,
        depth: usize,
        marker: &str,
    ) -> Result<(), RenderError> {
        let indent = "  ".repeat(depth);
        let first = format!("{indent}{marker}");
        let next = format!("{indent}{}", " ".repeat(marker.width()));
        let mut paragraphs = 0usize;

        for child in item.children() {
            let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
            let is_list = matches!(child.data.borrow().value, NodeValue::List(_));
            if is_paragraph {
                if paragraphs > 0 {
                    self.lines.push(StyledLine::blank());
                }
                let prefix = if paragraphs == 0 { &first } else { &next };
                self.push_wrapped(LineKind::ListItem, &collect_inline_spans(child), prefix, &next);
                paragraphs += 1;
            } else if is_list {
                self.node(child, depth + 1)?;
            } else {
                self.node(child, depth)?;
            }
        }

        if item.children().next().is_none() {
            self.push_wrapped(LineKind::ListItem, &[], &first, &next);
        }
        Ok(())
    }

    fn block_quote<'a>(&mut self, node: &'a AstNode<'a>, level: usize) {
        let prefix = format!("  {}", "│ ".repeat(level));
        for child in node.children() {
            if matches!(child.data.borrow().value, NodeValue::BlockQuote) {
                self.block_quote(child, level + 1);
                continue;
            }
            let spans = collect_inline_spans(child);
            self.push_wrapped(LineKind::BlockQuote, &spans, &prefix, &prefix);
        }
    }

    fn code_block(&mut self, language: Option<&str>, literal: &str) -> Result<(), RenderError> {
        let content_width = literal
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .min(self.width.saturating_sub(4 + CODE_RIGHT_PADDING).max(1));
        let inner_width = content_width + 1 + CODE_RIGHT_PADDING;

        let label: String = format!(" {} ", language.unwrap_or("code"))
            .chars()
            .take(inner_width)
            .collect();
        self.lines.push(StyledLine::text(
            LineKind::CodeBlock,
            format!("┌{label}{}┐", "─".repeat(inner_width.saturating_sub(label.width()))),
        ));

        for spans in highlight_code(language, literal, self.background)? {
            let body = truncate_spans(&spans, content_width);
            let used: usize = body.iter().map(InlineSpan::width).sum();
            let mut line = vec![InlineSpan::plain("│ ")];
            line.extend(body);
            line.push(InlineSpan::new(
                " ".repeat(content_width - used.min(content_width) + CODE_RIGHT_PADDING),
                InlineStyle::default(),
            ));
            line.push(InlineSpan::plain("│"));
            self.lines.push(StyledLine::new(LineKind::CodeBlock, line));
        }

        self.lines.push(StyledLine::text(
            LineKind::CodeBlock,
            format!("└{}┘", "─".repeat(inner_width)),
        ));
        Ok(())
    }
}
