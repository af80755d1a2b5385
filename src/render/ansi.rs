//! Turning styled lines into ANSI text.
//!
//! Colors follow the terminal palette where possible so the output blends in
//! with the user's theme; only highlighted code carries RGB colors.

use std::fmt::Write;

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};

use super::blocks::{LineKind, StyledLine};
use super::inline::InlineStyle;
use crate::highlight::Background;

/// Base styles for each kind of rendered block.
#[derive(Debug, Clone)]
pub struct Palette {
    headings: [ContentStyle; 6],
    code: ContentStyle,
    inline_code: ContentStyle,
    quote: ContentStyle,
    link: Color,
    rule: ContentStyle,
    table: ContentStyle,
}

fn styled(fg: Color, attributes: &[Attribute]) -> ContentStyle {
    let mut style = ContentStyle {
        foreground_color: Some(fg),
        ..ContentStyle::default()
    };
    for attribute in attributes {
        style.attributes.set(*attribute);
    }
    style
}

impl Palette {
    pub fn for_background(background: Background) -> Self {
        match background {
            Background::Dark => Self::dark(),
            Background::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            headings: [
                styled(Color::Cyan, &[Attribute::Bold, Attribute::Underlined]),
                styled(Color::Green, &[Attribute::Bold]),
                styled(Color::Yellow, &[Attribute::Bold]),
                styled(Color::Blue, &[Attribute::Bold]),
                styled(Color::Magenta, &[Attribute::Bold]),
                styled(Color::Cyan, &[Attribute::Bold]),
            ],
            code: styled(Color::AnsiValue(245), &[]),
            inline_code: styled(Color::Red, &[Attribute::Bold]),
            quote: styled(Color::Blue, &[Attribute::Italic]),
            link: Color::Blue,
            rule: styled(Color::AnsiValue(240), &[]),
            table: styled(Color::AnsiValue(250), &[]),
        }
    }

    pub fn light() -> Self {
        Self {
            headings: [
                styled(Color::AnsiValue(24), &[Attribute::Bold, Attribute::Underlined]),
                styled(Color::AnsiValue(22), &[Attribute::Bold]),
                styled(Color::AnsiValue(58), &[Attribute::Bold]),
                styled(Color::AnsiValue(25), &[Attribute::Bold]),
                styled(Color::AnsiValue(54), &[Attribute::Bold]),
                styled(Color::AnsiValue(24), &[Attribute::Bold]),
            ],
            code: styled(Color::AnsiValue(238), &[]),
            inline_code: styled(Color::AnsiValue(88), &[Attribute::Bold]),
            quote: styled(Color::AnsiValue(24), &[Attribute::Italic]),
            link: Color::AnsiValue(25),
            rule: styled(Color::AnsiValue(245), &[]),
            table: styled(Color::AnsiValue(238), &[]),
        }
    }

    fn base(&self, kind: LineKind) -> ContentStyle {
        match kind {
            LineKind::Heading(level) => {
                let idx = usize::from(level.clamp(1, 6)) - 1;
                self.headings[idx]
            }
            LineKind::CodeBlock => self.code,
            LineKind::BlockQuote => self.quote,
            LineKind::Rule => self.rule,
            LineKind::Table => self.table,
            LineKind::Paragraph | LineKind::ListItem | LineKind::Blank => ContentStyle::default(),
        }
    }

    fn span_style(&self, base: ContentStyle, inline: InlineStyle) -> ContentStyle {
        let mut style = base;
        if let Some(fg) = inline.fg {
            style.foreground_color = Some(Color::Rgb {
                r: fg.r,
                g: fg.g,
                b: fg.b,
            });
        } else if inline.code && base == ContentStyle::default() {
            style = self.inline_code;
        }
        if inline.emphasis {
            style.attributes.set(Attribute::Italic);
        }
        if inline.strong {
            style.attributes.set(Attribute::Bold);
        }
        if inline.strikethrough {
            style.attributes.set(Attribute::CrossedOut);
        }
        if inline.link {
            style.attributes.set(Attribute::Underlined);
            if inline.fg.is_none() {
                style.foreground_color = Some(self.link);
            }
        }
        style
    }
}

/// Append one line of ANSI text to `out`, without a trailing newline.
pub fn write_line(out: &mut String, line: &StyledLine, palette: &Palette) -> std::fmt::Result {
    let base = palette.base(line.kind);
    for span in &line.spans {
        if span.text().is_empty() {
            continue;
        }
        let style = palette.span_style(base, span.style());
        if style == ContentStyle::default() {
            out.push_str(span.text());
        } else {
            write!(out, "{}", StyledContent::new(style, span.text()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::strip_ansi;
    use crate::render::{InlineSpan, Rgb};

    fn line(kind: LineKind, spans: Vec<InlineSpan>) -> StyledLine {
        StyledLine { kind, spans }
    }

    #[test]
    fn test_plain_paragraph_has_no_escapes() {
        let mut out = String::new();
        let l = line(LineKind::Paragraph, vec![InlineSpan::plain("hello")]);
        write_line(&mut out, &l, &Palette::dark()).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn test_heading_is_styled_but_strips_back_to_text() {
        let mut out = String::new();
        let l = line(LineKind::Heading(2), vec![InlineSpan::plain("## Title")]);
        write_line(&mut out, &l, &Palette::dark()).unwrap();
        assert!(out.contains('\x1b'));
        assert_eq!(strip_ansi(&out), "## Title");
    }

    #[test]
    fn test_rgb_foreground_is_emitted() {
        let mut out = String::new();
        let style = InlineStyle {
            fg: Some(Rgb { r: 1, g: 2, b: 3 }),
            ..InlineStyle::code()
        };
        let l = line(LineKind::CodeBlock, vec![InlineSpan::new("x", style)]);
        write_line(&mut out, &l, &Palette::light()).unwrap();
        assert!(out.contains("38;2;1;2;3"), "{out:?}");
    }

    #[test]
    fn test_inline_code_in_paragraph_uses_code_color() {
        let palette = Palette::dark();
        let style = palette.span_style(ContentStyle::default(), InlineStyle::code());
        assert_eq!(style.foreground_color, Some(Color::Red));
    }

    #[test]
    fn test_heading_levels_clamp() {
        let palette = Palette::dark();
        assert_eq!(palette.base(LineKind::Heading(9)), palette.base(LineKind::Heading(6)));
    }
}
