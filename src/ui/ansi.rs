//! Painting renderer output with ratatui.
//!
//! Rendered lines arrive as ANSI text. Only SGR sequences are decoded, and
//! only so the body can show the renderer's colors; other escape sequences
//! are dropped.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

const ESC: char = '\u{1b}';

/// Decode one line of ANSI text into styled spans.
pub fn line_spans(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut style = Style::default();
    let mut text = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ESC {
            text.push(c);
            continue;
        }
        if chars.peek() != Some(&'[') {
            continue;
        }
        chars.next();

        let mut params = String::new();
        let mut terminator = None;
        for next in chars.by_ref() {
            if ('\u{40}'..='\u{7e}').contains(&next) {
                terminator = Some(next);
                break;
            }
            params.push(next);
        }
        if terminator == Some('m') {
            let next_style = apply_sgr(style, &params);
            if next_style != style {
                if !text.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut text), style));
                }
                style = next_style;
            }
        }
    }

    if !text.is_empty() {
        spans.push(Span::styled(text, style));
    }
    spans
}

fn apply_sgr(mut style: Style, params: &str) -> Style {
    let codes: Vec<u16> = params
        .split(';')
        .map(|p| p.parse().unwrap_or(0))
        .collect();
    let mut iter = codes.into_iter();

    while let Some(code) = iter.next() {
        style = match code {
            0 => Style::default(),
            1 => style.add_modifier(Modifier::BOLD),
            2 => style.add_modifier(Modifier::DIM),
            3 => style.add_modifier(Modifier::ITALIC),
            4 => style.add_modifier(Modifier::UNDERLINED),
            7 => style.add_modifier(Modifier::REVERSED),
            9 => style.add_modifier(Modifier::CROSSED_OUT),
            22 => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style.remove_modifier(Modifier::ITALIC),
            24 => style.remove_modifier(Modifier::UNDERLINED),
            27 => style.remove_modifier(Modifier::REVERSED),
            29 => style.remove_modifier(Modifier::CROSSED_OUT),
            30..=37 => style.fg(basic_color(code - 30)),
            90..=97 => style.fg(basic_color(code - 90 + 8)),
            40..=47 => style.bg(basic_color(code - 40)),
            100..=107 => style.bg(basic_color(code - 100 + 8)),
            38 => match extended_color(&mut iter) {
                Some(color) => style.fg(color),
                None => style,
            },
            48 => match extended_color(&mut iter) {
                Some(color) => style.bg(color),
                None => style,
            },
            39 => Style { fg: None, ..style },
            49 => Style { bg: None, ..style },
            _ => style,
        };
    }
    style
}

/// `5;n` or `2;r;g;b` following a 38/48 code.
fn extended_color(iter: &mut impl Iterator<Item = u16>) -> Option<Color> {
    let channel = |v: Option<u16>| v.and_then(|v| u8::try_from(v).ok());
    match iter.next()? {
        5 => channel(iter.next()).map(Color::Indexed),
        2 => {
            let r = channel(iter.next())?;
            let g = channel(iter.next())?;
            let b = channel(iter.next())?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

const fn basic_color(index: u16) -> Color {
    match index {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        7 => Color::Gray,
        8 => Color::DarkGray,
        9 => Color::LightRed,
        10 => Color::LightGreen,
        11 => Color::LightYellow,
        12 => Color::LightBlue,
        13 => Color::LightMagenta,
        14 => Color::LightCyan,
        _ => Color::White,
    }
}

/// Truncate or pad spans so they cover exactly `width` columns.
pub fn fit_width(spans: Vec<Span<'static>>, width: usize) -> Vec<Span<'static>> {
    let mut out = Vec::with_capacity(spans.len() + 1);
    let mut used = 0usize;
    let mut full = false;

    for span in spans {
        let mut kept = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                full = true;
                break;
            }
            kept.push(c);
            used += w;
        }
        if !kept.is_empty() {
            out.push(Span::styled(kept, span.style));
        }
        if full {
            break;
        }
    }

    if used < width {
        out.push(Span::raw(" ".repeat(width - used)));
    }
    out
}

/// Cut `text` to `width` columns, ending with `...` when it was cut.
pub fn truncate_end(text: &str, width: usize) -> String {
    if unicode_width::UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_plain_text_is_one_unstyled_span() {
        let spans = line_spans("hello");
        assert_eq!(spans, vec![Span::raw("hello")]);
    }

    #[test]
    fn test_indexed_and_bold_sequences() {
        let spans = line_spans("\u{1b}[38;5;14m\u{1b}[1m# Title\u{1b}[0m tail");
        assert_eq!(text_of(&spans), "# Title tail");
        assert_eq!(spans[0].style.fg, Some(Color::Indexed(14)));
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[1].style, Style::default());
    }

    #[test]
    fn test_truecolor_foreground() {
        let spans = line_spans("\u{1b}[38;2;10;20;30mfn\u{1b}[39m");
        assert_eq!(spans[0].style.fg, Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn test_basic_colors_and_resets() {
        let spans = line_spans("\u{1b}[31;4mred\u{1b}[24mplain red\u{1b}[39mnone");
        assert_eq!(spans[0].style.fg, Some(Color::Red));
        assert!(spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(!spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(spans[1].style.fg, Some(Color::Red));
        assert_eq!(spans[2].style.fg, None);
    }

    #[test]
    fn test_non_sgr_sequences_and_lone_escape_are_dropped() {
        let spans = line_spans("a\u{1b}[2Kb\u{1b}c");
        assert_eq!(text_of(&spans), "abc");
    }

    #[test]
    fn test_fit_width_pads_short_lines() {
        let spans = fit_width(vec![Span::raw("ab")], 5);
        assert_eq!(text_of(&spans), "ab   ");
    }

    #[test]
    fn test_fit_width_truncates_across_spans() {
        let spans = fit_width(vec![Span::raw("abc"), Span::raw("def")], 4);
        assert_eq!(text_of(&spans), "abcd");
    }

    #[test]
    fn test_fit_width_does_not_split_wide_chars() {
        let spans = fit_width(vec![Span::raw("日本語")], 5);
        assert_eq!(text_of(&spans), "日本 ");
    }

    #[test]
    fn test_truncate_end() {
        assert_eq!(truncate_end("short", 10), "short");
        assert_eq!(truncate_end("a long title", 8), "a lon...");
        assert_eq!(truncate_end("abcdef", 2), "..");
    }
}
