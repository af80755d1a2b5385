//! Syntax highlighting for fenced code blocks.
//!
//! Uses syntect for highlighting with Sublime Text syntax definitions.

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::render::{InlineSpan, InlineStyle, Rgb};

/// Terminal background the highlighting theme is picked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Dark,
    Light,
}

impl Background {
    /// Guess the background from the `COLORFGBG` environment variable.
    pub fn from_env() -> Self {
        background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }
}

/// Highlight `code` line by line.
///
/// Unknown languages fall back to plain code spans. Highlighting failures are
/// returned to the caller so the renderer can report them.
pub fn highlight_code(
    language: Option<&str>,
    code: &str,
    background: Background,
) -> Result<Vec<Vec<InlineSpan>>, syntect::Error> {
    let syntax_set = syntax_set();
    let syntax = language.and_then(|lang| {
        syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| syntax_set.find_syntax_by_name(lang))
    });

    let Some(syntax) = syntax else {
        return Ok(code
            .lines()
            .map(|line| vec![InlineSpan::new(line, InlineStyle::code())])
            .collect());
    };

    let mut highlighter = HighlightLines::new(syntax, theme(background));
    let mut lines = Vec::new();
    for line in code.lines() {
        let ranges = highlighter.highlight_line(line, syntax_set)?;
        let spans = ranges
            .into_iter()
            .map(|(style, text)| {
                let fg = Rgb {
                    r: style.foreground.r,
                    g: style.foreground.g,
                    b: style.foreground.b,
                };
                InlineSpan::new(
                    text,
                    InlineStyle {
                        fg: Some(adjust_fg_for_background(fg, background)),
                        ..InlineStyle::code()
                    },
                )
            })
            .collect();
        lines.push(spans);
    }

    Ok(lines)
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.syntax_set.load_defaults");
        SyntaxSet::load_defaults_newlines()
    })
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.theme.load_defaults");
        ThemeSet::load_defaults()
    })
}

fn theme(background: Background) -> &'static Theme {
    static DARK: OnceLock<Theme> = OnceLock::new();
    static LIGHT: OnceLock<Theme> = OnceLock::new();

    let (cell, preferred) = match background {
        Background::Dark => (
            &DARK,
            [
                "Monokai Extended",
                "base16-ocean.dark",
                "Solarized (dark)",
                "base16-eighties.dark",
            ]
            .as_slice(),
        ),
        Background::Light => (
            &LIGHT,
            ["InspiredGitHub", "Solarized (light)", "base16-ocean.light"].as_slice(),
        ),
    };

    cell.get_or_init(|| {
        let themes = &theme_set().themes;
        preferred
            .iter()
            .find_map(|name| themes.get(*name))
            .or_else(|| themes.values().next())
            .cloned()
            .unwrap_or_default()
    })
}

fn background_from_colorfgbg(colorfgbg: Option<&str>) -> Background {
    let Some(value) = colorfgbg else {
        return Background::Dark;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    match bg.parse::<u8>() {
        Ok(bg) if bg >= 7 => Background::Light,
        _ => Background::Dark,
    }
}

/// Darken bright theme colors so they stay readable on light backgrounds.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
fn adjust_fg_for_background(color: Rgb, background: Background) -> Rgb {
    if background == Background::Dark {
        return color;
    }
    let luma = 0.2126 * f32::from(color.r) + 0.7152 * f32::from(color.g) + 0.0722 * f32::from(color.b);
    if luma < 155.0 {
        return color;
    }
    let darken = |v: u8| (f32::from(v) * 0.42).round() as u8;
    Rgb {
        r: darken(color.r),
        g: darken(color.g),
        b: darken(color.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust_produces_colored_spans() {
        let code = "fn main() {\n    let x = 1;\n}\n";
        let lines = highlight_code(Some("rust"), code, Background::Dark).unwrap();

        assert_eq!(lines.len(), 3);
        let has_color = lines.iter().flatten().any(|span| span.style().fg.is_some());
        assert!(has_color, "Expected at least one colored span for Rust");
    }

    #[test]
    fn test_highlight_unknown_language_falls_back_to_plain() {
        let lines = highlight_code(Some("nope"), "just text", Background::Dark).unwrap();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].iter().all(|span| span.style().fg.is_none()));
        assert!(lines[0].iter().all(|span| span.style().code));
    }

    #[test]
    fn test_highlight_without_language_is_plain_code() {
        let lines = highlight_code(None, "a\nb", Background::Light).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1][0].text(), "b");
    }

    #[test]
    fn test_colorfgbg_dark_background() {
        assert_eq!(background_from_colorfgbg(Some("15;0")), Background::Dark);
        assert_eq!(background_from_colorfgbg(None), Background::Dark);
        assert_eq!(background_from_colorfgbg(Some("garbage")), Background::Dark);
    }

    #[test]
    fn test_colorfgbg_light_background() {
        assert_eq!(background_from_colorfgbg(Some("0;15")), Background::Light);
        assert_eq!(background_from_colorfgbg(Some("0;default;15")), Background::Light);
    }

    #[test]
    fn test_light_mode_darkens_bright_fg() {
        let bright = Rgb { r: 240, g: 230, b: 120 };
        let adjusted = adjust_fg_for_background(bright, Background::Light);
        assert!(adjusted.r < bright.r);
        assert!(adjusted.g < bright.g);
        assert!(adjusted.b < bright.b);
    }

    #[test]
    fn test_dark_mode_keeps_colors() {
        let bright = Rgb { r: 240, g: 230, b: 120 };
        assert_eq!(adjust_fg_for_background(bright, Background::Dark), bright);
    }
}
