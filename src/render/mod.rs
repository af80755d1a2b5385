//! Markdown to terminal text.
//!
//! The pager treats the renderer as a black box: markdown and a width go in,
//! ANSI-styled text comes out. [`TerminalRenderer`] is the built-in
//! implementation, laying out the comrak AST and highlighting fenced code
//! with syntect.

mod ansi;
mod blocks;
mod inline;
mod table;

use comrak::nodes::AstNode;
use comrak::{Arena, Options, parse_document};

pub use ansi::Palette;
pub use blocks::{LineKind, StyledLine};
pub use inline::{InlineSpan, InlineStyle, Rgb};

use crate::highlight::Background;
use blocks::BlockWriter;

/// Width used when none was requested.
pub const DEFAULT_WIDTH: u16 = 80;

/// Color scheme selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StyleMode {
    /// Detect from the terminal
    #[default]
    Auto,
    Dark,
    Light,
}

impl StyleMode {
    /// Resolve to a concrete background, consulting the environment for `Auto`.
    pub fn background(self) -> Background {
        match self {
            Self::Auto => Background::from_env(),
            Self::Dark => Background::Dark,
            Self::Light => Background::Light,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl std::str::FromStr for StyleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown style '{other}' (expected auto, dark or light)")),
        }
    }
}

/// Options passed to every render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub style: StyleMode,
    /// Wrap width in columns; 0 lets the caller pick
    pub width: u16,
}

impl RenderOptions {
    pub const fn with_width(self, width: u16) -> Self {
        Self {
            style: self.style,
            width,
        }
    }
}

/// Errors a renderer can report.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to format rendered output")]
    Format(#[from] std::fmt::Error),
    #[error("syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Something that turns markdown into terminal text.
///
/// Output must be deterministic for identical source and options.
pub trait Renderer {
    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, RenderError>;
}

/// Renders markdown as ANSI-styled, word-wrapped text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, RenderError> {
        let _scope = crate::perf::scope("render.markdown");
        let width = if options.width == 0 {
            DEFAULT_WIDTH
        } else {
            options.width
        };
        let background = options.style.background();

        let arena = Arena::new();
        let root = parse_markdown(&arena, source);
        let mut writer = BlockWriter::new(usize::from(width), background);
        writer.node(root, 0)?;

        let palette = Palette::for_background(background);
        let mut out = String::new();
        for line in writer.finish() {
            ansi::write_line(&mut out, &line, &palette)?;
            out.push('\n');
        }
        Ok(out)
    }
}

/// Parse markdown with the GFM extensions the layout understands.
pub(crate) fn parse_markdown<'a>(arena: &'a Arena<AstNode<'a>>, source: &str) -> &'a AstNode<'a> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    parse_document(arena, source, &options)
}
