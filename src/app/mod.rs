//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod toc;
mod update;

pub use input::{WHEEL_ROWS, handle_event, handle_key, handle_mouse};
pub use model::{Model, STATUS_TIMEOUT, SearchPrompt, StatusMessage};
pub use toc::TocState;
pub use update::{Message, UNFOLD_STATUS, update};

use std::io::Write;

use crate::render::{RenderOptions, Renderer, TerminalRenderer};

/// Main application struct: the document to page and how to render it.
pub struct App {
    title: String,
    source: String,
    options: RenderOptions,
    renderer: Box<dyn Renderer>,
}

impl App {
    /// Create a pager for markdown `source`, rendered with the built-in
    /// terminal renderer.
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            options: RenderOptions::default(),
            renderer: Box::new(TerminalRenderer),
        }
    }

    /// Set the style and fixed width used for rendering.
    pub const fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the renderer.
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }
}

/// Page `source` interactively on `sink`, blocking until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up on `sink`. Render
/// failures are shown in the pager instead.
pub fn view_markdown<W: Write>(
    title: &str,
    source: &str,
    options: RenderOptions,
    sink: W,
) -> anyhow::Result<()> {
    App::new(title, source).with_options(options).run(sink)
}
