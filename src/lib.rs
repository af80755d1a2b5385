// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchState)
    clippy::module_name_repetitions
)]

//! # mdpage
//!
//! An interactive terminal pager for rendered markdown.
//!
//! mdpage renders markdown for the terminal and lets you read it with:
//! - Outline folding by heading level
//! - Smart-case search with match markers
//! - A filterable table of contents
//! - A breadcrumb of the section being read
//!
//! ## Architecture
//!
//! The renderer is a black box: it turns markdown into ANSI text at a width.
//! Everything the pager knows about structure comes from the raw source
//! (headings) and from finding those headings again in the rendered output.
//!
//! The pager uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Headings, rendered lines and display rows
//! - [`render`]: Markdown to terminal text
//! - [`search`]: Smart-case search over rendered lines
//! - [`ui`]: Terminal UI components
//! - [`highlight`]: Syntax highlighting
//! - [`source`]: Reading input and choosing the output mode
//! - [`config`]: Saved default flags

pub mod app;
pub mod config;
pub mod document;
pub mod highlight;
pub mod perf;
pub mod render;
pub mod search;
pub mod source;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, view_markdown};
    pub use crate::render::{RenderOptions, Renderer, StyleMode, TerminalRenderer};
    pub use crate::ui::viewport::Viewport;
}
