//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position, page arithmetic and the scrollbar
//! - [`style`]: Chrome theming for dark and light terminals
//! - [`ansi`]: Decoding renderer output into ratatui spans

pub mod ansi;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{HELP_LINES, toc_body_lines, toc_filter_text, toc_footer_text};
pub use render::{Marker, marker_for, render};
pub use status::{HELP_HINT, footer_left_text, footer_right_text, header_label, header_right_text};
