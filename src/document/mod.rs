//! Document structure and the coordinate spaces the pager moves between.
//!
//! This module handles:
//! - Extracting headings from raw markdown source
//! - Locating those headings in renderer output
//! - Mapping display rows (normal or outline) to rendered lines
//!
//! Three coordinate spaces are involved: source lines of the raw document,
//! rendered lines of the renderer output at one width, and display rows of
//! whatever the viewport currently scrolls over.

mod cache;
mod display;
mod headings;
mod locator;
mod rendered;

pub use cache::WidthCache;
pub use display::DisplayIndex;
pub use headings::{Heading, extract_headings, normalize_text};
pub(crate) use headings::source_lines;
pub use locator::{HeadingLocation, breadcrumb, current_heading_index, locate_headings};
pub use rendered::{RenderedDocument, split_lines, strip_ansi};

/// Source text up to and including `source_line`, newline-terminated.
///
/// Rendering this prefix tells how many rendered lines precede the end of
/// that source line at a given width.
pub fn source_prefix(source: &str, source_line: usize) -> String {
    let mut prefix = source_lines(source)
        .take(source_line + 1)
        .collect::<Vec<_>>()
        .join("\n");
    prefix.push('\n');
    prefix
}
