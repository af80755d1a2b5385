//! Viewport management for scrolling.
//!
//! The [`Viewport`] struct tracks the visible area of the display rows and
//! handles all scroll operations. Rows are display rows: rendered lines in
//! normal mode, heading lines in outline mode.

use std::ops::Range;

/// Rows taken by the header and footer bars.
pub const CHROME_ROWS: u16 = 2;

/// Columns taken by the marker gutter left of the text.
pub const GUTTER_WIDTH: u16 = 3;

/// Columns taken by the scrollbar right of the text.
pub const SCROLLBAR_WIDTH: u16 = 1;

/// Narrowest text column the layout will produce.
pub const MIN_TEXT_WIDTH: u16 = 10;

/// Manages the visible portion of the display rows.
///
/// The viewport tracks:
/// - Terminal dimensions (width, height), chrome included
/// - Current scroll offset (in display rows)
/// - Total number of display rows
///
/// The offset always stays within `0..=max_offset()`.
///
/// # Example
///
/// ```
/// use mdpage::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.page_size(), 22);
/// assert_eq!(vp.visible_range(), 0..22);
///
/// vp.scroll_by(10);
/// assert_eq!(vp.visible_range(), 10..32);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_rows: usize,
}

/// Scrollbar thumb geometry in content rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scrollbar {
    pub thumb_top: usize,
    pub thumb_size: usize,
}

impl Scrollbar {
    pub const fn is_thumb(&self, row: usize) -> bool {
        row >= self.thumb_top && row < self.thumb_top + self.thumb_size
    }
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Terminal width in columns
    /// * `height` - Terminal height in rows, header and footer included
    /// * `total_rows` - Number of display rows
    pub const fn new(width: u16, height: u16, total_rows: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_rows,
        }
    }

    /// Get the current scroll offset.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Get the terminal width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the terminal height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the number of display rows.
    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Rows available for content.
    pub fn page_size(&self) -> usize {
        usize::from(self.height.saturating_sub(CHROME_ROWS)).max(1)
    }

    /// Width of the text column between gutter and scrollbar.
    pub fn text_width(&self) -> u16 {
        self.width
            .saturating_sub(GUTTER_WIDTH + SCROLLBAR_WIDTH)
            .max(MIN_TEXT_WIDTH)
    }

    /// Calculate the maximum valid offset.
    pub fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(self.page_size())
    }

    /// Get the range of visible display rows.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_rows);
        let end = (self.offset + self.page_size()).min(self.total_rows);
        start..end
    }

    /// Move by a signed number of rows, then clamp.
    pub fn scroll_by(&mut self, delta: isize) {
        let target = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        self.set_offset(target);
    }

    /// Scroll up one page.
    pub fn page_up(&mut self) {
        self.scroll_by(-to_delta(self.page_size()));
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_by(to_delta(self.page_size()));
    }

    /// Scroll up half a page (at least one row).
    pub fn half_page_up(&mut self) {
        self.scroll_by(-to_delta((self.page_size() / 2).max(1)));
    }

    /// Scroll down half a page (at least one row).
    pub fn half_page_down(&mut self) {
        self.scroll_by(to_delta((self.page_size() / 2).max(1)));
    }

    /// Go to the beginning.
    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    /// Go to the end.
    pub fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Put `row` at the top of the content area, clamped.
    pub fn set_offset(&mut self, row: usize) {
        self.offset = row.min(self.max_offset());
    }

    /// Resize the terminal area.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    /// Update the number of display rows (fold change or re-render).
    pub fn set_total_rows(&mut self, total: usize) {
        self.total_rows = total;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    /// Scrollbar geometry, or `None` when everything fits.
    pub fn scrollbar(&self) -> Option<Scrollbar> {
        let visible = self.page_size();
        let total = self.total_rows;
        if total <= visible {
            return None;
        }

        let thumb_size = (visible * visible / total).clamp(1, visible);
        let max_offset = self.max_offset();
        let span = visible - thumb_size;
        let thumb_top = if max_offset > 0 && span > 0 {
            (self.offset * span / max_offset).min(span)
        } else {
            0
        };
        Some(Scrollbar {
            thumb_top,
            thumb_size,
        })
    }
}

fn to_delta(rows: usize) -> isize {
    isize::try_from(rows).unwrap_or(isize::MAX)
}
