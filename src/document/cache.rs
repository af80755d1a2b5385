//! Width-keyed caches.
//!
//! Anything derived from rendered output is only valid for the width it was
//! rendered at. [`WidthCache`] makes that explicit: readers pass the current
//! width and get nothing back when it differs.

/// A value tagged with the render width it was computed for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidthCache<T> {
    valid_for_width: Option<u16>,
    data: T,
}

impl<T: Default> WidthCache<T> {
    pub fn new() -> Self {
        Self {
            valid_for_width: None,
            data: T::default(),
        }
    }

    /// The cached value, if it was computed for `width`.
    pub fn get(&self, width: u16) -> Option<&T> {
        (self.valid_for_width == Some(width)).then_some(&self.data)
    }

    /// Mutable access for `width`, resetting the value first if it was
    /// computed for another width.
    pub fn for_width(&mut self, width: u16) -> &mut T {
        if self.valid_for_width != Some(width) {
            self.data = T::default();
            self.valid_for_width = Some(width);
        }
        &mut self.data
    }

    /// Replace the value wholesale.
    pub fn store(&mut self, width: u16, data: T) {
        self.valid_for_width = Some(width);
        self.data = data;
    }

    pub const fn width(&self) -> Option<u16> {
        self.valid_for_width
    }

    pub fn is_valid_for(&self, width: u16) -> bool {
        self.valid_for_width == Some(width)
    }
}
