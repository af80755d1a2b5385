//! Display rows: the sequence of rendered lines the viewport scrolls over.
//!
//! In normal mode every rendered line is a display row. In outline (fold)
//! mode only heading lines are, and each row maps back to the rendered line
//! of its heading.

use super::locator::HeadingLocation;

/// Maps display rows to rendered lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayIndex {
    /// Every rendered line is shown; row `i` is rendered line `i`.
    Identity(usize),
    /// Outline rows; strictly ascending rendered line indices.
    List(Vec<usize>),
}

impl Default for DisplayIndex {
    fn default() -> Self {
        Self::Identity(0)
    }
}

impl DisplayIndex {
    /// Build the display index for a fold level.
    ///
    /// Level 0 shows everything. Any other level keeps headings at or above
    /// that level, falling back to identity when none qualify.
    pub fn for_fold_level(fold_level: u8, locations: &[HeadingLocation], total_lines: usize) -> Self {
        if fold_level == 0 {
            return Self::Identity(total_lines);
        }
        let rows: Vec<usize> = locations
            .iter()
            .filter(|loc| loc.heading.level <= fold_level)
            .map(|loc| loc.rendered_line)
            .collect();
        if rows.is_empty() {
            Self::Identity(total_lines)
        } else {
            Self::List(rows)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Identity(size) => *size,
            Self::List(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn is_outline(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Rendered line shown at display row `row`, clamped into range.
    ///
    /// An empty index yields 0.
    pub fn at(&self, row: usize) -> usize {
        match self {
            Self::Identity(size) => row.min(size.saturating_sub(1)),
            Self::List(rows) => rows
                .get(row.min(rows.len().saturating_sub(1)))
                .copied()
                .unwrap_or(0),
        }
    }

    /// Display row whose rendered line is the last one at or before `line`.
    ///
    /// Lines before the first outline row map to row 0, which is how the
    /// reader's place survives switching into outline mode.
    pub fn row_for_rendered_line(&self, line: usize) -> usize {
        match self {
            Self::Identity(size) => line.min(size.saturating_sub(1)),
            Self::List(rows) => rows
                .partition_point(|&rendered| rendered <= line)
                .saturating_sub(1),
        }
    }

    /// Rendered lines covered by the display rows, in order.
    pub fn rendered_lines(&self) -> impl Iterator<Item = usize> + '_ {
        let (size, rows) = match self {
            Self::Identity(size) => (*size, None),
            Self::List(rows) => (rows.len(), Some(rows)),
        };
        (0..size).map(move |row| rows.map_or(row, |rows| rows[row]))
    }
}
