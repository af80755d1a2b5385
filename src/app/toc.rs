//! Table-of-contents overlay state.

use std::collections::HashMap;

use crate::document::{Heading, WidthCache};
use crate::search::SmartCaseMatcher;

/// Overlay visibility, selection and filter, plus the jump cache used when
/// a heading has no location in the current render.
#[derive(Debug, Clone, Default)]
pub struct TocState {
    pub visible: bool,
    /// Index into the filtered heading list
    pub selected: usize,
    /// Committed filter
    pub filter: String,
    /// Filter being typed
    pub draft: String,
    pub filter_mode: bool,
    /// Heading source line -> rendered line, per render width
    jump_cache: WidthCache<HashMap<usize, usize>>,
}

impl TocState {
    /// The filter currently applied to the list, trimmed.
    pub fn active_filter(&self) -> &str {
        if self.filter_mode {
            self.draft.trim()
        } else {
            self.filter.trim()
        }
    }

    pub fn filtered<'a>(&self, headings: &'a [Heading]) -> Vec<&'a Heading> {
        let active = self.active_filter();
        if active.is_empty() {
            return headings.iter().collect();
        }
        let matcher = SmartCaseMatcher::new(active);
        headings.iter().filter(|h| matcher.is_match(&h.text)).collect()
    }

    pub fn selected_heading<'a>(&self, headings: &'a [Heading]) -> Option<&'a Heading> {
        self.filtered(headings).get(self.selected).copied()
    }

    pub fn clamp_selection(&mut self, headings: &[Heading]) {
        let last = self.filtered(headings).len().saturating_sub(1);
        self.selected = self.selected.min(last);
    }

    /// Select the entry for `source_line`, if the filtered list shows it.
    pub fn select_source_line(&mut self, headings: &[Heading], source_line: usize) {
        if let Some(idx) = self
            .filtered(headings)
            .iter()
            .position(|h| h.source_line == source_line)
        {
            self.selected = idx;
        }
    }

    pub fn move_by(&mut self, delta: isize, headings: &[Heading]) {
        self.selected = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta.unsigned_abs())
        };
        self.clamp_selection(headings);
    }

    pub fn select_last(&mut self, headings: &[Heading]) {
        self.selected = self.filtered(headings).len().saturating_sub(1);
    }

    pub fn start_filter(&mut self) {
        self.filter_mode = true;
        self.draft.clone_from(&self.filter);
    }

    pub fn set_draft(&mut self, draft: String, headings: &[Heading]) {
        self.draft = draft;
        self.clamp_selection(headings);
    }

    /// Commit the draft and select the first entry.
    pub fn apply_filter(&mut self) {
        self.filter_mode = false;
        self.filter = self.draft.trim().to_string();
        self.selected = 0;
    }

    /// Drop the draft, keeping the committed filter.
    pub fn cancel_filter(&mut self, headings: &[Heading]) {
        self.filter_mode = false;
        self.draft.clone_from(&self.filter);
        self.clamp_selection(headings);
    }

    pub fn cached_jump(&self, width: u16, source_line: usize) -> Option<usize> {
        self.jump_cache
            .get(width)
            .and_then(|cache| cache.get(&source_line).copied())
    }

    pub fn cache_jump(&mut self, width: u16, source_line: usize, rendered_line: usize) {
        self.jump_cache
            .for_width(width)
            .insert(source_line, rendered_line);
    }

    pub fn cached_jump_count(&self, width: u16) -> usize {
        self.jump_cache.get(width).map_or(0, HashMap::len)
    }
}
