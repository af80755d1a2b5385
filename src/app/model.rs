use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::document::{
    DisplayIndex, Heading, HeadingLocation, RenderedDocument, WidthCache, breadcrumb,
    current_heading_index, extract_headings, locate_headings, source_prefix, split_lines,
};
use crate::render::{RenderError, RenderOptions, Renderer, TerminalRenderer};
use crate::search::SearchState;
use crate::ui::style::Theme;
use crate::ui::viewport::Viewport;

use super::toc::TocState;

/// How long a status message stays in the footer.
pub const STATUS_TIMEOUT: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Search prompt being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPrompt {
    pub draft: String,
    /// Query active before the prompt opened, restored on cancel
    pub saved: String,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. Derived views
/// (display index, matches, heading locations) are recomputed from the
/// rendered document, never shared.
pub struct Model {
    /// Shown at the left of the header
    pub title: String,
    source: String,
    options: RenderOptions,
    renderer: Box<dyn Renderer>,
    pub theme: Theme,
    /// Headings of the raw source, in document order
    pub headings: Vec<Heading>,
    /// Output of the last render
    pub rendered: RenderedDocument,
    /// Headings found in `rendered`, ordered by rendered line
    pub locations: Vec<HeadingLocation>,
    /// Heading source line -> rendered line for the current render
    heading_map: WidthCache<HashMap<usize, usize>>,
    heading_lines: HashSet<usize>,
    pub display: DisplayIndex,
    /// Scroll position over display rows
    pub viewport: Viewport,
    /// 0 shows every line, 1-6 shows headings up to that level
    pub fold_level: u8,
    pub search: SearchState,
    pub search_prompt: Option<SearchPrompt>,
    pub toc: TocState,
    pub help_visible: bool,
    status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("title", &self.title)
            .field("rendered_lines", &self.rendered.len())
            .field("render_width", &self.rendered.width)
            .field("offset", &self.viewport.offset())
            .field("fold_level", &self.fold_level)
            .field("search", &self.search.query())
            .field("toc_visible", &self.toc.visible)
            .field("help_visible", &self.help_visible)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            title: String::new(),
            source: String::new(),
            options: RenderOptions::default(),
            renderer: Box::new(TerminalRenderer),
            theme: Theme::default(),
            headings: Vec::new(),
            rendered: RenderedDocument::default(),
            locations: Vec::new(),
            heading_map: WidthCache::new(),
            heading_lines: HashSet::new(),
            display: DisplayIndex::default(),
            viewport: Viewport::new(80, 24, 0),
            fold_level: 0,
            search: SearchState::default(),
            search_prompt: None,
            toc: TocState::default(),
            help_visible: false,
            status: None,
            should_quit: false,
        }
    }
}

impl Model {
    /// Create a model for `source` and render it for the terminal size.
    pub fn new(
        title: impl Into<String>,
        source: impl Into<String>,
        options: RenderOptions,
        renderer: Box<dyn Renderer>,
        terminal_size: (u16, u16),
    ) -> Self {
        let source = source.into();
        let headings = extract_headings(&source);
        let mut model = Self {
            title: title.into(),
            headings,
            source,
            options,
            renderer,
            theme: Theme::for_background(options.style.background()),
            viewport: Viewport::new(terminal_size.0, terminal_size.1, 0),
            ..Self::default()
        };
        model.rerender();
        model
    }

    /// Width handed to the renderer: the fixed width if one was given,
    /// otherwise the body text column.
    pub fn render_width(&self) -> u16 {
        if self.options.width > 0 {
            self.options.width
        } else {
            self.viewport.text_width()
        }
    }

    /// Whether the last render is stale for the current terminal size.
    pub fn needs_render(&self) -> bool {
        self.rendered.width != self.render_width()
    }

    /// Rendered line at the top of the content area.
    pub fn top_line(&self) -> usize {
        self.display.at(self.viewport.offset())
    }

    /// Rendered line one row below the top, used to decide which section
    /// the reader is in.
    ///
    /// In outline mode every row is a heading, so this is the heading *below*
    /// the top row and the breadcrumb and TOC selection follow that one.
    /// Do not use it to restore the top of an outline; use [`Self::top_line`].
    pub fn anchor_line(&self) -> usize {
        self.display.at(self.viewport.offset() + 1)
    }

    /// Render the source at the current width and rebuild everything that
    /// depends on the output.
    ///
    /// The reading position is carried over proportionally, since line
    /// counts change with the width. In outline mode the heading at the top
    /// stays at the top.
    pub fn rerender(&mut self) {
        let width = self.render_width();
        let old_total = self.rendered.len();
        let old_top = self.top_line();
        let top_heading = self
            .display
            .is_outline()
            .then(|| {
                self.locations
                    .iter()
                    .find(|loc| loc.rendered_line == old_top)
                    .map(|loc| loc.heading.source_line)
            })
            .flatten();

        let _scope = crate::perf::scope("model.rerender");
        tracing::debug!(width, previous = self.rendered.width, "rendering document");
        self.rendered = match self
            .renderer
            .render(&self.source, &self.options.with_width(width))
        {
            Ok(output) => RenderedDocument::from_output(&output, width),
            Err(err) => {
                tracing::warn!(%err, width, "render failed");
                RenderedDocument::from_error(&err.to_string(), width)
            }
        };

        self.locations = {
            let _scope = crate::perf::scope("model.locate_headings");
            locate_headings(&self.rendered.plain, &self.headings)
        };
        self.heading_map.store(
            width,
            self.locations
                .iter()
                .map(|loc| (loc.heading.source_line, loc.rendered_line))
                .collect(),
        );
        self.heading_lines = self.locations.iter().map(|loc| loc.rendered_line).collect();

        if self.search.is_active() {
            self.search.refresh(&self.rendered.plain);
        }

        let new_total = self.rendered.len();
        let remap = |line: usize| {
            if old_total == 0 {
                0
            } else {
                line * new_total / old_total
            }
        };
        let new_top = top_heading
            .and_then(|source_line| {
                self.locations
                    .iter()
                    .find(|loc| loc.heading.source_line == source_line)
            })
            .map_or_else(|| remap(old_top), |loc| loc.rendered_line);
        self.rebuild_display(new_top);
        if !self.display.is_outline() {
            self.jump_to_rendered_line(new_top);
        }
    }

    /// Rebuild the display index for the fold level.
    ///
    /// In outline mode the offset moves to the last shown heading at or
    /// before `anchor`, or to the first one.
    pub fn rebuild_display(&mut self, anchor: usize) {
        self.display =
            DisplayIndex::for_fold_level(self.fold_level, &self.locations, self.rendered.len());
        self.viewport.set_total_rows(self.display.len());
        if self.display.is_empty() {
            self.viewport.go_to_top();
        } else if self.display.is_outline() {
            let row = self.display.row_for_rendered_line(anchor);
            self.viewport.set_offset(row);
        }
    }

    /// Scroll so the display row holding `line` is at the top.
    pub fn jump_to_rendered_line(&mut self, line: usize) {
        let row = self.display.row_for_rendered_line(line);
        self.viewport.set_offset(row);
    }

    /// Move to the next (`delta > 0`) or previous heading.
    ///
    /// In outline mode only the shown levels count, unless none match.
    pub fn jump_heading(&mut self, delta: isize) {
        if self.locations.is_empty() || delta == 0 {
            return;
        }
        let mut candidates: Vec<HeadingLocation> = self.locations.clone();
        if self.fold_level > 0 {
            let shown: Vec<HeadingLocation> = self
                .locations
                .iter()
                .filter(|loc| loc.heading.level <= self.fold_level)
                .cloned()
                .collect();
            if !shown.is_empty() {
                candidates = shown;
            }
        }

        let next = match current_heading_index(&candidates, self.anchor_line()) {
            Some(idx) => idx.saturating_add_signed(delta),
            None if delta > 0 => delta.unsigned_abs() - 1,
            None => return,
        };
        let next = next.min(candidates.len() - 1);
        self.jump_to_rendered_line(candidates[next].rendered_line);
    }

    pub fn current_location(&self) -> Option<&HeadingLocation> {
        current_heading_index(&self.locations, self.anchor_line()).map(|idx| &self.locations[idx])
    }

    /// Current section and its ancestors, joined with ` › `.
    pub fn breadcrumb_text(&self) -> String {
        let Some(idx) = current_heading_index(&self.locations, self.anchor_line()) else {
            return String::new();
        };
        breadcrumb(&self.locations, idx)
            .iter()
            .map(|loc| loc.heading.text.trim())
            .collect::<Vec<_>>()
            .join(" \u{203a} ")
    }

    pub fn is_heading_line(&self, line: usize) -> bool {
        self.heading_lines.contains(&line)
    }

    /// Rendered line of a heading in the current render, if the location
    /// map was built at the current width.
    pub fn heading_rendered_line(&self, source_line: usize) -> Option<usize> {
        self.heading_map
            .get(self.render_width())
            .and_then(|map| map.get(&source_line).copied())
    }

    /// Render the source up to and including `source_line` and return the
    /// index of its last rendered line.
    pub fn render_prefix_line(&self, source_line: usize) -> Result<usize, RenderError> {
        let prefix = source_prefix(&self.source, source_line);
        let output = self
            .renderer
            .render(&prefix, &self.options.with_width(self.render_width()))?;
        Ok(split_lines(&output).len().saturating_sub(1))
    }

    /// Jump to the heading selected in the TOC.
    pub fn jump_to_toc_selection(&mut self) {
        let Some(heading) = self.toc.selected_heading(&self.headings) else {
            return;
        };
        let source_line = heading.source_line;
        let width = self.render_width();

        if let Some(line) = self.heading_rendered_line(source_line) {
            self.jump_to_rendered_line(line);
            return;
        }
        if let Some(line) = self.toc.cached_jump(width, source_line) {
            self.jump_to_rendered_line(line);
            return;
        }

        tracing::debug!(source_line, width, "toc jump cache miss");
        match self.render_prefix_line(source_line) {
            Ok(line) => {
                self.toc.cache_jump(width, source_line, line);
                self.jump_to_rendered_line(line);
            }
            Err(err) => {
                tracing::warn!(%err, source_line, "prefix render failed");
                self.set_status(format!("Jump failed: {err}"));
            }
        }
    }

    /// Point the TOC selection at the section being read.
    pub fn sync_toc_to_current_heading(&mut self) {
        if let Some(source_line) = self.current_location().map(|loc| loc.heading.source_line) {
            self.toc.select_source_line(&self.headings, source_line);
        }
    }

    /// Position through the document as 0-100.
    pub fn progress_percent(&self) -> u16 {
        let total = self.rendered.len();
        if total == 0 {
            return 0;
        }
        let max_offset = total.saturating_sub(self.viewport.page_size());
        if max_offset == 0 {
            return 100;
        }
        let percent = (self.top_line() * 100 / max_offset).min(100);
        u16::try_from(percent).unwrap_or(100)
    }

    /// Rendered lines spanned by the content area, 1-based and inclusive,
    /// plus the rendered line count.
    pub fn visible_doc_range(&self) -> (usize, usize, usize) {
        let total = self.rendered.len();
        let range = self.viewport.visible_range();
        if total == 0 || range.is_empty() {
            return (0, 0, total);
        }
        let start = self.display.at(range.start) + 1;
        let end = self.display.at(range.end - 1) + 1;
        (start.min(total), end.min(total), total)
    }

    /// Display rows shown, 1-based and inclusive, plus the row count.
    pub fn visible_outline_range(&self) -> (usize, usize, usize) {
        let range = self.viewport.visible_range();
        if range.is_empty() {
            return (0, 0, self.display.len());
        }
        (range.start + 1, range.end, self.display.len())
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            expires_at: Instant::now() + STATUS_TIMEOUT,
        });
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    pub fn status_expired(&self, now: Instant) -> bool {
        self.status.as_ref().is_some_and(|s| now >= s.expires_at)
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
