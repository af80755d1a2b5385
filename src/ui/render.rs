use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;

use super::ansi::{fit_width, line_spans};
use super::{overlays, status};

/// Gutter marker for one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Heading,
    CurrentMatch,
    OtherMatch,
}

impl Marker {
    pub const fn symbol(self) -> char {
        match self {
            Self::None => ' ',
            Self::Heading => '§',
            Self::CurrentMatch => '>',
            Self::OtherMatch => '*',
        }
    }
}

/// Match markers win over the heading marker.
pub fn marker_for(model: &Model, line: usize) -> Marker {
    if model.search.is_active() {
        if model.search.is_current_line(line) {
            return Marker::CurrentMatch;
        }
        if model.search.is_match_line(line) {
            return Marker::OtherMatch;
        }
    }
    if model.is_heading_line(line) {
        Marker::Heading
    } else {
        Marker::None
    }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let header_area = Rect { height: 1, ..area };
    status::render_header(model, frame, header_area);
    if area.height <= 2 {
        return;
    }

    let body_area = Rect {
        y: area.y + 1,
        height: area.height - 2,
        ..area
    };
    let footer_area = Rect {
        y: area.y + area.height - 1,
        height: 1,
        ..area
    };
    render_body(model, frame, body_area);
    status::render_footer(model, frame, footer_area);

    if model.help_visible {
        overlays::render_help_overlay(&model.theme, frame, area);
    } else if model.toc.visible {
        overlays::render_toc_overlay(model, frame, area);
    }
}

fn render_body(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = &model.theme;
    let viewport = &model.viewport;
    let text_width = usize::from(viewport.text_width());
    let content_height = viewport.page_size();
    let scrollbar = viewport.scrollbar();
    let range = viewport.visible_range();

    let scroll_cell = |row: usize| match scrollbar {
        None => Span::raw(" "),
        Some(bar) if bar.is_thumb(row) => Span::styled("|", theme.scrollbar_thumb),
        Some(_) => Span::styled(".", theme.scrollbar_track),
    };

    let mut lines: Vec<Line> = Vec::with_capacity(content_height);
    for (row, display_row) in range.enumerate() {
        let line_idx = model.display.at(display_row);
        let marker = marker_for(model, line_idx);
        let marker_style = match marker {
            Marker::None => theme.marker_none,
            Marker::Heading => theme.marker_heading,
            Marker::CurrentMatch => theme.marker_match_current,
            Marker::OtherMatch => theme.marker_match_other,
        };

        let raw = model
            .rendered
            .lines
            .get(line_idx)
            .map_or("", String::as_str);
        let mut text = fit_width(line_spans(raw), text_width);
        if model.is_heading_line(line_idx) {
            for span in &mut text {
                span.style = theme.heading_line.patch(span.style);
            }
        }

        let mut spans = Vec::with_capacity(text.len() + 4);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(marker.symbol().to_string(), marker_style));
        spans.push(Span::raw(" "));
        spans.extend(text);
        spans.push(scroll_cell(row));
        lines.push(Line::from(spans));
    }

    // Keep the footer pinned when the document ends early
    for row in lines.len()..content_height {
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(3 + text_width)),
            scroll_cell(row),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
