use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, TocState};
use crate::document::Heading;

use super::ansi::truncate_end;
use super::style::Theme;

pub const HELP_LINES: &[&str] = &[
    "Keys",
    "",
    "  q / Esc        quit",
    "  j/k, Up/Down   scroll",
    "  PgUp/PgDn      page",
    "  u/d            half page",
    "  g/G            top / bottom",
    "  1-6 / 0        fold outline by heading level",
    "  [ / ]          previous/next heading",
    "  /              search (n/N to navigate, c to clear)",
    "  t              table of contents",
    "  / (in TOC)     filter headings",
    "  ?              toggle this help",
    "  mouse wheel    scroll",
];

/// TOC box interior: at most 76x19, at least 20x3.
pub fn toc_inner_size(area: Rect) -> (usize, usize) {
    let width = usize::from(area.width).saturating_sub(8).min(76).max(20);
    let height = usize::from(area.height).saturating_sub(7).min(19).max(3);
    (width, height)
}

pub fn toc_title(headings: &[Heading]) -> &'static str {
    if headings.is_empty() {
        "TOC (no headings)"
    } else {
        "TOC"
    }
}

pub fn toc_filter_text(toc: &TocState, headings: &[Heading]) -> String {
    if toc.filter_mode {
        format!("/{}", toc.draft)
    } else if !toc.filter.trim().is_empty() {
        let shown = toc.filtered(headings).len();
        format!("/{} ({shown}/{})", toc.filter, headings.len())
    } else {
        "/ filter".to_string()
    }
}

pub const fn toc_footer_text(toc: &TocState) -> &'static str {
    if toc.filter_mode {
        "type to filter  Enter apply  Esc cancel"
    } else {
        "j/k move  Enter jump  / filter  Esc close"
    }
}

/// Body rows of the TOC: the text of each row and whether it is selected.
///
/// The window keeps the selection centered where the list allows.
pub fn toc_body_lines(
    toc: &TocState,
    headings: &[Heading],
    inner_width: usize,
    inner_height: usize,
) -> Vec<(String, bool)> {
    if headings.is_empty() {
        return vec![("  (no headings found)".to_string(), false)];
    }

    let shown = toc.filtered(headings);
    if shown.is_empty() {
        let text = if toc.active_filter().is_empty() {
            "  (no headings found)"
        } else {
            "  (no matches)"
        };
        return vec![(text.to_string(), false)];
    }

    let max_start = shown.len().saturating_sub(inner_height);
    let start = toc
        .selected
        .saturating_sub(inner_height / 2)
        .min(max_start);
    let end = (start + inner_height).min(shown.len());

    shown[start..end]
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let indent = "  ".repeat(usize::from(heading.level.clamp(1, 6) - 1));
            let text = truncate_end(
                &format!("{indent}{}", heading.text),
                inner_width.saturating_sub(2),
            );
            (text, start + i == toc.selected)
        })
        .collect()
}

pub fn render_help_overlay(theme: &Theme, frame: &mut Frame, area: Rect) {
    let content_width = HELP_LINES.iter().map(|l| l.width()).max().unwrap_or(0);
    // border(1) + padding(2) on each side, border(1) + padding(1) above and below
    let width = u16::try_from(content_width + 6).unwrap_or(u16::MAX);
    let height = u16::try_from(HELP_LINES.len() + 4).unwrap_or(u16::MAX);
    let popup = centered_popup_rect(width, height, area);

    let lines: Vec<Line> = HELP_LINES.iter().map(|l| Line::raw(*l)).collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.modal_border)
        .padding(Padding::new(2, 2, 1, 1))
        .style(theme.modal);

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_toc_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = &model.theme;
    let headings = &model.headings;
    let (inner_width, inner_height) = toc_inner_size(area);
    let body = toc_body_lines(&model.toc, headings, inner_width, inner_height);

    let max_width = area.width.saturating_sub(4).min(80);
    let max_height = area.height.saturating_sub(2).min(24);
    // title + filter + body + footer, inside a border
    let wanted_height = u16::try_from(body.len() + 5).unwrap_or(u16::MAX);
    let popup = centered_popup_rect(max_width, wanted_height.min(max_height), area);
    let row_width = usize::from(popup.width.saturating_sub(2));

    let bar = |text: &str, style: Style| {
        let text = format!(" {} ", truncate_end(text, row_width.saturating_sub(2)));
        Line::styled(format!("{text:<row_width$}"), style)
    };

    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push(bar(toc_title(headings), theme.toc_title));
    let filter_text = toc_filter_text(&model.toc, headings);
    lines.push(bar(
        &truncate_end(&filter_text, usize::from(area.width).saturating_sub(10).max(10)),
        theme.toc_filter,
    ));
    for (text, selected) in body {
        let style = if selected {
            theme.toc_selected
        } else {
            theme.toc_normal
        };
        lines.push(Line::styled(format!(" {text} "), style));
    }
    lines.push(bar(toc_footer_text(&model.toc), theme.toc_footer));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.modal_border)
        .style(theme.modal);

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
