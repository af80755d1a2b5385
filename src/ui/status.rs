use ratatui::prelude::*;
use unicode_width::UnicodeWidthStr;

use crate::app::Model;

use super::ansi::truncate_end;

pub const HELP_HINT: &str = "q quit  ? help  / search  t toc  [ ] section  1-6 fold 0 all";

const DEFAULT_TITLE: &str = "md";

/// Title followed by the breadcrumb of the current section.
pub fn header_label(model: &Model) -> String {
    let title = match model.title.trim() {
        "" => DEFAULT_TITLE,
        title => title,
    };
    let chain = model.breadcrumb_text();
    if chain.is_empty() {
        title.to_string()
    } else {
        format!("{title}  \u{203a}  {chain}")
    }
}

pub fn header_right_text(model: &Model) -> String {
    let percent = model.progress_percent();
    if model.fold_level > 0 {
        format!("{percent:3}%  H{}", model.fold_level)
    } else {
        format!("{percent:3}%")
    }
}

/// Left side of the footer: prompt, committed query, status or key hint.
pub fn footer_left_text(model: &Model) -> String {
    if let Some(prompt) = &model.search_prompt {
        if prompt.draft.trim().is_empty() {
            return "/".to_string();
        }
        return format!(
            "/{} ({}) Enter jump Esc cancel",
            prompt.draft,
            model.search.match_count()
        );
    }
    if model.search.is_active() {
        return format!(
            "/{} {}/{} (n/N)",
            model.search.query(),
            model.search.current_number(),
            model.search.match_count()
        );
    }
    match model.status_text() {
        Some(text) if !model.toc.visible => text.to_string(),
        _ => HELP_HINT.to_string(),
    }
}

pub fn footer_right_text(model: &Model) -> String {
    let (start, end, total) = model.visible_doc_range();
    let doc = format!("doc {start}-{end}/{total}");
    if model.fold_level > 0 {
        let (start, end, total) = model.visible_outline_range();
        format!("{doc} | ol {start}-{end}/{total}")
    } else {
        doc
    }
}

pub fn render_header(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = &model.theme;
    let right = format!(" {} ", header_right_text(model));
    let right_width = right.width();
    let left_budget = usize::from(area.width).saturating_sub(right_width).max(4);
    let left = format!(
        " {} ",
        truncate_end(&header_label(model), left_budget.saturating_sub(2).max(1))
    );
    let gap = usize::from(area.width).saturating_sub(left.width() + right_width);

    let line = Line::from(vec![
        Span::styled(left, theme.header_left),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, theme.header_right),
    ])
    .style(theme.header_right);
    frame.render_widget(line, area);
}

pub fn render_footer(model: &Model, frame: &mut Frame, area: Rect) {
    let width = usize::from(area.width);
    let left = format!(
        " {} ",
        truncate_end(&footer_left_text(model), width.saturating_sub(20).max(10))
    );
    let right = format!(" {} ", footer_right_text(model));
    let gap = width.saturating_sub(left.width() + right.width());

    let line = Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(gap)),
        Span::raw(right),
    ])
    .style(model.theme.footer);
    frame.render_widget(line, area);
}
