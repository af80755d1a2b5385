use crate::app::Model;
use crate::app::model::SearchPrompt;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Scroll up by n rows
    ScrollUp(usize),
    /// Scroll down by n rows
    ScrollDown(usize),
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    GoToTop,
    GoToBottom,
    NextHeading,
    PrevHeading,

    // Outline
    /// Show headings up to a level; 0 shows everything
    Fold(u8),

    // Search
    /// Open the prompt seeded with the current query
    StartSearch,
    /// Replace the prompt text
    SearchInput(String),
    /// Commit the prompt and jump to the selected match
    ConfirmSearch,
    /// Close the prompt, restoring the previous query
    CancelSearch,
    NextMatch,
    PrevMatch,
    ClearSearch,

    // TOC
    ToggleToc,
    CloseToc,
    TocUp,
    TocDown,
    TocFirst,
    TocLast,
    /// Jump to the selected heading and close
    TocSelect,
    StartTocFilter,
    /// Replace the filter draft
    TocFilterInput(String),
    ApplyTocFilter,
    CancelTocFilter,

    ToggleHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Status message timed out
    ClearStatus,

    // Application
    Quit,
}

pub const UNFOLD_STATUS: &str = "Outline: off (press 1-6 to fold)";

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. The viewport
/// is re-clamped after every message.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Navigation
        Message::ScrollUp(n) => model.viewport.scroll_by(-to_delta(n)),
        Message::ScrollDown(n) => model.viewport.scroll_by(to_delta(n)),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),
        Message::NextHeading => model.jump_heading(1),
        Message::PrevHeading => model.jump_heading(-1),

        // Outline
        Message::Fold(0) => {
            let top = model.top_line();
            model.fold_level = 0;
            model.rebuild_display(top);
            model.jump_to_rendered_line(top);
            model.set_status(UNFOLD_STATUS);
        }
        Message::Fold(level) => {
            debug_assert!(level <= 6, "fold level out of range: {level}");
            let top = model.top_line();
            let anchor = model.anchor_line();
            model.fold_level = level;
            model.rebuild_display(anchor);
            // No heading at or above the level: back to every line, same place
            if !model.display.is_outline() {
                model.jump_to_rendered_line(top);
            }
            model.set_status(format!("Outline: H{level} (press 0 to show all)"));
        }

        // Search
        Message::StartSearch => {
            model.help_visible = false;
            model.toc.visible = false;
            let query = model.search.query().to_string();
            model.search_prompt = Some(SearchPrompt {
                draft: query.clone(),
                saved: query,
            });
        }
        Message::SearchInput(draft) => {
            let top = model.top_line();
            model.search.set_query(&draft, &model.rendered.plain, top);
            if let Some(prompt) = model.search_prompt.as_mut() {
                prompt.draft = draft;
            }
        }
        Message::ConfirmSearch => {
            if let Some(prompt) = model.search_prompt.take() {
                let top = model.top_line();
                model.search.set_query(&prompt.draft, &model.rendered.plain, top);
                if let Some(line) = model.search.current_line() {
                    model.jump_to_rendered_line(line);
                }
            }
        }
        Message::CancelSearch => {
            if let Some(prompt) = model.search_prompt.take() {
                let top = model.top_line();
                model.search.set_query(&prompt.saved, &model.rendered.plain, top);
            }
        }
        Message::NextMatch => {
            if let Some(line) = model.search.step(true) {
                model.jump_to_rendered_line(line);
            }
        }
        Message::PrevMatch => {
            if let Some(line) = model.search.step(false) {
                model.jump_to_rendered_line(line);
            }
        }
        Message::ClearSearch => model.search.clear(),

        // TOC
        Message::ToggleToc => {
            if model.toc.visible {
                model.toc.visible = false;
            } else {
                model.help_visible = false;
                model.toc.visible = true;
                model.toc.filter_mode = false;
                model.toc.draft.clone_from(&model.toc.filter);
                model.toc.clamp_selection(&model.headings);
                model.sync_toc_to_current_heading();
            }
        }
        Message::CloseToc => model.toc.visible = false,
        Message::TocUp => model.toc.move_by(-1, &model.headings),
        Message::TocDown => model.toc.move_by(1, &model.headings),
        Message::TocFirst => model.toc.selected = 0,
        Message::TocLast => model.toc.select_last(&model.headings),
        Message::TocSelect => {
            model.jump_to_toc_selection();
            model.toc.visible = false;
        }
        Message::StartTocFilter => model.toc.start_filter(),
        Message::TocFilterInput(draft) => model.toc.set_draft(draft, &model.headings),
        Message::ApplyTocFilter => model.toc.apply_filter(),
        Message::CancelTocFilter => model.toc.cancel_filter(&model.headings),

        Message::ToggleHelp => model.help_visible = !model.help_visible,

        // Window
        Message::Resize(width, height) => {
            model.viewport.resize(width, height);
            if model.needs_render() {
                model.rerender();
            }
        }
        Message::ClearStatus => model.clear_status(),

        Message::Quit => model.should_quit = true,
    }

    model.viewport.clamp();
    model
}

fn to_delta(rows: usize) -> isize {
    isize::try_from(rows).unwrap_or(isize::MAX)
}
