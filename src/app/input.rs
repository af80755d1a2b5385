use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{Message, Model};

/// Rows moved per mouse wheel notch.
pub const WHEEL_ROWS: usize = 3;

/// Map a terminal event to a message, given the current state.
pub fn handle_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(*key, model),
        Event::Mouse(mouse) => handle_mouse(*mouse, model),
        Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
        _ => None,
    }
}

pub fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return None;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_ROWS)),
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_ROWS)),
        _ => None,
    }
}

pub fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    if let Some(prompt) = &model.search_prompt {
        return edit_text(key, &prompt.draft)
            .map(Message::SearchInput)
            .or(match key.code {
                KeyCode::Esc => Some(Message::CancelSearch),
                KeyCode::Enter => Some(Message::ConfirmSearch),
                _ => None,
            });
    }

    if model.toc.visible {
        return handle_toc_key(key, model);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Message::Quit),
        KeyCode::Char('?') => return Some(Message::ToggleHelp),
        KeyCode::Char('t') => return Some(Message::ToggleToc),
        KeyCode::Char('/') => return Some(Message::StartSearch),
        _ => {}
    }

    // While help is shown only the keys above apply
    if model.help_visible {
        return None;
    }

    match key.code {
        KeyCode::Char(c @ '0'..='6') => c.to_digit(10).and_then(|d| u8::try_from(d).ok()).map(Message::Fold),
        KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp(1)),
        KeyCode::Char('d') => Some(Message::HalfPageDown),
        KeyCode::Char('u') => Some(Message::HalfPageUp),
        KeyCode::PageDown | KeyCode::Char('f' | ' ') => Some(Message::PageDown),
        KeyCode::PageUp | KeyCode::Char('b') => Some(Message::PageUp),
        KeyCode::Home | KeyCode::Char('g') => Some(Message::GoToTop),
        KeyCode::End | KeyCode::Char('G') => Some(Message::GoToBottom),
        KeyCode::Char(']') => Some(Message::NextHeading),
        KeyCode::Char('[') => Some(Message::PrevHeading),
        KeyCode::Char('n') => Some(Message::NextMatch),
        KeyCode::Char('N') => Some(Message::PrevMatch),
        KeyCode::Char('c') => Some(Message::ClearSearch),
        _ => None,
    }
}

fn handle_toc_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if model.toc.filter_mode {
        return edit_text(key, &model.toc.draft)
            .map(Message::TocFilterInput)
            .or(match key.code {
                KeyCode::Esc => Some(Message::CancelTocFilter),
                KeyCode::Enter => Some(Message::ApplyTocFilter),
                _ => None,
            });
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q' | 't') => Some(Message::CloseToc),
        KeyCode::Char('/') => Some(Message::StartTocFilter),
        KeyCode::Char('j') | KeyCode::Down => Some(Message::TocDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::TocUp),
        KeyCode::Home | KeyCode::Char('g') => Some(Message::TocFirst),
        KeyCode::End | KeyCode::Char('G') => Some(Message::TocLast),
        KeyCode::Enter => Some(Message::TocSelect),
        _ => None,
    }
}

/// Line editing shared by the search prompt and the TOC filter.
///
/// Returns the edited text, or `None` when the key is not an edit.
fn edit_text(key: KeyEvent, text: &str) -> Option<String> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Backspace => Some(drop_last_char(text)),
        KeyCode::Char('h') if ctrl => Some(drop_last_char(text)),
        KeyCode::Char('u') if ctrl => Some(String::new()),
        KeyCode::Char(c) if !ctrl && !alt => {
            let mut next = text.to_string();
            next.push(c);
            Some(next)
        }
        _ => None,
    }
}

fn drop_last_char(text: &str) -> String {
    let mut next = text.to_string();
    next.pop();
    next
}
