//! Navigation over a real rendered document.

use mdpage::app::{Message, Model, update};
use mdpage::render::{RenderOptions, StyleMode, TerminalRenderer};

const GUIDE: &str = include_str!("fixtures/guide.md");

fn guide_model(size: (u16, u16)) -> Model {
    let options = RenderOptions {
        style: StyleMode::Dark,
        width: 0,
    };
    Model::new("guide.md", GUIDE, options, Box::new(TerminalRenderer), size)
}

fn apply(model: Model, msgs: impl IntoIterator<Item = Message>) -> Model {
    msgs.into_iter().fold(model, update)
}

fn select_toc_entry(model: Model, index: usize) -> Model {
    let mut msgs = vec![Message::ToggleToc, Message::TocFirst];
    msgs.extend(std::iter::repeat_n(Message::TocDown, index));
    msgs.push(Message::TocSelect);
    apply(model, msgs)
}

#[test]
fn test_every_heading_is_located_at_a_wide_width() {
    let model = guide_model((100, 30));
    assert_eq!(model.headings.len(), 12);
    assert_eq!(model.locations.len(), 12);
    for pair in model.locations.windows(2) {
        assert!(pair[0].rendered_line < pair[1].rendered_line);
    }
    for loc in &model.locations {
        let plain = &model.rendered.plain[loc.rendered_line];
        assert!(plain.contains(&loc.heading.text), "{plain:?}");
    }
}

#[test]
fn test_breadcrumb_follows_nested_sections() {
    let model = guide_model((100, 30));
    let environment = model
        .locations
        .iter()
        .find(|loc| loc.heading.text == "Environment")
        .map(|loc| loc.rendered_line)
        .unwrap();

    let model = apply(model, [Message::GoToTop, Message::ScrollDown(environment)]);
    assert_eq!(
        model.breadcrumb_text(),
        "mdpage Guide \u{203a} Configuration \u{203a} Environment"
    );
}

#[test]
fn test_heading_jumps_visit_headings_in_order() {
    let model = guide_model((100, 8));
    let expected: Vec<usize> = model.locations.iter().map(|l| l.rendered_line).collect();

    let mut model = model;
    let mut visited = Vec::new();
    for _ in 0..expected.len() {
        model = update(model, Message::NextHeading);
        visited.push(model.top_line());
    }
    // The last few headings sit within the final page
    let max_top = model.display.len() - model.viewport.page_size();
    for (seen, want) in visited.iter().zip(expected.iter().skip(1)) {
        assert_eq!(*seen, (*want).min(max_top));
    }
}

#[test]
fn test_wrapped_heading_is_reached_through_toc() {
    let model = guide_model((40, 12));
    let faq = model
        .headings
        .iter()
        .position(|h| h.text.starts_with("Why is a heading"))
        .unwrap();
    assert!(
        model
            .locations
            .iter()
            .all(|loc| !loc.heading.text.starts_with("Why is a heading")),
        "the wrapped heading cannot be matched by text"
    );

    let heading_line = model
        .rendered
        .plain
        .iter()
        .position(|line| line.starts_with("### Why is a"))
        .unwrap();

    let model = select_toc_entry(model, faq);
    let top = model.top_line();
    let max_top = model.display.len() - model.viewport.page_size();
    // The prefix render ends on the last wrapped line of the heading
    assert!(top >= heading_line.min(max_top) && top <= heading_line + 1, "top={top}");
    assert_eq!(model.toc.cached_jump_count(model.render_width()), 1);
}

#[test]
fn test_fold_shows_outline_of_sections() {
    let model = apply(guide_model((100, 30)), [Message::Fold(2)]);
    let rows: Vec<&str> = model
        .display
        .rendered_lines()
        .map(|line| model.rendered.plain[line].trim_end())
        .collect();
    assert_eq!(
        rows,
        vec![
            "# mdpage Guide",
            "## Installation",
            "## Usage",
            "## Configuration",
            "## FAQ",
            "## License",
        ]
    );
}

#[test]
fn test_search_then_resize_keeps_matches_consistent() {
    let model = apply(
        guide_model((100, 10)),
        [
            Message::StartSearch,
            Message::SearchInput("Matches".to_string()),
            Message::ConfirmSearch,
        ],
    );
    assert!(model.search.match_count() >= 1);
    let current = model.search.current_line().unwrap();
    assert!(model.rendered.plain[current].contains("Matches"));

    let model = update(model, Message::Resize(50, 10));
    assert_eq!(model.rendered.width, 46);
    for &line in model.search.matches() {
        assert!(model.rendered.plain[line].contains("Matches"));
    }
    let max = model.display.len().saturating_sub(model.viewport.page_size());
    assert!(model.viewport.offset() <= max);
}
