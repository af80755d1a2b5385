//! Box-drawn GFM tables.

use comrak::nodes::{AstNode, NodeValue, TableAlignment};
use unicode_width::UnicodeWidthStr;

use super::inline::{extract_text, truncate_text};

/// Render a table node into box-drawing lines no wider than `max_width`.
pub fn render_table<'a>(table: &'a AstNode<'a>, max_width: usize) -> Vec<String> {
    let (alignments, mut rows, has_header) = collect_rows(table);
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }
    for row in &mut rows {
        row.resize(columns, String::new());
    }

    let mut widths = vec![1usize; columns];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.width());
        }
    }
    shrink_to_fit(&mut widths, max_width.max(4));

    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(border(&widths, '┌', '┬', '┐'));
    for (idx, row) in rows.iter().enumerate() {
        lines.push(row_line(row, &widths, &alignments));
        if has_header && idx == 0 {
            lines.push(border(&widths, '├', '┼', '┤'));
        }
    }
    lines.push(border(&widths, '└', '┴', '┘'));
    lines
}

/// Narrow the widest column until the table fits.
///
/// A row is `1 + sum(width + 3)` columns wide.
fn shrink_to_fit(widths: &mut [usize], max_width: usize) {
    while 1 + widths.iter().map(|w| w + 3).sum::<usize>() > max_width {
        let Some(widest) = widths.iter_mut().max() else {
            return;
        };
        if *widest <= 1 {
            return;
        }
        *widest -= 1;
    }
}

fn collect_rows<'a>(table: &'a AstNode<'a>) -> (Vec<TableAlignment>, Vec<Vec<String>>, bool) {
    let alignments = match &table.data.borrow().value {
        NodeValue::Table(t) => t.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut has_header = false;
    for row in table.children() {
        let NodeValue::TableRow(header) = row.data.borrow().value else {
            continue;
        };
        has_header |= header;
        let cells = row
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| extract_text(cell).split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        rows.push(cells);
    }

    (alignments, rows, has_header)
}

fn border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", inner.join(&middle.to_string()))
}

fn row_line(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut out = String::from("│");
    for (idx, width) in widths.iter().enumerate() {
        let content = truncate_text(cells.get(idx).map_or("", String::as_str), *width);
        let padding = width.saturating_sub(content.width());
        let (left, right) = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => (padding, 0),
            TableAlignment::Center => (padding / 2, padding - padding / 2),
            TableAlignment::Left | TableAlignment::None => (0, padding),
        };
        out.push(' ');
        out.push_str(&" ".repeat(left));
        out.push_str(&content);
        out.push_str(&" ".repeat(right));
        out.push_str(" │");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::parse_markdown;
    use comrak::Arena;

    fn table_lines(markdown: &str, width: usize) -> Vec<String> {
        let arena = Arena::new();
        let root = parse_markdown(&arena, markdown);
        let table = root
            .descendants()
            .find(|n| matches!(n.data.borrow().value, NodeValue::Table(_)))
            .expect("table node");
        render_table(table, width)
    }

    #[test]
    fn test_table_has_header_separator() {
        let lines = table_lines("| a | b |\n|---|---|\n| 1 | 2 |\n", 80);
        assert_eq!(
            lines,
            vec!["┌───┬───┐", "│ a │ b │", "├───┼───┤", "│ 1 │ 2 │", "└───┴───┘"]
        );
    }

    #[test]
    fn test_table_right_alignment() {
        let lines = table_lines("| num |\n|----:|\n| 7 |\n", 80);
        assert_eq!(lines[3], "│   7 │");
    }

    #[test]
    fn test_table_shrinks_to_width() {
        let lines = table_lines(
            "| a very long header cell | b |\n|---|---|\n| x | y |\n",
            20,
        );
        assert!(lines.iter().all(|l| l.width() <= 20), "{lines:?}");
    }
}
