//! Mapping headings from source coordinates onto rendered lines.
//!
//! The renderer is free to wrap, indent, number or otherwise decorate heading
//! text, so headings are found by text rather than by position: a forward
//! cursor walks the plain rendered lines once, trying an exact normalized
//! match first and a substring match second.

use super::headings::{Heading, normalize_text};

/// A heading together with the rendered line it landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingLocation {
    pub heading: Heading,
    /// 0-based index into the rendered output at the width it was located for
    pub rendered_line: usize,
}

/// Locate each heading in the plain (ANSI-stripped) rendered lines.
///
/// Headings that cannot be found are dropped. The result is in document order
/// with non-decreasing `rendered_line`, and repeated heading texts consume
/// successive occurrences.
///
/// A later duplicate can be misassigned when an earlier line merely contains
/// the heading text and the substring fallback claims it first.
pub fn locate_headings(plain: &[String], headings: &[Heading]) -> Vec<HeadingLocation> {
    if plain.is_empty() || headings.is_empty() {
        return Vec::new();
    }

    let normalized: Vec<String> = plain.iter().map(|line| normalize_text(line)).collect();
    let mut cursor = 0usize;
    let mut out = Vec::with_capacity(headings.len());

    for heading in headings {
        let target = normalize_text(&heading.text);
        if target.is_empty() {
            continue;
        }

        let rest = &normalized[cursor.min(normalized.len())..];
        let found = rest
            .iter()
            .position(|line| *line == target)
            .or_else(|| rest.iter().position(|line| line.contains(&target)));

        let Some(rel) = found else {
            tracing::debug!(
                text = %heading.text,
                source_line = heading.source_line,
                "heading not found in rendered output"
            );
            continue;
        };

        let rendered_line = cursor + rel;
        out.push(HeadingLocation {
            heading: heading.clone(),
            rendered_line,
        });
        cursor = rendered_line + 1;
    }

    out
}

/// Index of the last location at or above `anchor_line`.
///
/// Returns `None` when the anchor precedes every heading.
pub fn current_heading_index(locations: &[HeadingLocation], anchor_line: usize) -> Option<usize> {
    let after = locations.partition_point(|loc| loc.rendered_line <= anchor_line);
    after.checked_sub(1)
}

/// Ancestor chain of the heading at `index`, ordered root to current.
///
/// Walking backward, each step keeps the nearest heading with a strictly
/// smaller level than the last one collected.
pub fn breadcrumb(locations: &[HeadingLocation], index: usize) -> Vec<&HeadingLocation> {
    let Some(current) = locations.get(index) else {
        return Vec::new();
    };

    let mut chain = vec![current];
    let mut level = current.heading.level;
    for loc in locations[..index].iter().rev() {
        if level <= 1 {
            break;
        }
        if loc.heading.level < level {
            chain.push(loc);
            level = loc.heading.level;
        }
    }

    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[&str]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    fn loc(level: u8, text: &str, source_line: usize, rendered_line: usize) -> HeadingLocation {
        HeadingLocation {
            heading: Heading::new(level, text, source_line),
            rendered_line,
        }
    }

    #[test]
    fn test_locate_headings_in_order() {
        let lines = plain(&["Title", "intro", "Section A", "body", "Section B", "tail"]);
        let headings = vec![
            Heading::new(1, "Title", 0),
            Heading::new(2, "Section A", 10),
            Heading::new(2, "Section B", 20),
        ];

        let locs = locate_headings(&lines, &headings);
        let rendered: Vec<usize> = locs.iter().map(|l| l.rendered_line).collect();
        assert_eq!(rendered, vec![0, 2, 4]);
    }

    #[test]
    fn test_locate_prefers_exact_match_over_earlier_substring() {
        let lines = plain(&["see Setup below", "Setup", "body"]);
        let headings = vec![Heading::new(2, "Setup", 3)];

        let locs = locate_headings(&lines, &headings);
        assert_eq!(locs[0].rendered_line, 1);
    }

    #[test]
    fn test_locate_falls_back_to_substring_for_decorated_headings() {
        let lines = plain(&["  # Title", "", "  ## 1. Install  ", "text"]);
        let headings = vec![Heading::new(1, "Title", 0), Heading::new(2, "Install", 4)];

        let locs = locate_headings(&lines, &headings);
        let rendered: Vec<usize> = locs.iter().map(|l| l.rendered_line).collect();
        assert_eq!(rendered, vec![0, 2]);
    }

    #[test]
    fn test_locate_normalizes_whitespace_and_case() {
        let lines = plain(&["GETTING    STARTED"]);
        let headings = vec![Heading::new(1, "Getting Started", 0)];

        assert_eq!(locate_headings(&lines, &headings)[0].rendered_line, 0);
    }

    #[test]
    fn test_locate_drops_missing_heading_and_keeps_going() {
        let lines = plain(&["Alpha", "Gamma"]);
        let headings = vec![
            Heading::new(1, "Alpha", 0),
            Heading::new(1, "Beta", 2),
            Heading::new(1, "Gamma", 4),
        ];

        let locs = locate_headings(&lines, &headings);
        let texts: Vec<&str> = locs.iter().map(|l| l.heading.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn test_locate_duplicate_headings_consume_in_order() {
        let lines = plain(&["Usage", "a", "Usage", "b", "Usage"]);
        let headings = vec![
            Heading::new(2, "Usage", 0),
            Heading::new(2, "Usage", 5),
            Heading::new(2, "Usage", 9),
        ];

        let rendered: Vec<usize> = locate_headings(&lines, &headings)
            .iter()
            .map(|l| l.rendered_line)
            .collect();
        assert_eq!(rendered, vec![0, 2, 4]);
    }

    #[test]
    fn test_locate_substring_fallback_can_claim_earlier_line() {
        // Known heuristic limitation: the second "Notes" heading is dropped from
        // the renderer output here, so the fallback lands on a body line instead.
        let lines = plain(&["Notes", "more notes here", "end"]);
        let headings = vec![Heading::new(2, "Notes", 0), Heading::new(2, "Notes", 7)];

        let rendered: Vec<usize> = locate_headings(&lines, &headings)
            .iter()
            .map(|l| l.rendered_line)
            .collect();
        assert_eq!(rendered, vec![0, 1]);
    }

    #[test]
    fn test_locate_empty_inputs() {
        assert!(locate_headings(&[], &[Heading::new(1, "A", 0)]).is_empty());
        assert!(locate_headings(&plain(&["A"]), &[]).is_empty());
    }

    #[test]
    fn test_current_heading_index_binary_search() {
        let locs = vec![loc(1, "A", 0, 0), loc(2, "B", 1, 10), loc(2, "C", 2, 20)];

        assert_eq!(current_heading_index(&locs, 0), Some(0));
        assert_eq!(current_heading_index(&locs, 15), Some(1));
        assert_eq!(current_heading_index(&locs, 100), Some(2));
    }

    #[test]
    fn test_current_heading_index_before_first_heading() {
        let locs = vec![loc(1, "A", 3, 5)];
        assert_eq!(current_heading_index(&locs, 4), None);
        assert_eq!(current_heading_index(&[], 4), None);
    }

    #[test]
    fn test_breadcrumb_parent_chain() {
        let locs = vec![
            loc(1, "H1", 0, 0),
            loc(2, "H2", 1, 5),
            loc(3, "H3", 2, 10),
            loc(2, "H2b", 3, 15),
        ];

        let chain: Vec<&str> = breadcrumb(&locs, 2)
            .iter()
            .map(|l| l.heading.text.as_str())
            .collect();
        assert_eq!(chain, vec!["H1", "H2", "H3"]);
    }

    #[test]
    fn test_breadcrumb_skips_siblings_and_deeper_headings() {
        let locs = vec![
            loc(1, "Root", 0, 0),
            loc(2, "First", 1, 2),
            loc(3, "Deep", 2, 4),
            loc(2, "Second", 3, 6),
            loc(4, "Leaf", 4, 8),
        ];

        let chain: Vec<&str> = breadcrumb(&locs, 4)
            .iter()
            .map(|l| l.heading.text.as_str())
            .collect();
        assert_eq!(chain, vec!["Root", "Second", "Leaf"]);
    }

    #[test]
    fn test_breadcrumb_out_of_range_is_empty() {
        let locs = vec![loc(1, "A", 0, 0)];
        assert!(breadcrumb(&locs, 3).is_empty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn located_lines_are_non_decreasing(
                words in proptest::collection::vec("[a-c]{1,3}", 1..40),
                picks in proptest::collection::vec(0..40usize, 0..15),
            ) {
                let lines: Vec<String> = words.clone();
                let headings: Vec<Heading> = picks
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Heading::new(2, words[p % words.len()].clone(), i))
                    .collect();

                let locs = locate_headings(&lines, &headings);
                for pair in locs.windows(2) {
                    prop_assert!(pair[0].rendered_line < pair[1].rendered_line);
                }
                for l in &locs {
                    prop_assert!(l.rendered_line < lines.len());
                }
            }
        }
    }
}
