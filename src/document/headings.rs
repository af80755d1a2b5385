//! Heading extraction from raw markdown source.

/// A heading found in the raw markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text with the `#` marker removed
    pub text: String,
    /// 0-based line index in the raw source
    pub source_line: usize,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>, source_line: usize) -> Self {
        Self {
            level,
            text: text.into(),
            source_line,
        }
    }
}

/// Extract ATX headings from markdown source, skipping fenced code blocks.
///
/// Malformed input never fails; it just yields fewer headings.
///
/// ```
/// use mdpage::document::extract_headings;
///
/// let headings = extract_headings("# A\n\n```\n# not a heading\n```\n\n## B\n");
/// assert_eq!(headings.len(), 2);
/// assert_eq!(headings[1].text, "B");
/// assert_eq!(headings[1].level, 2);
/// ```
pub fn extract_headings(source: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut fence: Option<&str> = None;

    for (idx, raw_line) in source_lines(source).enumerate() {
        let line = raw_line.trim();

        if let Some(marker) = fence_marker(line) {
            match fence {
                None => fence = Some(marker),
                Some(open) if line.starts_with(open) => fence = None,
                Some(_) => {}
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }

        if let Some((level, text)) = parse_atx_heading(line) {
            headings.push(Heading::new(level, text, idx));
        }
    }

    headings
}

/// Split source into lines the same way for extraction and prefix rendering.
pub(crate) fn source_lines(source: &str) -> impl Iterator<Item = &str> {
    source.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn fence_marker(line: &str) -> Option<&'static str> {
    if line.starts_with("```") {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let text = line[hashes..].trim();
    if text.is_empty() {
        return None;
    }
    // Bounded by the range check above
    #[allow(clippy::cast_possible_truncation)]
    Some((hashes as u8, text))
}

/// Normalize text for heading comparison: trim, collapse whitespace, lowercase.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(headings: &[Heading]) -> Vec<(u8, &str, usize)> {
        headings
            .iter()
            .map(|h| (h.level, h.text.as_str(), h.source_line))
            .collect()
    }

    #[test]
    fn test_fenced_block_is_excluded() {
        let source = "# A\n\n```\n# not a heading\n```\n\n## B\n";
        let headings = extract_headings(source);
        assert_eq!(summary(&headings), vec![(1, "A", 0), (2, "B", 6)]);
    }

    #[test]
    fn test_tilde_fence_is_excluded() {
        let source = "~~~\n# hidden\n~~~\n# shown";
        assert_eq!(summary(&extract_headings(source)), vec![(1, "shown", 3)]);
    }

    #[test]
    fn test_fence_only_closes_with_same_marker() {
        let source = "```\n~~~\n# still code\n```\n# after";
        assert_eq!(summary(&extract_headings(source)), vec![(1, "after", 4)]);
    }

    #[test]
    fn test_fence_with_info_string_opens_and_closes() {
        let source = "```rust\n# comment\n```\n### Three";
        assert_eq!(summary(&extract_headings(source)), vec![(3, "Three", 3)]);
    }

    #[test]
    fn test_unclosed_fence_hides_rest_of_document() {
        let source = "# A\n```\n# B\n# C";
        assert_eq!(summary(&extract_headings(source)), vec![(1, "A", 0)]);
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        assert!(extract_headings("####### too deep").is_empty());
    }

    #[test]
    fn test_empty_heading_is_skipped() {
        assert!(extract_headings("#\n##   \n").is_empty());
    }

    #[test]
    fn test_indented_heading_is_trimmed() {
        let headings = extract_headings("   ##   Spaced   out  ");
        assert_eq!(summary(&headings), vec![(2, "Spaced   out", 0)]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let headings = extract_headings("# One\r\n\r\n## Two\r\n");
        assert_eq!(summary(&headings), vec![(1, "One", 0), (2, "Two", 2)]);
    }

    #[test]
    fn test_normalize_text_collapses_and_lowercases() {
        assert_eq!(normalize_text("  Hello \t  World  "), "hello world");
        assert_eq!(normalize_text("   "), "");
    }
}
