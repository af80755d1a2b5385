//! Search over rendered text.
//!
//! Provides text search within documents with:
//! - Smart-case substring matching (case-sensitive only with uppercase input)
//! - A match list in rendered-line order plus a membership set for markers
//! - Circular navigation between matches

use std::collections::HashSet;

/// Substring matcher that is case-sensitive only when the query has an
/// uppercase ASCII letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartCaseMatcher {
    needle: String,
    case_sensitive: bool,
}

impl SmartCaseMatcher {
    pub fn new(query: &str) -> Self {
        let case_sensitive = has_upper(query);
        let needle = if case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Self {
            needle,
            case_sensitive,
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        if self.case_sensitive {
            haystack.contains(&self.needle)
        } else {
            haystack.to_lowercase().contains(&self.needle)
        }
    }

    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

fn has_upper(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_uppercase())
}

/// Committed search query and its matches over the plain rendered lines.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    /// Rendered line indices, ascending
    matches: Vec<usize>,
    /// Index into `matches` of the selected match
    cursor: usize,
    match_set: HashSet<usize>,
}

impl SearchState {
    /// Replace the query and select the first match at or after `top_line`,
    /// wrapping to the first match when none follows it.
    ///
    /// The query is trimmed; an empty query clears the search.
    pub fn set_query(&mut self, query: &str, plain: &[String], top_line: usize) {
        self.query = query.trim().to_string();
        self.cursor = 0;
        self.recompute(plain);
        self.cursor = self
            .matches
            .iter()
            .position(|&line| line >= top_line)
            .unwrap_or(0);
    }

    /// Recompute matches after the rendered text changed, keeping the cursor
    /// when it is still in range.
    pub fn refresh(&mut self, plain: &[String]) {
        self.recompute(plain);
        if self.cursor >= self.matches.len() {
            self.cursor = 0;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn recompute(&mut self, plain: &[String]) {
        self.matches.clear();
        self.match_set.clear();
        if self.query.is_empty() {
            return;
        }

        let _scope = crate::perf::scope("search.recompute");
        let matcher = SmartCaseMatcher::new(&self.query);
        self.matches = plain
            .iter()
            .enumerate()
            .filter(|(_, line)| matcher.is_match(line))
            .map(|(idx, _)| idx)
            .collect();
        self.match_set = self.matches.iter().copied().collect();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Rendered line of the selected match.
    pub fn current_line(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    /// 1-based position of the selected match, 0 when there is none.
    pub fn current_number(&self) -> usize {
        if self.matches.is_empty() {
            0
        } else {
            self.cursor + 1
        }
    }

    /// Advance to the next (`forward`) or previous match, wrapping around.
    ///
    /// Returns the rendered line of the newly selected match.
    pub fn step(&mut self, forward: bool) -> Option<usize> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
        self.current_line()
    }

    pub fn is_match_line(&self, line: usize) -> bool {
        self.match_set.contains(&line)
    }

    pub fn is_current_line(&self, line: usize) -> bool {
        self.current_line() == Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_lowercase_query_is_case_insensitive() {
        let matcher = SmartCaseMatcher::new("foo");
        assert!(matcher.is_match("FOO bar"));
        assert!(matcher.is_match("a foo"));
        assert!(!matcher.is_case_sensitive());
    }

    #[test]
    fn test_uppercase_query_is_case_sensitive() {
        let matcher = SmartCaseMatcher::new("Foo");
        assert!(matcher.is_match("Foo"));
        assert!(!matcher.is_match("foo"));
        assert!(matcher.is_case_sensitive());
    }

    #[test]
    fn test_non_ascii_uppercase_does_not_force_case() {
        let matcher = SmartCaseMatcher::new("Été");
        assert!(!matcher.is_case_sensitive());
        assert!(matcher.is_match("été"));
    }

    #[test]
    fn test_set_query_selects_first_match_at_or_after_top() {
        let plain = lines(&["x", "hit", "y", "hit", "z", "hit"]);
        let mut search = SearchState::default();

        search.set_query("hit", &plain, 2);
        assert_eq!(search.matches(), &[1, 3, 5]);
        assert_eq!(search.current_line(), Some(3));
        assert_eq!(search.current_number(), 2);
    }

    #[test]
    fn test_set_query_wraps_when_no_match_below_top() {
        let plain = lines(&["hit", "x", "x"]);
        let mut search = SearchState::default();
        search.set_query("hit", &plain, 2);
        assert_eq!(search.current_line(), Some(0));
    }

    #[test]
    fn test_set_query_trims_and_empty_clears() {
        let plain = lines(&["hit"]);
        let mut search = SearchState::default();
        search.set_query("  hit  ", &plain, 0);
        assert_eq!(search.query(), "hit");
        assert!(search.is_match_line(0));

        search.set_query("   ", &plain, 0);
        assert!(!search.is_active());
        assert_eq!(search.match_count(), 0);
        assert!(!search.is_match_line(0));
        assert_eq!(search.current_line(), None);
    }

    #[test]
    fn test_step_cycles_both_directions() {
        let plain = lines(&["a", "b", "a", "a"]);
        let mut search = SearchState::default();
        search.set_query("a", &plain, 0);

        assert_eq!(search.step(true), Some(2));
        assert_eq!(search.step(true), Some(3));
        assert_eq!(search.step(true), Some(0));
        assert_eq!(search.step(false), Some(3));
    }

    #[test]
    fn test_step_without_matches() {
        let mut search = SearchState::default();
        search.set_query("nothing", &lines(&["a"]), 0);
        assert!(search.is_active());
        assert_eq!(search.step(true), None);
        assert_eq!(search.current_number(), 0);
    }

    #[test]
    fn test_refresh_keeps_cursor_in_range() {
        let mut search = SearchState::default();
        search.set_query("a", &lines(&["a", "a", "a"]), 0);
        search.step(true);
        search.step(true);

        search.refresh(&lines(&["a", "b", "a", "b", "a"]));
        assert_eq!(search.current_line(), Some(4));

        search.refresh(&lines(&["a"]));
        assert_eq!(search.current_line(), Some(0));
    }

    #[test]
    fn test_current_and_other_markers() {
        let mut search = SearchState::default();
        search.set_query("a", &lines(&["a", "b", "a"]), 0);
        assert!(search.is_current_line(0));
        assert!(search.is_match_line(2));
        assert!(!search.is_current_line(2));
        assert!(!search.is_match_line(1));
    }
}
