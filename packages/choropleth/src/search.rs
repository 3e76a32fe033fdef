//! Municipality search: autocomplete suggestions, query resolution and the
//! keyboard contract of the suggestion dropdown.

use gppg_boundary::{BoundaryFeature, BoundarySet};

/// Number of suggestions shown under the search box.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Returns up to `limit` region names containing `query`
/// (case-insensitively), in the boundary set's sorted order.
///
/// An empty query yields no suggestions rather than every name, so the UI
/// can tell "no input" apart from "no matches".
#[must_use]
pub fn suggest<'a>(boundaries: &'a BoundarySet, query: &str, limit: usize) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    boundaries
        .all_names()
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(limit)
        .map(String::as_str)
        .collect()
}

/// Resolves free text to a single region.
///
/// An exact case-insensitive name match wins; otherwise the first name (in
/// sorted order) containing the query is used.
#[must_use]
pub fn resolve<'a>(boundaries: &'a BoundarySet, query: &str) -> Option<&'a BoundaryFeature> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    boundaries.lookup(&needle).or_else(|| {
        boundaries
            .all_names()
            .iter()
            .find(|name| name.to_lowercase().contains(&needle))
            .and_then(|name| boundaries.lookup(name))
    })
}

/// Keys the suggestion dropdown reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    /// Highlight the next suggestion, wrapping to the first.
    Down,
    /// Highlight the previous suggestion, wrapping to the last.
    Up,
    /// Pick the highlighted suggestion (or the first one).
    Enter,
    /// Close the dropdown.
    Escape,
}

/// State of the suggestion dropdown under the search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionList {
    items: Vec<String>,
    active: Option<usize>,
    open: bool,
}

impl SuggestionList {
    /// Recomputes suggestions after the query text changed.
    ///
    /// The list opens for any input that isn't blank and the highlight
    /// resets.
    pub fn update(&mut self, boundaries: &BoundarySet, query: &str, limit: usize) {
        self.items = suggest(boundaries, query, limit)
            .into_iter()
            .map(ToString::to_string)
            .collect();
        self.active = None;
        self.open = !query.trim().is_empty();
    }

    /// Closes the dropdown, keeping the computed suggestions.
    pub const fn close(&mut self) {
        self.open = false;
        self.active = None;
    }

    /// Clears suggestions and closes the dropdown.
    pub fn clear(&mut self) {
        self.items.clear();
        self.close();
    }

    /// Handles a navigation key.
    ///
    /// Returns the picked name when `Enter` selects a suggestion; the
    /// caller submits it as a search. Keys are ignored while the dropdown
    /// is closed.
    pub fn handle_key(&mut self, key: NavigationKey) -> Option<String> {
        if !self.open {
            return None;
        }

        let len = self.items.len();
        match key {
            NavigationKey::Down if len > 0 => {
                self.active = Some(self.active.map_or(0, |i| (i + 1) % len));
                None
            }
            NavigationKey::Up if len > 0 => {
                self.active = Some(match self.active {
                    None | Some(0) => len - 1,
                    Some(i) => i - 1,
                });
                None
            }
            NavigationKey::Enter if len > 0 => {
                let pick = self.items[self.active.unwrap_or(0).min(len - 1)].clone();
                self.close();
                Some(pick)
            }
            NavigationKey::Escape => {
                self.close();
                None
            }
            NavigationKey::Down | NavigationKey::Up | NavigationKey::Enter => None,
        }
    }

    /// Current suggestions.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Index of the highlighted suggestion.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Whether the dropdown is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the dropdown should show a "No matches" row.
    #[must_use]
    pub fn shows_no_matches(&self) -> bool {
        self.open && self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::boundaries;

    fn north() -> BoundarySet {
        boundaries(&["Cuyo", "Coron", "Culion"])
    }

    #[test]
    fn suggest_returns_sorted_substring_matches() {
        let set = north();
        assert_eq!(suggest(&set, "cu", 8), vec!["Culion", "Cuyo"]);
        assert_eq!(suggest(&set, "ON", 8), vec!["Coron", "Culion"]);
        assert_eq!(suggest(&set, "cu", 1), vec!["Culion"]);
    }

    #[test]
    fn suggest_empty_query_is_empty() {
        let set = north();
        assert!(suggest(&set, "", 8).is_empty());
        assert!(suggest(&set, "   ", 8).is_empty());
        assert!(suggest(&set, "zzz", 8).is_empty());
    }

    #[test]
    fn suggest_respects_limit() {
        let names: Vec<String> = (0..12).map(|i| format!("Town {i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let set = boundaries(&refs);
        assert_eq!(suggest(&set, "town", DEFAULT_SUGGESTION_LIMIT).len(), 8);
    }

    #[test]
    fn resolve_prefers_exact_match() {
        let set = boundaries(&["San Vicente", "Vicente"]);
        assert_eq!(resolve(&set, "vicente").map(BoundaryFeature::name), Some("Vicente"));
        assert!(resolve(&set, "culion").is_none());

        let set = north();
        assert_eq!(resolve(&set, "culion").map(BoundaryFeature::name), Some("Culion"));
        assert_eq!(resolve(&set, "  CU ").map(BoundaryFeature::name), Some("Culion"));
        assert!(resolve(&set, "").is_none());
    }

    #[test]
    fn keyboard_navigation_wraps() {
        let set = north();
        let mut list = SuggestionList::default();
        list.update(&set, "cu", 8);
        assert!(list.is_open());
        assert_eq!(list.active(), None);

        list.handle_key(NavigationKey::Down);
        assert_eq!(list.active(), Some(0));
        list.handle_key(NavigationKey::Down);
        assert_eq!(list.active(), Some(1));
        list.handle_key(NavigationKey::Down);
        assert_eq!(list.active(), Some(0));
        list.handle_key(NavigationKey::Up);
        assert_eq!(list.active(), Some(1));
    }

    #[test]
    fn up_from_nothing_goes_to_last() {
        let set = north();
        let mut list = SuggestionList::default();
        list.update(&set, "o", 8);
        list.handle_key(NavigationKey::Up);
        assert_eq!(list.active(), Some(2));
    }

    #[test]
    fn enter_picks_highlighted_or_first() {
        let set = north();
        let mut list = SuggestionList::default();

        list.update(&set, "cu", 8);
        assert_eq!(list.handle_key(NavigationKey::Enter).as_deref(), Some("Culion"));
        assert!(!list.is_open());

        list.update(&set, "cu", 8);
        list.handle_key(NavigationKey::Up);
        assert_eq!(list.handle_key(NavigationKey::Enter).as_deref(), Some("Cuyo"));
    }

    #[test]
    fn escape_closes_and_closed_list_ignores_keys() {
        let set = north();
        let mut list = SuggestionList::default();
        list.update(&set, "cu", 8);
        list.handle_key(NavigationKey::Escape);
        assert!(!list.is_open());
        assert_eq!(list.handle_key(NavigationKey::Enter), None);
        assert_eq!(list.handle_key(NavigationKey::Down), None);
        assert_eq!(list.active(), None);
    }

    #[test]
    fn no_matches_is_distinct_from_no_input() {
        let set = north();
        let mut list = SuggestionList::default();

        list.update(&set, "", 8);
        assert!(!list.is_open());
        assert!(!list.shows_no_matches());

        list.update(&set, "   ", 8);
        assert!(!list.is_open());
        assert!(!list.shows_no_matches());

        list.update(&set, "xyz", 8);
        assert!(list.shows_no_matches());
        assert_eq!(list.handle_key(NavigationKey::Enter), None);
        assert!(list.is_open());
    }
}
