//! In-page search over the fragments of a document.
//!
//! The index is a snapshot taken once from the parsed document: every section keeps its
//! case-folded full text and every fragment its own case-folded text. A query is matched as a
//! literal substring; a fragment's relevance is the number of non-overlapping occurrences of
//! the query in its text. Results keep discovery order among equal scores.

use crate::geometry::{offset_for, Page, ScrollBehavior, Scroller};
use crate::section::Document;
use serde::Serialize;
use std::ops::Range;
use std::time::{Duration, Instant};

/// Shortest query that produces results unless configured otherwise.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;
/// Result cap unless configured otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 10;

#[derive(Clone, Debug, PartialEq)]
/// Immutable snapshot of one searchable fragment.
pub struct ContentFragment {
    /// Anchor of the owning section.
    pub section_id: String,
    /// Heading of the owning section.
    pub section_title: String,
    /// Fragment heading; empty for untitled body text.
    pub title: String,
    /// Case-folded title and body.
    pub text: String,
}

/// Section-level text used to skip whole sections that cannot match.
#[derive(Clone, Debug)]
struct IndexedSection {
    text: String,
    fragments: Range<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One ranked match, rebuilt on every query.
pub struct SearchResult {
    /// Anchor of the section to scroll to on selection.
    pub section_id: String,
    /// Heading of that section.
    pub section_title: String,
    /// Heading of the matching fragment.
    pub fragment_title: String,
    /// Number of times the query occurs in the fragment.
    pub score: usize,
}

/// Query-time index over a document's fragments.
#[derive(Clone, Debug)]
pub struct SearchIndex {
    sections: Vec<IndexedSection>,
    fragments: Vec<ContentFragment>,
    min_query_len: usize,
    max_results: usize,
}

impl SearchIndex {
    #[must_use]
    /// Builds the index in a single pass over `document`.
    ///
    /// Content that changes afterwards is not reflected; build a new index instead.
    pub fn build(document: &Document) -> Self {
        let mut sections = Vec::with_capacity(document.sections.len());
        let mut fragments = Vec::new();

        for section in &document.sections {
            let start = fragments.len();
            let mut full_text = vec![section.title.to_lowercase()];
            for fragment in &section.fragments {
                let text = document.fragment_text(fragment).to_lowercase();
                full_text.push(text.clone());
                fragments.push(ContentFragment {
                    section_id: section.id.clone(),
                    section_title: section.title.clone(),
                    title: fragment.title.clone(),
                    text,
                });
            }
            sections.push(IndexedSection {
                text: full_text.join("\n"),
                fragments: start..fragments.len(),
            });
        }

        tracing::debug!(
            sections = sections.len(),
            fragments = fragments.len(),
            "built search index"
        );

        Self {
            sections,
            fragments,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    #[must_use]
    /// Overrides the minimum query length and the result cap.
    pub fn with_limits(mut self, min_query_len: usize, max_results: usize) -> Self {
        self.min_query_len = min_query_len;
        self.max_results = max_results;
        self
    }

    #[must_use]
    /// Every indexed fragment in discovery order.
    pub fn fragments(&self) -> &[ContentFragment] {
        &self.fragments
    }

    #[must_use]
    /// Whether `query`, once trimmed, is long enough to be searched.
    pub fn accepts(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_len
    }

    #[must_use]
    /// Ranks fragments against `query`.
    ///
    /// Surrounding whitespace is trimmed before both the length check and matching, so `" a"`
    /// is too short and `"rust "` matches `"rust"`. The trimmed query is case-folded and then
    /// matched literally. Queries shorter than the minimum length return nothing. Results are
    /// ordered by descending score, ties in document order, and capped at the configured
    /// maximum.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        if !self.accepts(query) {
            return Vec::new();
        }
        let needle = query.trim().to_lowercase();

        let mut results: Vec<SearchResult> = self
            .sections
            .iter()
            .filter(|section| section.text.contains(&needle))
            .flat_map(|section| &self.fragments[section.fragments.clone()])
            .filter(|fragment| fragment.text.contains(&needle))
            .map(|fragment| SearchResult {
                section_id: fragment.section_id.clone(),
                section_title: fragment.section_title.clone(),
                fragment_title: fragment.title.clone(),
                score: count_occurrences(&fragment.text, &needle),
            })
            .collect();

        // sort_by is stable, so equal scores keep discovery order
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(self.max_results);
        results
    }
}

#[must_use]
/// Counts non-overlapping occurrences of `needle` in `haystack`, matched literally.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Owner of the search input, the displayed results, and the typing debounce.
#[derive(Debug)]
pub struct SearchPanel {
    query: String,
    results: Vec<SearchResult>,
    selected: usize,
    pending_since: Option<Instant>,
    debounce: Duration,
}

impl SearchPanel {
    #[must_use]
    /// Creates an empty panel that waits `debounce` after the last edit before searching.
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            pending_since: None,
            debounce,
        }
    }

    #[must_use]
    /// Current contents of the search input.
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    /// Results currently displayed.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    #[must_use]
    /// Position of the highlighted result.
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    /// Highlighted result, if any are displayed.
    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.selected)
    }

    #[must_use]
    /// Whether an edit is waiting for the debounce window to pass.
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Appends a typed character.
    pub fn push_char(&mut self, c: char, index: &SearchIndex, now: Instant) {
        self.query.push(c);
        self.edited(index, now);
    }

    /// Removes the last character.
    pub fn pop_char(&mut self, index: &SearchIndex, now: Instant) {
        self.query.pop();
        self.edited(index, now);
    }

    /// Replaces the whole query.
    pub fn set_query(&mut self, query: &str, index: &SearchIndex, now: Instant) {
        query.clone_into(&mut self.query);
        self.edited(index, now);
    }

    fn edited(&mut self, index: &SearchIndex, now: Instant) {
        if index.accepts(&self.query) {
            self.pending_since = Some(now);
        } else {
            self.pending_since = None;
            self.results.clear();
            self.selected = 0;
        }
    }

    /// Runs the pending search once the input has been idle for the debounce window.
    ///
    /// Returns whether the displayed results were replaced.
    pub fn poll(&mut self, index: &SearchIndex, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.debounce => {
                self.refresh(index);
                true
            }
            _ => false,
        }
    }

    /// Runs the pending search immediately.
    pub fn flush(&mut self, index: &SearchIndex) {
        if self.pending_since.is_some() {
            self.refresh(index);
        }
    }

    fn refresh(&mut self, index: &SearchIndex) {
        self.pending_since = None;
        self.results = index.search(&self.query);
        self.selected = 0;
        tracing::debug!(
            query = %self.query,
            results = self.results.len(),
            "search"
        );
    }

    /// Moves the highlight down, wrapping at the end.
    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    /// Moves the highlight up, wrapping at the start.
    pub fn select_prev(&mut self) {
        if !self.results.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.results.len() - 1);
        }
    }

    /// Empties the input and the displayed results.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected = 0;
        self.pending_since = None;
    }

    /// Scrolls to `section_id` just below the header, then clears the panel.
    ///
    /// An unknown section still clears the panel but leaves the scroll position alone.
    /// Returns whether a scroll was requested.
    pub fn select_result<P, S>(
        &mut self,
        section_id: &str,
        page: &P,
        scroller: &mut S,
        margin: i64,
    ) -> bool
    where
        P: Page + ?Sized,
        S: Scroller + ?Sized,
    {
        let offset = offset_for(page, section_id, margin);
        if let Some(offset) = offset {
            scroller.scroll_to(offset, ScrollBehavior::Smooth);
        } else {
            tracing::debug!(section_id, "search result target missing");
        }
        self.clear();
        offset.is_some()
    }
}

#[cfg(test)]
#[path = "tests/search.rs"]
mod tests;
