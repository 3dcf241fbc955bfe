//! The core state machine bridging the document, its layout and the interactive controls.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the reader
//! scrolls, searches and clicks. Every controller lives here as an owned field and is only
//! written through its own handlers; after any scroll the dependent views (active link,
//! progress, back-to-top) are refreshed from the one scroll position.

use crate::config::Config;
use crate::controls::{BackToTop, Clipboard, CodeControls, CopyState, ProgressBar, ToggleState};
use crate::geometry::{Page, ScrollBehavior, Scroller};
use crate::layout::Layout;
use crate::nav::NavigationSync;
use crate::search::{SearchIndex, SearchPanel};
use crate::section::Document;
use crate::viewport::Viewport;
use std::time::Instant;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Determines which pane receives key input.
pub enum Focus {
    /// Arrow keys scroll the document.
    Document,
    /// Arrow keys move through section links.
    Sidebar,
    /// Typing edits the search query.
    Search,
}

/// Bridges the parsed document and the controllers, maintaining session state.
pub struct AppState {
    /// Parsed document.
    pub document: Document,
    /// Reader preferences.
    pub config: Config,
    /// Current rows and element positions.
    pub layout: Layout,
    /// Scroll position of the document pane.
    pub viewport: Viewport,
    /// Active-link tracking for the sidebar.
    pub nav: NavigationSync,
    /// Immutable search index.
    pub index: SearchIndex,
    /// Search input and displayed results.
    pub search: SearchPanel,
    /// Copy and toggle controls per code sample.
    pub controls: CodeControls,
    /// Reading-progress indicator.
    pub progress: ProgressBar,
    /// Back-to-top affordance.
    pub back_to_top: BackToTop,
    /// Pane receiving key input.
    pub focus: Focus,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    message_until: Option<Instant>,
    /// Set when the reader asked to quit.
    pub should_quit: bool,
    clipboard: Box<dyn Clipboard>,
    content_width: usize,
}

impl AppState {
    #[must_use]
    /// Initialises state for `document` with a pane of `content_width` columns by `pane_rows`.
    pub fn new(
        document: Document,
        config: Config,
        clipboard: Box<dyn Clipboard>,
        content_width: usize,
        pane_rows: u16,
    ) -> Self {
        let controls = CodeControls::new(
            &document.samples,
            config.copy_revert(),
            config.collapse_threshold,
            config.collapsed_lines,
        );
        let layout = Layout::build(
            &document,
            &controls,
            content_width,
            config.row_height,
            config.header_height(),
        );
        let viewport = Viewport::new(
            i64::from(pane_rows) * config.row_height,
            layout.document_height(),
            config.row_height,
        );
        let nav = NavigationSync::initialize(&document.sections, config.nav_margin, config.lead_in);
        let index = SearchIndex::build(&document).with_limits(config.min_query_len, config.max_results);
        let search = SearchPanel::new(config.search_debounce());
        let back_to_top = BackToTop::new(config.back_to_top_threshold);

        let mut state = Self {
            document,
            config,
            layout,
            viewport,
            nav,
            index,
            search,
            controls,
            progress: ProgressBar::default(),
            back_to_top,
            focus: Focus::Document,
            message: None,
            message_until: None,
            should_quit: false,
            clipboard,
            content_width,
        };
        state.after_scroll();
        state
    }

    /// Re-lays out the document for a new pane size, keeping the scroll position in range.
    pub fn resize(&mut self, content_width: usize, pane_rows: u16) {
        self.content_width = content_width;
        self.relayout();
        self.viewport.set_dimensions(
            i64::from(pane_rows) * self.config.row_height,
            self.layout.document_height(),
        );
        self.after_scroll();
    }

    fn relayout(&mut self) {
        self.layout = Layout::build(
            &self.document,
            &self.controls,
            self.content_width,
            self.config.row_height,
            self.config.header_height(),
        );
        self.viewport
            .set_dimensions(self.viewport.height(), self.layout.document_height());
    }

    /// Refreshes everything derived from the scroll position.
    fn after_scroll(&mut self) {
        let scroll_y = self.viewport.scroll_y();
        self.nav.on_scroll(&self.layout, scroll_y);
        self.progress.update(
            scroll_y,
            self.layout.document_height(),
            self.viewport.height(),
        );
        self.back_to_top.update(scroll_y);
    }

    /// Scrolls by `rows` rows immediately.
    pub fn scroll_rows(&mut self, rows: i64) {
        self.viewport.scroll_by(rows * self.config.row_height);
        self.after_scroll();
    }

    /// Scrolls one pane height, less the header, in the direction of `sign`.
    pub fn scroll_page(&mut self, sign: i64) {
        let page = (self.viewport.height() - self.layout.header_height()).max(self.config.row_height);
        self.viewport.scroll_by(page * sign.signum());
        self.after_scroll();
    }

    /// Jumps to the top or bottom of the document.
    pub fn scroll_to_edge(&mut self, bottom: bool) {
        let to = if bottom { self.viewport.max_scroll() } else { 0 };
        self.viewport.scroll_to(to, ScrollBehavior::Instant);
        self.after_scroll();
    }

    /// Activates the sidebar link under the cursor.
    pub fn activate_link(&mut self) -> bool {
        self.nav.activate_cursor(&self.layout, &mut self.viewport)
    }

    /// Activates the link for `section_id`.
    pub fn activate_section(&mut self, section_id: &str) -> bool {
        self.nav
            .on_link_activated(section_id, &self.layout, &mut self.viewport)
    }

    /// Gives focus to `focus`; leaving search keeps the query, entering the sidebar jumps the
    /// cursor to the active link.
    pub fn set_focus(&mut self, focus: Focus) {
        if focus == Focus::Sidebar {
            self.nav.sync_cursor();
        }
        self.focus = focus;
    }

    /// Appends a character to the search query.
    pub fn search_input(&mut self, c: char, now: Instant) {
        self.search.push_char(c, &self.index, now);
    }

    /// Deletes the last character of the search query.
    pub fn search_backspace(&mut self, now: Instant) {
        self.search.pop_char(&self.index, now);
    }

    /// Navigates to the highlighted result, clearing the search panel.
    pub fn select_search_result(&mut self) -> bool {
        self.search.flush(&self.index);
        let Some(section_id) = self.search.selected_result().map(|r| r.section_id.clone()) else {
            return false;
        };
        self.select_result(&section_id)
    }

    /// Scrolls to `section_id` and clears the search panel.
    pub fn select_result(&mut self, section_id: &str) -> bool {
        let scrolled = self.search.select_result(
            section_id,
            &self.layout,
            &mut self.viewport,
            self.config.nav_margin,
        );
        self.focus = Focus::Document;
        scrolled
    }

    /// Clears the search panel and returns focus to the document.
    pub fn cancel_search(&mut self) {
        self.search.clear();
        self.focus = Focus::Document;
    }

    #[must_use]
    /// Code sample that copy and toggle act on.
    pub fn focused_sample(&self) -> Option<usize> {
        self.layout
            .focused_sample(self.viewport.scroll_y(), self.viewport.height())
    }

    /// Shows `text` in the help bar until the next key press.
    pub fn show_message(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
        self.message_until = None;
    }

    /// Clears the help bar message.
    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_until = None;
    }

    /// Copies the focused code sample and reports the outcome until the copy label reverts.
    pub fn copy_focused(&mut self, now: Instant) -> Option<CopyState> {
        let state = self.focused_sample().and_then(|index| {
            let sample = self.document.samples.get(index)?;
            let control = self.controls.copies.get_mut(index)?;
            Some(control.activate(sample, self.clipboard.as_mut(), now))
        });
        let text = match state {
            Some(CopyState::Copied) => "Copied to clipboard",
            Some(_) => "Copy failed",
            None => "No code sample in view",
        };
        self.message = Some(text.to_string());
        self.message_until = Some(now + self.config.copy_revert());
        state
    }

    /// Toggles the focused code sample, re-laying out the page.
    pub fn toggle_focused(&mut self) -> Option<ToggleState> {
        let index = self.focused_sample()?;
        let state = self.controls.toggles.get_mut(index)?.as_mut()?.toggle();
        self.relayout();
        self.after_scroll();
        Some(state)
    }

    /// Activates back-to-top when it is visible.
    pub fn back_to_top(&mut self) -> bool {
        self.back_to_top.activate(&mut self.viewport)
    }

    /// Advances time: animates scrolling, runs a due search, reverts copy labels and expires
    /// timed messages.
    ///
    /// Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let scrolled = self.viewport.animate();
        if scrolled {
            self.after_scroll();
        }
        let searched = self.search.poll(&self.index, now);
        let reverted = self.controls.tick(now);
        let expired = match self.message_until {
            Some(until) if now >= until => {
                self.clear_message();
                true
            }
            _ => false,
        };
        scrolled || searched || reverted || expired
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
