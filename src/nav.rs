//! Keeps the section sidebar in step with the reading position.
//!
//! Each section owns a band of scroll positions starting a little above the point where its
//! heading meets the sticky header. Scrolling activates the first section whose band holds
//! the scroll position; activating a link scrolls smoothly to its section and highlights the
//! link straight away, before the scroll itself lands.

use crate::geometry::{offset_for, Page, ScrollBehavior, Scroller};
use crate::section::NavigableSection;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Sidebar entry pointing at a section.
pub struct NavLink {
    /// Anchor of the target section.
    pub section_id: String,
    /// Text shown in the sidebar.
    pub label: String,
}

/// Sole owner of the active-link marking.
#[derive(Debug)]
pub struct NavigationSync {
    links: Vec<NavLink>,
    active: Option<usize>,
    cursor: usize,
    nav_margin: i64,
    lead_in: i64,
}

impl NavigationSync {
    #[must_use]
    /// Records one link per section, in document order, with nothing active.
    pub fn initialize(sections: &[NavigableSection], nav_margin: i64, lead_in: i64) -> Self {
        let links = sections
            .iter()
            .map(|section| NavLink {
                section_id: section.id.clone(),
                label: section.title.clone(),
            })
            .collect();
        Self {
            links,
            active: None,
            cursor: 0,
            nav_margin,
            lead_in,
        }
    }

    #[must_use]
    /// All links in document order.
    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    #[must_use]
    /// Index of the active link.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    /// Section anchor of the active link.
    pub fn active_id(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.links.get(i))
            .map(|link| link.section_id.as_str())
    }

    #[must_use]
    /// Link highlighted by keyboard navigation in the sidebar.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the sidebar cursor down one link.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.links.len() {
            self.cursor += 1;
        }
    }

    /// Moves the sidebar cursor up one link.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Places the sidebar cursor on the active link.
    pub fn sync_cursor(&mut self) {
        if let Some(active) = self.active {
            self.cursor = active;
        }
    }

    /// Handles activation of the link to `section_id`.
    ///
    /// Scrolls smoothly so the section rests just below the header and marks the link active
    /// at once. Unknown links and sections missing from the page are ignored. Returns whether
    /// a scroll was requested.
    pub fn on_link_activated<P, S>(&mut self, section_id: &str, page: &P, scroller: &mut S) -> bool
    where
        P: Page + ?Sized,
        S: Scroller + ?Sized,
    {
        let Some(index) = self.links.iter().position(|l| l.section_id == section_id) else {
            return false;
        };
        let Some(offset) = offset_for(page, section_id, self.nav_margin) else {
            tracing::debug!(section_id, "link target missing");
            return false;
        };
        scroller.scroll_to(offset, ScrollBehavior::Smooth);
        self.set_active(Some(index));
        self.cursor = index;
        true
    }

    /// Activates the link under the sidebar cursor.
    pub fn activate_cursor<P, S>(&mut self, page: &P, scroller: &mut S) -> bool
    where
        P: Page + ?Sized,
        S: Scroller + ?Sized,
    {
        match self.links.get(self.cursor).map(|l| l.section_id.clone()) {
            Some(id) => self.on_link_activated(&id, page, scroller),
            None => false,
        }
    }

    /// Recomputes the active link for `scroll_y`; call after every scroll.
    pub fn on_scroll<P: Page + ?Sized>(&mut self, page: &P, scroll_y: i64) -> Option<usize> {
        let current = self.current_at(page, scroll_y);
        self.set_active(current);
        current
    }

    #[must_use]
    /// First section, in document order, whose band contains `scroll_y`.
    ///
    /// Sections missing from the page or with no height are skipped.
    pub fn current_at<P: Page + ?Sized>(&self, page: &P, scroll_y: i64) -> Option<usize> {
        let header = page.header_height();
        self.links.iter().position(|link| {
            page.element_rect(&link.section_id)
                .filter(|rect| rect.height > 0)
                .is_some_and(|rect| {
                    let start = rect.top - header - self.lead_in;
                    (start..start + rect.height).contains(&scroll_y)
                })
        })
    }

    fn set_active(&mut self, active: Option<usize>) {
        if self.active != active {
            tracing::debug!(
                from = ?self.active_id(),
                to = ?active.and_then(|i| self.links.get(i)).map(|l| l.section_id.as_str()),
                "active section changed"
            );
            self.active = active;
        }
    }
}

#[cfg(test)]
#[path = "tests/nav.rs"]
mod tests;
