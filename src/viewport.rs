//! Scroll position of the document pane.
//!
//! Programmatic scrolls are clamped to the scrollable range. Smooth scrolls set a target that
//! [`Viewport::animate`] approaches a fraction of the remaining distance per tick.

use crate::geometry::{ScrollBehavior, Scroller};

/// Scroll state for a pane of fixed height over a document of known height.
#[derive(Debug, Clone)]
pub struct Viewport {
    scroll_y: i64,
    target: Option<i64>,
    height: i64,
    document_height: i64,
    min_step: i64,
}

impl Viewport {
    #[must_use]
    /// Creates a viewport at the top of the document; `min_step` bounds animation steps.
    pub fn new(height: i64, document_height: i64, min_step: i64) -> Self {
        Self {
            scroll_y: 0,
            target: None,
            height,
            document_height,
            min_step: min_step.max(1),
        }
    }

    #[must_use]
    /// Height of the pane in page units.
    pub fn height(&self) -> i64 {
        self.height
    }

    #[must_use]
    /// Height of the document being scrolled.
    pub fn document_height(&self) -> i64 {
        self.document_height
    }

    #[must_use]
    /// Largest valid scroll position.
    pub fn max_scroll(&self) -> i64 {
        (self.document_height - self.height).max(0)
    }

    #[must_use]
    /// Whether a smooth scroll is still underway.
    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Updates pane and document heights, keeping the position within range.
    pub fn set_dimensions(&mut self, height: i64, document_height: i64) {
        self.height = height;
        self.document_height = document_height;
        self.scroll_y = self.clamp(self.scroll_y);
        self.target = self.target.map(|t| self.clamp(t));
    }

    /// Scrolls by `delta` immediately, cancelling any animation.
    pub fn scroll_by(&mut self, delta: i64) {
        let to = self.scroll_y + delta;
        self.scroll_to(to, ScrollBehavior::Instant);
    }

    /// Advances a smooth scroll by one step. Returns whether the position changed.
    pub fn animate(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let distance = target - self.scroll_y;
        if distance == 0 {
            self.target = None;
            return false;
        }
        let step = (distance.abs() / 3).max(self.min_step).min(distance.abs());
        self.scroll_y += step * distance.signum();
        if self.scroll_y == target {
            self.target = None;
        }
        true
    }

    fn clamp(&self, offset: i64) -> i64 {
        offset.clamp(0, self.max_scroll())
    }
}

impl Scroller for Viewport {
    fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, offset: i64, behavior: ScrollBehavior) {
        let offset = self.clamp(offset);
        match behavior {
            ScrollBehavior::Instant => {
                self.scroll_y = offset;
                self.target = None;
            }
            ScrollBehavior::Smooth => {
                tracing::debug!(from = self.scroll_y, to = offset, "smooth scroll");
                self.target = (offset != self.scroll_y).then_some(offset);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/viewport.rs"]
mod tests;
