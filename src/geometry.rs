//! Page geometry shared by link navigation and search result selection.
//!
//! Both need to bring an element to rest just below the sticky header. The page and the thing
//! that scrolls it are kept behind traits so the controllers can be driven by the terminal
//! layout or by a test double.

/// Vertical extent of an element on the page, in page units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    /// Distance from the top of the document to the element's top edge.
    pub top: i64,
    /// Rendered height of the element.
    pub height: i64,
}

impl Rect {
    #[must_use]
    /// Creates a rectangle from its top edge and height.
    pub fn new(top: i64, height: i64) -> Self {
        Self { top, height }
    }
}

/// How a programmatic scroll should reach its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump directly to the target.
    Instant,
    /// Animate towards the target over successive ticks.
    Smooth,
}

/// Read access to the rendered page.
pub trait Page {
    /// Rectangle of the element registered under `id`, if it is on the page.
    fn element_rect(&self, id: &str) -> Option<Rect>;
    /// Height of the fixed header overlaying the top of the viewport.
    fn header_height(&self) -> i64;
    /// Total height of the rendered document.
    fn document_height(&self) -> i64;
}

/// Something holding a scroll position that can be moved programmatically.
pub trait Scroller {
    /// Current scroll position (`scrollY`).
    fn scroll_y(&self) -> i64;
    /// Requests a scroll to `offset`; implementations clamp to their valid range.
    fn scroll_to(&mut self, offset: i64, behavior: ScrollBehavior);
}

#[must_use]
/// Offset that places `rect`'s top edge `margin` units below a header of `header_height`.
///
/// A missing element yields `None`; callers treat that as a no-op.
pub fn scroll_offset(rect: Option<Rect>, header_height: i64, margin: i64) -> Option<i64> {
    rect.map(|r| r.top - header_height - margin)
}

#[must_use]
/// Looks up `id` on `page` and computes its resting offset below the header.
pub fn offset_for<P: Page + ?Sized>(page: &P, id: &str, margin: i64) -> Option<i64> {
    scroll_offset(page.element_rect(id), page.header_height(), margin)
}

#[cfg(test)]
#[path = "tests/geometry.rs"]
mod tests;
