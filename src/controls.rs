//! Per-sample copy and collapse controls, the reading-progress bar and back-to-top.
//!
//! Each control owns its own state and is only mutated by its own handlers. Timed reverts
//! are a single deadline per control, so activating again pushes the deadline back instead of
//! queueing a second revert.

use crate::geometry::{ScrollBehavior, Scroller};
use crate::section::CodeSample;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Clipboard failures; shown as transient state, never propagated.
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display server).
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    /// The clipboard rejected the text.
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Destination for copied code.
pub trait Clipboard {
    /// Places `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be opened or written.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_owned())
                .map_err(|e| ClipboardError::Write(e.to_string())),
            None => Err(ClipboardError::Unavailable("not opened".to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Feedback state of a copy button.
pub enum CopyState {
    /// Ready to copy.
    Idle,
    /// The last copy succeeded.
    Copied,
    /// The last copy failed.
    Failed,
}

/// Copy button attached to one code sample.
#[derive(Debug, Clone)]
pub struct CopyControl {
    state: CopyState,
    revert_at: Option<Instant>,
    revert_after: Duration,
}

impl CopyControl {
    #[must_use]
    /// Creates an idle control that reverts `revert_after` following each copy.
    pub fn new(revert_after: Duration) -> Self {
        Self {
            state: CopyState::Idle,
            revert_at: None,
            revert_after,
        }
    }

    #[must_use]
    /// Current feedback state.
    pub fn state(&self) -> CopyState {
        self.state
    }

    #[must_use]
    /// Button text for the current state.
    pub fn label(&self) -> &'static str {
        match self.state {
            CopyState::Idle => "Copy",
            CopyState::Copied => "Copied!",
            CopyState::Failed => "Failed",
        }
    }

    /// Copies `sample` to `clipboard` and records the outcome.
    pub fn activate<C: Clipboard + ?Sized>(
        &mut self,
        sample: &CodeSample,
        clipboard: &mut C,
        now: Instant,
    ) -> CopyState {
        let outcome = clipboard.set_text(&sample.text);
        self.complete(outcome, now)
    }

    /// Records the outcome of a clipboard write and re-arms the revert deadline.
    pub fn complete(&mut self, outcome: Result<(), ClipboardError>, now: Instant) -> CopyState {
        self.state = match outcome {
            Ok(()) => CopyState::Copied,
            Err(e) => {
                tracing::warn!(error = %e, "copy failed");
                CopyState::Failed
            }
        };
        self.revert_at = Some(now + self.revert_after);
        self.state
    }

    /// Reverts to idle once the deadline has passed. Returns whether the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.revert_at {
            Some(at) if now >= at => {
                self.revert_at = None;
                self.state = CopyState::Idle;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Whether a long sample shows every line.
pub enum ToggleState {
    /// Shows a fixed number of lines.
    Collapsed,
    /// Shows the whole sample.
    Expanded,
}

/// Show-more / show-less toggle for a long code sample.
#[derive(Debug, Clone)]
pub struct ToggleControl {
    state: ToggleState,
}

impl ToggleControl {
    #[must_use]
    /// A collapsed toggle when the sample has more than `threshold` lines, otherwise `None`.
    pub fn for_sample(sample: &CodeSample, threshold: usize) -> Option<Self> {
        (sample.line_count() > threshold).then_some(Self {
            state: ToggleState::Collapsed,
        })
    }

    #[must_use]
    /// Current state.
    pub fn state(&self) -> ToggleState {
        self.state
    }

    #[must_use]
    /// Button text for the current state.
    pub fn label(&self) -> &'static str {
        match self.state {
            ToggleState::Collapsed => "Show more",
            ToggleState::Expanded => "Show less",
        }
    }

    /// Flips between collapsed and expanded.
    pub fn toggle(&mut self) -> ToggleState {
        self.state = match self.state {
            ToggleState::Collapsed => ToggleState::Expanded,
            ToggleState::Expanded => ToggleState::Collapsed,
        };
        self.state
    }

    #[must_use]
    /// Lines shown out of `total`, given the collapsed maximum.
    pub fn visible_lines(&self, total: usize, collapsed_max: usize) -> usize {
        match self.state {
            ToggleState::Collapsed => total.min(collapsed_max),
            ToggleState::Expanded => total,
        }
    }
}

/// Copy and toggle controls for every sample, indexed like [`crate::section::Document::samples`].
#[derive(Debug, Clone)]
pub struct CodeControls {
    /// One copy button per sample.
    pub copies: Vec<CopyControl>,
    /// A toggle for each sample long enough to collapse.
    pub toggles: Vec<Option<ToggleControl>>,
    collapsed_lines: usize,
}

impl CodeControls {
    #[must_use]
    /// Attaches controls to `samples`; eligibility for toggling is decided here, once.
    pub fn new(
        samples: &[CodeSample],
        revert_after: Duration,
        collapse_threshold: usize,
        collapsed_lines: usize,
    ) -> Self {
        Self {
            copies: samples
                .iter()
                .map(|_| CopyControl::new(revert_after))
                .collect(),
            toggles: samples
                .iter()
                .map(|s| ToggleControl::for_sample(s, collapse_threshold))
                .collect(),
            collapsed_lines,
        }
    }

    #[must_use]
    /// Lines of `sample` currently rendered.
    pub fn visible_lines(&self, index: usize, sample: &CodeSample) -> usize {
        let total = sample.line_count();
        self.toggles
            .get(index)
            .and_then(Option::as_ref)
            .map_or(total, |t| t.visible_lines(total, self.collapsed_lines))
    }

    /// Reverts expired copy labels. Returns whether any changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.copies
            .iter_mut()
            .fold(false, |changed, c| c.tick(now) || changed)
    }
}

#[must_use]
/// Fraction of the scrollable range already scrolled, in `[0, 1]`.
pub fn scroll_progress(scroll_y: i64, document_height: i64, viewport_height: i64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = scroll_y as f64 / scrollable as f64;
    ratio.clamp(0.0, 1.0)
}

/// Reading-progress indicator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressBar {
    ratio: f64,
}

impl ProgressBar {
    /// Recomputes progress for the current scroll position.
    pub fn update(&mut self, scroll_y: i64, document_height: i64, viewport_height: i64) {
        self.ratio = scroll_progress(scroll_y, document_height, viewport_height);
    }

    #[must_use]
    /// Progress in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

/// Button that returns to the top once the reader is far enough down.
#[derive(Debug, Clone, Copy)]
pub struct BackToTop {
    threshold: i64,
    visible: bool,
}

impl BackToTop {
    #[must_use]
    /// Hidden until the scroll position exceeds `threshold`.
    pub fn new(threshold: i64) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    #[must_use]
    /// Whether the button is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the button for the current scroll position.
    pub fn update(&mut self, scroll_y: i64) {
        self.visible = scroll_y > self.threshold;
    }

    /// Smooth-scrolls to the top when visible. Returns whether it acted.
    pub fn activate<S: Scroller + ?Sized>(&self, scroller: &mut S) -> bool {
        if self.visible {
            scroller.scroll_to(0, ScrollBehavior::Smooth);
        }
        self.visible
    }
}

#[cfg(test)]
#[path = "tests/controls.rs"]
mod tests;
