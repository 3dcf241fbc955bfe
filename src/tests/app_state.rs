use super::{AppState, Focus};
use crate::config::Config;
use crate::controls::{Clipboard, ClipboardError, CopyState, ToggleState};
use crate::geometry::{Page, Rect, Scroller};
use crate::section::{Block, CodeSample, Document, Fragment, NavigableSection};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Default, Clone)]
struct RecordingClipboard {
    copied: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl Clipboard for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Unavailable("no display".to_string()));
        }
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

fn prose(prefix: &str, lines: usize) -> Block {
    Block::Prose(
        (0..lines)
            .map(|i| format!("{prefix} line {i}"))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

fn section(id: &str, title: &str, fragments: Vec<Fragment>) -> NavigableSection {
    NavigableSection {
        id: id.to_string(),
        title: title.to_string(),
        fragments,
    }
}

fn fragment(title: &str, blocks: Vec<Block>) -> Fragment {
    Fragment {
        title: title.to_string(),
        blocks,
    }
}

/// Three sections at rows 0, 31 and 56 (units 0, 620, 1120) with one 20-line sample at row 13.
fn document() -> Document {
    Document {
        title: Some("Handbook".to_string()),
        intro: Vec::new(),
        sections: vec![
            section(
                "s1",
                "Overview",
                vec![fragment("", vec![prose("overview", 10), Block::Code(0)])],
            ),
            section(
                "s2",
                "Setup",
                vec![fragment("Install", vec![prose("install step", 20)])],
            ),
            section(
                "s3",
                "Reference",
                vec![fragment("", vec![prose("reference", 20)])],
            ),
        ],
        samples: vec![CodeSample {
            language: Some("rust".to_string()),
            text: (0..20)
                .map(|i| format!("fn f{i}() {{}}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }],
    }
}

fn app_with(clipboard: RecordingClipboard) -> AppState {
    AppState::new(document(), Config::default(), Box::new(clipboard), 80, 10)
}

fn app() -> AppState {
    app_with(RecordingClipboard::default())
}

fn settle(app: &mut AppState, now: Instant) {
    for _ in 0..200 {
        if !app.viewport.is_animating() {
            break;
        }
        app.tick(now);
    }
}

#[test]
fn test_initial_state() {
    let app = app();
    assert_eq!(app.layout.element_rect("s1"), Some(Rect::new(0, 620)));
    assert_eq!(app.layout.element_rect("s2"), Some(Rect::new(620, 500)));
    assert_eq!(app.layout.element_rect("s3"), Some(Rect::new(1120, 460)));
    assert_eq!(app.layout.document_height(), 1580);
    assert_eq!(app.viewport.height(), 200);
    assert_eq!(app.nav.active_id(), Some("s1"));
    assert!(app.progress.ratio().abs() < f64::EPSILON);
    assert!(!app.back_to_top.is_visible());
    assert_eq!(app.focus, Focus::Document);
}

#[test]
fn test_scrolling_updates_dependent_views() {
    let mut app = app();
    app.scroll_rows(30);

    assert_eq!(app.viewport.scroll_y(), 600);
    assert_eq!(app.nav.active_id(), Some("s2"));
    assert!((app.progress.ratio() - 600.0 / 1380.0).abs() < 1e-9);
    assert!(app.back_to_top.is_visible());

    app.scroll_to_edge(true);
    assert_eq!(app.viewport.scroll_y(), 1380);
    assert_eq!(app.nav.active_id(), Some("s3"));
    assert!((app.progress.ratio() - 1.0).abs() < f64::EPSILON);

    app.scroll_to_edge(false);
    assert_eq!(app.viewport.scroll_y(), 0);
    assert_eq!(app.nav.active_id(), Some("s1"));
}

#[test]
fn test_link_activation_scrolls_below_header() {
    let mut app = app();
    let now = Instant::now();

    assert!(app.activate_section("s3"));
    assert_eq!(app.nav.active_id(), Some("s3"));
    assert!(app.viewport.is_animating());

    settle(&mut app, now);
    assert_eq!(app.viewport.scroll_y(), 1060);
    assert_eq!(app.nav.active_id(), Some("s3"));

    app.set_focus(Focus::Sidebar);
    assert_eq!(app.nav.cursor(), 2);
}

#[test]
fn test_unknown_link_is_ignored() {
    let mut app = app();
    assert!(!app.activate_section("missing"));
    assert!(!app.viewport.is_animating());
    assert_eq!(app.nav.active_id(), Some("s1"));
}

#[test]
fn test_sidebar_cursor_activation() {
    let mut app = app();
    app.set_focus(Focus::Sidebar);
    app.nav.cursor_down();
    assert!(app.activate_link());
    settle(&mut app, Instant::now());
    assert_eq!(app.viewport.scroll_y(), 560);
    assert_eq!(app.nav.active_id(), Some("s2"));
}

#[test]
fn test_search_is_debounced_then_navigates() {
    let mut app = app();
    let start = Instant::now();
    app.set_focus(Focus::Search);
    for c in "inst".chars() {
        app.search_input(c, start);
    }
    assert!(app.search.results().is_empty());
    assert!(app.search.is_pending());

    assert!(!app.tick(start + Duration::from_millis(50)));
    assert!(app.search.results().is_empty());

    assert!(app.tick(start + Duration::from_millis(250)));
    let first = &app.search.results()[0];
    assert_eq!(first.section_id, "s2");
    assert_eq!(first.fragment_title, "Install");

    assert!(app.select_search_result());
    assert_eq!(app.search.query(), "");
    assert!(app.search.results().is_empty());
    assert_eq!(app.focus, Focus::Document);

    settle(&mut app, start);
    assert_eq!(app.viewport.scroll_y(), 560);
}

#[test]
fn test_select_flushes_pending_search() {
    let mut app = app();
    let now = Instant::now();
    for c in "reference".chars() {
        app.search_input(c, now);
    }
    assert!(app.select_search_result());
    settle(&mut app, now);
    assert_eq!(app.viewport.scroll_y(), 1060);
}

#[test]
fn test_cancel_search() {
    let mut app = app();
    let now = Instant::now();
    app.set_focus(Focus::Search);
    app.search_input('o', now);
    app.search_input('v', now);
    app.search_backspace(now);
    assert_eq!(app.search.query(), "o");
    app.cancel_search();
    assert_eq!(app.search.query(), "");
    assert_eq!(app.focus, Focus::Document);
    assert!(!app.select_search_result());
}

#[test]
fn test_copy_focused_sample() {
    let clipboard = RecordingClipboard::default();
    let copied = Rc::clone(&clipboard.copied);
    let mut app = app_with(clipboard);
    let now = Instant::now();

    assert_eq!(app.focused_sample(), None);
    assert_eq!(app.copy_focused(now), None);
    assert_eq!(app.message.as_deref(), Some("No code sample in view"));

    app.scroll_rows(6);
    assert_eq!(app.focused_sample(), Some(0));
    assert_eq!(app.copy_focused(now), Some(CopyState::Copied));
    assert_eq!(app.message.as_deref(), Some("Copied to clipboard"));
    assert_eq!(copied.borrow().len(), 1);
    assert!(copied.borrow()[0].starts_with("fn f0() {}\nfn f1()"));
    assert!(copied.borrow()[0].ends_with("fn f19() {}"));

    assert!(!app.tick(now + Duration::from_millis(1000)));
    assert_eq!(app.controls.copies[0].state(), CopyState::Copied);
    assert_eq!(app.message.as_deref(), Some("Copied to clipboard"));
    assert!(app.tick(now + Duration::from_millis(2000)));
    assert_eq!(app.controls.copies[0].state(), CopyState::Idle);
    assert_eq!(app.message, None);
}

#[test]
fn test_untimed_message_survives_ticks() {
    let mut app = app();
    let now = Instant::now();
    app.scroll_rows(6);
    app.copy_focused(now);
    app.show_message("Expanded");
    app.tick(now + Duration::from_secs(5));
    assert_eq!(app.message.as_deref(), Some("Expanded"));
    app.clear_message();
    assert_eq!(app.message, None);
}

#[test]
fn test_copy_failure_is_reported() {
    let mut app = app_with(RecordingClipboard {
        fail: true,
        ..RecordingClipboard::default()
    });
    app.scroll_rows(6);
    assert_eq!(app.copy_focused(Instant::now()), Some(CopyState::Failed));
    assert_eq!(app.controls.copies[0].label(), "Failed");
}

#[test]
fn test_toggle_relayouts_document() {
    let mut app = app();
    app.scroll_rows(6);

    assert_eq!(app.toggle_focused(), Some(ToggleState::Expanded));
    assert_eq!(app.layout.document_height(), 1680);
    assert_eq!(app.layout.element_rect("s2"), Some(Rect::new(720, 500)));
    assert_eq!(app.viewport.document_height(), 1680);

    assert_eq!(app.toggle_focused(), Some(ToggleState::Collapsed));
    assert_eq!(app.layout.document_height(), 1580);
}

#[test]
fn test_back_to_top() {
    let mut app = app();
    assert!(!app.back_to_top());

    app.scroll_rows(30);
    assert!(app.back_to_top());
    settle(&mut app, Instant::now());
    assert_eq!(app.viewport.scroll_y(), 0);
    assert!(!app.back_to_top.is_visible());
    assert_eq!(app.nav.active_id(), Some("s1"));
}

#[test]
fn test_resize_keeps_scroll_in_range() {
    let mut app = app();
    app.scroll_to_edge(true);
    app.resize(80, 20);
    assert_eq!(app.viewport.height(), 400);
    assert_eq!(app.viewport.scroll_y(), 1180);
    assert!((app.progress.ratio() - 1.0).abs() < f64::EPSILON);
}
