use super::{count_occurrences, SearchIndex, SearchPanel};
use crate::geometry::{Page, Rect, ScrollBehavior, Scroller};
use crate::section::{Block, Document, Fragment, NavigableSection};
use std::time::{Duration, Instant};

fn fragment(title: &str, text: &str) -> Fragment {
    Fragment {
        title: title.to_string(),
        blocks: vec![Block::Prose(text.to_string())],
    }
}

fn section(id: &str, title: &str, fragments: Vec<Fragment>) -> NavigableSection {
    NavigableSection {
        id: id.to_string(),
        title: title.to_string(),
        fragments,
    }
}

fn scenario() -> Document {
    Document {
        sections: vec![
            section(
                "s1",
                "Intro",
                vec![fragment("Basics", "delegates and middleware basics")],
            ),
            section(
                "s2",
                "Advanced",
                vec![fragment("ACID", "atomicity consistency isolation durability")],
            ),
        ],
        ..Document::default()
    }
}

struct TwoSectionPage;

impl Page for TwoSectionPage {
    fn element_rect(&self, id: &str) -> Option<Rect> {
        match id {
            "s1" => Some(Rect::new(0, 600)),
            "s2" => Some(Rect::new(600, 900)),
            _ => None,
        }
    }

    fn header_height(&self) -> i64 {
        40
    }

    fn document_height(&self) -> i64 {
        1500
    }
}

#[derive(Default)]
struct RecordingScroller {
    calls: Vec<(i64, ScrollBehavior)>,
}

impl Scroller for RecordingScroller {
    fn scroll_y(&self) -> i64 {
        0
    }

    fn scroll_to(&mut self, offset: i64, behavior: ScrollBehavior) {
        self.calls.push((offset, behavior));
    }
}

#[test]
fn test_single_match_in_first_section() {
    let index = SearchIndex::build(&scenario());
    let results = index.search("middleware");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].section_id, "s1");
    assert_eq!(results[0].section_title, "Intro");
    assert_eq!(results[0].fragment_title, "Basics");
    assert_eq!(results[0].score, 1);
}

#[test]
fn test_no_match_is_empty() {
    let index = SearchIndex::build(&scenario());
    assert!(index.search("xyz").is_empty());
}

#[test]
fn test_matching_ignores_case() {
    let index = SearchIndex::build(&scenario());
    let results = index.search("MiddleWare");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 1);
}

#[test]
fn test_short_queries_return_nothing() {
    let index = SearchIndex::build(&scenario());
    for query in ["", "a", "m", " ", " d "] {
        assert!(index.search(query).is_empty(), "query {query:?}");
    }
    assert!(!index.search("de").is_empty());
}

#[test]
fn test_surrounding_whitespace_is_trimmed() {
    let index = SearchIndex::build(&scenario());
    assert_eq!(index.search("  middleware "), index.search("middleware"));
    assert!(!index.accepts(" a"));
}

#[test]
fn test_empty_index_never_matches() {
    let index = SearchIndex::build(&Document::default());
    assert!(index.fragments().is_empty());
    assert!(index.search("anything").is_empty());
}

#[test]
fn test_occurrences_do_not_overlap() {
    assert_eq!(count_occurrences("aaaa bbbb aaaa", "aaaa"), 2);
    assert_eq!(count_occurrences("aaaa bbbb aaaa", "a"), 8);
    assert_eq!(count_occurrences("aaaaa", "aa"), 2);
    assert_eq!(count_occurrences("anything", ""), 0);

    let document = Document {
        sections: vec![section("s", "S", vec![fragment("", "aaaa bbbb aaaa")])],
        ..Document::default()
    };
    let results = SearchIndex::build(&document).search("aaaa");
    assert_eq!(results[0].score, 2);
}

#[test]
fn test_pattern_characters_are_literal() {
    let document = Document {
        sections: vec![section(
            "ops",
            "Operators",
            vec![
                fragment("Regex", "use a.* or (group)+ and [set] with $end ^start"),
                fragment("Plain", "abc abc"),
            ],
        )],
        ..Document::default()
    };
    let index = SearchIndex::build(&document);
    assert_eq!(index.search("a.*")[0].score, 1);
    assert_eq!(index.search("(group)+")[0].fragment_title, "Regex");
    assert_eq!(index.search("[set]").len(), 1);
    assert!(index.search(".*").iter().all(|r| r.fragment_title == "Regex"));
    assert!(index.search("((").is_empty());
    assert!(index.search("a\\").is_empty());
}

#[test]
fn test_results_sorted_by_score_with_stable_ties() {
    let document = Document {
        sections: vec![
            section(
                "one",
                "One",
                vec![
                    fragment("First", "rust"),
                    fragment("Second", "rust rust rust"),
                    fragment("Third", "rust"),
                ],
            ),
            section("two", "Two", vec![fragment("Fourth", "rust rust")]),
        ],
        ..Document::default()
    };
    let results = SearchIndex::build(&document).search("rust");
    let titles: Vec<&str> = results.iter().map(|r| r.fragment_title.as_str()).collect();
    assert_eq!(titles, ["Second", "Fourth", "First", "Third"]);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_results_are_capped() {
    let fragments = (0..25)
        .map(|i| fragment(&format!("Card {i}"), &"needle ".repeat(i % 4 + 1)))
        .collect();
    let document = Document {
        sections: vec![section("many", "Many", fragments)],
        ..Document::default()
    };
    let index = SearchIndex::build(&document);
    let results = index.search("needle");
    assert_eq!(results.len(), 10);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

    let narrow = SearchIndex::build(&document).with_limits(2, 3);
    assert_eq!(narrow.search("needle").len(), 3);
}

#[test]
fn test_search_is_idempotent() {
    let index = SearchIndex::build(&scenario());
    assert_eq!(index.search("is"), index.search("is"));
}

#[test]
fn test_fragment_title_is_searchable() {
    let index = SearchIndex::build(&scenario());
    let results = index.search("acid");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].section_id, "s2");
}

#[test]
fn test_untitled_fragment_still_matches() {
    let document = Document {
        sections: vec![section(
            "loose",
            "Loose",
            vec![fragment("", "text without a card heading")],
        )],
        ..Document::default()
    };
    let results = SearchIndex::build(&document).search("heading");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].fragment_title, "");
    assert_eq!(results[0].section_title, "Loose");
}

#[test]
fn test_panel_waits_for_debounce() {
    let index = SearchIndex::build(&scenario());
    let mut panel = SearchPanel::new(Duration::from_millis(200));
    let start = Instant::now();

    for (i, c) in "middle".chars().enumerate() {
        panel.push_char(c, &index, start + Duration::from_millis(50 * i as u64));
    }
    let last_key = start + Duration::from_millis(250);
    assert!(panel.is_pending());
    assert!(!panel.poll(&index, last_key + Duration::from_millis(199)));
    assert!(panel.results().is_empty());

    assert!(panel.poll(&index, last_key + Duration::from_millis(200)));
    assert_eq!(panel.results().len(), 1);
    assert!(!panel.is_pending());
    assert!(!panel.poll(&index, last_key + Duration::from_secs(5)));
}

#[test]
fn test_panel_clears_results_for_short_query() {
    let index = SearchIndex::build(&scenario());
    let mut panel = SearchPanel::new(Duration::ZERO);
    let now = Instant::now();
    panel.set_query("basics", &index, now);
    panel.poll(&index, now);
    assert_eq!(panel.results().len(), 1);

    panel.set_query("b", &index, now);
    assert!(panel.results().is_empty(), "short query clears immediately");
    assert!(!panel.is_pending());
}

#[test]
fn test_newer_query_supersedes_results() {
    let index = SearchIndex::build(&scenario());
    let mut panel = SearchPanel::new(Duration::ZERO);
    let now = Instant::now();
    panel.set_query("middleware", &index, now);
    panel.flush(&index);
    assert_eq!(panel.results()[0].section_id, "s1");

    panel.set_query("durability", &index, now);
    panel.flush(&index);
    assert_eq!(panel.results().len(), 1);
    assert_eq!(panel.results()[0].section_id, "s2");
}

#[test]
fn test_selection_wraps() {
    let document = Document {
        sections: vec![section(
            "s",
            "S",
            vec![fragment("A", "xx"), fragment("B", "xx"), fragment("C", "xx")],
        )],
        ..Document::default()
    };
    let index = SearchIndex::build(&document);
    let mut panel = SearchPanel::new(Duration::ZERO);
    panel.set_query("xx", &index, Instant::now());
    panel.flush(&index);

    panel.select_prev();
    assert_eq!(panel.selected_result().unwrap().fragment_title, "C");
    panel.select_next();
    assert_eq!(panel.selected(), 0);
    panel.select_next();
    assert_eq!(panel.selected_result().unwrap().fragment_title, "B");
}

#[test]
fn test_select_result_scrolls_and_clears() {
    let index = SearchIndex::build(&scenario());
    let mut panel = SearchPanel::new(Duration::ZERO);
    panel.set_query("durability", &index, Instant::now());
    panel.flush(&index);
    assert_eq!(panel.results().len(), 1);

    let mut scroller = RecordingScroller::default();
    assert!(panel.select_result("s2", &TwoSectionPage, &mut scroller, 20));
    assert_eq!(scroller.calls, vec![(540, ScrollBehavior::Smooth)]);
    assert_eq!(panel.query(), "");
    assert!(panel.results().is_empty());
}

#[test]
fn test_select_missing_result_clears_without_scrolling() {
    let index = SearchIndex::build(&scenario());
    let mut panel = SearchPanel::new(Duration::ZERO);
    panel.set_query("basics", &index, Instant::now());
    panel.flush(&index);

    let mut scroller = RecordingScroller::default();
    assert!(!panel.select_result("gone", &TwoSectionPage, &mut scroller, 20));
    assert!(scroller.calls.is_empty());
    assert_eq!(panel.query(), "");
    assert!(panel.results().is_empty());
}
