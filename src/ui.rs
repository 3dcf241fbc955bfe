//! The UI renders the application state into something visible and scrollable.
//!
//! The document pane behaves like a web page under a sticky header: rows scroll beneath a
//! title bar that carries the search input and the reading-progress bar. Search results drop
//! down directly under the header, the sidebar lists section links with the active one
//! highlighted, and every code sample is framed with its copy and toggle labels.

use crate::app_state::{AppState, Focus};
use crate::config::Config;
use crate::controls::{CodeControls, CopyState};
use crate::geometry::Scroller;
use crate::layout::{Row, RowKind};
use crate::section::Document;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, LineGauge, List, ListItem, Paragraph},
    Frame,
};
use std::collections::HashMap;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use unicode_width::UnicodeWidthStr;

const THEME: &str = "base16-ocean.dark";

/// Screen regions for one frame.
pub struct Regions {
    /// Scrolling document pane, including the rows under the sticky header.
    pub document: Rect,
    /// Section link list.
    pub sidebar: Rect,
    /// Help or status bar.
    pub help: Rect,
}

#[must_use]
/// Splits the terminal area into document, sidebar and help bar.
pub fn regions(area: Rect, cfg: &Config) -> Regions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(cfg.sidebar_width)])
        .split(rows[0]);
    Regions {
        document: columns[0],
        sidebar: columns[1],
        help: rows[1],
    }
}

/// Syntax highlighting for code samples, cached per sample.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
    cache: HashMap<usize, Vec<Line<'static>>>,
}

impl Default for Highlighter {
    fn default() -> Self {
        let mut themes = ThemeSet::load_defaults();
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme: themes.themes.remove(THEME).unwrap_or_default(),
            cache: HashMap::new(),
        }
    }
}

impl Highlighter {
    fn line(&mut self, document: &Document, sample: usize, line: usize) -> Line<'static> {
        if !self.cache.contains_key(&sample) {
            let lines = self.highlight(document, sample);
            self.cache.insert(sample, lines);
        }
        self.cache
            .get(&sample)
            .and_then(|lines| lines.get(line))
            .cloned()
            .unwrap_or_default()
    }

    fn highlight(&self, document: &Document, sample: usize) -> Vec<Line<'static>> {
        let Some(sample) = document.samples.get(sample) else {
            return Vec::new();
        };
        let syntax = sample
            .language
            .as_deref()
            .and_then(|token| self.syntaxes.find_syntax_by_token(token))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        LinesWithEndings::from(&sample.text)
            .map(|text| match highlighter.highlight_line(text, &self.syntaxes) {
                Ok(ranges) => Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, piece)| {
                            let fg = style.foreground;
                            Span::styled(
                                clean(piece),
                                Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                            )
                        })
                        .collect::<Vec<_>>(),
                ),
                Err(e) => {
                    tracing::debug!(error = %e, "highlighting failed");
                    Line::from(clean(text))
                }
            })
            .collect()
    }
}

fn clean(text: &str) -> String {
    text.trim_end_matches(['\n', '\r']).replace('\t', "    ")
}

/// Renders the whole screen.
pub fn draw(f: &mut Frame, app: &AppState, highlighter: &mut Highlighter) {
    let regions = regions(f.area(), &app.config);
    draw_document(f, app, highlighter, regions.document);
    draw_header(f, app, regions.document);
    draw_results(f, app, regions.document);
    draw_back_to_top(f, app, regions.document);
    draw_sidebar(f, app, regions.sidebar);
    draw_help(f, app, regions.help);
}

fn draw_document(f: &mut Frame, app: &AppState, highlighter: &mut Highlighter, area: Rect) {
    let first = app.layout.row_at(app.viewport.scroll_y());
    let lines: Vec<Line> = app
        .layout
        .rows()
        .iter()
        .skip(first)
        .take(usize::from(area.height))
        .map(|row| render_row(row, &app.document, &app.controls, highlighter, area.width))
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn render_row(
    row: &Row,
    document: &Document,
    controls: &CodeControls,
    highlighter: &mut Highlighter,
    width: u16,
) -> Line<'static> {
    match &row.kind {
        RowKind::SectionHeading(_) => Line::from(Span::styled(
            format!("## {}", row.text),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        RowKind::FragmentHeading => Line::from(Span::styled(
            format!("### {}", row.text),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        RowKind::Subheading => Line::from(Span::styled(
            row.text.clone(),
            Style::default().add_modifier(Modifier::ITALIC | Modifier::BOLD),
        )),
        RowKind::Prose => Line::from(row.text.clone()),
        RowKind::CodeHeader(sample) => {
            let (label, color) = controls.copies.get(*sample).map_or(("Copy", Color::Gray), |c| {
                let color = match c.state() {
                    CopyState::Idle => Color::Gray,
                    CopyState::Copied => Color::Green,
                    CopyState::Failed => Color::Red,
                };
                (c.label(), color)
            });
            let button = format!("[{label}]");
            let lead = format!("┌─ {} ", row.text);
            let fill = usize::from(width).saturating_sub(lead.width() + button.width() + 1);
            Line::from(vec![
                Span::styled(lead, Style::default().fg(Color::DarkGray)),
                Span::styled("─".repeat(fill), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(button, Style::default().fg(color)),
            ])
        }
        RowKind::Code { sample, line } => {
            let mut spans = vec![Span::styled("│ ", Style::default().fg(Color::DarkGray))];
            spans.extend(highlighter.line(document, *sample, *line).spans);
            Line::from(spans)
        }
        RowKind::CodeFooter(sample) => {
            let mut spans = vec![Span::styled("└─", Style::default().fg(Color::DarkGray))];
            if let Some(toggle) = controls.toggles.get(*sample).and_then(Option::as_ref) {
                spans.push(Span::styled(
                    format!(" [{}]", toggle.label()),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Line::from(spans)
        }
        RowKind::Blank => Line::default(),
    }
}

/// Sticky header overlaying the top rows of the document pane.
fn draw_header(f: &mut Frame, app: &AppState, area: Rect) {
    let rows = u16::try_from(app.config.header_rows.max(1))
        .unwrap_or(1)
        .min(area.height);
    if rows == 0 {
        return;
    }
    let header = Rect::new(area.x, area.y, area.width, rows);
    f.render_widget(Clear, header);

    let title = app.document.title.clone().unwrap_or_default();
    let search_style = if app.focus == Focus::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title_line = Line::from(vec![
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(format!("/ {}", app.search.query()), search_style),
    ]);
    f.render_widget(
        Paragraph::new(title_line),
        Rect::new(header.x, header.y, header.width, 1),
    );

    if rows > 1 {
        let gauge = LineGauge::default()
            .filled_style(Style::default().fg(Color::Cyan))
            .ratio(app.progress.ratio());
        f.render_widget(
            gauge,
            Rect::new(header.x, header.y + rows - 1, header.width, 1),
        );
    }
}

/// Result list inserted directly under the header.
fn draw_results(f: &mut Frame, app: &AppState, area: Rect) {
    let results = app.search.results();
    if results.is_empty() {
        return;
    }
    let top = u16::try_from(app.config.header_rows.max(0)).unwrap_or(0);
    let wanted = u16::try_from(results.len()).unwrap_or(u16::MAX).saturating_add(2);
    let height = wanted.min(area.height.saturating_sub(top));
    if height < 3 {
        return;
    }
    let popup = Rect::new(area.x, area.y + top, area.width, height);

    let items: Vec<ListItem> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let fragment = if result.fragment_title.is_empty() {
                result.section_title.as_str()
            } else {
                result.fragment_title.as_str()
            };
            let line = Line::from(vec![
                Span::styled(
                    format!("{} › ", result.section_title),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(fragment.to_string()),
                Span::styled(
                    format!("  ({})", result.score),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            let style = if i == app.search.selected() && app.focus == Focus::Search {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(Clear, popup);
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(list, popup);
}

fn draw_back_to_top(f: &mut Frame, app: &AppState, area: Rect) {
    if !app.back_to_top.is_visible() || area.height == 0 {
        return;
    }
    let label = "↑ Top (t)";
    let width = u16::try_from(label.width()).unwrap_or(0).min(area.width);
    let spot = Rect::new(
        area.x + area.width - width,
        area.y + area.height - 1,
        width,
        1,
    );
    f.render_widget(
        Paragraph::new(label).style(Style::default().fg(Color::Black).bg(Color::Cyan)),
        spot,
    );
}

fn draw_sidebar(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .nav
        .links()
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let marker = if app.focus == Focus::Sidebar && i == app.nav.cursor() {
                "> "
            } else {
                "  "
            };
            let style = if app.nav.active() == Some(i) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(format!("{marker}{}", link.label)).style(style)
        })
        .collect();

    let border = if app.focus == Focus::Sidebar {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title("Sections"),
    );
    f.render_widget(list, area);
}

fn draw_help(f: &mut Frame, app: &AppState, area: Rect) {
    let help = if let Some(ref msg) = app.message {
        msg.clone()
    } else {
        match app.focus {
            Focus::Document => {
                "↑/↓ PgUp/PgDn: Scroll | /: Search | Tab: Sections | y: Copy | z: Expand | t: Top | q: Quit"
            }
            Focus::Sidebar => "↑/↓: Choose | Enter: Go | Tab/Esc: Document | q: Quit",
            Focus::Search => "Type to search | ↑/↓: Choose | Enter: Go | Esc: Clear",
        }
        .to_string()
    };
    let help_widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, area);
}
