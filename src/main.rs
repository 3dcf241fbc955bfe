//! wayfinder: a terminal reader for multi-section reference documents.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use wayfinder::app_state::{AppState, Focus};
use wayfinder::controls::{SystemClipboard, ToggleState};
use wayfinder::{config, formats, input, logging, search, ui};

#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(about = "Section-synchronised navigation and in-page search for reference documents", long_about = None)]
struct Args {
    /// Markdown document to read
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Configuration file (defaults to ./wayfinder.toml when present)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run a single search and print the results as JSON
    #[arg(long, short = 'q', value_name = "TEXT")]
    query: Option<String>,

    /// Log at debug level
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Log file destination
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> wayfinder::Result<()> {
    let log_path = args.log_file.unwrap_or_else(logging::default_log_path);
    logging::init_tracing(args.verbose, &log_path)?;

    let cfg = config::Config::load(args.config.as_deref())?;
    let document = input::load_document(&args.path, &formats::markdown::MarkdownFormat)?;

    if let Some(query) = args.query {
        let index = search::SearchIndex::build(&document).with_limits(cfg.min_query_len, cfg.max_results);
        let results = index.search(&query);
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if document.sections.is_empty() {
        eprintln!("No sections found in {}", args.path.display());
        return Ok(());
    }

    run_tui(document, cfg)
}

fn run_tui(document: wayfinder::section::Document, cfg: config::Config) -> wayfinder::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let regions = ui::regions(Rect::new(0, 0, size.width, size.height), &cfg);
    let mut app = AppState::new(
        document,
        cfg,
        Box::new(SystemClipboard::default()),
        usize::from(regions.document.width),
        regions.document.height,
    );

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> wayfinder::Result<()> {
    let mut highlighter = ui::Highlighter::default();
    let tick = app.config.tick();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app, &mut highlighter))?;

        if event::poll(tick)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key, Instant::now());
                }
                Event::Resize(width, height) => {
                    let regions = ui::regions(Rect::new(0, 0, width, height), &app.config);
                    app.resize(usize::from(regions.document.width), regions.document.height);
                }
                _ => {}
            }
        }

        app.tick(Instant::now());
    }

    Ok(())
}

fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) {
    app.clear_message();
    match app.focus {
        Focus::Document => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => app.scroll_rows(-1),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_rows(1),
            KeyCode::PageUp => app.scroll_page(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_page(1),
            KeyCode::Home => app.scroll_to_edge(false),
            KeyCode::End => app.scroll_to_edge(true),
            KeyCode::Tab => app.set_focus(Focus::Sidebar),
            KeyCode::Char('/') => app.set_focus(Focus::Search),
            KeyCode::Char('y') => {
                app.copy_focused(now);
            }
            KeyCode::Char('z') => {
                if let Some(state) = app.toggle_focused() {
                    app.show_message(match state {
                        ToggleState::Expanded => "Expanded",
                        ToggleState::Collapsed => "Collapsed",
                    });
                }
            }
            KeyCode::Char('t') => {
                app.back_to_top();
            }
            _ => {}
        },
        Focus::Sidebar => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => app.nav.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => app.nav.cursor_down(),
            KeyCode::Enter => {
                app.activate_link();
            }
            KeyCode::Tab | KeyCode::Esc => app.set_focus(Focus::Document),
            _ => {}
        },
        Focus::Search => match key.code {
            KeyCode::Char(c) => app.search_input(c, now),
            KeyCode::Backspace => app.search_backspace(now),
            KeyCode::Up => app.search.select_prev(),
            KeyCode::Down => app.search.select_next(),
            KeyCode::Enter => {
                if !app.select_search_result() {
                    app.set_focus(Focus::Document);
                }
            }
            KeyCode::Esc => app.cancel_search(),
            _ => {}
        },
    }
}
