//! Configuration to acknowledge reader preferences as well as set defaults.
//!
//! We look for a wayfinder.toml (or the file passed with `--config`), and if present we load
//! settings from there. Geometry is measured in page units: one rendered row is `row_height`
//! units tall, so the margins below read like pixel offsets on a web page.

use crate::error::{Error, Result};
use facet::Facet;
use std::path::Path;
use std::time::Duration;
use std::{fs, io};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "wayfinder.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// Reader preferences loaded from wayfinder.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 20)]
    /// Page units per rendered terminal row.
    pub row_height: i64,
    #[facet(default = 2)]
    /// Rows hidden beneath the sticky header.
    pub header_rows: i64,
    #[facet(default = 20)]
    /// Gap left between the header and a section scrolled to by a link or search result.
    pub nav_margin: i64,
    #[facet(default = 50)]
    /// Lead-in that lets a section become active slightly before it reaches the header.
    pub lead_in: i64,
    #[facet(default = 500)]
    /// Scroll position past which the back-to-top control appears.
    pub back_to_top_threshold: i64,
    #[facet(default = 15)]
    /// Code samples with more lines than this get a show-more toggle.
    pub collapse_threshold: usize,
    #[facet(default = 15)]
    /// Lines of a collapsed sample that stay visible.
    pub collapsed_lines: usize,
    #[facet(default = 2000)]
    /// Milliseconds before a copy label reverts to idle.
    pub copy_revert_ms: u64,
    #[facet(default = 200)]
    /// Milliseconds of typing inactivity before a search runs.
    pub search_debounce_ms: u64,
    #[facet(default = 2)]
    /// Shortest query that produces results.
    pub min_query_len: usize,
    #[facet(default = 10)]
    /// Maximum number of search results displayed.
    pub max_results: usize,
    #[facet(default = 28)]
    /// Width of the section sidebar in columns.
    pub sidebar_width: u16,
    #[facet(default = 30)]
    /// Event loop poll interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            row_height: 20,
            header_rows: 2,
            nav_margin: 20,
            lead_in: 50,
            back_to_top_threshold: 500,
            collapse_threshold: 15,
            collapsed_lines: 15,
            copy_revert_ms: 2000,
            search_debounce_ms: 200,
            min_query_len: 2,
            max_results: 10,
            sidebar_width: 28,
            tick_ms: 30,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from wayfinder.toml in the working directory.
    ///
    /// A missing file is not an error and yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).map_err(|reason| Error::Config {
                path: path.to_path_buf(),
                reason,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(Error::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(contents: &str) -> std::result::Result<Self, String> {
        facet_toml::from_str::<Self>(contents).map_err(|e| e.to_string())
    }

    #[must_use]
    /// Height of the sticky header in page units.
    pub fn header_height(&self) -> i64 {
        self.header_rows * self.row_height
    }

    #[must_use]
    /// Delay before a copied or failed label reverts.
    pub fn copy_revert(&self) -> Duration {
        Duration::from_millis(self.copy_revert_ms)
    }

    #[must_use]
    /// Inactivity window applied to search input.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    /// Event loop poll interval.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
