//! wayfinder: section-synchronised navigation and in-page search for reference documents.
//!
//! A markdown reference document is parsed once into sections, fragments and code samples,
//! laid out as a scrollable page, and wired to a sidebar that follows the reading position,
//! a literal full-text search over the fragments, and per-sample copy and collapse controls.

pub mod app_state;
pub mod config;
pub mod controls;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod logging;
pub mod nav;
pub mod search;
pub mod section;
pub mod ui;
pub mod viewport;

pub use error::{Error, Result};
