//! Format trait and implementations for different document types.
//!
//! This module defines the `Format` trait which abstracts over document formats by providing
//! the tree-sitter grammar and the queries that locate headings and code samples in it.

pub mod markdown;

/// Grammar and queries needed to lift a document into sections and code samples.
pub trait Format {
    /// Tree-sitter grammar for the format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing every heading node as `@heading`.
    fn section_query(&self) -> &str;
    /// Query capturing the text of a heading as `@title`; its parent is the heading node.
    fn title_query(&self) -> &str;
    /// Query capturing code samples as `@code`, with optional `@info` and `@content`.
    fn code_query(&self) -> &str;
    /// Nesting depth of a heading node (1 for top-level).
    fn heading_level(&self, heading: tree_sitter::Node<'_>) -> usize;
}
