//! Markdown documents via tree-sitter-md.
//!
//! Only ATX headings (`#` syntax) open sections and fragments; setext headings are read as
//! prose. Fenced code blocks become code samples, with the info string as their language.

use crate::formats::Format;

/// CommonMark block grammar with heading and fence queries.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn section_query(&self) -> &'static str {
        "(atx_heading) @heading"
    }

    fn title_query(&self) -> &'static str {
        "(atx_heading (atx_h1_marker)? (atx_h2_marker)? (atx_h3_marker)? (atx_h4_marker)? (atx_h5_marker)? (atx_h6_marker)? (inline) @title)"
    }

    fn code_query(&self) -> &'static str {
        "(fenced_code_block (info_string)? @info (code_fence_content)? @content) @code"
    }

    fn heading_level(&self, heading: tree_sitter::Node<'_>) -> usize {
        let mut cursor = heading.walk();
        let level = heading
            .children(&mut cursor)
            .find_map(|child| marker_level(child.kind()));
        level.unwrap_or(1)
    }
}

/// Level encoded in a marker kind such as `atx_h3_marker`.
fn marker_level(kind: &str) -> Option<usize> {
    kind.strip_prefix("atx_h")?
        .strip_suffix("_marker")?
        .parse()
        .ok()
}
