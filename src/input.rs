//! Reading a markdown file and lifting it into a [`Document`].
//!
//! Headings and fenced code are located with tree-sitter queries; everything else is grouped
//! into prose paragraphs line by line. Level-2 headings open sections, level-3 headings open
//! fragments, and deeper headings stay inline as subheadings.

use crate::error::{Error, Result};
use crate::formats::Format;
use crate::section::{slugify, Block, CodeSample, Document, Fragment, NavigableSection};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor, Tree};

/// Heading found by the section query.
struct Heading {
    level: usize,
    title: String,
}

/// Fenced code block found by the code query.
#[derive(Default)]
struct Fence {
    first_row: usize,
    last_row: usize,
    language: Option<String>,
    text: String,
}

/// Reads and parses the document at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the grammar fails to parse it.
pub fn load_document<F: Format>(path: &Path, format: &F) -> Result<Document> {
    let source = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&source, format)?;
    tracing::info!(
        path = %path.display(),
        sections = document.sections.len(),
        samples = document.samples.len(),
        "loaded document"
    );
    Ok(document)
}

/// Parses markdown `source` into a [`Document`].
///
/// # Errors
///
/// Returns an error if the grammar or its queries cannot be loaded, or parsing fails.
pub fn parse_document<F: Format>(source: &str, format: &F) -> Result<Document> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let tree = parser.parse(source, None).ok_or(Error::Parse)?;

    let headings = collect_headings(&tree, source, format)?;
    let fences = collect_fences(&tree, source, format)?;

    Ok(assemble(source, &headings, fences))
}

fn collect_headings<F: Format>(
    tree: &Tree,
    source: &str,
    format: &F,
) -> Result<HashMap<usize, Heading>> {
    let language = format.language();
    let bytes = source.as_bytes();

    // Heading text keyed by the heading node's start byte
    let title_query = Query::new(&language, format.title_query())?;
    let mut titles: HashMap<usize, String> = HashMap::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&title_query, tree.root_node(), bytes);
    while let Some(m) = matches.next() {
        for capture in m.captures {
            if let Some(heading) = capture.node.parent() {
                let text = capture.node.utf8_text(bytes)?.trim().to_string();
                titles.insert(heading.start_byte(), text);
            }
        }
    }

    let section_query = Query::new(&language, format.section_query())?;
    let mut headings = HashMap::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&section_query, tree.root_node(), bytes);
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            headings.insert(
                node.start_position().row,
                Heading {
                    level: format.heading_level(node),
                    title: titles.remove(&node.start_byte()).unwrap_or_default(),
                },
            );
        }
    }
    Ok(headings)
}

fn collect_fences<F: Format>(tree: &Tree, source: &str, format: &F) -> Result<Vec<Fence>> {
    let language = format.language();
    let bytes = source.as_bytes();
    let query = Query::new(&language, format.code_query())?;
    let info_index = query.capture_index_for_name("info");
    let content_index = query.capture_index_for_name("content");
    let code_index = query.capture_index_for_name("code");

    // Optional captures can report the same block more than once
    let mut fences: BTreeMap<usize, Fence> = BTreeMap::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), bytes);
    while let Some(m) = matches.next() {
        let Some(code) = m
            .captures
            .iter()
            .find(|c| Some(c.index) == code_index)
            .map(|c| c.node)
        else {
            continue;
        };
        let fence = fences.entry(code.start_byte()).or_insert_with(|| Fence {
            first_row: code.start_position().row,
            last_row: last_row(code),
            ..Fence::default()
        });
        for capture in m.captures {
            if Some(capture.index) == info_index {
                let info = capture.node.utf8_text(bytes)?;
                fence.language = info.split_whitespace().next().map(str::to_string);
            } else if Some(capture.index) == content_index {
                let text = capture.node.utf8_text(bytes)?;
                fence.text = text.trim_end_matches(['\n', '\r']).to_string();
            }
        }
    }
    Ok(fences.into_values().collect())
}

/// Last source row a node occupies, ignoring a trailing newline.
fn last_row(node: Node<'_>) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row - 1
    } else {
        end.row
    }
}

/// Accumulates sections and fragments while walking the source lines.
#[derive(Default)]
struct Builder {
    document: Document,
    section: Option<NavigableSection>,
    fragment: Option<Fragment>,
    paragraph: Vec<String>,
    ids: HashSet<String>,
}

impl Builder {
    fn push_block(&mut self, block: Block) {
        if self.section.is_some() {
            self.fragment
                .get_or_insert_with(Fragment::default)
                .blocks
                .push(block);
        } else {
            self.document.intro.push(block);
        }
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join("\n");
            self.paragraph.clear();
            self.push_block(Block::Prose(text));
        }
    }

    fn close_fragment(&mut self) {
        self.flush_paragraph();
        if let (Some(section), Some(fragment)) = (self.section.as_mut(), self.fragment.take()) {
            if !fragment.title.is_empty() || !fragment.blocks.is_empty() {
                section.fragments.push(fragment);
            }
        }
    }

    fn close_section(&mut self) {
        self.close_fragment();
        if let Some(section) = self.section.take() {
            self.document.sections.push(section);
        }
    }

    fn open_section(&mut self, title: &str) {
        self.close_section();
        let base = slugify(title);
        // A literal heading such as "Intro 1" can already own a suffixed slug
        let mut id = base.clone();
        let mut suffix = 0;
        while self.ids.contains(&id) {
            suffix += 1;
            id = format!("{base}-{suffix}");
        }
        self.ids.insert(id.clone());
        self.section = Some(NavigableSection {
            id,
            title: title.to_string(),
            fragments: Vec::new(),
        });
    }

    fn open_fragment(&mut self, title: &str) {
        if self.section.is_none() {
            self.flush_paragraph();
            self.document.intro.push(Block::Subheading(title.to_string()));
            return;
        }
        self.close_fragment();
        self.fragment = Some(Fragment {
            title: title.to_string(),
            blocks: Vec::new(),
        });
    }

    fn heading(&mut self, heading: &Heading) {
        match heading.level {
            1 if self.document.title.is_none() => {
                self.flush_paragraph();
                self.document.title = Some(heading.title.clone());
            }
            2 => self.open_section(&heading.title),
            3 => self.open_fragment(&heading.title),
            _ => {
                self.flush_paragraph();
                self.push_block(Block::Subheading(heading.title.clone()));
            }
        }
    }

    fn finish(mut self) -> Document {
        self.close_section();
        self.flush_paragraph();
        self.document
    }
}

fn assemble(source: &str, headings: &HashMap<usize, Heading>, fences: Vec<Fence>) -> Document {
    let lines: Vec<&str> = source.lines().collect();
    let mut fence_at: HashMap<usize, (usize, usize)> = HashMap::new();
    let mut builder = Builder::default();

    for fence in fences {
        let index = builder.document.samples.len();
        fence_at.insert(fence.first_row, (fence.last_row, index));
        builder.document.samples.push(CodeSample {
            language: fence.language,
            text: fence.text,
        });
    }

    let mut row = 0;
    while row < lines.len() {
        if let Some(&(last, index)) = fence_at.get(&row) {
            builder.flush_paragraph();
            builder.push_block(Block::Code(index));
            row = last + 1;
            continue;
        }
        if let Some(heading) = headings.get(&row) {
            builder.heading(heading);
            row += 1;
            continue;
        }
        let line = lines[row].trim_end();
        if line.trim().is_empty() {
            builder.flush_paragraph();
        } else {
            builder.paragraph.push(line.to_string());
        }
        row += 1;
    }

    builder.finish()
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
