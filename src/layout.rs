//! Flattens a document into terminal rows and measures where each element lands.
//!
//! The layout is the page: it answers where a section or code sample sits and how tall the
//! whole document is. It depends on the pane width (prose is wrapped) and on which samples are
//! collapsed, so it is rebuilt on resize and toggle. The search index never reads it.

use crate::controls::CodeControls;
use crate::geometry::{Page, Rect};
use crate::section::{Block, Document};
use std::borrow::Cow;
use std::collections::HashMap;
use textwrap::{Options, WrapAlgorithm};

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a rendered row shows.
pub enum RowKind {
    /// Heading of the section at this index.
    SectionHeading(usize),
    /// Fragment (concept card) heading.
    FragmentHeading,
    /// Nested heading inside a fragment.
    Subheading,
    /// Wrapped line of prose.
    Prose,
    /// Top border of a code sample, carrying its copy button.
    CodeHeader(usize),
    /// A line of a code sample.
    Code {
        /// Sample index.
        sample: usize,
        /// Line within the sample.
        line: usize,
    },
    /// Bottom border of a code sample, carrying its toggle when it has one.
    CodeFooter(usize),
    /// Spacing.
    Blank,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One rendered row.
pub struct Row {
    /// Role of the row.
    pub kind: RowKind,
    /// Text to draw; decorations are added by the renderer.
    pub text: String,
}

impl Row {
    fn new(kind: RowKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Rendered rows and element positions for one width and toggle configuration.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    rows: Vec<Row>,
    sections: HashMap<String, (usize, usize)>,
    samples: Vec<Option<(usize, usize)>>,
    row_height: i64,
    header_height: i64,
}

impl Layout {
    #[must_use]
    /// Lays out `document` at `width` columns.
    pub fn build(
        document: &Document,
        controls: &CodeControls,
        width: usize,
        row_height: i64,
        header_height: i64,
    ) -> Self {
        let mut builder = LayoutBuilder {
            document,
            controls,
            width: width.max(1),
            rows: Vec::new(),
            samples: vec![None; document.samples.len()],
        };

        for block in &document.intro {
            builder.block(block);
        }

        let mut sections = HashMap::with_capacity(document.sections.len());
        for (index, section) in document.sections.iter().enumerate() {
            let start = builder.rows.len();
            builder.push(RowKind::SectionHeading(index), section.title.clone());
            builder.blank();
            for fragment in &section.fragments {
                if !fragment.title.is_empty() {
                    builder.push(RowKind::FragmentHeading, fragment.title.clone());
                    builder.blank();
                }
                for block in &fragment.blocks {
                    builder.block(block);
                }
            }
            sections.insert(section.id.clone(), (start, builder.rows.len() - start));
        }

        Self {
            rows: builder.rows,
            sections,
            samples: builder.samples,
            row_height,
            header_height,
        }
    }

    #[must_use]
    /// All rows top to bottom.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    /// Units per row.
    pub fn row_height(&self) -> i64 {
        self.row_height
    }

    #[must_use]
    /// Row shown at the top of the pane for `scroll_y`.
    pub fn row_at(&self, scroll_y: i64) -> usize {
        if self.row_height <= 0 {
            return 0;
        }
        usize::try_from(scroll_y.max(0) / self.row_height).unwrap_or(0)
    }

    #[must_use]
    /// Rectangle covered by the code sample at `index`.
    pub fn sample_rect(&self, index: usize) -> Option<Rect> {
        self.samples
            .get(index)
            .copied()
            .flatten()
            .map(|span| self.rect(span))
    }

    #[must_use]
    /// First code sample whose top edge is visible below the header, falling back to a sample
    /// spanning the top of the readable area.
    pub fn focused_sample(&self, scroll_y: i64, viewport_height: i64) -> Option<usize> {
        let readable_top = scroll_y + self.header_height;
        let bottom = scroll_y + viewport_height;
        let rects: Vec<(usize, Rect)> = (0..self.samples.len())
            .filter_map(|i| self.sample_rect(i).map(|r| (i, r)))
            .collect();
        rects
            .iter()
            .find(|(_, r)| r.top >= readable_top && r.top < bottom)
            .or_else(|| {
                rects
                    .iter()
                    .find(|(_, r)| r.top < readable_top && r.top + r.height > readable_top)
            })
            .map(|&(i, _)| i)
    }

    fn rect(&self, (start, len): (usize, usize)) -> Rect {
        let to_units = |rows: usize| i64::try_from(rows).unwrap_or(i64::MAX) * self.row_height;
        Rect::new(to_units(start), to_units(len))
    }
}

impl Page for Layout {
    fn element_rect(&self, id: &str) -> Option<Rect> {
        self.sections.get(id).map(|&span| self.rect(span))
    }

    fn header_height(&self) -> i64 {
        self.header_height
    }

    fn document_height(&self) -> i64 {
        i64::try_from(self.rows.len()).unwrap_or(i64::MAX) * self.row_height
    }
}

struct LayoutBuilder<'a> {
    document: &'a Document,
    controls: &'a CodeControls,
    width: usize,
    rows: Vec<Row>,
    samples: Vec<Option<(usize, usize)>>,
}

impl LayoutBuilder<'_> {
    fn push(&mut self, kind: RowKind, text: impl Into<String>) {
        self.rows.push(Row::new(kind, text));
    }

    fn blank(&mut self) {
        self.push(RowKind::Blank, "");
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Prose(text) => {
                for line in text.lines() {
                    for wrapped in wrap(line, self.width) {
                        self.push(RowKind::Prose, wrapped);
                    }
                }
            }
            Block::Subheading(text) => self.push(RowKind::Subheading, text.clone()),
            Block::Code(index) => self.code(*index),
        }
        self.blank();
    }

    fn code(&mut self, index: usize) {
        let Some(sample) = self.document.samples.get(index) else {
            return;
        };
        let start = self.rows.len();
        self.push(
            RowKind::CodeHeader(index),
            sample.language.clone().unwrap_or_default(),
        );
        let shown = self.controls.visible_lines(index, sample);
        let mut lines = sample.text.lines().take(shown).peekable();
        if lines.peek().is_none() {
            self.push(RowKind::Code { sample: index, line: 0 }, "");
        }
        for (line, text) in lines.enumerate() {
            self.push(
                RowKind::Code { sample: index, line },
                text.replace('\t', "    "),
            );
        }
        self.push(RowKind::CodeFooter(index), "");
        if let Some(slot) = self.samples.get_mut(index) {
            *slot = Some((start, self.rows.len() - start));
        }
    }
}

/// Greedy word wrap measured in terminal columns; words wider than `width` are split.
#[must_use]
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    let options = Options::new(width.max(1)).wrap_algorithm(WrapAlgorithm::FirstFit);
    let wrapped: Vec<String> = textwrap::wrap(line, options)
        .into_iter()
        .map(Cow::into_owned)
        .collect();
    if wrapped.is_empty() {
        vec![String::new()]
    } else {
        wrapped
    }
}

#[cfg(test)]
#[path = "tests/layout.rs"]
mod tests;
