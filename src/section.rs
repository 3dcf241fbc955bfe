//! Content model for a reference document.
//!
//! A document is a title, an unnavigable introduction, and an ordered list of navigable
//! sections. Each section holds titled fragments (concept cards) whose bodies are prose and
//! code samples. Everything here is built once from the source file and never mutated.

#[derive(Clone, Debug, Default, PartialEq)]
/// Parsed reference document.
pub struct Document {
    /// Page title taken from the first level-1 heading.
    pub title: Option<String>,
    /// Content that precedes the first section.
    pub intro: Vec<Block>,
    /// Navigable sections in document order.
    pub sections: Vec<NavigableSection>,
    /// Every code sample in document order; blocks refer to these by index.
    pub samples: Vec<CodeSample>,
}

#[derive(Clone, Debug, PartialEq)]
/// Top-level labeled region that the section sidebar links to.
pub struct NavigableSection {
    /// Stable, unique anchor derived from the heading.
    pub id: String,
    /// Heading text, also used as the sidebar link label.
    pub title: String,
    /// Concept cards contained in the section.
    pub fragments: Vec<Fragment>,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Titled sub-unit of a section, the unit search results point at.
pub struct Fragment {
    /// Card heading; empty for body text that precedes the first card.
    pub title: String,
    /// Card body.
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq)]
/// One piece of rendered body content.
pub enum Block {
    /// A paragraph of running text.
    Prose(String),
    /// A heading nested deeper than a card title.
    Subheading(String),
    /// Reference into [`Document::samples`].
    Code(usize),
}

#[derive(Clone, Debug, PartialEq)]
/// Fenced code block that carries copy and collapse controls.
pub struct CodeSample {
    /// Info-string language tag, if any.
    pub language: Option<String>,
    /// Exact text placed on the clipboard.
    pub text: String,
}

impl CodeSample {
    #[must_use]
    /// Number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }
}

impl Document {
    #[must_use]
    /// Finds a section by its anchor.
    pub fn section(&self, id: &str) -> Option<&NavigableSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Plain text of a block, resolving code samples.
    #[must_use]
    pub fn block_text(&self, block: &Block) -> String {
        match block {
            Block::Prose(text) | Block::Subheading(text) => text.clone(),
            Block::Code(index) => self
                .samples
                .get(*index)
                .map(|sample| sample.text.clone())
                .unwrap_or_default(),
        }
    }

    /// Plain text of a fragment: its title followed by every block.
    #[must_use]
    pub fn fragment_text(&self, fragment: &Fragment) -> String {
        let mut parts = Vec::with_capacity(fragment.blocks.len() + 1);
        if !fragment.title.is_empty() {
            parts.push(fragment.title.clone());
        }
        parts.extend(fragment.blocks.iter().map(|b| self.block_text(b)));
        parts.join("\n")
    }
}

#[must_use]
/// Turns heading text into an anchor: lowercase alphanumerics joined by single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}
