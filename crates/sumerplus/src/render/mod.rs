//! Paginated document content model shared by questionnaire reports and settlement statements.
//!
//! Renderers build a sequence of [`Block`]s and hand them to a [`LayoutCursor`], which decides
//! page breaks purely from block heights. The resulting [`Document`] can be inspected directly in
//! tests and is turned into PDF bytes by [`Document::to_pdf`].

mod format;
mod layout;
mod pdf;

pub use format::{format_money, format_quantity, format_rate, parse_display_number};
pub use layout::{LayoutCursor, PageGeometry};

use rust_decimal::Decimal;
use serde::Serialize;

/// Horizontal alignment of a table cell relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Header,
    Body,
    Total,
}

/// Column anchor in millimetres from the left margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Column {
    pub x: f32,
    pub align: Align,
}

impl Column {
    pub const fn left(x: f32) -> Self {
        Self {
            x,
            align: Align::Left,
        }
    }

    pub const fn right(x: f32) -> Self {
        Self {
            x,
            align: Align::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowCell {
    pub text: String,
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub kind: RowKind,
    pub cells: Vec<RowCell>,
    /// Amount this row contributes to the running page footer total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<Decimal>,
}

impl Row {
    pub fn new(kind: RowKind, columns: &[Column], texts: Vec<String>) -> Self {
        let cells = columns
            .iter()
            .copied()
            .zip(texts)
            .map(|(column, text)| RowCell { text, column })
            .collect();
        Self {
            kind,
            cells,
            tally: None,
        }
    }

    pub fn with_tally(mut self, amount: Decimal) -> Self {
        self.tally = Some(amount);
        self
    }

    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|cell| cell.text.as_str()).collect()
    }
}

/// Smallest unit of placement. A block is never split across pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Banner { text: String },
    Heading { text: String },
    Field { label: String, value: String },
    Paragraph { lines: Vec<String> },
    Row(Row),
    Spacer { height: f32 },
}

const PARAGRAPH_WRAP: usize = 95;

impl Block {
    pub fn banner(text: impl Into<String>) -> Self {
        Self::Banner { text: text.into() }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::Heading { text: text.into() }
    }

    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self::Paragraph {
            lines: wrap_text(text, PARAGRAPH_WRAP),
        }
    }

    pub fn spacer(height: f32) -> Self {
        Self::Spacer { height }
    }

    /// Vertical space the block consumes, in millimetres.
    pub fn height(&self) -> f32 {
        match self {
            Block::Banner { .. } => 12.0,
            Block::Heading { .. } => 8.0,
            Block::Field { label, value } => {
                let lines = wrap_text(value, field_wrap(label)).len().max(1);
                5.0 * lines as f32
            }
            Block::Paragraph { lines } => 4.5 * lines.len().max(1) as f32,
            Block::Row(_) => 5.0,
            Block::Spacer { height } => *height,
        }
    }
}

fn field_wrap(label: &str) -> usize {
    PARAGRAPH_WRAP.saturating_sub(label.len()).max(30)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    /// Offset of the block's top edge below the page's top margin, in millimetres.
    pub top: f32,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub number: usize,
    pub items: Vec<PlacedBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Page {
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.items.iter().map(|item| &item.block)
    }

    pub fn used_height(&self) -> f32 {
        self.items
            .last()
            .map(|item| item.top + item.block.height())
            .unwrap_or(0.0)
    }

    /// Sum of row tallies placed on this page.
    pub fn tally(&self) -> Decimal {
        self.blocks()
            .filter_map(|block| match block {
                Block::Row(row) => row.tally,
                _ => None,
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(Page::blocks)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.blocks().filter_map(|block| match block {
            Block::Row(row) => Some(row),
            _ => None,
        })
    }

    /// Value of the first field with the given label.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.blocks().find_map(|block| match block {
            Block::Field { label: l, value } if l == label => Some(value.as_str()),
            _ => None,
        })
    }

    /// Writes `"Page n of m"` footers, letting the caller append detail for each page.
    pub fn number_pages<F>(&mut self, mut detail: F)
    where
        F: FnMut(&Page) -> Option<String>,
    {
        let total = self.pages.len();
        for page in &mut self.pages {
            let numbering = format!("Page {} of {}", page.number, total);
            page.footer = Some(match detail(page) {
                Some(extra) => format!("{numbering}  |  {extra}"),
                None => numbering,
            });
        }
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>, RenderError> {
        pdf::write_pdf(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
}

pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
