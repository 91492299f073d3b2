use super::{Block, Document, Page, PlacedBlock};
use serde::Serialize;

/// Physical page dimensions and printable area, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    /// Space reserved above the bottom margin for the page footer.
    pub footer_height: f32,
}

impl PageGeometry {
    /// US Letter with half-inch margins.
    pub const LETTER: Self = Self {
        width: 215.9,
        height: 279.4,
        margin_top: 12.7,
        margin_bottom: 12.7,
        margin_left: 12.7,
        footer_height: 8.0,
    };

    pub fn content_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom - self.footer_height
    }
}

/// Tracks the remaining vertical space on the current page and opens a new page when the next
/// block would overflow it.
#[derive(Debug)]
pub struct LayoutCursor {
    geometry: PageGeometry,
    pages: Vec<Page>,
    offset: f32,
}

impl LayoutCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page {
                number: 1,
                items: Vec::new(),
                footer: None,
            }],
            offset: 0.0,
        }
    }

    pub fn remaining(&self) -> f32 {
        (self.geometry.content_height() - self.offset).max(0.0)
    }

    pub fn fits(&self, height: f32) -> bool {
        height <= self.remaining()
    }

    fn current_is_empty(&self) -> bool {
        self.pages
            .last()
            .map(|page| page.items.is_empty())
            .unwrap_or(true)
    }

    pub fn break_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            items: Vec::new(),
            footer: None,
        });
        self.offset = 0.0;
    }

    /// Places a block, starting a new page first if it does not fit. A block taller than a whole
    /// page is placed at the top of a fresh page and allowed to run into the margin.
    pub fn place(&mut self, block: Block) {
        let height = block.height();
        if !self.fits(height) && !self.current_is_empty() {
            self.break_page();
        }
        // Spacers at the top of a page only push content down.
        if matches!(block, Block::Spacer { .. }) && self.current_is_empty() && self.pages.len() > 1
        {
            return;
        }
        let top = self.offset;
        if let Some(page) = self.pages.last_mut() {
            page.items.push(PlacedBlock { top, block });
        }
        self.offset += height;
    }

    /// Places blocks that must share a page. When the group is taller than a page it falls back to
    /// block-by-block placement.
    pub fn place_group(&mut self, blocks: Vec<Block>) {
        let height: f32 = blocks.iter().map(Block::height).sum();
        if !self.fits(height)
            && !self.current_is_empty()
            && height <= self.geometry.content_height()
        {
            self.break_page();
        }
        for block in blocks {
            self.place(block);
        }
    }

    pub fn finish(self, title: impl Into<String>) -> Document {
        Document {
            title: title.into(),
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}
