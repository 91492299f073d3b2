use super::{Align, Block, Document, Page, PageGeometry, RenderError, Row, RowKind};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::io::BufWriter;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

// Helvetica averages roughly half an em per glyph; 1pt = 0.3528mm.
const GLYPH_WIDTH_PER_PT: f32 = 0.5 * 0.3528;

pub(super) fn write_pdf(document: &Document) -> Result<Vec<u8>, RenderError> {
    let geometry = document.geometry;
    let (doc, first_page, first_layer) = PdfDocument::new(
        &document.title,
        Mm(geometry.width),
        Mm(geometry.height),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Font(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Font(e.to_string()))?,
    };

    for (index, page) in document.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(
                Mm(geometry.width),
                Mm(geometry.height),
                format!("Page {}", page.number),
            );
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &geometry, &fonts);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| RenderError::Save(e.to_string()))
}

fn draw_page(layer: &PdfLayerReference, page: &Page, geometry: &PageGeometry, fonts: &Fonts) {
    let left = geometry.margin_left;
    let top = geometry.height - geometry.margin_top;

    for item in &page.items {
        // Baselines sit a little above the bottom of each block's slot.
        let baseline = top - item.top - item.block.height() + 1.5;
        match &item.block {
            Block::Banner { text } => {
                layer.use_text(text.as_str(), 18.0, Mm(left), Mm(baseline), &fonts.bold);
            }
            Block::Heading { text } => {
                layer.use_text(text.as_str(), 11.0, Mm(left), Mm(baseline), &fonts.bold);
            }
            Block::Field { label, value } => {
                let first = top - item.top - 3.8;
                layer.use_text(label.as_str(), 9.0, Mm(left), Mm(first), &fonts.bold);
                let value_x = left + 70.0;
                for (line_index, line) in super::wrap_text(value, super::field_wrap(label))
                    .iter()
                    .enumerate()
                {
                    let y = first - 5.0 * line_index as f32;
                    layer.use_text(line.as_str(), 9.0, Mm(value_x), Mm(y), &fonts.regular);
                }
            }
            Block::Paragraph { lines } => {
                let first = top - item.top - 3.5;
                for (line_index, line) in lines.iter().enumerate() {
                    let y = first - 4.5 * line_index as f32;
                    layer.use_text(line.as_str(), 8.5, Mm(left), Mm(y), &fonts.regular);
                }
            }
            Block::Row(row) => draw_row(layer, row, left, baseline, fonts),
            Block::Spacer { .. } => {}
        }
    }

    if let Some(footer) = &page.footer {
        let y = geometry.margin_bottom + 2.0;
        layer.use_text(footer.as_str(), 7.5, Mm(left), Mm(y), &fonts.regular);
    }
}

fn draw_row(layer: &PdfLayerReference, row: &Row, left: f32, baseline: f32, fonts: &Fonts) {
    let (size, font) = match row.kind {
        RowKind::Header | RowKind::Total => (8.0, &fonts.bold),
        RowKind::Body => (8.0, &fonts.regular),
    };
    for cell in &row.cells {
        let anchor = left + cell.column.x;
        let x = match cell.column.align {
            Align::Left => anchor,
            Align::Right => anchor - estimated_width(&cell.text, size),
        };
        layer.use_text(cell.text.as_str(), size, Mm(x), Mm(baseline), font);
    }
}

fn estimated_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH_PER_PT
}
