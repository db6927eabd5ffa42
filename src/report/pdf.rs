//! PDF rendering of a [`ReportDocument`] with `printpdf`.
//!
//! Only the PDF built-in Helvetica faces are used, so no font files are
//! embedded. Text widths are estimated for alignment.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rect, Rgb,
};

use crate::error::{AuditError, AuditResult};

use super::layout::{
    Align, Cell, Element, FontStyle, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, ReportDocument, Tone,
};

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;
const CELL_INSET_MM: f32 = 1.0;
const BORDER_THICKNESS_PT: f32 = 0.5;

fn render_error(e: impl std::fmt::Display) -> AuditError {
    AuditError::ReportRender {
        message: e.to_string(),
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> AuditResult<Self> {
        Ok(Self {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(render_error)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(render_error)?,
            italic: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(render_error)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn color(tone: Tone) -> Color {
    let (r, g, b) = tone.rgb();
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Converts a top-origin rectangle to PDF's bottom-origin coordinates.
fn rect(x_mm: f32, y_mm: f32, width_mm: f32, height_mm: f32) -> Rect {
    Rect::new(
        Mm(x_mm),
        Mm(PAGE_HEIGHT_MM - y_mm - height_mm),
        Mm(x_mm + width_mm),
        Mm(PAGE_HEIGHT_MM - y_mm),
    )
}

fn estimate_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * PT_TO_MM * AVERAGE_GLYPH_WIDTH
}

fn draw_cell(layer: &PdfLayerReference, cell: &Cell, fonts: &Fonts) {
    let style = &cell.style;

    let mode = match (style.fill, style.border) {
        (Some(_), true) => Some(PaintMode::FillStroke),
        (Some(_), false) => Some(PaintMode::Fill),
        (None, true) => Some(PaintMode::Stroke),
        (None, false) => None,
    };
    if let Some(mode) = mode {
        if let Some(fill) = style.fill {
            layer.set_fill_color(color(fill));
        }
        layer.set_outline_color(color(Tone::Ink));
        layer.set_outline_thickness(BORDER_THICKNESS_PT);
        layer.add_rect(rect(cell.x_mm, cell.y_mm, cell.width_mm, cell.height_mm).with_mode(mode));
    }

    if cell.text.is_empty() {
        return;
    }

    let text_width = estimate_width_mm(&cell.text, style.size_pt);
    let x = match style.align {
        Align::Left => cell.x_mm + CELL_INSET_MM,
        Align::Center => cell.x_mm + (cell.width_mm - text_width).max(0.0) / 2.0,
        Align::Right => cell.x_mm + (cell.width_mm - text_width - CELL_INSET_MM).max(0.0),
    };
    // Baseline sits roughly a third of the cap height below the middle.
    let baseline = cell.y_mm + cell.height_mm / 2.0 + style.size_pt * PT_TO_MM * 0.35;

    layer.set_fill_color(color(style.text));
    layer.use_text(
        cell.text.as_str(),
        style.size_pt,
        Mm(x),
        Mm(PAGE_HEIGHT_MM - baseline),
        fonts.get(style.font),
    );
}

fn draw(layer: &PdfLayerReference, element: &Element, fonts: &Fonts) {
    match element {
        Element::Band {
            x_mm,
            y_mm,
            width_mm,
            height_mm,
            tone,
        } => {
            layer.set_fill_color(color(*tone));
            layer.add_rect(rect(*x_mm, *y_mm, *width_mm, *height_mm).with_mode(PaintMode::Fill));
        }
        Element::Cell(cell) => draw_cell(layer, cell, fonts),
    }
}

/// Renders a laid out document to PDF bytes.
///
/// # Errors
///
/// Returns [`AuditError::ReportRender`] if a font cannot be registered or
/// the document cannot be serialized.
pub fn render_pdf(document: &ReportDocument) -> AuditResult<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        document.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let fonts = Fonts::load(&doc)?;

    for (i, page) in document.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for element in &page.elements {
            draw(&layer, element, &fonts);
        }
    }

    doc.save_to_bytes().map_err(render_error)
}
