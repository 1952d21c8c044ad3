//! PDF layout engine.
//!
//! Two passes:
//! 1. [`layout_flow`] places a [`Flow`] on pages: greedy line breaking with the
//!    static font metrics, justification, borders and rules, and a page break
//!    whenever the next line does not fit above the bottom margin.
//! 2. [`write_pdf`] serializes the placed pages with `pdf-writer`, using the
//!    base-14 fonts (no embedding) and FlateDecode content streams.
//!
//! Text is encoded as WinAnsi; characters outside it are written as `?`.

use chrono::{Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::layout::wrap::{break_lines, split_words, Line};
use crate::render::blocks::{Flow, Paragraph};
use crate::render::template::{Align, Rgb, TemplateStyle};

/// Distance from the baseline to the bottom of the line box, in em.
const DESCENT_EM: f32 = 0.2;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl PageSetup {
    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }

    fn top(&self) -> f32 {
        self.height - self.margin_y
    }

    fn bottom(&self) -> f32 {
        self.margin_y
    }
}

impl From<&TemplateStyle> for PageSetup {
    fn from(style: &TemplateStyle) -> Self {
        let (width, height) = style.page_size();
        Self {
            width,
            height,
            margin_x: style.margin_x,
            margin_y: style.margin_y,
        }
    }
}

/// A positioned drawing operation. Coordinates are PDF user space (origin at
/// the bottom-left corner).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        /// Baseline.
        y: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        text: String,
    },
    Line {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

/// A finished PDF buffer.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout pass
// ────────────────────────────────────────────────────────────────────────────

struct Cursor {
    setup: PageSetup,
    pages: Vec<PageLayout>,
    current: PageLayout,
    y: f32,
}

impl Cursor {
    fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            pages: Vec::new(),
            current: PageLayout::default(),
            y: setup.top(),
        }
    }

    fn at_page_top(&self) -> bool {
        self.y >= self.setup.top()
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = self.setup.top();
    }

    /// Breaks the page if `height` does not fit. A fresh page always accepts
    /// the content, even when it overflows.
    fn ensure(&mut self, height: f32) {
        if self.y - height < self.setup.bottom() && !self.at_page_top() {
            self.new_page();
        }
    }

    /// Vertical gap; dropped at a page top and when it would cross the bottom.
    fn skip(&mut self, gap: f32) {
        if self.at_page_top() {
            return;
        }
        if self.y - gap < self.setup.bottom() {
            self.new_page();
        } else {
            self.y -= gap;
        }
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Places `flow` on pages. Always returns at least one (possibly empty) page.
pub fn layout_flow(flow: &[Flow], setup: PageSetup) -> Vec<PageLayout> {
    let mut cursor = Cursor::new(setup);

    for item in flow {
        match item {
            Flow::Spacer(gap) => cursor.skip(*gap),
            Flow::Rule {
                thickness,
                color,
                space_before,
                space_after,
            } => {
                cursor.skip(*space_before);
                cursor.ensure(*thickness);
                let y = cursor.y - thickness / 2.0;
                cursor.current.ops.push(DrawOp::Line {
                    x1: setup.margin_x,
                    x2: setup.margin_x + setup.frame_width(),
                    y,
                    thickness: *thickness,
                    color: *color,
                });
                cursor.y -= thickness;
                cursor.skip(*space_after);
            }
            Flow::Paragraph(paragraph) => place_paragraph(&mut cursor, paragraph),
        }
    }

    cursor.finish()
}

fn place_paragraph(cursor: &mut Cursor, paragraph: &Paragraph) {
    let style = &paragraph.style;
    let size = style.font_size;
    let padding = paragraph.border.map(|b| b.padding).unwrap_or(0.0);
    let text_width = cursor.setup.frame_width() - 2.0 * padding;

    let marker_glyph = paragraph.marker.map(|m| m.glyph().to_string());
    let mut runs: Vec<(&str, FontFace)> = Vec::new();
    if let (Some(marker), Some(glyph)) = (paragraph.marker, marker_glyph.as_deref()) {
        runs.push((glyph, marker.face()));
        runs.push((" ", FontFace::Helvetica));
    }
    for span in &paragraph.spans {
        runs.push((span.text.as_str(), FontFace::bold(style.bold || span.bold)));
    }

    let words = split_words(runs);
    if words.is_empty() {
        return;
    }
    let space_em = get_metrics(style.face()).space_width;
    let lines = break_lines(words, text_width / size, space_em);

    cursor.skip(style.space_before);

    let left = cursor.setup.margin_x + padding;
    if let Some(border) = paragraph.border {
        // Bordered paragraphs are kept on one page.
        let height = lines.len() as f32 * style.leading + 2.0 * padding;
        cursor.ensure(height);
        cursor.current.ops.push(DrawOp::Rect {
            x: cursor.setup.margin_x,
            y: cursor.y - height,
            width: cursor.setup.frame_width(),
            height,
            thickness: border.thickness,
            color: border.color,
        });
        cursor.y -= padding;
        for (i, line) in lines.iter().enumerate() {
            let last = i + 1 == lines.len();
            place_line(cursor, paragraph, line, left, text_width, last);
        }
        cursor.y -= padding;
    } else {
        for (i, line) in lines.iter().enumerate() {
            cursor.ensure(style.leading);
            let last = i + 1 == lines.len();
            place_line(cursor, paragraph, line, left, text_width, last);
        }
    }

    cursor.y -= style.space_after;
}

fn place_line(
    cursor: &mut Cursor,
    paragraph: &Paragraph,
    line: &Line,
    left: f32,
    width: f32,
    last: bool,
) {
    let style = &paragraph.style;
    let size = style.font_size;
    let natural = line.width_em * size;
    let gaps = line.words.len().saturating_sub(1);

    let (start, extra) = match style.align {
        Align::Center => (left + ((width - natural) / 2.0).max(0.0), 0.0),
        Align::Justify if !last && gaps > 0 => (left, ((width - natural) / gaps as f32).max(0.0)),
        Align::Left | Align::Justify => (left, 0.0),
    };

    let baseline = cursor.y - style.leading + DESCENT_EM * size;
    let space_w = get_metrics(style.face()).space_width * size;
    let mut x = start;

    for word in &line.words {
        for fragment in &word.fragments {
            cursor.current.ops.push(DrawOp::Text {
                x,
                y: baseline,
                face: fragment.face,
                size,
                color: style.color,
                text: fragment.text.clone(),
            });
            x += get_metrics(fragment.face).measure_str(&fragment.text) * size;
        }
        x += space_w + extra;
    }

    cursor.y -= style.leading;
}

// ────────────────────────────────────────────────────────────────────────────
// Encoding
// ────────────────────────────────────────────────────────────────────────────

/// Encodes text for a face: WinAnsi for Helvetica, the built-in symbol
/// encoding for ZapfDingbats.
pub fn encode_text(face: FontFace, text: &str) -> Vec<u8> {
    if face.is_symbolic() {
        return text.chars().map(dingbat_code).collect();
    }
    text.chars().map(winansi_byte).collect()
}

fn dingbat_code(c: char) -> u8 {
    match c {
        '◆' => b'u',
        '▪' | '■' => b'n',
        '●' => b'l',
        _ => b'u',
    }
}

fn winansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7e}' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Writer pass
// ────────────────────────────────────────────────────────────────────────────

/// Serializes laid-out pages into a PDF file.
pub fn write_pdf(pages: &[PageLayout], setup: PageSetup, title: Option<&str>) -> RenderedPdf {
    let mut pdf = Pdf::new();

    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let info_id = Ref::new(3);
    let font_ids: Vec<(FontFace, Ref)> = FontFace::ALL
        .iter()
        .enumerate()
        .map(|(i, face)| (*face, Ref::new(4 + i as i32)))
        .collect();
    let first_page = 4 + font_ids.len() as i32;
    let page_ids: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new(first_page + 2 * i as i32))
        .collect();
    let content_ids: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new(first_page + 2 * i as i32 + 1))
        .collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);

    for (face, id) in &font_ids {
        let mut font = pdf.type1_font(*id);
        font.base_font(Name(face.base_font().as_bytes()));
        if !face.is_symbolic() {
            font.encoding_predefined(Name(b"WinAnsiEncoding"));
        }
    }

    for (i, page_layout) in pages.iter().enumerate() {
        let raw = page_content(page_layout).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);

        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, setup.width, setup.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (face, id) in &font_ids {
            fonts.pair(Name(face.resource_name().as_bytes()), *id);
        }
    }

    let now = Utc::now();
    let created = Date::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8)
        .utc_offset_hour(0);
    {
        let mut info = pdf.document_info(info_id);
        info.producer(TextStr(env!("CARGO_PKG_NAME")));
        info.creation_date(created);
        if let Some(title) = title {
            info.title(TextStr(title));
        }
    }

    let bytes = pdf.finish();
    debug!(pages = pages.len(), bytes = bytes.len(), "Wrote PDF");

    RenderedPdf {
        bytes,
        page_count: pages.len(),
    }
}

fn page_content(page: &PageLayout) -> Content {
    let mut content = Content::new();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                let encoded = encode_text(*face, text);
                content.set_fill_rgb(color.0, color.1, color.2);
                content
                    .begin_text()
                    .set_font(Name(face.resource_name().as_bytes()), *size)
                    .set_text_matrix([1.0, 0.0, 0.0, 1.0, *x, *y])
                    .show(Str(&encoded))
                    .end_text();
            }
            DrawOp::Line {
                x1,
                x2,
                y,
                thickness,
                color,
            } => {
                content.set_stroke_rgb(color.0, color.1, color.2);
                content.set_line_width(*thickness);
                content.move_to(*x1, *y);
                content.line_to(*x2, *y);
                content.stroke();
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                thickness,
                color,
            } => {
                content.set_stroke_rgb(color.0, color.1, color.2);
                content.set_line_width(*thickness);
                content.rect(*x, *y, *width, *height);
                content.stroke();
            }
        }
    }

    content
}

/// Lays out and writes `flow` in one step.
pub fn render_flow(flow: &[Flow], setup: PageSetup, title: Option<&str>) -> RenderedPdf {
    let pages = layout_flow(flow, setup);
    write_pdf(&pages, setup, title)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
