//! The closed set of résumé templates and their typography.

use serde::{Deserialize, Serialize};

use crate::layout::FontFace;

/// Points per inch.
pub const INCH: f32 = 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Template identifiers and catalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Professional,
    Modern,
    Creative,
    Technical,
    Executive,
}

impl TemplateId {
    pub const ALL: [TemplateId; 5] = [
        TemplateId::Professional,
        TemplateId::Modern,
        TemplateId::Creative,
        TemplateId::Technical,
        TemplateId::Executive,
    ];

    /// Identifier used on the wire (`"professional"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Professional => "professional",
            TemplateId::Modern => "modern",
            TemplateId::Creative => "creative",
            TemplateId::Technical => "technical",
            TemplateId::Executive => "executive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TemplateId::Professional => "Professional Classic",
            TemplateId::Modern => "Modern Minimalist",
            TemplateId::Creative => "Creative Design",
            TemplateId::Technical => "Technical Focus",
            TemplateId::Executive => "Executive Premium",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateId::Professional => "Clean, traditional layout perfect for corporate roles",
            TemplateId::Modern => "Contemporary design with clean lines and modern typography",
            TemplateId::Creative => "Eye-catching layout for creative and design roles",
            TemplateId::Technical => "Optimized for technical roles with emphasis on skills",
            TemplateId::Executive => "Sophisticated design for senior-level positions",
        }
    }

    pub fn style(self) -> TemplateStyle {
        match self {
            TemplateId::Professional => professional(),
            TemplateId::Modern => modern(),
            TemplateId::Creative => creative(),
            TemplateId::Technical => technical(),
            TemplateId::Executive => executive(),
        }
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing entry for `GET /api/v1/templates`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn catalog() -> Vec<TemplateInfo> {
    TemplateId::ALL
        .into_iter()
        .map(|id| TemplateInfo {
            id,
            name: id.display_name(),
            description: id.description(),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Style primitives
// ────────────────────────────────────────────────────────────────────────────

/// RGB colour with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const DARK_BLUE: Rgb = Rgb(0.0, 0.0, 0.545);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Letter,
    A4,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.276, 841.89),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: f32,
    pub leading: f32,
    pub color: Rgb,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
    /// Base face; `**` spans and emphasised rows switch to bold.
    pub bold: bool,
}

impl ParagraphStyle {
    pub fn face(&self) -> FontFace {
        FontFace::bold(self.bold)
    }
}

/// Ornament drawn with a section heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadingDecoration {
    None,
    /// Full-width horizontal rule under the heading.
    Rule {
        thickness: f32,
        space_before: f32,
        space_after: f32,
    },
    /// Stroked box around the heading text.
    Box { thickness: f32, padding: f32 },
}

/// Leading marker glyph for body lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Bullet,
    Diamond,
    Square,
}

impl Marker {
    pub fn glyph(self) -> char {
        match self {
            Marker::Bullet => '•',
            Marker::Diamond => '◆',
            Marker::Square => '▪',
        }
    }

    pub fn face(self) -> FontFace {
        match self {
            Marker::Bullet => FontFace::Helvetica,
            Marker::Diamond | Marker::Square => FontFace::ZapfDingbats,
        }
    }
}

/// Complete geometry and typography of one template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateStyle {
    pub page: PageSize,
    /// Left and right margin, points.
    pub margin_x: f32,
    /// Top and bottom margin, points.
    pub margin_y: f32,
    pub title: ParagraphStyle,
    /// Vertical gap after the header block.
    pub title_gap: f32,
    pub heading: ParagraphStyle,
    pub heading_decoration: HeadingDecoration,
    pub body: ParagraphStyle,
    /// Vertical gap after each section.
    pub section_gap: f32,
    /// Vertical gap before each `Company | Role | Dates` row.
    pub role_row_gap: f32,
    pub marker: Option<Marker>,
    /// Render skills sections as one ` | `-joined line.
    pub join_skills: bool,
}

impl TemplateStyle {
    pub fn page_size(&self) -> (f32, f32) {
        self.page.dimensions()
    }

    pub fn frame_width(&self) -> f32 {
        self.page.dimensions().0 - 2.0 * self.margin_x
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template definitions
// ────────────────────────────────────────────────────────────────────────────

fn body(font_size: f32) -> ParagraphStyle {
    ParagraphStyle {
        font_size,
        leading: 11.0,
        color: Rgb::BLACK,
        align: Align::Justify,
        space_before: 0.0,
        space_after: 2.0,
        bold: false,
    }
}

fn title(font_size: f32, align: Align, color: Rgb, space_after: f32) -> ParagraphStyle {
    ParagraphStyle {
        font_size,
        leading: font_size * 1.2,
        color,
        align,
        space_before: 0.0,
        space_after,
        bold: true,
    }
}

fn heading(font_size: f32, color: Rgb, space_before: f32, space_after: f32) -> ParagraphStyle {
    ParagraphStyle {
        font_size,
        leading: font_size * 1.2,
        color,
        align: Align::Left,
        space_before,
        space_after,
        bold: true,
    }
}

fn professional() -> TemplateStyle {
    TemplateStyle {
        page: PageSize::Letter,
        margin_x: 0.4 * INCH,
        margin_y: 0.5 * INCH,
        title: title(16.0, Align::Center, Rgb::DARK_BLUE, 12.0),
        title_gap: 12.0,
        heading: heading(12.0, Rgb::DARK_BLUE, 12.0, 6.0),
        heading_decoration: HeadingDecoration::Rule {
            thickness: 1.5,
            space_before: 3.0,
            space_after: 6.0,
        },
        body: body(10.0),
        section_gap: 12.0,
        role_row_gap: 6.0,
        marker: None,
        join_skills: false,
    }
}

fn modern() -> TemplateStyle {
    TemplateStyle {
        page: PageSize::A4,
        margin_x: 0.8 * INCH,
        margin_y: 0.8 * INCH,
        title: title(18.0, Align::Left, Rgb::BLACK, 15.0),
        title_gap: 15.0,
        heading: heading(11.0, Rgb::BLACK, 15.0, 8.0),
        heading_decoration: HeadingDecoration::None,
        body: body(9.0),
        section_gap: 10.0,
        role_row_gap: 6.0,
        marker: Some(Marker::Bullet),
        join_skills: false,
    }
}

fn creative() -> TemplateStyle {
    TemplateStyle {
        page: PageSize::Letter,
        margin_x: 0.7 * INCH,
        margin_y: 0.9 * INCH,
        title: title(20.0, Align::Center, Rgb::DARK_BLUE, 20.0),
        title_gap: 20.0,
        heading: heading(13.0, Rgb::DARK_BLUE, 15.0, 10.0),
        heading_decoration: HeadingDecoration::Box {
            thickness: 1.0,
            padding: 8.0,
        },
        body: body(9.0),
        section_gap: 12.0,
        role_row_gap: 6.0,
        marker: Some(Marker::Diamond),
        join_skills: false,
    }
}

fn technical() -> TemplateStyle {
    TemplateStyle {
        page: PageSize::A4,
        margin_x: 0.75 * INCH,
        margin_y: 0.85 * INCH,
        title: title(16.0, Align::Left, Rgb::BLACK, 15.0),
        title_gap: 15.0,
        heading: heading(12.0, Rgb::BLACK, 12.0, 8.0),
        heading_decoration: HeadingDecoration::None,
        body: body(9.0),
        section_gap: 10.0,
        role_row_gap: 6.0,
        marker: Some(Marker::Square),
        join_skills: true,
    }
}

fn executive() -> TemplateStyle {
    TemplateStyle {
        page: PageSize::Letter,
        margin_x: 0.8 * INCH,
        margin_y: 1.0 * INCH,
        title: title(18.0, Align::Center, Rgb::DARK_BLUE, 18.0),
        title_gap: 18.0,
        heading: heading(13.0, Rgb::DARK_BLUE, 15.0, 10.0),
        heading_decoration: HeadingDecoration::Box {
            thickness: 2.0,
            padding: 6.0,
        },
        body: body(9.0),
        section_gap: 12.0,
        role_row_gap: 6.0,
        marker: Some(Marker::Bullet),
        join_skills: false,
    }
}
