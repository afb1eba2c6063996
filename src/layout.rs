//! Fixed page geometry for the two-page ticket document.
//!
//! All coordinates are millimetres measured from the top-left corner of the
//! page, the way a print layout is usually described. [`crate::pipeline::render`]
//! converts them to PDF points with a bottom-left origin.
//!
//! ```text
//!  Page 1 (A4)                    Page 2 (A3)
//! ┌──────────────────────┐       ┌────────────────────────────┐
//! │ ┌────────┐┌────────┐ │       │ ┌────────────┐  1 ... /-   │
//! │ │ set A  ││ set B  │ │       │ │   set C    │  2 ... /-   │
//! │ │        ││        │ │       │ │            │  ...        │
//! │ └────────┘└────────┘ │       │ └────────────┘             │
//! └──────────────────────┘       └────────────────────────────┘
//! ```
//!
//! Image heights follow each slice's aspect ratio and are never clamped, so a
//! very tall slice runs off the bottom of the page. Variation text likewise
//! keeps stacking downward with no page break.

/// PDF points per millimetre (72 pt per inch, 25.4 mm per inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Physical canvas size of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    pub const A4: Self = Self {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub const A3: Self = Self {
        width_mm: 297.0,
        height_mm: 420.0,
    };

    pub fn width_pt(&self) -> f32 {
        self.width_mm * PT_PER_MM
    }

    pub fn height_pt(&self) -> f32 {
        self.height_mm * PT_PER_MM
    }
}

/// Where an image goes: its top-left corner and its placed width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSlot {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
}

/// The column that holds the wrapped variation lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColumn {
    /// Left edge of the column.
    pub x_mm: f32,
    /// Top of the first row.
    pub y_mm: f32,
    /// Column width, padding included.
    pub width_mm: f32,
    /// Vertical advance per wrapped row.
    pub line_height_mm: f32,
    /// Helvetica size.
    pub font_size_pt: f32,
    /// Inner left/right padding of each row.
    pub padding_mm: f32,
}

impl TextColumn {
    /// Width available to glyphs once padding is removed, in points.
    pub fn usable_width_pt(&self) -> f32 {
        (self.width_mm - 2.0 * self.padding_mm) * PT_PER_MM
    }
}

/// Canvas of the first page.
pub const PAGE_ONE: PageSize = PageSize::A4;

/// Top band of the sheet, left on page 1.
pub const SLOT_A: ImageSlot = ImageSlot {
    x_mm: 5.0,
    y_mm: 10.0,
    width_mm: 100.0,
};

/// Middle band of the sheet, right on page 1.
pub const SLOT_B: ImageSlot = ImageSlot {
    x_mm: 110.0,
    y_mm: 10.0,
    width_mm: 100.0,
};

/// Canvas of the second page.
pub const PAGE_TWO: PageSize = PageSize::A3;

/// Bottom band of the sheet, left column of page 2.
pub const SLOT_C: ImageSlot = ImageSlot {
    x_mm: 10.0,
    y_mm: 10.0,
    width_mm: 130.0,
};

/// Right margin kept clear on page 2.
const PAGE_TWO_RIGHT_MARGIN_MM: f32 = 10.0;

/// Variation list, right column of page 2.
pub const VARIATION_COLUMN: TextColumn = TextColumn {
    x_mm: 150.0,
    y_mm: 20.0,
    width_mm: PageSize::A3.width_mm - PAGE_TWO_RIGHT_MARGIN_MM - 150.0,
    line_height_mm: 8.0,
    font_size_pt: 12.0,
    padding_mm: 1.0,
};
