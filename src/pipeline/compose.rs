//! Document composition: place the slices and variation text on two pages.
//!
//! Composition is pure layout. It decides *where* everything goes using the
//! fixed geometry in [`crate::layout`] and produces a [`Document`] of draw
//! commands; [`crate::pipeline::render`] turns that into PDF bytes. Image
//! heights are not known until the staged files are opened, so image
//! commands only carry a width.

use crate::layout::{
    ImageSlot, PageSize, TextColumn, PT_PER_MM, PAGE_ONE, PAGE_TWO, SLOT_A, SLOT_B, SLOT_C,
    VARIATION_COLUMN,
};
use crate::pipeline::encoding::{EncodingPolicy, WinAnsi};
use crate::pipeline::variations::VariationLine;
use crate::pipeline::wrap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One absolutely positioned drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw the image at `path` with its top-left corner at (`x_mm`, `y_mm`),
    /// scaled uniformly to `width_mm`.
    Image {
        path: PathBuf,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
    },
    /// A wrapped paragraph of WinAnsi-encoded rows.
    Text(TextBlock),
}

/// One variation line after encoding and wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Left edge of the glyphs (column edge plus padding).
    pub x_mm: f32,
    /// Top of the first row.
    pub y_mm: f32,
    pub line_height_mm: f32,
    pub font_size_pt: f32,
    /// Encoded rows, top to bottom. May contain an empty row.
    pub rows: Vec<Vec<u8>>,
}

impl TextBlock {
    /// Vertical space the block occupies.
    pub fn height_mm(&self) -> f32 {
        self.rows.len() as f32 * self.line_height_mm
    }

    /// Offset from the top of a row to the text baseline.
    ///
    /// Centres the font's body in the row.
    pub fn baseline_offset_mm(&self) -> f32 {
        0.5 * self.line_height_mm + 0.3 * (self.font_size_pt / PT_PER_MM)
    }
}

/// A page of the output document.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub size: PageSize,
    pub commands: Vec<DrawCommand>,
}

impl Page {
    pub fn images(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
    }

    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(block) => Some(block),
            DrawCommand::Image { .. } => None,
        })
    }
}

/// The two-page ticket document, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pages: [Page; 2],
    dropped_chars: usize,
}

impl Document {
    pub fn pages(&self) -> &[Page; 2] {
        &self.pages
    }

    /// Characters removed from the variation text because the font
    /// encoding cannot draw them.
    pub fn dropped_chars(&self) -> usize {
        self.dropped_chars
    }
}

/// Lay out the ticket document with the default WinAnsi text policy.
pub fn compose(
    slice_a: &Path,
    slice_b: &Path,
    slice_c: &Path,
    lines: &[VariationLine],
) -> Document {
    compose_with_policy(slice_a, slice_b, slice_c, lines, &WinAnsi)
}

/// Lay out the ticket document, encoding text with `policy`.
///
/// Page 1 holds slices A and B side by side. Page 2 holds slice C in the
/// left column and one wrapped block per variation line in the right
/// column, stacked downward from a fixed start with no page break.
pub fn compose_with_policy(
    slice_a: &Path,
    slice_b: &Path,
    slice_c: &Path,
    lines: &[VariationLine],
    policy: &dyn EncodingPolicy,
) -> Document {
    let page_one = Page {
        size: PAGE_ONE,
        commands: vec![place_image(slice_a, SLOT_A), place_image(slice_b, SLOT_B)],
    };

    let mut commands = vec![place_image(slice_c, SLOT_C)];
    let (blocks, dropped_chars) = layout_text(lines, &VARIATION_COLUMN, policy);
    commands.extend(blocks.into_iter().map(DrawCommand::Text));
    let page_two = Page {
        size: PAGE_TWO,
        commands,
    };

    debug!(
        "Composed document: {} variation lines, {} characters dropped",
        lines.len(),
        dropped_chars
    );

    Document {
        pages: [page_one, page_two],
        dropped_chars,
    }
}

fn place_image(path: &Path, slot: ImageSlot) -> DrawCommand {
    DrawCommand::Image {
        path: path.to_path_buf(),
        x_mm: slot.x_mm,
        y_mm: slot.y_mm,
        width_mm: slot.width_mm,
    }
}

/// Encode, wrap and stack the lines inside `column`.
///
/// Returns the blocks and the total number of dropped characters.
fn layout_text(
    lines: &[VariationLine],
    column: &TextColumn,
    policy: &dyn EncodingPolicy,
) -> (Vec<TextBlock>, usize) {
    let max_width = column.usable_width_pt();
    let mut cursor_y = column.y_mm;
    let mut dropped = 0;
    let mut blocks = Vec::with_capacity(lines.len());

    for line in lines {
        let encoded = policy.transcode(line.as_str());
        dropped += encoded.dropped;

        let block = TextBlock {
            x_mm: column.x_mm + column.padding_mm,
            y_mm: cursor_y,
            line_height_mm: column.line_height_mm,
            font_size_pt: column.font_size_pt,
            rows: wrap::wrap(&encoded.bytes, max_width, column.font_size_pt),
        };
        cursor_y += block.height_mm();
        blocks.push(block);
    }

    (blocks, dropped)
}
