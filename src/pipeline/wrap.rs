//! Word wrapping for WinAnsi-encoded Helvetica text.
//!
//! Widths come from the Adobe Helvetica AFM, indexed by WinAnsiEncoding
//! byte, in 1/1000 em. Wrapping is greedy: break at the last space that
//! fits, or mid-word when a single word is wider than the column.

/// Helvetica advance widths by WinAnsi byte, in 1/1000 em.
#[rustfmt::skip]
pub const HELVETICA_WIDTHS: [u16; 256] = [
    // 0-31: control characters
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 32-47: space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 48-63: 0-9 : ; < = > ?
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 64-79: @ A-O
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 80-95: P-Z [ \ ] ^ _
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 96-111: ` a-o
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 112-127: p-z { | } ~ DEL
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    // 128-159: Windows-1252 specials
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    // 160-255: Latin-1 supplement
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Advance width of one byte at `font_size` points, in points.
pub fn glyph_width(byte: u8, font_size: f32) -> f32 {
    f32::from(HELVETICA_WIDTHS[byte as usize]) * font_size / 1000.0
}

/// Width of a run of bytes at `font_size` points, in points.
pub fn text_width(bytes: &[u8], font_size: f32) -> f32 {
    bytes.iter().map(|&b| glyph_width(b, font_size)).sum()
}

/// Split `text` into rows no wider than `max_width` points.
///
/// The space a row breaks on is consumed. A glyph wider than the whole column
/// gets a row to itself. Empty input yields one empty row, so every
/// paragraph occupies at least one line.
pub fn wrap(text: &[u8], max_width: f32, font_size: f32) -> Vec<Vec<u8>> {
    let mut rows = Vec::new();
    let mut row_start = 0;
    let mut last_space: Option<usize> = None;
    let mut width = 0.0;
    let mut i = 0;

    while i < text.len() {
        let b = text[i];
        if b == b' ' {
            last_space = Some(i);
        }
        width += glyph_width(b, font_size);

        if width > max_width && i > row_start {
            let end = match last_space {
                // a space opening the row would leave it blank
                Some(space) if space > row_start => {
                    rows.push(text[row_start..space].to_vec());
                    space + 1
                }
                _ => {
                    rows.push(text[row_start..i].to_vec());
                    i
                }
            };
            row_start = end;
            i = end;
            last_space = None;
            width = 0.0;
            continue;
        }
        i += 1;
    }

    rows.push(text[row_start..].to_vec());
    rows
}
