//! Text encoding policy for the PDF's single-byte font.
//!
//! The variation list is drawn with the standard Helvetica font using
//! `/WinAnsiEncoding` (Windows-1252). Pasted chat text is full of characters
//! that encoding cannot express, most notably the emoji bullets that made a
//! line a variation in the first place. Those characters are dropped one at a
//! time; the rest of the line survives. Dropping is not an error, but the
//! count is reported so callers can surface it.

/// Result of transcoding one string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcoded {
    /// Encoded bytes, one per kept character.
    pub bytes: Vec<u8>,
    /// Number of characters that had no byte in the target encoding.
    pub dropped: usize,
}

/// Maps characters onto a single-byte encoding, dropping the rest.
pub trait EncodingPolicy: Send + Sync {
    /// Byte for `c`, or `None` if the encoding cannot represent it.
    fn encode_char(&self, c: char) -> Option<u8>;

    /// Encode `text` character by character.
    fn transcode(&self, text: &str) -> Transcoded {
        let mut out = Transcoded {
            bytes: Vec::with_capacity(text.len()),
            dropped: 0,
        };
        for c in text.chars() {
            match self.encode_char(c) {
                Some(b) => out.bytes.push(b),
                None => out.dropped += 1,
            }
        }
        out
    }
}

/// Windows-1252, the `/WinAnsiEncoding` of the standard PDF fonts.
///
/// Control characters have no glyph and are dropped, except tab which is
/// drawn as a space.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinAnsi;

/// Code points of bytes 0x80..=0x9F; `None` marks the five unassigned slots.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None,             Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None,             Some('\u{017D}'), None,
    None,             Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None,             Some('\u{017E}'), Some('\u{0178}'),
];

impl EncodingPolicy for WinAnsi {
    fn encode_char(&self, c: char) -> Option<u8> {
        match c {
            '\t' => Some(b' '),
            ' '..='~' | '\u{A0}'..='\u{FF}' => Some(c as u8),
            _ => WIN_ANSI_HIGH
                .iter()
                .position(|&slot| slot == Some(c))
                .map(|i| 0x80 + i as u8),
        }
    }
}
