//! Variation extraction: pick the game-variation lines out of pasted text.
//!
//! Organisers paste a chat message that mixes greetings, rules and timings
//! with the list of patterns being played, e.g.
//!
//! ```text
//! Good evening all! Tickets below.
//! 1️⃣ Early Five /- 100
//! 2️⃣ Top Line /- 150
//! 🪺 Full House /- 500
//! Game starts at 8 pm
//! ```
//!
//! Only the numbered pattern lines are wanted. A line qualifies when, after
//! trimming, it
//!
//! 1. starts with a marker character (an ASCII digit, a keycap emoji piece,
//!    or a nest bullet), and
//! 2. contains `/-` somewhere after that marker.
//!
//! The two checks are separate predicates so each can be tested alone.
//! Nothing else about the line is parsed.

use std::fmt;

/// Non-digit characters accepted as a leading bullet.
///
/// U+FE0F and U+20E3 are the selector and enclosing keycap that make up
/// emoji such as `1️⃣`; U+1FABA and U+1FAB9 are the nest bullets.
pub const BULLET_MARKERS: [char; 4] = ['\u{FE0F}', '\u{20E3}', '\u{1FABA}', '\u{1FAB9}'];

/// Literal that must follow the marker somewhere on the line.
pub const PRIZE_SEPARATOR: &str = "/-";

/// A pasted-text line naming one game pattern.
///
/// Only [`extract`] builds these, so every value satisfies
/// [`is_variation`]. The line is stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariationLine(String);

impl VariationLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for VariationLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariationLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for VariationLine {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Whether `c` may open a variation line.
pub fn is_marker(c: char) -> bool {
    c.is_ascii_digit() || BULLET_MARKERS.contains(&c)
}

/// First check: the line opens with a marker character.
pub fn has_marker_prefix(line: &str) -> bool {
    line.chars().next().is_some_and(is_marker)
}

/// Second check: `/-` appears after the first character.
///
/// Only presence matters; several separators still count as one match.
pub fn has_separator_after_marker(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next().is_some() && chars.as_str().contains(PRIZE_SEPARATOR)
}

/// Whether a (trimmed) line is a variation line.
pub fn is_variation(line: &str) -> bool {
    has_marker_prefix(line) && has_separator_after_marker(line)
}

/// Keep the variation lines of `text`, trimmed, in their original order.
///
/// Duplicates are kept. Blank and non-matching lines are dropped without
/// complaint, so empty input simply yields an empty list.
pub fn extract(text: &str) -> Vec<VariationLine> {
    text.lines()
        .map(str::trim)
        .filter(|line| is_variation(line))
        .map(|line| VariationLine(line.to_string()))
        .collect()
}
