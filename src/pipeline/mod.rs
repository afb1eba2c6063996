//! Pipeline stages for ticket-sheet-to-PDF generation.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ slice ──▶ stage ──────────────▶ compose ──▶ render
//!  │        (thirds)  (per-request TempDir)  (layout)    (lopdf)
//!  └──▶ variations ──▶ encoding ──▶ wrap ───┘
//! ```
//!
//! 1. [`input`]      — validate that an image and text were supplied
//! 2. [`slice`]      — decode the sheet and cut it into three bands
//! 3. [`stage`]      — write the bands as PNG into a private temp directory
//! 4. [`variations`] — keep the numbered pattern lines of the text
//! 5. [`encoding`]   — map text onto WinAnsi, dropping what cannot be drawn
//! 6. [`wrap`]       — break encoded text into rows that fit the column
//! 7. [`compose`]    — place images and text on the two fixed pages
//! 8. [`render`]     — serialise the pages to PDF bytes

pub mod compose;
pub mod encoding;
pub mod input;
pub mod render;
pub mod slice;
pub mod stage;
pub mod variations;
pub mod wrap;
