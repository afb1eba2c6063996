//! Output types returned by [`crate::generate`].

use crate::pipeline::variations::VariationLine;
use serde::Serialize;
use uuid::Uuid;

/// A finished ticket document.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Serialised PDF.
    pub bytes: Vec<u8>,
    /// Suggested file name for the requester, e.g. `Tambola_Tickets.pdf`.
    pub file_name: String,
    /// Variation lines printed on page 2, before encoding.
    pub variations: Vec<VariationLine>,
    pub stats: GenerationStats,
}

/// Numbers describing one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    pub request_id: Uuid,
    /// Source sheet width in pixels.
    pub source_width: u32,
    /// Source sheet height in pixels.
    pub source_height: u32,
    /// Pixel heights of slices A, B and C.
    pub slice_heights: [u32; 3],
    pub variation_count: usize,
    /// Characters the PDF font could not encode.
    pub dropped_chars: usize,
    /// Always 2.
    pub page_count: usize,
    pub pdf_bytes: usize,
    pub slice_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}
