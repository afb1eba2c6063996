//! Error types for the tambola-pdf library.
//!
//! Every failure is fatal for the request that hit it: there are no retries
//! and no partial documents. A single [`TambolaError`] enum covers the whole
//! pipeline so the CLI (or any other shell) can print one human-readable
//! message and stop.
//!
//! Dropping characters that the PDF font cannot encode is *not* an error.
//! That step is reported through
//! [`crate::output::GenerationStats::dropped_chars`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the tambola-pdf library.
#[derive(Debug, Error)]
pub enum TambolaError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The requester did not supply one of the two required inputs.
    #[error("Missing input: {what}\nPlease provide a ticket image and paste the text message.")]
    MissingInput { what: &'static str },

    /// Ticket image was not found at the given path.
    #[error("Ticket image not found: '{path}'\nCheck the path exists and is readable.")]
    ImageNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The image could not be decoded or has no extent to slice.
    #[error("Invalid ticket image: {reason}")]
    InvalidImage { reason: String },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// The per-request staging directory could not be created or written.
    #[error("Failed to stage slice images: {detail}")]
    Staging { detail: String },

    /// A staged slice was missing or unreadable when the PDF was rendered.
    #[error("Failed to render PDF: slice image '{path}' could not be opened: {detail}")]
    Render { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TambolaError {
    pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for TambolaError {
    fn from(err: image::ImageError) -> Self {
        Self::invalid_image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_display() {
        let e = TambolaError::MissingInput {
            what: "ticket image",
        };
        let msg = e.to_string();
        assert!(msg.contains("ticket image"), "got: {msg}");
    }

    #[test]
    fn render_display_names_the_path() {
        let e = TambolaError::Render {
            path: PathBuf::from("/tmp/req/set_2.png"),
            detail: "No such file or directory".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("set_2.png"), "got: {msg}");
        assert!(msg.contains("No such file"), "got: {msg}");
    }

    #[test]
    fn image_error_maps_to_invalid_image() {
        let decode = image::load_from_memory(b"definitely not an image");
        let err: TambolaError = decode.unwrap_err().into();
        assert!(matches!(err, TambolaError::InvalidImage { .. }));
    }
}
