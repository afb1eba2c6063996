//! Input acquisition: turn what the requester supplied into a [`TicketRequest`].
//!
//! The requester must provide both a ticket image and a non-empty text
//! message. Anything missing is rejected here with
//! [`TambolaError::MissingInput`] before any pipeline stage runs. The image is
//! kept as raw bytes; decoding belongs to the slicer so that an undecodable
//! file is reported as [`TambolaError::InvalidImage`].

use crate::error::TambolaError;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// One generation request: the ticket image and the pasted text message.
///
/// Every request carries a fresh id. It names the request's staging
/// directory and tags its log lines, so two requests running at the same
/// time never share intermediate files.
#[derive(Debug, Clone)]
pub struct TicketRequest {
    id: Uuid,
    image: Vec<u8>,
    text: String,
}

impl TicketRequest {
    /// Validate that both inputs are present.
    ///
    /// # Errors
    /// [`TambolaError::MissingInput`] if the image is absent or empty, or the
    /// text is absent or whitespace only.
    pub fn new(image: Option<Vec<u8>>, text: Option<String>) -> Result<Self, TambolaError> {
        let image = image
            .filter(|bytes| !bytes.is_empty())
            .ok_or(TambolaError::MissingInput {
                what: "ticket image",
            })?;
        let text = text
            .filter(|t| !t.is_empty())
            .ok_or(TambolaError::MissingInput {
                what: "text message",
            })?;

        let request = Self {
            id: Uuid::new_v4(),
            image,
            text,
        };
        debug!(
            "Accepted request {}: {} image bytes, {} text bytes",
            request.id,
            request.image.len(),
            request.text.len()
        );
        Ok(request)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Encoded image bytes (PNG or JPEG) as supplied.
    pub fn image_bytes(&self) -> &[u8] {
        &self.image
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Read a ticket image from disk.
///
/// Distinguishes a missing file from a permission problem so the CLI can
/// tell the user which one to fix.
pub fn read_image_file(path: &Path) -> Result<Vec<u8>, TambolaError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(TambolaError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(TambolaError::ImageNotFound {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_is_rejected() {
        let err = TicketRequest::new(None, Some("1 Early Five /- 100".into())).unwrap_err();
        assert!(matches!(
            err,
            TambolaError::MissingInput {
                what: "ticket image"
            }
        ));
    }

    #[test]
    fn empty_image_is_rejected() {
        let err = TicketRequest::new(Some(Vec::new()), Some("text".into())).unwrap_err();
        assert!(matches!(err, TambolaError::MissingInput { .. }));
    }

    #[test]
    fn empty_or_absent_text_is_rejected() {
        let err = TicketRequest::new(Some(vec![1, 2, 3]), Some(String::new())).unwrap_err();
        assert!(matches!(
            err,
            TambolaError::MissingInput {
                what: "text message"
            }
        ));
        let err = TicketRequest::new(Some(vec![1, 2, 3]), None).unwrap_err();
        assert!(matches!(err, TambolaError::MissingInput { .. }));
    }

    #[test]
    fn whitespace_text_is_accepted() {
        // yields a document with no variation lines
        let req = TicketRequest::new(Some(vec![1, 2, 3]), Some("  \n\t ".into())).unwrap();
        assert_eq!(req.text(), "  \n\t ");
    }

    #[test]
    fn requests_get_distinct_ids() {
        let a = TicketRequest::new(Some(vec![1]), Some("x".into())).unwrap();
        let b = TicketRequest::new(Some(vec![1]), Some("x".into())).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.image_bytes(), &[1]);
        assert_eq!(a.text(), "x");
    }

    #[test]
    fn read_missing_file() {
        let err = read_image_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, TambolaError::ImageNotFound { .. }));
    }

    #[test]
    fn read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        std::fs::write(&path, b"\x89PNG").unwrap();
        assert_eq!(read_image_file(&path).unwrap(), b"\x89PNG");
    }
}
