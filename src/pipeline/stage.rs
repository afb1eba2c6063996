//! Request-scoped staging of slice images.
//!
//! The renderer embeds images from file paths, so the three slices are
//! written out as PNG between slicing and rendering. Each request gets its
//! own [`TempDir`] named after the request id; file names inside it can stay
//! fixed because no other request ever sees the directory. The directory and
//! its contents are removed when the [`StagingArea`] is dropped, even if the
//! request fails part way.

use crate::error::TambolaError;
use crate::pipeline::slice::SliceSet;
use image::DynamicImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use uuid::Uuid;

/// A private staging directory for one request.
#[derive(Debug)]
pub struct StagingArea {
    request_id: Uuid,
    dir: TempDir,
}

/// Paths of the three staged slices, top to bottom.
///
/// Valid only while the [`StagingArea`] that produced them is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedSlices {
    paths: [PathBuf; 3],
}

impl StagedSlices {
    pub fn a(&self) -> &Path {
        &self.paths[0]
    }

    pub fn b(&self) -> &Path {
        &self.paths[1]
    }

    pub fn c(&self) -> &Path {
        &self.paths[2]
    }

    pub fn paths(&self) -> &[PathBuf; 3] {
        &self.paths
    }
}

impl StagingArea {
    /// Create a fresh staging directory under `root`, or the system temp
    /// directory when `root` is `None`.
    pub fn new(root: Option<&Path>, request_id: Uuid) -> Result<Self, TambolaError> {
        let prefix = format!("tambola-{request_id}-");
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| TambolaError::Staging {
            detail: format!("cannot create staging directory: {e}"),
        })?;

        debug!("Staging request {} in {}", request_id, dir.path().display());
        Ok(Self { request_id, dir })
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the three slices as `set_0.png`, `set_1.png`, `set_2.png`.
    ///
    /// # Errors
    /// [`TambolaError::InvalidImage`] if a slice is empty (the sheet was too
    /// small to cut in three) or cannot be encoded;
    /// [`TambolaError::Staging`] if writing fails.
    pub fn stage(&self, slices: &SliceSet) -> Result<StagedSlices, TambolaError> {
        let mut paths: [PathBuf; 3] = Default::default();
        for (i, img) in slices.iter().enumerate() {
            let bytes = encode_png(img)?;
            let path = self.dir.path().join(format!("set_{i}.png"));
            std::fs::write(&path, &bytes).map_err(|e| TambolaError::Staging {
                detail: format!("cannot write {}: {e}", path.display()),
            })?;
            debug!(
                "Request {}: staged slice {} → {} ({} bytes)",
                self.request_id(),
                i,
                path.display(),
                bytes.len()
            );
            paths[i] = path;
        }
        Ok(StagedSlices { paths })
    }

    /// Remove the directory now, reporting any failure.
    ///
    /// Dropping the area also removes it, silently.
    pub fn close(self) -> Result<(), TambolaError> {
        self.dir.close().map_err(|e| TambolaError::Staging {
            detail: format!("cannot remove staging directory: {e}"),
        })
    }
}

/// Encode one slice as PNG.
///
/// PNG keeps ticket numbers crisp; the renderer decodes it again anyway.
fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, TambolaError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(TambolaError::invalid_image(format!(
            "sheet is too small to cut into three sets (slice is {}x{} px)",
            img.width(),
            img.height()
        )));
    }
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}
