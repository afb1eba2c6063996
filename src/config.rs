//! Configuration for PDF generation.
//!
//! Page sizes and placement coordinates are fixed (see [`crate::layout`]) and
//! deliberately not configurable. [`GenerateConfig`] only covers the plumbing
//! around the pipeline: where intermediate slices are staged, what the output
//! is called and how it is written.

use crate::error::TambolaError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Suggested download name for the generated document.
pub const DEFAULT_FILE_NAME: &str = "Tambola_Tickets.pdf";

/// Default `/Title` written into the PDF info dictionary.
pub const DEFAULT_TITLE: &str = "Tambola Tickets";

/// Configuration for one ticket-sheet-to-PDF generation.
///
/// Built via [`GenerateConfig::builder()`] or using
/// [`GenerateConfig::default()`].
///
/// # Example
/// ```rust
/// use tambola_pdf::GenerateConfig;
///
/// let config = GenerateConfig::builder()
///     .file_name("sunday_game.pdf")
///     .title("Sunday Tambola")
///     .build()
///     .unwrap();
/// assert_eq!(config.file_name, "sunday_game.pdf");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Suggested output file name. Must end in `.pdf`. Default: `Tambola_Tickets.pdf`.
    pub file_name: String,

    /// Parent directory for per-request staging directories.
    ///
    /// `None` uses the system temp directory. Each request always gets its own
    /// uniquely named subdirectory, removed when the request finishes.
    pub staging_root: Option<PathBuf>,

    /// Document title stored in the PDF `/Info` dictionary.
    pub title: String,

    /// Flate-compress content and image streams. Default: true.
    ///
    /// Uncompressed output is handy when inspecting the PDF by hand.
    pub compress: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            staging_root: None,
            title: DEFAULT_TITLE.to_string(),
            compress: true,
        }
    }
}

impl GenerateConfig {
    /// Create a new builder for `GenerateConfig`.
    pub fn builder() -> GenerateConfigBuilder {
        GenerateConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerateConfig`].
#[derive(Debug)]
pub struct GenerateConfigBuilder {
    config: GenerateConfig,
}

impl GenerateConfigBuilder {
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    pub fn staging_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.staging_root = Some(dir.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn compress(mut self, v: bool) -> Self {
        self.config.compress = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerateConfig, TambolaError> {
        let c = &self.config;
        let name = c.file_name.trim();
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(TambolaError::InvalidConfig(format!(
                "file name must be a bare file name, got {:?}",
                c.file_name
            )));
        }
        if !name.to_ascii_lowercase().ends_with(".pdf") {
            return Err(TambolaError::InvalidConfig(format!(
                "file name must end in .pdf, got {:?}",
                c.file_name
            )));
        }
        if let Some(ref root) = c.staging_root {
            if root.as_os_str().is_empty() {
                return Err(TambolaError::InvalidConfig(
                    "staging root must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = GenerateConfig::default();
        assert_eq!(c.file_name, "Tambola_Tickets.pdf");
        assert_eq!(c.title, "Tambola Tickets");
        assert!(c.compress);
        assert!(c.staging_root.is_none());
    }

    #[test]
    fn builder_accepts_pdf_name_case_insensitively() {
        let c = GenerateConfig::builder().file_name("Game.PDF").build();
        assert!(c.is_ok());
    }

    #[test]
    fn builder_rejects_non_pdf_name() {
        let err = GenerateConfig::builder()
            .file_name("tickets.png")
            .build()
            .unwrap_err();
        assert!(matches!(err, TambolaError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_path_as_file_name() {
        let err = GenerateConfig::builder()
            .file_name("../escape.pdf")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("bare file name"));
    }

    #[test]
    fn builder_rejects_empty_staging_root() {
        let err = GenerateConfig::builder().staging_root("").build();
        assert!(err.is_err());
    }
}
