//! # tambola-pdf
//!
//! Turn a tambola (housie) ticket sheet and the organiser's chat message into
//! a printable two-page PDF.
//!
//! The sheet image holds three ticket sets stacked vertically. It is cut into
//! three equal horizontal bands; the top two are printed side by side on an A4
//! page, the bottom one goes on an A3 page next to the list of game
//! variations found in the message (lines like `1️⃣ Early Five /- 100`).
//!
//! ## Pipeline Overview
//!
//! ```text
//! image + text
//!  │
//!  ├─ 1. Input       both present? (MissingInput otherwise)
//!  ├─ 2. Slice       decode, cut into top / middle / bottom bands
//!  ├─ 3. Stage       bands → PNG in a per-request temp directory
//!  ├─ 4. Variations  keep marker-prefixed lines containing "/-"
//!  ├─ 5. Compose     fixed two-page layout, WinAnsi text, word wrap
//!  └─ 6. Render      lopdf → PDF bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tambola_pdf::{generate_to_file, GenerateConfig, TicketRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let image = std::fs::read("tickets.jpg")?;
//!     let text = std::fs::read_to_string("message.txt")?;
//!     let request = TicketRequest::new(Some(image), Some(text))?;
//!     let stats = generate_to_file(request, "Tambola_Tickets.pdf", &GenerateConfig::default()).await?;
//!     eprintln!("{} variations printed", stats.variation_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `tambola-pdf` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod layout;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerateConfig, GenerateConfigBuilder};
pub use error::TambolaError;
pub use generate::{generate, generate_sync, generate_to_file};
pub use output::{GeneratedDocument, GenerationStats};
pub use pipeline::input::TicketRequest;
pub use pipeline::variations::{extract as extract_variations, VariationLine};
