//! End-to-end generation entry points.
//!
//! [`generate`] runs the whole pipeline for one [`TicketRequest`]:
//!
//! ```text
//! image bytes ─▶ decode ─▶ slice ─▶ stage (per-request TempDir) ─┐
//! text ───────▶ extract variations ──────────────────────────────┼─▶ compose ─▶ render ─▶ bytes
//! ```
//!
//! The work is CPU-bound and synchronous, so it runs inside
//! `spawn_blocking` and never stalls the async runtime. Requests running at
//! the same time are independent: each one stages its slices in its own
//! directory, removed when the request finishes.

use crate::config::GenerateConfig;
use crate::error::TambolaError;
use crate::output::{GeneratedDocument, GenerationStats};
use crate::pipeline::input::TicketRequest;
use crate::pipeline::stage::StagingArea;
use crate::pipeline::{compose, render, slice, variations};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{info, info_span, warn};

/// Generate the two-page ticket PDF for `request`.
///
/// # Errors
/// * [`TambolaError::InvalidImage`] — the image is undecodable or too small
/// * [`TambolaError::Staging`] — slices could not be written
/// * [`TambolaError::Render`] — a staged slice vanished before rendering
pub async fn generate(
    request: TicketRequest,
    config: &GenerateConfig,
) -> Result<GeneratedDocument, TambolaError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || generate_blocking(&request, &config))
        .await
        .map_err(|e| TambolaError::Internal(format!("Generation task panicked: {e}")))?
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally; do not call from inside
/// an async context.
pub fn generate_sync(
    request: TicketRequest,
    config: &GenerateConfig,
) -> Result<GeneratedDocument, TambolaError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TambolaError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(request, config))
}

/// Generate the PDF and write it to `output_path`.
///
/// The bytes go to a uniquely named temp file next to the target, which is
/// then renamed over it. A failed run never leaves a half-written PDF or a
/// stray temp file behind, and runs sharing an output path never write into
/// each other's temp file.
pub async fn generate_to_file(
    request: TicketRequest,
    output_path: impl AsRef<Path>,
    config: &GenerateConfig,
) -> Result<GenerationStats, TambolaError> {
    let output = generate(request, config).await?;
    let path = output_path.as_ref().to_path_buf();

    let GeneratedDocument { bytes, stats, .. } = output;
    let target = path.clone();
    let written = bytes.len();
    tokio::task::spawn_blocking(move || write_atomically(&target, &bytes))
        .await
        .map_err(|e| TambolaError::Internal(format!("Write task panicked: {e}")))??;

    info!("Wrote {} ({} bytes)", path.display(), written);
    Ok(stats)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), TambolaError> {
    let write_failed = |source: std::io::Error| TambolaError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".tambola-")
        .suffix(".pdf.tmp")
        .tempfile_in(parent)
        .map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

/// The pipeline itself, run on a blocking thread.
fn generate_blocking(
    request: &TicketRequest,
    config: &GenerateConfig,
) -> Result<GeneratedDocument, TambolaError> {
    let span = info_span!("generate", request_id = %request.id());
    let _guard = span.enter();
    let total_start = Instant::now();
    info!("Starting generation");

    // ── Step 1: Decode and slice ─────────────────────────────────────────
    let slice_start = Instant::now();
    let sheet = slice::decode(request.image_bytes())?;
    let slices = slice::slice(&sheet)?;
    let slice_duration_ms = slice_start.elapsed().as_millis() as u64;

    // ── Step 2: Stage slices in a request-scoped directory ───────────────
    let staging = StagingArea::new(config.staging_root.as_deref(), request.id())?;
    let staged = staging.stage(&slices)?;

    // ── Step 3: Extract variation lines ──────────────────────────────────
    let lines = variations::extract(request.text());
    if lines.is_empty() {
        warn!("No variation lines found in the text message");
    }
    info!("Extracted {} variation lines", lines.len());

    // ── Step 4: Compose and render ───────────────────────────────────────
    let render_start = Instant::now();
    let document = compose::compose(staged.a(), staged.b(), staged.c(), &lines);
    if document.dropped_chars() > 0 {
        info!(
            "Dropped {} characters the PDF font cannot draw",
            document.dropped_chars()
        );
    }
    let bytes = render::render(&document, config)?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    // ── Step 5: Clean up staging ─────────────────────────────────────────
    if let Err(e) = staging.close() {
        warn!("{e}");
    }

    let stats = GenerationStats {
        request_id: request.id(),
        source_width: sheet.width(),
        source_height: sheet.height(),
        slice_heights: slices.heights(),
        variation_count: lines.len(),
        dropped_chars: document.dropped_chars(),
        page_count: document.pages().len(),
        pdf_bytes: bytes.len(),
        slice_duration_ms,
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Generation complete: {} variations, {} bytes, {}ms total",
        stats.variation_count, stats.pdf_bytes, stats.total_duration_ms
    );

    Ok(GeneratedDocument {
        bytes,
        file_name: config.file_name.clone(),
        variations: lines,
        stats,
    })
}
