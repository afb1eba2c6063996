//! CLI binary for tambola-pdf.
//!
//! A thin shim over the library crate: it gathers the ticket image and the
//! text message, maps flags to `GenerateConfig`, and writes the PDF.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tambola_pdf::pipeline::input::read_image_file;
use tambola_pdf::{
    extract_variations, generate_to_file, GenerateConfig, GenerationStats, TicketRequest,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Sheet image plus the message saved to a file
  tambola-pdf --image tickets.jpg --text message.txt

  # Paste the message on stdin, choose the output path
  pbpaste | tambola-pdf -i tickets.png -o sunday.pdf

  # Only show which lines would be printed as variations
  tambola-pdf --text message.txt --list-variations

  # Machine-readable run summary
  tambola-pdf -i tickets.png -t message.txt --json

VARIATION LINES:
  A line of the message is printed on page 2 when it starts with a digit or
  an emoji bullet (1️⃣, 🪺, 🪹) and contains "/-" somewhere after it:

    1️⃣ Early Five /- 100      printed
    🪺 Full House /- 500      printed
    Game starts at 8 pm      skipped

  Emoji cannot be drawn with the PDF's built-in font and are left out of the
  printed text; the rest of the line is kept.

LAYOUT:
  Page 1 (A4)  top and middle thirds of the sheet, side by side
  Page 2 (A3)  bottom third on the left, variation list on the right
"#;

/// Slice a tambola ticket sheet and print it with the game variations.
#[derive(Parser, Debug)]
#[command(
    name = "tambola-pdf",
    version,
    about = "Turn a tambola ticket sheet and the game message into a printable PDF",
    long_about = "Cut a ticket-sheet image into three sets and lay them out on a two-page PDF \
together with the game variations found in the pasted text message.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Ticket sheet image (PNG or JPEG).
    #[arg(short, long, env = "TAMBOLA_IMAGE")]
    image: Option<PathBuf>,

    /// Text message file; `-` reads stdin. Defaults to stdin when piped.
    #[arg(short, long, env = "TAMBOLA_TEXT")]
    text: Option<PathBuf>,

    /// Write the PDF here instead of ./Tambola_Tickets.pdf.
    #[arg(short, long, env = "TAMBOLA_OUTPUT")]
    output: Option<PathBuf>,

    /// Title stored in the PDF metadata.
    #[arg(long, env = "TAMBOLA_TITLE", default_value = tambola_pdf::config::DEFAULT_TITLE)]
    title: String,

    /// Directory for per-run staging of slice images (default: system temp).
    #[arg(long, env = "TAMBOLA_STAGING_DIR")]
    staging_dir: Option<PathBuf>,

    /// Write uncompressed streams (easier to inspect by hand).
    #[arg(long, env = "TAMBOLA_NO_COMPRESS")]
    no_compress: bool,

    /// Print the extracted variation lines and exit without rendering.
    #[arg(long)]
    list_variations: bool,

    /// Print run statistics as JSON on stdout.
    #[arg(long, env = "TAMBOLA_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TAMBOLA_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TAMBOLA_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let text = read_text(cli.text.as_deref())?;

    // ── List-only mode ───────────────────────────────────────────────────
    if cli.list_variations {
        let lines = extract_variations(text.as_deref().unwrap_or_default());
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&lines).context("Failed to serialise variations")?
            );
        } else {
            for line in &lines {
                println!("{line}");
            }
            if !cli.quiet {
                eprintln!("{} variation lines", lines.len());
            }
        }
        return Ok(());
    }

    // ── Build request and config ─────────────────────────────────────────
    let image = match cli.image {
        Some(ref path) => Some(
            read_image_file(path).with_context(|| format!("Cannot read {}", path.display()))?,
        ),
        None => None,
    };
    let request = TicketRequest::new(image, text)?;
    let config = build_config(&cli)?;
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.file_name));

    // ── Run generation ───────────────────────────────────────────────────
    let stats = generate_to_file(request, &output_path, &config)
        .await
        .context("PDF generation failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        print_summary(&stats, &output_path);
    }

    Ok(())
}

/// Read the text message from a file, `-`, or piped stdin.
///
/// Returns `None` when nothing was supplied so the library can report the
/// missing input.
fn read_text(path: Option<&Path>) -> Result<Option<String>> {
    match path {
        Some(p) if p == Path::new("-") => read_stdin().map(Some),
        Some(p) => std::fs::read_to_string(p)
            .map(Some)
            .with_context(|| format!("Failed to read text message from {}", p.display())),
        None if !io::stdin().is_terminal() => read_stdin().map(Some),
        None => Ok(None),
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read text message from stdin")?;
    Ok(buf)
}

/// Map CLI args to `GenerateConfig`.
fn build_config(cli: &Cli) -> Result<GenerateConfig> {
    let mut builder = GenerateConfig::builder()
        .title(cli.title.clone())
        .compress(!cli.no_compress);

    if let Some(name) = cli.output.as_ref().and_then(|p| p.file_name()) {
        builder = builder.file_name(name.to_string_lossy());
    }
    if let Some(ref dir) = cli.staging_dir {
        builder = builder.staging_root(dir);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(stats: &GenerationStats, output_path: &Path) {
    eprintln!(
        "{}  {} variations  {}ms  →  {}",
        green("✔"),
        stats.variation_count,
        stats.total_duration_ms,
        bold(&output_path.display().to_string()),
    );
    eprintln!(
        "   sheet {}x{} px cut into {} / {} / {} px",
        stats.source_width,
        stats.source_height,
        stats.slice_heights[0],
        stats.slice_heights[1],
        stats.slice_heights[2],
    );
    if stats.dropped_chars > 0 {
        eprintln!(
            "   {}",
            dim(&format!(
                "{} emoji/symbol characters left out of the printed text",
                stats.dropped_chars
            ))
        );
    }
}
