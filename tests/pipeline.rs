//! End-to-end tests for tambola-pdf.
//!
//! Sheets are generated in memory, so no fixture files are needed. Output
//! PDFs are reloaded with lopdf and inspected structurally.

use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::Content;
use lopdf::Object;
use flate2::read::ZlibDecoder;
use std::io::{Cursor, Read};
use std::path::Path;
use tambola_pdf::pipeline::{compose, render, slice, stage::StagingArea};
use tambola_pdf::{
    extract_variations, generate, generate_sync, GenerateConfig, TambolaError, TicketRequest,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

const MESSAGE: &str = "\
Good evening everyone! Tickets for tonight below.
1\u{FE0F}\u{20E3} Early Five /- 100
2\u{FE0F}\u{20E3} Top Line /- 150
3\u{FE0F}\u{20E3} Middle Line /- 150

\u{1FABA} Full House /- 500
Game starts at 8 pm sharp
";

/// A sheet whose three bands have distinct solid colours.
fn banded_sheet(width: u32, height: u32, colours: [[u8; 3]; 3]) -> Vec<u8> {
    let third = height / 3;
    let img = RgbImage::from_fn(width, height, |_, y| {
        let band = if y < third {
            0
        } else if y < 2 * third {
            1
        } else {
            2
        };
        Rgb(colours[band])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn request(image: Vec<u8>, text: &str) -> TicketRequest {
    TicketRequest::new(Some(image), Some(text.to_string())).unwrap()
}

fn config_in(dir: &Path) -> GenerateConfig {
    GenerateConfig::builder().staging_root(dir).build().unwrap()
}

/// First pixel of every embedded image, in page order.
fn first_pixels(pdf_bytes: &[u8]) -> Vec<[u8; 3]> {
    let pdf = lopdf::Document::load_mem(pdf_bytes).unwrap();
    let mut pixels = Vec::new();
    for (_, page_id) in pdf.get_pages() {
        let page = pdf.get_dictionary(page_id).unwrap();
        let resources = match page.get(b"Resources").unwrap() {
            Object::Reference(id) => pdf.get_dictionary(*id).unwrap(),
            Object::Dictionary(dict) => dict,
            other => panic!("unexpected resources {other:?}"),
        };
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let mut names: Vec<_> = xobjects.iter().collect();
        names.sort_by(|a, b| a.0.cmp(b.0));
        for (_, obj) in names {
            let id = obj.as_reference().unwrap();
            let stream = pdf.get_object(id).unwrap().as_stream().unwrap();
            let data = image_samples(stream);
            pixels.push([data[0], data[1], data[2]]);
        }
    }
    pixels
}

/// Raw samples of an image XObject.
///
/// lopdf refuses to decompress image streams, so flate is undone here.
fn image_samples(stream: &lopdf::Stream) -> Vec<u8> {
    match stream.dict.get(b"Filter") {
        Err(_) => stream.content.clone(),
        Ok(filter) => {
            assert_eq!(filter.as_name().unwrap(), b"FlateDecode");
            let mut data = Vec::new();
            ZlibDecoder::new(stream.content.as_slice())
                .read_to_end(&mut data)
                .unwrap();
            data
        }
    }
}

/// Whether every image XObject in the file is flate-compressed.
fn images_are_compressed(pdf_bytes: &[u8]) -> bool {
    let pdf = lopdf::Document::load_mem(pdf_bytes).unwrap();
    let images: Vec<_> = pdf
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|t| t.as_name())
                .is_ok_and(|t| t == b"Image")
        })
        .collect();
    assert_eq!(images.len(), 3);
    images.iter().all(|s| s.dict.get(b"Filter").is_ok())
}

/// Strings shown with `Tj` on a page (1-indexed).
fn shown_text(pdf_bytes: &[u8], page_no: u32) -> Vec<String> {
    let pdf = lopdf::Document::load_mem(pdf_bytes).unwrap();
    let page_id = pdf.get_pages()[&page_no];
    let content = Content::decode(&pdf.get_page_content(page_id).unwrap()).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .map(|op| String::from_utf8_lossy(op.operands[0].as_str().unwrap()).into_owned())
        .collect()
}

// ── Full pipeline ────────────────────────────────────────────────────────────

#[test]
fn message_lines_end_up_on_page_two() {
    let root = tempfile::tempdir().unwrap();
    let out = generate_sync(
        request(banded_sheet(60, 90, [[255, 0, 0], [0, 255, 0], [0, 0, 255]]), MESSAGE),
        &config_in(root.path()),
    )
    .unwrap();

    assert_eq!(out.stats.variation_count, 4);
    assert_eq!(
        shown_text(&out.bytes, 2),
        vec![
            "1 Early Five /- 100",
            "2 Top Line /- 150",
            "3 Middle Line /- 150",
            " Full House /- 500",
        ]
    );
    assert!(shown_text(&out.bytes, 1).is_empty());
    // two keycap pieces on three lines, one nest
    assert_eq!(out.stats.dropped_chars, 7);
}

#[test]
fn slices_land_on_the_right_pages() {
    let root = tempfile::tempdir().unwrap();
    let compressed = config_in(root.path());
    let plain = GenerateConfig::builder()
        .staging_root(root.path())
        .compress(false)
        .build()
        .unwrap();

    for (config, flate) in [(compressed, true), (plain, false)] {
        let out = generate_sync(
            request(banded_sheet(60, 90, [[255, 0, 0], [0, 255, 0], [0, 0, 255]]), MESSAGE),
            &config,
        )
        .unwrap();

        assert_eq!(images_are_compressed(&out.bytes), flate);
        // page 1: top (red) then middle (green); page 2: bottom (blue)
        assert_eq!(
            first_pixels(&out.bytes),
            vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]]
        );
    }
}

#[test]
fn text_without_variations_still_gives_two_pages() {
    let root = tempfile::tempdir().unwrap();
    for text in ["Hello all\nSee you at 8", " \n\t \n"] {
        let out = generate_sync(
            request(banded_sheet(30, 30, [[1, 1, 1]; 3]), text),
            &config_in(root.path()),
        )
        .unwrap();

        assert_eq!(out.stats.variation_count, 0);
        let pdf = lopdf::Document::load_mem(&out.bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 2);
        assert!(shown_text(&out.bytes, 2).is_empty());
        assert_eq!(first_pixels(&out.bytes).len(), 3);
    }
}

#[test]
fn missing_inputs_are_reported_before_generation() {
    assert!(matches!(
        TicketRequest::new(None, Some(MESSAGE.into())),
        Err(TambolaError::MissingInput { .. })
    ));
    assert!(matches!(
        TicketRequest::new(Some(banded_sheet(3, 3, [[0; 3]; 3])), Some(String::new())),
        Err(TambolaError::MissingInput { .. })
    ));
}

#[test]
fn tiny_sheet_is_rejected_as_invalid_image() {
    let root = tempfile::tempdir().unwrap();
    let err = generate_sync(
        request(banded_sheet(10, 2, [[0; 3]; 3]), MESSAGE),
        &config_in(root.path()),
    )
    .unwrap_err();
    assert!(matches!(err, TambolaError::InvalidImage { .. }));
    // nothing left behind
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

// ── Staging hazards ──────────────────────────────────────────────────────────

#[test]
fn slice_deleted_before_render_is_a_render_error() {
    let sheet = slice::decode(&banded_sheet(12, 12, [[9; 3]; 3])).unwrap();
    let slices = slice::slice(&sheet).unwrap();
    let area = StagingArea::new(None, uuid::Uuid::new_v4()).unwrap();
    let staged = area.stage(&slices).unwrap();

    let lines = extract_variations(MESSAGE);
    let document = compose::compose(staged.a(), staged.b(), staged.c(), &lines);
    std::fs::remove_file(staged.c()).unwrap();

    let err = render::render(&document, &GenerateConfig::default()).unwrap_err();
    match err {
        TambolaError::Render { path, .. } => assert_eq!(path, staged.c()),
        other => panic!("expected Render error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_never_see_each_others_slices() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    assert!(config.compress);

    let red = [[200, 0, 0], [201, 0, 0], [202, 0, 0]];
    let blue = [[0, 0, 200], [0, 0, 201], [0, 0, 202]];

    let jobs: Vec<_> = (0..8)
        .map(|i| {
            let colours = if i % 2 == 0 { red } else { blue };
            let req = request(banded_sheet(40, 60, colours), MESSAGE);
            let config = config.clone();
            tokio::spawn(async move { (colours, generate(req, &config).await) })
        })
        .collect();

    for job in futures::future::join_all(jobs).await {
        let (colours, result) = job.unwrap();
        let out = result.unwrap();
        assert_eq!(first_pixels(&out.bytes), colours.to_vec());
    }

    // every request cleaned up its own staging directory
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

// ── Extraction properties ────────────────────────────────────────────────────

#[test]
fn extraction_matches_the_prefix_and_separator_pattern() {
    let pattern =
        regex::Regex::new(r"^[0-9\x{FE0F}\x{20E3}\x{1FABA}\x{1FAB9}].*?/-.*$").unwrap();
    let samples = [
        MESSAGE,
        "",
        "1/-\n/-1\n 7 x /- y \n8\n\u{1FAB9}/-/-\nA1 /- 2",
        "9 Pyramid /- 100 /- bonus\r\n0 Zero /-\r\nnothing here",
    ];
    for text in samples {
        let expected: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| pattern.is_match(l))
            .collect();
        let got: Vec<String> = extract_variations(text)
            .into_iter()
            .map(|l| l.into_string())
            .collect();
        assert_eq!(got, expected, "text: {text:?}");
    }
}

#[test]
fn keycap_and_plain_example_lines() {
    assert_eq!(
        extract_variations("3\u{FE0F}\u{20E3} Early Five /- pattern A").len(),
        1
    );
    assert!(extract_variations("Early Five pattern A").is_empty());
}
