//! PDF serialisation: turn a composed [`Document`] into bytes with lopdf.
//!
//! Images are embedded as uncompressed DeviceRGB XObjects (alpha is blended
//! onto white first) and text uses the built-in Helvetica with
//! `/WinAnsiEncoding`, so no font file is embedded. When compression is on,
//! every stream is flate-compressed just before saving.
//!
//! Layout coordinates are millimetres from the top-left; PDF user space is
//! points from the bottom-left, so every y is flipped against the page
//! height here and nowhere else.

use crate::config::GenerateConfig;
use crate::error::TambolaError;
use crate::layout::PT_PER_MM;
use crate::pipeline::compose::{Document, DrawCommand, Page, TextBlock};
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream, StringFormat};
use std::path::Path;
use tracing::{debug, info};

const FONT_RESOURCE: &str = "F1";
const PRODUCER: &str = concat!("tambola-pdf ", env!("CARGO_PKG_VERSION"));

/// Serialise `document` to PDF bytes.
///
/// # Errors
/// [`TambolaError::Render`] if a staged slice cannot be opened or decoded;
/// [`TambolaError::Internal`] if lopdf fails to encode the output.
pub fn render(document: &Document, config: &GenerateConfig) -> Result<Vec<u8>, TambolaError> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::with_capacity(document.pages().len());
    let mut image_count = 0;
    for page in document.pages() {
        let page_id = render_page(&mut pdf, page, pages_id, font_id, &mut image_count)?;
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    pdf.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = pdf.add_object(dictionary! {
        "Title" => text_string(&config.title),
        "Producer" => Object::string_literal(PRODUCER),
    });
    pdf.trailer.set("Info", Object::Reference(info_id));

    if config.compress {
        pdf.compress();
    }

    let mut buf = Vec::new();
    pdf.save_to(&mut buf)
        .map_err(|e| TambolaError::Internal(format!("PDF serialisation failed: {e}")))?;

    info!(
        "Rendered PDF: {} pages, {} images, {} bytes",
        page_count,
        image_count,
        buf.len()
    );
    Ok(buf)
}

/// Add one page, its content stream and its image XObjects.
fn render_page(
    pdf: &mut lopdf::Document,
    page: &Page,
    pages_id: ObjectId,
    font_id: ObjectId,
    image_count: &mut usize,
) -> Result<ObjectId, TambolaError> {
    let page_height = page.size.height_pt();
    let mut operations = Vec::new();
    let mut xobjects = Dictionary::new();

    for command in &page.commands {
        match command {
            DrawCommand::Image {
                path,
                x_mm,
                y_mm,
                width_mm,
            } => {
                let img = open_staged(path)?;
                let (px_w, px_h) = (img.width(), img.height());
                let image_id = pdf.add_object(image_xobject(&img));
                *image_count += 1;
                let name = format!("Im{}", *image_count);
                xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));

                let width = width_mm * PT_PER_MM;
                let height = width * px_h as f32 / px_w as f32;
                let x = x_mm * PT_PER_MM;
                let y = page_height - y_mm * PT_PER_MM - height;
                debug!(
                    "Placing {} ({}x{} px) at ({:.1}, {:.1}) pt, {:.1}x{:.1} pt",
                    path.display(),
                    px_w,
                    px_h,
                    x,
                    y,
                    width,
                    height
                );

                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new(
                    "cm",
                    vec![
                        Object::Real(width),
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(height),
                        Object::Real(x),
                        Object::Real(y),
                    ],
                ));
                operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
                operations.push(Operation::new("Q", vec![]));
            }
            DrawCommand::Text(block) => push_text(&mut operations, block, page_height),
        }
    }

    let content = Content { operations }
        .encode()
        .map_err(|e| TambolaError::Internal(format!("content stream encoding failed: {e}")))?;
    let content_id = pdf.add_object(Stream::new(dictionary! {}, content));

    let mut resources = dictionary! {
        "Font" => dictionary! {
            FONT_RESOURCE => Object::Reference(font_id),
        },
    };
    if !xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(xobjects));
    }

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(page.size.width_pt()),
        Object::Real(page_height),
    ];
    Ok(pdf.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => media_box,
        "Contents" => Object::Reference(content_id),
        "Resources" => resources,
    }))
}

/// One `BT … ET` per non-empty row; empty rows only take up space.
fn push_text(operations: &mut Vec<Operation>, block: &TextBlock, page_height: f32) {
    let x = block.x_mm * PT_PER_MM;
    let baseline_offset = block.baseline_offset_mm();

    for (i, row) in block.rows.iter().enumerate() {
        if row.is_empty() {
            continue;
        }
        let top = block.y_mm + i as f32 * block.line_height_mm;
        let y = page_height - (top + baseline_offset) * PT_PER_MM;

        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                Object::Real(block.font_size_pt),
            ],
        ));
        operations.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(row.clone(), StringFormat::Hexadecimal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
}

/// Open a staged slice, mapping any failure to [`TambolaError::Render`].
fn open_staged(path: &Path) -> Result<DynamicImage, TambolaError> {
    image::open(path).map_err(|e| TambolaError::Render {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Build an 8-bit DeviceRGB image XObject, blending alpha onto white.
fn image_xobject(img: &DynamicImage) -> Stream {
    let rgba = img.to_rgba8();
    let mut data = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize * 3);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let a = u16::from(a);
        for c in [r, g, b] {
            let blended = (u16::from(c) * a + 255 * (255 - a)) / 255;
            data.push(blended as u8);
        }
    }

    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(rgba.width())),
            "Height" => Object::Integer(i64::from(rgba.height())),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
        },
        data,
    )
}

/// PDF text string: plain bytes for ASCII, UTF-16BE with BOM otherwise.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
