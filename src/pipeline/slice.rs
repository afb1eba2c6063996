//! Slicer: cut the ticket sheet into three horizontal bands.
//!
//! A sheet holds three ticket sets stacked top to bottom, so the image is cut
//! along its height. Every band spans the full width. The first two bands are
//! `floor(h/3)` pixels tall and the bottom band takes whatever is left, so the
//! three always cover the source exactly with no overlap.

use crate::error::TambolaError;
use image::DynamicImage;
use tracing::debug;

/// Number of ticket sets on one sheet.
pub const SLICE_COUNT: usize = 3;

/// The three bands of a ticket sheet, top to bottom.
///
/// Order matters: `a` and `b` go on page 1, `c` on page 2.
#[derive(Debug, Clone)]
pub struct SliceSet {
    slices: [DynamicImage; SLICE_COUNT],
}

impl SliceSet {
    pub fn a(&self) -> &DynamicImage {
        &self.slices[0]
    }

    pub fn b(&self) -> &DynamicImage {
        &self.slices[1]
    }

    pub fn c(&self) -> &DynamicImage {
        &self.slices[2]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicImage> {
        self.slices.iter()
    }

    /// Pixel heights of the three bands.
    pub fn heights(&self) -> [u32; SLICE_COUNT] {
        [
            self.slices[0].height(),
            self.slices[1].height(),
            self.slices[2].height(),
        ]
    }
}

/// Decode PNG or JPEG bytes.
///
/// # Errors
/// [`TambolaError::InvalidImage`] if the bytes are not a supported image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, TambolaError> {
    let format = image::guess_format(bytes)
        .map_err(|e| TambolaError::invalid_image(format!("unrecognised image format: {e}")))?;
    let img = image::load_from_memory_with_format(bytes, format)?;
    debug!(
        "Decoded {:?} image {}x{}",
        format,
        img.width(),
        img.height()
    );
    Ok(img)
}

/// `(offset, length)` of each band along an axis of `extent` pixels.
///
/// Bands 0 and 1 are `extent / 3` long; band 2 absorbs the remainder.
pub fn band_extents(extent: u32) -> [(u32, u32); SLICE_COUNT] {
    let third = extent / 3;
    [
        (0, third),
        (third, third),
        (2 * third, extent - 2 * third),
    ]
}

/// Cut `image` into top, middle and bottom bands.
///
/// The source is left untouched; each band is a fresh image.
///
/// # Errors
/// [`TambolaError::InvalidImage`] if the image has zero height or width.
pub fn slice(image: &DynamicImage) -> Result<SliceSet, TambolaError> {
    let (width, height) = (image.width(), image.height());
    if height == 0 || width == 0 {
        return Err(TambolaError::invalid_image(format!(
            "image has no extent to slice ({width}x{height} px)"
        )));
    }

    let [a, b, c] = band_extents(height).map(|(y, h)| image.crop_imm(0, y, width, h));
    debug!(
        "Sliced {}x{} sheet into bands of {}, {}, {} px",
        width,
        height,
        a.height(),
        b.height(),
        c.height()
    );

    Ok(SliceSet { slices: [a, b, c] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn striped(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, y| {
            Rgb([(y % 256) as u8, 0, 0])
        }))
    }

    #[test]
    fn extents_partition_the_axis() {
        for d in 0..200u32 {
            let bands = band_extents(d);
            let total: u32 = bands.iter().map(|(_, len)| len).sum();
            assert_eq!(total, d, "d={d}");
            assert_eq!(bands[0].1, d / 3);
            assert_eq!(bands[1].1, d / 3);
            assert_eq!(bands[2].1, d - 2 * (d / 3));
            // contiguous, no overlap
            assert_eq!(bands[0].0, 0);
            assert_eq!(bands[1].0, bands[0].0 + bands[0].1);
            assert_eq!(bands[2].0, bands[1].0 + bands[1].1);
        }
    }

    #[test]
    fn divisible_height_gives_equal_bands() {
        let set = slice(&striped(40, 300)).unwrap();
        assert_eq!(set.heights(), [100, 100, 100]);
        assert!(set.iter().all(|s| s.width() == 40));
    }

    #[test]
    fn remainder_goes_to_bottom_band() {
        let set = slice(&striped(10, 101)).unwrap();
        assert_eq!(set.heights(), [33, 33, 35]);
    }

    #[test]
    fn bands_copy_the_right_rows() {
        let source = striped(4, 9);
        let set = slice(&source).unwrap();
        let row_of = |img: &DynamicImage, y: u32| img.to_rgb8().get_pixel(0, y).0[0];
        assert_eq!(row_of(set.a(), 0), 0);
        assert_eq!(row_of(set.b(), 0), 3);
        assert_eq!(row_of(set.c(), 0), 6);
        assert_eq!(row_of(set.c(), 2), 8);
        // source untouched
        assert_eq!(source.height(), 9);
    }

    #[test]
    fn zero_extent_is_invalid() {
        let empty = DynamicImage::ImageRgb8(RgbImage::new(10, 0));
        assert!(matches!(
            slice(&empty),
            Err(TambolaError::InvalidImage { .. })
        ));
        let narrow = DynamicImage::ImageRgb8(RgbImage::new(0, 10));
        assert!(slice(&narrow).is_err());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode(b"hello, not an image"),
            Err(TambolaError::InvalidImage { .. })
        ));
    }

    #[test]
    fn decode_png_bytes() {
        let mut buf = Vec::new();
        striped(3, 6)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        let img = decode(&buf).unwrap();
        assert_eq!((img.width(), img.height()), (3, 6));
    }

    #[test]
    fn decode_jpeg_bytes() {
        let mut buf = Vec::new();
        striped(16, 24)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        let set = slice(&decode(&buf).unwrap()).unwrap();
        assert_eq!(set.heights(), [8, 8, 8]);
    }
}
