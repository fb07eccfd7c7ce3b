//! Image preprocessing for OCR on code screenshots.
//!
//! Dark editor themes OCR poorly as-is, so every screenshot is flattened to a
//! strict black/white image before recognition.

use std::io::Cursor;

use codelens_core::ChatError;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

/// Luma values below this become black, the rest white.
pub const BINARY_THRESHOLD: u8 = 160;

/// Decode uploaded bytes (png, jpeg, bmp) into a bitmap.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ChatError> {
    image::load_from_memory(bytes)
        .map_err(|e| ChatError::OcrFailure(format!("cannot decode image: {e}")))
}

/// ITU-R 601-2 luma in 16.16 fixed point, matching common imaging libraries'
/// RGB → L conversion.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

/// Convert to grayscale, then threshold each pixel to 0 or 255.
pub fn binarize(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        if luma(r, g, b) < BINARY_THRESHOLD {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Encode a binary image as PNG for handing to an external engine.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, ChatError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ChatError::OcrFailure(format!("cannot encode image: {e}")))?;
    Ok(buf)
}
