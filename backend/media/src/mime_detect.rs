//! MIME type detection for uploaded files.
//!
//! Used to label image entries when they are rendered back as data URIs.

use std::path::Path;

/// Lowercased extension of a filename, or an empty string.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Detect MIME type by file extension.
pub fn detect_mime_type(filename: &str) -> &'static str {
    match extension_of(filename).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tiff" | "tif" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Sniff the MIME type of image bytes from their magic number.
pub fn sniff_image_mime(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'B', b'M', ..] => "image/bmp",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        _ => "application/octet-stream",
    }
}
