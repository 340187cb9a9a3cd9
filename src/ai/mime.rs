/// Sniff the image format from its leading bytes.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

/// MIME type for an upload part, falling back to PNG for unknown data.
pub fn upload_mime(bytes: &[u8]) -> &'static str {
    detect_image_mime(bytes).unwrap_or_else(|| {
        tracing::warn!(
            "Unrecognized image format (first 4 bytes: {:02X?}), falling back to image/png",
            &bytes[..bytes.len().min(4)]
        );
        "image/png"
    })
}

/// File name matching the sniffed format, for multipart uploads.
pub fn upload_file_name(bytes: &[u8]) -> &'static str {
    match upload_mime(bytes) {
        "image/jpeg" => "photo.jpg",
        "image/webp" => "photo.webp",
        _ => "photo.png",
    }
}
