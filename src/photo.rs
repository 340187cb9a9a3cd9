//! Source photo preparation
//!
//! Checks the uploaded photo and normalises it to a PNG whose longer side is at
//! most [`MAX_SIDE`] and whose shorter side is at least [`MIN_SIDE`], the range
//! the image-to-image endpoints accept.

use crate::ai::mime;
use crate::error::PhotoError;
use crate::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;
pub const MAX_SIDE: u32 = 1024;
pub const MIN_SIDE: u32 = 512;

#[derive(Debug, Clone)]
pub struct PreparedPhoto {
    /// PNG-encoded pixels.
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub async fn load_photo(path: &Path) -> Result<PreparedPhoto> {
    let bytes = tokio::fs::read(path).await.map_err(PhotoError::from)?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    prepare_photo(bytes).await
}

pub async fn prepare_photo(bytes: Vec<u8>) -> Result<PreparedPhoto> {
    if bytes.is_empty() {
        return Err(PhotoError::Empty.into());
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge {
            size: bytes.len(),
            max: MAX_PHOTO_BYTES,
        }
        .into());
    }
    match mime::detect_image_mime(&bytes) {
        Some("image/png") | Some("image/jpeg") => {}
        _ => return Err(PhotoError::UnsupportedFormat.into()),
    }

    tokio::task::spawn_blocking(move || normalize(&bytes))
        .await
        .map_err(|e| Error::Invariant(format!("Photo processing task join error: {}", e)))?
        .map_err(Error::from)
}

fn normalize(bytes: &[u8]) -> std::result::Result<PreparedPhoto, PhotoError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    let (target_width, target_height) = target_dimensions(width, height);

    let img: DynamicImage = if (target_width, target_height) == (width, height) {
        img
    } else {
        tracing::debug!(
            "Resizing photo from {}x{} to {}x{}",
            width,
            height,
            target_width,
            target_height
        );
        img.resize_exact(target_width, target_height, FilterType::Lanczos3)
    };

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;

    Ok(PreparedPhoto {
        bytes: out,
        width: target_width,
        height: target_height,
    })
}

/// The longer-side cap wins when both bounds cannot hold.
fn target_dimensions(width: u32, height: u32) -> (u32, u32) {
    let long = width.max(height).max(1) as f64;
    let short = width.min(height).max(1) as f64;

    let scale = if long > MAX_SIDE as f64 {
        MAX_SIDE as f64 / long
    } else if short < MIN_SIDE as f64 {
        (MIN_SIDE as f64 / short).min(MAX_SIDE as f64 / long)
    } else {
        1.0
    };

    let scaled = |side: u32| ((side as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}
