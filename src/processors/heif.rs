// media-squeeze/src/processors/heif.rs
//! HEIC/HEIF decoding through libheif, enabled by the `heif` feature.
use crate::core::{MediaError, Result};
use image::{DynamicImage, RgbImage, RgbaImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use std::path::Path;

pub fn decode(path: &Path) -> Result<DynamicImage> {
    let path_str = path.to_str().ok_or_else(|| {
        MediaError::InvalidParameter(format!("Non UTF-8 path: {}", path.display()))
    })?;

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_file(path_str).map_err(heif_error)?;
    let handle = ctx.primary_image_handle().map_err(heif_error)?;

    let has_alpha = handle.has_alpha_channel();
    let chroma = if has_alpha {
        RgbChroma::Rgba
    } else {
        RgbChroma::Rgb
    };

    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(chroma), None)
        .map_err(heif_error)?;

    let planes = decoded.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| MediaError::Heif("no interleaved plane in decoded image".to_string()))?;

    let width = plane.width;
    let height = plane.height;
    let channels: usize = if has_alpha { 4 } else { 3 };
    let row_len = width as usize * channels;

    // libheif rows may be padded past the visible width
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let start = row * plane.stride;
        pixels.extend_from_slice(&plane.data[start..start + row_len]);
    }

    log::debug!(
        "Decoded HEIF {}: {}x{} (alpha: {})",
        path.display(),
        width,
        height,
        has_alpha
    );

    let image = if has_alpha {
        RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8)
    };

    image.ok_or_else(|| MediaError::Heif("pixel buffer does not match dimensions".to_string()))
}

fn heif_error(e: libheif_rs::HeifError) -> MediaError {
    MediaError::Heif(e.to_string())
}
