// media-squeeze/src/processors/resizer.rs
use crate::core::ResizeAlgorithm;
use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Downscales images into a bounding box, preserving aspect ratio.
pub struct Resizer {
    algorithm: ResizeAlgorithm,
    max_width: u32,
    max_height: u32,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm, max_width: u32, max_height: u32) -> Self {
        Self {
            algorithm,
            max_width,
            max_height,
        }
    }

    /// Returns the image unchanged when it already fits.
    pub fn resize(&self, image: DynamicImage) -> DynamicImage {
        let (orig_width, orig_height) = image.dimensions();
        let (width, height) = fit_within(orig_width, orig_height, self.max_width, self.max_height);

        if width == orig_width && height == orig_height {
            log::debug!("Image fits {}x{}, skipping resize", self.max_width, self.max_height);
            return image;
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            orig_width,
            orig_height,
            width,
            height
        );

        image.resize_exact(width, height, self.get_filter_type())
    }

    fn get_filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Target dimensions for `width`x`height` inside `max_width`x`max_height`.
/// Never upscales; scaled sides are floored and kept at least one pixel.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    // exact integer floor of dim * min(max_w / w, max_h / h)
    let (w, h) = (width as u64, height as u64);
    let (max_w, max_h) = (max_width as u64, max_height as u64);

    let (new_width, new_height) = if max_w * h <= max_h * w {
        (max_w, h * max_w / w)
    } else {
        (w * max_h / h, max_h)
    };

    (new_width.max(1) as u32, new_height.max(1) as u32)
}
