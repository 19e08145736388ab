// media-squeeze/src/processors/normalizer.rs
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

/// Converts any decoded image into 8-bit RGB, the only layout the JPEG
/// encoder accepts without surprises.
///
/// Alpha-bearing images are composited over an opaque `background` canvas,
/// even when every pixel is already opaque. Palette images arrive here
/// expanded to RGB or RGBA by the decoder.
pub fn normalize_color_mode(image: DynamicImage, background: [u8; 3]) -> DynamicImage {
    match image {
        rgb @ DynamicImage::ImageRgb8(_) => rgb,
        other if other.color().has_alpha() => {
            log::debug!("Flattening {:?} onto {:?}", other.color(), background);
            DynamicImage::ImageRgb8(flatten_alpha(&other.to_rgba8(), background))
        }
        other => {
            log::debug!("Converting {:?} to RGB8", other.color());
            DynamicImage::ImageRgb8(other.to_rgb8())
        }
    }
}

/// Pastes `source` onto a canvas filled with `background`, using the alpha
/// channel as the mask.
pub fn flatten_alpha(source: &RgbaImage, background: [u8; 3]) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(source.width(), source.height(), Rgb(background));

    for (x, y, pixel) in source.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        let blend = |src: u8, bg: u8| -> u8 {
            ((src as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        canvas.put_pixel(
            x,
            y,
            Rgb([
                blend(r, background[0]),
                blend(g, background[1]),
                blend(b, background[2]),
            ]),
        );
    }

    canvas
}
