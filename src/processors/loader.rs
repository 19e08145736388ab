// media-squeeze/src/processors/loader.rs
use crate::core::{MediaError, Result};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let image = if is_heif_path(path) {
            self.load_heif(path)?
        } else {
            self.load_generic(path)?
        };

        if let Some((max_w, max_h)) = self.max_dimensions {
            let (width, height) = image.dimensions();
            if width > max_w || height > max_h {
                return Err(MediaError::ProcessingError(format!(
                    "Image dimensions {}x{} exceed maximum {}x{}",
                    width, height, max_w, max_h
                )));
            }
        }

        let (width, height) = image.dimensions();
        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    /// Content sniffing wins over the extension, so a mislabelled file still
    /// decodes with the right codec.
    fn load_generic(&self, path: &Path) -> Result<DynamicImage> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| MediaError::ProcessingError(format!("Failed to decode image: {}", e)))
    }

    #[cfg(feature = "heif")]
    fn load_heif(&self, path: &Path) -> Result<DynamicImage> {
        match super::heif::decode(path) {
            Ok(image) => Ok(image),
            Err(e) => {
                log::debug!(
                    "libheif could not decode {} ({}), trying content sniffing",
                    path.display(),
                    e
                );
                self.load_generic(path).map_err(|_| e)
            }
        }
    }

    #[cfg(not(feature = "heif"))]
    fn load_heif(&self, path: &Path) -> Result<DynamicImage> {
        self.load_generic(path).map_err(|e| {
            MediaError::UnsupportedFormat(format!(
                "{} (HEIF decoding requires the 'heif' feature): {}",
                path.display(),
                e
            ))
        })
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(MediaError::InvalidParameter(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let metadata = path.metadata()?;
        if metadata.len() == 0 {
            return Err(MediaError::InvalidParameter(format!(
                "File is empty: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_heif_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("heic") || ext.eq_ignore_ascii_case("heif"))
        .unwrap_or(false)
}
