// media-squeeze/src/core/processor.rs
use super::{MediaError, ProcessConfig, Result, TransformResult};
use crate::processors::{normalize_color_mode, Compressor, Loader, Resizer};
use std::path::Path;

/// Decode, flatten to RGB, fit into the bounding box and re-encode.
pub struct ImageProcessor {
    config: ProcessConfig,
    loader: Loader,
    resizer: Resizer,
    compressor: Compressor,
}

impl ImageProcessor {
    pub fn new(config: ProcessConfig) -> Self {
        let resizer = Resizer::new(config.algorithm, config.max_width, config.max_height);
        let compressor = Compressor::new(config.quality).with_png_optimization(config.optimize_png);

        Self {
            config,
            loader: Loader::new(),
            resizer,
            compressor,
        }
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// `output_path` may equal `input_path`; the original is only replaced
    /// once the new encoding is complete.
    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<TransformResult> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        if !input_path.is_file() {
            return Err(MediaError::InvalidParameter(format!(
                "Input file does not exist: {}",
                input_path.display()
            )));
        }

        let original_size = std::fs::metadata(input_path)?.len();

        let image = self.loader.load(input_path)?;
        let image = normalize_color_mode(image, self.config.background);
        let image = self.resizer.resize(image);

        let written = self.compressor.save(&image, output_path)?;
        let compressed_size = std::fs::metadata(&written)?.len();

        Ok(TransformResult::new(written, original_size, compressed_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    #[test]
    fn png_destination_stays_png_without_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        RgbaImage::from_pixel(300, 100, Rgba([0, 0, 255, 0]))
            .save(&path)
            .unwrap();

        let config = ProcessConfig {
            max_width: 150,
            max_height: 150,
            ..Default::default()
        };
        let result = ImageProcessor::new(config).process(&path, &path).unwrap();
        assert_eq!(result.output_path, path);

        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.dimensions(), (150, 50));
        assert!(!reloaded.color().has_alpha());
        assert_eq!(reloaded.to_rgb8().get_pixel(10, 10).0, [255, 255, 255]);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let processor = ImageProcessor::new(ProcessConfig::default());
        let missing = dir.path().join("nope.jpg");
        assert!(processor.process(&missing, &missing).is_err());
    }
}
