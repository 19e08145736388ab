// media-squeeze/src/processors/compressor.rs
use crate::core::{MediaError, OutputFormat, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::DynamicImage;
use oxipng::{optimize_from_memory, Options};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct Compressor {
    quality: u8,
    optimize_png: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            optimize_png: true,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    /// Encodes `image` for `path` and writes it atomically. Returns the path
    /// actually written, which gets a `.jpg` extension when the requested
    /// one has no encoder.
    pub fn save(&self, image: &DynamicImage, path: &Path) -> Result<PathBuf> {
        let (path, format) = OutputFormat::resolve(path);
        self.save_with_format(image, &path, format)?;
        Ok(path)
    }

    pub fn save_with_format(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<()> {
        log::debug!(
            "Saving image to {} with format {:?}, quality: {}",
            path.display(),
            format,
            self.quality
        );

        let data = self.compress_to_bytes(image, format)?;
        write_atomically(path, &data)?;

        log::debug!("Saved image: {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    pub fn compress_to_bytes(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();

        match format {
            OutputFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
                image.write_with_encoder(encoder)?;
            }
            OutputFormat::Png => {
                let encoder = PngEncoder::new_with_quality(
                    &mut buffer,
                    CompressionType::Best,
                    PngFilterType::Adaptive,
                );
                image.write_with_encoder(encoder)?;
                if self.optimize_png {
                    return self.optimize_png_bytes(&buffer);
                }
            }
        }

        Ok(buffer)
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        optimize_from_memory(data, &Options::default())
            .map_err(|e| MediaError::PngOptimization(e.to_string()))
    }
}

/// Writes `data` to a temporary file next to `path`, then renames it over
/// `path`. A failure at any point leaves the previous file intact.
pub fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::create_dir_all(parent_dir(path))?;

    let mut tmp = sibling_temp_file(path, ".tmp")?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    persist_over(tmp, path)
}

/// Temporary file in the directory of `path`. On unix it is opened with the
/// same umask-filtered mode a plain `File::create` would get, not 0600.
pub(crate) fn sibling_temp_file(path: &Path, suffix: &str) -> Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".squeeze-").suffix(suffix);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    Ok(builder.tempfile_in(parent_dir(path))?)
}

/// Renames `tmp` over `path`, keeping the permissions of the file it
/// replaces.
pub(crate) fn persist_over(tmp: NamedTempFile, path: &Path) -> Result<()> {
    if let Ok(existing) = std::fs::metadata(path) {
        std::fs::set_permissions(tmp.path(), existing.permissions())?;
    }

    tmp.persist(path).map_err(|e| MediaError::Io(e.error))?;
    Ok(())
}

pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
