// media-squeeze/src/core/mod.rs
pub mod processor;

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use processor::ImageProcessor;

/// Extensions picked up by the compression walk. Matching is case-sensitive,
/// so the common upper-case variants are listed explicitly.
pub const COMPRESS_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// Extensions picked up by the conversion walk.
pub const CONVERT_EXTENSIONS: &[&str] = &[
    "heic", "HEIC", "heif", "HEIF", "png", "PNG", "jpeg", "JPEG", "jpg", "JPG", "webp", "WEBP",
    "gif", "GIF",
];

pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";
pub const DEFAULT_PROCESSED_MARKER: &str = "_compressed";
pub const DEFAULT_DIR_PREFIX: &str = "goko-";
pub const DEFAULT_HELPER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Picks the encoder for a destination path. Anything that is not a JPEG
    /// or PNG extension is redirected to a `.jpg` sibling.
    pub fn resolve(path: &Path) -> (PathBuf, OutputFormat) {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => (path.to_path_buf(), OutputFormat::Jpeg),
            Some("png") => (path.to_path_buf(), OutputFormat::Png),
            _ => (path.with_extension("jpg"), OutputFormat::Jpeg),
        }
    }
}

/// Settings for the compression transform and its directory walk.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub algorithm: ResizeAlgorithm,
    pub optimize_png: bool,
    pub backup: bool,
    pub backup_suffix: String,
    pub processed_marker: String,
    pub background: [u8; 3],
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1920,
            quality: 85,
            algorithm: ResizeAlgorithm::Lanczos3,
            optimize_png: true,
            backup: true,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            processed_marker: DEFAULT_PROCESSED_MARKER.to_string(),
            background: [255, 255, 255],
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(MediaError::InvalidParameter(
                "Maximum dimensions must be greater than zero".to_string(),
            ));
        }

        if self.max_width > 100_000 || self.max_height > 100_000 {
            return Err(MediaError::InvalidParameter(
                "Dimensions too large (max 100,000 pixels)".to_string(),
            ));
        }

        validate_quality(self.quality)?;

        if self.backup && self.backup_suffix.is_empty() {
            return Err(MediaError::InvalidParameter(
                "Backup suffix cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Settings for the JPEG conversion transform and its directory walk.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub quality: u8,
    pub native_helper: bool,
    pub helper_timeout: Duration,
    pub dir_prefix: String,
    pub background: [u8; 3],
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            native_helper: true,
            helper_timeout: DEFAULT_HELPER_TIMEOUT,
            dir_prefix: DEFAULT_DIR_PREFIX.to_string(),
            background: [255, 255, 255],
        }
    }
}

impl ConvertConfig {
    pub fn validate(&self) -> Result<()> {
        validate_quality(self.quality)?;

        if self.helper_timeout.is_zero() {
            return Err(MediaError::InvalidParameter(
                "Helper timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_quality(quality: u8) -> Result<()> {
    if quality == 0 || quality > 100 {
        return Err(MediaError::InvalidParameter(
            "Quality must be between 1 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Outcome of compressing one file.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    pub output_path: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    pub saved_bytes: i64,
    pub saved_percent: f64,
}

impl TransformResult {
    pub fn new(output_path: PathBuf, original_size: u64, compressed_size: u64) -> Self {
        let saved_bytes = original_size as i64 - compressed_size as i64;
        Self {
            output_path,
            original_size,
            compressed_size,
            saved_bytes,
            saved_percent: percent_of(saved_bytes, original_size),
        }
    }
}

/// Aggregate counters for one compression run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub files_found: usize,
    pub processed: usize,
    pub skipped: usize,
    pub backups_created: usize,
    pub total_original_size: u64,
    pub total_compressed_size: u64,
    pub failed: Vec<(PathBuf, String)>,
}

impl RunSummary {
    pub fn record(&mut self, result: &TransformResult) {
        self.processed += 1;
        self.total_original_size += result.original_size;
        self.total_compressed_size += result.compressed_size;
    }

    pub fn record_failure(&mut self, path: &Path, cause: String) {
        self.failed.push((path.to_path_buf(), cause));
    }

    pub fn total_saved(&self) -> i64 {
        self.total_original_size as i64 - self.total_compressed_size as i64
    }

    pub fn saved_percent(&self) -> f64 {
        percent_of(self.total_saved(), self.total_original_size)
    }
}

/// Conversion results for one event subdirectory.
#[derive(Debug, Default, Clone)]
pub struct DirectoryConversion {
    pub name: String,
    pub converted: Vec<PathBuf>,
    pub already_present: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl DirectoryConversion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.converted.is_empty() && self.already_present.is_empty() && self.failed.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConversionSummary {
    pub directories: Vec<DirectoryConversion>,
}

impl ConversionSummary {
    pub fn converted_count(&self) -> usize {
        self.directories.iter().map(|d| d.converted.len()).sum()
    }

    pub fn already_present_count(&self) -> usize {
        self.directories.iter().map(|d| d.already_present.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.directories.iter().map(|d| d.failed.len()).sum()
    }

    /// JPEGs available after the run, whether converted now or earlier.
    pub fn ready_count(&self) -> usize {
        self.converted_count() + self.already_present_count()
    }
}

pub fn percent_of(part: i64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No directories starting with '{prefix}' found in {}", .base.display())]
    NoMatchingDirectories { base: PathBuf, prefix: String },

    #[error("PNG optimization failed: {0}")]
    PngOptimization(String),

    #[error("HEIF decoding failed: {0}")]
    Heif(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;
