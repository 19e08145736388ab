// media-squeeze/src/cli.rs
use crate::core::{
    ConvertConfig, MediaError, ProcessConfig, ResizeAlgorithm, DEFAULT_BACKUP_SUFFIX,
    DEFAULT_DIR_PREFIX,
};
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}

/// Compress and resize every image under a directory, in place.
#[derive(Parser, Debug)]
#[command(name = "compress-images", author, version, about)]
pub struct CompressCli {
    /// Directory to process recursively
    #[arg(default_value = "new_images")]
    pub directory: PathBuf,

    /// Maximum output width in pixels
    #[arg(long, default_value_t = 1920)]
    pub max_width: u32,

    /// Maximum output height in pixels
    #[arg(long, default_value_t = 1920)]
    pub max_height: u32,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Resampling filter used when downscaling
    #[arg(long, value_enum, default_value_t = Algorithm::Lanczos3)]
    pub algorithm: Algorithm,

    /// Do not keep a copy of each original
    #[arg(long)]
    pub no_backup: bool,

    /// Suffix appended to backup copies
    #[arg(long, default_value = DEFAULT_BACKUP_SUFFIX)]
    pub backup_suffix: String,

    /// Skip lossless PNG optimization
    #[arg(long)]
    pub no_png_optimize: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl CompressCli {
    pub fn to_config(&self) -> ProcessConfig {
        ProcessConfig {
            max_width: self.max_width,
            max_height: self.max_height,
            quality: self.quality,
            algorithm: self.algorithm.into(),
            optimize_png: !self.no_png_optimize,
            backup: !self.no_backup,
            backup_suffix: self.backup_suffix.clone(),
            ..Default::default()
        }
    }
}

/// Convert the images of every event directory to JPEG.
///
/// HEIC/HEIF files go through `sips` when it is on PATH. Without it, real
/// HEIC data can only be decoded by a build with the `heif` feature
/// (`cargo install media-squeeze --features heif`, needs libheif); a default
/// build reports such files as failed.
#[derive(Parser, Debug)]
#[command(name = "convert-to-jpg", author, version, about)]
pub struct ConvertCli {
    /// Directory holding the event subdirectories
    #[arg(long, default_value = "new_images")]
    pub base_dir: PathBuf,

    /// Only subdirectories starting with this prefix are converted
    #[arg(long, default_value = DEFAULT_DIR_PREFIX)]
    pub prefix: String,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Seconds to wait for the native HEIC helper
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Always decode in process, even when sips is available
    #[arg(long)]
    pub no_native_helper: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertCli {
    pub fn to_config(&self) -> ConvertConfig {
        ConvertConfig {
            quality: self.quality,
            native_helper: !self.no_native_helper,
            helper_timeout: Duration::from_secs(self.timeout),
            dir_prefix: self.prefix.clone(),
            ..Default::default()
        }
    }
}

/// Exit status for a run that could not start.
pub const EXIT_USAGE_ERROR: u8 = 1;

/// Writes `prompt` and reads one answer line. Only `y`/`Y` proceeds; an empty
/// answer or end of input cancels.
pub fn confirm<R: BufRead, W: Write>(
    prompt: &str,
    mut input: R,
    mut output: W,
) -> io::Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Errors that end a run with [`EXIT_USAGE_ERROR`] and a message instead of
/// a backtrace-style failure.
pub fn usage_exit_status(error: &MediaError) -> Option<u8> {
    match error {
        MediaError::DirectoryNotFound(_) | MediaError::NoMatchingDirectories { .. } => {
            Some(EXIT_USAGE_ERROR)
        }
        _ => None,
    }
}
