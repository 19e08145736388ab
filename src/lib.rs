mod cli;
mod core;
mod processors;
pub mod report;
mod utils;

pub use cli::{
    confirm, usage_exit_status, Algorithm, CompressCli, ConvertCli, EXIT_USAGE_ERROR,
};
pub use crate::core::{
    ConversionSummary, ConvertConfig, DirectoryConversion, ImageProcessor, MediaError,
    OutputFormat, ProcessConfig, ResizeAlgorithm, Result, RunSummary, TransformResult,
    COMPRESS_EXTENSIONS, CONVERT_EXTENSIONS,
};
pub use processors::{
    fit_within, flatten_alpha, is_heif_path, normalize_color_mode, run_with_timeout,
    write_atomically, BatchProcessor, Compressor, ConversionBatch, ConversionMethod, Converter,
    HelperOutcome, Loader, NativeHelper, Resizer, SipsHelper,
};
pub use utils::{
    backup_path_for, format_file_size, format_signed_size, is_jpeg_path, jpg_counterpart,
};

pub mod prelude {
    pub use crate::{
        BatchProcessor, ConversionBatch, ConvertConfig, Converter, ImageProcessor, ProcessConfig,
        ResizeAlgorithm,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
