// media-squeeze/src/processors/mod.rs
mod batch;
mod compressor;
mod converter;
#[cfg(feature = "heif")]
mod heif;
mod loader;
mod normalizer;
mod resizer;

pub use batch::{BatchProcessor, ConversionBatch};
pub use compressor::{write_atomically, Compressor};
pub use converter::{
    run_with_timeout, ConversionMethod, Converter, HelperOutcome, NativeHelper, SipsHelper,
};
pub use loader::{is_heif_path, Loader};
pub use normalizer::{flatten_alpha, normalize_color_mode};
pub use resizer::{fit_within, Resizer};

