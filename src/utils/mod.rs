// media-squeeze/src/utils/mod.rs
use crate::core::Result;
use std::fs::{File, FileTimes};
use std::path::{Path, PathBuf};

/// Human readable size with two decimals, e.g. `1.50 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }

    format!("{:.2} TB", size)
}

/// Like [`format_file_size`] but keeps the sign, for savings that turned
/// into growth.
pub fn format_signed_size(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_file_size(bytes.unsigned_abs()))
    } else {
        format_file_size(bytes as u64)
    }
}

/// Case-sensitive extension match against `extensions`.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext))
        .unwrap_or(false)
}

pub fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

/// `photo.png` -> `photo.png.backup`
pub fn backup_path_for(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// `IMG_0042.HEIC` -> `IMG_0042.jpg`
pub fn jpg_counterpart(path: &Path) -> PathBuf {
    path.with_extension("jpg")
}

/// Copies `from` to `to`, carrying permissions and access/modification
/// times over.
pub fn copy_with_times(from: &Path, to: &Path) -> Result<()> {
    std::fs::copy(from, to)?;

    let metadata = std::fs::metadata(from)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    File::options().write(true).open(to)?.set_times(times)?;
    Ok(())
}
