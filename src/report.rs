// media-squeeze/src/report.rs
//! Console output shared by the two binaries.
use crate::core::{ConversionSummary, ConvertConfig, ProcessConfig, RunSummary};
use crate::utils::{format_file_size, format_signed_size};
use std::path::Path;

const WIDE_RULE: usize = 70;
const NARROW_RULE: usize = 60;

fn rule(width: usize) -> String {
    "=".repeat(width)
}

pub fn print_compression_banner(directory: &Path, config: &ProcessConfig) {
    let absolute = std::fs::canonicalize(directory).unwrap_or_else(|_| directory.to_path_buf());

    println!("{}", rule(WIDE_RULE));
    println!("IMAGE COMPRESSION TOOL");
    println!("{}", rule(WIDE_RULE));
    println!("Target directory: {}", absolute.display());
    println!("Max dimensions: {}x{}px", config.max_width, config.max_height);
    println!("JPEG quality: {}%", config.quality);
    println!("{}", rule(WIDE_RULE));
}

pub fn print_compression_summary(summary: &RunSummary, config: &ProcessConfig) {
    println!("\n{}", rule(WIDE_RULE));
    println!("COMPRESSION SUMMARY");
    println!("{}", rule(WIDE_RULE));
    println!("Image files found: {}", summary.files_found);
    println!("Total files processed: {}", summary.processed);
    println!("Skipped (already processed): {}", summary.skipped);
    println!("Failed: {}", summary.failed.len());
    println!(
        "Total original size: {}",
        format_file_size(summary.total_original_size)
    );
    println!(
        "Total compressed size: {}",
        format_file_size(summary.total_compressed_size)
    );
    println!(
        "Total saved: {} ({:.1}%)",
        format_signed_size(summary.total_saved()),
        summary.saved_percent()
    );
    println!("{}", rule(WIDE_RULE));

    for (path, cause) in &summary.failed {
        println!("  ✗ {}: {}", path.display(), cause);
    }

    if config.backup && summary.backups_created > 0 {
        println!(
            "\nBackup files created with {} extension",
            config.backup_suffix
        );
        println!("You can delete them after verifying the compressed images look good.");
    }
}

pub fn print_conversion_banner(base: &Path, config: &ConvertConfig, native_helper: bool) {
    println!("{}", rule(NARROW_RULE));
    println!("Image Converter: Converting all images to JPG format");
    println!("{}", rule(NARROW_RULE));
    println!("Base directory: {}", base.display());
    println!("Directory prefix: {}", config.dir_prefix);
    println!(
        "Native HEIC helper: {}",
        if native_helper { "sips" } else { "not available" }
    );
    println!(
        "In-process HEIC decoder: {}",
        if cfg!(feature = "heif") {
            "libheif"
        } else {
            "not built (enable the `heif` feature)"
        }
    );
}

pub fn print_conversion_summary(summary: &ConversionSummary) {
    println!("\n{}", rule(NARROW_RULE));
    println!("Conversion Summary:");
    println!("{}", rule(NARROW_RULE));

    for directory in &summary.directories {
        println!("\n{}:", directory.name);
        for path in &directory.converted {
            println!("  + {}", display_name(path));
        }
        for path in &directory.already_present {
            println!("  - {} (already existed)", display_name(path));
        }
        for (path, cause) in &directory.failed {
            println!("  ✗ {}: {}", display_name(path), cause);
        }
    }

    println!(
        "\nConverted {} images, {} already present, {} failed. {} images ready.",
        summary.converted_count(),
        summary.already_present_count(),
        summary.failed_count(),
        summary.ready_count()
    );
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
