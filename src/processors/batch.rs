// media-squeeze/src/processors/batch.rs
use super::converter::Converter;
use crate::core::{
    ConversionSummary, ConvertConfig, DirectoryConversion, ImageProcessor, MediaError,
    ProcessConfig, Result, RunSummary, COMPRESS_EXTENSIONS, CONVERT_EXTENSIONS,
};
use crate::utils::{
    backup_path_for, copy_with_times, format_file_size, format_signed_size, has_extension,
    is_jpeg_path, jpg_counterpart,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively recompresses every image under a directory, in place.
pub struct BatchProcessor {
    processor: ImageProcessor,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(config: ProcessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            processor: ImageProcessor::new(config),
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn config(&self) -> &ProcessConfig {
        self.processor.config()
    }

    pub fn process_directory(&self, directory: &Path) -> Result<RunSummary> {
        self.validate_directory(directory)?;

        let image_paths = self.collect_image_paths(directory);
        let mut summary = RunSummary {
            files_found: image_paths.len(),
            ..Default::default()
        };

        if image_paths.is_empty() {
            log::warn!("No image files found in {}", directory.display());
            return Ok(summary);
        }

        log::info!(
            "Found {} image files in {}",
            image_paths.len(),
            directory.display()
        );

        let pb = self.create_progress_bar(image_paths.len());

        for (index, path) in image_paths.iter().enumerate() {
            pb.inc(1);
            let relative = path.strip_prefix(directory).unwrap_or(path.as_path());

            if self.is_already_processed(path) {
                log::debug!("Skipping already processed {}", path.display());
                summary.skipped += 1;
                continue;
            }

            pb.suspend(|| {
                println!(
                    "\n[{}/{}] Processing: {}",
                    index + 1,
                    image_paths.len(),
                    relative.display()
                )
            });

            if self.config().backup {
                match self.ensure_backup(path) {
                    Ok(Some(backup)) => {
                        summary.backups_created += 1;
                        pb.suspend(|| println!("  Backup created: {}", file_name(&backup)));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // never overwrite an original we could not back up
                        log::error!("Backup of {} failed: {}", path.display(), e);
                        pb.suspend(|| println!("  Failed: backup could not be created"));
                        summary.record_failure(path, e.to_string());
                        continue;
                    }
                }
            }

            match self.processor.process(path, path) {
                Ok(result) => {
                    pb.suspend(|| {
                        println!("  Original: {}", format_file_size(result.original_size));
                        println!("  Compressed: {}", format_file_size(result.compressed_size));
                        println!(
                            "  Saved: {} ({:.1}%)",
                            format_signed_size(result.saved_bytes),
                            result.saved_percent
                        );
                    });
                    summary.record(&result);
                }
                Err(e) => {
                    log::error!("Error compressing {}: {}", path.display(), e);
                    pb.suspend(|| println!("  Failed to compress"));
                    summary.record_failure(path, e.to_string());
                }
            }
        }

        pb.finish_with_message(format!(
            "Processed {} images ({:.1}% size reduction)",
            summary.processed,
            summary.saved_percent()
        ));

        Ok(summary)
    }

    /// Image files under `directory`, sorted for a stable processing order.
    pub fn collect_image_paths(&self, directory: &Path) -> Vec<PathBuf> {
        WalkDir::new(directory)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| has_extension(entry.path(), COMPRESS_EXTENSIONS))
            .map(|entry| entry.into_path())
            .collect()
    }

    pub fn is_already_processed(&self, path: &Path) -> bool {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem.contains(self.config().processed_marker.as_str()))
            .unwrap_or(false)
    }

    /// Copies the original aside unless a backup already exists. Returns the
    /// backup path when one was created.
    pub fn ensure_backup(&self, path: &Path) -> Result<Option<PathBuf>> {
        let backup = backup_path_for(path, &self.config().backup_suffix);
        if backup.exists() {
            return Ok(None);
        }

        copy_with_times(path, &backup)?;
        log::debug!("Backup created: {}", backup.display());
        Ok(Some(backup))
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    pub fn validate_directory(&self, directory: &Path) -> Result<()> {
        if !directory.is_dir() {
            return Err(MediaError::DirectoryNotFound(directory.to_path_buf()));
        }
        Ok(())
    }
}

/// Converts images in every `<prefix>*` subdirectory of a base directory to
/// JPEG siblings.
pub struct ConversionBatch {
    config: ConvertConfig,
    converter: Converter,
}

impl ConversionBatch {
    pub fn new(config: ConvertConfig) -> Result<Self> {
        config.validate()?;
        let converter = Converter::new(config.clone());
        Ok(Self { config, converter })
    }

    pub fn with_converter(config: ConvertConfig, converter: Converter) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, converter })
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn process_base_directory(&self, base: &Path) -> Result<ConversionSummary> {
        let directories = self.find_event_directories(base)?;

        let mut summary = ConversionSummary::default();
        for directory in directories {
            let result = self.convert_directory(&directory)?;
            if !result.is_empty() {
                summary.directories.push(result);
            }
        }

        Ok(summary)
    }

    /// Subdirectories of `base` whose name starts with the configured prefix,
    /// sorted by name.
    pub fn find_event_directories(&self, base: &Path) -> Result<Vec<PathBuf>> {
        if !base.is_dir() {
            return Err(MediaError::DirectoryNotFound(base.to_path_buf()));
        }

        let mut directories: Vec<PathBuf> = std::fs::read_dir(base)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| name.starts_with(self.config.dir_prefix.as_str()))
                    .unwrap_or(false)
            })
            .map(|entry| entry.path())
            .collect();

        if directories.is_empty() {
            return Err(MediaError::NoMatchingDirectories {
                base: base.to_path_buf(),
                prefix: self.config.dir_prefix.clone(),
            });
        }

        directories.sort();
        Ok(directories)
    }

    /// Non-JPEG images directly inside `directory`.
    pub fn collect_sources(&self, directory: &Path) -> Vec<PathBuf> {
        WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| has_extension(entry.path(), CONVERT_EXTENSIONS))
            .filter(|entry| !is_jpeg_path(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    pub fn convert_directory(&self, directory: &Path) -> Result<DirectoryConversion> {
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| directory.display().to_string());
        let mut result = DirectoryConversion::new(name);

        let sources = self.collect_sources(directory);
        if sources.is_empty() {
            println!("No images to convert in {}", directory.display());
            return Ok(result);
        }

        println!("\nConverting images in {}:", directory.display());
        for source in sources {
            let output = jpg_counterpart(&source);

            if output.exists() {
                println!(
                    "  ✓ {} -> {} (already exists)",
                    file_name(&source),
                    file_name(&output)
                );
                result.already_present.push(output);
                continue;
            }

            match self.converter.convert_to_jpg(&source, &output) {
                Ok(method) => {
                    log::debug!("Converted {} via {:?}", source.display(), method);
                    println!("  Converting {}... ✓ -> {}", file_name(&source), file_name(&output));
                    result.converted.push(output);
                }
                Err(e) => {
                    log::error!("Error converting {}: {}", source.display(), e);
                    println!("  Converting {}... ✗ Failed", file_name(&source));
                    result.failed.push((source, e.to_string()));
                }
            }
        }

        Ok(result)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
