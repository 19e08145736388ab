#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use image::{GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use media_squeeze::{
        BatchProcessor, ConversionBatch, ConvertConfig, Converter, ImageProcessor, MediaError,
        ProcessConfig,
    };
    use std::fs;
    use std::path::Path;

    fn noisy_rgba(width: u32, height: u32) -> RgbaImage {
        let mut state: u32 = 0x1234_5678;
        RgbaImage::from_fn(width, height, |x, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            // left quarter fully transparent
            let a = if x < width / 4 { 0 } else { 255 };
            Rgba([r, g, b, a])
        })
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn quiet_batch(config: ProcessConfig) -> BatchProcessor {
        BatchProcessor::new(config).unwrap().with_progress(false)
    }

    fn no_helper(config: ConvertConfig) -> ConversionBatch {
        let converter = Converter::with_helper(config.clone(), None);
        ConversionBatch::with_converter(config, converter).unwrap()
    }

    #[test]
    fn test_large_rgba_png_is_bounded_flattened_and_smaller() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("poster.png");
        noisy_rgba(4000, 3000).save(input.path()).unwrap();

        let output = temp_dir.child("poster.jpg");
        let processor = ImageProcessor::new(ProcessConfig::default());
        let result = processor.process(input.path(), output.path()).unwrap();

        let decoded = image::open(output.path()).unwrap();
        let (width, height) = decoded.dimensions();
        assert!(width <= 1920 && height <= 1920);
        assert_eq!((width, height), (1920, 1440));
        assert!(!decoded.color().has_alpha());

        assert!(result.compressed_size < result.original_size);
        assert!(result.saved_percent > 0.0);
        assert_eq!(result.saved_bytes, result.original_size as i64 - result.compressed_size as i64);
    }

    #[test]
    fn test_transparent_regions_become_white() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("badge.png");
        let mut img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        for y in 0..64 {
            for x in 32..64 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        img.save(input.path()).unwrap();

        let output = temp_dir.child("badge.jpg");
        ImageProcessor::new(ProcessConfig::default())
            .process(input.path(), output.path())
            .unwrap();

        let decoded = image::open(output.path()).unwrap();
        assert!(!decoded.color().has_alpha());
        let rgb = decoded.to_rgb8();
        let white = rgb.get_pixel(8, 32).0;
        let black = rgb.get_pixel(56, 32).0;
        assert!(white.iter().all(|&c| c >= 245), "{:?}", white);
        assert!(black.iter().all(|&c| c <= 10), "{:?}", black);
    }

    #[test]
    fn test_second_pass_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.child("photo.jpg");
        gradient(640, 480).save(path.path()).unwrap();

        let processor = ImageProcessor::new(ProcessConfig::default());
        let first = processor.process(path.path(), path.path()).unwrap();
        let second = processor.process(path.path(), path.path()).unwrap();

        assert_eq!(image::open(path.path()).unwrap().dimensions(), (640, 480));
        let drift = (second.compressed_size as f64 - first.compressed_size as f64).abs()
            / first.compressed_size as f64;
        assert!(drift < 0.1, "second pass changed size by {:.1}%", drift * 100.0);
    }

    #[test]
    fn test_batch_backs_up_and_skips_marked_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.child("events/day1");
        nested.create_dir_all().unwrap();

        gradient(3000, 1000).save(nested.child("wide.JPG").path()).unwrap();
        gradient(100, 100).save(temp_dir.child("small.png").path()).unwrap();
        gradient(100, 100).save(temp_dir.child("hero_compressed.jpg").path()).unwrap();
        temp_dir.child("notes.txt").write_str("not an image").unwrap();

        let original = fs::read(nested.child("wide.JPG").path()).unwrap();
        let untouched = fs::read(temp_dir.child("hero_compressed.jpg").path()).unwrap();

        let batch = quiet_batch(ProcessConfig::default());
        let summary = batch.process_directory(temp_dir.path()).unwrap();

        assert_eq!(summary.files_found, 3);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.backups_created, 2);
        assert!(summary.failed.is_empty());

        let backup = nested.child("wide.JPG.backup");
        assert!(backup.path().exists());
        assert_eq!(fs::read(backup.path()).unwrap(), original);
        assert!(temp_dir.child("small.png.backup").path().exists());
        assert!(!temp_dir.child("hero_compressed.jpg.backup").path().exists());
        assert_eq!(
            fs::read(temp_dir.child("hero_compressed.jpg").path()).unwrap(),
            untouched
        );

        let resized = image::open(nested.child("wide.JPG").path()).unwrap();
        assert_eq!(resized.dimensions(), (1920, 640));

        let small = image::open(temp_dir.child("small.png").path()).unwrap();
        assert_eq!(small.dimensions(), (100, 100));

        // a second run must not replace the first backups
        let summary = batch.process_directory(temp_dir.path()).unwrap();
        assert_eq!(summary.backups_created, 0);
        assert_eq!(fs::read(backup.path()).unwrap(), original);
    }

    #[test]
    fn test_broken_file_does_not_abort_batch() {
        let temp_dir = TempDir::new().unwrap();
        temp_dir.child("a_broken.jpg").write_binary(b"definitely not a jpeg").unwrap();
        gradient(50, 50).save(temp_dir.child("b_fine.png").path()).unwrap();

        let config = ProcessConfig {
            backup: false,
            ..Default::default()
        };
        let summary = quiet_batch(config).process_directory(temp_dir.path()).unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("a_broken.jpg"));
        assert_eq!(
            fs::read(temp_dir.child("a_broken.jpg").path()).unwrap(),
            b"definitely not a jpeg"
        );
        assert!(!temp_dir.child("b_fine.png.backup").path().exists());
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nowhere");

        let result = quiet_batch(ProcessConfig::default()).process_directory(&missing);
        assert!(matches!(result, Err(MediaError::DirectoryNotFound(_))));

        let result = no_helper(ConvertConfig::default()).process_base_directory(&missing);
        assert!(matches!(result, Err(MediaError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_heic_converts_through_library_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let event = temp_dir.child("goko-spring");
        event.create_dir_all().unwrap();

        // PNG content behind a HEIC name; the decoder sniffs the real format
        let heic = event.child("IMG_0001.HEIC");
        noisy_rgba(64, 48)
            .save_with_format(heic.path(), ImageFormat::Png)
            .unwrap();
        gradient(20, 20).save(event.child("banner.png").path()).unwrap();
        gradient(20, 20).save(event.child("existing.jpg").path()).unwrap();

        let config = ConvertConfig {
            native_helper: false,
            ..Default::default()
        };
        let summary = ConversionBatch::new(config)
            .unwrap()
            .process_base_directory(temp_dir.path())
            .unwrap();

        assert_eq!(summary.converted_count(), 2);
        assert_eq!(summary.failed_count(), 0);

        let jpg = event.child("IMG_0001.jpg");
        let decoded = image::open(jpg.path()).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert!(!decoded.color().has_alpha());
        assert_eq!(image::guess_format(&fs::read(jpg.path()).unwrap()).unwrap(), ImageFormat::Jpeg);
        assert!(event.child("banner.jpg").path().exists());
    }

    #[test]
    fn test_rerun_converts_nothing() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["goko-a", "goko-b"] {
            let dir = temp_dir.child(name);
            dir.create_dir_all().unwrap();
            gradient(16, 16).save(dir.child("one.png").path()).unwrap();
            gradient(16, 16)
                .save_with_format(dir.child("two.webp").path(), ImageFormat::WebP)
                .unwrap();
        }
        temp_dir.child("other").create_dir_all().unwrap();
        gradient(16, 16).save(temp_dir.child("other/skip.png").path()).unwrap();

        let batch = no_helper(ConvertConfig::default());

        let first = batch.process_base_directory(temp_dir.path()).unwrap();
        assert_eq!(first.converted_count(), 4);
        let names: Vec<_> = first.directories.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["goko-a", "goko-b"]);
        assert!(!temp_dir.child("other/skip.jpg").path().exists());

        let second = batch.process_base_directory(temp_dir.path()).unwrap();
        assert_eq!(second.converted_count(), 0);
        assert_eq!(second.already_present_count(), 4);
        assert_eq!(second.failed_count(), 0);
    }

    #[test]
    fn test_no_matching_directories() {
        let temp_dir = TempDir::new().unwrap();
        temp_dir.child("misc").create_dir_all().unwrap();
        temp_dir.child("goko-file.png").touch().unwrap();

        let result = no_helper(ConvertConfig::default()).process_base_directory(temp_dir.path());
        assert!(matches!(
            result,
            Err(MediaError::NoMatchingDirectories { .. })
        ));
    }

    #[test]
    fn test_invalid_file() {
        let processor = ImageProcessor::new(ProcessConfig::default());
        let result = processor.process(Path::new("nonexistent.jpg"), Path::new("output.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn test_transparent_gif_converts_onto_white() {
        use image::codecs::gif::GifEncoder;
        use image::Frame;

        let temp_dir = TempDir::new().unwrap();
        let event = temp_dir.child("goko-x");
        event.create_dir_all().unwrap();

        // palette source: left half transparent, right half opaque blue
        let img = RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        {
            let file = fs::File::create(event.child("logo.gif").path()).unwrap();
            let mut encoder = GifEncoder::new(file);
            encoder.encode_frame(Frame::new(img)).unwrap();
        }

        let summary = no_helper(ConvertConfig::default())
            .process_base_directory(temp_dir.path())
            .unwrap();
        assert_eq!(summary.converted_count(), 1);

        let rgb = image::open(event.child("logo.jpg").path()).unwrap().to_rgb8();
        let corner = rgb.get_pixel(0, 0).0;
        let opaque = rgb.get_pixel(7, 4).0;
        assert!(corner.iter().all(|&c| c >= 230), "{:?}", corner);
        assert!(opaque[2] >= 200 && opaque[0] <= 60, "{:?}", opaque);
    }

    #[cfg(unix)]
    #[test]
    fn test_written_images_keep_readable_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let mode_of = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        let temp_dir = TempDir::new().unwrap();

        let asset = temp_dir.child("site/asset.jpg");
        temp_dir.child("site").create_dir_all().unwrap();
        gradient(50, 50).save(asset.path()).unwrap();
        fs::set_permissions(asset.path(), fs::Permissions::from_mode(0o644)).unwrap();

        let config = ProcessConfig {
            backup: false,
            ..Default::default()
        };
        let summary = quiet_batch(config)
            .process_directory(temp_dir.child("site").path())
            .unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(mode_of(asset.path()), 0o644);

        let event = temp_dir.child("goko-x");
        event.create_dir_all().unwrap();
        gradient(16, 16).save(event.child("a.png").path()).unwrap();
        let reference = temp_dir.child("reference");
        reference.touch().unwrap();

        no_helper(ConvertConfig::default())
            .process_base_directory(temp_dir.path())
            .unwrap();
        assert_eq!(mode_of(event.child("a.jpg").path()), mode_of(reference.path()));
    }
}
