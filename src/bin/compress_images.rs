use clap::Parser;
use log::LevelFilter;
use media_squeeze::{confirm, report, usage_exit_status, BatchProcessor, CompressCli};
use std::io;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = CompressCli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let config = cli.to_config();
    let batch = BatchProcessor::new(config.clone())?;

    if let Err(e) = batch.validate_directory(&cli.directory) {
        let Some(code) = usage_exit_status(&e) else {
            return Err(e.into());
        };
        eprintln!("Error: Directory not found: {}", cli.directory.display());
        eprintln!("Usage: compress-images [directory]");
        return Ok(ExitCode::from(code));
    }

    report::print_compression_banner(&cli.directory, &config);

    let prompt = "\nThis will compress all images in the directory. Continue? (y/n): ";
    if !cli.yes && !confirm(prompt, io::stdin().lock(), io::stdout())? {
        println!("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let summary = batch.process_directory(&cli.directory)?;
    if summary.files_found == 0 {
        println!("No image files found in {}", cli.directory.display());
        return Ok(ExitCode::SUCCESS);
    }

    report::print_compression_summary(&summary, &config);
    println!("\n✅ Compression complete!");

    Ok(ExitCode::SUCCESS)
}
