use clap::Parser;
use log::LevelFilter;
use media_squeeze::{report, usage_exit_status, ConversionBatch, ConvertCli};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = ConvertCli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let config = cli.to_config();
    let batch = ConversionBatch::new(config.clone())?;

    report::print_conversion_banner(&cli.base_dir, &config, batch.converter().has_native_helper());

    let summary = match batch.process_base_directory(&cli.base_dir) {
        Ok(summary) => summary,
        Err(e) => {
            let Some(code) = usage_exit_status(&e) else {
                return Err(e.into());
            };
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(code));
        }
    };

    report::print_conversion_summary(&summary);
    println!("\n✅ Conversion complete!");

    Ok(ExitCode::SUCCESS)
}
