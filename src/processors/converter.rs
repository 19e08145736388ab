// media-squeeze/src/processors/converter.rs
//! JPEG conversion with an optional native fast path.
//!
//! HEIC/HEIF sources are first offered to a platform helper (`sips` on
//! macOS). Whatever the helper does, a missing binary, a non-zero exit, a
//! timeout, an empty output file or a failure to stage the helper's output
//! just sends the file down the library path.
use super::compressor::{persist_over, sibling_temp_file, Compressor};
use super::loader::{is_heif_path, Loader};
use super::normalizer::normalize_color_mode;
use crate::core::{ConvertConfig, OutputFormat, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperOutcome {
    Converted,
    Unavailable,
    Failed(String),
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMethod {
    Native,
    Library,
}

/// An external program able to turn an image into a JPEG.
pub trait NativeHelper {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    fn convert(&self, input: &Path, output: &Path, quality: u8, timeout: Duration)
        -> HelperOutcome;
}

/// macOS `sips`, or any program taking the same arguments.
#[derive(Debug, Clone)]
pub struct SipsHelper {
    program: PathBuf,
}

impl SipsHelper {
    /// Looks for `sips` on `PATH`.
    pub fn detect() -> Option<Self> {
        find_in_path("sips").map(|program| Self { program })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl NativeHelper for SipsHelper {
    fn name(&self) -> &str {
        "sips"
    }

    fn is_available(&self) -> bool {
        self.program.is_file()
    }

    fn convert(
        &self,
        input: &Path,
        output: &Path,
        quality: u8,
        timeout: Duration,
    ) -> HelperOutcome {
        let mut command = Command::new(&self.program);
        command
            .arg("-s")
            .arg("format")
            .arg("jpeg")
            .arg("-s")
            .arg("formatOptions")
            .arg(quality.to_string())
            .arg(input)
            .arg("--out")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        run_with_timeout(&mut command, timeout)
    }
}

/// Spawns `command` and waits at most `timeout` for it. A process still
/// running at the deadline is killed and reaped.
pub fn run_with_timeout(command: &mut Command, timeout: Duration) -> HelperOutcome {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HelperOutcome::Unavailable,
        Err(e) => return HelperOutcome::Failed(format!("spawn failed: {}", e)),
    };

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => return HelperOutcome::Converted,
            Ok(Some(status)) => return HelperOutcome::Failed(format!("exited with {}", status)),
            Ok(None) if Instant::now() >= deadline => {
                if let Err(e) = child.kill() {
                    log::warn!("Failed to kill timed out helper: {}", e);
                }
                let _ = child.wait();
                return HelperOutcome::TimedOut;
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => return HelperOutcome::Failed(format!("wait failed: {}", e)),
        }
    }
}

pub struct Converter {
    config: ConvertConfig,
    loader: Loader,
    compressor: Compressor,
    helper: Option<Box<dyn NativeHelper>>,
}

impl Converter {
    /// Uses `sips` when enabled in `config` and present on `PATH`.
    pub fn new(config: ConvertConfig) -> Self {
        let helper = if config.native_helper {
            SipsHelper::detect().map(|h| Box::new(h) as Box<dyn NativeHelper>)
        } else {
            None
        };
        Self::with_helper(config, helper)
    }

    pub fn with_helper(config: ConvertConfig, helper: Option<Box<dyn NativeHelper>>) -> Self {
        let compressor = Compressor::new(config.quality);
        Self {
            config,
            loader: Loader::new(),
            compressor,
            helper,
        }
    }

    pub fn has_native_helper(&self) -> bool {
        self.helper.as_ref().map(|h| h.is_available()).unwrap_or(false)
    }

    /// Converts `input` into the JPEG at `output`, preferring the native
    /// helper for HEIC/HEIF sources.
    pub fn convert_to_jpg(&self, input: &Path, output: &Path) -> Result<ConversionMethod> {
        if is_heif_path(input) {
            match self.try_native(input, output) {
                Ok(HelperOutcome::Converted) => return Ok(ConversionMethod::Native),
                Ok(HelperOutcome::Unavailable) => {
                    log::debug!("No native helper, decoding {} in process", input.display());
                }
                Err(e) => {
                    log::warn!(
                        "Native conversion of {} could not be staged ({}), falling back",
                        input.display(),
                        e
                    );
                }
                Ok(outcome) => {
                    log::warn!(
                        "Native conversion of {} did not succeed ({:?}), falling back",
                        input.display(),
                        outcome
                    );
                }
            }
        }

        self.convert_with_library(input, output)?;
        Ok(ConversionMethod::Library)
    }

    /// Runs the helper into a temporary file beside `output` and only moves
    /// it into place when the helper exits cleanly and left a non-empty file.
    pub fn try_native(&self, input: &Path, output: &Path) -> Result<HelperOutcome> {
        let helper = match &self.helper {
            Some(helper) if helper.is_available() => helper,
            _ => return Ok(HelperOutcome::Unavailable),
        };

        let tmp = sibling_temp_file(output, ".jpg")?;

        log::debug!("Running {} on {}", helper.name(), input.display());
        let outcome = helper.convert(
            input,
            tmp.path(),
            self.config.quality,
            self.config.helper_timeout,
        );

        if outcome != HelperOutcome::Converted {
            return Ok(outcome);
        }

        let written = std::fs::metadata(tmp.path()).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Ok(HelperOutcome::Failed("helper produced no output".to_string()));
        }

        persist_over(tmp, output)?;
        Ok(HelperOutcome::Converted)
    }

    /// Decodes with the image library and writes a JPEG.
    pub fn convert_with_library(&self, input: &Path, output: &Path) -> Result<()> {
        let image = self.loader.load(input)?;
        let image = normalize_color_mode(image, self.config.background);
        self.compressor
            .save_with_format(&image, output, OutputFormat::Jpeg)
    }
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
