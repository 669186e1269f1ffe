use crate::config::types::{HarnessError, ReportSink, Result, IMAGE_FD};
/// Configuration loading from an optional JSON file and the environment
use serde::{Deserialize, Serialize};
use std::os::unix::io::RawFd;
use std::path::Path;

/// Environment variable naming an optional JSON configuration file
pub const CONFIG_ENV: &str = "SOURCEBOX_CONFIG";
/// Environment override for the report sink (`stdout`, `fd:N` or `N`)
pub const REPORT_SINK_ENV: &str = "SOURCEBOX_REPORT_SINK";
/// Environment override for the image descriptor
pub const IMAGE_FD_ENV: &str = "SOURCEBOX_IMAGE_FD";

/// Limits for captured child output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLimits {
    /// Per-stream stdout limit (bytes)
    pub stdout_limit: usize,
    /// Per-stream stderr limit (bytes)
    pub stderr_limit: usize,
}

impl Default for OutputLimits {
    fn default() -> Self {
        OutputLimits {
            stdout_limit: 8 * 1024 * 1024, // 8 MB stdout
            stderr_limit: 2 * 1024 * 1024, // 2 MB stderr
        }
    }
}

/// Grading harness settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Where the JSON report goes
    pub report_sink: ReportSink,
    /// Capture stdout/stderr per test and include it in outcomes
    pub buffer: bool,
    /// Prefer the first description line over the test identifier as outcome name
    pub descriptions: bool,
    /// Stop after the first failure or error
    pub failfast: bool,
    /// Bounds for command test output
    pub output_limits: OutputLimits,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            report_sink: ReportSink::default(),
            buffer: true,
            descriptions: true,
            failfast: false,
            output_limits: OutputLimits::default(),
        }
    }
}

/// Figure shim settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Descriptor framed images are written to
    pub image_fd: RawFd,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            image_fd: IMAGE_FD,
            jpeg_quality: 95,
        }
    }
}

/// Full configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceboxConfig {
    pub harness: HarnessConfig,
    pub figure: FigureConfig,
}

impl SourceboxConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: SourceboxConfig = serde_json::from_str(&content)
            .map_err(|e| HarnessError::Config(format!("Failed to parse config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the file named by `SOURCEBOX_CONFIG`, then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::debug!("Loading configuration from {:?}", path);
                Self::load_from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(sink) = lookup(REPORT_SINK_ENV) {
            self.harness.report_sink = ReportSink::parse(&sink)?;
            log::debug!("Report sink overridden to {}", self.harness.report_sink);
        }

        if let Some(fd) = lookup(IMAGE_FD_ENV) {
            self.figure.image_fd = fd.trim().parse::<RawFd>().map_err(|e| {
                HarnessError::Config(format!("invalid {} '{}': {}", IMAGE_FD_ENV, fd, e))
            })?;
        }

        self.validate()
    }

    /// Reject values the harness or the shim cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.figure.jpeg_quality) {
            return Err(HarnessError::Config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.figure.jpeg_quality
            )));
        }
        if self.figure.image_fd < 0 {
            return Err(HarnessError::Config(format!(
                "image_fd must not be negative, got {}",
                self.figure.image_fd
            )));
        }
        if let ReportSink::Descriptor(fd) = self.harness.report_sink {
            if fd < 0 {
                return Err(HarnessError::Config(format!(
                    "report descriptor must not be negative, got {}",
                    fd
                )));
            }
        }
        Ok(())
    }
}
