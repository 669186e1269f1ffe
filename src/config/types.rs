/// Core types shared by the figure shim and the grading harness
use serde::{Deserialize, Serialize};
use std::os::unix::io::RawFd;
use thiserror::Error;

/// Descriptor the figure shim writes framed images to
pub const IMAGE_FD: RawFd = 3;

/// Descriptor the grading report is written to by the current harness
pub const REPORT_FD: RawFd = 5;

/// Destination of the JSON grading report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSink {
    /// Legacy harness: report on standard output
    Stdout,
    /// Current harness: report on a pre-opened descriptor
    Descriptor(RawFd),
}

impl Default for ReportSink {
    fn default() -> Self {
        ReportSink::Descriptor(REPORT_FD)
    }
}

impl ReportSink {
    /// Parse `stdout`, `fd:N` or a bare descriptor number
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("stdout") {
            return Ok(ReportSink::Stdout);
        }

        let number = value.strip_prefix("fd:").unwrap_or(value);
        match number.parse::<RawFd>() {
            Ok(fd) if fd >= 0 => Ok(ReportSink::Descriptor(fd)),
            _ => Err(HarnessError::Config(format!(
                "invalid report sink '{}': expected 'stdout', 'fd:N' or N",
                value
            ))),
        }
    }
}

impl std::fmt::Display for ReportSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportSink::Stdout => write!(f, "stdout"),
            ReportSink::Descriptor(fd) => write!(f, "fd:{}", fd),
        }
    }
}

/// How a single test method ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Success,
    /// An assertion did not hold
    Failure,
    /// The test could not run to completion for another reason
    Error,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Success => write!(f, "success"),
            TestStatus::Failure => write!(f, "failure"),
            TestStatus::Error => write!(f, "error"),
        }
    }
}

/// Output integrity classification for captured child output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputIntegrity {
    #[default]
    Complete,
    TruncatedByLimit,
    ReadError,
}

impl std::fmt::Display for OutputIntegrity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputIntegrity::Complete => write!(f, "complete"),
            OutputIntegrity::TruncatedByLimit => write!(f, "truncated_by_limit"),
            OutputIntegrity::ReadError => write!(f, "read_error"),
        }
    }
}

/// Custom error types for sourcebox
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tests module error: {0}")]
    TestsModule(String),

    #[error("Expected exactly one test case in module '{module}', found {found}")]
    InvalidTests { module: String, found: usize },

    #[error("Descriptor {fd} unavailable: {reason}")]
    Descriptor { fd: RawFd, reason: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl From<nix::errno::Errno> for HarnessError {
    fn from(err: nix::errno::Errno) -> Self {
        HarnessError::Io(std::io::Error::from(err))
    }
}

/// Result type alias for sourcebox operations
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sink_parse() {
        assert_eq!(ReportSink::parse("stdout").unwrap(), ReportSink::Stdout);
        assert_eq!(ReportSink::parse("STDOUT").unwrap(), ReportSink::Stdout);
        assert_eq!(ReportSink::parse("fd:5").unwrap(), ReportSink::Descriptor(5));
        assert_eq!(ReportSink::parse(" 7 ").unwrap(), ReportSink::Descriptor(7));
        assert!(ReportSink::parse("fd:-1").is_err());
        assert!(ReportSink::parse("socket").is_err());
    }

    #[test]
    fn test_report_sink_default_is_descriptor_five() {
        assert_eq!(ReportSink::default(), ReportSink::Descriptor(REPORT_FD));
        assert_eq!(ReportSink::default().to_string(), "fd:5");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", TestStatus::Success), "success");
        assert_eq!(format!("{}", TestStatus::Failure), "failure");
        assert_eq!(format!("{}", TestStatus::Error), "error");
    }

    #[test]
    fn test_output_integrity_display() {
        assert_eq!(format!("{}", OutputIntegrity::Complete), "complete");
        assert_eq!(format!("{}", OutputIntegrity::TruncatedByLimit), "truncated_by_limit");
        assert_eq!(format!("{}", OutputIntegrity::ReadError), "read_error");
    }
}
