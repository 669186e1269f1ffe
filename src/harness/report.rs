/// Grading report schema
///
/// The key order and the 4-space indentation are what the web client
/// expects on the report channel.
use crate::config::types::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

/// Result of one executed test method
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Description or test identifier
    pub name: String,
    /// `max_score` when passed, else 0
    pub score: f64,
    /// The test's weight
    pub max_score: f64,
    pub success: bool,
    /// Present only when the test declares a hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Captured output, present only when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Aggregate report of one harness invocation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub tests: Vec<TestOutcome>,
    /// Wall-clock seconds with two decimals
    pub execution_time: String,
    pub score: f64,
    pub max_score: f64,
}

impl Report {
    /// Build the report, summing scores over the outcomes
    pub fn new(tests: Vec<TestOutcome>, elapsed: Duration) -> Self {
        let score = tests.iter().map(|t| t.score).sum();
        let max_score = tests.iter().map(|t| t.max_score).sum();
        Self {
            tests,
            execution_time: format_seconds(elapsed),
            score,
            max_score,
        }
    }

    /// Indented JSON followed by a newline
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        buffer.push(b'\n');
        Ok(buffer)
    }

    pub fn to_json(&self) -> Result<String> {
        String::from_utf8(self.to_json_bytes()?).map_err(|e| {
            HarnessError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Write the whole report and flush
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_json_bytes()?)?;
        writer.flush()?;
        Ok(())
    }
}

fn format_seconds(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}
