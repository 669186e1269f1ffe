/// Command-backed test methods
///
/// Each test spawns one command in the project directory with stdin closed
/// and judges it by exit status and, optionally, its exact stdout.
use crate::config::config::OutputLimits;
use crate::config::types::OutputIntegrity;
use crate::harness::case::{Capture, TestError, TestMethod, TestResult};
use crate::harness::metadata::TestMetadata;
use crate::utils::output::OutputCollector;
use serde::{Deserialize, Serialize};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Exit status reported by a test that ran but did not pass
const FAILURE_EXIT_CODE: i32 = 1;

/// One test entry of a manifest case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Program followed by its arguments
    pub command: Vec<String>,
    /// Exact stdout required for a pass
    #[serde(default)]
    pub expect_stdout: Option<String>,
    #[serde(flatten)]
    pub metadata: TestMetadata,
}

impl CommandTest {
    /// Build the runnable method bound to `project_dir`
    pub fn into_method(self, project_dir: &Path, limits: &OutputLimits) -> TestMethod {
        let invocation = Invocation {
            command: self.command,
            expect_stdout: self.expect_stdout,
            working_dir: project_dir.to_path_buf(),
            limits: limits.clone(),
        };

        let method = TestMethod::new(self.name, move |capture| invocation.run(capture))
            .with_metadata(self.metadata);
        match self.description {
            Some(description) => method.with_description(description),
            None => method,
        }
    }
}

struct Invocation {
    command: Vec<String>,
    expect_stdout: Option<String>,
    working_dir: PathBuf,
    limits: OutputLimits,
}

impl Invocation {
    fn run(&self, capture: &mut Capture) -> TestResult {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| TestError::error("empty command"))?;

        let mut child = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TestError::error(format!("failed to spawn '{}': {}", program, e)))?;

        let collector = OutputCollector::new(self.limits.clone());
        let output = collector.collect(child.stdout.take(), child.stderr.take());
        let status = child
            .wait()
            .map_err(|e| TestError::error(format!("failed to wait for '{}': {}", program, e)))?;

        match output.combined_integrity() {
            OutputIntegrity::Complete => {}
            integrity => log::warn!("Output of '{}' is {}", program, integrity),
        }

        capture.stdout().extend_from_slice(&output.stdout);
        capture.stderr().extend_from_slice(&output.stderr);

        judge(status, &output.stdout, self.expect_stdout.as_deref())
    }
}

/// Map exit status and stdout to a test result
fn judge(status: ExitStatus, stdout: &[u8], expected: Option<&str>) -> TestResult {
    match status.code() {
        Some(0) => match expected {
            Some(expected) => {
                let actual = String::from_utf8_lossy(stdout);
                if actual == expected {
                    Ok(())
                } else {
                    Err(TestError::failure(format!("{:?} != {:?}", actual, expected)))
                }
            }
            None => Ok(()),
        },
        Some(FAILURE_EXIT_CODE) => Err(TestError::failure(format!(
            "command exited with status {}",
            FAILURE_EXIT_CODE
        ))),
        Some(code) => Err(TestError::error(format!("command exited with status {}", code))),
        None => Err(TestError::error(format!(
            "command terminated by signal {}",
            status.signal().unwrap_or_default()
        ))),
    }
}
