/// Bounded collection of child stdout/stderr for command tests
use crate::config::config::OutputLimits;
use crate::config::types::OutputIntegrity;
use std::io::{BufReader, Read};
use std::process::{ChildStderr, ChildStdout};
use std::thread;

/// Output collection result
#[derive(Debug, Clone, Default)]
pub struct OutputResult {
    /// Collected stdout
    pub stdout: Vec<u8>,
    /// Collected stderr
    pub stderr: Vec<u8>,
    /// Stdout integrity state
    pub stdout_integrity: OutputIntegrity,
    /// Stderr integrity state
    pub stderr_integrity: OutputIntegrity,
}

impl OutputResult {
    /// Worst integrity over both streams
    pub fn combined_integrity(&self) -> OutputIntegrity {
        match (self.stdout_integrity, self.stderr_integrity) {
            (OutputIntegrity::ReadError, _) | (_, OutputIntegrity::ReadError) => {
                OutputIntegrity::ReadError
            }
            (OutputIntegrity::TruncatedByLimit, _) | (_, OutputIntegrity::TruncatedByLimit) => {
                OutputIntegrity::TruncatedByLimit
            }
            _ => OutputIntegrity::Complete,
        }
    }
}

/// Output collector with bounded collection
pub struct OutputCollector {
    limits: OutputLimits,
}

impl OutputCollector {
    pub fn new(limits: OutputLimits) -> Self {
        OutputCollector { limits }
    }

    /// Drain both pipes concurrently so neither can block the child
    pub fn collect(&self, stdout: Option<ChildStdout>, stderr: Option<ChildStderr>) -> OutputResult {
        let stdout_limit = self.limits.stdout_limit;
        let stderr_limit = self.limits.stderr_limit;

        let stdout_handle =
            stdout.map(|stream| thread::spawn(move || collect_stream(stream, stdout_limit)));
        let stderr_handle =
            stderr.map(|stream| thread::spawn(move || collect_stream(stream, stderr_limit)));

        let (stdout, stdout_integrity) = join_collector(stdout_handle);
        let (stderr, stderr_integrity) = join_collector(stderr_handle);

        OutputResult {
            stdout,
            stderr,
            stdout_integrity,
            stderr_integrity,
        }
    }
}

fn join_collector(
    handle: Option<thread::JoinHandle<(Vec<u8>, OutputIntegrity)>>,
) -> (Vec<u8>, OutputIntegrity) {
    match handle {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| (Vec::new(), OutputIntegrity::ReadError)),
        None => (Vec::new(), OutputIntegrity::Complete),
    }
}

/// Collect from a single stream with limit
///
/// Bytes past the limit are read and discarded until EOF so the child
/// never writes into a closed pipe.
fn collect_stream<R: Read>(stream: R, limit: usize) -> (Vec<u8>, OutputIntegrity) {
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut integrity = OutputIntegrity::Complete;

    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return (buffer, integrity),
            Ok(n) => {
                let remaining = limit.saturating_sub(buffer.len());
                if n > remaining {
                    buffer.extend_from_slice(&chunk[..remaining]);
                    integrity = OutputIntegrity::TruncatedByLimit;
                } else {
                    buffer.extend_from_slice(&chunk[..n]);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("Failed to read child output: {}", e);
                return (buffer, OutputIntegrity::ReadError);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    #[test]
    fn test_collect_without_streams() {
        let collector = OutputCollector::new(OutputLimits::default());
        let result = collector.collect(None, None);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.is_empty());
        assert_eq!(result.combined_integrity(), OutputIntegrity::Complete);
    }

    #[test]
    fn test_collect_stream_truncates_at_limit() {
        let data = vec![b'x'; 10_000];
        let (collected, integrity) = collect_stream(&data[..], 100);
        assert_eq!(collected.len(), 100);
        assert_eq!(integrity, OutputIntegrity::TruncatedByLimit);
    }

    #[test]
    fn test_collect_child_output() {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg("echo out; echo err >&2")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        let collector = OutputCollector::new(OutputLimits::default());
        let result = collector.collect(child.stdout.take(), child.stderr.take());
        child.wait().unwrap();

        assert_eq!(result.stdout, b"out\n");
        assert_eq!(result.stderr, b"err\n");
        assert_eq!(result.combined_integrity(), OutputIntegrity::Complete);
    }

    #[test]
    fn test_truncation_drains_child_to_exit() {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg("i=0; while [ $i -lt 5000 ]; do echo line; i=$((i+1)); done; exit 0")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        let limits = OutputLimits {
            stdout_limit: 16,
            stderr_limit: 16,
        };
        let result = OutputCollector::new(limits).collect(child.stdout.take(), child.stderr.take());
        let status = child.wait().unwrap();

        assert!(status.success(), "child died: {:?}", status);
        assert_eq!(result.stdout, b"line\nline\nline\nl");
        assert_eq!(result.stdout_integrity, OutputIntegrity::TruncatedByLimit);
        assert_eq!(result.stderr_integrity, OutputIntegrity::Complete);
    }
}
