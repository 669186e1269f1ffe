/// Sequential test runner that emits the JSON report
use crate::config::config::HarnessConfig;
use crate::config::types::{ReportSink, Result};
use crate::harness::case::{Capture, TestCase, TestError};
use crate::harness::report::Report;
use crate::harness::result::JsonTestResult;
use crate::utils::fd::open_for_writing;
use std::io::Write;

pub struct JsonTestRunner {
    config: HarnessConfig,
}

impl JsonTestRunner {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Run every method of `case` in declared order
    pub fn execute(&self, case: &dyn TestCase) -> JsonTestResult {
        let mut result = JsonTestResult::new(&self.config);
        result.start_test_run();

        for method in case.methods() {
            if result.should_stop() {
                log::info!(
                    "Stopping after first problem, {} tests skipped",
                    case.methods().len() - result.tests_run()
                );
                break;
            }

            result.start_test(case, method);
            let mut capture = Capture::new();
            let outcome = method.run(&mut capture);

            if !self.config.buffer {
                forward(&capture);
            }

            match outcome {
                Ok(()) => result.add_success(case, method, &capture),
                Err(TestError::Failure(message)) => {
                    result.add_failure(case, method, &capture, &message)
                }
                Err(TestError::Error(message)) => result.add_error(case, method, &capture, &message),
            }
        }

        result.stop_test_run();
        if result.was_successful() {
            log::info!(
                "Ran {} tests in {:.2}s, all passed",
                result.tests_run(),
                result.elapsed().as_secs_f64()
            );
        } else {
            log::info!(
                "Ran {} tests in {:.2}s ({} failures, {} errors)",
                result.tests_run(),
                result.elapsed().as_secs_f64(),
                result.failures().len(),
                result.errors().len()
            );
        }
        result
    }

    /// Execute `case` and write the report to the configured sink
    pub fn run(&self, case: &dyn TestCase) -> Result<Report> {
        let report = self.execute(case).report();
        self.emit(&report)?;
        Ok(report)
    }

    fn emit(&self, report: &Report) -> Result<()> {
        log::debug!("Writing report to {}", self.config.report_sink);
        match self.config.report_sink {
            ReportSink::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                report.write_to(&mut handle)
            }
            ReportSink::Descriptor(fd) => {
                let mut file = open_for_writing(fd)?;
                report.write_to(&mut file)
            }
        }
    }
}

/// Unbuffered runs pass test output straight through
fn forward(capture: &Capture) {
    if let Err(e) = std::io::stdout().write_all(capture.stdout_bytes()) {
        log::warn!("Failed to forward test stdout: {}", e);
    }
    if let Err(e) = std::io::stderr().write_all(capture.stderr_bytes()) {
        log::warn!("Failed to forward test stderr: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::case::{Suite, TestMethod};
    use nix::unistd::pipe;
    use std::io::Read;
    use std::os::unix::io::AsRawFd;

    fn calculator() -> Suite {
        Suite::new("tests", "CalculatorTests")
            .test(TestMethod::new("test_add", |_| {
                assert_eq!(1 + 1, 2);
                Ok(())
            }))
            .test(
                TestMethod::new("test_sub", |out| {
                    writeln!(out.stdout(), "subtracting").map_err(|e| TestError::error(e.to_string()))?;
                    assert_eq!(3 - 1, 1);
                    Ok(())
                })
                .weight(2.0),
            )
    }

    #[test]
    fn test_two_method_example() {
        let runner = JsonTestRunner::new(&HarnessConfig::default());
        let report = runner.execute(&calculator()).report();

        assert_eq!(report.tests.len(), 2);
        assert_eq!(report.score, 1.0);
        assert_eq!(report.max_score, 3.0);
        assert!(report.tests[0].success);
        assert!(!report.tests[1].success);

        let output = report.tests[1].output.as_deref().unwrap();
        assert!(output.starts_with("subtracting\n"));
        assert!(output.contains("assertion"));
    }

    #[test]
    fn test_error_does_not_abort_run() {
        let suite = Suite::new("tests", "Broken")
            .test(TestMethod::new("test_io", |_| Err(TestError::error("disk gone"))))
            .test(TestMethod::new("test_ok", |_| Ok(())));

        let result = JsonTestRunner::new(&HarnessConfig::default()).execute(&suite);
        assert_eq!(result.tests_run(), 2);
        assert_eq!(result.errors().len(), 1);
        assert!(result.outcomes()[1].success);
        assert!(!result.was_successful());
    }

    #[test]
    fn test_unbuffered_run_still_scores() {
        let config = HarnessConfig {
            buffer: false,
            ..HarnessConfig::default()
        };
        let suite = Suite::new("tests", "Quiet").test(TestMethod::new("test_ok", |out| {
            out.stdout().extend_from_slice(b"passed through\n");
            Ok(())
        }));

        let result = JsonTestRunner::new(&config).execute(&suite);
        assert!(result.was_successful());
        assert_eq!(result.outcomes()[0].score, 1.0);
        assert!(result.outcomes()[0].output.is_none());
    }

    #[test]
    fn test_failfast_skips_remaining() {
        let config = HarnessConfig {
            failfast: true,
            ..HarnessConfig::default()
        };
        let suite = Suite::new("tests", "Strict")
            .test(TestMethod::new("test_a", |_| Err(TestError::failure("no"))))
            .test(TestMethod::new("test_b", |_| Ok(())));

        let result = JsonTestRunner::new(&config).execute(&suite);
        assert_eq!(result.tests_run(), 1);
        assert_eq!(result.outcomes().len(), 1);
    }

    #[test]
    fn test_report_written_to_descriptor() {
        let (read_end, write_end) = pipe().unwrap();
        let config = HarnessConfig {
            report_sink: ReportSink::Descriptor(write_end.as_raw_fd()),
            ..HarnessConfig::default()
        };

        let report = JsonTestRunner::new(&config).run(&calculator()).unwrap();
        drop(write_end);

        let mut written = String::new();
        std::fs::File::from(read_end).read_to_string(&mut written).unwrap();
        assert_eq!(written, report.to_json().unwrap());
        assert!(written.ends_with("}\n"));
    }

    #[test]
    fn test_closed_sink_is_an_error() {
        let config = HarnessConfig {
            report_sink: ReportSink::Descriptor(9999),
            ..HarnessConfig::default()
        };
        assert!(JsonTestRunner::new(&config).run(&calculator()).is_err());
    }
}
