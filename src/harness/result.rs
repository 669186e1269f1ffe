/// Result accumulation for one harness run
use crate::config::config::HarnessConfig;
use crate::config::types::TestStatus;
use crate::harness::case::{Capture, TestCase, TestMethod};
use crate::harness::report::{Report, TestOutcome};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::{Duration, Instant};

/// Notice appended by long assertion diffs; it points at a knob students cannot reach
static DIFF_NOTICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n?Diff is \d+ characters long\. Set self\.maxDiff to None to see it\.").unwrap()
});

/// Remove every diff truncation notice from captured output
pub fn strip_diff_notice(output: &str) -> String {
    DIFF_NOTICE.replace_all(output, "").into_owned()
}

/// A test that did not pass, kept alongside the outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub test_id: String,
    pub message: String,
}

/// Collects one `TestOutcome` per executed test method
#[derive(Debug)]
pub struct JsonTestResult {
    buffer: bool,
    descriptions: bool,
    failfast: bool,
    outcomes: Vec<TestOutcome>,
    failures: Vec<Problem>,
    errors: Vec<Problem>,
    tests_run: usize,
    stop_requested: bool,
    started: Option<Instant>,
    elapsed: Duration,
}

impl JsonTestResult {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            buffer: config.buffer,
            descriptions: config.descriptions,
            failfast: config.failfast,
            outcomes: Vec::new(),
            failures: Vec::new(),
            errors: Vec::new(),
            tests_run: 0,
            stop_requested: false,
            started: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn start_test_run(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn start_test(&mut self, case: &dyn TestCase, method: &TestMethod) {
        self.tests_run += 1;
        log::debug!("Running {}", case.test_id(method));
    }

    pub fn add_success(&mut self, case: &dyn TestCase, method: &TestMethod, capture: &Capture) {
        let outcome = self.build_outcome(case, method, capture, None);
        self.outcomes.push(outcome);
    }

    pub fn add_failure(
        &mut self,
        case: &dyn TestCase,
        method: &TestMethod,
        capture: &Capture,
        message: &str,
    ) {
        self.add_problem(TestStatus::Failure, case, method, capture, message);
    }

    pub fn add_error(
        &mut self,
        case: &dyn TestCase,
        method: &TestMethod,
        capture: &Capture,
        message: &str,
    ) {
        self.add_problem(TestStatus::Error, case, method, capture, message);
    }

    fn add_problem(
        &mut self,
        status: TestStatus,
        case: &dyn TestCase,
        method: &TestMethod,
        capture: &Capture,
        message: &str,
    ) {
        let problem = Problem {
            test_id: case.test_id(method),
            message: message.to_string(),
        };
        log::info!("{}: {} ({})", problem.test_id, status, message);

        match status {
            TestStatus::Error => self.errors.push(problem),
            _ => self.failures.push(problem),
        }

        let outcome = self.build_outcome(case, method, capture, Some(message));
        self.outcomes.push(outcome);

        if self.failfast {
            self.stop_requested = true;
        }
    }

    pub fn stop_test_run(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    /// True once failfast saw a failure or error
    pub fn should_stop(&self) -> bool {
        self.stop_requested
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    pub fn tests_run(&self) -> usize {
        self.tests_run
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> &[Problem] {
        &self.failures
    }

    pub fn errors(&self) -> &[Problem] {
        &self.errors
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Final report over every recorded outcome
    pub fn report(&self) -> Report {
        Report::new(self.outcomes.clone(), self.elapsed)
    }

    fn build_outcome(
        &self,
        case: &dyn TestCase,
        method: &TestMethod,
        capture: &Capture,
        problem: Option<&str>,
    ) -> TestOutcome {
        let metadata = method.metadata();
        let success = problem.is_none();

        let name = match method.short_description() {
            Some(description) if self.descriptions => description.to_string(),
            _ => case.test_id(method),
        };

        let output = if self.buffer && !metadata.exclude_output {
            let mut text = capture.combined();
            if let Some(message) = problem {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(message);
                text.push('\n');
            }
            let text = strip_diff_notice(&text);
            (!text.is_empty()).then_some(text)
        } else {
            None
        };

        TestOutcome {
            name,
            score: if success { metadata.weight } else { 0.0 },
            max_score: metadata.weight,
            success,
            hint: metadata.hint.clone(),
            output,
        }
    }
}
