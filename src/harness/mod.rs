//! Grading harness.
//!
//! Runs the single test case a project defines, accumulates one outcome per
//! test method and writes the JSON report to the configured sink. Test
//! cases come either from in-process registration or from the project's
//! `tests.json` manifest.

pub mod case;
pub mod discovery;
pub mod metadata;
pub mod panic;
pub mod report;
pub mod result;
pub mod runner;

pub use case::{Capture, Suite, TestCase, TestError, TestMethod, TestResult};
pub use discovery::{TestsModule, TESTS_MODULE};
pub use metadata::TestMetadata;
pub use panic::assert_that;
pub use report::{Report, TestOutcome};
pub use result::JsonTestResult;
pub use runner::JsonTestRunner;
