/// Test-case contract consumed by the harness
///
/// A test case is a named type defined in a module and exposing an ordered
/// list of named test methods. Suites are registered explicitly instead of
/// being discovered by importing code at runtime.
use crate::config::types::TestStatus;
use crate::harness::metadata::TestMetadata;
use crate::harness::panic::{self, CaughtPanic};

/// Why a test did not pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestError {
    /// An assertion did not hold
    Failure(String),
    /// Anything else went wrong
    Error(String),
}

impl TestError {
    pub fn failure(message: impl Into<String>) -> Self {
        TestError::Failure(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        TestError::Error(message.into())
    }

    pub fn status(&self) -> TestStatus {
        match self {
            TestError::Failure(_) => TestStatus::Failure,
            TestError::Error(_) => TestStatus::Error,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TestError::Failure(message) | TestError::Error(message) => message,
        }
    }
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TestError {}

pub type TestResult = std::result::Result<(), TestError>;

/// Per-test output buffers
#[derive(Debug, Default, Clone)]
pub struct Capture {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(&mut self) -> &mut Vec<u8> {
        &mut self.stdout
    }

    pub fn stderr(&mut self) -> &mut Vec<u8> {
        &mut self.stderr
    }

    pub fn stdout_bytes(&self) -> &[u8] {
        &self.stdout
    }

    pub fn stderr_bytes(&self) -> &[u8] {
        &self.stderr
    }

    /// Stdout followed by stderr, separated by a newline when needed
    pub fn combined(&self) -> String {
        let mut output = String::from_utf8_lossy(&self.stdout).into_owned();
        if !self.stderr.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&String::from_utf8_lossy(&self.stderr));
        }
        output
    }
}

type TestBody = Box<dyn Fn(&mut Capture) -> TestResult>;

/// One named test method with its metadata
pub struct TestMethod {
    name: String,
    description: Option<String>,
    metadata: TestMetadata,
    body: TestBody,
}

impl TestMethod {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Capture) -> TestResult + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            metadata: TestMetadata::default(),
            body: Box::new(body),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: TestMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.metadata.weight = weight;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.metadata.hint = Some(hint.into());
        self
    }

    pub fn exclude_output(mut self) -> Self {
        self.metadata.exclude_output = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &TestMetadata {
        &self.metadata
    }

    /// First non-blank line of the description
    pub fn short_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .and_then(|d| d.lines().map(str::trim).find(|line| !line.is_empty()))
    }

    /// Run the body, turning panics into failures or errors
    pub fn run(&self, capture: &mut Capture) -> TestResult {
        match panic::catch(|| (self.body)(capture)) {
            Ok(result) => result,
            Err(CaughtPanic::Assertion(message)) => Err(TestError::Failure(message)),
            Err(CaughtPanic::Other(message)) => Err(TestError::Error(message)),
        }
    }
}

impl std::fmt::Debug for TestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestMethod")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// A test-case type exposing an ordered set of named test methods
pub trait TestCase {
    /// Type name
    fn name(&self) -> &str;

    /// Module the case is defined in
    fn module(&self) -> &str;

    /// Test methods in execution order
    fn methods(&self) -> &[TestMethod];

    /// Identifier of one method, e.g. `test_add (tests.CalculatorTests)`
    fn test_id(&self, method: &TestMethod) -> String {
        format!("{} ({}.{})", method.name(), self.module(), self.name())
    }
}

/// In-process test case built by registration
pub struct Suite {
    name: String,
    module: String,
    methods: Vec<TestMethod>,
}

impl Suite {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            methods: Vec::new(),
        }
    }

    pub fn test(mut self, method: TestMethod) -> Self {
        self.methods.push(method);
        self
    }
}

impl TestCase for Suite {
    fn name(&self) -> &str {
        &self.name
    }

    fn module(&self) -> &str {
        &self.module
    }

    fn methods(&self) -> &[TestMethod] {
        &self.methods
    }
}
