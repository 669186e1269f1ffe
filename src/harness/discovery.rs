/// Test module and single-case discovery
use crate::config::types::{HarnessError, Result};
use crate::harness::case::TestCase;

/// Name of the module the harness looks for in a project
pub const TESTS_MODULE: &str = "tests";

/// A loaded test module and every test case reachable from it
///
/// Cases whose `module()` differs from the module name were imported from
/// elsewhere and do not count as defined here.
pub struct TestsModule {
    name: String,
    cases: Vec<Box<dyn TestCase>>,
}

impl TestsModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    pub fn register(&mut self, case: Box<dyn TestCase>) -> &mut Self {
        self.cases.push(case);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cases defined directly in this module, in registration order
    pub fn defined_cases(&self) -> Vec<&dyn TestCase> {
        self.cases
            .iter()
            .map(|case| case.as_ref())
            .filter(|case| case.module() == self.name)
            .collect()
    }

    /// The one supported test case; zero or several is `InvalidTests`
    pub fn single_case(&self) -> Result<&dyn TestCase> {
        let defined = self.defined_cases();
        match defined.as_slice() {
            [case] => Ok(*case),
            _ => {
                log::debug!(
                    "Module {} defines {} test cases: {:?}",
                    self.name,
                    defined.len(),
                    defined.iter().map(|c| c.name()).collect::<Vec<_>>()
                );
                Err(HarnessError::InvalidTests {
                    module: self.name.clone(),
                    found: defined.len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::case::{Suite, TestMethod};

    fn suite(module: &str, name: &str) -> Box<dyn TestCase> {
        Box::new(Suite::new(module, name).test(TestMethod::new("test_ok", |_| Ok(()))))
    }

    #[test]
    fn test_single_case_found() {
        let mut module = TestsModule::new(TESTS_MODULE);
        module.register(suite("tests", "CalculatorTests"));
        assert_eq!(module.single_case().unwrap().name(), "CalculatorTests");
    }

    #[test]
    fn test_imported_cases_ignored() {
        let mut module = TestsModule::new(TESTS_MODULE);
        module
            .register(suite("helpers", "BaseTests"))
            .register(suite("tests", "CalculatorTests"));
        assert_eq!(module.defined_cases().len(), 1);
        assert_eq!(module.single_case().unwrap().name(), "CalculatorTests");
    }

    #[test]
    fn test_zero_or_many_cases_rejected() {
        let empty = TestsModule::new(TESTS_MODULE);
        assert!(matches!(
            empty.single_case(),
            Err(HarnessError::InvalidTests { found: 0, .. })
        ));

        let mut many = TestsModule::new(TESTS_MODULE);
        many.register(suite("tests", "A")).register(suite("tests", "B"));
        assert!(matches!(
            many.single_case(),
            Err(HarnessError::InvalidTests { found: 2, .. })
        ));
    }
}
