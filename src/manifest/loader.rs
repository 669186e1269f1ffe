/// `tests.json` loading and validation
use crate::config::config::OutputLimits;
use crate::config::types::{HarnessError, Result};
use crate::harness::case::Suite;
use crate::harness::discovery::{TestsModule, TESTS_MODULE};
use crate::manifest::command::CommandTest;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// File that stands for a project's `tests` module
pub const MANIFEST_FILE: &str = "tests.json";

fn default_module() -> String {
    TESTS_MODULE.to_string()
}

/// One test case type declared by the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestCase {
    pub name: String,
    /// Defining module; anything but `tests` marks an imported case
    #[serde(default = "default_module")]
    pub module: String,
    #[serde(default)]
    pub tests: Vec<CommandTest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub cases: Vec<ManifestCase>,
}

impl Manifest {
    /// Read and validate `<project_dir>/tests.json`
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            HarnessError::TestsModule(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)
            .map_err(|e| HarnessError::TestsModule(format!("malformed {}: {}", MANIFEST_FILE, e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        for case in &self.cases {
            if case.name.trim().is_empty() {
                return Err(HarnessError::TestsModule("test case without a name".to_string()));
            }

            let mut seen = HashSet::new();
            for test in &case.tests {
                if test.name.trim().is_empty() {
                    return Err(HarnessError::TestsModule(format!(
                        "test without a name in {}",
                        case.name
                    )));
                }
                if !seen.insert(test.name.as_str()) {
                    return Err(HarnessError::TestsModule(format!(
                        "duplicate test {} in {}",
                        test.name, case.name
                    )));
                }
                if test.command.is_empty() {
                    return Err(HarnessError::TestsModule(format!(
                        "{}.{} has an empty command",
                        case.name, test.name
                    )));
                }
                test.metadata.validate().map_err(|e| {
                    HarnessError::TestsModule(format!("{}.{}: {}", case.name, test.name, e))
                })?;
            }
        }
        Ok(())
    }

    /// Turn every declared case into a runnable suite bound to `project_dir`
    pub fn into_module(self, project_dir: &Path, limits: &OutputLimits) -> TestsModule {
        let mut module = TestsModule::new(TESTS_MODULE);
        for case in self.cases {
            let suite = case
                .tests
                .into_iter()
                .fold(Suite::new(case.module, case.name), |suite, test| {
                    suite.test(test.into_method(project_dir, limits))
                });
            module.register(Box::new(suite));
        }
        module
    }
}

/// Load the `tests` module of a project directory
pub fn load_tests_module(project_dir: &Path, limits: &OutputLimits) -> Result<TestsModule> {
    let manifest = Manifest::load(project_dir)?;
    log::debug!(
        "Loaded {} with {} cases from {}",
        MANIFEST_FILE,
        manifest.cases.len(),
        project_dir.display()
    );
    Ok(manifest.into_module(project_dir, limits))
}
