/// Per-test declarative metadata: weight, hint, and output exclusion
use serde::{Deserialize, Serialize};

/// Weight of a test that declares none
pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestMetadata {
    /// Maximum score contribution
    pub weight: f64,
    /// Shown to the student alongside the outcome
    pub hint: Option<String>,
    /// Never attach captured output to the outcome
    pub exclude_output: bool,
}

impl Default for TestMetadata {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            hint: None,
            exclude_output: false,
        }
    }
}

impl TestMetadata {
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_excluded_output(mut self) -> Self {
        self.exclude_output = true;
        self
    }

    /// Weights must be finite and non-negative
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(format!("weight must be a finite number >= 0, got {}", self.weight));
        }
        Ok(())
    }
}
