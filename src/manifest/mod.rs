//! Project test manifests.
//!
//! A project declares its `tests` module as `tests.json`: test case types,
//! each with command-backed test methods and their metadata.

pub mod command;
pub mod loader;

pub use command::CommandTest;
pub use loader::{load_tests_module, Manifest, ManifestCase, MANIFEST_FILE};
