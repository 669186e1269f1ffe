//! sourcebox: glue that runs inside a sandboxed code-execution environment
//!
//! # Architecture
//!
//! Two independent components share the crate:
//!
//! ## Figure Output ([`figure`])
//! - [`figure::registry`]: Open in-memory figures, ordered by number
//! - [`figure::emitter`]: "Show" replacement sending JPEG figures to descriptor 3
//! - [`figure::frame`]: `STARTIMGAGE`/`ENDIMAGE` framing, writer and streaming decoder
//!
//! ## Grading Harness ([`harness`])
//! - [`harness::case`]: Test-case contract, test methods and output capture
//! - [`harness::discovery`]: The `tests` module and single-case lookup
//! - [`harness::metadata`]: Weight, hint and output exclusion per test
//! - [`harness::result`]: Outcome accumulation
//! - [`harness::runner`]: Sequential execution and report emission
//! - [`harness::report`]: JSON report schema
//!
//! ## Test Manifests ([`manifest`])
//! - [`manifest::loader`]: `tests.json` parsing and validation
//! - [`manifest::command`]: Command-backed test methods
//!
//! ## Configuration ([`config`])
//! - [`config::config`]: Defaults, optional JSON file, environment overrides
//! - [`config::types`]: Shared enums, descriptor constants and `HarnessError`
//!
//! ## Utilities ([`utils`])
//! - [`utils::fd`]: Writable handles on pre-opened descriptors
//! - [`utils::output`]: Bounded output collection

// Figure output
pub mod figure;

// Grading harness
pub mod harness;

// tests.json manifests
pub mod manifest;

// Configuration
pub mod config;

// Utilities
pub mod utils;

// CLI entrypoint wiring shared by the tester and sb-show binaries.
pub mod cli;

// Re-export commonly used types for convenience
pub use config::types::*;
