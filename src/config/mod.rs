//! Configuration
//!
//! Shared types, the error taxonomy, and configuration loading.

pub mod config;
pub mod types;
