//! Utilities
//!
//! Descriptor access and bounded output collection.

pub mod fd;
pub mod output;
