//! CLI command implementations for dmanalyzer.
//!
//! This module provides implementations for all CLI commands:
//! - `analyze`: Snapshot directory to chart (the default run)
//! - `inspect`: Single snapshot parsing
//! - `config`: Configuration file generation

pub mod analyze;
pub mod config;
pub mod inspect;

// Re-export command functions
pub use analyze::command_analyze;
pub use config::command_config;
pub use inspect::command_inspect;
