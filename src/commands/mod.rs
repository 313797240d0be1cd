//! CLI command implementations for herakles-proc-inspector.
//!
//! This module provides implementations for all CLI subcommands:
//! - `report`: One-shot snapshots of the target process
//! - `check`: Readability checks for the target's records
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod report;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use report::command_report;
