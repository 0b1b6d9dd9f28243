//! CLI Adapter
//!
//! Command-line interface for the conformance harness.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{execute, CatalogCmd, CliApp, Command, LoadCmd, OutputFormat, QuoteCmd, RunCmd};

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}
