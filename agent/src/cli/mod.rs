//! CLI module
//!
//! Argument definitions for the `press-agent` binary.

pub mod args;

pub use args::{AnalyzeArgs, Cli, Commands, SearchArgs};
