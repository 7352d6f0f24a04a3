//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "press-agent")]
#[command(about = "Search the web for press coverage and analyze it with Gemini")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: PRESS_CONFIG_PATH, then .press.toml in this or a parent directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stage 1: run every search term and save the links to CSV
    Search(SearchArgs),
    /// Stage 2: fetch and analyze every link in a search results CSV
    Analyze(AnalyzeArgs),
    /// Stage 1 followed by stage 2 on the file just written
    Run {
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Search term (repeatable). Replaces the terms from the config file.
    #[arg(long = "term", short = 't')]
    pub terms: Vec<String>,

    /// Results to collect per term (1-100)
    #[arg(long, short = 'n')]
    pub total: Option<usize>,

    /// Directory for the output files
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Search results CSV to analyze (default: newest search_results_*.csv)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Directory for the output file, and where to look for input
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}
