//! Command handlers module
//!
//! One handler per stage. CommandContext carries the resolved config
//! shared across handlers.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::SearchArgs;
use crate::config::PressConfig;

pub mod analyze;
pub mod search;

pub use analyze::{analyze_stage, run_analyze};
pub use search::{run_search, search_stage};

/// Shared context for command handlers
pub struct CommandContext {
    pub config: PressConfig,
}

impl CommandContext {
    /// Load config (explicit path, env, or discovered file) and wrap it
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = PressConfig::load(config_path)?;
        Ok(Self::new(config))
    }

    pub fn new(config: PressConfig) -> Self {
        Self { config }
    }

    /// Apply stage 1 flags over the file config. CLI wins when given.
    pub fn apply_search_args(&mut self, args: &SearchArgs) {
        if !args.terms.is_empty() {
            self.config.search.terms = args.terms.clone();
        }
        if let Some(total) = args.total {
            self.config.search.total_results = total;
        }
        if let Some(dir) = &args.output_dir {
            self.config.pipeline.output_dir = dir.clone();
        }
    }

    /// Apply stage 2 flags over the file config
    pub fn apply_analyze_args(&mut self, input: Option<PathBuf>, output_dir: Option<PathBuf>) {
        if input.is_some() {
            self.config.pipeline.input_file = input;
        }
        if let Some(dir) = output_dir {
            self.config.pipeline.output_dir = dir;
        }
    }
}

/// Run stage 1 then stage 2 on the file it wrote
pub async fn run_pipeline(ctx: &mut CommandContext, args: &SearchArgs) -> Result<()> {
    // Both stages are checked up front so a bad Gemini key fails before searching
    ctx.apply_search_args(args);
    ctx.config.validate_search()?;
    ctx.config.validate_analysis()?;

    let search_file = run_search(ctx, &SearchArgs::default()).await?;
    ctx.apply_analyze_args(Some(search_file), None);
    run_analyze(ctx).await?;
    Ok(())
}
