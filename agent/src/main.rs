use anyhow::Result;
use clap::Parser;

use press_agent::cli::{Cli, Commands};
use press_agent::handlers::{self, CommandContext};
use press_agent::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;

    let mut ctx = CommandContext::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Search(args) => {
            handlers::run_search(&mut ctx, &args).await?;
        }
        Commands::Analyze(args) => {
            ctx.apply_analyze_args(args.input, args.output_dir);
            handlers::run_analyze(&ctx).await?;
        }
        Commands::Run { search } => {
            handlers::run_pipeline(&mut ctx, &search).await?;
        }
    }

    Ok(())
}
