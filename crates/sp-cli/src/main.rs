//! shapeplot: systematic-variation and post-fit plots from ROOT shape files.

mod args;
mod input;
mod paths;
mod postfit;
mod runlog;
mod systematics;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::args::{PostfitArgs, SystematicsArgs};
use crate::runlog::RunLog;

#[derive(Parser)]
#[command(name = "shapeplot")]
#[command(about = "Systematic-variation and post-fit plots from ROOT shape files")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Overlay Up/Down systematic variations on the central shapes
    Systematics(SystematicsArgs),

    /// Stacked post-fit distribution with data, signal and the yield table
    Postfit(PostfitArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let command_line = std::env::args().collect::<Vec<_>>().join(" ");
    let started = chrono::Local::now();

    match cli.command {
        Commands::Systematics(args) => {
            let log = RunLog::new(&args.common.log_file, &command_line, started);
            systematics::run(&args, &log)
        }
        Commands::Postfit(args) => {
            let log = RunLog::new(&args.common.log_file, &command_line, started);
            postfit::run(&args, &log)
        }
    }
}
