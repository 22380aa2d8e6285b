use clap::Parser;
use color_eyre::eyre::{Report, Result};
use log::debug;
use ribotools::{cli::Command, merge, te, Cli};

fn main() -> Result<(), Report> {
    // ------------------------------------------------------------------------
    // CLI Setup

    // Parse CLI parameters
    let args = Cli::parse();

    // initialize color_eyre crate for colorized logs
    color_eyre::install()?;

    // initialize env_logger crate for logging/verbosity level
    env_logger::Builder::new().filter_level(args.verbosity.into()).init();
    debug!("{}", serde_json::to_string(&args)?);

    // check which CLI command we're running (merge-uorfs, final-table)
    match args.command {
        Command::MergeUorfs(args) => _ = merge::run(&args)?,
        Command::FinalTable(args) => _ = te::run(&args)?,
    }

    Ok(())
}
