//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::{merge, te, Verbosity};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function.
/// Here is a manual example of setting the command-line input:
/// ```rust
/// use clap::Parser;
/// let input = [
///     "ribotools", "merge-uorfs", "rep1.tsv", "rep2.tsv",
///     "--output_csv_filepath", "uorfs.csv",
///     "--output_bed_filepath", "uorfs.bed",
///     "--min_length", "9",
/// ];
/// let args = ribotools::Cli::parse_from(input);
/// match args.command {
///     ribotools::cli::Command::MergeUorfs(args) => {
///         assert_eq!(args.ribotaper_files.len(), 2);
///         assert_eq!(args.min_length.as_deref(), Some("9"));
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "ribotools", author, version)]
#[clap(about = "Merge and annotate ORF caller and translation efficiency tables.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which operation the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to [merge::run].
    #[clap(name = "merge-uorfs", about = "Merge uORFs of ORF caller tables into csv and bed6 files.")]
    MergeUorfs(merge::Args),

    /// Pass CLI arguments to [te::run].
    #[clap(name = "final-table", about = "Join xtail results of uORFs and CDSs into one table.")]
    FinalTable(te::Args),
}
