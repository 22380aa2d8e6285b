//! `ribotools` post-processes ribosome profiling results into merged,
//! filtered and annotated tables.
//!
//! ## Commands
//!
//! 1. `merge-uorfs` reads the ORF tables of an ORF caller (one per sample),
//!    keeps the upstream ORFs, merges calls that overlap on the genome
//!    (keeping the longest ORF), and writes a CSV table plus a BED6 file with
//!    one uORF id (`<transcript_id>.<n>`) per record.
//!
//! 1. `final-table` joins the differential translation efficiency results of
//!    uORFs and their main ORFs, labels the direction of regulation, and
//!    optionally adds a footprint ratio change per uORF.

pub mod cli;
pub mod error;
pub mod export;
pub mod merge;
pub mod orf;
pub mod table;
pub mod te;
pub mod utils;

#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::error::Error;
#[doc(inline)]
pub use table::Table;
#[doc(inline)]
pub use utils::verbosity::Verbosity;
