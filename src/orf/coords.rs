//! Genomic coordinates embedded in an `ORF_id_gen` identifier.
//!
//! The identifier is assumed to look like `<prefix>chr<name>_<start>_<stop>`,
//! where the prefix contains no underscore. This is not a general coordinate
//! parser: an identifier with more than two underscore-delimited fields after
//! the chromosome yields a non-numeric start and is rejected.

use crate::Error;
use color_eyre::eyre::{Report, Result, WrapErr};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Coordinates parsed from one identifier.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Coordinates {
    pub chromosome: String,
    pub start: u64,
    pub stop: u64,
}

/// Compiled patterns for [`Coordinates`] extraction.
#[derive(Clone, Debug)]
pub struct IdParser {
    chromosome: Regex,
    start: Regex,
    stop: Regex,
}

impl IdParser {
    pub fn new() -> Result<Self, Report> {
        Ok(IdParser {
            // first run of chr followed by digits or M/X/Y
            chromosome: Regex::new("chr[0-9MXY]+").wrap_err("Invalid chromosome pattern.")?,
            // greedy: everything between the first and the last underscore
            start: Regex::new("_(.+)_").wrap_err("Invalid start pattern.")?,
            stop: Regex::new("_([0-9]+)$").wrap_err("Invalid stop pattern.")?,
        })
    }

    /// Extract chromosome, start and stop from `id`.
    ///
    /// `row` is only used to locate the record in error messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use ribotools::orf::IdParser;
    ///
    /// let parser = IdParser::new()?;
    /// let coords = parser.parse("ENST0001chrX_1500_1620", 0)?;
    /// assert_eq!(coords.chromosome, "chrX");
    /// assert_eq!((coords.start, coords.stop), (1500, 1620));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn parse(&self, id: &str, row: usize) -> Result<Coordinates, Report> {
        let malformed = |reason: &str| -> Report {
            Error::MalformedIdentifier { id: id.to_string(), row, reason: reason.to_string() }.into()
        };

        let chromosome = self
            .chromosome
            .find(id)
            .ok_or_else(|| malformed("no chromosome (chr[0-9MXY]+)"))?
            .as_str()
            .to_string();

        let start = self
            .start
            .captures(id)
            .and_then(|c| c.get(1))
            .ok_or_else(|| malformed("no start between underscores"))?
            .as_str();
        let start = start
            .parse::<u64>()
            .map_err(|_| malformed(&format!("start '{start}' is not an integer")))?;

        let stop = self
            .stop
            .captures(id)
            .and_then(|c| c.get(1))
            .ok_or_else(|| malformed("no trailing stop coordinate"))?
            .as_str();
        let stop = stop
            .parse::<u64>()
            .map_err(|_| malformed(&format!("stop '{stop}' is out of range")))?;

        Ok(Coordinates { chromosome, start, stop })
    }
}
