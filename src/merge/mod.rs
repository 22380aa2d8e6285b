//! Merge uORF calls from several ORF tables into one deduplicated set.
//!
//! ```text
//! [ORF tables] → uORF rows → coordinates → overlap merge → exact dedup
//!              → length filter → uORF ids → CSV + BED
//! ```


use crate::orf::{self, IdParser, OrfRecord};
use crate::{export, table, Error};
use clap::Parser;
use color_eyre::eyre::{Report, Result};
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// ----------------------------------------------------------------------------
// Args

/// Merge uORFs from ORF caller tables (ORFs_max_filt) into CSV and BED6 files.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct Args {
    /// Paths to ORF caller tables, processed in the order given.
    #[clap(value_name = "RIBOTAPER")]
    pub ribotaper_files: Vec<PathBuf>,

    /// Path to write the merged csv output.
    #[clap(long = "output_csv_filepath", required = true)]
    pub output_csv_filepath: PathBuf,

    /// Path to write the merged bed6 output.
    #[clap(long = "output_bed_filepath", required = true)]
    pub output_bed_filepath: PathBuf,

    /// Minimal uORF length. Must not exceed --max_length.
    #[clap(long = "min_length")]
    pub min_length: Option<String>,

    /// Maximal uORF length. Must be at least --min_length.
    #[clap(long = "max_length")]
    pub max_length: Option<String>,
}

// ----------------------------------------------------------------------------
// Merger

/// What happened to a candidate passed to [`Merger::insert`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Decision {
    /// No overlap, appended as a new row.
    Append,
    /// Strictly longer than every overlapping row. It took the place of row
    /// `row` and the other overlapping rows were removed.
    Replace { row: usize, removed: Vec<usize> },
    /// An overlapping row was at least as long.
    Discard,
}

/// Accumulator of merged uORF records, owned by a single merge run.
///
/// Records that overlap (same chromosome and strand, padded intervals
/// intersect) form a cluster of which only the longest is kept. Ties keep the
/// record seen first, so input order decides between equally long ORFs.
#[derive(Clone, Debug, Default)]
pub struct Merger {
    records: Vec<OrfRecord>,
}

impl Merger {
    pub fn new() -> Self {
        Merger { records: Vec::new() }
    }

    /// Merged records so far, in row order.
    pub fn records(&self) -> &[OrfRecord] {
        &self.records
    }

    /// Merge one candidate into the accumulator.
    ///
    /// # Examples
    ///
    /// ```
    /// use ribotools::merge::{Decision, Merger};
    /// use ribotools::orf::OrfRecord;
    ///
    /// let short = OrfRecord { chromosome: "chr1".into(), start: 100, stop: 130, orf_length: 30, ..Default::default() };
    /// let long = OrfRecord { start: 110, stop: 155, orf_length: 45, ..short.clone() };
    ///
    /// let mut merger = Merger::new();
    /// assert_eq!(merger.insert(short), Decision::Append);
    /// assert_eq!(merger.insert(long.clone()), Decision::Replace { row: 0, removed: vec![] });
    /// assert_eq!(merger.records(), &[long]);
    /// ```
    pub fn insert(&mut self, candidate: OrfRecord) -> Decision {
        let overlapping = self
            .records
            .iter()
            .positions(|existing| existing.overlaps(&candidate))
            .collect_vec();

        let Some(&first) = overlapping.first() else {
            debug!("Append {}", candidate.orf_id_gen);
            self.records.push(candidate);
            return Decision::Append;
        };

        let longest = overlapping.iter().map(|i| self.records[*i].orf_length).max().unwrap_or(0);
        if candidate.orf_length <= longest {
            debug!("Discard {} (length {} <= {longest})", candidate.orf_id_gen, candidate.orf_length);
            return Decision::Discard;
        }

        debug!(
            "Replace {} with {} (length {} > {longest})",
            self.records[first].orf_id_gen, candidate.orf_id_gen, candidate.orf_length
        );
        self.records[first] = candidate;
        let removed = overlapping[1..].to_vec();
        // remove back to front so the remaining indices stay valid
        for i in removed.iter().rev() {
            self.records.remove(*i);
        }
        Decision::Replace { row: first, removed }
    }

    /// Merge every candidate, in order.
    pub fn extend<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = OrfRecord>,
    {
        for candidate in candidates {
            self.insert(candidate);
        }
    }

    /// Consume the accumulator, dropping any later record whose `ORF_id_gen`
    /// was already seen.
    pub fn finish(self) -> Vec<OrfRecord> {
        let n = self.records.len();
        let records =
            self.records.into_iter().unique_by(|record| record.orf_id_gen.clone()).collect_vec();
        if records.len() != n {
            debug!("Dropped {} records with duplicate ORF_id_gen.", n - records.len());
        }
        records
    }
}

// ----------------------------------------------------------------------------
// LengthBounds

/// Inclusive ORF length bounds, each optional.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LengthBounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl LengthBounds {
    /// Parse the bounds from their command-line text.
    ///
    /// Fails with [`Error::InvalidLengthBound`] if a bound is not a positive
    /// integer, or if `min > max`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ribotools::merge::LengthBounds;
    ///
    /// let bounds = LengthBounds::parse(Some("10"), None)?;
    /// assert_eq!(bounds, LengthBounds { min: Some(10), max: None });
    /// assert!(LengthBounds::parse(Some("ten"), None).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Self, Report> {
        let parse_one = |name: &'static str, value: Option<&str>| -> Result<Option<u64>, Error> {
            let Some(value) = value else { return Ok(None) };
            match value.trim().parse::<u64>() {
                Ok(n) if n > 0 => Ok(Some(n)),
                _ => Err(Error::InvalidLengthBound {
                    name,
                    value: value.to_string(),
                    detail: String::new(),
                }),
            }
        };

        let bounds = LengthBounds { min: parse_one("min_length", min)?, max: parse_one("max_length", max)? };
        if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
            if min > max {
                return Err(Error::InvalidLengthBound {
                    name: "min_length",
                    value: min.to_string(),
                    detail: format!(" not larger than max_length ({max})"),
                }
                .into());
            }
        }
        Ok(bounds)
    }

    pub fn contains(&self, length: u64) -> bool {
        self.min.map_or(true, |min| length >= min) && self.max.map_or(true, |max| length <= max)
    }

    /// Keep records whose `orf_length` lies within the bounds, preserving order.
    pub fn retain(&self, records: Vec<OrfRecord>) -> Vec<OrfRecord> {
        records.into_iter().filter(|record| self.contains(record.orf_length)).collect()
    }
}

// ----------------------------------------------------------------------------
// uORF ids

/// A merged record with its assigned uORF id.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Uorf {
    pub id: String,
    pub record: OrfRecord,
}

/// Number the uORFs of each transcript `1, 2, 3, ...` in row order and
/// name them `<transcript_id>.<n>`.
///
/// # Examples
///
/// ```
/// use ribotools::merge::assign_uorf_ids;
/// use ribotools::orf::OrfRecord;
///
/// let record = |t: &str| OrfRecord { transcript_id: t.into(), ..Default::default() };
/// let uorfs = assign_uorf_ids(vec![record("ENST01"), record("ENST02"), record("ENST01")]);
/// let ids: Vec<_> = uorfs.iter().map(|u| u.id.as_str()).collect();
/// assert_eq!(ids, ["ENST01.1", "ENST02.1", "ENST01.2"]);
/// ```
pub fn assign_uorf_ids(records: Vec<OrfRecord>) -> Vec<Uorf> {
    let mut counters: HashMap<String, usize> = HashMap::new();
    records
        .into_iter()
        .map(|record| {
            let n = counters.entry(record.transcript_id.clone()).or_insert(0);
            *n += 1;
            Uorf { id: format!("{}.{n}", record.transcript_id), record }
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Functions

/// Merge the uORFs of all input tables, in command-line order.
pub fn uorfs(args: &Args) -> Result<Vec<Uorf>, Report> {
    let bounds = LengthBounds::parse(args.min_length.as_deref(), args.max_length.as_deref())?;
    let parser = IdParser::new()?;

    let mut merger = Merger::new();
    for path in &args.ribotaper_files {
        let candidates = orf::load(path, &parser)?;
        info!("Merging {} uORFs from {path:?}", candidates.len());
        merger.extend(candidates);
    }

    let records = merger.finish();
    info!("Merged uORFs: {}", records.len());
    let records = bounds.retain(records);
    info!("uORFs within length bounds {bounds:?}: {}", records.len());

    Ok(assign_uorf_ids(records))
}

/// Run `merge-uorfs`: merge the input tables and write the CSV and BED outputs.
///
/// Both outputs are rendered before either file is created, so a failed run
/// leaves no partial output behind.
pub fn run(args: &Args) -> Result<Vec<Uorf>, Report> {
    let uorfs = uorfs(args)?;

    let csv = export::csv_table(&uorfs).to_delimited(',')?;
    let bed = export::bed(&uorfs);

    info!("Writing merged csv: {:?}", args.output_csv_filepath);
    table::write_text(&args.output_csv_filepath, &csv)?;
    info!("Writing merged bed: {:?}", args.output_bed_filepath);
    table::write_text(&args.output_bed_filepath, &bed)?;

    Ok(uorfs)
}
