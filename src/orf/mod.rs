//! ORF records read from the per-sample tables of the ORF caller.

pub mod coords;

pub use coords::{Coordinates, IdParser};

use crate::{Error, Table};
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// Column holding the ORF category.
pub const CATEGORY: &str = "category";
/// Category value of upstream ORFs.
pub const UORF: &str = "uORF";
/// Columns kept from each input table, in output order.
pub const COLUMNS: [&str; 6] =
    ["gene_id", "gene_symbol", "transcript_id", "strand", "ORF_id_gen", "ORF_length"];

// ----------------------------------------------------------------------------
// OrfRecord

/// One upstream ORF, with the coordinates derived from its identifier.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct OrfRecord {
    pub gene_id: String,
    pub gene_symbol: String,
    pub transcript_id: String,
    pub strand: String,
    pub orf_id_gen: String,
    pub orf_length: u64,
    pub chromosome: String,
    pub start: u64,
    pub stop: u64,
}

impl OrfRecord {
    /// Build a record from a row projected onto [`COLUMNS`].
    ///
    /// `row_i` is the 0-based position among the table's uORF rows, for error messages.
    pub fn from_row(
        row: &[String],
        row_i: usize,
        parser: &IdParser,
        path: Option<&Path>,
    ) -> Result<Self, Report> {
        let [gene_id, gene_symbol, transcript_id, strand, orf_id_gen, orf_length] = row else {
            return Err(eyre!(
                "Row {row_i} has {} values, expected {}.",
                row.len(),
                COLUMNS.len()
            ));
        };

        let orf_length = orf_length.trim().parse::<u64>().map_err(|_| Error::InvalidNumber {
            value: orf_length.clone(),
            column: "ORF_length".to_string(),
            row: row_i,
            path: path.map(Path::to_path_buf),
        })?;

        let Coordinates { chromosome, start, stop } = parser.parse(orf_id_gen, row_i)?;

        Ok(OrfRecord {
            gene_id: gene_id.clone(),
            gene_symbol: gene_symbol.clone(),
            transcript_id: transcript_id.clone(),
            strand: strand.clone(),
            orf_id_gen: orf_id_gen.clone(),
            orf_length,
            chromosome,
            start,
            stop,
        })
    }

    /// The interval used for overlap checks, padded by one base on each side
    /// so that abutting ORFs count as overlapping.
    pub fn padded_interval(&self) -> Range<u64> {
        self.start.saturating_sub(1)..self.stop.saturating_add(1)
    }

    /// True if both records lie on the same chromosome and strand and their
    /// padded intervals intersect.
    ///
    /// # Examples
    ///
    /// ```
    /// use ribotools::orf::OrfRecord;
    ///
    /// let a = OrfRecord { start: 100, stop: 200, chromosome: "chr1".into(), ..Default::default() };
    /// let b = OrfRecord { start: 201, stop: 260, ..a.clone() };
    /// let c = OrfRecord { start: 203, stop: 260, ..a.clone() };
    /// assert!(a.overlaps(&b));
    /// assert!(!a.overlaps(&c));
    /// ```
    pub fn overlaps(&self, other: &OrfRecord) -> bool {
        if self.chromosome != other.chromosome || self.strand != other.strand {
            return false;
        }
        let (a, b) = (self.padded_interval(), other.padded_interval());
        a.start < b.end && b.start < a.end
    }
}

impl Default for OrfRecord {
    fn default() -> Self {
        OrfRecord {
            gene_id: String::new(),
            gene_symbol: String::new(),
            transcript_id: String::new(),
            strand: "+".to_string(),
            orf_id_gen: String::new(),
            orf_length: 0,
            chromosome: String::new(),
            start: 0,
            stop: 0,
        }
    }
}

// ----------------------------------------------------------------------------
// Functions

/// Keep only the uORF rows of an ORF table, projected onto [`COLUMNS`].
///
/// Fails with [`Error::MissingColumn`] if `category` or any of [`COLUMNS`] is absent.
pub fn select_uorfs(table: &Table<String>) -> Result<Table<String>, Report> {
    table.require_columns(&[CATEGORY])?;
    table.require_columns(&COLUMNS)?;
    table.filter(CATEGORY, UORF)?.select(&COLUMNS)
}

/// Read a tab-separated ORF table and return its uORF records, in file order.
///
/// An empty (zero byte) file is skipped with a warning.
pub fn load(path: &Path, parser: &IdParser) -> Result<Vec<OrfRecord>, Report> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()).into());
    }
    let size = std::fs::metadata(path)
        .wrap_err_with(|| format!("Failed to read metadata: {path:?}"))?
        .len();
    if size == 0 {
        warn!("Skipping empty ORF table: {path:?}");
        return Ok(Vec::new());
    }

    info!("Reading ORF table: {path:?}");
    let table = Table::read(path, '\t')?;
    let uorfs = select_uorfs(&table)?;
    debug!("Kept {} of {} rows with {CATEGORY} == {UORF}.", uorfs.len(), table.len());

    uorfs
        .rows
        .iter()
        .enumerate()
        .map(|(row_i, row)| OrfRecord::from_row(row, row_i, parser, Some(path)))
        .collect::<Result<Vec<_>, _>>()
        .wrap_err_with(|| format!("Failed to parse ORF table: {path:?}"))
}
