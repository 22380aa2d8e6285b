//! Combine differential translation efficiency results of uORFs and their
//! main ORFs (CDS) into one annotated table.
//!
//! Inputs are the CSV results of xtail for uORFs and for CDSs, the merged uORF
//! annotation written by `merge-uorfs`, and optionally ribosome footprint
//! counts for both, from which a per-uORF `ribo_change` is computed.


use crate::{table, Error, Table};
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use strum::Display;

/// Value written for missing data.
pub const NA: &str = "NA";
/// Columns taken from each xtail result table.
pub const XTAIL_COLUMNS: [&str; 3] = ["log2FC_TE_final", "pvalue_final", "pvalue.adjust"];

// ----------------------------------------------------------------------------
// Args

/// Merge xtail results of uORFs and their main ORF into one annotated table.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct Args {
    /// Path to the xtail csv of uORFs.
    #[clap(long = "xtail_uORF_file", required = true)]
    pub xtail_uorf_file: PathBuf,

    /// Path to the xtail csv of CDSs.
    #[clap(long = "xtail_cds_file", required = true)]
    pub xtail_cds_file: PathBuf,

    /// Path to the merged uORF csv written by merge-uorfs.
    #[clap(long = "uORF_annotation", required = true)]
    pub uorf_annotation: PathBuf,

    /// Path to the uORF read counts csv.
    #[clap(long = "uORF_reads", requires = "orf_reads")]
    pub uorf_reads: Option<PathBuf>,

    /// Path to the ORF read counts csv.
    #[clap(long = "ORF_reads", requires = "uorf_reads")]
    pub orf_reads: Option<PathBuf>,

    /// Path to write the final tab-separated table.
    #[clap(long = "output_csv_filepath", required = true)]
    pub output_csv_filepath: PathBuf,
}

// ----------------------------------------------------------------------------
// Xtail

/// One row of an xtail result table.
///
/// Values are kept as written in the input; `log2fc_value` is the parsed fold
/// change used to label the [Direction].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct XtailRow {
    pub id: String,
    pub log2fc: String,
    pub log2fc_value: Option<f64>,
    pub pvalue: String,
    pub pvalue_adjust: String,
}

impl XtailRow {
    fn values(row: Option<&XtailRow>) -> [String; 3] {
        match row {
            Some(r) => [r.log2fc.clone(), r.pvalue.clone(), r.pvalue_adjust.clone()],
            None => [NA.to_string(), NA.to_string(), NA.to_string()],
        }
    }
}

/// Read an xtail result csv. The first column holds the row identifiers.
pub fn read_xtail(path: &Path) -> Result<Vec<XtailRow>, Report> {
    info!("Reading xtail results: {path:?}");
    let table = Table::read(path, ',')?;
    table.require_columns(&XTAIL_COLUMNS)?;

    let [log2fc_i, pvalue_i, padj_i] = XTAIL_COLUMNS.map(|h| table.get_header_index(h));
    let (log2fc_i, pvalue_i, padj_i) = (log2fc_i?, pvalue_i?, padj_i?);

    table
        .rows
        .iter()
        .enumerate()
        .map(|(row_i, row)| -> Result<XtailRow, Report> {
            Ok(XtailRow {
                id: row[0].clone(),
                log2fc: row[log2fc_i].clone(),
                log2fc_value: parse_opt(&row[log2fc_i], XTAIL_COLUMNS[0], row_i, path)?,
                pvalue: row[pvalue_i].clone(),
                pvalue_adjust: row[padj_i].clone(),
            })
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Direction

/// Direction of regulation, as signs of the uORF and CDS log2 fold changes.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Direction {
    #[strum(serialize = "-,-")]
    DownDown,
    #[strum(serialize = "+,+")]
    UpUp,
    #[strum(serialize = "+,-")]
    UpDown,
    #[strum(serialize = "-,+")]
    DownUp,
}

impl Direction {
    /// Classify a pair of fold changes; `None` if either is missing or zero.
    pub fn from_log2fc(uorf: Option<f64>, cds: Option<f64>) -> Option<Self> {
        let (uorf, cds) = (uorf?, cds?);
        match (uorf, cds) {
            (u, c) if u < 0.0 && c < 0.0 => Some(Direction::DownDown),
            (u, c) if u > 0.0 && c > 0.0 => Some(Direction::UpUp),
            (u, c) if u > 0.0 && c < 0.0 => Some(Direction::UpDown),
            (u, c) if u < 0.0 && c > 0.0 => Some(Direction::DownUp),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Transcripts

/// Extracts the transcript id from a uORF id `<transcript_id>.<n>`.
#[derive(Clone, Debug)]
pub struct TranscriptParser {
    pattern: Regex,
}

impl TranscriptParser {
    pub fn new() -> Result<Self, Report> {
        Ok(TranscriptParser {
            pattern: Regex::new(r"^(.*\.[0-9]*)\.").wrap_err("Invalid transcript pattern.")?,
        })
    }

    /// # Examples
    ///
    /// ```
    /// use ribotools::te::TranscriptParser;
    ///
    /// let parser = TranscriptParser::new()?;
    /// assert_eq!(parser.parse("ENST0001.4.2", 0)?, "ENST0001.4");
    /// assert!(parser.parse("ENST0001", 0).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn parse<'id>(&self, uorf_id: &'id str, row: usize) -> Result<&'id str, Report> {
        self.pattern
            .captures(uorf_id)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                Error::MalformedIdentifier {
                    id: uorf_id.to_string(),
                    row,
                    reason: "no '<transcript>.<version>.' prefix".to_string(),
                }
                .into()
            })
    }
}

// ----------------------------------------------------------------------------
// Read counts

/// Ribosome footprint counts per identifier, one value per sample column.
pub type ReadCounts = HashMap<String, Vec<f64>>;

/// Read a counts csv: identifiers in the first column, one column per sample.
///
/// Sample columns whose name contains any of `drop` are skipped.
pub fn read_counts(path: &Path, drop: &[&str]) -> Result<ReadCounts, Report> {
    info!("Reading read counts: {path:?}");
    let table = Table::read(path, ',')?;
    let keep = table
        .headers
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, h)| !drop.iter().any(|d| h.contains(d)))
        .map(|(i, _)| i)
        .collect_vec();
    debug!("Using {} of {} count columns from {path:?}", keep.len(), table.headers.len().saturating_sub(1));

    table
        .rows
        .iter()
        .enumerate()
        .map(|(row_i, row)| -> Result<(String, Vec<f64>), Report> {
            let counts = keep
                .iter()
                .map(|i| {
                    row[*i].trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
                        value: row[*i].clone(),
                        column: table.headers[*i].clone(),
                        row: row_i,
                        path: Some(path.to_path_buf()),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((row[0].clone(), counts))
        })
        .collect()
}

/// Average change in the ORF to uORF footprint ratio between two conditions.
///
/// The first half of the columns are replicates of the first condition and the
/// second half the matching replicates of the second. With pseudocount 1, per
/// replicate `i`: `(orf[i]/uorf[i]) / (orf[i+r]/uorf[i+r])`.
///
/// # Examples
///
/// ```
/// use ribotools::te::ribo_change;
///
/// // one replicate per condition: (9/1) / (3/1)
/// assert_eq!(ribo_change(&[0.0, 0.0], &[8.0, 2.0])?, 3.0);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn ribo_change(uorf: &[f64], orf: &[f64]) -> Result<f64, Report> {
    if uorf.is_empty() || uorf.len() % 2 != 0 {
        return Err(eyre!("Expected an even, non-zero number of uORF count columns, found {}.", uorf.len()));
    }
    if orf.len() < uorf.len() {
        return Err(eyre!("Found {} ORF count columns for {} uORF count columns.", orf.len(), uorf.len()));
    }

    let replicates = uorf.len() / 2;
    let total: f64 = (0..replicates)
        .map(|i| {
            let ratio1 = (orf[i] + 1.0) / (uorf[i] + 1.0);
            let ratio2 = (orf[i + replicates] + 1.0) / (uorf[i + replicates] + 1.0);
            ratio1 / ratio2
        })
        .sum();
    Ok(total / replicates as f64)
}

/// `ribo_change` and the statistics derived from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RiboChange {
    pub change: f64,
    pub log2: f64,
    pub zscore: f64,
    pub pvalue: f64,
}

impl RiboChange {
    pub fn symbol(&self) -> &'static str {
        if self.change > 1.0 {
            "+"
        } else {
            "-"
        }
    }
}

/// Derive log2, z-score (population standard deviation) and two-sided normal
/// p-value for each change.
pub fn ribo_statistics(changes: &[f64]) -> Result<Vec<RiboChange>, Report> {
    if changes.is_empty() {
        return Ok(Vec::new());
    }

    let log2 = changes.iter().map(|c| c.log2()).collect_vec();
    let mean = log2.iter().mean();
    let sd = log2.iter().population_std_dev();
    let normal = Normal::new(0.0, 1.0).wrap_err("Failed to create standard normal.")?;

    let stats = changes
        .iter()
        .zip(log2)
        .map(|(change, log2)| {
            let zscore = if sd > 0.0 && sd.is_finite() { (log2 - mean) / sd } else { 0.0 };
            let pvalue = 2.0 * (1.0 - normal.cdf(zscore.abs()));
            RiboChange { change: *change, log2, zscore, pvalue }
        })
        .collect();
    Ok(stats)
}

// ----------------------------------------------------------------------------
// Functions

/// Headers of the final table, without the optional `ribo_*` columns.
pub const HEADERS: [&str; 12] = [
    "uORF_id",
    "log2FC_TE_final_uORF",
    "pvalue_final_uORF",
    "pvalue.adjust_uORF",
    "transcript_id",
    "log2FC_TE_final_CDS",
    "pvalue_final_CDS",
    "pvalue.adjust_CDS",
    "direction",
    "gene_id",
    "gene_symbol",
    "ORF_id_gen",
];
/// Annotation columns carried into the final table, after the join key.
pub const ANNOTATION_COLUMNS: [&str; 3] = ["gene_id", "gene_symbol", "ORF_id_gen"];
/// Headers appended when read counts are given.
pub const RIBO_HEADERS: [&str; 5] =
    ["ribo_change", "ribo_change_symbol", "ribo_log2", "ribo_zscore", "ribo_pvalue"];

/// Build the final table in memory.
pub fn final_table(args: &Args) -> Result<Table<String>, Report> {
    let uorfs = read_xtail(&args.xtail_uorf_file)?;
    let cds = read_xtail(&args.xtail_cds_file)?;
    let cds: HashMap<&str, &XtailRow> = cds.iter().map(|r| (r.id.as_str(), r)).collect();

    info!("Reading uORF annotation: {:?}", args.uorf_annotation);
    let annotation = Table::read(&args.uorf_annotation, ',')?;
    let id_i = annotation.get_header_index("uORFids")?;
    let carried: Vec<usize> = ANNOTATION_COLUMNS
        .iter()
        .map(|h| annotation.get_header_index(h))
        .collect::<Result<_, _>>()?;
    let annotation: HashMap<&str, Vec<&str>> = annotation
        .rows
        .iter()
        .map(|row| (row[id_i].as_str(), carried.iter().map(|i| row[*i].as_str()).collect()))
        .collect();

    let parser = TranscriptParser::new()?;
    let mut table = Table::new();
    table.headers = HEADERS.into_iter().map(String::from).collect_vec();
    let mut transcripts = Vec::with_capacity(uorfs.len());

    for (row_i, uorf) in uorfs.iter().enumerate() {
        let transcript_id = parser.parse(&uorf.id, row_i)?;
        let cds_row = cds.get(transcript_id).copied();
        let direction = Direction::from_log2fc(uorf.log2fc_value, cds_row.and_then(|r| r.log2fc_value));

        let mut row = vec![uorf.id.clone()];
        row.extend(XtailRow::values(Some(uorf)));
        row.push(transcript_id.to_string());
        row.extend(XtailRow::values(cds_row));
        row.push(direction.map_or(NA.to_string(), |d| d.to_string()));
        match annotation.get(uorf.id.as_str()) {
            Some(values) => row.extend(values.iter().map(|v| v.to_string())),
            None => row.extend(ANNOTATION_COLUMNS.map(|_| NA.to_string())),
        }
        table.add_row(row)?;
        transcripts.push(transcript_id);
    }
    debug!("Joined {} uORFs with {} CDS results.", table.len(), cds.len());

    if let (Some(uorf_reads), Some(orf_reads)) = (&args.uorf_reads, &args.orf_reads) {
        let uorf_counts = read_counts(uorf_reads, &["RNA"])?;
        let orf_counts = read_counts(orf_reads, &[])?;

        let changes = uorfs
            .iter()
            .zip(&transcripts)
            .map(|(uorf, transcript_id)| -> Result<f64, Report> {
                let u = uorf_counts
                    .get(&uorf.id)
                    .ok_or_else(|| Error::MissingTranscript(uorf.id.clone()))?;
                let o = orf_counts
                    .get(*transcript_id)
                    .ok_or_else(|| Error::MissingTranscript(transcript_id.to_string()))?;
                ribo_change(u, o).wrap_err_with(|| format!("Failed ribo_change for {}", uorf.id))
            })
            .collect::<Result<Vec<_>, Report>>()?;

        let stats = ribo_statistics(&changes)?;
        let columns: [Vec<String>; 5] = [
            stats.iter().map(|s| s.change.to_string()).collect(),
            stats.iter().map(|s| s.symbol().to_string()).collect(),
            stats.iter().map(|s| s.log2.to_string()).collect(),
            stats.iter().map(|s| s.zscore.to_string()).collect(),
            stats.iter().map(|s| s.pvalue.to_string()).collect(),
        ];
        for (header, column) in RIBO_HEADERS.into_iter().zip(columns) {
            table.add_column(header.to_string(), column)?;
        }
    }

    Ok(table)
}

/// Run `final-table`: build the table and write it tab-separated.
pub fn run(args: &Args) -> Result<Table<String>, Report> {
    let table = final_table(args)?;
    let text = table.to_delimited('\t')?;
    info!("Writing final table: {:?}", args.output_csv_filepath);
    table::write_text(&args.output_csv_filepath, &text)?;
    Ok(table)
}

// ----------------------------------------------------------------------------
// Helpers

fn parse_opt(value: &str, column: &str, row: usize, path: &Path) -> Result<Option<f64>, Report> {
    let value = value.trim();
    if value.is_empty() || value == NA {
        return Ok(None);
    }
    let parsed = value.parse::<f64>().map_err(|_| Error::InvalidNumber {
        value: value.to_string(),
        column: column.to_string(),
        row,
        path: Some(path.to_path_buf()),
    })?;
    Ok(Some(parsed))
}
