//! Render merged uORFs as a CSV table and as BED6 intervals.

use crate::merge::Uorf;
use crate::Table;
use itertools::Itertools;

/// Columns of the merged CSV, after the unnamed row-index column.
pub const CSV_HEADERS: [&str; 10] = [
    "gene_id",
    "gene_symbol",
    "transcript_id",
    "strand",
    "ORF_id_gen",
    "ORF_length",
    "chromosome",
    "start",
    "stop",
    "uORFids",
];

/// Table of merged uORFs, led by an unnamed 0-based row-index column.
pub fn csv_table(uorfs: &[Uorf]) -> Table<String> {
    let mut table = Table::new();
    table.headers =
        std::iter::once("").chain(CSV_HEADERS).map(String::from).collect_vec();

    table.rows = uorfs
        .iter()
        .enumerate()
        .map(|(i, uorf)| {
            let r = &uorf.record;
            vec![
                i.to_string(),
                r.gene_id.clone(),
                r.gene_symbol.clone(),
                r.transcript_id.clone(),
                r.strand.clone(),
                r.orf_id_gen.clone(),
                r.orf_length.to_string(),
                r.chromosome.clone(),
                r.start.to_string(),
                r.stop.to_string(),
                uorf.id.clone(),
            ]
        })
        .collect_vec();

    table
}

/// One BED6 line per uORF, in row order: `chrom start stop uORFid 0 strand`.
///
/// # Examples
///
/// ```
/// use ribotools::export::bed;
/// use ribotools::merge::Uorf;
/// use ribotools::orf::OrfRecord;
///
/// let record = OrfRecord { chromosome: "chr1".into(), start: 100, stop: 200, ..Default::default() };
/// let uorf = Uorf { id: "ENST001.1".into(), record };
/// assert_eq!(bed(&[uorf]), "chr1\t100\t200\tENST001.1\t0\t+\n");
/// ```
pub fn bed(uorfs: &[Uorf]) -> String {
    uorfs
        .iter()
        .map(|uorf| {
            let r = &uorf.record;
            format!("{}\t{}\t{}\t{}\t0\t{}\n", r.chromosome, r.start, r.stop, uorf.id, r.strand)
        })
        .collect()
}
