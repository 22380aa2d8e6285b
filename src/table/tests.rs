use crate::table::write_text;
use crate::{Error, Table};
use color_eyre::eyre::{Report, Result};
use std::io::Write;
use tempfile::NamedTempFile;

fn toy_table() -> Table<&'static str> {
    Table {
        headers: vec!["category", "gene_id", "ORF_length"],
        rows: vec![
            vec!["uORF", "ENSG01", "30"],
            vec!["ORFs_ccds", "ENSG02", "900"],
            vec!["uORF", "ENSG03", "45"],
        ],
        path: None,
    }
}

#[test]
fn read_tsv() -> Result<(), Report> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "category\tgene_id\nuORF\tENSG01\ndORF\tENSG02")?;

    let observed = Table::read(file.path(), '\t')?;
    assert_eq!(vec!["category", "gene_id"], observed.headers);
    assert_eq!(vec![vec!["uORF", "ENSG01"], vec!["dORF", "ENSG02"]], observed.rows);
    assert_eq!(Some(file.path().to_path_buf()), observed.path);
    Ok(())
}

#[test]
fn read_quoted_csv() -> Result<(), Report> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "\"\",\"log2FC\"\n\"ENST01.1.1\",\"-0.5\"")?;

    let observed = Table::read(file.path(), ',')?;
    assert_eq!(vec!["", "log2FC"], observed.headers);
    assert_eq!(vec![vec!["ENST01.1.1", "-0.5"]], observed.rows);
    Ok(())
}

#[test]
fn read_empty() -> Result<(), Report> {
    let file = NamedTempFile::new()?;
    let observed = Table::read(file.path(), '\t')?;
    assert!(observed.headers.is_empty());
    assert!(observed.is_empty());
    Ok(())
}

#[test]
fn read_missing_file() {
    let path = std::path::Path::new("does/not/exist.tsv");
    let report = Table::read(path, '\t').unwrap_err();
    assert_eq!(Some(&Error::InputNotFound(path.to_path_buf())), report.downcast_ref::<Error>());
}

#[test]
fn missing_column() {
    let report = toy_table().get_header_index("strand").unwrap_err();
    assert!(matches!(
        report.downcast_ref::<Error>(),
        Some(Error::MissingColumn { column, .. }) if column == "strand"
    ));
}

#[test]
fn filter_exact() -> Result<(), Report> {
    let observed = toy_table().filter("category", "uORF")?;
    assert_eq!(2, observed.len());
    assert_eq!(vec![&"ENSG01", &"ENSG03"], observed.get_column("gene_id")?);

    // no partial matches
    assert!(toy_table().filter("category", "uOR")?.is_empty());
    Ok(())
}

#[test]
fn select_reorders() -> Result<(), Report> {
    let observed = toy_table().select(&["ORF_length", "gene_id"])?;

    let expected = Table {
        headers: vec!["ORF_length", "gene_id"],
        rows: vec![vec!["30", "ENSG01"], vec!["900", "ENSG02"], vec!["45", "ENSG03"]],
        path: None,
    };
    assert_eq!(expected, observed);
    assert!(toy_table().select(&["gene_id", "strand"]).is_err());
    Ok(())
}

#[test]
fn add_row_and_column() -> Result<(), Report> {
    let mut table = toy_table();
    assert!(table.add_row(vec!["uORF"]).is_err());
    table.add_row(vec!["uORF", "ENSG04", "12"])?;
    table.add_column("strand", vec!["+", "-", "+", "-"])?;
    assert!(table.add_column("chromosome", vec!["chr1"]).is_err());

    assert_eq!(vec![&"+", &"-", &"+", &"-"], table.get_column("strand")?);
    assert_eq!(vec!["uORF", "ENSG04", "12", "-"], table.rows[3]);
    Ok(())
}

#[test]
fn write_roundtrip_quotes() -> Result<(), Report> {
    let table = Table {
        headers: vec!["name", "note"],
        rows: vec![vec!["a", "x,y"]],
        path: None,
    };
    assert_eq!("name,note\na,\"x,y\"\n", table.to_delimited(',')?);

    let file = NamedTempFile::new()?;
    write_text(file.path(), &table.to_delimited(',')?)?;
    let observed = Table::read(file.path(), ',')?;
    assert_eq!(table.rows[0], observed.rows[0]);
    Ok(())
}
