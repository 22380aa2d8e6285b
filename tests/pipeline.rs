use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Report, Result};
use ribotools::{cli::Command, merge, te, Cli, Table};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "category\tgene_id\tgene_symbol\ttranscript_id\tstrand\tORF_id_gen\tORF_length";

fn write(dir: &Path, name: &str, text: &str) -> Result<PathBuf, Report> {
    let path = dir.join(name);
    std::fs::write(&path, text)?;
    Ok(path)
}

fn parse_merge(input: &[&str]) -> merge::Args {
    match Cli::parse_from(input).command {
        Command::MergeUorfs(args) => args,
        command => panic!("Unexpected command: {command:?}"),
    }
}

#[test]
fn merge_then_final_table() -> Result<(), Report> {
    let dir = TempDir::new()?;
    let rep1 = write(
        dir.path(),
        "rep1_ORFs_max_filt.tsv",
        &format!(
            "{HEADER}\n\
             uORF\tENSG01\tABC\tENST01.2\t+\tENST01chr1_100_130\t30\n\
             ORFs_ccds\tENSG01\tABC\tENST01.2\t+\tENST01chr1_300_900\t600\n\
             uORF\tENSG02\tDEF\tENST02.1\t-\tENST02chr7_5000_5120\t120\n"
        ),
    )?;
    let rep2 = write(
        dir.path(),
        "rep2_ORFs_max_filt.tsv",
        &format!(
            "{HEADER}\n\
             uORF\tENSG01\tABC\tENST01.2\t+\tENST01chr1_90_135\t45\n\
             uORF\tENSG01\tABC\tENST01.2\t+\tENST01chr1_200_236\t36\n"
        ),
    )?;

    let csv = dir.path().join("uorfs.csv");
    let bed = dir.path().join("uorfs.bed");
    let args = parse_merge(&[
        "ribotools",
        "merge-uorfs",
        rep1.to_str().unwrap(),
        rep2.to_str().unwrap(),
        "--output_csv_filepath",
        csv.to_str().unwrap(),
        "--output_bed_filepath",
        bed.to_str().unwrap(),
        "--max_length",
        "100",
    ]);
    merge::run(&args)?;

    let expected_bed = "chr1\t90\t135\tENST01.2.1\t0\t+\nchr1\t200\t236\tENST01.2.2\t0\t+\n";
    assert_eq!(expected_bed, std::fs::read_to_string(&bed)?);

    let table = Table::read(&csv, ',')?;
    assert_eq!(vec!["ENST01.2.1", "ENST01.2.2"], table.get_column("uORFids")?);
    assert_eq!(vec!["45", "36"], table.get_column("ORF_length")?);

    // the merged csv is the annotation of the final table
    let te_args = te::Args {
        xtail_uorf_file: write(
            dir.path(),
            "uorf_TE.csv",
            "\"\",\"log2FC_TE_final\",\"pvalue_final\",\"pvalue.adjust\"\n\
             \"ENST01.2.1\",1.2,0.001,0.01\n\
             \"ENST01.2.2\",-0.3,0.5,0.7\n",
        )?,
        xtail_cds_file: write(
            dir.path(),
            "cds_TE.csv",
            "\"\",\"log2FC_TE_final\",\"pvalue_final\",\"pvalue.adjust\"\n\"ENST01.2\",-0.9,0.002,0.02\n",
        )?,
        uorf_annotation: csv,
        output_csv_filepath: dir.path().join("final.tsv"),
        ..Default::default()
    };
    te::run(&te_args)?;

    let final_table = Table::read(&te_args.output_csv_filepath, '\t')?;
    assert_eq!(vec!["+,-", "-,-"], final_table.get_column("direction")?);
    assert_eq!(vec!["ENSG01", "ENSG01"], final_table.get_column("gene_id")?);
    assert_eq!(vec!["ENST01chr1_90_135", "ENST01chr1_200_236"], final_table.get_column("ORF_id_gen")?);
    assert_eq!(vec!["1.2", "-0.3"], final_table.get_column("log2FC_TE_final_uORF")?);
    Ok(())
}

#[test]
fn invalid_length_bound_writes_nothing() -> Result<(), Report> {
    let dir = TempDir::new()?;
    let csv = dir.path().join("uorfs.csv");
    let bed = dir.path().join("uorfs.bed");
    let args = parse_merge(&[
        "ribotools",
        "merge-uorfs",
        "--output_csv_filepath",
        csv.to_str().unwrap(),
        "--output_bed_filepath",
        bed.to_str().unwrap(),
        "--min_length",
        "nine",
    ]);

    let report = merge::run(&args).unwrap_err();
    assert!(matches!(
        report.downcast_ref::<ribotools::Error>(),
        Some(ribotools::Error::InvalidLengthBound { name: "min_length", .. })
    ));
    assert!(!csv.exists() && !bed.exists());
    Ok(())
}

#[test]
fn min_above_max_is_rejected_and_documented() -> Result<(), Report> {
    let mut cli = Cli::command();
    let help = cli
        .find_subcommand_mut("merge-uorfs")
        .map(|command| command.render_help().to_string())
        .unwrap_or_default();
    assert!(help.contains("Must not exceed --max_length"));

    let dir = TempDir::new()?;
    let csv = dir.path().join("uorfs.csv");
    let bed = dir.path().join("uorfs.bed");
    let args = parse_merge(&[
        "ribotools",
        "merge-uorfs",
        "--output_csv_filepath",
        csv.to_str().unwrap(),
        "--output_bed_filepath",
        bed.to_str().unwrap(),
        "--min_length",
        "60",
        "--max_length",
        "50",
    ]);

    let report = merge::run(&args).unwrap_err();
    assert!(matches!(
        report.downcast_ref::<ribotools::Error>(),
        Some(ribotools::Error::InvalidLengthBound { name: "min_length", .. })
    ));
    assert!(!csv.exists() && !bed.exists());
    Ok(())
}
