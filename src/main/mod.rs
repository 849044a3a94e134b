use std::path::PathBuf;

use clap::Parser;

use clark_biom::{
    commands::convert_reports,
    prelude::*,
    report::AbundanceMode,
};

const INFO: &str = "\
clark-biom: create BIOM-format tables (http://biom-format.org) from CLARK
output (http://clark.cs.ucr.edu/).

Takes one or more files output from CLARK's estimate_abundance tool, records
the counts for each OTU along with its database ID (e.g. NCBI) and lineage,
and stores everything in a BIOM table where each count is linked to the
sample and OTU it belongs to. Sample IDs are extracted from the input
filenames (everything up to the '.' preceding the extension).

BIOM version 2.x (HDF5) is the default output; version 1.0 (JSON) and a
tab-separated table are also available with --fmt. JSON and TSV output can
optionally be gzip-compressed; HDF5 files are internally compressed. When
HDF5 support is not compiled in, output falls back to BIOM 1.0 (JSON).

The taxonomy for each OTU ID is stored as row metadata using the
seven-level format used by QIIME and metaphlan: k__K, p__P, ... s__S.

Usage examples:

  clark-biom S1.csv S2.csv
  clark-biom groupA/*.csv groupB/*.csv -o groupsAB.biom
  clark-biom S1.csv S2.csv --fmt json
  clark-biom S1.csv S2.csv --fmt tsv --gzip -o table.tsv
";

#[derive(Parser)]
#[clap(name = "clark-biom")]
#[clap(about = INFO, version)]
struct Cli {
    /// Result file(s) from estimate_abundance.sh
    #[arg(required = true, value_name = "TABLE-FILE")]
    reports: Vec<PathBuf>,

    /// Path to the output BIOM-format file
    #[arg(
        short,
        long,
        default_value = "table.biom",
        value_name = "COMBINED-OUTPUT-FILE"
    )]
    output: PathBuf,

    /// Set the output format of the BIOM table
    #[arg(long, value_enum, default_value_t = BiomFormat::Hdf5)]
    fmt: BiomFormat,

    /// Create a file containing just the (NCBI) OTU IDs, one per line, for
    /// use with a service such as phyloT (http://phylot.biobyte.de/)
    #[arg(long, value_name = "OTU-FILE")]
    otu_ids: Option<PathBuf>,

    /// Record the relative abundances ('Proportion_Classified' column)
    /// instead of the raw count ('Count' column) data
    #[arg(long)]
    store_pct: bool,

    /// Compress the output BIOM table with gzip; not needed with --fmt
    /// hdf5, which is internally compressed by default
    #[arg(long)]
    gzip: bool,

    /// Prints status messages during program execution
    #[arg(short, long)]
    verbose: bool,
}

fn run() -> Result<(), ClarkBiomError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .format_timestamp(None)
        .init();

    let mut format = cli.fmt;
    if format == BiomFormat::Hdf5 && !BiomFormat::hdf5_available() {
        eprintln!(
            "BIOM 2.x (HDF5) support is not available in this build.\n\
             Defaulting to BIOM 1.0 (JSON)."
        );
        format = BiomFormat::Json;
    }

    let mode = if cli.store_pct {
        AbundanceMode::Proportions
    } else {
        AbundanceMode::Counts
    };

    let output = convert_reports(
        &cli.reports,
        &cli.output,
        format,
        cli.gzip,
        mode,
        cli.otu_ids.as_deref(),
    )?;

    if cli.verbose {
        print!("{}", output.report);
    }

    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
