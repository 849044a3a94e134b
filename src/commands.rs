//! The command functions called by the `clark-biom` CLI.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ClarkBiomError;
use crate::io::{write_biom, BiomFormat};
use crate::report::AbundanceMode;
use crate::reporting::{CommandOutput, Report};
use crate::samples::process_samples;
use crate::table::BiomTable;

/// Parse all abundance tables, assemble the combined BIOM table, and write
/// it out, along with the optional plain-text taxon ID list.
///
/// The ID list is written after the BIOM table, so a bad `otu_ids_fp`
/// leaves the already-written table in place.
pub fn convert_reports(
    report_paths: &[PathBuf],
    output_fp: &Path,
    format: BiomFormat,
    gzip: bool,
    mode: AbundanceMode,
    otu_ids_fp: Option<&Path>,
) -> Result<CommandOutput<PathBuf>, ClarkBiomError> {
    let tables = process_samples(report_paths, mode)?;
    let table = BiomTable::from_samples(&tables, mode);

    let written_fp = write_biom(&table, output_fp, format, gzip)?;

    if let Some(otu_fp) = otu_ids_fp {
        write_otu_file(table.observation_ids(), otu_fp)?;
    }

    let (nrows, ncols) = table.shape();
    let mut report = Report::new();
    report.add_entry(format!(
        "BIOM-format table written to: {}",
        written_fp.display()
    ));
    report.add_entry(format!(
        "Table contains {} rows (OTUs) and {} columns (Samples)",
        nrows, ncols
    ));
    report.add_entry(format!("and is {:.1}% dense.", table.density() * 100.0));

    Ok(CommandOutput::new(written_fp, report))
}

/// Write out a file containing only the list of taxon (e.g. NCBI) IDs from
/// the CLARK results. One line per ID, in first-seen order.
pub fn write_otu_file(otu_ids: &[String], output_fp: &Path) -> Result<(), ClarkBiomError> {
    if let Some(dir) = output_fp.parent() {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            return Err(ClarkBiomError::InvalidOutputDir(dir.to_path_buf()));
        }
    }

    let mut file = File::create(output_fp)?;
    write!(file, "{}", otu_ids.join("\n"))?;
    Ok(())
}
