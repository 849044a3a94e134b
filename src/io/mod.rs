//! Output file handling and the three BIOM encodings.

pub mod file;
#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod json;
pub mod tsv;

pub use file::OutputFile;

use clap::ValueEnum;
use std::path::{Path, PathBuf};

use crate::error::ClarkBiomError;
use crate::table::BiomTable;

/// The three BIOM encodings: HDF5 (BIOM 2.1), JSON (BIOM 1.0), and the
/// "classic" tab-delimited table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BiomFormat {
    Hdf5,
    Json,
    Tsv,
}

impl BiomFormat {
    /// Whether this build can write BIOM 2.x (HDF5) files.
    pub fn hdf5_available() -> bool {
        cfg!(feature = "hdf5")
    }
}

impl std::fmt::Display for BiomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BiomFormat::Hdf5 => "hdf5",
            BiomFormat::Json => "json",
            BiomFormat::Tsv => "tsv",
        };
        write!(f, "{}", name)
    }
}

/// Write the BIOM table to a file, returning the path actually written.
///
/// With `gzip` set, JSON and TSV output is compressed and `.gz` is appended
/// to the path if not already present. HDF5 files are internally compressed
/// and ignore the flag.
pub fn write_biom(
    table: &BiomTable,
    output_fp: &Path,
    format: BiomFormat,
    gzip: bool,
) -> Result<PathBuf, ClarkBiomError> {
    let mut output_fp = output_fp.to_path_buf();
    if gzip
        && format != BiomFormat::Hdf5
        && output_fp.extension().map_or(true, |ext| ext != "gz")
    {
        let mut with_gz = output_fp.into_os_string();
        with_gz.push(".gz");
        output_fp = with_gz.into();
    }

    log::info!("writing {} output to '{}'", format, output_fp.display());

    match format {
        BiomFormat::Json => {
            let mut writer = OutputFile::new(&output_fp).writer()?;
            json::write_biom_json(table, &mut writer)?;
        }
        BiomFormat::Tsv => {
            let mut writer = OutputFile::new(&output_fp).writer()?;
            tsv::write_biom_tsv(table, &mut writer)?;
        }
        #[cfg(feature = "hdf5")]
        BiomFormat::Hdf5 => hdf5::write_biom_hdf5(table, &output_fp)?,
        #[cfg(not(feature = "hdf5"))]
        BiomFormat::Hdf5 => return Err(ClarkBiomError::Hdf5Unsupported),
    }

    Ok(output_fp)
}
