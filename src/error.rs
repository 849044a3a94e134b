//! The [`ClarkBiomError`] `enum` definition and error messages.
//!
use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;
use thiserror::Error;

/// The [`ClarkBiomError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum ClarkBiomError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("File '{0}' not found.")]
    ReportNotFound(PathBuf),

    // Abundance table parsing related errors
    #[error("Could not parse abundance table row: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Integer parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("Float parsing error: {0}")]
    ParseFloatError(#[from] ParseFloatError),

    // Output related errors
    #[error("Specified path does not exist: {0}")]
    InvalidOutputDir(PathBuf),
    #[error("Could not serialize BIOM table to JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("BIOM 2.x (HDF5) output is not available in this build.")]
    Hdf5Unsupported,
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5Error(#[from] hdf5::Error),
    #[cfg(feature = "hdf5")]
    #[error("String cannot be stored in an HDF5 file: {0}")]
    Hdf5String(String),
    #[cfg(feature = "hdf5")]
    #[error("Invalid matrix shape: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    // Command line tool related errors
    #[error("Command line argument error: {0}")]
    ArgumentError(#[from] clap::error::Error),
}
