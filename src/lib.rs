//! `clark-biom` creates [BIOM-format](http://biom-format.org) tables from
//! the abundance estimation output of the [CLARK](http://clark.cs.ucr.edu/)
//! metagenomic classifier.
//!
//! Each input table is parsed into per-taxon read counts (or relative
//! abundances) and a taxonomic hierarchy per taxon. The per-sample results
//! are merged into a single taxa × samples [`BiomTable`], which can be
//! serialized as BIOM 2.1 (HDF5), BIOM 1.0 (JSON), or a classic
//! tab-delimited table.
//!
//! [`BiomTable`]: crate::table::BiomTable

use lazy_static::lazy_static;

pub mod commands;
pub mod error;
pub mod io;
pub mod report;
pub mod reporting;
pub mod samples;
pub mod table;
pub mod taxonomy;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const REPOSITORY: &str = "http://github.com/smdabdoub/clark-biom";

lazy_static! {
    /// The provenance string recorded in every output table.
    pub static ref GENERATED_BY: String =
        format!("clark-biom v{} ({})", VERSION, REPOSITORY);
}

pub mod prelude {
    pub use crate::error::ClarkBiomError;
    pub use crate::io::{write_biom, BiomFormat, OutputFile};
    pub use crate::report::{parse_abundance_table, AbundanceMode, AbundanceRecord};
    pub use crate::samples::{process_samples, SampleTables};
    pub use crate::table::BiomTable;
    pub use crate::taxonomy::TaxonomyPath;
}
