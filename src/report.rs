//! Parsing of CLARK abundance estimation tables, which wraps the
//! blazingly-fast [`csv`] crate's deserialization method using [`serde`].
//!
//! One table (the output of `estimate_abundance.sh`) holds one sample: a
//! comma-delimited header row followed by one row per detected taxon, with
//! a trailing `UNKNOWN` row for unclassified reads.

use csv::{DeserializeRecordsIntoIter, Reader, ReaderBuilder};
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ClarkBiomError;
use crate::io::file::is_gzipped_file;
use crate::taxonomy::TaxonomyPath;

/// The taxon ID CLARK assigns to unclassified reads; rows carrying it are
/// excluded from all outputs.
pub const UNKNOWN_TAXID: &str = "UNKNOWN";

/// One row of a CLARK abundance table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AbundanceRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "TaxID")]
    pub taxid: String,
    #[serde(rename = "Lineage")]
    pub lineage: String,
    #[serde(rename = "Count")]
    pub count: u64,
    #[serde(
        rename = "Proportion_All(%)",
        deserialize_with = "deserialize_proportion"
    )]
    pub proportion_all: Option<f64>,
    #[serde(
        rename = "Proportion_Classified(%)",
        deserialize_with = "deserialize_proportion"
    )]
    pub proportion_classified: Option<f64>,
}

/// Which abundance measure to record per taxon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AbundanceMode {
    /// The raw read count (`Count` column).
    #[default]
    Counts,
    /// The relative abundance (`Proportion_Classified(%)` column).
    Proportions,
}

/// Deserializes some value of type `t` with some possible missing
/// character `missing_chars` into [`Option<T>`].
pub fn deserialize_option_generic<'de, D, T>(
    deserializer: D,
    missing_chars: &'de [&'de str],
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if missing_chars.contains(&s.as_str()) {
        Ok(None)
    } else {
        s.parse::<T>()
            .map(Some)
            .map_err(|e| DeError::custom(format!("parsing error: {}", e)))
    }
}

// CLARK writes '-' for the classified proportion of the UNKNOWN row.
fn deserialize_proportion<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_option_generic(deserializer, &["-"])
}

/// Build a CSV reader over a CLARK abundance table, which works on
/// gzip-compressed files and consumes the header row.
pub fn build_report_reader(
    filepath: impl Into<PathBuf>,
) -> Result<Reader<Box<dyn Read>>, ClarkBiomError> {
    let filepath = filepath.into();
    let file = File::open(&filepath)?;
    let is_gzipped = is_gzipped_file(&filepath)?;
    let stream: Box<dyn Read> = if is_gzipped {
        Box::new(flate2::read::GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    Ok(build_reader_from_stream(stream))
}

fn build_reader_from_stream(stream: Box<dyn Read>) -> Reader<Box<dyn Read>> {
    ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(stream)
}

/// An iterator over the deserialized rows of one CLARK abundance table.
pub struct AbundanceTableIterator {
    inner: DeserializeRecordsIntoIter<Box<dyn Read>, AbundanceRecord>,
}

impl std::fmt::Debug for AbundanceTableIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbundanceTableIterator").finish_non_exhaustive()
    }
}

impl AbundanceTableIterator {
    pub fn new(filepath: impl Into<PathBuf>) -> Result<Self, ClarkBiomError> {
        let reader = build_report_reader(filepath)?;
        let inner = reader.into_deserialize();
        Ok(Self { inner })
    }

    /// Read a table from an in-memory or otherwise already-open stream.
    pub fn from_reader(stream: impl Read + 'static) -> Self {
        let boxed: Box<dyn Read> = Box::new(stream);
        let inner = build_reader_from_stream(boxed).into_deserialize();
        Self { inner }
    }
}

impl Iterator for AbundanceTableIterator {
    type Item = Result<AbundanceRecord, ClarkBiomError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|res| res.map_err(ClarkBiomError::from))
    }
}

/// Parse the rows of a single abundance table into a per-taxon abundance
/// mapping and a per-taxon taxonomy mapping, both keyed on taxon ID and
/// insertion-ordered. `UNKNOWN` rows are skipped.
///
/// A taxon ID appearing on more than one row keeps the last row's values;
/// each such overwrite is logged as a warning.
pub fn parse_abundance_table(
    records: impl IntoIterator<Item = AbundanceRecord>,
    mode: AbundanceMode,
) -> (IndexMap<String, f64>, IndexMap<String, TaxonomyPath>) {
    let mut counts = IndexMap::new();
    let mut taxa = IndexMap::new();

    for record in records {
        if record.taxid == UNKNOWN_TAXID {
            continue;
        }

        let abundance = match mode {
            AbundanceMode::Counts => record.count as f64,
            AbundanceMode::Proportions => record.proportion_classified.unwrap_or_default(),
        };

        taxa.insert(
            record.taxid.clone(),
            TaxonomyPath::from_lineage(&record.lineage, &record.name),
        );
        if counts.insert(record.taxid.clone(), abundance).is_some() {
            log::warn!(
                "taxon ID '{}' appears more than once in this table; keeping the last row",
                record.taxid
            );
        }
    }

    (counts, taxa)
}
