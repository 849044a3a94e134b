//! Aggregation of per-sample CLARK tables into master count and taxonomy
//! mappings.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::error::ClarkBiomError;
use crate::report::{parse_abundance_table, AbundanceMode, AbundanceTableIterator};
use crate::taxonomy::TaxonomyPath;

/// The merged result of parsing a set of abundance tables: per-sample
/// abundance mappings keyed by sample ID, and the master taxon ID →
/// taxonomy mapping across all samples.
#[derive(Clone, Debug, Default)]
pub struct SampleTables {
    pub sample_counts: IndexMap<String, IndexMap<String, f64>>,
    pub taxa: IndexMap<String, TaxonomyPath>,
}

/// Derive a sample identifier from an abundance table's filename:
/// everything up to the `.` preceding the extension.
pub fn sample_id_from_path(filepath: &Path) -> String {
    filepath
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse all abundance tables into per-sample abundance mappings and a
/// master taxon ID → taxonomy mapping.
///
/// Fails if any input path is not an existing, readable file. Taxonomy
/// entries merge last-write-wins across files; a sample filename stem seen
/// twice replaces the earlier sample's mapping, with a warning.
pub fn process_samples(
    report_paths: &[PathBuf],
    mode: AbundanceMode,
) -> Result<SampleTables, ClarkBiomError> {
    let mut tables = SampleTables::default();

    for filepath in report_paths {
        if !filepath.is_file() {
            return Err(ClarkBiomError::ReportNotFound(filepath.clone()));
        }

        let sample_id = sample_id_from_path(filepath);
        log::info!("parsing abundance table '{}'", filepath.display());

        let records: Vec<_> =
            AbundanceTableIterator::new(filepath)?.collect::<Result<_, _>>()?;
        let (counts, taxa) = parse_abundance_table(records, mode);

        tables.taxa.extend(taxa);
        if tables
            .sample_counts
            .insert(sample_id.clone(), counts)
            .is_some()
        {
            log::warn!(
                "sample ID '{}' derived from more than one input file; keeping the last",
                sample_id
            );
        }
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_table(rows: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "Name,TaxID,Lineage,Count,Proportion_All(%),Proportion_Classified(%)"
        )
        .unwrap();
        write!(file, "{}", rows).unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = process_samples(
            &[PathBuf::from("no/such/table.csv")],
            AbundanceMode::Counts,
        );
        assert!(matches!(result, Err(ClarkBiomError::ReportNotFound(_))));
    }

    #[test]
    fn test_sample_id_from_path() {
        assert_eq!(sample_id_from_path(Path::new("results/S1.csv")), "S1");
        assert_eq!(sample_id_from_path(Path::new("S2.abundance.csv")), "S2.abundance");
        assert_eq!(sample_id_from_path(Path::new("plain")), "plain");
    }

    #[test]
    fn test_taxa_merge_is_lossless_union() {
        let file_a = temp_table(
            "Acinetobacter baumannii,470,Bacteria;Proteobacteria;Gammaproteobacteria;Pseudomonadales;Moraxellaceae;Acinetobacter,356,0.006,0.54\n",
        );
        let file_b = temp_table(
            "Atopobium rimae,1383,Bacteria;Actinobacteria;Coriobacteriia;Coriobacteriales;Atopobiaceae;Atopobium,1,1.74E-05,0.0003\n",
        );

        let tables = process_samples(
            &[
                file_a.path().to_path_buf(),
                file_b.path().to_path_buf(),
            ],
            AbundanceMode::Counts,
        )
        .unwrap();

        assert_eq!(tables.sample_counts.len(), 2);
        assert_eq!(tables.taxa.len(), 2);
        assert!(tables.taxa.contains_key("470"));
        assert!(tables.taxa.contains_key("1383"));
    }
}
