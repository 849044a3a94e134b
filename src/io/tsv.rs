//! The "classic" tab-delimited BIOM table encoding.
//!
//! This keeps only the matrix and the taxonomy column, so the result can be
//! opened by spreadsheet programs.

use std::io::Write;

use crate::error::ClarkBiomError;
use crate::table::BiomTable;

pub fn write_biom_tsv<W: Write>(
    table: &BiomTable,
    writer: &mut W,
) -> Result<(), ClarkBiomError> {
    writeln!(writer, "# Constructed from biom file")?;
    write!(writer, "#OTU ID")?;
    for sample_id in table.sample_ids() {
        write!(writer, "\t{}", sample_id)?;
    }
    writeln!(writer, "\ttaxonomy")?;

    let (nrows, ncols) = table.shape();
    for row in 0..nrows {
        write!(writer, "{}", table.observation_ids()[row])?;
        for col in 0..ncols {
            write!(
                writer,
                "\t{}",
                table.element_type().format_value(table.get(row, col))
            )?;
        }
        writeln!(writer, "\t{}", table.taxonomy()[row])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::AbundanceMode;
    use crate::samples::SampleTables;
    use crate::taxonomy::TaxonomyPath;
    use indexmap::IndexMap;

    #[test]
    fn test_classic_table_output() {
        let mut tables = SampleTables::default();
        tables.taxa.insert(
            "470".to_string(),
            TaxonomyPath::from_lineage(
                "Bacteria;Proteobacteria;Gammaproteobacteria;Pseudomonadales;Moraxellaceae;Acinetobacter",
                "Acinetobacter baumannii",
            ),
        );
        let mut counts_a = IndexMap::new();
        counts_a.insert("470".to_string(), 356.0);
        let counts_b = IndexMap::new();
        tables.sample_counts.insert("A".to_string(), counts_a);
        tables.sample_counts.insert("B".to_string(), counts_b);
        let table = BiomTable::from_samples(&tables, AbundanceMode::Counts);

        let mut buffer = Vec::new();
        write_biom_tsv(&table, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let expected = "\
# Constructed from biom file
#OTU ID\tA\tB\ttaxonomy
470\t356\t0\tk__Bacteria; p__Proteobacteria; c__Gammaproteobacteria; o__Pseudomonadales; f__Moraxellaceae; g__Acinetobacter; s__baumannii
";
        assert_eq!(text, expected);
    }
}
