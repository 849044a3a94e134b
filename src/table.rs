//! The [`BiomTable`]: a dense taxa × samples abundance matrix with
//! taxonomy row metadata and provenance, assembled from parsed samples.

use crate::report::AbundanceMode;
use crate::samples::SampleTables;
use crate::taxonomy::TaxonomyPath;
use crate::GENERATED_BY;

/// The BIOM table type recorded in the output metadata.
pub const TABLE_TYPE: &str = "OTU table";

/// The element type of the matrix, as named by the BIOM specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixElementType {
    Int,
    Float,
}

impl MatrixElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixElementType::Int => "int",
            MatrixElementType::Float => "float",
        }
    }

    /// Render one matrix value for text encodings.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            MatrixElementType::Int => format!("{}", value as i64),
            MatrixElementType::Float => format!("{}", value),
        }
    }
}

impl From<AbundanceMode> for MatrixElementType {
    fn from(mode: AbundanceMode) -> Self {
        match mode {
            AbundanceMode::Counts => MatrixElementType::Int,
            AbundanceMode::Proportions => MatrixElementType::Float,
        }
    }
}

/// A compressed sparse (CSR or CSC) view of the matrix, in the layout the
/// BIOM 2.x encoding stores per axis.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix {
    pub data: Vec<f64>,
    pub indices: Vec<i32>,
    pub indptr: Vec<i32>,
}

/// A dense taxa × samples matrix: rows follow first-seen taxon order,
/// columns follow input file order, and every (taxon, sample) pair absent
/// from that sample's mapping is zero.
#[derive(Clone, Debug)]
pub struct BiomTable {
    observation_ids: Vec<String>,
    sample_ids: Vec<String>,
    taxonomy: Vec<TaxonomyPath>,
    data: Vec<f64>,
    element_type: MatrixElementType,
    pub generated_by: String,
    pub create_date: String,
}

impl BiomTable {
    /// Assemble the aggregate matrix from parsed per-sample mappings,
    /// stamping generator and creation-date provenance.
    pub fn from_samples(tables: &SampleTables, mode: AbundanceMode) -> Self {
        let observation_ids: Vec<String> = tables.taxa.keys().cloned().collect();
        let sample_ids: Vec<String> = tables.sample_counts.keys().cloned().collect();
        let taxonomy: Vec<TaxonomyPath> = tables.taxa.values().cloned().collect();

        let mut data = Vec::with_capacity(observation_ids.len() * sample_ids.len());
        for taxid in &observation_ids {
            for counts in tables.sample_counts.values() {
                data.push(counts.get(taxid).copied().unwrap_or(0.0));
            }
        }

        Self {
            observation_ids,
            sample_ids,
            taxonomy,
            data,
            element_type: mode.into(),
            generated_by: GENERATED_BY.clone(),
            create_date: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        }
    }

    /// (rows, columns) = (taxa, samples).
    pub fn shape(&self) -> (usize, usize) {
        (self.observation_ids.len(), self.sample_ids.len())
    }

    pub fn observation_ids(&self) -> &[String] {
        &self.observation_ids
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn taxonomy(&self) -> &[TaxonomyPath] {
        &self.taxonomy
    }

    pub fn element_type(&self) -> MatrixElementType {
        self.element_type
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.sample_ids.len() + col]
    }

    /// Look up a value by taxon and sample ID.
    pub fn get_by_ids(&self, taxid: &str, sample_id: &str) -> Option<f64> {
        let row = self.observation_ids.iter().position(|id| id == taxid)?;
        let col = self.sample_ids.iter().position(|id| id == sample_id)?;
        Some(self.get(row, col))
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|value| **value != 0.0).count()
    }

    /// Fraction of entries that are non-zero.
    pub fn density(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.nnz() as f64 / self.data.len() as f64
    }

    /// Iterate the non-zero entries in row-major order as
    /// `(row, column, value)` triples.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let ncols = self.sample_ids.len();
        self.data
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != 0.0)
            .map(move |(i, value)| (i / ncols, i % ncols, *value))
    }

    /// Compressed sparse row view (the BIOM 2.x observation axis layout).
    pub fn to_csr(&self) -> SparseMatrix {
        let (nrows, ncols) = self.shape();
        let mut sparse = SparseMatrix {
            data: Vec::new(),
            indices: Vec::new(),
            indptr: vec![0],
        };
        for row in 0..nrows {
            for col in 0..ncols {
                let value = self.get(row, col);
                if value != 0.0 {
                    sparse.data.push(value);
                    sparse.indices.push(col as i32);
                }
            }
            sparse.indptr.push(sparse.data.len() as i32);
        }
        sparse
    }

    /// Compressed sparse column view (the BIOM 2.x sample axis layout).
    pub fn to_csc(&self) -> SparseMatrix {
        let (nrows, ncols) = self.shape();
        let mut sparse = SparseMatrix {
            data: Vec::new(),
            indices: Vec::new(),
            indptr: vec![0],
        };
        for col in 0..ncols {
            for row in 0..nrows {
                let value = self.get(row, col);
                if value != 0.0 {
                    sparse.data.push(value);
                    sparse.indices.push(row as i32);
                }
            }
            sparse.indptr.push(sparse.data.len() as i32);
        }
        sparse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::AbundanceMode;
    use crate::samples::SampleTables;
    use indexmap::IndexMap;

    fn toy_tables() -> SampleTables {
        let mut tables = SampleTables::default();
        for (taxid, lineage, name) in [
            ("470", "Bacteria;Proteobacteria;Gammaproteobacteria;Pseudomonadales;Moraxellaceae;Acinetobacter", "Acinetobacter baumannii"),
            ("1383", "Bacteria;Actinobacteria;Coriobacteriia;Coriobacteriales;Atopobiaceae;Atopobium", "Atopobium rimae"),
            ("33034", "Bacteria;Firmicutes;Tissierellia;Tissierellales;Peptoniphilaceae;Anaerococcus", "Anaerococcus prevotii"),
        ] {
            tables.taxa.insert(
                taxid.to_string(),
                crate::taxonomy::TaxonomyPath::from_lineage(lineage, name),
            );
        }

        let mut counts_a = IndexMap::new();
        counts_a.insert("470".to_string(), 356.0);
        counts_a.insert("1383".to_string(), 1.0);
        let mut counts_b = IndexMap::new();
        counts_b.insert("470".to_string(), 200.0);
        counts_b.insert("33034".to_string(), 3.0);
        tables.sample_counts.insert("A".to_string(), counts_a);
        tables.sample_counts.insert("B".to_string(), counts_b);
        tables
    }

    #[test]
    fn test_zero_filled_assembly() {
        let table = BiomTable::from_samples(&toy_tables(), AbundanceMode::Counts);
        assert_eq!(table.shape(), (3, 2));
        assert_eq!(table.get_by_ids("470", "A"), Some(356.0));
        assert_eq!(table.get_by_ids("470", "B"), Some(200.0));
        assert_eq!(table.get_by_ids("1383", "B"), Some(0.0));
        assert_eq!(table.get_by_ids("33034", "A"), Some(0.0));
    }

    #[test]
    fn test_row_and_column_order() {
        let table = BiomTable::from_samples(&toy_tables(), AbundanceMode::Counts);
        assert_eq!(table.observation_ids(), ["470", "1383", "33034"]);
        assert_eq!(table.sample_ids(), ["A", "B"]);
    }

    #[test]
    fn test_nnz_and_density() {
        let table = BiomTable::from_samples(&toy_tables(), AbundanceMode::Counts);
        assert_eq!(table.nnz(), 4);
        assert!((table.density() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_nonzero_triples_are_row_major() {
        let table = BiomTable::from_samples(&toy_tables(), AbundanceMode::Counts);
        let triples: Vec<_> = table.iter_nonzero().collect();
        assert_eq!(
            triples,
            [(0, 0, 356.0), (0, 1, 200.0), (1, 0, 1.0), (2, 1, 3.0)]
        );
    }

    #[test]
    fn test_csr_layout() {
        let table = BiomTable::from_samples(&toy_tables(), AbundanceMode::Counts);
        let csr = table.to_csr();
        assert_eq!(csr.data, [356.0, 200.0, 1.0, 3.0]);
        assert_eq!(csr.indices, [0, 1, 0, 1]);
        assert_eq!(csr.indptr, [0, 2, 3, 4]);
    }

    #[test]
    fn test_csc_layout() {
        let table = BiomTable::from_samples(&toy_tables(), AbundanceMode::Counts);
        let csc = table.to_csc();
        assert_eq!(csc.data, [356.0, 1.0, 200.0, 3.0]);
        assert_eq!(csc.indices, [0, 1, 0, 2]);
        assert_eq!(csc.indptr, [0, 2, 4]);
    }

    #[test]
    fn test_element_type_follows_mode() {
        let table = BiomTable::from_samples(&toy_tables(), AbundanceMode::Proportions);
        assert_eq!(table.element_type(), MatrixElementType::Float);
        assert_eq!(table.element_type().as_str(), "float");
        assert_eq!(MatrixElementType::Int.format_value(356.0), "356");
    }
}
