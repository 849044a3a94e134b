//! The BIOM 2.1 (HDF5) encoding.
//!
//! Matrix data is stored twice, as the BIOM 2.x specification requires:
//! compressed sparse rows under `observation/matrix` and compressed sparse
//! columns under `sample/matrix`. Taxonomy paths are attached as a
//! rectangular variable-length string dataset under
//! `observation/metadata/taxonomy`.

use hdf5::types::VarLenUnicode;
use hdf5::{File, Group};
use ndarray::Array2;
use std::path::Path;

use crate::error::ClarkBiomError;
use crate::table::{BiomTable, SparseMatrix, TABLE_TYPE};

const FORMAT_URL: &str = "http://biom-format.org";

fn varlen(s: &str) -> Result<VarLenUnicode, ClarkBiomError> {
    s.parse()
        .map_err(|_| ClarkBiomError::Hdf5String(s.to_string()))
}

fn varlen_ids(ids: &[String]) -> Result<Vec<VarLenUnicode>, ClarkBiomError> {
    ids.iter().map(|id| varlen(id)).collect()
}

fn write_string_attr(file: &File, name: &str, value: &str) -> Result<(), ClarkBiomError> {
    file.new_attr::<VarLenUnicode>()
        .create(name)?
        .write_scalar(&varlen(value)?)?;
    Ok(())
}

/// Write one axis group: its `ids`, its sparse `matrix`, and the empty
/// `group-metadata` group.
fn write_axis(
    group: &Group,
    ids: &[String],
    matrix: &SparseMatrix,
) -> Result<(), ClarkBiomError> {
    group
        .new_dataset_builder()
        .with_data(&varlen_ids(ids)?)
        .create("ids")?;

    let matrix_group = group.create_group("matrix")?;
    matrix_group
        .new_dataset_builder()
        .with_data(&matrix.data)
        .create("data")?;
    matrix_group
        .new_dataset_builder()
        .with_data(&matrix.indices)
        .create("indices")?;
    matrix_group
        .new_dataset_builder()
        .with_data(&matrix.indptr)
        .create("indptr")?;

    group.create_group("group-metadata")?;
    Ok(())
}

/// Taxonomy paths as a rectangular array; paths shorter than the deepest
/// one are padded with empty strings.
fn taxonomy_array(table: &BiomTable) -> Result<Array2<VarLenUnicode>, ClarkBiomError> {
    let depth = table
        .taxonomy()
        .iter()
        .map(|path| path.depth())
        .max()
        .unwrap_or(0);

    let mut flat = Vec::with_capacity(table.taxonomy().len() * depth);
    for path in table.taxonomy() {
        for level in path.levels() {
            flat.push(varlen(level)?);
        }
        for _ in path.depth()..depth {
            flat.push(varlen("")?);
        }
    }

    Ok(Array2::from_shape_vec((table.taxonomy().len(), depth), flat)?)
}

pub fn write_biom_hdf5(table: &BiomTable, output_fp: &Path) -> Result<(), ClarkBiomError> {
    let file = File::create(output_fp)?;
    let (nrows, ncols) = table.shape();

    write_string_attr(&file, "id", "No Table ID")?;
    write_string_attr(&file, "type", TABLE_TYPE)?;
    write_string_attr(&file, "format-url", FORMAT_URL)?;
    write_string_attr(&file, "generated-by", &table.generated_by)?;
    write_string_attr(&file, "creation-date", &table.create_date)?;
    file.new_attr::<i32>()
        .shape([2])
        .create("format-version")?
        .write(&[2, 1][..])?;
    file.new_attr::<i64>()
        .shape([2])
        .create("shape")?
        .write(&[nrows as i64, ncols as i64][..])?;
    file.new_attr::<i64>()
        .create("nnz")?
        .write_scalar(&(table.nnz() as i64))?;

    let observation = file.create_group("observation")?;
    write_axis(&observation, table.observation_ids(), &table.to_csr())?;
    let metadata = observation.create_group("metadata")?;
    metadata
        .new_dataset_builder()
        .with_data(&taxonomy_array(table)?)
        .create("taxonomy")?;

    let sample = file.create_group("sample")?;
    write_axis(&sample, table.sample_ids(), &table.to_csc())?;
    sample.create_group("metadata")?;

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
    fn test_biom2_layout() {
        let mut tables = SampleTables::default();
        tables.taxa.insert(
            "470".to_string(),
            TaxonomyPath::from_lineage(
                "Bacteria;Proteobacteria;Gammaproteobacteria;Pseudomonadales;Moraxellaceae;Acinetobacter",
                "Acinetobacter baumannii",
            ),
        );
        tables.taxa.insert(
            "1383".to_string(),
            TaxonomyPath::from_lineage(
                "Bacteria;Actinobacteria;Coriobacteriia;Coriobacteriales;Atopobiaceae;Atopobium",
                "Atopobium",
            ),
        );
        let mut counts_a = IndexMap::new();
        counts_a.insert("470".to_string(), 356.0);
        counts_a.insert("1383".to_string(), 7.0);
        tables.sample_counts.insert("A".to_string(), counts_a);
        let table = BiomTable::from_samples(&tables, AbundanceMode::Counts);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.biom");
        write_biom_hdf5(&table, &path).unwrap();

        let file = File::open(&path).unwrap();
        let shape: Vec<i64> = file.attr("shape").unwrap().read_raw().unwrap();
        assert_eq!(shape, [2, 1]);
        let nnz: i64 = file.attr("nnz").unwrap().read_scalar().unwrap();
        assert_eq!(nnz, 2);

        let data: Vec<f64> = file
            .dataset("observation/matrix/data")
            .unwrap()
            .read_raw()
            .unwrap();
        assert_eq!(data, [356.0, 7.0]);

        let ids: Vec<VarLenUnicode> = file
            .dataset("observation/ids")
            .unwrap()
            .read_raw()
            .unwrap();
        assert_eq!(ids[0].as_str(), "470");

        // the second taxonomy path has six levels; its row is padded
        let taxonomy = file
            .dataset("observation/metadata/taxonomy")
            .unwrap()
            .read_2d::<VarLenUnicode>()
            .unwrap();
        assert_eq!(taxonomy.shape(), [2, 7]);
        assert_eq!(taxonomy[[0, 6]].as_str(), "s__baumannii");
        assert_eq!(taxonomy[[1, 6]].as_str(), "");
    }
}
