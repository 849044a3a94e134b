//! The BIOM 1.0 (JSON) encoding.
//!
//! One JSON document per table, with the matrix stored as row-major
//! `[row, column, value]` triples (the "sparse" matrix type).

use serde_json::{json, Value};
use std::io::Write;

use crate::error::ClarkBiomError;
use crate::table::{BiomTable, MatrixElementType, TABLE_TYPE};

pub const FORMAT: &str = "Biological Observation Matrix 1.0.0";
pub const FORMAT_URL: &str = "http://biom-format.org";

pub fn write_biom_json<W: Write>(
    table: &BiomTable,
    writer: &mut W,
) -> Result<(), ClarkBiomError> {
    let rows: Vec<Value> = table
        .observation_ids()
        .iter()
        .zip(table.taxonomy())
        .map(|(taxid, path)| json!({"id": taxid, "metadata": {"taxonomy": path}}))
        .collect();

    let columns: Vec<Value> = table
        .sample_ids()
        .iter()
        .map(|sample_id| json!({"id": sample_id, "metadata": Value::Null}))
        .collect();

    let data: Vec<Value> = table
        .iter_nonzero()
        .map(|(row, col, value)| {
            let value = match table.element_type() {
                MatrixElementType::Int => Value::from(value as i64),
                MatrixElementType::Float => Value::from(value),
            };
            json!([row, col, value])
        })
        .collect();

    let (nrows, ncols) = table.shape();
    let document = json!({
        "id": Value::Null,
        "format": FORMAT,
        "format_url": FORMAT_URL,
        "type": TABLE_TYPE,
        "generated_by": table.generated_by,
        "date": table.create_date,
        "rows": rows,
        "columns": columns,
        "matrix_type": "sparse",
        "matrix_element_type": table.element_type().as_str(),
        "shape": [nrows, ncols],
        "data": data,
    });

    serde_json::to_writer(writer, &document)?;
    Ok(())
}
