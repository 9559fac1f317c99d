use crate::{
    error::{PipelineError, Result},
    process::{
        trimming::{trim_column_names, trim_text_cells},
        Table,
    },
};
use arrow::{
    array::{Array, ArrayRef, BooleanArray, Int64Array, StringArray},
    buffer::NullBuffer,
    compute::filter_record_batch,
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::{debug, info};

pub const DATA_TYPE_COLUMN: &str = "data_type";
pub const ELECTION_YEAR_COLUMN: &str = "election_year";

/// Normalize a freshly fetched table and stamp it with its data type and year.
///
/// Steps, in order: trim column names, trim text cells, drop rows that are null
/// in every column, then append the `data_type` and `election_year` columns.
/// Call once per table; a second call stamps the metadata columns again.
#[tracing::instrument(level = "debug", skip(table), fields(rows = table.num_rows()))]
pub fn clean(table: Table, data_type: &str, year: i32) -> Result<Table> {
    info!(data_type, year, "cleaning");
    let cleaned = clean_batch(table.into_batch(), data_type, year)
        .map_err(|source| PipelineError::Clean { source })?;
    info!(rows = cleaned.num_rows(), "cleaned");
    Ok(Table::from_batch(cleaned))
}

fn clean_batch(
    batch: RecordBatch,
    data_type: &str,
    year: i32,
) -> std::result::Result<RecordBatch, ArrowError> {
    let batch = trim_column_names(&batch)?;
    let batch = trim_text_cells(&batch)?;
    let batch = drop_all_null_rows(batch)?;
    stamp_metadata(&batch, data_type, year)
}

fn drop_all_null_rows(batch: RecordBatch) -> std::result::Result<RecordBatch, ArrowError> {
    // logical nulls: a Null-typed column has no null buffer but is null everywhere
    let nulls: Vec<Option<NullBuffer>> = batch
        .columns()
        .iter()
        .map(|col| col.logical_nulls())
        .collect();
    let keep: Vec<bool> = (0..batch.num_rows())
        .map(|row| {
            nulls
                .iter()
                .any(|n| n.as_ref().map_or(true, |n| n.is_valid(row)))
        })
        .collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped == 0 {
        return Ok(batch);
    }
    debug!(dropped, "dropping all-null rows");
    filter_record_batch(&batch, &BooleanArray::from(keep))
}

fn stamp_metadata(
    batch: &RecordBatch,
    data_type: &str,
    year: i32,
) -> std::result::Result<RecordBatch, ArrowError> {
    let rows = batch.num_rows();
    let schema = batch.schema();

    let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
    fields.push(Arc::new(Field::new(DATA_TYPE_COLUMN, DataType::Utf8, false)));
    fields.push(Arc::new(Field::new(ELECTION_YEAR_COLUMN, DataType::Int64, false)));

    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns.push(Arc::new(StringArray::from(vec![data_type; rows])));
    columns.push(Arc::new(Int64Array::from(vec![i64::from(year); rows])));

    RecordBatch::try_new(
        Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone())),
        columns,
    )
}
