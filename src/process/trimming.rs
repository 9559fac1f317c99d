use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Trim leading/trailing whitespace from every field name.
pub fn trim_column_names(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    let schema = batch.schema();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| {
            Field::new(f.name().trim(), f.data_type().clone(), f.is_nullable())
                .with_metadata(f.metadata().clone())
        })
        .collect();
    let renamed = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    RecordBatch::try_new(renamed, batch.columns().to_vec())
}

/// Trim every non-null cell of every text column. Non-text columns pass through untouched.
pub fn trim_text_cells(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    let mut cols = Vec::with_capacity(batch.num_columns());
    for arr in batch.columns() {
        if let Some(sarr) = arr.as_any().downcast_ref::<StringArray>() {
            let trimmed: StringArray = sarr.iter().map(|opt| opt.map(str::trim)).collect();
            cols.push(Arc::new(trimmed) as ArrayRef);
            continue;
        }
        cols.push(arr.clone());
    }

    RecordBatch::try_new(batch.schema(), cols)
}
