// src/process/mod.rs
use arrow::{
    array::{Array, Int64Array, StringArray},
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder, WriterBuilder},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::{io::Cursor, sync::Arc};

pub mod clean;
pub mod trimming;

pub use clean::clean;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const READ_BATCH_SIZE: usize = 8192;

/// Semantic kind of a column, derived from its Arrow type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    /// Booleans, dates, timestamps: anything CSV inference produced that is neither text nor numeric.
    Other,
}

impl ColumnKind {
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Utf8 => ColumnKind::Text,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Integer,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => ColumnKind::Float,
            _ => ColumnKind::Other,
        }
    }
}

/// An in-memory election results table. Every column is nullable; empty CSV fields are null.
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    pub fn from_batch(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Parse a UTF-8 CSV body. Column names come from the first row, column
    /// types are inferred over the whole body.
    pub fn from_csv(body: &[u8]) -> Result<Self, ArrowError> {
        let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ArrowError::CsvError(
                "empty body, expected a header row".to_string(),
            ));
        }

        // short rows are padded with nulls; rows with extra fields still fail
        let format = Format::default()
            .with_header(true)
            .with_truncated_rows(true);
        let (inferred, _) = format.infer_schema(Cursor::new(body), None)?;
        // a column with no values at all infers as Null; keep it as nullable text
        let fields: Vec<Field> = inferred
            .fields()
            .iter()
            .map(|f| match f.data_type() {
                DataType::Null => Field::new(f.name(), DataType::Utf8, true),
                _ => f.as_ref().clone(),
            })
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let reader = ReaderBuilder::new(schema.clone())
            .with_header(true)
            .with_truncated_rows(true)
            .with_batch_size(READ_BATCH_SIZE)
            .build(Cursor::new(body))?;
        let batches = reader.collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            batch: concat_batches(&schema, &batches)?,
        })
    }

    /// Serialize with a header row and no index column. Nulls become empty fields.
    pub fn to_csv(&self) -> Result<Vec<u8>, ArrowError> {
        let mut buf = Vec::new();
        {
            let mut writer = WriterBuilder::new().with_header(true).build(&mut buf);
            writer.write(&self.batch)?;
        }
        Ok(buf)
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn column_kinds(&self) -> Vec<ColumnKind> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| ColumnKind::of(f.data_type()))
            .collect()
    }

    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.batch
            .schema()
            .field_with_name(name)
            .ok()
            .map(|f| ColumnKind::of(f.data_type()))
    }

    /// Text cell at `row` of column `name`; `None` when null, absent, or not a text column.
    pub fn text(&self, name: &str, row: usize) -> Option<&str> {
        let arr = self
            .batch
            .column_by_name(name)?
            .as_any()
            .downcast_ref::<StringArray>()?;
        (row < arr.len() && arr.is_valid(row)).then(|| arr.value(row))
    }

    /// Integer cell at `row` of column `name`; `None` when null, absent, or not an Int64 column.
    pub fn integer(&self, name: &str, row: usize) -> Option<i64> {
        let arr = self
            .batch
            .column_by_name(name)?
            .as_any()
            .downcast_ref::<Int64Array>()?;
        (row < arr.len() && arr.is_valid(row)).then(|| arr.value(row))
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "prefecture,district,votes,share\n\
                          東京都,東京1区,50000,0.41\n\
                          大阪府,大阪3区,,0.38\n";

    #[test]
    fn test_from_csv_infers_kinds() {
        let table = Table::from_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column_names(),
            vec!["prefecture", "district", "votes", "share"]
        );
        assert_eq!(
            table.column_kinds(),
            vec![
                ColumnKind::Text,
                ColumnKind::Text,
                ColumnKind::Integer,
                ColumnKind::Float
            ]
        );
        assert_eq!(table.text("prefecture", 0), Some("東京都"));
        assert_eq!(table.integer("votes", 0), Some(50000));
        assert_eq!(table.integer("votes", 1), None);
        assert_eq!(table.text("votes", 0), None);
        assert_eq!(table.text("missing", 0), None);
    }

    #[test]
    fn test_header_only_body_has_columns_and_no_rows() {
        let table = Table::from_csv(b"a,b,c\n").unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_all_empty_column_is_nullable_text() {
        let table = Table::from_csv(b"name,votes\n,1\n,2\n").unwrap();
        assert_eq!(table.column_kind("name"), Some(ColumnKind::Text));
        assert_eq!(table.text("name", 0), None);
        assert_eq!(table.integer("votes", 1), Some(2));
    }

    #[test]
    fn test_empty_body_is_error() {
        assert!(Table::from_csv(b"").is_err());
        assert!(Table::from_csv(b"  \n").is_err());
    }

    #[test]
    fn test_extra_fields_are_error() {
        assert!(Table::from_csv(b"a,b\n1,2\n3,4,5\n").is_err());
    }

    #[test]
    fn test_short_rows_are_padded_with_nulls() {
        let table = Table::from_csv(b"a,b,c\n1,x,2\n3,y\n").unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.integer("c", 0), Some(2));
        assert_eq!(table.integer("c", 1), None);
        assert_eq!(table.text("b", 1), Some("y"));
    }

    #[test]
    fn test_bom_is_skipped() {
        let mut body = UTF8_BOM.to_vec();
        body.extend_from_slice("name,votes\n山田,10\n".as_bytes());
        let table = Table::from_csv(&body).unwrap();
        assert_eq!(table.column_names(), vec!["name", "votes"]);
    }

    #[test]
    fn test_to_csv_writes_header_and_empty_nulls() {
        let table = Table::from_csv(b"name,votes\nA,1\nB,\n").unwrap();
        let out = String::from_utf8(table.to_csv().unwrap()).unwrap();
        assert_eq!(out, "name,votes\nA,1\nB,\n");
    }

    #[test]
    fn test_to_csv_of_empty_table_keeps_header() {
        let table = Table::from_csv(b"name,votes\n").unwrap();
        let out = String::from_utf8(table.to_csv().unwrap()).unwrap();
        assert_eq!(out, "name,votes\n");
    }
}
