//! The flat input table the indicators read from
//!
//! A [`Table`] wraps a single Arrow record batch whose columns have all been
//! normalized to nullable UTF-8. Empty cells become nulls and identifier
//! columns are canonicalized, so later grouping can compare plain strings.

pub mod columns;
pub mod record;

use std::borrow::Cow;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringArray, UInt32Array};
use arrow::compute::{cast, concat_batches, take_record_batch};
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use rustc_hash::FxHashSet;
use serde::Serialize;
use serde_arrow::schema::{SchemaLike, TracingOptions};
use smallvec::SmallVec;

use crate::error::{IndicatorError, Result};
use crate::filter::{BatchFilter, Expr, ExpressionFilter};

pub use record::InputRecord;

/// An immutable, text-normalized table
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Normalize a record batch into a table
    pub fn new(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            let text = if column.data_type() == &DataType::Utf8 {
                column.clone()
            } else {
                cast(column, &DataType::Utf8)?
            };
            let identifier = columns::IDENTIFIER_COLUMNS.contains(&field.name().as_str());
            let normalized: StringArray = text
                .as_string::<i32>()
                .iter()
                .map(|cell| normalize_cell(cell, identifier))
                .collect();

            fields.push(Field::new(field.name(), DataType::Utf8, true));
            arrays.push(Arc::new(normalized));
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Self { batch })
    }

    /// Normalize and concatenate several record batches sharing column names
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let Some(first) = batches.first() else {
            return Err(IndicatorError::invalid_argument(
                "cannot build a table from zero record batches",
            ));
        };
        if batches.len() == 1 {
            return Self::new(first);
        }

        let normalized = batches
            .iter()
            .map(|batch| Self::new(batch).map(|table| table.batch))
            .collect::<Result<Vec<_>>>()?;
        let batch = concat_batches(&normalized[0].schema(), &normalized)?;
        Ok(Self { batch })
    }

    /// Build a table from serializable rows such as [`InputRecord`]
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self> {
        if records.is_empty() {
            return Err(IndicatorError::invalid_argument(
                "cannot infer a table schema from zero records",
            ));
        }
        let fields = Vec::<arrow::datatypes::FieldRef>::from_samples(
            records,
            TracingOptions::default().allow_null_fields(true),
        )?;
        let batch = serde_arrow::to_record_batch(&fields, &records)?;
        Self::new(&batch)
    }

    /// The underlying record batch
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// The table schema
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the table has a column of this name
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    /// Fail with every missing column named, in the order requested
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if !self.has_column(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IndicatorError::MissingColumns(missing))
        }
    }

    /// A text column by name
    pub fn column(&self, name: &str) -> Result<&StringArray> {
        self.batch
            .column_by_name(name)
            .and_then(|column| column.as_string_opt::<i32>())
            .ok_or_else(|| IndicatorError::MissingColumns(vec![name.to_string()]))
    }

    /// Several text columns, in the order requested
    pub fn columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&StringArray>> {
        self.require_columns(names)?;
        names.iter().map(|name| self.column(name.as_ref())).collect()
    }

    /// Rows matching an expression
    pub fn select(&self, expr: &Expr) -> Result<Self> {
        let batch = ExpressionFilter::new(expr.clone()).filter(&self.batch)?;
        Ok(Self { batch })
    }

    /// First occurrence of each distinct combination of `keys`, in table order
    ///
    /// Rows where any key is missing are dropped.
    pub fn distinct_by<S: AsRef<str>>(&self, keys: &[S]) -> Result<Self> {
        let key_columns = self.columns(keys)?;
        let mut seen: FxHashSet<SmallVec<[&str; 2]>> = FxHashSet::default();
        let mut keep: Vec<u32> = Vec::new();

        for row in 0..self.num_rows() {
            let key: Option<SmallVec<[&str; 2]>> =
                key_columns.iter().map(|column| cell(column, row)).collect();
            if let Some(key) = key {
                if seen.insert(key) {
                    keep.push(take_index(row)?);
                }
            }
        }

        if keep.len() == self.num_rows() {
            return Ok(self.clone());
        }
        let batch = take_record_batch(&self.batch, &UInt32Array::from(keep))?;
        Ok(Self { batch })
    }

    /// Replace a column, or append it when absent
    pub fn with_column(&self, name: &str, values: StringArray) -> Result<Self> {
        if values.len() != self.num_rows() {
            return Err(IndicatorError::invalid_argument(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.num_rows()
            )));
        }

        let schema = self.batch.schema();
        let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
        let mut arrays: Vec<ArrayRef> = self.batch.columns().to_vec();
        let values: ArrayRef = Arc::new(values);

        match schema.index_of(name) {
            Ok(idx) => arrays[idx] = values,
            Err(_) => {
                fields.push(Field::new(name, DataType::Utf8, true));
                arrays.push(values);
            }
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Self { batch })
    }
}

/// The value of a normalized text cell, `None` when missing
#[must_use]
pub fn cell(column: &StringArray, row: usize) -> Option<&str> {
    column.is_valid(row).then(|| column.value(row))
}

fn normalize_cell(cell: Option<&str>, identifier: bool) -> Option<String> {
    let value = cell?;
    if value.trim().is_empty() {
        return None;
    }
    if identifier {
        Some(canonical_id(value).into_owned())
    } else {
        Some(value.to_string())
    }
}

/// Canonical text of an identifier
///
/// Integer identifiers exported through a float column (`"42.0"`) compare
/// equal to their integer rendering (`"42"`).
#[must_use]
pub fn canonical_id(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    if let Some(integer) = trimmed.strip_suffix(".0") {
        let digits = integer.strip_prefix('-').unwrap_or(integer);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Cow::Owned(integer.to_string());
        }
    }
    if trimmed.len() == raw.len() {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(trimmed.to_string())
    }
}

/// Row position as an index for Arrow's `take` kernel
fn take_index(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| {
        IndicatorError::invalid_argument(format!(
            "row {row} is beyond the {} rows a table can select from",
            u32::MAX
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Float64Array, Int64Array};

    fn mixed_batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("person_id", DataType::Float64, true),
            Field::new("is_current", DataType::Boolean, true),
            Field::new("city", DataType::Utf8, true),
            Field::new("org_id", DataType::Int64, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Float64Array::from(vec![Some(1.0), Some(2.0), None])),
                Arc::new(BooleanArray::from(vec![Some(true), Some(false), None])),
                Arc::new(StringArray::from(vec![Some("London"), Some(""), Some("  ")])),
                Arc::new(Int64Array::from(vec![Some(7), Some(8), Some(9)])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_normalization() {
        let table = Table::new(&mixed_batch()).unwrap();
        for field in table.schema().fields() {
            assert_eq!(field.data_type(), &DataType::Utf8);
        }

        let person = table.column("person_id").unwrap();
        assert_eq!(cell(person, 0), Some("1"));
        assert_eq!(cell(person, 2), None);

        let current = table.column("is_current").unwrap();
        assert_eq!(cell(current, 0), Some("true"));

        let city = table.column("city").unwrap();
        assert_eq!(cell(city, 0), Some("London"));
        assert_eq!(cell(city, 1), None);
        assert_eq!(cell(city, 2), None);

        assert_eq!(cell(table.column("org_id").unwrap(), 1), Some("8"));
    }

    #[test]
    fn test_take_index_bounds() {
        assert_eq!(take_index(0).unwrap(), 0);
        assert_eq!(take_index(u32::MAX as usize).unwrap(), u32::MAX);
        assert!(matches!(
            take_index(u32::MAX as usize + 1),
            Err(IndicatorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_canonical_id() {
        assert_eq!(canonical_id("42.0"), "42");
        assert_eq!(canonical_id("-3.0"), "-3");
        assert_eq!(canonical_id(" abc "), "abc");
        assert_eq!(canonical_id("4.05"), "4.05");
        assert_eq!(canonical_id(".0"), ".0");
    }

    #[test]
    fn test_require_columns() {
        let table = Table::new(&mixed_batch()).unwrap();
        assert!(table.require_columns(&["city", "org_id"]).is_ok());
        match table.require_columns(&["gender", "city", "race", "gender"]) {
            Err(IndicatorError::MissingColumns(cols)) => assert_eq!(cols, vec!["gender", "race"]),
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn test_from_records_and_distinct() {
        let records = vec![
            InputRecord::employee("1", "p1").located("London", "UK").gender("male"),
            InputRecord::employee("2", "p1").located("Leeds", "UK").gender("male"),
            InputRecord::employee("1", "p2").located("London", "UK"),
            InputRecord {
                person_id: None,
                ..InputRecord::employee("1", "x")
            },
        ];
        let table = Table::from_records(&records).unwrap();
        assert_eq!(table.num_rows(), 4);

        let people = table.distinct_by(&["person_id"]).unwrap();
        assert_eq!(people.num_rows(), 2);
        // first occurrence wins
        assert_eq!(cell(people.column("city").unwrap(), 0), Some("London"));

        let pairs = table.distinct_by(&["org_id", "person_id"]).unwrap();
        assert_eq!(pairs.num_rows(), 3);
    }

    #[test]
    fn test_select_and_with_column() {
        let records = vec![
            InputRecord::employee("1", "p1").gender("male"),
            InputRecord::employee("1", "p2").gender("female"),
        ];
        let table = Table::from_records(&records).unwrap();
        let women = table.select(&Expr::eq("gender", "female")).unwrap();
        assert_eq!(women.num_rows(), 1);

        let labelled = table
            .with_column("label", StringArray::from(vec![Some("a"), None]))
            .unwrap();
        assert!(labelled.has_column("label"));
        assert!(table.with_column("label", StringArray::from(vec!["a"])).is_err());
    }

    #[test]
    fn test_from_batches() {
        let table = Table::from_batches(&[mixed_batch(), mixed_batch()]).unwrap();
        assert_eq!(table.num_rows(), 6);
        assert!(Table::from_batches(&[]).is_err());
    }
}
