//! Expression-based filtering for text tables
//!
//! Every column of a [`Table`](crate::table::Table) is nullable UTF-8, so
//! expressions compare against string literals. Each leaf evaluates to a
//! null-free mask: a missing cell never satisfies `Eq` or `In`.

use std::collections::HashSet;

use arrow::array::{Array, AsArray, BooleanArray, StringArray};
use arrow::compute::kernels::cmp::eq;
use arrow::compute::{and, is_not_null, prep_null_mask_filter};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::{IndicatorError, Result};
use crate::filter::core::{BatchFilter, filter_record_batch};

/// Represents a filter expression over text columns
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column equals a literal value
    Eq(String, String),

    /// Column is in a set of values
    In(String, Vec<String>),

    /// Column is not null
    IsNotNull(String),

    /// Logical AND of expressions, true for an empty list
    And(Vec<Expr>),
}

impl Expr {
    /// `column == value`
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    /// `column IN values`
    pub fn is_in<S: Into<String>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    /// `column IS NOT NULL`
    pub fn not_null(column: impl Into<String>) -> Self {
        Self::IsNotNull(column.into())
    }

    /// Returns a set of all column names required by this expression
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_required_columns(&mut columns);
        columns
    }

    fn collect_required_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::Eq(col, _) | Self::In(col, _) | Self::IsNotNull(col) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
        }
    }
}

/// Evaluate an expression against a record batch
///
/// # Returns
/// A boolean array without nulls indicating which rows match
///
/// # Errors
/// Returns [`IndicatorError::MissingColumns`] naming every column the
/// expression needs but the batch lacks
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    let schema = batch.schema();
    let mut missing: Vec<String> = expr
        .required_columns()
        .into_iter()
        .filter(|col| schema.index_of(col).is_err())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(IndicatorError::MissingColumns(missing));
    }

    evaluate(batch, expr)
}

fn evaluate(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::Eq(col_name, value) => {
            let column = text_column(batch, col_name)?;
            let matches = eq(column, &StringArray::new_scalar(value.as_str()))?;
            // the kernel only carries nulls over from the column
            if matches.null_count() > 0 {
                Ok(prep_null_mask_filter(&matches))
            } else {
                Ok(matches)
            }
        }

        Expr::In(col_name, values) => {
            let column = text_column(batch, col_name)?;
            let set: FxHashSet<&str> = values.iter().map(String::as_str).collect();
            Ok(column
                .iter()
                .map(|cell| Some(cell.is_some_and(|v| set.contains(v))))
                .collect())
        }

        Expr::IsNotNull(col_name) => Ok(is_not_null(text_column(batch, col_name)?)?),

        Expr::And(exprs) => {
            let mut result = BooleanArray::from(vec![true; batch.num_rows()]);
            for expr in exprs {
                result = and(&result, &evaluate(batch, expr)?)?;
            }
            Ok(result)
        }
    }
}

fn text_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| IndicatorError::MissingColumns(vec![name.to_string()]))?;
    column.as_string_opt::<i32>().ok_or_else(|| {
        IndicatorError::invalid_argument(format!(
            "Column '{name}' is {} rather than text",
            column.data_type()
        ))
    })
}

/// A filter that evaluates an expression against a record batch
#[derive(Debug, Clone)]
pub struct ExpressionFilter {
    expr: Expr,
}

impl ExpressionFilter {
    /// Create a new expression filter
    #[must_use]
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }
}

impl BatchFilter for ExpressionFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = evaluate_expr(batch, &self.expr)?;
        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        self.expr.required_columns()
    }
}
