//! Row filtering for indicator tables
//!
//! An expression tree is evaluated to a boolean mask, which is then applied to
//! every column of a record batch.

pub mod core;
pub mod expr;

pub use core::{BatchFilter, filter_record_batch};
pub use expr::{Expr, ExpressionFilter, evaluate_expr};
