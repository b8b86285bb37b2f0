//! Deterministic cleanup applied to the merged table before indicators run
//!
//! Degree labels are mapped onto [`DegreeType`] names through an injected
//! [`DegreeLookup`], and free-text employee counts are bucketed with
//! [`company_size`].

pub mod company_size;
pub mod degree;

use arrow::array::{Array, StringArray};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::columns::{DEGREE_TYPE, EMPLOYEE_COUNT};
use crate::table::{Table, cell};

pub use company_size::{CompanySize, SizeBucket, company_size};
pub use degree::{DegreeLabel, DegreeLabels, DegreeLookup, DegreeType};

/// Which preparation steps run, and the degree labels they use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreparationConfig {
    pub degree_labels: DegreeLabels,
    pub normalize_degrees: bool,
    pub bucket_company_size: bool,
}

impl Default for PreparationConfig {
    fn default() -> Self {
        Self {
            degree_labels: DegreeLabels::default(),
            normalize_degrees: true,
            bucket_company_size: true,
        }
    }
}

/// Rewrite `degree_type` and `employee_count` where the table has them
pub fn prepare_table(table: &Table, config: &PreparationConfig) -> Result<Table> {
    let mut prepared = table.clone();

    if config.normalize_degrees && table.has_column(DEGREE_TYPE) {
        let lookup = DegreeLookup::new(&config.degree_labels);
        let values = prepared.column(DEGREE_TYPE)?;
        let normalized: StringArray = (0..values.len())
            .map(|row| cell(values, row).and_then(|raw| lookup.normalize(raw).as_cell()))
            .collect();
        debug!(
            "Normalized {} degree labels with {} known spellings",
            normalized.len(),
            lookup.len()
        );
        prepared = prepared.with_column(DEGREE_TYPE, normalized)?;
    }

    if config.bucket_company_size && table.has_column(EMPLOYEE_COUNT) {
        let values = prepared.column(EMPLOYEE_COUNT)?;
        let bucketed: StringArray = (0..values.len())
            .map(|row| cell(values, row).and_then(|raw| company_size(raw).as_cell()))
            .collect();
        prepared = prepared.with_column(EMPLOYEE_COUNT, bucketed)?;
    }

    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::InputRecord;

    #[test]
    fn test_prepare_table() {
        let mut first = InputRecord::employee("1", "a").degree("BSc");
        first.employee_count = Some("11-50".to_string());
        let mut second = InputRecord::employee("1", "b").degree("unknown");
        second.employee_count = Some("unknown".to_string());
        let third = InputRecord::employee("1", "c").degree("Diploma");
        let table = Table::from_records(&[first, second, third]).unwrap();

        let config = PreparationConfig {
            degree_labels: DegreeLabels {
                undergraduate: vec!["BSc".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let prepared = prepare_table(&table, &config).unwrap();

        let degrees = prepared.column(DEGREE_TYPE).unwrap();
        assert_eq!(cell(degrees, 0), Some("Undergraduate"));
        assert_eq!(cell(degrees, 1), None);
        assert_eq!(cell(degrees, 2), Some("Diploma"));

        let sizes = prepared.column(EMPLOYEE_COUNT).unwrap();
        assert_eq!(cell(sizes, 0), Some("Small"));
        assert_eq!(cell(sizes, 1), None);
        assert_eq!(cell(sizes, 2), None);
    }

    #[test]
    fn test_prepare_table_skips_disabled_steps() {
        let table = Table::from_records(&[InputRecord::employee("1", "a").degree("BSc")]).unwrap();
        let config = PreparationConfig {
            normalize_degrees: false,
            ..Default::default()
        };
        let prepared = prepare_table(&table, &config).unwrap();
        assert_eq!(cell(prepared.column(DEGREE_TYPE).unwrap(), 0), Some("BSc"));
    }
}
