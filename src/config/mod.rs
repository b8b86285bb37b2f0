//! Configuration for loading tables and computing indicators.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::error::util::safe_open_file;
use crate::prepare::{DegreeType, PreparationConfig};

/// Default significance threshold for people and degree diversity
pub const DEFAULT_DIVERSITY_THRESHOLD: usize = 25;

/// Default significance threshold for the home-study ratio
pub const DEFAULT_HOME_STUDY_THRESHOLD: usize = 100;

/// Default number of rows per record batch when reading files
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Configuration for the indicator engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// `primary_role` value marking employer organizations
    pub company_role: String,
    /// `primary_role` value marking degree-granting organizations
    pub university_role: String,
    /// Spellings of `is_current` treated as true
    pub current_values: Vec<String>,
    /// Gender labels kept by the Lieberson and Simpson partitions
    pub genders: Vec<String>,
    /// Degree categories kept by degree diversity
    pub degree_categories: Vec<String>,
    /// Count rows with a missing non-primary key in the primary-key denominator
    pub include_missing_in_denominator: bool,
    /// Threshold used for people and degree diversity when the caller has none
    pub diversity_threshold: usize,
    /// Threshold used for the home-study ratio when the caller has none
    pub home_study_threshold: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            company_role: "company".to_string(),
            university_role: "university".to_string(),
            current_values: ["1", "1.0", "true", "True", "TRUE"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            genders: vec!["male".to_string(), "female".to_string()],
            degree_categories: DegreeType::KNOWN
                .iter()
                .map(ToString::to_string)
                .collect(),
            include_missing_in_denominator: false,
            diversity_threshold: DEFAULT_DIVERSITY_THRESHOLD,
            home_study_threshold: DEFAULT_HOME_STUDY_THRESHOLD,
        }
    }
}

impl IndicatorConfig {
    /// Check that the label sets are usable
    pub fn validate(&self) -> Result<()> {
        if self.company_role.is_empty() {
            return Err(IndicatorError::Config("company_role must not be empty".into()));
        }
        if self.current_values.is_empty() {
            return Err(IndicatorError::Config(
                "current_values must name at least one truthy spelling".into(),
            ));
        }
        if self.genders.is_empty() {
            return Err(IndicatorError::Config("genders must not be empty".into()));
        }
        if self.degree_categories.is_empty() {
            return Err(IndicatorError::Config(
                "degree_categories must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for IndicatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Indicator Configuration:")?;
        writeln!(f, "  Company Role: {}", self.company_role)?;
        writeln!(f, "  University Role: {}", self.university_role)?;
        writeln!(f, "  Current Values: {}", self.current_values.join(", "))?;
        writeln!(f, "  Genders: {}", self.genders.join(", "))?;
        writeln!(f, "  Degree Categories: {}", self.degree_categories.join(", "))?;
        writeln!(
            f,
            "  Missing Keys In Denominator: {}",
            self.include_missing_in_denominator
        )?;
        writeln!(f, "  Diversity Threshold: {}", self.diversity_threshold)?;
        writeln!(f, "  Home Study Threshold: {}", self.home_study_threshold)?;
        Ok(())
    }
}

/// Configuration for reading input tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Rows per record batch
    pub batch_size: usize,
    /// Field delimiter for CSV input
    pub delimiter: u8,
    /// Whether CSV input starts with a header row
    pub has_header: bool,
    /// Number of records sampled to discover CSV columns
    pub infer_schema_records: Option<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            batch_size: batch_size_from_env().unwrap_or(DEFAULT_BATCH_SIZE),
            delimiter: b',',
            has_header: true,
            infer_schema_records: Some(1000),
        }
    }
}

impl ReaderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(IndicatorError::Config("batch_size must be positive".into()));
        }
        Ok(())
    }
}

impl fmt::Display for ReaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reader Configuration:")?;
        writeln!(f, "  Batch Size: {}", self.batch_size)?;
        writeln!(f, "  Delimiter: {:?}", self.delimiter as char)?;
        writeln!(f, "  Header: {}", self.has_header)?;
        if let Some(records) = self.infer_schema_records {
            writeln!(f, "  Schema Sample: {records} records")?;
        }
        Ok(())
    }
}

/// Everything one command-line run needs, read from a single JSON file
///
/// ```json
/// {
///   "indicators": { "diversity_threshold": 10 },
///   "reader": { "delimiter": 59 },
///   "preparation": { "degree_labels": { "phd": ["Doctor of Philosophy"] } }
/// }
/// ```
///
/// Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub indicators: IndicatorConfig,
    pub reader: ReaderConfig,
    pub preparation: PreparationConfig,
}

impl RunConfig {
    /// Load and validate a run configuration; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "run configuration")?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.indicators.validate()?;
        self.reader.validate()
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.indicators, self.reader)?;
        writeln!(f, "Preparation:")?;
        writeln!(f, "  Normalize Degrees: {}", self.preparation.normalize_degrees)?;
        writeln!(f, "  Degree Labels: {}", self.preparation.degree_labels.len())?;
        writeln!(
            f,
            "  Bucket Company Size: {}",
            self.preparation.bucket_company_size
        )?;
        Ok(())
    }
}

/// Batch size override from `INDICATORS_BATCH_SIZE`
#[must_use]
pub fn batch_size_from_env() -> Option<usize> {
    std::env::var("INDICATORS_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&size| size > 0)
}
