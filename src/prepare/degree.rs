//! Degree label normalization

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

/// Normalized degree category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegreeType {
    Undergraduate,
    Postgraduate,
    #[serde(rename = "MBA")]
    Mba,
    #[serde(rename = "PhD")]
    PhD,
    #[serde(rename = "JD")]
    Jd,
}

impl DegreeType {
    /// Categories counted by degree diversity
    pub const KNOWN: [Self; 4] = [Self::Undergraduate, Self::Postgraduate, Self::Mba, Self::PhD];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undergraduate => "Undergraduate",
            Self::Postgraduate => "Postgraduate",
            Self::Mba => "MBA",
            Self::PhD => "PhD",
            Self::Jd => "JD",
        }
    }
}

impl fmt::Display for DegreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DegreeType {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Undergraduate" => Ok(Self::Undergraduate),
            "Postgraduate" => Ok(Self::Postgraduate),
            "MBA" => Ok(Self::Mba),
            "PhD" => Ok(Self::PhD),
            "JD" => Ok(Self::Jd),
            other => Err(IndicatorError::invalid_argument(format!(
                "unknown degree type '{other}'"
            ))),
        }
    }
}

/// Raw degree labels per category, as written in the source data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeLabels {
    pub phd: Vec<String>,
    pub postgraduate: Vec<String>,
    pub undergraduate: Vec<String>,
    pub mba: Vec<String>,
    pub jd: Vec<String>,
}

impl DegreeLabels {
    /// Number of raw labels across every category
    #[must_use]
    pub fn len(&self) -> usize {
        self.phd.len()
            + self.postgraduate.len()
            + self.undergraduate.len()
            + self.mba.len()
            + self.jd.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of normalizing one degree label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeLabel<'a> {
    Known(DegreeType),
    /// `unknown` or `Unknown`
    Missing,
    /// Not listed in any category, kept as written
    Unmatched(&'a str),
}

impl<'a> DegreeLabel<'a> {
    /// Cell text after normalization, `None` when missing
    #[must_use]
    pub fn as_cell(self) -> Option<&'a str> {
        match self {
            Self::Known(degree) => Some(degree.as_str()),
            Self::Missing => None,
            Self::Unmatched(raw) => Some(raw),
        }
    }
}

/// Exact-match lookup from raw label to degree category
///
/// A label listed under several categories resolves to the first of PhD,
/// Postgraduate, Undergraduate, MBA, JD.
#[derive(Debug, Clone, Default)]
pub struct DegreeLookup {
    labels: FxHashMap<String, DegreeType>,
}

impl DegreeLookup {
    #[must_use]
    pub fn new(labels: &DegreeLabels) -> Self {
        let mut lookup = FxHashMap::default();
        for (degree, raw_labels) in [
            (DegreeType::PhD, &labels.phd),
            (DegreeType::Postgraduate, &labels.postgraduate),
            (DegreeType::Undergraduate, &labels.undergraduate),
            (DegreeType::Mba, &labels.mba),
            (DegreeType::Jd, &labels.jd),
        ] {
            for label in raw_labels {
                lookup.entry(label.clone()).or_insert(degree);
            }
        }
        Self { labels: lookup }
    }

    #[must_use]
    pub fn normalize<'a>(&self, raw: &'a str) -> DegreeLabel<'a> {
        if raw == "unknown" || raw == "Unknown" {
            return DegreeLabel::Missing;
        }
        match self.labels.get(raw) {
            Some(&degree) => DegreeLabel::Known(degree),
            None => DegreeLabel::Unmatched(raw),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
