//! Result types returned by the indicator operations.

use std::collections::BTreeMap;

use serde::Serialize;
use smallvec::SmallVec;

use crate::error::Result;
use crate::indicators::index::{Distribution, lieberson_index};
use crate::indicators::keys::{GroupKeys, Location, Normalization};
use crate::indicators::ranking::RankedLocation;

/// Full key tuple of a grouped count
pub type GroupKey = SmallVec<[String; 4]>;

/// One grouped count and its share of the normalizing slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareRow {
    /// Values of every grouping column, in key order
    pub key: GroupKey,
    /// Rows with this key tuple
    pub count: usize,
    /// Rows in the normalizing slice this tuple belongs to
    pub denominator: usize,
    /// `count / denominator * 100`
    pub percentage: f64,
}

/// All rows sharing one primary-key value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareGroup {
    /// Primary-key value
    pub key: String,
    /// Distinct persons with this primary-key value
    pub population: usize,
    /// Rows ordered by key tuple
    pub rows: Vec<ShareRow>,
}

/// Percentages of subgroups, grouped and ordered by the primary key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareTable {
    pub columns: Vec<String>,
    pub normalization: Normalization,
    pub groups: Vec<ShareGroup>,
}

impl ShareTable {
    /// Build a table whose groups follow a population ranking
    pub(crate) fn ranked(
        keys: &GroupKeys,
        normalization: Normalization,
        ranking: Vec<RankedLocation>,
        mut rows: BTreeMap<String, Vec<ShareRow>>,
    ) -> Self {
        let groups = ranking
            .into_iter()
            .map(|ranked| ShareGroup {
                rows: rows.remove(&ranked.value).unwrap_or_default(),
                key: ranked.value,
                population: ranked.population,
            })
            .collect();
        Self {
            columns: keys.columns().to_vec(),
            normalization,
            groups,
        }
    }

    /// The group of one primary-key value
    #[must_use]
    pub fn group(&self, primary: &str) -> Option<&ShareGroup> {
        self.groups.iter().find(|group| group.key == primary)
    }

    /// Percentage for a full key tuple
    #[must_use]
    pub fn percentage(&self, key: &[&str]) -> Option<f64> {
        let primary = key.first()?;
        self.group(primary)?
            .rows
            .iter()
            .find(|row| row.key.iter().map(String::as_str).eq(key.iter().copied()))
            .map(|row| row.percentage)
    }

    /// Primary-key values in output order
    #[must_use]
    pub fn primary_values(&self) -> Vec<&str> {
        self.groups.iter().map(|group| group.key.as_str()).collect()
    }

    /// Every row, group by group
    pub fn rows(&self) -> impl Iterator<Item = &ShareRow> {
        self.groups.iter().flat_map(|group| group.rows.iter())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Category distributions of several columns within one partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionDistribution {
    /// Location value of the partition
    pub key: String,
    /// Distinct persons in the partition
    pub population: usize,
    /// Column name to its category distribution
    pub variables: BTreeMap<String, Distribution>,
}

impl PartitionDistribution {
    /// Lieberson's Aw over this partition's variables
    pub fn lieberson_index(&self) -> Result<f64> {
        lieberson_index(self.variables.values())
    }
}

/// Distributions per partition, most populous partition first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiebersonFormat {
    pub location: Location,
    /// Columns summarized in every partition
    pub columns: Vec<String>,
    pub partitions: Vec<PartitionDistribution>,
}

impl LiebersonFormat {
    /// The partition of one location value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PartitionDistribution> {
        self.partitions.iter().find(|partition| partition.key == key)
    }

    /// Lieberson's Aw of every partition, in ranking order
    pub fn lieberson_indices(&self) -> Result<PartitionScores> {
        let scores = self
            .partitions
            .iter()
            .map(|partition| {
                Ok(PartitionScore {
                    key: partition.key.clone(),
                    population: partition.population,
                    value: partition.lieberson_index()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PartitionScores {
            location: self.location,
            column: self.columns.join(","),
            scores,
        })
    }
}

/// One index value per partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionScore {
    pub key: String,
    pub population: usize,
    pub value: f64,
}

/// Index values per partition, most populous partition first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionScores {
    pub location: Location,
    /// Column(s) the index summarizes
    pub column: String,
    pub scores: Vec<PartitionScore>,
}

impl PartitionScores {
    /// Index value of one partition
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|score| score.key == key)
            .map(|score| score.value)
    }
}
