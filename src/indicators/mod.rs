//! Diversity indicators over the merged organization/job/person/degree table
//!
//! [`DiversityIndicators`] holds an immutable [`Table`] and answers each
//! indicator independently. Populations are always distinct `person_id`
//! counts; locations whose population does not exceed a significance threshold
//! are dropped from ranked output.

pub mod grouping;
pub mod index;
pub mod keys;
pub mod ranking;
pub mod results;

use std::collections::BTreeMap;

use log::{debug, warn};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::config::IndicatorConfig;
use crate::error::util::percentage;
use crate::error::{IndicatorError, Result};
use crate::filter::Expr;
use crate::table::columns::{
    COUNTRY, DEGREE_TYPE, GENDER, INSTITUTION_ID, IS_CURRENT, ORG_ID, PERSON_ID, PRIMARY_ROLE,
};
use crate::table::{Table, cell};

pub use index::{Distribution, lieberson_index, simpson_index_from_counts};
pub use keys::{DegreeScope, GroupKeys, Location, Normalization, PartitionScope};
pub use ranking::RankedLocation;
pub use results::{
    GroupKey, LiebersonFormat, PartitionDistribution, PartitionScore, PartitionScores, ShareGroup,
    ShareRow, ShareTable,
};

/// Indicator engine over one immutable table
#[derive(Debug, Clone)]
pub struct DiversityIndicators {
    table: Table,
    config: IndicatorConfig,
}

impl DiversityIndicators {
    /// Create an engine with the default configuration
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self::with_config(table, IndicatorConfig::default())
    }

    /// Create an engine with a custom configuration
    #[must_use]
    pub fn with_config(table: Table, config: IndicatorConfig) -> Self {
        Self { table, config }
    }

    /// The table the indicators read
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Share of each subgroup within its primary-key value, among current employees
    ///
    /// Each person counts once, through the first of their current company rows
    /// in table order. Primary-key values with at most `threshold` people are
    /// dropped; the rest are ordered by descending population.
    pub fn people_diversity(&self, keys: &GroupKeys, threshold: usize) -> Result<ShareTable> {
        self.require(&[IS_CURRENT, PRIMARY_ROLE, PERSON_ID], keys.columns())?;

        let frame = self
            .table
            .select(&Expr::And(vec![
                self.employment_expr(),
                Expr::not_null(PERSON_ID),
            ]))?
            .distinct_by(&[PERSON_ID])?;

        let normalization = Normalization::Primary;
        let rows = grouping::share_rows(
            &frame,
            keys,
            normalization,
            self.config.include_missing_in_denominator,
        )?;
        let populations = ranking::distinct_population(&frame, keys.primary())?;
        let total = populations.len();
        let ranking = ranking::rank_by_population(populations, threshold);

        debug!(
            "people_diversity({keys}): {} people, {} of {total} {} values above {threshold}",
            frame.num_rows(),
            ranking.len(),
            keys.primary()
        );
        Ok(ShareTable::ranked(keys, normalization, ranking, rows))
    }

    /// Share of each subgroup among current employees holding a known degree
    ///
    /// A person with degrees of several types contributes to each of them. The
    /// primary key must be the scope's location column. Shares are taken within
    /// the (first, last) key slice; a single key yields 100% per value.
    pub fn degree_diversity(
        &self,
        keys: &GroupKeys,
        scope: &DegreeScope,
        threshold: usize,
    ) -> Result<ShareTable> {
        let location = scope.location();
        if keys.primary() != location.column() {
            return Err(IndicatorError::invalid_argument(format!(
                "degree diversity at {location} level must group by '{}' first, got '{}'",
                location.column(),
                keys.primary()
            )));
        }
        let mut required = vec![IS_CURRENT, PRIMARY_ROLE, PERSON_ID, DEGREE_TYPE];
        if scope.country().is_some() {
            required.push(COUNTRY);
        }
        self.require(&required, keys.columns())?;

        let mut conditions = vec![
            self.employment_expr(),
            Expr::not_null(PERSON_ID),
            Expr::is_in(DEGREE_TYPE, self.config.degree_categories.iter().cloned()),
        ];
        if let Some(country) = scope.country() {
            conditions.push(Expr::eq(COUNTRY, country));
        }
        let frame = self.table.select(&Expr::And(conditions))?;

        // a lone key is its own slice
        let normalization = if keys.secondary().is_some() {
            Normalization::PrimaryAndSecondary
        } else {
            Normalization::Primary
        };
        let rows = grouping::share_rows(
            &frame,
            keys,
            normalization,
            self.config.include_missing_in_denominator,
        )?;
        let ranking = ranking::rank_by_population(
            ranking::distinct_population(&frame, location.column())?,
            threshold,
        );

        debug!(
            "degree_diversity({keys}): {} degree rows, {} {location} values above {threshold}",
            frame.num_rows(),
            ranking.len()
        );
        Ok(ShareTable::ranked(keys, normalization, ranking, rows))
    }

    /// Locations with more than `threshold` distinct people, most populous first
    ///
    /// Counts every row of the table, optionally restricted to one country.
    pub fn reindexing(
        &self,
        threshold: usize,
        location: Location,
        country: Option<&str>,
    ) -> Result<Vec<RankedLocation>> {
        let mut required = vec![PERSON_ID, location.column()];
        if country.is_some() {
            required.push(COUNTRY);
        }
        self.table.require_columns(&required)?;

        let ranked = match country {
            Some(country) => {
                let frame = self.table.select(&Expr::eq(COUNTRY, country))?;
                ranking::rank_by_population(
                    ranking::distinct_population(&frame, location.column())?,
                    threshold,
                )
            }
            None => ranking::rank_by_population(
                ranking::distinct_population(&self.table, location.column())?,
                threshold,
            ),
        };

        debug!(
            "reindexing({location}, country={country:?}): {} values above {threshold}",
            ranked.len()
        );
        Ok(ranked)
    }

    /// Unthresholded shares among current company rows
    ///
    /// `Normalization::Primary` divides by the first key's count,
    /// `Normalization::PrimaryAndSecondary` by the (first, last) slice and
    /// needs at least three keys. Groups are ordered by primary-key value.
    pub fn city_role_company(
        &self,
        keys: &GroupKeys,
        normalization: Normalization,
    ) -> Result<ShareTable> {
        normalization.validate(keys)?;
        self.require(&[IS_CURRENT, PRIMARY_ROLE, PERSON_ID], keys.columns())?;

        let frame = self.table.select(&Expr::And(vec![
            self.employment_expr(),
            Expr::not_null(PERSON_ID),
        ]))?;

        let mut rows = grouping::share_rows(
            &frame,
            keys,
            normalization,
            self.config.include_missing_in_denominator,
        )?;
        let populations = ranking::distinct_population(&frame, keys.primary())?;

        let groups = populations
            .into_iter()
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .map(|(key, population)| ShareGroup {
                rows: rows.remove(&key).unwrap_or_default(),
                key,
                population,
            })
            .collect::<Vec<_>>();

        debug!(
            "city_role_company({keys}, {normalization:?}): {} rows in {} groups",
            frame.num_rows(),
            groups.len()
        );
        Ok(ShareTable {
            columns: keys.columns().to_vec(),
            normalization,
            groups,
        })
    }

    /// Percentage of a country's people who studied at a university in that country
    ///
    /// Returns exactly `0.0` when the country has at most `threshold` people.
    pub fn home_study(&self, country: &str, threshold: usize) -> Result<f64> {
        self.table
            .require_columns(&[COUNTRY, PERSON_ID, ORG_ID, INSTITUTION_ID, PRIMARY_ROLE])?;

        let frame = self.table.select(&Expr::eq(COUNTRY, country))?;
        let people = frame.column(PERSON_ID)?;
        let orgs = frame.column(ORG_ID)?;
        let institutions = frame.column(INSTITUTION_ID)?;
        let roles = frame.column(PRIMARY_ROLE)?;

        let total: FxHashSet<&str> = (0..frame.num_rows())
            .filter_map(|row| cell(people, row))
            .collect();
        if total.len() <= threshold {
            debug!(
                "home_study({country}): {} people, not above {threshold}",
                total.len()
            );
            return Ok(0.0);
        }

        let university_role = self.config.university_role.as_str();
        let universities: FxHashSet<&str> = (0..frame.num_rows())
            .filter(|&row| cell(roles, row) == Some(university_role))
            .filter_map(|row| cell(orgs, row))
            .collect();
        let local: FxHashSet<&str> = (0..frame.num_rows())
            .filter(|&row| cell(institutions, row).is_some_and(|i| universities.contains(i)))
            .filter_map(|row| cell(people, row))
            .collect();

        debug!(
            "home_study({country}): {} of {} people studied at one of {} local universities",
            local.len(),
            total.len(),
            universities.len()
        );
        percentage(local.len(), total.len(), &format!("home study ratio of {country}"))
    }

    /// Category proportions of `columns` per location partition
    ///
    /// Rows are company rows with a configured gender, counted once per
    /// (organization, person) pair. Partitions with at most `threshold` people
    /// are dropped.
    pub fn lieberson_format<S: AsRef<str> + Sync>(
        &self,
        columns: &[S],
        threshold: usize,
        scope: &PartitionScope,
    ) -> Result<LiebersonFormat> {
        if columns.is_empty() {
            return Err(IndicatorError::invalid_argument(
                "Lieberson format needs at least one column",
            ));
        }
        let frame = self.partition_frame(scope, columns)?;
        let location = scope.location();
        let ranking = ranking::rank_by_population(
            ranking::distinct_population(&frame, location.column())?,
            threshold,
        );
        let partitions = grouping::partition_rows(&frame, location.column())?;

        let partitions = ranking
            .into_par_iter()
            .map(|ranked| {
                let rows = partitions
                    .get(ranked.value.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let variables = columns
                    .iter()
                    .map(|column| {
                        let column = column.as_ref();
                        let counts = grouping::value_counts(&frame, column, rows)?;
                        Ok((column.to_string(), Distribution::from_counts(counts)))
                    })
                    .collect::<Result<BTreeMap<_, _>>>()?;
                Ok(PartitionDistribution {
                    key: ranked.value,
                    population: ranked.population,
                    variables,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "lieberson_format({location}): {} partitions above {threshold}",
            partitions.len()
        );
        Ok(LiebersonFormat {
            location,
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            partitions,
        })
    }

    /// Simpson index of `column` per location partition
    ///
    /// Uses the same rows, partitions and threshold as [`Self::lieberson_format`].
    /// A ranked partition with fewer than two non-missing values fails the call.
    pub fn simpson_index(
        &self,
        column: &str,
        threshold: usize,
        scope: &PartitionScope,
    ) -> Result<PartitionScores> {
        let location = scope.location();
        let scores = self
            .simpson_scores(column, threshold, scope)?
            .into_iter()
            .map(|(ranked, value)| {
                let value = value.map_err(|e| {
                    IndicatorError::arithmetic(format!("{location} '{}': {e}", ranked.value))
                })?;
                Ok(PartitionScore {
                    key: ranked.value,
                    population: ranked.population,
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PartitionScores {
            location,
            column: column.to_string(),
            scores,
        })
    }

    /// Like [`Self::simpson_index`], but partitions whose index is undefined
    /// are logged and left out instead of failing the call
    pub fn simpson_index_skipping_sparse(
        &self,
        column: &str,
        threshold: usize,
        scope: &PartitionScope,
    ) -> Result<PartitionScores> {
        let location = scope.location();
        let scores = self
            .simpson_scores(column, threshold, scope)?
            .into_iter()
            .filter_map(|(ranked, value)| match value {
                Ok(value) => Some(PartitionScore {
                    key: ranked.value,
                    population: ranked.population,
                    value,
                }),
                Err(e) => {
                    warn!(
                        "Skipping Simpson index of {column} for {location} '{}': {e}",
                        ranked.value
                    );
                    None
                }
            })
            .collect();

        Ok(PartitionScores {
            location,
            column: column.to_string(),
            scores,
        })
    }

    /// Ranked partitions with their Simpson index, in rank order
    fn simpson_scores(
        &self,
        column: &str,
        threshold: usize,
        scope: &PartitionScope,
    ) -> Result<Vec<(RankedLocation, Result<f64>)>> {
        let frame = self.partition_frame(scope, &[column])?;
        let location = scope.location();
        let ranking = ranking::rank_by_population(
            ranking::distinct_population(&frame, location.column())?,
            threshold,
        );
        let partitions = grouping::partition_rows(&frame, location.column())?;

        let scores = ranking
            .into_par_iter()
            .map(|ranked| {
                let rows = partitions
                    .get(ranked.value.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let counts: Vec<usize> = grouping::value_counts(&frame, column, rows)?
                    .into_iter()
                    .map(|(_, count)| count)
                    .collect();
                Ok((ranked, simpson_index_from_counts(&counts)))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "simpson_index({column}, {location}): {} partitions above {threshold}",
            scores.len()
        );
        Ok(scores)
    }

    /// Current company rows
    fn employment_expr(&self) -> Expr {
        Expr::And(vec![
            Expr::is_in(IS_CURRENT, self.config.current_values.iter().cloned()),
            Expr::eq(PRIMARY_ROLE, self.config.company_role.as_str()),
        ])
    }

    /// Company rows with a configured gender, one per (organization, person)
    fn partition_frame<S: AsRef<str>>(
        &self,
        scope: &PartitionScope,
        columns: &[S],
    ) -> Result<Table> {
        let location = scope.location();
        let mut required = vec![PRIMARY_ROLE, GENDER, ORG_ID, PERSON_ID, location.column()];
        if scope.country().is_some() {
            required.push(COUNTRY);
        }
        self.require(&required, columns)?;

        let mut conditions = vec![
            Expr::eq(PRIMARY_ROLE, self.config.company_role.as_str()),
            Expr::is_in(GENDER, self.config.genders.iter().cloned()),
        ];
        if let Some(country) = scope.country() {
            conditions.push(Expr::eq(COUNTRY, country));
        }
        self.table
            .select(&Expr::And(conditions))?
            .distinct_by(&[ORG_ID, PERSON_ID])
    }

    /// Check fixed and caller-supplied columns together so every gap is reported
    fn require<S: AsRef<str>>(&self, fixed: &[&str], columns: &[S]) -> Result<()> {
        let names: Vec<&str> = fixed
            .iter()
            .copied()
            .chain(columns.iter().map(AsRef::as_ref))
            .collect();
        self.table.require_columns(&names)
    }
}
