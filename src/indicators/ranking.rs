//! Population ranking shared by the indicators
//!
//! Populations always count distinct persons, never rows.

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::error::Result;
use crate::table::columns::PERSON_ID;
use crate::table::{Table, cell};

/// A location value that passed the significance threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedLocation {
    /// Location value
    pub value: String,
    /// Distinct persons at this location
    pub population: usize,
}

/// Distinct persons per value of `column`
///
/// Rows with a missing value or a missing person are ignored.
pub fn distinct_population(table: &Table, column: &str) -> Result<FxHashMap<String, usize>> {
    let values = table.column(column)?;
    let people = table.column(PERSON_ID)?;

    let mut persons: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
    for row in 0..table.num_rows() {
        if let (Some(value), Some(person)) = (cell(values, row), cell(people, row)) {
            persons.entry(value).or_default().insert(person);
        }
    }

    Ok(persons
        .into_iter()
        .map(|(value, people)| (value.to_string(), people.len()))
        .collect())
}

/// Keep populations strictly above `threshold`, most populous first
///
/// Ties are broken by ascending value so the order is stable across calls.
pub fn rank_by_population<I>(populations: I, threshold: usize) -> Vec<RankedLocation>
where
    I: IntoIterator<Item = (String, usize)>,
{
    populations
        .into_iter()
        .filter(|(_, population)| *population > threshold)
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .map(|(value, population)| RankedLocation { value, population })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::InputRecord;

    #[test]
    fn test_rank_by_population() {
        let ranked = rank_by_population(
            vec![
                ("Leeds".to_string(), 10),
                ("York".to_string(), 30),
                ("London".to_string(), 30),
                ("Bath".to_string(), 25),
                ("Hull".to_string(), 26),
            ],
            25,
        );
        let values: Vec<_> = ranked.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["London", "York", "Hull"]);
    }

    #[test]
    fn test_distinct_population_counts_people_not_rows() {
        let records = vec![
            InputRecord::employee("1", "p1").located("London", "UK"),
            InputRecord::employee("2", "p1").located("London", "UK"),
            InputRecord::employee("1", "p2").located("London", "UK"),
            InputRecord::employee("3", "p3").located("Leeds", "UK"),
            InputRecord {
                city: None,
                ..InputRecord::employee("3", "p4")
            },
        ];
        let table = Table::from_records(&records).unwrap();
        let population = distinct_population(&table, "city").unwrap();
        assert_eq!(population.len(), 2);
        assert_eq!(population["London"], 2);
        assert_eq!(population["Leeds"], 1);
    }
}
