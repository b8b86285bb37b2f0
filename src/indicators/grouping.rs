//! Grouped counting and share computation.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::Result;
use crate::error::util::percentage;
use crate::indicators::keys::{GroupKeys, Normalization};
use crate::indicators::results::{GroupKey, ShareRow};
use crate::table::{Table, cell};

/// Count rows per key tuple and express each count as a percentage of its slice
///
/// Rows missing any key value are left out of the numerators. They are left
/// out of the denominators too, unless `include_missing` is set and the
/// slice-defining keys themselves are present.
///
/// # Returns
/// Rows keyed by primary-key value, each list ordered by key tuple
pub fn share_rows(
    table: &Table,
    keys: &GroupKeys,
    normalization: Normalization,
    include_missing: bool,
) -> Result<BTreeMap<String, Vec<ShareRow>>> {
    let key_columns = table.columns(keys.columns())?;
    let positions = normalization.slice_positions(keys);

    let mut counts: FxHashMap<SmallVec<[&str; 4]>, usize> = FxHashMap::default();
    let mut slices: FxHashMap<SmallVec<[&str; 2]>, usize> = FxHashMap::default();

    for row in 0..table.num_rows() {
        let slice: Option<SmallVec<[&str; 2]>> = positions
            .iter()
            .map(|&pos| cell(key_columns[pos], row))
            .collect();
        let Some(slice) = slice else {
            continue;
        };

        let full: Option<SmallVec<[&str; 4]>> = key_columns
            .iter()
            .map(|column| cell(column, row))
            .collect();
        match full {
            Some(full) => {
                *counts.entry(full).or_default() += 1;
                *slices.entry(slice).or_default() += 1;
            }
            None if include_missing => *slices.entry(slice).or_default() += 1,
            None => {}
        }
    }

    let mut grouped: BTreeMap<String, Vec<ShareRow>> = BTreeMap::new();
    for (key, count) in counts {
        let slice: SmallVec<[&str; 2]> = positions.iter().map(|&pos| key[pos]).collect();
        let denominator = slices.get(&slice).copied().unwrap_or_default();
        let row = ShareRow {
            key: key.iter().map(ToString::to_string).collect::<GroupKey>(),
            count,
            denominator,
            percentage: percentage(count, denominator, &format!("share of {keys}"))?,
        };
        grouped.entry(key[0].to_string()).or_default().push(row);
    }

    for rows in grouped.values_mut() {
        rows.sort_by(|a, b| a.key.cmp(&b.key));
    }
    Ok(grouped)
}

/// Row indices per non-missing value of `column`
pub fn partition_rows<'a>(table: &'a Table, column: &str) -> Result<FxHashMap<&'a str, Vec<usize>>> {
    let values = table.column(column)?;
    let mut partitions: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for row in 0..table.num_rows() {
        if let Some(value) = cell(values, row) {
            partitions.entry(value).or_default().push(row);
        }
    }
    Ok(partitions)
}

/// Counts of each non-missing value of `column` among `rows`
pub fn value_counts(table: &Table, column: &str, rows: &[usize]) -> Result<Vec<(String, usize)>> {
    let values = table.column(column)?;
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for &row in rows {
        if let Some(value) = cell(values, row) {
            *counts.entry(value).or_default() += 1;
        }
    }
    Ok(counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::InputRecord;

    fn table() -> Table {
        let mut records = Vec::new();
        for (person, job, gender) in [
            ("p1", "engineer", "male"),
            ("p2", "engineer", "male"),
            ("p3", "engineer", "female"),
            ("p4", "sales", "female"),
            ("p5", "sales", "female"),
            ("p6", "sales", "male"),
            ("p7", "sales", "male"),
        ] {
            records.push(
                InputRecord::employee("1", person)
                    .located("London", "UK")
                    .job(job)
                    .gender(gender),
            );
        }
        records.push(InputRecord::employee("1", "p8").located("London", "UK").job("sales"));
        Table::from_records(&records).unwrap()
    }

    #[test]
    fn test_share_within_primary() {
        let keys = GroupKeys::new(["city", "gender"]).unwrap();
        let rows = share_rows(&table(), &keys, Normalization::Primary, false).unwrap();
        let london = &rows["London"];
        assert_eq!(london.len(), 2);
        assert_eq!(london[0].key.as_slice(), ["London", "female"]);
        assert_eq!(london[0].count, 3);
        assert_eq!(london[0].denominator, 7);
        assert!((london[1].percentage - 400.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_include_missing_in_denominator() {
        let keys = GroupKeys::new(["city", "gender"]).unwrap();
        let rows = share_rows(&table(), &keys, Normalization::Primary, true).unwrap();
        assert_eq!(rows["London"][0].denominator, 8);
    }

    #[test]
    fn test_share_within_first_and_last_key() {
        let keys = GroupKeys::new(["city", "gender", "job_type"]).unwrap();
        let rows = share_rows(&table(), &keys, Normalization::PrimaryAndSecondary, false).unwrap();
        let london = &rows["London"];
        let engineers_male = london
            .iter()
            .find(|r| r.key.as_slice() == ["London", "male", "engineer"])
            .unwrap();
        assert_eq!(engineers_male.denominator, 3);
        assert!((engineers_male.percentage - 200.0 / 3.0).abs() < 1e-9);

        let sales_female = london
            .iter()
            .find(|r| r.key.as_slice() == ["London", "female", "sales"])
            .unwrap();
        assert_eq!(sales_female.denominator, 4);
        assert!((sales_female.percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_partitions_and_value_counts() {
        let table = table();
        let partitions = partition_rows(&table, "job_type").unwrap();
        assert_eq!(partitions["engineer"], vec![0, 1, 2]);

        let mut counts = value_counts(&table, "gender", &partitions["sales"]).unwrap();
        counts.sort();
        assert_eq!(
            counts,
            vec![("female".to_string(), 2), ("male".to_string(), 2)]
        );
    }
}
