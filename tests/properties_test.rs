mod utils;

use std::collections::{BTreeMap, BTreeSet};

use diversity_indicators::indicators::{PartitionScope, simpson_index_from_counts};
use diversity_indicators::{DiversityIndicators, GroupKeys, InputRecord, Location, lieberson_index};
use utils::{CITIES, random_records, table};

const SEEDS: [u64; 4] = [1, 7, 42, 2024];

/// Distinct persons per location value, counted directly from the records
fn brute_force_population(records: &[InputRecord], location: Location) -> BTreeMap<String, usize> {
    let mut people: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for record in records {
        let value = match location {
            Location::City => &record.city,
            Location::Country => &record.country,
        };
        if let (Some(value), Some(person)) = (value, &record.person_id) {
            people.entry(value.clone()).or_default().insert(person.clone());
        }
    }
    people.into_iter().map(|(k, v)| (k, v.len())).collect()
}

#[test]
fn test_reindexing_matches_direct_count() {
    for seed in SEEDS {
        let records = random_records(seed, 400);
        let engine = DiversityIndicators::new(table(&records));

        for location in [Location::City, Location::Country] {
            let expected = brute_force_population(&records, location);
            for threshold in [0, 50, 150] {
                let ranked = engine.reindexing(threshold, location, None).unwrap();
                assert_eq!(ranked, engine.reindexing(threshold, location, None).unwrap());

                for pair in ranked.windows(2) {
                    assert!(
                        pair[0].population > pair[1].population
                            || (pair[0].population == pair[1].population
                                && pair[0].value < pair[1].value)
                    );
                }
                for entry in &ranked {
                    assert!(entry.population > threshold);
                    assert_eq!(expected[&entry.value], entry.population);
                }
                let above = expected.values().filter(|&&p| p > threshold).count();
                assert_eq!(ranked.len(), above, "seed {seed}, {location}, {threshold}");
            }
        }
    }
}

#[test]
fn test_country_restricted_reindexing_is_subset() {
    let records = random_records(3, 300);
    let engine = DiversityIndicators::new(table(&records));

    let uk = engine.reindexing(0, Location::City, Some("UK")).unwrap();
    let uk_cities: BTreeSet<_> = CITIES
        .iter()
        .filter(|(_, country)| *country == "UK")
        .map(|(city, _)| *city)
        .collect();
    assert!(!uk.is_empty());
    assert!(uk.iter().all(|entry| uk_cities.contains(entry.value.as_str())));
}

#[test]
fn test_shares_sum_to_one_hundred() {
    for seed in SEEDS {
        let engine = DiversityIndicators::new(table(&random_records(seed, 400)));
        let keys = GroupKeys::new(["country", "gender"]).unwrap();
        let result = engine.people_diversity(&keys, 25).unwrap();

        assert!(!result.is_empty());
        for group in &result.groups {
            assert!(group.population > 25);
            let total: f64 = group.rows.iter().map(|row| row.percentage).sum();
            assert!((total - 100.0).abs() < 1e-9, "seed {seed}, {}", group.key);
        }
    }
}

#[test]
fn test_indices_stay_in_range() {
    for seed in SEEDS {
        let engine = DiversityIndicators::new(table(&random_records(seed, 400)));
        let format = engine
            .lieberson_format(&["gender", "race", "job_type"], 25, &PartitionScope::Countries)
            .unwrap();

        for partition in &format.partitions {
            for distribution in partition.variables.values() {
                let total: f64 = distribution.proportions.iter().sum();
                assert!((total - 1.0).abs() < 1e-9);
            }
            let aw = partition.lieberson_index().unwrap();
            assert!((0.0..1.0).contains(&aw), "Aw = {aw}");
        }

        let simpson = engine
            .simpson_index("race", 25, &PartitionScope::Countries)
            .unwrap();
        assert_eq!(simpson.scores.len(), format.partitions.len());
        for score in &simpson.scores {
            assert!((0.0..1.0).contains(&score.value), "Simpson = {}", score.value);
        }
    }
}

#[test]
fn test_uniform_indices() {
    for k in 1..=8usize {
        let uniform = vec![1.0 / k as f64; k];
        let aw = lieberson_index([uniform.clone(), uniform]).unwrap();
        assert!((aw - (1.0 - 1.0 / k as f64)).abs() < 1e-12);

        let simpson = simpson_index_from_counts(&vec![100_000; k]).unwrap();
        assert!((simpson - (1.0 - 1.0 / k as f64)).abs() < 1e-4);
    }
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = DiversityIndicators::new(table(&random_records(11, 300)));
    let keys = GroupKeys::new(["city", "gender"]).unwrap();
    let expected = engine.people_diversity(&keys, 10).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.people_diversity(&keys, 10).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
