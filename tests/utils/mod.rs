//! Shared fixtures for the integration tests
#![allow(dead_code)]

use diversity_indicators::{InputRecord, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Current employees of `org` in one city, `male` men followed by `female` women
pub fn staff(
    org: &str,
    prefix: &str,
    city: &str,
    country: &str,
    male: usize,
    female: usize,
) -> Vec<InputRecord> {
    (0..male + female)
        .map(|i| {
            let gender = if i < male { "male" } else { "female" };
            InputRecord::employee(org, &format!("{prefix}{i}"))
                .located(city, country)
                .gender(gender)
        })
        .collect()
}

/// London with 30 people (20 male, 10 female) and Leeds with 10 (5 male, 5 female)
pub fn london_leeds() -> Vec<InputRecord> {
    let mut records = staff("1", "lon", "London", "UK", 20, 10);
    records.extend(staff("2", "lds", "Leeds", "UK", 5, 5));
    records
}

pub fn table(records: &[InputRecord]) -> Table {
    Table::from_records(records).expect("fixture records form a table")
}

pub const CITIES: [(&str, &str); 6] = [
    ("London", "UK"),
    ("Leeds", "UK"),
    ("York", "UK"),
    ("Paris", "France"),
    ("Lyon", "France"),
    ("Berlin", "Germany"),
];
const GENDERS: [&str; 2] = ["male", "female"];
const RACES: [&str; 4] = ["white", "asian", "black", "hispanic"];
const DEGREES: [&str; 5] = ["Undergraduate", "Postgraduate", "MBA", "PhD", "JD"];
const JOBS: [&str; 3] = ["engineer", "sales", "executive"];

/// A reproducible table of `people` persons with one to three rows each
///
/// About one gender or race value in ten is missing, one row in five is a
/// former position, and every city has a university row.
pub fn random_records(seed: u64, people: usize) -> Vec<InputRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();

    for (i, (city, country)) in CITIES.iter().enumerate() {
        records.push(
            InputRecord {
                org_id: Some(format!("u{i}")),
                ..Default::default()
            }
            .located(city, country)
            .role("university"),
        );
    }

    for person in 0..people {
        let rows = rng.random_range(1..=3);
        for _ in 0..rows {
            let (city, country) = CITIES[rng.random_range(0..CITIES.len())];
            let org = format!("o{}", rng.random_range(0..20));
            let mut record = InputRecord::employee(&org, &format!("p{person}"))
                .located(city, country)
                .job(JOBS[rng.random_range(0..JOBS.len())])
                .current(rng.random_bool(0.8));
            if rng.random_bool(0.9) {
                record = record.gender(GENDERS[rng.random_range(0..GENDERS.len())]);
            }
            if rng.random_bool(0.9) {
                record = record.race(RACES[rng.random_range(0..RACES.len())]);
            }
            if rng.random_bool(0.7) {
                record = record
                    .degree(DEGREES[rng.random_range(0..DEGREES.len())])
                    .studied_at(&format!("u{}", rng.random_range(0..CITIES.len() + 2)));
            }
            records.push(record);
        }
    }
    records
}
