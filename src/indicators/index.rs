//! Closed-form diversity indices
//!
//! Lieberson's Aw summarizes several categorical variables measured on the
//! same population; the Simpson index summarizes one variable from its raw
//! category counts.

use itertools::Itertools;
use serde::Serialize;

use crate::error::{IndicatorError, Result};

/// Category proportions of one variable within one population
///
/// Categories are ordered by descending count, ties by ascending name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub categories: Vec<String>,
    pub proportions: Vec<f64>,
}

impl Distribution {
    /// Proportions from category counts; empty when there are no counts
    #[must_use]
    pub fn from_counts(counts: Vec<(String, usize)>) -> Self {
        let total: usize = counts.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return Self::default();
        }

        let (categories, proportions) = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .map(|(category, count)| (category, count as f64 / total as f64))
            .unzip();
        Self {
            categories,
            proportions,
        }
    }

    /// Proportion of one category, if present
    #[must_use]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| self.proportions[i])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proportions.is_empty()
    }
}

impl AsRef<[f64]> for Distribution {
    fn as_ref(&self) -> &[f64] {
        &self.proportions
    }
}

/// Lieberson's Aw over a set of variables
///
/// `Aw = 1 - (sum over variables of sum over categories of p^2) / variables`.
/// Each item is one variable's list of category proportions, e.g. the values
/// of a `BTreeMap<String, Vec<f64>>`.
///
/// # Errors
/// Arithmetic error when no variables are given
pub fn lieberson_index<I, P>(variables: I) -> Result<f64>
where
    I: IntoIterator<Item = P>,
    P: AsRef<[f64]>,
{
    let mut variable_count = 0usize;
    let mut yk = 0.0;
    for proportions in variables {
        yk += proportions.as_ref().iter().map(|p| p * p).sum::<f64>();
        variable_count += 1;
    }

    if variable_count == 0 {
        return Err(IndicatorError::arithmetic(
            "Lieberson index of zero variables",
        ));
    }
    Ok(1.0 - yk / variable_count as f64)
}

/// Simpson diversity index from category counts
///
/// `1 - sum(n_i (n_i - 1)) / (N (N - 1))`, the probability that two people drawn
/// without replacement fall in different categories.
///
/// # Errors
/// Arithmetic error when fewer than two individuals are counted
pub fn simpson_index_from_counts(counts: &[usize]) -> Result<f64> {
    let total: u128 = counts.iter().map(|&n| n as u128).sum();
    if total < 2 {
        return Err(IndicatorError::arithmetic(format!(
            "Simpson index needs at least two individuals, got {total}"
        )));
    }

    let same: u128 = counts
        .iter()
        .map(|&n| n as u128)
        .filter(|&n| n > 1)
        .map(|n| n * (n - 1))
        .sum();
    Ok(1.0 - same as f64 / (total * (total - 1)) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_lieberson_mixed_variables() {
        let mut distribution = BTreeMap::new();
        distribution.insert("gender".to_string(), vec![0.5, 0.5]);
        distribution.insert("race".to_string(), vec![1.0]);
        let aw = lieberson_index(distribution.values()).unwrap();
        assert_eq!(aw, 1.0 - (0.5 + 1.0) / 2.0);
        assert!((aw - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_lieberson_concentrated_is_zero() {
        let aw = lieberson_index([vec![1.0], vec![0.0, 1.0], vec![1.0, 0.0, 0.0]]).unwrap();
        assert_eq!(aw, 0.0);
    }

    #[test]
    fn test_lieberson_uniform() {
        for k in 1..=6usize {
            let uniform = vec![1.0 / k as f64; k];
            let aw = lieberson_index([uniform.clone(), uniform.clone(), uniform]).unwrap();
            assert!((aw - (1.0 - 1.0 / k as f64)).abs() < 1e-12, "k = {k}");
        }
    }

    #[test]
    fn test_lieberson_reference_profile() {
        let profile = [
            vec![0.06, 0.4, 0.44, 0.1],
            vec![0.39, 0.39, 0.22],
            vec![0.44, 0.56],
            vec![0.62, 0.38],
            vec![0.39, 0.61],
            vec![0.04, 0.45, 0.51],
        ];
        let yk: f64 = profile
            .iter()
            .map(|v| v.iter().map(|p| p * p).sum::<f64>())
            .sum();
        assert_eq!(lieberson_index(&profile).unwrap(), 1.0 - yk / 6.0);
    }

    #[test]
    fn test_lieberson_empty_is_error() {
        assert!(matches!(
            lieberson_index(Vec::<Vec<f64>>::new()),
            Err(IndicatorError::Arithmetic(_))
        ));
    }

    #[test]
    fn test_simpson() {
        assert_eq!(simpson_index_from_counts(&[12]).unwrap(), 0.0);
        // two of each: 1 - (2 + 2) / (4 * 3)
        assert!((simpson_index_from_counts(&[2, 2]).unwrap() - 2.0 / 3.0).abs() < 1e-12);

        let k = 4;
        let large = simpson_index_from_counts(&vec![250_000; k]).unwrap();
        assert!((large - (1.0 - 1.0 / k as f64)).abs() < 1e-5);

        assert!(simpson_index_from_counts(&[1]).is_err());
        assert!(simpson_index_from_counts(&[]).is_err());
    }

    #[test]
    fn test_distribution_from_counts() {
        let distribution = Distribution::from_counts(vec![
            ("female".to_string(), 10),
            ("male".to_string(), 30),
            ("other".to_string(), 0),
        ]);
        assert_eq!(distribution.categories, vec!["male", "female"]);
        assert_eq!(distribution.proportions, vec![0.75, 0.25]);
        assert_eq!(distribution.get("female"), Some(0.25));
        assert_eq!(distribution.get("other"), None);
        assert!(Distribution::from_counts(Vec::new()).is_empty());
    }
}
