//! Grouping keys, normalization modes and partition scopes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use smallvec::SmallVec;

use crate::error::{IndicatorError, Result};
use crate::table::columns::{CITY, COUNTRY};

/// An ordered, non-empty list of grouping columns
///
/// The first column is the normalizing key; the last one (when there is more
/// than one) is the secondary key used by [`Normalization::PrimaryAndSecondary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupKeys {
    columns: SmallVec<[String; 4]>,
}

impl GroupKeys {
    /// Build group keys from column names
    ///
    /// # Errors
    /// Invalid argument when the list is empty or names a column twice
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: SmallVec<[String; 4]> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(IndicatorError::invalid_argument(
                "at least one grouping column is required",
            ));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(IndicatorError::invalid_argument(format!(
                    "grouping column '{column}' is listed twice"
                )));
            }
        }
        Ok(Self { columns })
    }

    /// The normalizing key
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.columns[0]
    }

    /// The last key, when more than one key is given
    #[must_use]
    pub fn secondary(&self) -> Option<&str> {
        (self.columns.len() > 1).then(|| self.columns[self.columns.len() - 1].as_str())
    }

    /// All keys in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl fmt::Display for GroupKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.columns.join(" x "))
    }
}

/// Which slice of the table a count is divided by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Share within the primary key value
    Primary,
    /// Share within the (primary, secondary) key pair
    PrimaryAndSecondary,
}

impl Normalization {
    /// `PrimaryAndSecondary` for three or more keys, `Primary` otherwise
    #[must_use]
    pub fn for_keys(keys: &GroupKeys) -> Self {
        if keys.len() > 2 {
            Self::PrimaryAndSecondary
        } else {
            Self::Primary
        }
    }

    /// Check that the key list supports this mode
    pub fn validate(self, keys: &GroupKeys) -> Result<()> {
        if self == Self::PrimaryAndSecondary && keys.len() < 3 {
            return Err(IndicatorError::invalid_argument(format!(
                "normalizing within the first and last key needs at least three keys, got {}",
                keys.len()
            )));
        }
        Ok(())
    }

    /// Positions of the keys that define the denominator slice
    pub(crate) fn slice_positions(self, keys: &GroupKeys) -> SmallVec<[usize; 2]> {
        match self {
            Self::Primary => smallvec::smallvec![0],
            Self::PrimaryAndSecondary => smallvec::smallvec![0, keys.len() - 1],
        }
    }
}

/// A location column used for ranking and partitioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    City,
    Country,
}

impl Location {
    /// Column holding this location
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::City => CITY,
            Self::Country => COUNTRY,
        }
    }
}

impl FromStr for Location {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            CITY => Ok(Self::City),
            COUNTRY => Ok(Self::Country),
            other => Err(IndicatorError::invalid_argument(format!(
                "unknown location '{other}', expected '{CITY}' or '{COUNTRY}'"
            ))),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Rows and ranking location for degree diversity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegreeScope {
    /// Every country, ranked by country population
    Countries,
    /// Cities of one country, ranked by city population
    Cities { country: String },
}

impl DegreeScope {
    /// Map the `city_level` / `country` flag pair to a scope
    ///
    /// # Errors
    /// Invalid argument when `city_level` is set without a country
    pub fn from_flags(city_level: bool, country: Option<&str>) -> Result<Self> {
        match (city_level, country) {
            (false, _) => Ok(Self::Countries),
            (true, Some(country)) => Ok(Self::Cities {
                country: country.to_string(),
            }),
            (true, None) => Err(IndicatorError::invalid_argument(
                "city-level degree diversity requires a country",
            )),
        }
    }

    /// The location ranked by this scope
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Countries => Location::Country,
            Self::Cities { .. } => Location::City,
        }
    }

    /// The country rows are restricted to, if any
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        match self {
            Self::Countries => None,
            Self::Cities { country } => Some(country.as_str()),
        }
    }
}

/// Partitioning used by the Lieberson and Simpson indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionScope {
    /// One partition per country
    Countries,
    /// One partition per city of the given country
    Cities { country: String },
}

impl PartitionScope {
    /// Map the `country_level` / `city_level` / `country` flags to a scope
    ///
    /// # Errors
    /// Invalid argument unless exactly one level is selected, or when city level
    /// lacks a country
    pub fn from_flags(country_level: bool, city_level: bool, country: Option<&str>) -> Result<Self> {
        match (country_level, city_level, country) {
            (true, false, _) => Ok(Self::Countries),
            (false, true, Some(country)) => Ok(Self::Cities {
                country: country.to_string(),
            }),
            (false, true, None) => Err(IndicatorError::invalid_argument(
                "city-level partitioning requires a country",
            )),
            (true, true, _) => Err(IndicatorError::invalid_argument(
                "select either country-level or city-level partitioning, not both",
            )),
            (false, false, _) => Err(IndicatorError::invalid_argument(
                "select country-level or city-level partitioning",
            )),
        }
    }

    /// The location each partition corresponds to
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Countries => Location::Country,
            Self::Cities { .. } => Location::City,
        }
    }

    /// The country rows are restricted to, if any
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        match self {
            Self::Countries => None,
            Self::Cities { country } => Some(country.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_keys() {
        let keys = GroupKeys::new(["city", "job_type", "gender"]).unwrap();
        assert_eq!(keys.primary(), "city");
        assert_eq!(keys.secondary(), Some("gender"));
        assert_eq!(keys.to_string(), "city x job_type x gender");

        let single = GroupKeys::new(["city"]).unwrap();
        assert_eq!(single.secondary(), None);

        assert!(GroupKeys::new(Vec::<String>::new()).is_err());
        assert!(GroupKeys::new(["city", "city"]).is_err());
    }

    #[test]
    fn test_normalization_for_keys() {
        let two = GroupKeys::new(["city", "gender"]).unwrap();
        let three = GroupKeys::new(["city", "job_type", "gender"]).unwrap();
        let one = GroupKeys::new(["country"]).unwrap();
        assert_eq!(Normalization::for_keys(&one), Normalization::Primary);
        assert_eq!(Normalization::for_keys(&two), Normalization::Primary);
        assert_eq!(Normalization::for_keys(&three), Normalization::PrimaryAndSecondary);
        assert!(Normalization::PrimaryAndSecondary.validate(&two).is_err());
        assert!(Normalization::PrimaryAndSecondary.validate(&three).is_ok());
        assert_eq!(
            Normalization::PrimaryAndSecondary.slice_positions(&three).as_slice(),
            &[0, 2]
        );
    }

    #[test]
    fn test_location_parsing() {
        assert_eq!("city".parse::<Location>().unwrap(), Location::City);
        assert_eq!("country".parse::<Location>().unwrap(), Location::Country);
        assert!(matches!(
            "region".parse::<Location>(),
            Err(IndicatorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_scope_flags() {
        assert_eq!(DegreeScope::from_flags(false, None).unwrap(), DegreeScope::Countries);
        assert_eq!(
            DegreeScope::from_flags(true, Some("UK")).unwrap().location(),
            Location::City
        );
        assert!(DegreeScope::from_flags(true, None).is_err());

        assert_eq!(
            PartitionScope::from_flags(true, false, None).unwrap(),
            PartitionScope::Countries
        );
        assert_eq!(
            PartitionScope::from_flags(false, true, Some("UK")).unwrap().country(),
            Some("UK")
        );
        assert!(PartitionScope::from_flags(false, true, None).is_err());
        assert!(PartitionScope::from_flags(true, true, Some("UK")).is_err());
        assert!(PartitionScope::from_flags(false, false, None).is_err());
    }
}
