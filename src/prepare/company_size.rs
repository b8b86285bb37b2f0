//! Company size buckets from free-text employee counts

use std::fmt;

use serde::{Deserialize, Serialize};

/// Employee-count bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    Micro,
    Small,
    Medium,
    Large,
}

impl CompanySize {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Micro => "Micro",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of bucketing one employee-count cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBucket<'a> {
    Known(CompanySize),
    /// The literal `unknown`
    Missing,
    /// Anything the rules do not cover, kept as written
    Unchanged(&'a str),
}

impl<'a> SizeBucket<'a> {
    /// Cell text after bucketing, `None` when missing
    #[must_use]
    pub fn as_cell(self) -> Option<&'a str> {
        match self {
            Self::Known(size) => Some(size.as_str()),
            Self::Missing => None,
            Self::Unchanged(raw) => Some(raw),
        }
    }
}

/// Bucket a range such as `"11-50"` or `"10000+"`
///
/// All numbers above 250 is `Large`; a range starting above 50 and ending at
/// most 250 is `Medium`; starting above 10 and ending at most 50 is `Small`;
/// ending at most 10 is `Micro`. Text without numbers, or with a single
/// number of at most 250, is left unchanged.
#[must_use]
pub fn company_size(raw: &str) -> SizeBucket<'_> {
    if raw == "unknown" {
        return SizeBucket::Missing;
    }

    let numbers = numbers_in(raw);
    if numbers.is_empty() {
        return SizeBucket::Unchanged(raw);
    }
    if numbers.iter().all(|&n| n > 250) {
        return SizeBucket::Known(CompanySize::Large);
    }

    match (numbers[0], numbers.get(1).copied()) {
        (low, Some(high)) if low > 50 && high <= 250 => SizeBucket::Known(CompanySize::Medium),
        (low, Some(high)) if low > 10 && high <= 50 => SizeBucket::Known(CompanySize::Small),
        (_, Some(high)) if high <= 10 => SizeBucket::Known(CompanySize::Micro),
        _ => SizeBucket::Unchanged(raw),
    }
}

/// Every run of ASCII digits, in order
fn numbers_in(raw: &str) -> Vec<u64> {
    raw.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}
