//! Typed row of the input table.

use serde::{Deserialize, Serialize};

/// One organization-job-person-degree observation
///
/// Useful for building tables in memory through
/// [`Table::from_records`](crate::table::Table::from_records).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub org_id: Option<String>,
    pub person_id: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub primary_role: Option<String>,
    pub is_current: Option<i64>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub degree_type: Option<String>,
    pub institution_id: Option<String>,
    pub job_type: Option<String>,
    pub category_group_list: Option<String>,
    pub employee_count: Option<String>,
}

impl InputRecord {
    /// A current company job of `person_id` at `org_id`
    pub fn employee(org_id: &str, person_id: &str) -> Self {
        Self {
            org_id: Some(org_id.to_string()),
            person_id: Some(person_id.to_string()),
            primary_role: Some("company".to_string()),
            is_current: Some(1),
            ..Default::default()
        }
    }

    /// Set the city and country
    #[must_use]
    pub fn located(mut self, city: &str, country: &str) -> Self {
        self.city = Some(city.to_string());
        self.country = Some(country.to_string());
        self
    }

    /// Set the gender
    #[must_use]
    pub fn gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    /// Set the ethnicity label
    #[must_use]
    pub fn race(mut self, race: &str) -> Self {
        self.race = Some(race.to_string());
        self
    }

    /// Set the degree category
    #[must_use]
    pub fn degree(mut self, degree_type: &str) -> Self {
        self.degree_type = Some(degree_type.to_string());
        self
    }

    /// Set the degree-granting institution
    #[must_use]
    pub fn studied_at(mut self, institution_id: &str) -> Self {
        self.institution_id = Some(institution_id.to_string());
        self
    }

    /// Set the job type
    #[must_use]
    pub fn job(mut self, job_type: &str) -> Self {
        self.job_type = Some(job_type.to_string());
        self
    }

    /// Set the organization role
    #[must_use]
    pub fn role(mut self, primary_role: &str) -> Self {
        self.primary_role = Some(primary_role.to_string());
        self
    }

    /// Set the current-position flag
    #[must_use]
    pub fn current(mut self, is_current: bool) -> Self {
        self.is_current = Some(i64::from(is_current));
        self
    }
}
