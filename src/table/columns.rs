//! Column names of the merged organization/job/person/degree table.

/// Organization identifier
pub const ORG_ID: &str = "org_id";
/// Person identifier; repeats across a person's jobs and degrees
pub const PERSON_ID: &str = "person_id";
/// Country of the organization
pub const COUNTRY: &str = "country";
/// City of the organization
pub const CITY: &str = "city";
/// Organization role (`company`, `university`, ...)
pub const PRIMARY_ROLE: &str = "primary_role";
/// Current-position flag of the job record
pub const IS_CURRENT: &str = "is_current";
/// Gender label
pub const GENDER: &str = "gender";
/// Ethnicity label from the upstream name classifier
pub const RACE: &str = "race";
/// Canonical degree category
pub const DEGREE_TYPE: &str = "degree_type";
/// Organization that granted the degree
pub const INSTITUTION_ID: &str = "institution_id";
/// Job type
pub const JOB_TYPE: &str = "job_type";
/// Organization category groups
pub const CATEGORY_GROUP_LIST: &str = "category_group_list";
/// Company size, free text or bucketed
pub const EMPLOYEE_COUNT: &str = "employee_count";

/// Columns holding identifiers that must compare equal across numeric renderings
pub const IDENTIFIER_COLUMNS: [&str; 3] = [ORG_ID, PERSON_ID, INSTITUTION_ID];
