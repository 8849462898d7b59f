use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use nutype::nutype;
use regex::Regex;

use crate::domain::{LocationId, Role, StudentId, UserId};

/// A user account. Students usually exist only as proxy accounts
/// (no credentials) linked to their `Student` record.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    /// Set for student-proxy accounts only; links to the student record
    /// the account represents.
    pub student_ref: Option<StudentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Best-effort display name: explicit name, then first/last pair,
    /// then email, then the raw id.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self
                .email
                .clone()
                .unwrap_or_else(|| self.id.to_string()),
        }
    }
}

static VALID_STUDENT_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Z0-9][A-Z0-9-]*$").unwrap());

/// Business key of a student record, e.g. "S-1042".
#[nutype(
    sanitize(trim, uppercase),
    validate(not_empty, regex = VALID_STUDENT_NUMBER_REGEX),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct StudentNumber(String);

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub student_number: StudentNumber,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    pub class_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct LocationName(String);

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub name: LocationName,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_number_is_sanitized() {
        let number = StudentNumber::try_new("  s-1042 ").unwrap();
        assert_eq!(number.as_ref(), "S-1042");
    }

    #[test]
    fn student_number_rejects_empty_and_garbage() {
        assert!(StudentNumber::try_new("   ").is_err());
        assert!(StudentNumber::try_new("no spaces allowed").is_err());
    }

    #[test]
    fn location_name_must_not_be_empty() {
        assert!(LocationName::try_new(" ").is_err());
        assert!(LocationName::try_new("Cafeteria").is_ok());
    }

    #[test]
    fn display_name_prefers_explicit_name() {
        let user = crate::test_utils::teacher("Sarah Teacher", "teacher1@school.com");
        assert_eq!(user.display_name(), "Sarah Teacher");
    }
}
