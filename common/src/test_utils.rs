use chrono::Utc;

use crate::domain::entities::{Location, LocationName, Student, StudentNumber, User};
use crate::domain::{LocationId, Role, StudentId, UserId};

/// Fixture builders for the shared entities.
///
/// Public so that other crates can reuse them for their own tests.

pub fn principal(name: &str, email: &str) -> User {
    user_with_role(name, email, Role::Principal)
}

pub fn teacher(name: &str, email: &str) -> User {
    user_with_role(name, email, Role::Teacher)
}

/// Student-proxy account linked to an existing student record.
pub fn student_proxy(student: &Student) -> User {
    let now = Utc::now();
    User {
        id: UserId::generate(),
        email: None,
        password_hash: None,
        name: None,
        first_name: Some(student.first_name.clone()),
        last_name: Some(student.last_name.clone()),
        role: Role::Student,
        student_ref: Some(student.id),
        created_at: now,
        updated_at: now,
    }
}

fn user_with_role(name: &str, email: &str, role: Role) -> User {
    let now = Utc::now();
    User {
        id: UserId::generate(),
        email: Some(email.to_string()),
        // Not a real hash; tests that exercise password verification
        // must hash their own fixture passwords.
        password_hash: Some("$argon2id$fixture".to_string()),
        name: Some(name.to_string()),
        first_name: None,
        last_name: None,
        role,
        student_ref: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn student(number: &str, first: &str, last: &str) -> Student {
    let now = Utc::now();
    Student {
        id: StudentId::generate(),
        student_number: StudentNumber::try_new(number).unwrap(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        grade: "10".to_string(),
        class_name: "A".to_string(),
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn location(name: &str) -> Location {
    let now = Utc::now();
    Location {
        id: LocationId::generate(),
        name: LocationName::try_new(name).unwrap(),
        description: None,
        active: true,
        created_at: now,
        updated_at: now,
    }
}
