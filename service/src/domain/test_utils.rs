//! In-memory repository implementations and a ready-made fixture set,
//! mirroring the seed data shape. Test-only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use complaints_common::entities::{Location, Student, User};
use complaints_common::test_utils as fixtures;
use complaints_common::{ComplaintId, LocationId, StudentId, UserId};

use crate::domain::AuthenticatedUser;
use crate::domain::complaint::Complaint;
use crate::domain::repository::{
    ComplaintRepository, LocationRepository, RepositoryError, StudentRepository, UserRepository,
};

pub fn authenticated(user: &User) -> AuthenticatedUser {
    AuthenticatedUser {
        id: user.id,
        role: user.role,
        name: user.display_name(),
        student_ref: user.student_ref,
    }
}

#[derive(Clone, Default)]
pub struct InMemoryComplaints {
    rows: Arc<Mutex<HashMap<ComplaintId, Complaint>>>,
}

impl InMemoryComplaints {
    /// Direct access to the stored document, for assertions.
    pub fn get(&self, id: ComplaintId) -> Complaint {
        self.rows.lock().unwrap().get(&id).cloned().expect("complaint not stored")
    }
}

impl ComplaintRepository for InMemoryComplaints {
    async fn find_all(&self) -> Result<Vec<Complaint>, RepositoryError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_teacher(&self, teacher_id: UserId) -> Result<Vec<Complaint>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn find_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Complaint>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ComplaintId) -> Result<Option<Complaint>, RepositoryError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, complaint: &Complaint) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&complaint.id) {
            return Err(RepositoryError::UniqueViolation(complaint.id.to_string()));
        }
        rows.insert(complaint.id, complaint.clone());
        Ok(())
    }

    async fn save(&self, complaint: &Complaint) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .unwrap()
            .insert(complaint.id, complaint.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    rows: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUsers {
    pub fn with(&self, user: User) -> &Self {
        self.rows.lock().unwrap().push(user);
        self
    }
}

impl UserRepository for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStudents {
    rows: Arc<Mutex<Vec<Student>>>,
}

impl InMemoryStudents {
    pub fn with(&self, student: Student) -> &Self {
        self.rows.lock().unwrap().push(student);
        self
    }
}

impl StudentRepository for InMemoryStudents {
    async fn find_active(&self) -> Result<Vec<Student>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[StudentId]) -> Result<Vec<Student>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryLocations {
    rows: Arc<Mutex<Vec<Location>>>,
}

impl InMemoryLocations {
    pub fn with(&self, location: Location) -> &Self {
        self.rows.lock().unwrap().push(location);
        self
    }
}

impl LocationRepository for InMemoryLocations {
    async fn find_active(&self) -> Result<Vec<Location>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[LocationId]) -> Result<Vec<Location>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect())
    }
}

/// One school's worth of test data: a principal, two teachers, two
/// students (one with a proxy account) and a location, all registered
/// in the in-memory repositories.
pub struct Fixture {
    pub complaints: InMemoryComplaints,
    pub users: InMemoryUsers,
    pub students: InMemoryStudents,
    pub locations: InMemoryLocations,
    pub principal: User,
    pub teacher1: User,
    pub teacher2: User,
    pub alice: Student,
    pub bob: Student,
    pub bob_account: User,
    pub playground: Location,
}

impl Fixture {
    pub fn new() -> Self {
        let principal = fixtures::principal("John Principal", "principal@school.com");
        let teacher1 = fixtures::teacher("Sarah Teacher", "teacher1@school.com");
        let teacher2 = fixtures::teacher("Mike Teacher", "teacher2@school.com");
        let alice = fixtures::student("S-1001", "Alice", "Johnson");
        let bob = fixtures::student("S-1002", "Bob", "Smith");
        let bob_account = fixtures::student_proxy(&bob);
        let playground = fixtures::location("Playground");

        let users = InMemoryUsers::default();
        users
            .with(principal.clone())
            .with(teacher1.clone())
            .with(teacher2.clone())
            .with(bob_account.clone());

        let students = InMemoryStudents::default();
        students.with(alice.clone()).with(bob.clone());

        let locations = InMemoryLocations::default();
        locations.with(playground.clone());

        Fixture {
            complaints: InMemoryComplaints::default(),
            users,
            students,
            locations,
            principal,
            teacher1,
            teacher2,
            alice,
            bob,
            bob_account,
            playground,
        }
    }
}
