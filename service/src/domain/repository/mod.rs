use std::future::Future;

use thiserror::Error;

use complaints_common::entities::{Location, Student, User};
use complaints_common::{ComplaintId, LocationId, StudentId, UserId};

use crate::domain::complaint::Complaint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("row not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("database error: {0}")]
    DatabaseError(String),
}

pub trait ComplaintRepository: Send + Sync + 'static {
    fn find_all(&self)
    -> impl Future<Output = Result<Vec<Complaint>, RepositoryError>> + Send;

    fn find_by_teacher(
        &self,
        teacher_id: UserId,
    ) -> impl Future<Output = Result<Vec<Complaint>, RepositoryError>> + Send;

    fn find_by_student(
        &self,
        student_id: StudentId,
    ) -> impl Future<Output = Result<Vec<Complaint>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: ComplaintId,
    ) -> impl Future<Output = Result<Option<Complaint>, RepositoryError>> + Send;

    fn insert(
        &self,
        complaint: &Complaint,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Full-document overwrite. The single UPDATE is the unit of
    /// atomicity; two concurrent saves race and the last write wins.
    fn save(
        &self,
        complaint: &Complaint,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

pub trait UserRepository: Send + Sync + 'static {
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn find_by_ids(
        &self,
        ids: &[UserId],
    ) -> impl Future<Output = Result<Vec<User>, RepositoryError>> + Send;
}

pub trait StudentRepository: Send + Sync + 'static {
    fn find_active(&self)
    -> impl Future<Output = Result<Vec<Student>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: StudentId,
    ) -> impl Future<Output = Result<Option<Student>, RepositoryError>> + Send;

    fn find_by_ids(
        &self,
        ids: &[StudentId],
    ) -> impl Future<Output = Result<Vec<Student>, RepositoryError>> + Send;
}

pub trait LocationRepository: Send + Sync + 'static {
    fn find_active(&self)
    -> impl Future<Output = Result<Vec<Location>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: LocationId,
    ) -> impl Future<Output = Result<Option<Location>, RepositoryError>> + Send;

    fn find_by_ids(
        &self,
        ids: &[LocationId],
    ) -> impl Future<Output = Result<Vec<Location>, RepositoryError>> + Send;
}
