use thiserror::Error;

use crate::domain::access::AccessError;
use crate::domain::complaint::ComplaintStatus;
use crate::domain::repository::RepositoryError;

/// A lifecycle action attempted outside its guard. The aggregate is left
/// untouched when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} a complaint in status {status}")]
pub struct TransitionError {
    pub action: &'static str,
    pub status: ComplaintStatus,
}

impl TransitionError {
    pub(crate) fn new(action: &'static str, status: ComplaintStatus) -> Self {
        Self { action, status }
    }
}

/// Failure classes of one workflow operation, in the order the checks
/// run: authentication happens at the HTTP edge, authorization before
/// the lifecycle guard, the guard before persistence.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Forbidden(#[from] AccessError),
    #[error("complaint not found")]
    NotFound,
    #[error(transparent)]
    StateConflict(#[from] TransitionError),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<RepositoryError> for WorkflowError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => WorkflowError::NotFound,
            RepositoryError::UniqueViolation(cause) => WorkflowError::Storage(cause),
            RepositoryError::DatabaseError(cause) => WorkflowError::Storage(cause),
        }
    }
}
