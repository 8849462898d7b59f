use sqlx::Error;

use crate::domain::repository::RepositoryError;

mod complaints;
mod reference;
mod users;

pub use complaints::PostgresComplaintRepository;
pub use reference::{PostgresLocationRepository, PostgresStudentRepository};
pub use users::PostgresUserRepository;

fn map_db_error(error: Error) -> RepositoryError {
    if let Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return RepositoryError::UniqueViolation(db_error.to_string());
        }
    }
    RepositoryError::DatabaseError(error.to_string())
}
