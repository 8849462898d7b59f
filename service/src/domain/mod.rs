use thiserror::Error;

use complaints_common::entities::User;
use complaints_common::{Role, StudentId, UserId};

use crate::domain::repository::{
    ComplaintRepository, LocationRepository, StudentRepository, UserRepository,
};

pub mod access;
pub mod complaint;
pub mod repository;

#[cfg(test)]
pub mod test_utils;

/// The verified identity behind one request. Built by the bearer-token
/// extractor and passed explicitly to every operation; there is no
/// ambient "current user".
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    /// For student-proxy accounts, the student record they stand for.
    pub student_ref: Option<StudentId>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("credential processing failed: {0}")]
    Internal(String),
}

/// Issues and verifies bearer credentials. The token format is opaque to
/// the domain; the HTTP layer plugs in the JWT implementation.
pub trait TokenService: Send + Sync + 'static {
    fn issue(&self, user: &User) -> Result<String, AuthError>;
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type Complaints: ComplaintRepository;
    type Users: UserRepository;
    type Students: StudentRepository;
    type Locations: LocationRepository;
    type Tokens: TokenService;

    fn complaints(&self) -> &Self::Complaints;
    fn users(&self) -> &Self::Users;
    fn students(&self) -> &Self::Students;
    fn locations(&self) -> &Self::Locations;
    fn tokens(&self) -> &Self::Tokens;
}
