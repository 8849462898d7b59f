use complaints_common::database::Database;

use crate::domain::AppState;
use crate::infrastructure::auth::JwtTokenService;
use crate::infrastructure::persistence::{
    PostgresComplaintRepository, PostgresLocationRepository, PostgresStudentRepository,
    PostgresUserRepository,
};
use crate::infrastructure::settings::AuthSettings;

pub mod auth;
pub mod http;
pub mod persistence;
pub mod settings;

/// The production wiring: Postgres-backed repositories and JWT tokens.
#[derive(Clone)]
pub struct AppStateImpl {
    complaints: PostgresComplaintRepository,
    users: PostgresUserRepository,
    students: PostgresStudentRepository,
    locations: PostgresLocationRepository,
    tokens: JwtTokenService,
}

impl AppStateImpl {
    pub fn new(database: &'static Database, auth: &AuthSettings) -> Self {
        Self {
            complaints: PostgresComplaintRepository::new(database),
            users: PostgresUserRepository::new(database),
            students: PostgresStudentRepository::new(database),
            locations: PostgresLocationRepository::new(database),
            tokens: JwtTokenService::new(&auth.jwt_secret, auth.token_ttl_minutes),
        }
    }
}

impl AppState for AppStateImpl {
    type Complaints = PostgresComplaintRepository;
    type Users = PostgresUserRepository;
    type Students = PostgresStudentRepository;
    type Locations = PostgresLocationRepository;
    type Tokens = JwtTokenService;

    fn complaints(&self) -> &Self::Complaints {
        &self.complaints
    }

    fn users(&self) -> &Self::Users {
        &self.users
    }

    fn students(&self) -> &Self::Students {
        &self.students
    }

    fn locations(&self) -> &Self::Locations {
        &self.locations
    }

    fn tokens(&self) -> &Self::Tokens {
        &self.tokens
    }
}
