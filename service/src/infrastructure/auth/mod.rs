pub mod jwt;
pub mod password;

pub use jwt::JwtTokenService;
pub use password::{hash_password, verify_password};
