use axum::http::StatusCode;

pub mod auth;
pub mod complaints;
pub mod reference;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
