use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::repository::UserRepository;
use crate::domain::{AppState, AuthenticatedUser, TokenService};
use crate::infrastructure::auth::verify_password;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::handlers::auth::dto::{
    LoginRequest, LoginResponse, UserResponse,
};

pub mod dto;

pub async fn login<S: AppState>(
    State(state): State<S>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiSuccess<LoginResponse>, ApiError> {
    let user = state
        .users()
        .find_by_email(&body.email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(invalid_credentials)?;

    // Accounts without credentials (student proxies) cannot log in.
    let hash = user.password_hash.as_deref().ok_or_else(invalid_credentials)?;

    if !verify_password(&body.password, hash).map_err(ApiError::from)? {
        return Err(invalid_credentials());
    }

    let token = state.tokens().issue(&user).map_err(ApiError::from)?;

    tracing::info!(user = %user.id, role = %user.role, "login");
    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponse {
            token,
            user: UserResponse::from(&user),
        },
    ))
}

pub async fn me<S: AppState>(actor: AuthenticatedUser) -> ApiSuccess<UserResponse> {
    ApiSuccess::new(StatusCode::OK, UserResponse::from(&actor))
}

fn invalid_credentials() -> ApiError {
    // Same answer for unknown email and wrong password.
    ApiError::Unauthorized("invalid credentials".to_string())
}
