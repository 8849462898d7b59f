use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::access;
use crate::domain::repository::{LocationRepository, StudentRepository};
use crate::domain::{AppState, AuthenticatedUser};
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::reference::dto::{
    LocationResponse, ManyLocationsResponse, ManyStudentsResponse, StudentResponse,
};

pub mod dto;

/// Active students, for the complaint form. Not exposed to student
/// accounts.
pub async fn list_students<S: AppState>(
    State(state): State<S>,
    actor: AuthenticatedUser,
) -> Result<ApiSuccess<ManyStudentsResponse>, ApiError> {
    access::authorize_roster(&actor).map_err(|cause| ApiError::Forbidden(cause.to_string()))?;

    let students = state
        .students()
        .find_active()
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ManyStudentsResponse {
            data: students.into_iter().map(StudentResponse::from).collect(),
        },
    ))
}

/// Active locations, for any authenticated caller.
pub async fn list_locations<S: AppState>(
    State(state): State<S>,
    _actor: AuthenticatedUser,
) -> Result<ApiSuccess<ManyLocationsResponse>, ApiError> {
    let locations = state
        .locations()
        .find_active()
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ManyLocationsResponse {
            data: locations.into_iter().map(LocationResponse::from).collect(),
        },
    ))
}
