use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;

use complaints_common::{ComplaintId, LocationId, StudentId, UserId};

use crate::domain::complaint::workflow;
use crate::domain::complaint::{Complaint, Punishment, ReturnNotes};
use crate::domain::repository::{
    LocationRepository, StudentRepository, UserRepository,
};
use crate::domain::{AppState, AuthenticatedUser};
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::handlers::complaints::dto::{
    ComplaintResponse, CreateComplaintRequest, DecideRequest, ManyComplaintsResponse,
    MetadataResponse, OneComplaintResponse, References, ReturnRequest, UpdateComplaintRequest,
};

pub mod dto;

pub async fn list_complaints<S: AppState>(
    State(state): State<S>,
    actor: AuthenticatedUser,
) -> Result<ApiSuccess<ManyComplaintsResponse>, ApiError> {
    let complaints = workflow::list_complaints(state.complaints(), &actor).await?;
    let references = load_references(&state, &complaints).await?;

    let data: Vec<ComplaintResponse> = complaints
        .into_iter()
        .map(|complaint| ComplaintResponse::assemble(complaint, &references))
        .collect();
    let total = data.len();

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ManyComplaintsResponse {
            data,
            meta: MetadataResponse { total },
        },
    ))
}

pub async fn get_complaint<S: AppState>(
    State(state): State<S>,
    actor: AuthenticatedUser,
    Path(id): Path<ComplaintId>,
) -> Result<ApiSuccess<OneComplaintResponse>, ApiError> {
    let complaint = workflow::get_complaint(state.complaints(), &actor, id).await?;
    respond(&state, StatusCode::OK, complaint).await
}

pub async fn create_complaint<S: AppState>(
    State(state): State<S>,
    actor: AuthenticatedUser,
    ApiJson(body): ApiJson<CreateComplaintRequest>,
) -> Result<ApiSuccess<OneComplaintResponse>, ApiError> {
    let new_complaint = body.into_domain()?;
    let complaint = workflow::create_complaint(
        state.complaints(),
        state.students(),
        state.locations(),
        &actor,
        new_complaint,
        Utc::now(),
    )
    .await?;
    respond(&state, StatusCode::CREATED, complaint).await
}

pub async fn update_complaint<S: AppState>(
    State(state): State<S>,
    actor: AuthenticatedUser,
    Path(id): Path<ComplaintId>,
    ApiJson(body): ApiJson<UpdateComplaintRequest>,
) -> Result<ApiSuccess<OneComplaintResponse>, ApiError> {
    let changes = body.into_domain()?;
    let complaint = workflow::update_complaint(
        state.complaints(),
        state.students(),
        state.locations(),
        &actor,
        id,
        changes,
        Utc::now(),
    )
    .await?;
    respond(&state, StatusCode::OK, complaint).await
}

pub async fn submit_complaint<S: AppState>(
    State(state): State<S>,
    actor: AuthenticatedUser,
    Path(id): Path<ComplaintId>,
) -> Result<ApiSuccess<OneComplaintResponse>, ApiError> {
    let complaint =
        workflow::submit_complaint(state.complaints(), &actor, id, Utc::now()).await?;
    respond(&state, StatusCode::OK, complaint).await
}

pub async fn decide_complaint<S: AppState>(
    State(state): State<S>,
    actor: AuthenticatedUser,
    Path(id): Path<ComplaintId>,
    ApiJson(body): ApiJson<DecideRequest>,
) -> Result<ApiSuccess<OneComplaintResponse>, ApiError> {
    let punishment = Punishment::try_new(body.punishment)
        .map_err(|err| ApiError::Validation(format!("punishment: {err}")))?;

    let complaint = workflow::decide_complaint(
        state.complaints(),
        &actor,
        id,
        punishment,
        body.notes,
        Utc::now(),
    )
    .await?;
    respond(&state, StatusCode::OK, complaint).await
}

pub async fn return_complaint<S: AppState>(
    State(state): State<S>,
    actor: AuthenticatedUser,
    Path(id): Path<ComplaintId>,
    ApiJson(body): ApiJson<ReturnRequest>,
) -> Result<ApiSuccess<OneComplaintResponse>, ApiError> {
    let notes = ReturnNotes::try_new(body.notes)
        .map_err(|err| ApiError::Validation(format!("notes: {err}")))?;

    let complaint =
        workflow::return_complaint(state.complaints(), &actor, id, notes, Utc::now()).await?;
    respond(&state, StatusCode::OK, complaint).await
}

async fn respond<S: AppState>(
    state: &S,
    status: StatusCode,
    complaint: Complaint,
) -> Result<ApiSuccess<OneComplaintResponse>, ApiError> {
    let references = load_references(state, std::slice::from_ref(&complaint)).await?;
    Ok(ApiSuccess::new(
        status,
        OneComplaintResponse {
            data: ComplaintResponse::assemble(complaint, &references),
        },
    ))
}

/// Batch-loads the student/user/location rows a set of complaints points
/// at, one query per table.
async fn load_references<S: AppState>(
    state: &S,
    complaints: &[Complaint],
) -> Result<References, ApiError> {
    let mut student_ids: Vec<StudentId> = complaints.iter().map(|c| c.student_id).collect();
    student_ids.sort_unstable_by_key(|id| id.0);
    student_ids.dedup();

    let mut user_ids: Vec<UserId> = complaints
        .iter()
        .flat_map(|c| {
            std::iter::once(c.teacher_id)
                .chain(c.incident.involved_people.iter().map(|p| p.user_id))
        })
        .collect();
    user_ids.sort_unstable_by_key(|id| id.0);
    user_ids.dedup();

    let mut location_ids: Vec<LocationId> =
        complaints.iter().map(|c| c.incident.location_id).collect();
    location_ids.sort_unstable_by_key(|id| id.0);
    location_ids.dedup();

    let students = state.students().find_by_ids(&student_ids).await?;
    let users = state.users().find_by_ids(&user_ids).await?;
    let locations = state.locations().find_by_ids(&location_ids).await?;

    Ok(References {
        students: students.into_iter().map(|s| (s.id, s)).collect(),
        users: users.into_iter().map(|u| (u.id, u)).collect(),
        locations: locations.into_iter().map(|l| (l.id, l)).collect(),
    })
}
