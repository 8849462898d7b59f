//! Orchestration of one complaint operation: authorize, load, run the
//! lifecycle transition, persist. Generic over the repository traits so
//! the whole flow is testable without HTTP or Postgres.

use chrono::{DateTime, Utc};

use complaints_common::{ComplaintId, StudentId};

use crate::domain::AuthenticatedUser;
use crate::domain::access::{self, ComplaintOperation, ReadScope};
use crate::domain::complaint::error::WorkflowError;
use crate::domain::complaint::{
    Complaint, ComplaintChanges, Incident, Punishment, ReturnNotes,
};
use crate::domain::repository::{
    ComplaintRepository, LocationRepository, StudentRepository,
};

/// Validated input of the create operation.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub student_id: StudentId,
    pub incident: Incident,
}

pub async fn list_complaints<C: ComplaintRepository>(
    complaints: &C,
    actor: &AuthenticatedUser,
) -> Result<Vec<Complaint>, WorkflowError> {
    let mut found = match access::read_scope(actor) {
        ReadScope::All => complaints.find_all().await?,
        ReadScope::OwnedBy(teacher_id) => complaints.find_by_teacher(teacher_id).await?,
        ReadScope::Subject(student_id) => complaints.find_by_student(student_id).await?,
        ReadScope::Nothing => Vec::new(),
    };

    // Newest first.
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(found)
}

pub async fn get_complaint<C: ComplaintRepository>(
    complaints: &C,
    actor: &AuthenticatedUser,
    id: ComplaintId,
) -> Result<Complaint, WorkflowError> {
    let complaint = complaints
        .find_by_id(id)
        .await?
        .ok_or(WorkflowError::NotFound)?;

    access::authorize_view(actor, &complaint)?;
    Ok(complaint)
}

pub async fn create_complaint<C, S, L>(
    complaints: &C,
    students: &S,
    locations: &L,
    actor: &AuthenticatedUser,
    new_complaint: NewComplaint,
    now: DateTime<Utc>,
) -> Result<Complaint, WorkflowError>
where
    C: ComplaintRepository,
    S: StudentRepository,
    L: LocationRepository,
{
    access::authorize(actor, ComplaintOperation::Create, None)?;

    ensure_student_exists(students, new_complaint.student_id).await?;
    ensure_location_exists(locations, new_complaint.incident.location_id).await?;

    let complaint = Complaint::create(actor.id, new_complaint.student_id, new_complaint.incident, now);
    complaints.insert(&complaint).await?;

    tracing::info!(complaint = %complaint.id, teacher = %actor.id, "complaint created");
    Ok(complaint)
}

pub async fn update_complaint<C, S, L>(
    complaints: &C,
    students: &S,
    locations: &L,
    actor: &AuthenticatedUser,
    id: ComplaintId,
    changes: ComplaintChanges,
    now: DateTime<Utc>,
) -> Result<Complaint, WorkflowError>
where
    C: ComplaintRepository,
    S: StudentRepository,
    L: LocationRepository,
{
    let mut complaint = complaints
        .find_by_id(id)
        .await?
        .ok_or(WorkflowError::NotFound)?;

    access::authorize(actor, ComplaintOperation::Update, Some(complaint.teacher_id))?;

    if let Some(student_id) = changes.student_id {
        ensure_student_exists(students, student_id).await?;
    }
    if let Some(location_id) = changes.location_id {
        ensure_location_exists(locations, location_id).await?;
    }

    complaint.apply_update(changes, actor.id, now)?;
    complaints.save(&complaint).await?;
    Ok(complaint)
}

pub async fn submit_complaint<C: ComplaintRepository>(
    complaints: &C,
    actor: &AuthenticatedUser,
    id: ComplaintId,
    now: DateTime<Utc>,
) -> Result<Complaint, WorkflowError> {
    let mut complaint = complaints
        .find_by_id(id)
        .await?
        .ok_or(WorkflowError::NotFound)?;

    access::authorize(actor, ComplaintOperation::Submit, Some(complaint.teacher_id))?;

    complaint.submit(actor.id, now)?;
    complaints.save(&complaint).await?;

    tracing::info!(complaint = %complaint.id, "complaint submitted");
    Ok(complaint)
}

pub async fn decide_complaint<C: ComplaintRepository>(
    complaints: &C,
    actor: &AuthenticatedUser,
    id: ComplaintId,
    punishment: Punishment,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<Complaint, WorkflowError> {
    let mut complaint = complaints
        .find_by_id(id)
        .await?
        .ok_or(WorkflowError::NotFound)?;

    access::authorize(actor, ComplaintOperation::Decide, Some(complaint.teacher_id))?;

    complaint.decide(actor.id, punishment, notes, now)?;
    complaints.save(&complaint).await?;

    tracing::info!(complaint = %complaint.id, principal = %actor.id, "complaint decided");
    Ok(complaint)
}

pub async fn return_complaint<C: ComplaintRepository>(
    complaints: &C,
    actor: &AuthenticatedUser,
    id: ComplaintId,
    notes: ReturnNotes,
    now: DateTime<Utc>,
) -> Result<Complaint, WorkflowError> {
    let mut complaint = complaints
        .find_by_id(id)
        .await?
        .ok_or(WorkflowError::NotFound)?;

    access::authorize(actor, ComplaintOperation::Return, Some(complaint.teacher_id))?;

    complaint.return_for_update(actor.id, notes, now)?;
    complaints.save(&complaint).await?;

    tracing::info!(complaint = %complaint.id, principal = %actor.id, "complaint returned for update");
    Ok(complaint)
}

async fn ensure_student_exists<S: StudentRepository>(
    students: &S,
    id: StudentId,
) -> Result<(), WorkflowError> {
    students
        .find_by_id(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| WorkflowError::Validation(format!("unknown student {id}")))
}

async fn ensure_location_exists<L: LocationRepository>(
    locations: &L,
    id: complaints_common::LocationId,
) -> Result<(), WorkflowError> {
    locations
        .find_by_id(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| WorkflowError::Validation(format!("unknown location {id}")))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::access::AccessError;
    use crate::domain::complaint::{ComplaintStatus, HistoryAction, IncidentDescription};
    use crate::domain::test_utils::{Fixture, authenticated};

    fn incident(fixture: &Fixture) -> Incident {
        Incident {
            date: Utc::now(),
            location_id: fixture.playground.id,
            description: IncidentDescription::try_new("Fight during recess").unwrap(),
            involved_people: Vec::new(),
        }
    }

    async fn created_draft(fixture: &Fixture) -> Complaint {
        create_complaint(
            &fixture.complaints,
            &fixture.students,
            &fixture.locations,
            &authenticated(&fixture.teacher1),
            NewComplaint {
                student_id: fixture.alice.id,
                incident: incident(fixture),
            },
            Utc::now(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_submit_decide_happy_path() {
        let fixture = Fixture::new();
        let teacher = authenticated(&fixture.teacher1);
        let principal = authenticated(&fixture.principal);

        let draft = created_draft(&fixture).await;
        assert_eq!(draft.status, ComplaintStatus::Draft);

        let submitted = submit_complaint(&fixture.complaints, &teacher, draft.id, Utc::now())
            .await
            .unwrap();
        assert_eq!(submitted.status, ComplaintStatus::Submitted);
        assert!(submitted.submitted_at.is_some());
        assert_eq!(
            submitted.history.iter().map(|h| h.action).collect::<Vec<_>>(),
            vec![HistoryAction::Created, HistoryAction::Updated]
        );

        let closed = decide_complaint(
            &fixture.complaints,
            &principal,
            draft.id,
            Punishment::try_new("detention").unwrap(),
            None,
            Utc::now(),
        )
        .await
        .unwrap();
        assert_eq!(closed.status, ComplaintStatus::Closed);
        assert_eq!(
            closed.decision.as_ref().unwrap().punishment.as_ref(),
            "detention"
        );
        assert_eq!(
            closed.history.iter().map(|h| h.action).collect::<Vec<_>>(),
            vec![
                HistoryAction::Created,
                HistoryAction::Updated,
                HistoryAction::Decided
            ]
        );

        // The stored document matches what was returned.
        let stored = fixture.complaints.get(draft.id);
        assert_eq!(stored, closed);
    }

    #[tokio::test]
    async fn return_cycle_allows_update_but_not_decide() {
        let fixture = Fixture::new();
        let teacher = authenticated(&fixture.teacher1);
        let principal = authenticated(&fixture.principal);

        let draft = created_draft(&fixture).await;
        submit_complaint(&fixture.complaints, &teacher, draft.id, Utc::now())
            .await
            .unwrap();

        let returned = return_complaint(
            &fixture.complaints,
            &principal,
            draft.id,
            ReturnNotes::try_new("incomplete").unwrap(),
            Utc::now(),
        )
        .await
        .unwrap();
        assert_eq!(returned.status, ComplaintStatus::ReturnedForUpdate);
        assert_eq!(
            returned.history.last().unwrap().action,
            HistoryAction::Returned
        );

        // The owning teacher may edit again.
        let updated = update_complaint(
            &fixture.complaints,
            &fixture.students,
            &fixture.locations,
            &teacher,
            draft.id,
            ComplaintChanges {
                description: Some(IncidentDescription::try_new("Corrected account").unwrap()),
                ..ComplaintChanges::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
        assert_eq!(updated.incident.description.as_ref(), "Corrected account");

        // Deciding a returned complaint is a state conflict.
        let err = decide_complaint(
            &fixture.complaints,
            &principal,
            draft.id,
            Punishment::try_new("detention").unwrap(),
            None,
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::StateConflict(_)));
        assert_eq!(
            fixture.complaints.get(draft.id).status,
            ComplaintStatus::ReturnedForUpdate
        );
    }

    #[tokio::test]
    async fn non_owner_teacher_is_rejected_before_the_guard() {
        let fixture = Fixture::new();
        let other_teacher = authenticated(&fixture.teacher2);

        let draft = created_draft(&fixture).await;

        // Submit would pass the guard (status is Draft); ownership fails first.
        let err = submit_complaint(&fixture.complaints, &other_teacher, draft.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Forbidden(AccessError::NotOwner { .. })
        ));
        assert_eq!(fixture.complaints.get(draft.id).status, ComplaintStatus::Draft);

        let err = update_complaint(
            &fixture.complaints,
            &fixture.students,
            &fixture.locations,
            &other_teacher,
            draft.id,
            ComplaintChanges::default(),
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn teachers_cannot_decide_or_return_even_their_own() {
        let fixture = Fixture::new();
        let teacher = authenticated(&fixture.teacher1);

        let draft = created_draft(&fixture).await;
        submit_complaint(&fixture.complaints, &teacher, draft.id, Utc::now())
            .await
            .unwrap();

        let err = decide_complaint(
            &fixture.complaints,
            &teacher,
            draft.id,
            Punishment::try_new("detention").unwrap(),
            None,
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Forbidden(AccessError::RoleNotAllowed { .. })
        ));

        let err = return_complaint(
            &fixture.complaints,
            &teacher,
            draft.id,
            ReturnNotes::try_new("notes").unwrap(),
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
        assert_eq!(
            fixture.complaints.get(draft.id).status,
            ComplaintStatus::Submitted
        );
    }

    #[tokio::test]
    async fn listing_is_scoped_by_role() {
        let fixture = Fixture::new();
        let teacher1 = authenticated(&fixture.teacher1);
        let teacher2 = authenticated(&fixture.teacher2);
        let principal = authenticated(&fixture.principal);

        let own = created_draft(&fixture).await;
        let other = create_complaint(
            &fixture.complaints,
            &fixture.students,
            &fixture.locations,
            &teacher2,
            NewComplaint {
                student_id: fixture.bob.id,
                incident: incident(&fixture),
            },
            Utc::now(),
        )
        .await
        .unwrap();

        let principal_view = list_complaints(&fixture.complaints, &principal).await.unwrap();
        assert_eq!(principal_view.len(), 2);

        let teacher_view = list_complaints(&fixture.complaints, &teacher1).await.unwrap();
        assert_eq!(teacher_view.len(), 1);
        assert_eq!(teacher_view[0].id, own.id);

        let student_view = list_complaints(
            &fixture.complaints,
            &authenticated(&fixture.bob_account),
        )
        .await
        .unwrap();
        assert_eq!(student_view.len(), 1);
        assert_eq!(student_view[0].id, other.id);
    }

    #[tokio::test]
    async fn single_complaint_visibility_follows_the_same_scope() {
        let fixture = Fixture::new();
        let teacher2 = authenticated(&fixture.teacher2);

        let draft = created_draft(&fixture).await;

        let err = get_complaint(&fixture.complaints, &teacher2, draft.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Forbidden(AccessError::NotVisible)
        ));

        let seen = get_complaint(
            &fixture.complaints,
            &authenticated(&fixture.principal),
            draft.id,
        )
        .await
        .unwrap();
        assert_eq!(seen.id, draft.id);
    }

    #[tokio::test]
    async fn unknown_references_fail_as_validation() {
        let fixture = Fixture::new();
        let teacher = authenticated(&fixture.teacher1);

        let err = create_complaint(
            &fixture.complaints,
            &fixture.students,
            &fixture.locations,
            &teacher,
            NewComplaint {
                student_id: StudentId::generate(),
                incident: incident(&fixture),
            },
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));

        let draft = created_draft(&fixture).await;
        let err = update_complaint(
            &fixture.complaints,
            &fixture.students,
            &fixture.locations,
            &teacher,
            draft.id,
            ComplaintChanges {
                location_id: Some(complaints_common::LocationId::generate()),
                ..ComplaintChanges::default()
            },
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_complaint_is_not_found() {
        let fixture = Fixture::new();
        let principal = authenticated(&fixture.principal);

        let err = get_complaint(
            &fixture.complaints,
            &principal,
            complaints_common::ComplaintId::generate(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound));
    }
}
