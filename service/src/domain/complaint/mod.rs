use chrono::{DateTime, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};

use complaints_common::{ComplaintId, LocationId, StudentId, UserId};

pub mod error;
pub mod lifecycle;
pub mod workflow;

pub use lifecycle::{ComplaintStatus, HistoryAction};

/// Free-text description of what happened. Required and non-empty.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct IncidentDescription(String);

/// The punishment recorded by a principal's decision. Non-empty.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct Punishment(String);

/// Notes a principal attaches when returning a complaint. Non-empty:
/// the teacher has to know what to fix.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct ReturnNotes(String);

/// Somebody connected to the incident besides the subject student,
/// with a free-text note of how they were involved ("witness", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvolvedPerson {
    pub user_id: UserId,
    pub role: Option<String>,
}

/// The factual sub-record of a complaint. Set at creation, mutable only
/// while the complaint status is editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub date: DateTime<Utc>,
    pub location_id: LocationId,
    pub description: IncidentDescription,
    #[serde(default)]
    pub involved_people: Vec<InvolvedPerson>,
}

/// A principal's terminal disposition. Populated exactly once, by the
/// decide transition; present if and only if the complaint is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decided_by: UserId,
    pub punishment: Punishment,
    pub notes: Option<String>,
    pub decided_at: DateTime<Utc>,
}

/// One immutable audit record per applied transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

/// The central aggregate: an incident report filed by a teacher against
/// a student, moving through the lifecycle until a principal closes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    pub student_id: StudentId,
    /// The authoring teacher. Immutable once the complaint exists.
    pub teacher_id: UserId,
    pub status: ComplaintStatus,
    pub incident: Incident,
    pub submitted_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub decision: Option<Decision>,
    /// Append-only, chronological. Never mutated or truncated.
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied while a complaint is editable. `None` fields
/// are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ComplaintChanges {
    pub student_id: Option<StudentId>,
    pub date: Option<DateTime<Utc>>,
    pub location_id: Option<LocationId>,
    pub description: Option<IncidentDescription>,
    pub involved_people: Option<Vec<InvolvedPerson>>,
}
