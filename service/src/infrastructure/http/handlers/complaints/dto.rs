use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use complaints_common::entities::{Location, Student, User};
use complaints_common::{ComplaintId, LocationId, StudentId, UserId};

use crate::domain::complaint::workflow::NewComplaint;
use crate::domain::complaint::{
    Complaint, ComplaintChanges, ComplaintStatus, HistoryAction, HistoryEntry, Incident,
    IncidentDescription, InvolvedPerson,
};
use crate::infrastructure::http::api::ApiError;

// Requests. Validated fields arrive as plain strings and are converted
// into the domain newtypes here, so malformed input fails as a 400
// rather than a deserialization rejection.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    pub student_id: StudentId,
    pub incident: IncidentRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRequest {
    pub date: DateTime<Utc>,
    pub location_id: LocationId,
    pub description: String,
    #[serde(default)]
    pub involved_people: Vec<InvolvedPersonRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvolvedPersonRequest {
    pub user_id: UserId,
    pub role: Option<String>,
}

impl CreateComplaintRequest {
    pub fn into_domain(self) -> Result<NewComplaint, ApiError> {
        Ok(NewComplaint {
            student_id: self.student_id,
            incident: self.incident.into_domain()?,
        })
    }
}

impl IncidentRequest {
    fn into_domain(self) -> Result<Incident, ApiError> {
        let description = IncidentDescription::try_new(self.description)
            .map_err(|err| ApiError::Validation(format!("incident description: {err}")))?;

        Ok(Incident {
            date: self.date,
            location_id: self.location_id,
            description,
            involved_people: self
                .involved_people
                .into_iter()
                .map(InvolvedPersonRequest::into_domain)
                .collect(),
        })
    }
}

impl InvolvedPersonRequest {
    fn into_domain(self) -> InvolvedPerson {
        InvolvedPerson {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    pub student_id: Option<StudentId>,
    pub incident: Option<IncidentPatchRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentPatchRequest {
    pub date: Option<DateTime<Utc>>,
    pub location_id: Option<LocationId>,
    pub description: Option<String>,
    pub involved_people: Option<Vec<InvolvedPersonRequest>>,
}

impl UpdateComplaintRequest {
    pub fn into_domain(self) -> Result<ComplaintChanges, ApiError> {
        let mut changes = ComplaintChanges {
            student_id: self.student_id,
            ..ComplaintChanges::default()
        };

        if let Some(incident) = self.incident {
            changes.date = incident.date;
            changes.location_id = incident.location_id;
            changes.description = incident
                .description
                .map(IncidentDescription::try_new)
                .transpose()
                .map_err(|err| ApiError::Validation(format!("incident description: {err}")))?;
            changes.involved_people = incident.involved_people.map(|people| {
                people
                    .into_iter()
                    .map(InvolvedPersonRequest::into_domain)
                    .collect()
            });
        }

        Ok(changes)
    }
}

#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub punishment: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    pub notes: String,
}

// Responses. Referenced student/teacher/location rows are expanded into
// small name-bearing objects; a dangling reference becomes `null`
// rather than failing the whole request.

#[derive(Debug, Clone, Serialize)]
pub struct ManyComplaintsResponse {
    pub data: Vec<ComplaintResponse>,
    pub meta: MetadataResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataResponse {
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OneComplaintResponse {
    pub data: ComplaintResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: ComplaintId,
    pub status: ComplaintStatus,
    pub student: Option<StudentRefResponse>,
    pub teacher: Option<UserRefResponse>,
    pub incident: IncidentResponse,
    pub decision: Option<DecisionResponse>,
    pub history: Vec<HistoryEntryResponse>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRefResponse {
    pub id: StudentId,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRefResponse {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRefResponse {
    pub id: LocationId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResponse {
    pub date: DateTime<Utc>,
    pub location: Option<LocationRefResponse>,
    pub description: String,
    pub involved_people: Vec<InvolvedPersonResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvolvedPersonResponse {
    pub user: Option<UserRefResponse>,
    pub user_id: UserId,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub decided_by: UserId,
    pub punishment: String,
    pub notes: Option<String>,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub action: HistoryAction,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Lookup maps of the rows referenced by a batch of complaints.
pub struct References {
    pub students: HashMap<StudentId, Student>,
    pub users: HashMap<UserId, User>,
    pub locations: HashMap<LocationId, Location>,
}

impl ComplaintResponse {
    pub fn assemble(complaint: Complaint, references: &References) -> Self {
        let student = references.students.get(&complaint.student_id).map(|s| {
            StudentRefResponse {
                id: s.id,
                student_number: s.student_number.to_string(),
                first_name: s.first_name.clone(),
                last_name: s.last_name.clone(),
            }
        });
        let teacher = references.users.get(&complaint.teacher_id).map(user_ref);
        let location = references
            .locations
            .get(&complaint.incident.location_id)
            .map(|l| LocationRefResponse {
                id: l.id,
                name: l.name.to_string(),
            });

        let involved_people = complaint
            .incident
            .involved_people
            .iter()
            .map(|person| InvolvedPersonResponse {
                user: references.users.get(&person.user_id).map(user_ref),
                user_id: person.user_id,
                role: person.role.clone(),
            })
            .collect();

        ComplaintResponse {
            id: complaint.id,
            status: complaint.status,
            student,
            teacher,
            incident: IncidentResponse {
                date: complaint.incident.date,
                location,
                description: complaint.incident.description.to_string(),
                involved_people,
            },
            decision: complaint.decision.map(|d| DecisionResponse {
                decided_by: d.decided_by,
                punishment: d.punishment.to_string(),
                notes: d.notes,
                decided_at: d.decided_at,
            }),
            history: complaint.history.iter().map(history_entry).collect(),
            submitted_at: complaint.submitted_at,
            last_updated_at: complaint.last_updated_at,
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        }
    }
}

fn user_ref(user: &User) -> UserRefResponse {
    UserRefResponse {
        id: user.id,
        name: user.display_name(),
    }
}

fn history_entry(entry: &HistoryEntry) -> HistoryEntryResponse {
    HistoryEntryResponse {
        action: entry.action,
        user_id: entry.user_id,
        timestamp: entry.timestamp,
        notes: entry.notes.clone(),
    }
}
