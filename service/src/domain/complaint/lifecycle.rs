use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use complaints_common::{ComplaintId, StudentId, UserId};

use crate::domain::complaint::error::TransitionError;
use crate::domain::complaint::{
    Complaint, ComplaintChanges, Decision, HistoryEntry, Incident, Punishment, ReturnNotes,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    /// Being drafted by its teacher.
    Draft,
    /// Handed to the principal, read-only for the teacher.
    Submitted,
    /// Sent back by the principal; editable again.
    ReturnedForUpdate,
    /// Reserved. Present in the stored enum for schema compatibility,
    /// but no transition produces or accepts it.
    PendingDecision,
    /// Terminal. Carries the decision.
    Closed,
}

impl ComplaintStatus {
    /// Statuses in which the authoring teacher may still edit fields.
    pub fn is_editable(self) -> bool {
        matches!(self, ComplaintStatus::Draft | ComplaintStatus::ReturnedForUpdate)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Draft => "DRAFT",
            ComplaintStatus::Submitted => "SUBMITTED",
            ComplaintStatus::ReturnedForUpdate => "RETURNED_FOR_UPDATE",
            ComplaintStatus::PendingDecision => "PENDING_DECISION",
            ComplaintStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(ComplaintStatus::Draft),
            "SUBMITTED" => Ok(ComplaintStatus::Submitted),
            "RETURNED_FOR_UPDATE" => Ok(ComplaintStatus::ReturnedForUpdate),
            "PENDING_DECISION" => Ok(ComplaintStatus::PendingDecision),
            "CLOSED" => Ok(ComplaintStatus::Closed),
            other => Err(format!("unknown complaint status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryAction {
    Created,
    Updated,
    Returned,
    Decided,
}

impl Complaint {
    /// Files a new complaint in `Draft` with a single `Created` history
    /// entry. Field validation happens at the edge; by the time an
    /// `Incident` value exists it is well-formed.
    pub fn create(
        teacher_id: UserId,
        student_id: StudentId,
        incident: Incident,
        now: DateTime<Utc>,
    ) -> Self {
        Complaint {
            id: ComplaintId::generate(),
            student_id,
            teacher_id,
            status: ComplaintStatus::Draft,
            incident,
            submitted_at: None,
            last_updated_at: None,
            decision: None,
            history: vec![HistoryEntry {
                action: HistoryAction::Created,
                user_id: teacher_id,
                timestamp: now,
                notes: Some("Complaint created".to_string()),
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges field changes while the complaint is editable
    /// (`Draft` or `ReturnedForUpdate`).
    pub fn apply_update(
        &mut self,
        changes: ComplaintChanges,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if !self.status.is_editable() {
            return Err(TransitionError::new("update", self.status));
        }

        if let Some(student_id) = changes.student_id {
            self.student_id = student_id;
        }
        if let Some(date) = changes.date {
            self.incident.date = date;
        }
        if let Some(location_id) = changes.location_id {
            self.incident.location_id = location_id;
        }
        if let Some(description) = changes.description {
            self.incident.description = description;
        }
        if let Some(involved_people) = changes.involved_people {
            self.incident.involved_people = involved_people;
        }

        self.last_updated_at = Some(now);
        self.record(HistoryAction::Updated, actor, now, Some("Complaint updated".to_string()));
        Ok(())
    }

    /// Hands a draft to the principal.
    pub fn submit(&mut self, actor: UserId, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.status != ComplaintStatus::Draft {
            return Err(TransitionError::new("submit", self.status));
        }

        self.status = ComplaintStatus::Submitted;
        self.submitted_at = Some(now);
        // Submission is logged as an UPDATED entry, not its own action.
        self.record(HistoryAction::Updated, actor, now, Some("Complaint submitted".to_string()));
        Ok(())
    }

    /// Closes a submitted complaint with the principal's decision.
    pub fn decide(
        &mut self,
        actor: UserId,
        punishment: Punishment,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if self.status != ComplaintStatus::Submitted {
            return Err(TransitionError::new("decide", self.status));
        }

        self.status = ComplaintStatus::Closed;
        self.decision = Some(Decision {
            decided_by: actor,
            punishment,
            notes,
            decided_at: now,
        });
        self.record(HistoryAction::Decided, actor, now, Some("Complaint decided".to_string()));
        Ok(())
    }

    /// Sends a submitted complaint back to its teacher. The principal's
    /// notes land in the history entry.
    pub fn return_for_update(
        &mut self,
        actor: UserId,
        notes: ReturnNotes,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if self.status != ComplaintStatus::Submitted {
            return Err(TransitionError::new("return", self.status));
        }

        self.status = ComplaintStatus::ReturnedForUpdate;
        self.record(HistoryAction::Returned, actor, now, Some(notes.into_inner()));
        Ok(())
    }

    fn record(
        &mut self,
        action: HistoryAction,
        actor: UserId,
        now: DateTime<Utc>,
        notes: Option<String>,
    ) {
        self.history.push(HistoryEntry {
            action,
            user_id: actor,
            timestamp: now,
            notes,
        });
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::domain::complaint::IncidentDescription;
    use complaints_common::LocationId;

    fn incident(now: DateTime<Utc>) -> Incident {
        Incident {
            date: now,
            location_id: LocationId::generate(),
            description: IncidentDescription::try_new("Fight during recess").unwrap(),
            involved_people: Vec::new(),
        }
    }

    fn draft(now: DateTime<Utc>) -> (Complaint, UserId) {
        let teacher = UserId::generate();
        let complaint = Complaint::create(teacher, StudentId::generate(), incident(now), now);
        (complaint, teacher)
    }

    #[test]
    fn create_starts_in_draft_with_created_history() {
        let now = Utc::now();
        let (complaint, teacher) = draft(now);

        assert_eq!(complaint.status, ComplaintStatus::Draft);
        assert!(complaint.decision.is_none());
        assert!(complaint.submitted_at.is_none());
        assert_eq!(complaint.history.len(), 1);
        assert_eq!(complaint.history[0].action, HistoryAction::Created);
        assert_eq!(complaint.history[0].user_id, teacher);
    }

    #[test]
    fn submit_moves_draft_to_submitted() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        let later = now + TimeDelta::minutes(5);

        complaint.submit(teacher, later).unwrap();

        assert_eq!(complaint.status, ComplaintStatus::Submitted);
        assert_eq!(complaint.submitted_at, Some(later));
        assert_eq!(
            complaint.history.iter().map(|h| h.action).collect::<Vec<_>>(),
            vec![HistoryAction::Created, HistoryAction::Updated]
        );
    }

    #[test]
    fn submit_outside_draft_is_a_conflict_and_changes_nothing() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        complaint.submit(teacher, now).unwrap();
        let before = complaint.clone();

        let err = complaint.submit(teacher, now).unwrap_err();

        assert_eq!(err.status, ComplaintStatus::Submitted);
        assert_eq!(complaint, before);
    }

    #[test]
    fn decide_closes_and_attaches_decision() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        complaint.submit(teacher, now).unwrap();

        let principal = UserId::generate();
        complaint
            .decide(
                principal,
                Punishment::try_new("detention").unwrap(),
                None,
                now,
            )
            .unwrap();

        assert_eq!(complaint.status, ComplaintStatus::Closed);
        let decision = complaint.decision.as_ref().unwrap();
        assert_eq!(decision.decided_by, principal);
        assert_eq!(decision.punishment.as_ref(), "detention");
        assert_eq!(
            complaint.history.iter().map(|h| h.action).collect::<Vec<_>>(),
            vec![
                HistoryAction::Created,
                HistoryAction::Updated,
                HistoryAction::Decided
            ]
        );
    }

    #[test]
    fn decide_requires_submitted() {
        let now = Utc::now();
        let (mut complaint, _) = draft(now);
        let before = complaint.clone();

        let err = complaint
            .decide(
                UserId::generate(),
                Punishment::try_new("detention").unwrap(),
                None,
                now,
            )
            .unwrap_err();

        assert_eq!(err.status, ComplaintStatus::Draft);
        assert_eq!(complaint, before);
        assert!(complaint.decision.is_none());
    }

    #[test]
    fn return_reopens_for_update_and_keeps_principal_notes() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        complaint.submit(teacher, now).unwrap();

        let principal = UserId::generate();
        complaint
            .return_for_update(principal, ReturnNotes::try_new("incomplete").unwrap(), now)
            .unwrap();

        assert_eq!(complaint.status, ComplaintStatus::ReturnedForUpdate);
        assert!(complaint.status.is_editable());
        let last = complaint.history.last().unwrap();
        assert_eq!(last.action, HistoryAction::Returned);
        assert_eq!(last.notes.as_deref(), Some("incomplete"));

        // Returned complaints are editable again and may not be decided.
        complaint
            .apply_update(ComplaintChanges::default(), teacher, now)
            .unwrap();
        let err = complaint
            .decide(
                principal,
                Punishment::try_new("detention").unwrap(),
                None,
                now,
            )
            .unwrap_err();
        assert_eq!(err.status, ComplaintStatus::ReturnedForUpdate);
    }

    #[test]
    fn return_requires_submitted() {
        let now = Utc::now();
        let (mut complaint, _) = draft(now);

        let err = complaint
            .return_for_update(
                UserId::generate(),
                ReturnNotes::try_new("notes").unwrap(),
                now,
            )
            .unwrap_err();

        assert_eq!(err.status, ComplaintStatus::Draft);
        assert_eq!(complaint.status, ComplaintStatus::Draft);
    }

    #[test]
    fn update_merges_fields_and_stamps_last_updated() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        let later = now + TimeDelta::hours(1);
        let new_location = LocationId::generate();

        complaint
            .apply_update(
                ComplaintChanges {
                    location_id: Some(new_location),
                    description: Some(IncidentDescription::try_new("Updated account").unwrap()),
                    ..ComplaintChanges::default()
                },
                teacher,
                later,
            )
            .unwrap();

        assert_eq!(complaint.incident.location_id, new_location);
        assert_eq!(complaint.incident.description.as_ref(), "Updated account");
        assert_eq!(complaint.last_updated_at, Some(later));
        assert_eq!(complaint.history.last().unwrap().action, HistoryAction::Updated);
    }

    #[test]
    fn update_is_rejected_once_submitted() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        complaint.submit(teacher, now).unwrap();
        let before = complaint.clone();

        let err = complaint
            .apply_update(ComplaintChanges::default(), teacher, now)
            .unwrap_err();

        assert_eq!(err.action, "update");
        assert_eq!(complaint, before);
    }

    #[test]
    fn closed_is_terminal() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        complaint.submit(teacher, now).unwrap();
        complaint
            .decide(
                UserId::generate(),
                Punishment::try_new("warning").unwrap(),
                None,
                now,
            )
            .unwrap();

        assert!(complaint.submit(teacher, now).is_err());
        assert!(complaint
            .apply_update(ComplaintChanges::default(), teacher, now)
            .is_err());
        assert!(complaint
            .return_for_update(
                UserId::generate(),
                ReturnNotes::try_new("late").unwrap(),
                now
            )
            .is_err());
        assert_eq!(complaint.status, ComplaintStatus::Closed);
    }

    #[test]
    fn nothing_transitions_out_of_pending_decision() {
        // Reserved status: every guard rejects it.
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        complaint.status = ComplaintStatus::PendingDecision;

        assert!(complaint.submit(teacher, now).is_err());
        assert!(complaint
            .apply_update(ComplaintChanges::default(), teacher, now)
            .is_err());
        assert!(complaint
            .decide(
                UserId::generate(),
                Punishment::try_new("detention").unwrap(),
                None,
                now
            )
            .is_err());
        assert!(complaint
            .return_for_update(
                UserId::generate(),
                ReturnNotes::try_new("notes").unwrap(),
                now
            )
            .is_err());
    }

    #[test]
    fn history_grows_by_exactly_one_per_transition() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        assert_eq!(complaint.history.len(), 1);

        complaint.submit(teacher, now).unwrap();
        assert_eq!(complaint.history.len(), 2);

        let principal = UserId::generate();
        complaint
            .return_for_update(principal, ReturnNotes::try_new("fix dates").unwrap(), now)
            .unwrap();
        assert_eq!(complaint.history.len(), 3);

        complaint
            .apply_update(ComplaintChanges::default(), teacher, now)
            .unwrap();
        assert_eq!(complaint.history.len(), 4);

        // A failed transition appends nothing.
        assert!(complaint.submit(teacher, now).is_err());
        assert_eq!(complaint.history.len(), 4);
    }

    #[test]
    fn decision_present_iff_closed() {
        let now = Utc::now();
        let (mut complaint, teacher) = draft(now);
        assert!(complaint.decision.is_none());

        complaint.submit(teacher, now).unwrap();
        assert!(complaint.decision.is_none());

        complaint
            .decide(
                UserId::generate(),
                Punishment::try_new("detention").unwrap(),
                Some("repeat offense".to_string()),
                now,
            )
            .unwrap();
        assert_eq!(complaint.status, ComplaintStatus::Closed);
        assert!(complaint.decision.is_some());
    }

    #[test]
    fn status_round_trips_through_storage_format() {
        for status in [
            ComplaintStatus::Draft,
            ComplaintStatus::Submitted,
            ComplaintStatus::ReturnedForUpdate,
            ComplaintStatus::PendingDecision,
            ComplaintStatus::Closed,
        ] {
            assert_eq!(status.as_str().parse::<ComplaintStatus>().unwrap(), status);
        }
        assert!("OPEN".parse::<ComplaintStatus>().is_err());
    }
}
