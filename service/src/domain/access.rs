//! Table-driven authorization for complaint operations.
//!
//! Every mutating endpoint runs the same two checks, in order: role
//! membership, then ownership where the operation demands it. These run
//! BEFORE the lifecycle guard, so a caller can tell a permission problem
//! apart from a state conflict.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use complaints_common::{Role, UserId};

use crate::domain::AuthenticatedUser;
use crate::domain::complaint::Complaint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintOperation {
    View,
    Create,
    Update,
    Submit,
    Decide,
    Return,
}

impl fmt::Display for ComplaintOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComplaintOperation::View => "view",
            ComplaintOperation::Create => "create",
            ComplaintOperation::Update => "update",
            ComplaintOperation::Submit => "submit",
            ComplaintOperation::Decide => "decide",
            ComplaintOperation::Return => "return",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("role {role} may not {operation} complaints")]
    RoleNotAllowed {
        operation: ComplaintOperation,
        role: Role,
    },
    #[error("only the authoring teacher may {operation} a complaint")]
    NotOwner { operation: ComplaintOperation },
    #[error("access denied")]
    NotVisible,
    #[error("role {role} may not read the student roster")]
    RosterNotAllowed { role: Role },
}

struct Rule {
    roles: &'static [Role],
    requires_ownership: bool,
}

/// The one place operation rules live. Handlers consume this table
/// through [`authorize`] instead of branching on roles themselves.
fn rule_for(operation: ComplaintOperation) -> Rule {
    match operation {
        ComplaintOperation::View => Rule {
            roles: &[Role::Principal, Role::Teacher, Role::Student],
            requires_ownership: false,
        },
        ComplaintOperation::Create => Rule {
            roles: &[Role::Teacher],
            requires_ownership: false,
        },
        ComplaintOperation::Update | ComplaintOperation::Submit => Rule {
            roles: &[Role::Teacher],
            requires_ownership: true,
        },
        ComplaintOperation::Decide | ComplaintOperation::Return => Rule {
            roles: &[Role::Principal],
            requires_ownership: false,
        },
    }
}

/// Checks role membership, then ownership. `owner` is the complaint's
/// `teacher_id` and must be supplied for operations on an existing
/// complaint.
pub fn authorize(
    actor: &AuthenticatedUser,
    operation: ComplaintOperation,
    owner: Option<UserId>,
) -> Result<(), AccessError> {
    let rule = rule_for(operation);

    if !rule.roles.contains(&actor.role) {
        return Err(AccessError::RoleNotAllowed {
            operation,
            role: actor.role,
        });
    }

    if rule.requires_ownership && owner != Some(actor.id) {
        return Err(AccessError::NotOwner { operation });
    }

    Ok(())
}

/// Staff roles allowed to browse the student roster. Student accounts
/// only ever see their own record through the complaints they appear in.
const ROSTER_ROLES: &[Role] = &[Role::Principal, Role::Teacher];

pub fn authorize_roster(actor: &AuthenticatedUser) -> Result<(), AccessError> {
    if ROSTER_ROLES.contains(&actor.role) {
        Ok(())
    } else {
        Err(AccessError::RosterNotAllowed { role: actor.role })
    }
}

/// What slice of the complaint list a caller may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadScope {
    /// Principals see everything.
    All,
    /// Teachers see their own complaints.
    OwnedBy(UserId),
    /// Student proxies see complaints naming their student record.
    Subject(complaints_common::StudentId),
    /// A student account without a linked student record sees nothing.
    Nothing,
}

pub fn read_scope(actor: &AuthenticatedUser) -> ReadScope {
    match actor.role {
        Role::Principal => ReadScope::All,
        Role::Teacher => ReadScope::OwnedBy(actor.id),
        Role::Student => match actor.student_ref {
            Some(student_id) => ReadScope::Subject(student_id),
            None => ReadScope::Nothing,
        },
    }
}

/// Single-complaint visibility, consistent with [`read_scope`].
pub fn authorize_view(
    actor: &AuthenticatedUser,
    complaint: &Complaint,
) -> Result<(), AccessError> {
    let visible = match read_scope(actor) {
        ReadScope::All => true,
        ReadScope::OwnedBy(teacher_id) => complaint.teacher_id == teacher_id,
        ReadScope::Subject(student_id) => complaint.student_id == student_id,
        ReadScope::Nothing => false,
    };

    if visible {
        Ok(())
    } else {
        Err(AccessError::NotVisible)
    }
}
