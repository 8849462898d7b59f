use serde::{Deserialize, Serialize};

use complaints_common::entities::User;
use complaints_common::{Role, StudentId, UserId};

use crate::domain::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_ref: Option<StudentId>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.display_name(),
            role: user.role,
            student_ref: user.student_ref,
        }
    }
}

impl From<&AuthenticatedUser> for UserResponse {
    fn from(actor: &AuthenticatedUser) -> Self {
        Self {
            id: actor.id,
            name: actor.name.clone(),
            role: actor.role,
            student_ref: actor.student_ref,
        }
    }
}
