use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use complaints_common::database::Database;
use complaints_common::entities::User;
use complaints_common::{Role, StudentId, UserId};

use crate::domain::repository::{RepositoryError, UserRepository};
use crate::infrastructure::persistence::map_db_error;

const SELECT_COLUMNS: &str = "id, email, password_hash, name, first_name, last_name, role, \
     student_ref, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresUserRepository {
    database: &'static Database,
}

impl PostgresUserRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn row_to_user(row: &PgRow) -> Result<User, RepositoryError> {
        let id: Uuid = row.try_get("id").map_err(map_column_error)?;
        let email: Option<String> = row.try_get("email").map_err(map_column_error)?;
        let password_hash: Option<String> =
            row.try_get("password_hash").map_err(map_column_error)?;
        let name: Option<String> = row.try_get("name").map_err(map_column_error)?;
        let first_name: Option<String> = row.try_get("first_name").map_err(map_column_error)?;
        let last_name: Option<String> = row.try_get("last_name").map_err(map_column_error)?;

        let role: String = row.try_get("role").map_err(map_column_error)?;
        let role: Role = role.parse().map_err(|_| {
            RepositoryError::DatabaseError(format!("unknown user role `{}`", role))
        })?;

        let student_ref: Option<Uuid> = row.try_get("student_ref").map_err(map_column_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_column_error)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(map_column_error)?;

        Ok(User {
            id: UserId(id),
            email,
            password_hash,
            name,
            first_name,
            last_name,
            role,
            student_ref: student_ref.map(StudentId),
            created_at,
            updated_at,
        })
    }
}

fn map_column_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(format!("failed to read user row: {}", error))
}

impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".users WHERE email = $1",
            SELECT_COLUMNS,
            self.database.database_schema()
        );

        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM \"{}\".users WHERE id = ANY($1)",
            SELECT_COLUMNS,
            self.database.database_schema()
        );
        let ids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query(&sql)
            .bind(ids)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        rows.iter().map(Self::row_to_user).collect()
    }
}
