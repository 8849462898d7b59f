use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use uuid::Uuid;

use complaints_common::database::Database;
use complaints_common::{ComplaintId, StudentId, UserId};

use crate::domain::complaint::{Complaint, ComplaintStatus, Decision, HistoryEntry, Incident};
use crate::domain::repository::{ComplaintRepository, RepositoryError};
use crate::infrastructure::persistence::map_db_error;

const SELECT_COLUMNS: &str = "id, student_id, teacher_id, status, incident, decision, history, \
     submitted_at, last_updated_at, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresComplaintRepository {
    database: &'static Database,
}

impl PostgresComplaintRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn row_to_complaint(row: &PgRow) -> Result<Complaint, RepositoryError> {
        let id: Uuid = row.try_get("id").map_err(map_column_error)?;
        let student_id: Uuid = row.try_get("student_id").map_err(map_column_error)?;
        let teacher_id: Uuid = row.try_get("teacher_id").map_err(map_column_error)?;

        let status: String = row.try_get("status").map_err(map_column_error)?;
        let status: ComplaintStatus = status.parse().map_err(|_| {
            RepositoryError::DatabaseError(format!("unknown complaint status `{}`", status))
        })?;

        let incident: Json<Incident> = row.try_get("incident").map_err(map_column_error)?;
        let decision: Option<Json<Decision>> =
            row.try_get("decision").map_err(map_column_error)?;
        let history: Json<Vec<HistoryEntry>> =
            row.try_get("history").map_err(map_column_error)?;

        let submitted_at: Option<DateTime<Utc>> =
            row.try_get("submitted_at").map_err(map_column_error)?;
        let last_updated_at: Option<DateTime<Utc>> =
            row.try_get("last_updated_at").map_err(map_column_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_column_error)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(map_column_error)?;

        Ok(Complaint {
            id: ComplaintId(id),
            student_id: StudentId(student_id),
            teacher_id: UserId(teacher_id),
            status,
            incident: incident.0,
            submitted_at,
            last_updated_at,
            decision: decision.map(|d| d.0),
            history: history.0,
            created_at,
            updated_at,
        })
    }

    async fn fetch_many(&self, sql: String, bind: Option<Uuid>) -> Result<Vec<Complaint>, RepositoryError> {
        let mut query = sqlx::query(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }

        let rows = query
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        rows.iter().map(Self::row_to_complaint).collect()
    }
}

fn map_column_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(format!("failed to read complaint row: {}", error))
}

impl ComplaintRepository for PostgresComplaintRepository {
    async fn find_all(&self) -> Result<Vec<Complaint>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".complaints",
            SELECT_COLUMNS,
            self.database.database_schema()
        );
        self.fetch_many(sql, None).await
    }

    async fn find_by_teacher(&self, teacher_id: UserId) -> Result<Vec<Complaint>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".complaints WHERE teacher_id = $1",
            SELECT_COLUMNS,
            self.database.database_schema()
        );
        self.fetch_many(sql, Some(teacher_id.0)).await
    }

    async fn find_by_student(&self, student_id: StudentId) -> Result<Vec<Complaint>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".complaints WHERE student_id = $1",
            SELECT_COLUMNS,
            self.database.database_schema()
        );
        self.fetch_many(sql, Some(student_id.0)).await
    }

    async fn find_by_id(&self, id: ComplaintId) -> Result<Option<Complaint>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".complaints WHERE id = $1",
            SELECT_COLUMNS,
            self.database.database_schema()
        );

        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        row.as_ref().map(Self::row_to_complaint).transpose()
    }

    async fn insert(&self, complaint: &Complaint) -> Result<(), RepositoryError> {
        let sql = format!(
            "INSERT INTO \"{}\".complaints \
             (id, student_id, teacher_id, status, incident, decision, history, \
              submitted_at, last_updated_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            self.database.database_schema()
        );

        sqlx::query(&sql)
            .bind(complaint.id.0)
            .bind(complaint.student_id.0)
            .bind(complaint.teacher_id.0)
            .bind(complaint.status.as_str())
            .bind(Json(&complaint.incident))
            .bind(complaint.decision.as_ref().map(Json))
            .bind(Json(&complaint.history))
            .bind(complaint.submitted_at)
            .bind(complaint.last_updated_at)
            .bind(complaint.created_at)
            .bind(complaint.updated_at)
            .execute(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    async fn save(&self, complaint: &Complaint) -> Result<(), RepositoryError> {
        let sql = format!(
            "UPDATE \"{}\".complaints SET \
             student_id = $2, status = $3, incident = $4, decision = $5, history = $6, \
             submitted_at = $7, last_updated_at = $8, updated_at = $9 \
             WHERE id = $1",
            self.database.database_schema()
        );

        let result = sqlx::query(&sql)
            .bind(complaint.id.0)
            .bind(complaint.student_id.0)
            .bind(complaint.status.as_str())
            .bind(Json(&complaint.incident))
            .bind(complaint.decision.as_ref().map(Json))
            .bind(Json(&complaint.history))
            .bind(complaint.submitted_at)
            .bind(complaint.last_updated_at)
            .bind(complaint.updated_at)
            .execute(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
