use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use complaints_common::database::Database;
use complaints_common::entities::{Location, LocationName, Student, StudentNumber};
use complaints_common::{LocationId, StudentId};

use crate::domain::repository::{LocationRepository, RepositoryError, StudentRepository};
use crate::infrastructure::persistence::map_db_error;

const STUDENT_COLUMNS: &str = "id, student_number, first_name, last_name, grade, class_name, \
     active, created_at, updated_at";
const LOCATION_COLUMNS: &str = "id, name, description, active, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresStudentRepository {
    database: &'static Database,
}

impl PostgresStudentRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn row_to_student(row: &PgRow) -> Result<Student, RepositoryError> {
        let id: Uuid = row.try_get("id").map_err(map_column_error)?;

        let student_number: String = row.try_get("student_number").map_err(map_column_error)?;
        let student_number = StudentNumber::try_new(&student_number).map_err(|e| {
            RepositoryError::DatabaseError(format!(
                "invalid student number `{}`: {}",
                student_number, e
            ))
        })?;

        let first_name: String = row.try_get("first_name").map_err(map_column_error)?;
        let last_name: String = row.try_get("last_name").map_err(map_column_error)?;
        let grade: String = row.try_get("grade").map_err(map_column_error)?;
        let class_name: String = row.try_get("class_name").map_err(map_column_error)?;
        let active: bool = row.try_get("active").map_err(map_column_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_column_error)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(map_column_error)?;

        Ok(Student {
            id: StudentId(id),
            student_number,
            first_name,
            last_name,
            grade,
            class_name,
            active,
            created_at,
            updated_at,
        })
    }
}

impl StudentRepository for PostgresStudentRepository {
    async fn find_active(&self) -> Result<Vec<Student>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".students WHERE active ORDER BY last_name, first_name",
            STUDENT_COLUMNS,
            self.database.database_schema()
        );

        let rows = sqlx::query(&sql)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        rows.iter().map(Self::row_to_student).collect()
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".students WHERE id = $1",
            STUDENT_COLUMNS,
            self.database.database_schema()
        );

        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        row.as_ref().map(Self::row_to_student).transpose()
    }

    async fn find_by_ids(&self, ids: &[StudentId]) -> Result<Vec<Student>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM \"{}\".students WHERE id = ANY($1)",
            STUDENT_COLUMNS,
            self.database.database_schema()
        );
        let ids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query(&sql)
            .bind(ids)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        rows.iter().map(Self::row_to_student).collect()
    }
}

#[derive(Clone)]
pub struct PostgresLocationRepository {
    database: &'static Database,
}

impl PostgresLocationRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn row_to_location(row: &PgRow) -> Result<Location, RepositoryError> {
        let id: Uuid = row.try_get("id").map_err(map_column_error)?;

        let name: String = row.try_get("name").map_err(map_column_error)?;
        let name = LocationName::try_new(&name).map_err(|e| {
            RepositoryError::DatabaseError(format!("invalid location name `{}`: {}", name, e))
        })?;

        let description: Option<String> = row.try_get("description").map_err(map_column_error)?;
        let active: bool = row.try_get("active").map_err(map_column_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_column_error)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(map_column_error)?;

        Ok(Location {
            id: LocationId(id),
            name,
            description,
            active,
            created_at,
            updated_at,
        })
    }
}

impl LocationRepository for PostgresLocationRepository {
    async fn find_active(&self) -> Result<Vec<Location>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".locations WHERE active ORDER BY name",
            LOCATION_COLUMNS,
            self.database.database_schema()
        );

        let rows = sqlx::query(&sql)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        rows.iter().map(Self::row_to_location).collect()
    }

    async fn find_by_id(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM \"{}\".locations WHERE id = $1",
            LOCATION_COLUMNS,
            self.database.database_schema()
        );

        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        row.as_ref().map(Self::row_to_location).transpose()
    }

    async fn find_by_ids(&self, ids: &[LocationId]) -> Result<Vec<Location>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM \"{}\".locations WHERE id = ANY($1)",
            LOCATION_COLUMNS,
            self.database.database_schema()
        );
        let ids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query(&sql)
            .bind(ids)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_db_error)?;

        rows.iter().map(Self::row_to_location).collect()
    }
}

fn map_column_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(format!("failed to read reference row: {}", error))
}
