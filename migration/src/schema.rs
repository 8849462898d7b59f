use std::collections::HashSet;

use complaints_common::database::Database;

/// Creates the tables that do not exist yet. Existing tables are left
/// alone; there is no diffing of columns.
pub async fn migrate(database: &Database) -> anyhow::Result<()> {
    let existing = load_tables(database).await?;
    let schema = database.database_schema();

    // creation order respects foreign keys
    for (table, ddls) in [
        ("students", students_ddl(schema)),
        ("locations", locations_ddl(schema)),
        ("users", users_ddl(schema)),
        ("complaints", complaints_ddl(schema)),
    ] {
        if existing.contains(table) {
            println!("Table {} already exists", table);
            continue;
        }
        database.execute_in_transaction(ddls, "CREATE TABLE").await?;
        println!("Table {} created", table);
    }

    Ok(())
}

async fn load_tables(database: &Database) -> anyhow::Result<HashSet<String>> {
    let sql = "SELECT table_name
        FROM information_schema.tables
        WHERE
          table_schema = $1
          AND table_type = 'BASE TABLE'";

    let names = sqlx::query_scalar::<_, String>(sql)
        .bind(database.database_schema())
        .fetch_all(database.database_pool())
        .await?;

    Ok(names.into_iter().collect())
}

fn students_ddl(schema: &str) -> Vec<String> {
    vec![format!(
        "CREATE TABLE \"{schema}\".\"students\" (
    id UUID NOT NULL,
    student_number TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    grade TEXT NOT NULL,
    class_name TEXT NOT NULL,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY(id)
)"
    )]
}

fn locations_ddl(schema: &str) -> Vec<String> {
    vec![format!(
        "CREATE TABLE \"{schema}\".\"locations\" (
    id UUID NOT NULL,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY(id)
)"
    )]
}

fn users_ddl(schema: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE \"{schema}\".\"users\" (
    id UUID NOT NULL,
    email TEXT UNIQUE,
    password_hash TEXT,
    name TEXT,
    first_name TEXT,
    last_name TEXT,
    role TEXT NOT NULL,
    student_ref UUID,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY(id)
)"
        ),
        format!(
            "ALTER TABLE \"{schema}\".\"users\" \
             ADD CONSTRAINT users_student_ref_fk \
             FOREIGN KEY (student_ref) REFERENCES \"{schema}\".\"students\" (id)"
        ),
    ]
}

fn complaints_ddl(schema: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE \"{schema}\".\"complaints\" (
    id UUID NOT NULL,
    student_id UUID NOT NULL,
    teacher_id UUID NOT NULL,
    status TEXT NOT NULL,
    incident JSONB NOT NULL,
    decision JSONB,
    history JSONB NOT NULL,
    submitted_at TIMESTAMPTZ,
    last_updated_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY(id)
)"
        ),
        format!(
            "ALTER TABLE \"{schema}\".\"complaints\" \
             ADD CONSTRAINT complaints_student_id_fk \
             FOREIGN KEY (student_id) REFERENCES \"{schema}\".\"students\" (id)"
        ),
        format!(
            "ALTER TABLE \"{schema}\".\"complaints\" \
             ADD CONSTRAINT complaints_teacher_id_fk \
             FOREIGN KEY (teacher_id) REFERENCES \"{schema}\".\"users\" (id)"
        ),
        format!(
            "CREATE INDEX complaints_student_id_idx ON \"{schema}\".\"complaints\" (student_id)"
        ),
        format!(
            "CREATE INDEX complaints_teacher_id_idx ON \"{schema}\".\"complaints\" (teacher_id)"
        ),
        format!("CREATE INDEX complaints_status_idx ON \"{schema}\".\"complaints\" (status)"),
    ]
}
