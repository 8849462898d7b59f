use anyhow::{Context, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use complaints_common::database::Database;

/// Loads the demo data set: three staff accounts, three students with
/// proxy accounts, five locations and three complaints in different
/// lifecycle stages. Does nothing when users already exist.
pub async fn seed(database: &Database) -> anyhow::Result<()> {
    let schema = database.database_schema();

    let sql = format!("SELECT COUNT(*) FROM \"{schema}\".users");
    let (count,): (i64,) = sqlx::query_as(&sql)
        .fetch_one(database.database_pool())
        .await
        .context("failed to count users")?;

    if count > 0 {
        println!("Database already seeded, skipping");
        return Ok(());
    }

    let now = Utc::now();
    let password_hash = hash_password("password123")?;

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let charlie = Uuid::new_v4();

    let students = [
        (alice, "S-1001", "Alice", "Johnson", "10", "A"),
        (bob, "S-1002", "Bob", "Smith", "10", "B"),
        (charlie, "S-1003", "Charlie", "Brown", "11", "A"),
    ];

    let sql = format!(
        "INSERT INTO \"{schema}\".students \
         (id, student_number, first_name, last_name, grade, class_name, active, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $7)"
    );
    for (id, number, first, last, grade, class_name) in students {
        sqlx::query(&sql)
            .bind(id)
            .bind(number)
            .bind(first)
            .bind(last)
            .bind(grade)
            .bind(class_name)
            .bind(now)
            .execute(database.database_pool())
            .await
            .context("failed to insert student")?;
    }
    println!("Students created");

    let playground = Uuid::new_v4();
    let cafeteria = Uuid::new_v4();
    let library = Uuid::new_v4();

    let locations = [
        (
            Uuid::new_v4(),
            "Main Building - Floor 1",
            "First floor of the main school building",
        ),
        (cafeteria, "Cafeteria", "School cafeteria and lunch area"),
        (playground, "Playground", "Main playground area"),
        (Uuid::new_v4(), "Gymnasium", "School gym and sports facilities"),
        (library, "Library", "School library and study area"),
    ];

    let sql = format!(
        "INSERT INTO \"{schema}\".locations \
         (id, name, description, active, created_at, updated_at) \
         VALUES ($1, $2, $3, TRUE, $4, $4)"
    );
    for (id, name, description) in locations {
        sqlx::query(&sql)
            .bind(id)
            .bind(name)
            .bind(description)
            .bind(now)
            .execute(database.database_pool())
            .await
            .context("failed to insert location")?;
    }
    println!("Locations created");

    let principal = Uuid::new_v4();
    let teacher1 = Uuid::new_v4();
    let teacher2 = Uuid::new_v4();

    let staff = [
        (principal, "principal@school.com", "John Principal", "PRINCIPAL"),
        (teacher1, "teacher1@school.com", "Sarah Teacher", "TEACHER"),
        (teacher2, "teacher2@school.com", "Mike Teacher", "TEACHER"),
    ];

    let sql = format!(
        "INSERT INTO \"{schema}\".users \
         (id, email, password_hash, name, role, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $6)"
    );
    for (id, email, name, role) in staff {
        sqlx::query(&sql)
            .bind(id)
            .bind(email)
            .bind(&password_hash)
            .bind(name)
            .bind(role)
            .bind(now)
            .execute(database.database_pool())
            .await
            .context("failed to insert user")?;
    }

    // proxy accounts for the seeded students, no credentials
    let sql = format!(
        "INSERT INTO \"{schema}\".users \
         (id, first_name, last_name, role, student_ref, created_at, updated_at) \
         VALUES ($1, $2, $3, 'STUDENT', $4, $5, $5)"
    );
    for (student_id, _, first, last, _, _) in students {
        sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(first)
            .bind(last)
            .bind(student_id)
            .bind(now)
            .execute(database.database_pool())
            .await
            .context("failed to insert student account")?;
    }
    println!("Users created");

    seed_complaints(
        database,
        SeedRefs {
            principal,
            teacher1,
            teacher2,
            alice,
            bob,
            charlie,
            playground,
            cafeteria,
            library,
        },
    )
    .await?;
    println!("Complaints created");

    Ok(())
}

struct SeedRefs {
    principal: Uuid,
    teacher1: Uuid,
    teacher2: Uuid,
    alice: Uuid,
    bob: Uuid,
    charlie: Uuid,
    playground: Uuid,
    cafeteria: Uuid,
    library: Uuid,
}

async fn seed_complaints(database: &Database, refs: SeedRefs) -> anyhow::Result<()> {
    let schema = database.database_schema();
    let now = Utc::now();

    let sql = format!(
        "INSERT INTO \"{schema}\".complaints \
         (id, student_id, teacher_id, status, incident, decision, history, \
          submitted_at, last_updated_at, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)"
    );

    let fight_date = date(2024, 3, 10);
    let submitted_history = json!([
        {
            "action": "CREATED",
            "user_id": refs.teacher1,
            "timestamp": now,
            "notes": "Complaint created"
        },
        {
            "action": "UPDATED",
            "user_id": refs.teacher1,
            "timestamp": now,
            "notes": "Complaint submitted"
        }
    ]);
    sqlx::query(&sql)
        .bind(Uuid::new_v4())
        .bind(refs.alice)
        .bind(refs.teacher1)
        .bind("SUBMITTED")
        .bind(json!({
            "date": fight_date,
            "location_id": refs.playground,
            "description": "Student was involved in a fight during recess",
            "involved_people": []
        }))
        .bind(None::<serde_json::Value>)
        .bind(submitted_history)
        .bind(now)
        .bind(None::<DateTime<Utc>>)
        .bind(now)
        .execute(database.database_pool())
        .await
        .context("failed to insert submitted complaint")?;

    let draft_history = json!([
        {
            "action": "CREATED",
            "user_id": refs.teacher2,
            "timestamp": now,
            "notes": "Complaint created"
        }
    ]);
    sqlx::query(&sql)
        .bind(Uuid::new_v4())
        .bind(refs.bob)
        .bind(refs.teacher2)
        .bind("DRAFT")
        .bind(json!({
            "date": date(2024, 3, 11),
            "location_id": refs.cafeteria,
            "description": "Student was caught throwing food in the cafeteria",
            "involved_people": []
        }))
        .bind(None::<serde_json::Value>)
        .bind(draft_history)
        .bind(None::<DateTime<Utc>>)
        .bind(None::<DateTime<Utc>>)
        .bind(now)
        .execute(database.database_pool())
        .await
        .context("failed to insert draft complaint")?;

    let closed_history = json!([
        {
            "action": "CREATED",
            "user_id": refs.teacher1,
            "timestamp": now,
            "notes": "Complaint created"
        },
        {
            "action": "UPDATED",
            "user_id": refs.teacher1,
            "timestamp": now,
            "notes": "Complaint submitted"
        },
        {
            "action": "DECIDED",
            "user_id": refs.principal,
            "timestamp": now,
            "notes": "Complaint decided"
        }
    ]);
    sqlx::query(&sql)
        .bind(Uuid::new_v4())
        .bind(refs.charlie)
        .bind(refs.teacher1)
        .bind("CLOSED")
        .bind(json!({
            "date": date(2024, 3, 9),
            "location_id": refs.library,
            "description": "Student was disrupting other students in the library",
            "involved_people": []
        }))
        .bind(json!({
            "decided_by": refs.principal,
            "punishment": "One week library ban",
            "notes": "Student has apologized and promised to maintain library etiquette",
            "decided_at": now
        }))
        .bind(closed_history)
        .bind(now)
        .bind(None::<DateTime<Utc>>)
        .bind(now)
        .execute(database.database_pool())
        .await
        .context("failed to insert closed complaint")?;

    Ok(())
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("failed to hash password: {e}"))
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}
