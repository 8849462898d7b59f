use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::api::ApiClient;

mod api;
mod output;

/// Complaint tracking from the terminal.
///
/// Authenticate with `login`, export the printed token as
/// COMPLAINTS_TOKEN and run the other subcommands with it.
#[derive(Parser, Debug)]
#[command(name = "complaints", version, about)]
struct Cli {
    /// Base URL of the complaints service.
    #[arg(
        long,
        global = true,
        env = "COMPLAINTS_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    /// Bearer token obtained from `login`.
    #[arg(long, global = true, env = "COMPLAINTS_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and print a bearer token.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List the complaints visible to you.
    List,
    /// Show one complaint in full, history included.
    Show { id: Uuid },
    /// File a new draft complaint.
    Create {
        /// Subject student id.
        #[arg(long)]
        student: Uuid,
        /// Where the incident happened.
        #[arg(long)]
        location: Uuid,
        /// What happened.
        #[arg(long)]
        description: String,
        /// When it happened, RFC 3339. Defaults to now.
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Edit a complaint that is still editable.
    Update {
        id: Uuid,
        #[arg(long)]
        student: Option<Uuid>,
        #[arg(long)]
        location: Option<Uuid>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Submit a draft for review.
    Submit { id: Uuid },
    /// Close a submitted complaint with a punishment.
    Decide {
        id: Uuid,
        #[arg(long)]
        punishment: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Send a submitted complaint back to its teacher for rework.
    Return {
        id: Uuid,
        #[arg(long)]
        notes: String,
    },
    /// List active students.
    Students,
    /// List active incident locations.
    Locations,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(cli.api_url, cli.token);

    match cli.command {
        Commands::Login { email, password } => {
            let login = client.login(&email, &password).await?;
            output::print_login(&login);
        }
        Commands::List => {
            let complaints = client.list_complaints().await?;
            output::print_complaint_table(&complaints.data, complaints.meta.total);
        }
        Commands::Show { id } => {
            let complaint = client.get_complaint(id).await?;
            output::print_complaint(&complaint.data);
        }
        Commands::Create {
            student,
            location,
            description,
            date,
        } => {
            let body = json!({
                "studentId": student,
                "incident": {
                    "date": date.unwrap_or_else(Utc::now),
                    "locationId": location,
                    "description": description,
                }
            });
            let complaint = client.create_complaint(body).await?;
            output::print_complaint(&complaint.data);
        }
        Commands::Update {
            id,
            student,
            location,
            description,
            date,
        } => {
            let body = update_body(student, location, description, date);
            let complaint = client.update_complaint(id, body).await?;
            output::print_complaint(&complaint.data);
        }
        Commands::Submit { id } => {
            let complaint = client.submit_complaint(id).await?;
            output::print_complaint(&complaint.data);
        }
        Commands::Decide {
            id,
            punishment,
            notes,
        } => {
            let complaint = client
                .decide_complaint(id, &punishment, notes.as_deref())
                .await?;
            output::print_complaint(&complaint.data);
        }
        Commands::Return { id, notes } => {
            let complaint = client.return_complaint(id, &notes).await?;
            output::print_complaint(&complaint.data);
        }
        Commands::Students => {
            let students = client.list_students().await?;
            output::print_students(&students.data);
        }
        Commands::Locations => {
            let locations = client.list_locations().await?;
            output::print_locations(&locations.data);
        }
    }

    Ok(())
}

fn update_body(
    student: Option<Uuid>,
    location: Option<Uuid>,
    description: Option<String>,
    date: Option<DateTime<Utc>>,
) -> Value {
    let mut body = Map::new();
    if let Some(student) = student {
        body.insert("studentId".into(), json!(student));
    }

    let mut incident = Map::new();
    if let Some(location) = location {
        incident.insert("locationId".into(), json!(location));
    }
    if let Some(description) = description {
        incident.insert("description".into(), json!(description));
    }
    if let Some(date) = date {
        incident.insert("date".into(), json!(date));
    }
    if !incident.is_empty() {
        body.insert("incident".into(), Value::Object(incident));
    }

    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_skips_absent_fields() {
        let body = update_body(None, None, Some("new text".into()), None);
        assert_eq!(
            body,
            json!({ "incident": { "description": "new text" } })
        );
    }

    #[test]
    fn update_body_can_be_empty() {
        assert_eq!(update_body(None, None, None, None), json!({}));
    }
}
