//! Thin HTTP client for the complaints service.

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<LoginResponse> {
        let request = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }));
        self.send(request).await
    }

    pub async fn list_complaints(&self) -> anyhow::Result<ManyComplaints> {
        self.send(self.get("/api/complaints")).await
    }

    pub async fn get_complaint(&self, id: Uuid) -> anyhow::Result<OneComplaint> {
        self.send(self.get(&format!("/api/complaints/{id}"))).await
    }

    pub async fn create_complaint(&self, body: Value) -> anyhow::Result<OneComplaint> {
        let request = self
            .http
            .post(format!("{}/api/complaints", self.base_url))
            .json(&body);
        self.send(self.authorized(request)).await
    }

    pub async fn update_complaint(&self, id: Uuid, body: Value) -> anyhow::Result<OneComplaint> {
        let request = self
            .http
            .put(format!("{}/api/complaints/{id}", self.base_url))
            .json(&body);
        self.send(self.authorized(request)).await
    }

    pub async fn submit_complaint(&self, id: Uuid) -> anyhow::Result<OneComplaint> {
        self.post_action(id, "submit", Value::Null).await
    }

    pub async fn decide_complaint(
        &self,
        id: Uuid,
        punishment: &str,
        notes: Option<&str>,
    ) -> anyhow::Result<OneComplaint> {
        let body = serde_json::json!({ "punishment": punishment, "notes": notes });
        self.post_action(id, "decide", body).await
    }

    pub async fn return_complaint(&self, id: Uuid, notes: &str) -> anyhow::Result<OneComplaint> {
        let body = serde_json::json!({ "notes": notes });
        self.post_action(id, "return", body).await
    }

    pub async fn list_students(&self) -> anyhow::Result<ManyStudents> {
        self.send(self.get("/api/students")).await
    }

    pub async fn list_locations(&self) -> anyhow::Result<ManyLocations> {
        self.send(self.get("/api/locations")).await
    }

    async fn post_action<T: DeserializeOwned>(
        &self,
        id: Uuid,
        action: &str,
        body: Value,
    ) -> anyhow::Result<T> {
        let mut request = self
            .http
            .post(format!("{}/api/complaints/{id}/{action}", self.base_url));
        if !body.is_null() {
            request = request.json(&body);
        }
        self.send(self.authorized(request)).await
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.http.get(format!("{}{}", self.base_url, path)))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> anyhow::Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .context("failed to decode response body");
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => bail!("{} ({})", body.message, body.error),
            Err(_) => bail!("request failed with status {status}"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    message: String,
}

// Response shapes, mirroring the service's JSON.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct ManyComplaints {
    pub data: Vec<Complaint>,
    pub meta: Metadata,
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct OneComplaint {
    pub data: Complaint,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    pub status: String,
    pub student: Option<StudentRef>,
    pub teacher: Option<UserRef>,
    pub incident: Incident,
    pub decision: Option<Decision>,
    pub history: Vec<HistoryEntry>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub id: Uuid,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub date: DateTime<Utc>,
    pub location: Option<LocationRef>,
    pub description: String,
    pub involved_people: Vec<InvolvedPerson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvolvedPerson {
    pub user: Option<UserRef>,
    pub user_id: Uuid,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub decided_by: Uuid,
    pub punishment: String,
    pub notes: Option<String>,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub action: String,
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ManyStudents {
    pub data: Vec<Student>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    pub class: String,
}

#[derive(Debug, Deserialize)]
pub struct ManyLocations {
    pub data: Vec<Location>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}
