//! Request extractors. The verified identity is an axum extractor, so
//! every handler receives it as an explicit argument instead of reading
//! ambient state; request bodies go through [`ApiJson`] so that
//! deserialization failures stay inside the error contract.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::domain::{AppState, AuthenticatedUser, TokenService};
use crate::infrastructure::http::api::ApiError;

/// Body extractor wrapping `Json<T>`. A missing or mistyped field is a
/// validation failure (400 with the uniform error body), not axum's
/// default 422 rejection.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S: AppState> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer credential".to_string()))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".to_string()))?;

        state
            .tokens()
            .verify(token)
            .map_err(ApiError::from)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct NotesBody {
        notes: String,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn missing_body_field_is_a_validation_failure() {
        let err = ApiJson::<NotesBody>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn unparseable_body_is_a_validation_failure() {
        let err = ApiJson::<NotesBody>::from_request(json_request("not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn well_formed_body_passes_through() {
        let ApiJson(body) =
            ApiJson::<NotesBody>::from_request(json_request(r#"{"notes":"incomplete"}"#), &())
                .await
                .unwrap();
        assert_eq!(body.notes, "incomplete");
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
