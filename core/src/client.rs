//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. The base URL is the collection itself, so listing is `GET {base}`
//! and a single item is `{base}/{id}`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`.

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, ErrorResponse, Todo, UpdateTodo};

/// Synchronous, stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. See `TodoService` for the async wrapper.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, self.base_url.clone())
    }

    /// `GET {base}/user/{user_id}`. The id is opaque and percent-encoded as
    /// a single path segment.
    pub fn build_list_todos_by_user(&self, user_id: &str) -> Result<HttpRequest, ApiError> {
        let path = segment_url(&self.base_url, &["user", user_id])?;
        Ok(HttpRequest::without_body(HttpMethod::Get, path))
    }

    pub fn build_get_todo(&self, id: u64) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, format!("{}/{id}", self.base_url))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let body = to_json(input)?;
        Ok(HttpRequest::with_json(HttpMethod::Post, self.base_url.clone(), body))
    }

    pub fn build_update_todo(&self, id: u64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let body = to_json(input)?;
        Ok(HttpRequest::with_json(
            HttpMethod::Put,
            format!("{}/{id}", self.base_url),
            body,
        ))
    }

    pub fn build_delete_todo(&self, id: u64) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Delete, format!("{}/{id}", self.base_url))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    /// Servers either answer with no content or echo the deleted record.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Option<Todo>, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        from_json(&response.body).map(Some)
    }
}

/// Append each segment to `base`, percent-encoding `/`, `?`, `#` and the like
/// so a segment can never split into several or escape the path.
///
/// `Url` drops `.` and `..` segments instead of encoding them, and an empty
/// segment addresses the parent collection, so those are refused.
pub(crate) fn segment_url(base: &str, segments: &[&str]) -> Result<String, ApiError> {
    if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(ApiError::Validation(format!("{bad:?} is not a valid path segment")));
    }
    let mut url =
        Url::parse(base).map_err(|e| ApiError::Validation(format!("invalid base url {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::Validation(format!("base url {base} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

pub(crate) fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = error_message(response);
    Err(match response.status {
        404 => ApiError::NotFound { message },
        status @ 400..=499 => ApiError::Rejected { status, message },
        status => ApiError::Server { status, message },
    })
}

/// Prefer the `message` of an `ErrorResponse` envelope, else the raw body.
fn error_message(response: &HttpResponse) -> String {
    serde_json::from_str::<ErrorResponse>(&response.body)
        .map(|envelope| envelope.message)
        .unwrap_or_else(|_| response.body.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000/api/v1/todos")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_todos_targets_collection() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/v1/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_todos_by_user_produces_correct_request() {
        let req = client().build_list_todos_by_user("u1").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/v1/todos/user/u1");
    }

    #[test]
    fn build_list_todos_by_user_encodes_reserved_characters() {
        let req = client().build_list_todos_by_user("team/alpha").unwrap();
        assert_eq!(req.path, "http://localhost:3000/api/v1/todos/user/team%2Falpha");

        let req = client().build_list_todos_by_user("a?b#c").unwrap();
        assert_eq!(req.path, "http://localhost:3000/api/v1/todos/user/a%3Fb%23c");
    }

    #[test]
    fn build_list_todos_by_user_refuses_dot_and_empty_ids() {
        for id in ["", ".", ".."] {
            let err = client().build_list_todos_by_user(id).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{id:?}: {err:?}");
        }
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/v1/todos/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodo::new("Buy milk", "u1");
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/v1/todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["complete"], false);
        assert_eq!(body["userId"], "u1");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_create_todo_rejects_blank_title() {
        let input = CreateTodo::new("  ", "u1");
        let err = client().build_create_todo(&input).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn build_update_todo_sends_full_representation() {
        let input = UpdateTodo {
            title: "Updated".to_string(),
            description: None,
            complete: true,
        };
        let req = client().build_update_todo(7, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/api/v1/todos/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Updated");
        assert_eq!(body["complete"], true);
        assert!(body["description"].is_null());
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(7);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/api/v1/todos/7");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_todos_success() {
        let todos = client()
            .parse_list_todos(response(
                200,
                r#"[{"id":1,"title":"Test","description":null,"complete":false,"userId":"u1"}]"#,
            ))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_get_todo_not_found() {
        let err = client().parse_get_todo(response(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_create_todo_accepts_200_and_201() {
        let body = r#"{"id":3,"title":"New","complete":false,"userId":"u1"}"#;
        assert_eq!(client().parse_create_todo(response(201, body)).unwrap().id, 3);
        assert_eq!(client().parse_create_todo(response(200, body)).unwrap().id, 3);
    }

    #[test]
    fn parse_create_todo_server_error() {
        let err = client()
            .parse_create_todo(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[test]
    fn parse_create_todo_rejected_uses_envelope_message() {
        let err = client()
            .parse_create_todo(response(
                400,
                r#"{"statusCode":400,"reason":"Bad Request","message":"title is required"}"#,
            ))
            .unwrap_err();
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "title is required");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn parse_update_todo_success() {
        let todo = client()
            .parse_update_todo(response(
                200,
                r#"{"id":1,"title":"Updated","complete":true,"userId":"u1"}"#,
            ))
            .unwrap();
        assert_eq!(todo.title, "Updated");
        assert!(todo.complete);
    }

    #[test]
    fn parse_update_todo_not_found() {
        let err = client().parse_update_todo(response(404, "")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn parse_delete_todo_no_content() {
        assert_eq!(client().parse_delete_todo(response(204, "")).unwrap(), None);
    }

    #[test]
    fn parse_delete_todo_echoed_record() {
        let deleted = client()
            .parse_delete_todo(response(200, r#"{"id":5,"title":"Gone","complete":true}"#))
            .unwrap();
        assert_eq!(deleted.map(|t| t.id), Some(5));
    }

    #[test]
    fn parse_delete_todo_not_found() {
        let err = client().parse_delete_todo(response(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/api/v1/todos/");
        assert_eq!(client.build_get_todo(1).path, "http://localhost:3000/api/v1/todos/1");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client().parse_list_todos(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
