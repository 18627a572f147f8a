//! Request builder and response parser for the user directory.
//!
//! Same split as `TodoClient`: no I/O here, just URLs and status rules.

use crate::client::{check_status, from_json, segment_url, to_json};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateUser, User};

#[derive(Debug, Clone)]
pub struct UserClient {
    base_url: String,
}

impl UserClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/username/{username}`, with the username percent-encoded
    /// as a single path segment.
    pub fn build_find_by_username(&self, username: &str) -> Result<HttpRequest, ApiError> {
        let path = segment_url(&self.base_url, &["username", username])?;
        Ok(HttpRequest::without_body(HttpMethod::Get, path))
    }

    pub fn build_list_users(&self) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, self.base_url.clone())
    }

    pub fn build_get_user(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let path = segment_url(&self.base_url, &[id])?;
        Ok(HttpRequest::without_body(HttpMethod::Get, path))
    }

    pub fn build_create_user(&self, input: &CreateUser) -> Result<HttpRequest, ApiError> {
        if input.username.trim().is_empty() {
            return Err(ApiError::Validation("username is required".to_string()));
        }
        let body = to_json(input)?;
        Ok(HttpRequest::with_json(HttpMethod::Post, self.base_url.clone(), body))
    }

    pub fn parse_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }
}
