//! Domain DTOs for the todo and user APIs.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Field names go over the wire in camelCase (`userId`). The completion flag
//! is serialized as `complete`; `completed` is accepted on input because the
//! backend this client talks to has used both names.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "completed")]
    pub complete: bool,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Todo {
    /// The full mutable representation of this todo, ready to be sent back
    /// with `PUT`.
    pub fn to_update(&self) -> UpdateTodo {
        UpdateTodo {
            title: self.title.clone(),
            description: self.description.clone(),
            complete: self.complete,
        }
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "completed")]
    pub complete: bool,
    pub user_id: String,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            complete: false,
            user_id: user_id.into(),
        }
    }

    /// Attach a description. Blank descriptions are dropped.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    pub fn with_complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    /// Title is the only required field.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_title(&self.title)
    }
}

/// Request payload for updating an existing todo. Every mutable field is
/// sent; the server replaces the stored values wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "completed")]
    pub complete: bool,
}

impl UpdateTodo {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_title(&self.title)
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    Ok(())
}

/// A user account as returned by the user service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request payload for registering a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Error envelope servers attach to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub reason: String,
    pub message: String,
}
