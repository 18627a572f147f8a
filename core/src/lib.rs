//! Async client for the todo service and its user directory.
//!
//! # Overview
//! The request building and response parsing are I/O-free (host-does-IO
//! pattern): `TodoClient` and `UserClient` turn operations into
//! `HttpRequest` values and `HttpResponse` values back into typed results.
//! `TodoService` and `UserService` run that round trip through a
//! `Transport`, by default `ReqwestTransport`.
//!
//! # Design
//! - Clients are stateless; they hold only their base URL.
//! - Every operation is a single best-effort round trip. No retries, no
//!   caching; callers list again after a write.
//! - Failures always surface as `ApiError`. Nothing degrades to an empty
//!   result.
//! - The default actor (the user new todos belong to) is resolved once by
//!   username and cached in a `LocalStore` file.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod store;
pub mod transport;
pub mod types;
pub mod users;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::{ActorError, ApiError, StoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{TodoService, UserService};
pub use store::{default_actor, resolve_default_actor, LocalStore, DEFAULT_USER_ID};
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateTodo, CreateUser, ErrorResponse, Todo, UpdateTodo, User};
pub use users::UserClient;
