//! Async services pairing the stateless clients with a `Transport`.
//!
//! # Design
//! Each method is one build, one round trip, one parse. Nothing is cached
//! and nothing is retried; callers list again after a write to observe the
//! new state. Services are `Clone` and hold no locks, so concurrent calls
//! are independent futures that resolve in whatever order the server
//! answers them.

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, CreateUser, Todo, UpdateTodo, User};
use crate::users::UserClient;

#[derive(Debug, Clone)]
pub struct TodoService<T = ReqwestTransport> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> TodoService<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.transport.execute(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Todo>, ApiError> {
        let request = self.client.build_list_todos_by_user(user_id)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_list_todos(response)
    }

    pub async fn get(&self, id: u64) -> Result<Todo, ApiError> {
        let response = self.transport.execute(self.client.build_get_todo(id)).await?;
        self.client.parse_get_todo(response)
    }

    pub async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_todo(response)
    }

    pub async fn update(&self, id: u64, input: &UpdateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(id, input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_todo(response)
    }

    /// Flip the completion flag, sending the rest of `todo` unchanged.
    pub async fn set_complete(&self, todo: &Todo, complete: bool) -> Result<Todo, ApiError> {
        let mut input = todo.to_update();
        input.complete = complete;
        self.update(todo.id, &input).await
    }

    pub async fn delete(&self, id: u64) -> Result<Option<Todo>, ApiError> {
        let response = self.transport.execute(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }
}

#[derive(Debug, Clone)]
pub struct UserService<T = ReqwestTransport> {
    client: UserClient,
    transport: T,
}

impl<T: Transport> UserService<T> {
    pub fn new(client: UserClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, ApiError> {
        let request = self.client.build_find_by_username(username)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_user(response)
    }

    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        let request = self.client.build_get_user(id)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_user(response)
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let response = self.transport.execute(self.client.build_list_users()).await?;
        self.client.parse_list_users(response)
    }

    pub async fn create(&self, input: &CreateUser) -> Result<User, ApiError> {
        let request = self.client.build_create_user(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_user(response)
    }
}
