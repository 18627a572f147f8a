//! Deployment-specific client settings.

use std::path::PathBuf;
use std::time::Duration;

use crate::client::TodoClient;
use crate::error::{ApiError, StoreError};
use crate::service::{TodoService, UserService};
use crate::store::LocalStore;
use crate::transport::ReqwestTransport;
use crate::users::UserClient;

pub const DEFAULT_TODO_BASE_URL: &str = "http://localhost:8080/api/v1/todos";
pub const DEFAULT_USER_BASE_URL: &str = "http://localhost:8081/api/v1/users";

/// Where each service lives, where local state goes, and an optional
/// request timeout. `None` leaves timeouts to the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub todo_base_url: String,
    pub user_base_url: String,
    pub storage_path: PathBuf,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            todo_base_url: DEFAULT_TODO_BASE_URL.to_string(),
            user_base_url: DEFAULT_USER_BASE_URL.to_string(),
            storage_path: default_storage_path(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Build both services over one shared connection pool.
    pub fn services(&self) -> Result<(TodoService, UserService), ApiError> {
        let transport = ReqwestTransport::with_timeout(self.timeout)?;
        Ok((
            TodoService::new(TodoClient::new(&self.todo_base_url), transport.clone()),
            UserService::new(UserClient::new(&self.user_base_url), transport),
        ))
    }

    pub fn open_store(&self) -> Result<LocalStore, StoreError> {
        LocalStore::open(&self.storage_path)
    }
}

/// `<data_local_dir>/todo-client/local-storage.json`, or the working
/// directory when the platform has no data dir.
pub fn default_storage_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("todo-client"))
        .unwrap_or_default()
        .join("local-storage.json")
}
