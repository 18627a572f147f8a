use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub complete: bool,
    pub user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "completed")]
    pub complete: bool,
    pub user_id: String,
}

/// Full replacement of the mutable fields. Anything else in the body
/// (`id`, `userId`) is ignored.
#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "completed")]
    pub complete: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub reason: String,
    pub message: String,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(&'static str),
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        tracing::warn!(status = status.as_u16(), %message, "request failed");
        let body = ErrorResponse {
            status_code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Default)]
pub struct Store {
    todos: BTreeMap<u64, Todo>,
    users: HashMap<String, User>,
    last_id: u64,
}

impl Store {
    /// Register a user directly, bypassing HTTP. Used to seed the server.
    pub fn insert_user(&mut self, username: &str, email: Option<String>) -> Result<User, AppError> {
        if self.users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!("username {username} is taken")));
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email,
        };
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    let todos = Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/user/{user_id}", get(list_todos_by_user));
    let users = Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user))
        .route("/username/{username}", get(find_by_username));

    Router::new()
        .nest("/api/v1/todos", todos)
        .nest("/api/v1/users", users)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

fn todo_not_found(id: u64) -> AppError {
    AppError::NotFound(format!("todo {id} not found"))
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(store.todos.values().cloned().collect())
}

async fn list_todos_by_user(
    State(db): State<Db>,
    Path(user_id): Path<String>,
) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(
        store
            .todos
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect(),
    )
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required"));
    }
    let mut store = db.write().await;
    store.last_id += 1;
    let todo = Todo {
        id: store.last_id,
        title: input.title,
        description: input.description,
        complete: input.complete,
        user_id: input.user_id,
    };
    store.todos.insert(todo.id, todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Todo>, AppError> {
    let store = db.read().await;
    store.todos.get(&id).cloned().map(Json).ok_or_else(|| todo_not_found(id))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required"));
    }
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or_else(|| todo_not_found(id))?;
    todo.title = input.title;
    todo.description = input.description;
    todo.complete = input.complete;
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, AppError> {
    let mut store = db.write().await;
    store
        .todos
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| todo_not_found(id))
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    let mut users: Vec<User> = store.users.values().cloned().collect();
    users.sort_by(|a, b| a.username.cmp(&b.username));
    Json(users)
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    if input.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required"));
    }
    let user = db.write().await.insert_user(&input.username, input.email)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<User>, AppError> {
    let store = db.read().await;
    store
        .users
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))
}

async fn find_by_username(
    State(db): State<Db>,
    Path(username): Path<String>,
) -> Result<Json<User>, AppError> {
    let store = db.read().await;
    store
        .users
        .values()
        .find(|u| u.username == username)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {username} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_camel_case() {
        let todo = Todo {
            id: 1,
            title: "Test".to_string(),
            description: None,
            complete: false,
            user_id: "u1".to_string(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["complete"], false);
        assert!(json["description"].is_null());
    }

    #[test]
    fn create_todo_defaults_complete_to_false() {
        let input: CreateTodo =
            serde_json::from_str(r#"{"title":"No complete field","userId":"u1"}"#).unwrap();
        assert_eq!(input.title, "No complete field");
        assert!(!input.complete);
        assert!(input.description.is_none());
    }

    #[test]
    fn create_todo_accepts_completed_alias() {
        let input: CreateTodo =
            serde_json::from_str(r#"{"title":"Done","completed":true,"userId":"u1"}"#).unwrap();
        assert!(input.complete);
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"userId":"u1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_ignores_id_and_owner() {
        let input: UpdateTodo = serde_json::from_str(
            r#"{"id":3,"title":"New title","complete":true,"userId":"u2"}"#,
        )
        .unwrap();
        assert_eq!(input.title, "New title");
        assert!(input.complete);
    }

    #[test]
    fn duplicate_username_conflicts() {
        let mut store = Store::default();
        store.insert_user("dtaylor", None).unwrap();
        assert!(matches!(
            store.insert_user("dtaylor", None),
            Err(AppError::Conflict(_))
        ));
    }
}
