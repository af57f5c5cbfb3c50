//! In-memory stand-in for the todo REST backend, used by tests and for
//! manual runs of the CLI.
//!
//! Ids are sequential integers. `PUT` applies only the fields present in the
//! body. `GET /todos` also answers `HEAD`, which clients use as a health
//! probe. `Backend::set_available(false)` makes every route answer 503 until
//! it is switched back, to simulate an outage without dropping the listener.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub description: String,
    pub due_date: String,
    pub project: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub project: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub project: Option<String>,
}

#[derive(Default)]
struct Store {
    todos: Vec<Todo>,
    next_id: u64,
}

/// Shared backend state. Clones refer to the same store.
#[derive(Clone)]
pub struct Backend {
    store: Arc<RwLock<Store>>,
    available: Arc<AtomicBool>,
}

impl Default for Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store {
                todos: Vec::new(),
                next_id: 1,
            })),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn todos(&self) -> Vec<Todo> {
        self.store.read().await.todos.clone()
    }
}

pub fn app() -> Router {
    app_with(Backend::new())
}

pub fn app_with(backend: Backend) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .layer(middleware::from_fn_with_state(backend.clone(), outage_gate))
        .with_state(backend)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Backend::new()).await
}

pub async fn serve(listener: TcpListener, backend: Backend) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(backend)).await
}

async fn outage_gate(State(backend): State<Backend>, request: Request, next: Next) -> Response {
    if !backend.available.load(Ordering::SeqCst) {
        tracing::debug!(path = %request.uri().path(), "rejecting request during simulated outage");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    next.run(request).await
}

async fn list_todos(State(backend): State<Backend>) -> Json<Vec<Todo>> {
    Json(backend.store.read().await.todos.clone())
}

async fn create_todo(
    State(backend): State<Backend>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let mut store = backend.store.write().await;
    let todo = Todo {
        id: store.next_id,
        title: input.title,
        completed: input.completed,
        description: input.description,
        due_date: input.due_date,
        project: input.project,
    };
    store.next_id += 1;
    store.todos.push(todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    let store = backend.store.read().await;
    store
        .todos
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut store = backend.store.write().await;
    let todo = store
        .todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    if let Some(description) = input.description {
        todo.description = description;
    }
    if let Some(due_date) = input.due_date {
        todo.due_date = due_date;
    }
    if let Some(project) = input.project {
        todo.project = project;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut store = backend.store.write().await;
    let before = store.todos.len();
    store.todos.retain(|t| t.id != id);
    if store.todos.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({})))
}
