//! Async Remote Client: `TodoClient` plus a host-supplied `Transport`.
//!
//! # Design
//! The core still never opens a socket. `RemoteClient` pairs the stateless
//! builder/parser with whatever `Transport` the host provides, logs every
//! call, and hands failures back unchanged. No retries happen here; retry
//! policy belongs to the controller.

use std::future::Future;

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::config::SyncConfig;
use crate::error::RequestError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};

/// Executes one HTTP round-trip.
///
/// Implementations must return `Ok` for every response the server sent,
/// whatever its status, and reserve `Err(RequestError::Transport)` for
/// round-trips that did not complete (including an expired
/// `HttpRequest::timeout`).
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, RequestError>>;
}

/// The four CRUD operations plus the health probe, executed over `T`.
#[derive(Debug, Clone)]
pub struct RemoteClient<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> RemoteClient<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn from_config(config: &SyncConfig, transport: T) -> Self {
        let client = TodoClient::new(&config.base_url)
            .with_probe_timeout(config.probe_timeout)
            .with_request_timeout(config.request_timeout);
        Self::new(client, transport)
    }

    pub async fn list(&self) -> Result<Vec<Todo>, RequestError> {
        debug!("fetching todos");
        let req = self.client.build_list_todos();
        let result = self.send(req).await.and_then(|r| self.client.parse_list_todos(r));
        match &result {
            Ok(todos) => debug!(count = todos.len(), "todos fetched"),
            Err(e) => warn!(error = %e, "failed to fetch todos"),
        }
        result
    }

    pub async fn create(&self, input: &NewTodo) -> Result<Todo, RequestError> {
        debug!(title = %input.title, "creating todo");
        let result = match self.client.build_create_todo(input) {
            Ok(req) => self.send(req).await.and_then(|r| self.client.parse_create_todo(r)),
            Err(e) => Err(e),
        };
        match &result {
            Ok(todo) => debug!(id = todo.id, "todo created"),
            Err(e) => warn!(error = %e, "failed to create todo"),
        }
        result
    }

    pub async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<TodoPatch, RequestError> {
        debug!(id, ?patch, "updating todo");
        let result = match self.client.build_update_todo(id, patch) {
            Ok(req) => self.send(req).await.and_then(|r| self.client.parse_update_todo(r)),
            Err(e) => Err(e),
        };
        match &result {
            Ok(confirmed) => debug!(id, ?confirmed, "todo updated"),
            Err(e) => warn!(id, error = %e, "failed to update todo"),
        }
        result
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), RequestError> {
        debug!(id, "deleting todo");
        let req = self.client.build_delete_todo(id);
        let result = self.send(req).await.and_then(|r| self.client.parse_delete_todo(r));
        match &result {
            Ok(()) => debug!(id, "todo deleted"),
            Err(e) => warn!(id, error = %e, "failed to delete todo"),
        }
        result
    }

    /// Lightweight reachability check. Any failure means "not yet".
    pub async fn probe(&self) -> bool {
        let req = self.client.build_probe();
        match self.send(req).await.and_then(|r| self.client.parse_probe(r)) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "backend probe failed");
                false
            }
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        self.transport.execute(request).await
    }
}
