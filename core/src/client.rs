//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and its timeouts, and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! this layer deterministic and free of I/O dependencies.
//!
//! Any 2xx status counts as success. Every request carries a timeout: the
//! short probe timeout for `HEAD /todos`, the request timeout otherwise.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::{DEFAULT_PROBE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    probe_timeout: Duration,
    request_timeout: Duration,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/todos", self.base_url), None)
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, RequestError> {
        let body = serde_json::to_string(input).map_err(|e| RequestError::Encode(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, format!("{}/todos", self.base_url), Some(body)))
    }

    pub fn build_update_todo(&self, id: TodoId, patch: &TodoPatch) -> Result<HttpRequest, RequestError> {
        let body = serde_json::to_string(patch).map_err(|e| RequestError::Encode(e.to_string()))?;
        Ok(self.request(HttpMethod::Put, format!("{}/todos/{id}", self.base_url), Some(body)))
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{}/todos/{id}", self.base_url), None)
    }

    /// `HEAD /todos` with a short timeout, used to detect backend recovery.
    pub fn build_probe(&self) -> HttpRequest {
        let mut req = self.request(HttpMethod::Head, format!("{}/todos", self.base_url), None);
        req.timeout = Some(self.probe_timeout);
        req
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, RequestError> {
        decode(&response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, RequestError> {
        decode(&response)
    }

    /// The backend may echo only the fields it changed, so the result is a
    /// patch for the caller to merge.
    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<TodoPatch, RequestError> {
        decode(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), RequestError> {
        check_status(&response)
    }

    pub fn parse_probe(&self, response: HttpResponse) -> Result<(), RequestError> {
        check_status(&response)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        HttpRequest {
            method,
            path,
            headers,
            body,
            timeout: Some(self.request_timeout),
        }
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, RequestError> {
    check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| RequestError::Decode(e.to_string()))
}

/// Map statuses outside 2xx to `RequestError::HttpStatus`.
fn check_status(response: &HttpResponse) -> Result<(), RequestError> {
    if response.is_success() {
        return Ok(());
    }
    Err(RequestError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}
