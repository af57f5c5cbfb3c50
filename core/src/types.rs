//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the backend's JSON schema (camelCase on the wire) but
//! are defined independently from the mock-server crate. Integration tests
//! catch any schema drift between the two.
//!
//! The backend may answer a `PUT` with only the fields it touched, so updates
//! travel as `TodoPatch` in both directions and are merged into the locally
//! known `Todo` rather than replacing it.

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a todo.
pub type TodoId = u64;

/// Project every new todo is filed under.
pub const DEFAULT_PROJECT: &str = "Inbox";

/// A single todo item as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub description: String,
    /// ISO date, or empty when the todo has no due date.
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub project: String,
}

impl Todo {
    /// Overwrite the fields present in `patch`, keeping everything else.
    pub fn merge(&mut self, patch: &TodoPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(due_date) = &patch.due_date {
            self.due_date.clone_from(due_date);
        }
        if let Some(project) = &patch.project {
            self.project.clone_from(project);
        }
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
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

impl NewTodo {
    /// Payload for what the user typed into the form: not completed, no
    /// description, filed under the default project.
    pub fn from_input(title: &str, due_date: &str) -> Self {
        Self {
            title: title.to_string(),
            completed: false,
            description: String::new(),
            due_date: due_date.to_string(),
            project: DEFAULT_PROJECT.to_string(),
        }
    }
}

/// A partial set of todo fields. Only the fields present in the JSON are
/// applied; omitted fields remain unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TodoId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}
