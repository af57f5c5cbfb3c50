//! Display model: what the host should draw after every state change.
//!
//! # Design
//! Rendering is a pure function of controller state. There is no diffing;
//! every change produces a complete `View` and the host redraws all of it.

use std::fmt;

use crate::types::{Todo, TodoId};

pub const SUBMIT_IDLE_LABEL: &str = "Add task";
pub const SUBMIT_BUSY_LABEL: &str = "Saving...";
pub const LOADING_TEXT: &str = "Loading todos...";
pub const RECONNECT_SUFFIX: &str = " Trying to reconnect...";

/// One line of the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub due_date: Option<String>,
}

/// Content of the list area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Error(String),
    Items(Vec<TodoRow>),
}

/// A full snapshot of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub status_badge: &'static str,
    pub offline_banner: bool,
    /// Shown while the backend is unavailable.
    pub error_banner: Option<String>,
    /// Form inputs and checkboxes. Disabled while the backend is unavailable.
    pub controls_enabled: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub list: ListView,
}

pub fn render_items(todos: &[Todo]) -> Vec<TodoRow> {
    todos
        .iter()
        .map(|todo| TodoRow {
            id: todo.id,
            title: todo.title.clone(),
            completed: todo.completed,
            due_date: (!todo.due_date.is_empty()).then(|| todo.due_date.clone()),
        })
        .collect()
}

impl fmt::Display for TodoRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "x" } else { " " };
        write!(f, "[{mark}] #{} {}", self.id, self.title)?;
        if let Some(due) = &self.due_date {
            write!(f, " (due {due})")?;
        }
        Ok(())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.status_badge)?;
        if self.offline_banner {
            writeln!(f, "! You are offline. Changes are disabled until the connection returns.")?;
        }
        if let Some(message) = &self.error_banner {
            writeln!(f, "! {message}")?;
        }
        match &self.list {
            ListView::Loading => writeln!(f, "  {LOADING_TEXT}")?,
            ListView::Error(message) => writeln!(f, "  Error: {message}")?,
            ListView::Items(rows) if rows.is_empty() => writeln!(f, "  (no todos)")?,
            ListView::Items(rows) => {
                for row in rows {
                    writeln!(f, "  {row}")?;
                }
            }
        }
        let state = match (self.controls_enabled, self.submit_enabled) {
            (true, true) => "",
            (true, false) => " (busy)",
            (false, _) => " (disabled)",
        };
        write!(f, "[{}]{state}", self.submit_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: TodoId, title: &str, completed: bool, due_date: &str) -> Todo {
        Todo {
            id,
            title: title.to_string(),
            completed,
            description: String::new(),
            due_date: due_date.to_string(),
            project: "Inbox".to_string(),
        }
    }

    #[test]
    fn render_items_preserves_order_and_omits_empty_due_date() {
        let rows = render_items(&[todo(2, "b", true, ""), todo(1, "a", false, "2024-01-01")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 2);
        assert!(rows[0].due_date.is_none());
        assert_eq!(rows[1].due_date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn row_display_marks_completion() {
        let rows = render_items(&[todo(7, "Buy milk", true, "2024-01-01")]);
        assert_eq!(rows[0].to_string(), "[x] #7 Buy milk (due 2024-01-01)");
    }

    #[test]
    fn view_display_shows_banners_and_disabled_controls() {
        let view = View {
            status_badge: "Online",
            offline_banner: false,
            error_banner: Some("Backend down.".to_string()),
            controls_enabled: false,
            submit_enabled: false,
            submit_label: SUBMIT_IDLE_LABEL,
            list: ListView::Error("no server".to_string()),
        };
        let text = view.to_string();
        assert!(text.contains("! Backend down."));
        assert!(text.contains("Error: no server"));
        assert!(text.ends_with("[Add task] (disabled)"));
    }
}
