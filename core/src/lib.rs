//! Todo synchronization core: REST client and offline-aware view controller.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sits an async
//! `RemoteClient` that runs requests through a host-supplied `Transport`, and
//! a `Controller` that keeps the local todo list in step with the backend,
//! tracks connectivity and probes for backend recovery.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url` and the probe timeout.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `Controller` owns all mutable state and emits complete `View` snapshots;
//!   the host only executes HTTP and draws what it is given.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod remote;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;
pub mod view;

#[cfg(test)]
mod testing;

pub use client::TodoClient;
pub use config::SyncConfig;
pub use controller::{Connectivity, Controller, Event, FormInput, UiUpdate};
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use remote::{RemoteClient, Transport};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{NewTodo, Todo, TodoId, TodoPatch};
pub use view::{render_items, ListView, TodoRow, View};
