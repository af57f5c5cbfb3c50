//! View controller: local todo collection, connectivity state and the
//! backend health probe.
//!
//! # Design
//! All state lives in one `AppState` owned by the `Controller`, which is
//! driven from a single task. Work is triggered by `Event`s from the host and
//! by the probe interval. Every remote call is split in two: a synchronous
//! step that updates state and returns the pending call, and a synchronous
//! step that applies the call's `Completion`. `run` keeps the pending calls
//! in a `FuturesUnordered`, so events and probe ticks are handled while
//! requests are in flight, and the later-resolving response wins. After
//! every state change the controller pushes a full `View` to the host, and
//! failed mutations additionally push a one-shot `Alert`.
//!
//! Connectivity combines two independent signals: network presence, which
//! the host reports through `Event::NetworkOnline`/`NetworkOffline`, and
//! backend reachability, which only a failed list load can clear and only a
//! successful load (normally reached through the probe) can restore. A
//! failed create/toggle/delete alerts and rolls back but leaves backend
//! reachability untouched.
//!
//! Toggle is optimistic and rolls back on failure. Create and delete change
//! the collection only after the server confirms.

use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::RequestError;
use crate::remote::{RemoteClient, Transport};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};
use crate::view::{
    render_items, ListView, View, RECONNECT_SUFFIX, SUBMIT_BUSY_LABEL, SUBMIT_IDLE_LABEL,
};

pub const BACKEND_UNAVAILABLE_TEXT: &str = "Backend is not available. The app is in read-only mode.";
pub const CREATE_FAILED_ALERT: &str = "Could not save todo. Check that the server is running.";
pub const DELETE_FAILED_ALERT: &str = "Could not delete todo. Check that the server is running.";
pub const UPDATE_FAILED_ALERT: &str = "Could not update todo. Check that the server is running.";

/// Input from the host: user interactions and network presence changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SetTitle(String),
    SetDueDate(String),
    Submit,
    Toggle(TodoId),
    Delete(TodoId),
    NetworkOnline,
    NetworkOffline,
    Reload,
}

/// Output to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    Render(View),
    Alert(String),
}

/// Effective connectivity as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
    BackendUnavailable,
}

/// Contents of the new-todo form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub title: String,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListState {
    Loading,
    Failed(String),
    Ready,
}

#[derive(Debug)]
struct AppState {
    todos: Vec<Todo>,
    list: ListState,
    form: FormInput,
    online: bool,
    backend_available: bool,
    submitting: bool,
    /// Present exactly while the health probe is scheduled.
    probe: Option<Interval>,
    probe_in_flight: bool,
}

impl AppState {
    fn new(online: bool) -> Self {
        Self {
            todos: Vec::new(),
            list: ListState::Ready,
            form: FormInput::default(),
            online,
            backend_available: true,
            submitting: false,
            probe: None,
            probe_in_flight: false,
        }
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }
}

/// Result of a remote call, carrying what is needed to apply it.
#[derive(Debug)]
enum Completion {
    Loaded(Result<Vec<Todo>, RequestError>),
    Created(Result<Todo, RequestError>),
    Toggled {
        id: TodoId,
        previous: bool,
        result: Result<TodoPatch, RequestError>,
    },
    Deleted {
        id: TodoId,
        result: Result<(), RequestError>,
    },
    Probed(bool),
}

type Pending = LocalBoxFuture<'static, Completion>;

enum Step {
    Event(Event),
    Done(Completion),
    Probe,
    Closed,
}

pub struct Controller<T> {
    remote: Rc<RemoteClient<T>>,
    config: SyncConfig,
    state: AppState,
    ui: mpsc::UnboundedSender<UiUpdate>,
}

impl<T: Transport + 'static> Controller<T> {
    pub fn new(remote: RemoteClient<T>, config: SyncConfig, ui: mpsc::UnboundedSender<UiUpdate>) -> Self {
        Self {
            remote: Rc::new(remote),
            config,
            state: AppState::new(true),
            ui,
        }
    }

    /// Set the initial network presence, as reported by the host at startup.
    pub fn with_online(mut self, online: bool) -> Self {
        self.state.online = online;
        self
    }

    /// Initial load, then publish the connectivity indicator.
    pub async fn start(&mut self) {
        self.load_todos().await;
        self.publish();
    }

    /// Process events, probe ticks and completed requests until the event
    /// channel closes and every request still in flight has resolved.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        let mut in_flight: FuturesUnordered<Pending> = FuturesUnordered::new();
        let mut events_open = true;

        loop {
            let busy = !in_flight.is_empty();
            if !events_open && !busy {
                break;
            }
            let probe_ready = events_open && !self.state.probe_in_flight;

            let step = tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => Step::Event(event),
                    None => Step::Closed,
                },
                Some(done) = in_flight.next(), if busy => Step::Done(done),
                () = next_probe(&mut self.state.probe), if probe_ready => Step::Probe,
            };

            let follow_up = match step {
                Step::Event(event) => self.begin(event),
                Step::Done(done) => self.complete(done),
                Step::Probe => self.begin_probe(),
                Step::Closed => {
                    debug!(pending = in_flight.len(), "event channel closed");
                    events_open = false;
                    None
                }
            };
            if let Some(pending) = follow_up {
                in_flight.push(pending);
            }
        }
        debug!("controller stopping");
        self.stop_probe();
    }

    /// Handle one event and wait for any request it starts.
    pub async fn handle(&mut self, event: Event) {
        let pending = self.begin(event);
        self.settle(pending).await;
    }

    /// Replace the local collection with the server's.
    pub async fn load_todos(&mut self) {
        let pending = self.begin_load();
        self.settle(Some(pending)).await;
    }

    /// One health probe, including the reload it triggers on success. Does
    /// nothing while the backend is considered available.
    pub async fn probe_tick(&mut self) {
        let pending = self.begin_probe();
        self.settle(pending).await;
    }

    async fn settle(&mut self, mut pending: Option<Pending>) {
        while let Some(call) = pending {
            let done = call.await;
            pending = self.complete(done);
        }
    }

    fn begin(&mut self, event: Event) -> Option<Pending> {
        match event {
            Event::SetTitle(title) => {
                self.state.form.title = title;
                None
            }
            Event::SetDueDate(due_date) => {
                self.state.form.due_date = due_date;
                None
            }
            Event::Submit => self.begin_submit(),
            Event::Toggle(id) => self.begin_toggle(id),
            Event::Delete(id) => self.begin_delete(id),
            Event::NetworkOnline => {
                self.set_online(true);
                None
            }
            Event::NetworkOffline => {
                self.set_online(false);
                None
            }
            Event::Reload => Some(self.begin_load()),
        }
    }

    fn complete(&mut self, done: Completion) -> Option<Pending> {
        match done {
            Completion::Loaded(result) => self.finish_load(result),
            Completion::Created(result) => self.finish_submit(result),
            Completion::Toggled { id, previous, result } => self.finish_toggle(id, previous, result),
            Completion::Deleted { id, result } => self.finish_delete(id, result),
            Completion::Probed(healthy) => {
                self.state.probe_in_flight = false;
                if healthy && !self.state.backend_available {
                    info!("backend answered the probe, reloading todos");
                    self.stop_probe();
                    return Some(self.begin_load());
                }
            }
        }
        None
    }

    fn begin_load(&mut self) -> Pending {
        self.state.list = ListState::Loading;
        self.publish();

        let remote = Rc::clone(&self.remote);
        async move { Completion::Loaded(remote.list().await) }.boxed_local()
    }

    fn finish_load(&mut self, result: Result<Vec<Todo>, RequestError>) {
        match result {
            Ok(todos) => {
                self.state.todos = todos;
                self.state.list = ListState::Ready;
                if !self.state.backend_available {
                    info!("backend is reachable again");
                    self.hide_error_banner();
                }
            }
            Err(e) => {
                warn!(error = %e, "could not load todos");
                self.state.list = ListState::Failed(format!(
                    "Could not connect to the server. Check that the backend is running at {}.",
                    self.config.base_url
                ));
                self.show_error_banner();
            }
        }
        self.publish();
    }

    fn begin_probe(&mut self) -> Option<Pending> {
        if self.state.backend_available || self.state.probe_in_flight {
            return None;
        }
        debug!("checking whether the backend is back");
        self.state.probe_in_flight = true;

        let remote = Rc::clone(&self.remote);
        Some(async move { Completion::Probed(remote.probe().await) }.boxed_local())
    }

    fn begin_submit(&mut self) -> Option<Pending> {
        if !self.mutations_allowed("create") {
            return None;
        }
        if self.state.submitting {
            debug!("create already in flight");
            return None;
        }

        self.state.submitting = true;
        self.publish();

        let input = NewTodo::from_input(&self.state.form.title, &self.state.form.due_date);
        let remote = Rc::clone(&self.remote);
        Some(async move { Completion::Created(remote.create(&input).await) }.boxed_local())
    }

    fn finish_submit(&mut self, result: Result<Todo, RequestError>) {
        match result {
            Ok(created) => {
                info!(id = created.id, "todo created");
                self.state.todos.push(created);
                self.state.form = FormInput::default();
            }
            Err(e) => {
                warn!(error = %e, "could not create todo");
                self.alert(CREATE_FAILED_ALERT);
            }
        }

        self.state.submitting = false;
        self.publish();
    }

    fn begin_toggle(&mut self, id: TodoId) -> Option<Pending> {
        if !self.mutations_allowed("update") {
            return None;
        }
        let Some(index) = self.state.position(id) else {
            debug!(id, "toggle of unknown todo ignored");
            return None;
        };

        let previous = self.state.todos[index].completed;
        self.state.todos[index].completed = !previous;
        self.publish();

        let remote = Rc::clone(&self.remote);
        let patch = TodoPatch::completed(!previous);
        Some(
            async move {
                let result = remote.update(id, &patch).await;
                Completion::Toggled { id, previous, result }
            }
            .boxed_local(),
        )
    }

    fn finish_toggle(&mut self, id: TodoId, previous: bool, result: Result<TodoPatch, RequestError>) {
        match result {
            Ok(confirmed) => {
                if let Some(index) = self.state.position(id) {
                    self.state.todos[index].merge(&confirmed);
                }
                debug!(id, completed = !previous, "toggle confirmed");
            }
            Err(e) => {
                warn!(id, error = %e, "could not update todo, rolling back");
                if let Some(index) = self.state.position(id) {
                    self.state.todos[index].completed = previous;
                }
                self.alert(UPDATE_FAILED_ALERT);
            }
        }
        self.publish();
    }

    fn begin_delete(&mut self, id: TodoId) -> Option<Pending> {
        if !self.mutations_allowed("delete") {
            return None;
        }
        if self.state.position(id).is_none() {
            debug!(id, "delete of unknown todo ignored");
            return None;
        }

        let remote = Rc::clone(&self.remote);
        Some(
            async move {
                let result = remote.delete(id).await;
                Completion::Deleted { id, result }
            }
            .boxed_local(),
        )
    }

    fn finish_delete(&mut self, id: TodoId, result: Result<(), RequestError>) {
        match result {
            Ok(()) => {
                self.state.todos.retain(|t| t.id != id);
                info!(id, "todo deleted");
                self.publish();
            }
            Err(e) => {
                warn!(id, error = %e, "could not delete todo");
                self.alert(DELETE_FAILED_ALERT);
            }
        }
    }

    pub fn view(&self) -> View {
        let controls_enabled = self.state.backend_available;
        View {
            status_badge: if self.state.online { "Online" } else { "Offline" },
            offline_banner: !self.state.online,
            error_banner: (!self.state.backend_available)
                .then(|| format!("{BACKEND_UNAVAILABLE_TEXT}{RECONNECT_SUFFIX}")),
            controls_enabled,
            submit_enabled: controls_enabled && !self.state.submitting,
            submit_label: if self.state.submitting {
                SUBMIT_BUSY_LABEL
            } else {
                SUBMIT_IDLE_LABEL
            },
            list: match &self.state.list {
                ListState::Loading => ListView::Loading,
                ListState::Failed(message) => ListView::Error(message.clone()),
                ListState::Ready => ListView::Items(render_items(&self.state.todos)),
            },
        }
    }

    pub fn connectivity(&self) -> Connectivity {
        if !self.state.online {
            Connectivity::Offline
        } else if !self.state.backend_available {
            Connectivity::BackendUnavailable
        } else {
            Connectivity::Online
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.state.todos
    }

    pub fn form(&self) -> &FormInput {
        &self.state.form
    }

    pub fn is_probing(&self) -> bool {
        self.state.probe.is_some()
    }

    fn mutations_allowed(&self, action: &str) -> bool {
        if !self.state.online {
            info!(action, "refused while offline");
            return false;
        }
        if !self.state.backend_available {
            info!(action, "refused while the backend is unavailable");
            return false;
        }
        true
    }

    fn set_online(&mut self, online: bool) {
        if self.state.online == online {
            return;
        }
        self.state.online = online;
        info!(online, "network presence changed");
        self.publish();
    }

    /// Lock the controls and schedule the probe.
    fn show_error_banner(&mut self) {
        self.state.backend_available = false;
        self.start_probe();
    }

    fn hide_error_banner(&mut self) {
        self.state.backend_available = true;
        self.stop_probe();
    }

    fn start_probe(&mut self) {
        if self.state.probe.is_some() {
            return;
        }
        info!(interval = ?self.config.probe_interval, "starting backend health probe");
        let period = self.config.probe_interval;
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.state.probe = Some(interval);
    }

    fn stop_probe(&mut self) {
        if self.state.probe.take().is_some() {
            info!("stopped backend health probe");
        }
    }

    fn publish(&self) {
        if self.ui.send(UiUpdate::Render(self.view())).is_err() {
            debug!("ui receiver dropped");
        }
    }

    fn alert(&self, message: &str) {
        if self.ui.send(UiUpdate::Alert(message.to_string())).is_err() {
            debug!("ui receiver dropped");
        }
    }
}

async fn next_probe(probe: &mut Option<Interval>) {
    match probe {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
