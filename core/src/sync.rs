//! View-state synchronization core.
//!
//! # Design
//! All state the presentation layer renders lives in a single `ViewSnapshot`
//! held by a `watch` channel: intents mutate it in short synchronous
//! sections, and subscribers are woken on every change. Nothing is ever
//! patched in from an individual gateway result. Every settled mutation
//! bumps the request epoch instead, and the refresh scheduler re-fetches the
//! full list whenever the `(filter, epoch)` trigger changes. Optimistic
//! markers (placeholder, pending deletes, create-in-flight) are retired
//! wholesale by the next successful refresh.
//!
//! Intents never block. Each one applies its optimistic state before
//! returning, spawns the gateway work on the current tokio runtime, and
//! hands back the task's `JoinHandle` (or `None` when a guard turned the
//! intent into a no-op). Operations are not serialized against each other;
//! overlapping completions converge through the refresh that follows them.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::filter::select;
use crate::gateway::TodoGateway;
use crate::session::SessionProvider;
use crate::types::{CreateTodo, ErrorKind, FilterMode, Todo, TodoId, UserId};

pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long an error stays visible without being dismissed.
    pub error_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            error_timeout: DEFAULT_ERROR_TIMEOUT,
        }
    }
}

/// The dependencies a refresh is derived from. Any change schedules one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshTrigger {
    pub filter: FilterMode,
    pub epoch: u64,
}

/// Everything the presentation surface needs to render one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// The last fetched list, filtered by the filter it was fetched for.
    pub visible: Vec<Todo>,
    /// Stand-in for a create that has not been reconciled yet.
    pub placeholder: Option<Todo>,
    pub pending_deletes: BTreeSet<TodoId>,
    pub filter: FilterMode,
    pub error: Option<ErrorKind>,
    pub active_count: usize,
    pub has_completed: bool,
    pub create_in_flight: bool,
    /// Contents of the title input; cleared when a create succeeds.
    pub draft_title: String,
    pub epoch: u64,
    /// Trigger of the last successful refresh.
    pub synced: Option<RefreshTrigger>,
}

impl ViewSnapshot {
    fn apply_refresh(&mut self, todos: &[Todo], trigger: RefreshTrigger) {
        self.visible = select(todos, trigger.filter);
        self.has_completed = todos.iter().any(|todo| todo.completed);
        self.active_count = todos.iter().filter(|todo| !todo.completed).count();

        // The fetched list is authoritative now.
        self.create_in_flight = false;
        self.placeholder = None;
        self.pending_deletes.clear();
        self.synced = Some(trigger);
    }
}

struct Shared<G, S> {
    gateway: G,
    session: S,
    config: SyncConfig,
    view: watch::Sender<ViewSnapshot>,
    trigger: watch::Sender<RefreshTrigger>,
    /// Held for the whole of a refresh so manual and scheduled ones never overlap.
    refreshing: Mutex<()>,
}

/// Handle to the synchronization core. Clones share the same state.
pub struct SyncCore<G, S> {
    shared: Arc<Shared<G, S>>,
}

impl<G, S> Clone for SyncCore<G, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<G: TodoGateway, S: SessionProvider> SyncCore<G, S> {
    /// Creates the core and spawns its refresh scheduler, which performs the
    /// initial refresh right away. The scheduler exits once every handle to
    /// the core has been dropped.
    pub fn spawn(gateway: G, session: S, config: SyncConfig) -> (Self, JoinHandle<()>) {
        let (view, _) = watch::channel(ViewSnapshot::default());
        let (trigger, triggers) = watch::channel(RefreshTrigger::default());
        let shared = Arc::new(Shared {
            gateway,
            session,
            config,
            view,
            trigger,
            refreshing: Mutex::new(()),
        });
        let scheduler = tokio::spawn(run_scheduler(Arc::downgrade(&shared), triggers));
        (Self { shared }, scheduler)
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.shared.view.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.shared.view.borrow().clone()
    }

    /// Re-fetches the full list for the current trigger. Waits for a refresh
    /// already in progress, so lists land in the order they were fetched.
    pub async fn refresh(&self) {
        self.shared.refresh().await;
    }

    pub fn set_draft_title(&self, title: &str) {
        self.shared.view.send_modify(|view| {
            view.draft_title.clear();
            view.draft_title.push_str(title);
        });
    }

    pub fn add_todo(&self, title: &str) -> Option<JoinHandle<()>> {
        let user = self.shared.session.current_user()?;
        if title.is_empty() {
            return None;
        }
        debug!(user_id = user.id, title, "adding todo");

        let placeholder = Todo::placeholder(user.id, title);
        self.shared.view.send_modify(|view| {
            view.error = None;
            view.create_in_flight = true;
            view.placeholder = Some(placeholder);
        });

        let input = CreateTodo {
            user_id: user.id,
            title: title.to_string(),
            completed: false,
        };
        let shared = Arc::clone(&self.shared);
        Some(tokio::spawn(async move {
            match shared.gateway.create(&input).await {
                Ok(todo) => {
                    debug!(id = todo.id, "todo created");
                    shared.view.send_modify(|view| view.draft_title.clear());
                }
                Err(err) => {
                    warn!(%err, "failed to create todo");
                    shared.raise(ErrorKind::Add);
                }
            }
            shared.bump_epoch();
        }))
    }

    pub fn remove_todo(&self, id: TodoId) -> Option<JoinHandle<()>> {
        self.shared.session.current_user()?;
        debug!(id, "removing todo");

        self.shared.view.send_modify(|view| {
            view.error = None;
            view.pending_deletes.insert(id);
        });

        let shared = Arc::clone(&self.shared);
        Some(tokio::spawn(async move {
            if let Err(err) = shared.gateway.delete(id).await {
                warn!(id, %err, "failed to delete todo");
                shared.raise(ErrorKind::Delete);
            }
            shared.bump_epoch();
        }))
    }

    /// Deletes every todo the service reports as completed, then bumps the
    /// epoch once.
    pub fn clear_completed(&self) -> Option<JoinHandle<()>> {
        let user = self.shared.session.current_user()?;
        debug!(user_id = user.id, "clearing completed todos");

        let shared = Arc::clone(&self.shared);
        Some(tokio::spawn(async move {
            shared.clear_completed(user.id).await;
            shared.bump_epoch();
        }))
    }

    pub fn set_filter(&self, mode: FilterMode) {
        self.shared.view.send_if_modified(|view| {
            if view.filter == mode {
                return false;
            }
            view.filter = mode;
            true
        });
        self.shared.trigger.send_if_modified(|trigger| {
            if trigger.filter == mode {
                return false;
            }
            trigger.filter = mode;
            true
        });
    }

    pub fn dismiss_error(&self) {
        self.shared.view.send_if_modified(|view| view.error.take().is_some());
    }

    /// Asks for a full re-fetch by bumping the epoch.
    pub fn request_refresh(&self) {
        self.shared.bump_epoch();
    }
}

impl<G: TodoGateway, S: SessionProvider> Shared<G, S> {
    async fn refresh(self: &Arc<Self>) {
        let _running = self.refreshing.lock().await;
        let trigger = *self.trigger.borrow();
        let Some(user) = self.session.current_user() else {
            debug!("no user signed in, skipping refresh");
            return;
        };

        match self.gateway.list(user.id).await {
            Ok(todos) => {
                debug!(count = todos.len(), filter = %trigger.filter, epoch = trigger.epoch, "refreshed");
                self.view.send_modify(|view| view.apply_refresh(&todos, trigger));
            }
            Err(err) => {
                warn!(%err, "failed to load todos");
                self.raise(ErrorKind::Unexpected);
                self.schedule_error_clear();
            }
        }
    }

    async fn clear_completed(&self, user_id: UserId) {
        let completed = match self.gateway.list_completed(user_id).await {
            Ok(todos) => todos,
            Err(err) => {
                warn!(%err, "failed to load completed todos");
                self.raise(ErrorKind::Delete);
                return;
            }
        };

        let ids: BTreeSet<TodoId> = completed.iter().map(|todo| todo.id).collect();
        let pending = ids.clone();
        self.view.send_modify(|view| view.pending_deletes = pending);

        let results = join_all(ids.iter().map(|&id| self.gateway.delete(id))).await;
        let mut failed = 0;
        for (id, result) in ids.iter().zip(&results) {
            if let Err(err) = result {
                warn!(id, %err, "failed to delete completed todo");
                failed += 1;
            }
        }
        if failed > 0 {
            self.raise(ErrorKind::Delete);
        }
    }

    fn raise(&self, kind: ErrorKind) {
        self.view.send_modify(|view| view.error = Some(kind));
    }

    fn bump_epoch(self: &Arc<Self>) {
        let mut epoch = 0;
        self.trigger.send_modify(|trigger| {
            trigger.epoch += 1;
            epoch = trigger.epoch;
        });
        self.view.send_modify(|view| view.epoch = epoch);
        self.schedule_error_clear();
    }

    /// Clears whatever error is showing once the timeout elapses.
    fn schedule_error_clear(self: &Arc<Self>) {
        let shared = Arc::downgrade(self);
        let timeout = self.config.error_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(shared) = shared.upgrade() {
                shared.view.send_if_modified(|view| view.error.take().is_some());
            }
        });
    }
}

async fn run_scheduler<G: TodoGateway, S: SessionProvider>(
    shared: Weak<Shared<G, S>>,
    mut triggers: watch::Receiver<RefreshTrigger>,
) {
    loop {
        triggers.borrow_and_update();
        match shared.upgrade() {
            Some(shared) => shared.refresh().await,
            None => break,
        }
        // Errors once the last handle drops the sender.
        if triggers.changed().await.is_err() {
            break;
        }
    }
    debug!("refresh scheduler stopped");
}
