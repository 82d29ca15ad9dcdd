//! Session ownership and the connect/reconnect lifecycle.

pub mod lifecycle;

pub use lifecycle::{ConnectOptions, RandomizerClient, GAME_NAME};

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::net::ArchipelagoSession;

/// Owns everything a connected session spawned: the session handle, the
/// shutdown signal, and every background task (monitors, goal watch, event
/// pumps, the replacement job).
///
/// Created at connect start and torn down before any new connect proceeds,
/// so a stale session can never keep reporting after a reconnect.
pub struct SessionContext {
    id: Uuid,
    session: Arc<dyn ArchipelagoSession>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionContext {
    pub fn new(session: Arc<dyn ArchipelagoSession>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            id: Uuid::new_v4(),
            session,
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session(&self) -> &Arc<dyn ArchipelagoSession> {
        &self.session
    }

    /// A receiver every spawned task must select against.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn register_task(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    pub fn register_tasks(&mut self, tasks: impl IntoIterator<Item = JoinHandle<()>>) {
        self.tasks.extend(tasks);
    }

    /// Signal shutdown and wait for every owned task to exit. All tasks
    /// select on the shutdown signal at each suspension point, so this
    /// completes promptly.
    pub async fn teardown(mut self) {
        debug!(session_id = %self.id, tasks = self.tasks.len(), "tearing down session");
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks.drain(..) {
            if task.await.is_err() {
                warn!(session_id = %self.id, "session task panicked during teardown");
            }
        }
        debug!(session_id = %self.id, "session torn down");
    }
}
