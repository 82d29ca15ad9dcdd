//! The connect/disconnect lifecycle controller.
//!
//! `connect` runs a strict precondition-and-launch sequence; any mid-sequence
//! failure tears the partially built session down before the error is
//! returned, so the client is always either fully connected or fully
//! disconnected.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::data::{
    give_item_template, ItemCatalog, ItemLotTable, LocationCatalogs,
};
use crate::error::{ConnectError, SessionError};
use crate::game::{GameMemory, ONLINE_SESSION_ADDRESS, ONLINE_SESSION_BIT};
use crate::items::{overwrite_enabled_lots, ItemReceiptHandler};
use crate::monitor::{goal::spawn_goal_watch, spawn_monitors};
use crate::net::{ArchipelagoSession, SessionEvent};
use crate::ui::ClientLog;

use super::SessionContext;

/// Game name announced during the connect handshake.
pub const GAME_NAME: &str = "Dark Souls Remastered";

/// Prefix marking a server message as a hint.
const HINT_MARKER: &str = "[Hint]: ";

/// User-supplied connection parameters.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub host: String,
    pub slot: String,
    pub password: Option<String>,
}

/// The client runtime: owns the process-memory handle and at most one live
/// session context at a time.
pub struct RandomizerClient {
    memory: Arc<dyn GameMemory>,
    config: ClientConfig,
    log: ClientLog,
    ctx: Option<SessionContext>,
}

impl RandomizerClient {
    pub fn new(memory: Arc<dyn GameMemory>, config: ClientConfig) -> Self {
        Self {
            memory,
            config,
            log: ClientLog::new(),
            ctx: None,
        }
    }

    /// Handle to the item/hint logs, for the GUI shell.
    pub fn log(&self) -> ClientLog {
        self.log.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.ctx.is_some()
    }

    /// Establish a session and launch the background machinery.
    ///
    /// Order matters: the game-process and online-play preconditions are
    /// checked before anything network-facing happens, any previous session
    /// is torn down before the new one is built, and monitors launch only
    /// after login succeeds. On error the partial session is torn down and
    /// the client stays disconnected.
    pub async fn connect(
        &mut self,
        opts: &ConnectOptions,
        session: Arc<dyn ArchipelagoSession>,
    ) -> Result<(), ConnectError> {
        info!(host = %opts.host, slot = %opts.slot, "connect requested");

        if !self.memory.is_attached() {
            warn!("game process not reachable, refusing to connect");
            return Err(ConnectError::GameNotRunning);
        }

        if let Some(previous) = self.ctx.take() {
            info!(session_id = %previous.id(), "replacing existing session");
            previous.teardown().await;
        }

        let mut ctx = SessionContext::new(session.clone());
        ctx.register_task(spawn_status_pump(
            session.subscribe_events(),
            ctx.shutdown_signal(),
        ));

        let items = match ItemCatalog::load() {
            Ok(items) => Arc::new(items),
            Err(e) => {
                ctx.teardown().await;
                return Err(e.into());
            }
        };

        // Refuse to touch a save that is in live online play.
        if matches!(
            self.memory
                .read_flag(ONLINE_SESSION_ADDRESS, ONLINE_SESSION_BIT)
                .await,
            Ok(true)
        ) {
            warn!("live online play detected, aborting connect");
            ctx.teardown().await;
            return Err(ConnectError::OnlineSession);
        }

        if let Err(e) = session.connect(&opts.host, GAME_NAME).await {
            ctx.teardown().await;
            return Err(e.into());
        }

        let handler = ItemReceiptHandler::new(
            self.memory.clone(),
            items,
            Arc::new(give_item_template()),
            self.log.clone(),
        );
        ctx.register_task(spawn_event_pump(
            session.subscribe_events(),
            handler,
            self.log.clone(),
            ctx.shutdown_signal(),
        ));

        if let Err(e) = session.login(&opts.slot, opts.password.as_deref()).await {
            ctx.teardown().await;
            return Err(e.into());
        }

        let locations = match LocationCatalogs::load() {
            Ok(locations) => locations,
            Err(e) => {
                ctx.teardown().await;
                return Err(e.into());
            }
        };
        let lots = match ItemLotTable::load() {
            Ok(lots) => lots,
            Err(e) => {
                ctx.teardown().await;
                return Err(e.into());
            }
        };

        match locations.goal() {
            Some(goal) => ctx.register_task(spawn_goal_watch(
                session.clone(),
                self.memory.clone(),
                goal.clone(),
                self.config.goal_poll_interval,
                ctx.shutdown_signal(),
            )),
            None => warn!("no goal location in the boss catalog, goal watch not armed"),
        }

        let shutdown_rx = ctx.shutdown_signal();
        for (category, catalog) in locations.by_category() {
            ctx.register_tasks(spawn_monitors(
                category,
                catalog.clone(),
                session.clone(),
                self.memory.clone(),
                self.config.poll_interval,
                self.config.batch_size,
                &shutdown_rx,
            ));
        }

        {
            let memory = self.memory.clone();
            let workers = self.config.replacement_workers;
            let shutdown_rx = ctx.shutdown_signal();
            ctx.register_task(tokio::spawn(async move {
                overwrite_enabled_lots(memory, &lots.flags, workers, &shutdown_rx).await;
            }));
        }

        info!(session_id = %ctx.id(), "session established");
        self.ctx = Some(ctx);
        Ok(())
    }

    /// Tear down the live session, if any. Idempotent.
    pub async fn disconnect(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            info!(session_id = %ctx.id(), "disconnecting");
            ctx.teardown().await;
        }
    }

    /// Forward free-text input (chat or a `!` server command) to the session.
    pub async fn send_command(&self, text: &str) -> Result<(), SessionError> {
        match &self.ctx {
            Some(ctx) => ctx.session().send_message(text).await,
            None => Err(SessionError::Closed),
        }
    }
}

/// Logs connection status transitions for the lifetime of one session.
fn spawn_status_pump(
    mut events: broadcast::Receiver<SessionEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if *shutdown_rx.borrow() {
                return;
            }
            tokio::select! {
                _ = shutdown_rx.changed() => {}
                event = events.recv() => match event {
                    Ok(SessionEvent::Connected) => info!("session reports connected"),
                    Ok(SessionEvent::Disconnected) => warn!("session reports disconnected"),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "status pump lagged behind event stream");
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                },
            }
        }
    })
}

/// Dispatches item grants to the receipt handler and hint messages to the
/// hint log. Owned by the session context, so a stale session's pump can
/// never act after a reconnect.
fn spawn_event_pump(
    mut events: broadcast::Receiver<SessionEvent>,
    handler: ItemReceiptHandler,
    log: ClientLog,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if *shutdown_rx.borrow() {
                return;
            }
            tokio::select! {
                _ = shutdown_rx.changed() => {}
                event = events.recv() => match event {
                    Ok(SessionEvent::ItemReceived(item)) => handler.handle(&item).await,
                    Ok(SessionEvent::MessageReceived(message)) => {
                        let is_hint = message
                            .parts
                            .iter()
                            .any(|part| part.text.starts_with(HINT_MARKER));
                        if is_hint {
                            if log.append_hint(&message).await {
                                debug!("hint recorded");
                            }
                        } else {
                            debug!(parts = message.parts.len(), "server message ignored");
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event pump lagged, grants may have been missed");
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                },
            }
        }
    })
}
