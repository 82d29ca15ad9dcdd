//! Goal-completion watch.
//!
//! A cancellable background task that polls the goal location's flag bit and
//! reports goal completion to the session exactly once.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, trace};

use crate::data::Location;
use crate::game::GameMemory;
use crate::net::ArchipelagoSession;

/// Spawn the goal watch. The task exits after the first observed set bit
/// (single fire) or when shutdown is signaled; transient read failures are
/// retried next tick.
pub fn spawn_goal_watch(
    session: Arc<dyn ArchipelagoSession>,
    memory: Arc<dyn GameMemory>,
    goal: Location,
    poll_interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(location_id = goal.id, name = %goal.name, "goal watch armed");

        loop {
            if *shutdown_rx.borrow() {
                trace!("goal watch shutting down");
                return;
            }

            match memory.read_flag(goal.address, goal.address_bit).await {
                Ok(true) => {
                    info!(location_id = goal.id, "goal completed");
                    if let Err(e) = session.send_goal_completion().await {
                        error!(error = %e, "failed to report goal completion");
                    }
                    return;
                }
                Ok(false) => {}
                Err(e) => {
                    trace!(error = %e, "goal flag read failed, retrying next tick");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = shutdown_rx.changed() => {}
            }
        }
    })
}
