//! Location monitoring - batch partitioning and the polling loop that
//! reports completed checks to the session.
//!
//! Each category catalog is split into fixed-size batches; one long-lived
//! tokio task polls each batch until it drains or the session shuts down.

pub mod goal;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::data::{Location, LocationCategory};
use crate::game::GameMemory;
use crate::net::ArchipelagoSession;

/// Split `locations` into disjoint, order-preserving batches of at most
/// `batch_size`. The last batch may be shorter.
pub fn partition(locations: Vec<Location>, batch_size: usize) -> Vec<Vec<Location>> {
    assert!(batch_size > 0, "batch size must be positive");
    let mut batches = Vec::with_capacity(locations.len().div_ceil(batch_size));
    let mut remaining = locations;
    while remaining.len() > batch_size {
        let tail = remaining.split_off(batch_size);
        batches.push(remaining);
        remaining = tail;
    }
    if !remaining.is_empty() {
        batches.push(remaining);
    }
    batches
}

/// Polls one batch of locations until every member has been reported.
pub struct BatchMonitor {
    session: Arc<dyn ArchipelagoSession>,
    memory: Arc<dyn GameMemory>,
    poll_interval: Duration,
}

impl BatchMonitor {
    pub fn new(
        session: Arc<dyn ArchipelagoSession>,
        memory: Arc<dyn GameMemory>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            session,
            memory,
            poll_interval,
        }
    }

    /// Run the polling loop until the batch drains or shutdown is signaled.
    ///
    /// Per iteration: evaluate every remaining location in batch order,
    /// report the newly completed ones in discovery order, remove them, then
    /// sleep the fixed interval. A failed flag read counts as "not
    /// completed" and is retried next tick. A removed location is never
    /// re-evaluated, so each is reported at most once.
    pub async fn run(&self, mut batch: Vec<Location>, mut shutdown_rx: watch::Receiver<bool>) {
        debug!(locations = batch.len(), "batch monitor started");

        loop {
            if *shutdown_rx.borrow() {
                debug!(remaining = batch.len(), "batch monitor shutting down");
                return;
            }

            let mut completed: Vec<i64> = Vec::new();
            for location in &batch {
                let is_set = match self
                    .memory
                    .read_flag(location.address, location.address_bit)
                    .await
                {
                    Ok(is_set) => is_set,
                    Err(e) => {
                        // Transient read failures degrade to "not completed".
                        trace!(
                            location_id = location.id,
                            error = %e,
                            "flag read failed, retrying next tick"
                        );
                        false
                    }
                };
                if is_set {
                    completed.push(location.id);
                }
            }

            for location in batch.iter().filter(|l| completed.contains(&l.id)) {
                info!(
                    location_id = location.id,
                    name = %location.name,
                    "location completed"
                );
                if let Err(e) = self.session.send_location(location).await {
                    // Fire-and-forget: the session owns retry policy. The
                    // location is still consumed below.
                    warn!(location_id = location.id, error = %e, "failed to report location");
                }
            }
            batch.retain(|location| !completed.contains(&location.id));

            if batch.is_empty() {
                debug!("batch drained");
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = shutdown_rx.changed() => {}
            }
        }
    }
}

/// Partition a category catalog and spawn one monitor task per batch.
pub fn spawn_monitors(
    category: LocationCategory,
    locations: Vec<Location>,
    session: Arc<dyn ArchipelagoSession>,
    memory: Arc<dyn GameMemory>,
    poll_interval: Duration,
    batch_size: usize,
    shutdown_rx: &watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    let batches = partition(locations, batch_size);
    info!(
        category = category.as_str(),
        batches = batches.len(),
        "launching batch monitors"
    );

    batches
        .into_iter()
        .map(|batch| {
            let monitor = BatchMonitor::new(session.clone(), memory.clone(), poll_interval);
            let shutdown_rx = shutdown_rx.clone();
            tokio::spawn(async move { monitor.run(batch, shutdown_rx).await })
        })
        .collect()
}
