//! Bulk item-lot replacement.
//!
//! At connect, every enabled lot flag gets its lot overwritten with the
//! fixed filler lot so world pickups cannot leak randomized items. The
//! fan-out is bounded by a semaphore and fully joined; individual write
//! failures are logged and counted without aborting sibling writes.

use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use tokio::sync::{watch, Semaphore};
use tracing::{info, warn};

use crate::data::{replacement_lot, ItemLotFlag};
use crate::game::GameMemory;

/// Joined result of one bulk replacement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacementOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Overwrite the lot behind every enabled flag with the replacement lot.
/// Disabled flags are skipped entirely. At most `workers` writes run
/// concurrently; shutdown cancels writes that have not started.
pub async fn overwrite_enabled_lots(
    memory: Arc<dyn GameMemory>,
    flags: &[ItemLotFlag],
    workers: usize,
    shutdown_rx: &watch::Receiver<bool>,
) -> ReplacementOutcome {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let lot_bytes = Arc::new(replacement_lot().to_bytes());

    let handles: Vec<_> = flags
        .iter()
        .filter(|flag| flag.is_enabled)
        .cloned()
        .map(|flag| {
            let semaphore = semaphore.clone();
            let memory = memory.clone();
            let lot_bytes = lot_bytes.clone();
            let mut shutdown_rx = shutdown_rx.clone();
            tokio::spawn(async move {
                if *shutdown_rx.borrow() {
                    anyhow::bail!("cancelled before start (flag {})", flag.flag);
                }
                let write = async {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .context("replacement semaphore closed")?;
                    memory
                        .write_bytes(flag.lot_address, &lot_bytes)
                        .await
                        .with_context(|| format!("overwriting lot for flag {}", flag.flag))?;
                    Ok::<(), anyhow::Error>(())
                };
                tokio::select! {
                    result = write => result,
                    _ = shutdown_rx.changed() => {
                        anyhow::bail!("cancelled (flag {})", flag.flag)
                    }
                }
            })
        })
        .collect();

    let attempted = handles.len();
    let mut failed = 0usize;
    for result in join_all(handles).await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "item lot overwrite failed");
                failed += 1;
            }
            Err(e) => {
                warn!(error = %e, "item lot overwrite task panicked");
                failed += 1;
            }
        }
    }

    let outcome = ReplacementOutcome {
        attempted,
        succeeded: attempted - failed,
        failed,
    };
    info!(
        attempted = outcome.attempted,
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        "finished overwriting item lots"
    );
    outcome
}
