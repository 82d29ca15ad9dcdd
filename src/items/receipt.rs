//! Inbound item-grant handling.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::command::encode_give_item;
use crate::data::ItemCatalog;
use crate::game::GameMemory;
use crate::net::NetworkItem;
use crate::ui::ClientLog;

/// Resolves item-grant events against the catalog and dispatches give-item
/// commands into the game process.
///
/// Every event produces exactly one item-log entry and exactly one command:
/// unresolved network ids are substituted with the filler item, never
/// dropped. The event's quantity field is deliberately ignored; one unit is
/// granted per event regardless of what the server reports.
pub struct ItemReceiptHandler {
    memory: Arc<dyn GameMemory>,
    items: Arc<ItemCatalog>,
    template: Arc<Vec<u8>>,
    log: ClientLog,
}

impl ItemReceiptHandler {
    pub fn new(
        memory: Arc<dyn GameMemory>,
        items: Arc<ItemCatalog>,
        template: Arc<Vec<u8>>,
        log: ClientLog,
    ) -> Self {
        Self {
            memory,
            items,
            template,
            log,
        }
    }

    pub async fn handle(&self, item: &NetworkItem) {
        // Logged before resolution so the entry survives any outcome.
        self.log.append_item(item).await;

        let to_give = match self.items.by_ap_id(item.id) {
            Some(resolved) => {
                debug!(
                    ap_id = item.id,
                    item_id = resolved.id,
                    name = %resolved.name,
                    "received item"
                );
                resolved
            }
            None => {
                let filler = self.items.filler();
                info!(
                    ap_id = item.id,
                    filler_id = filler.id,
                    "unresolved network item, granting filler"
                );
                filler
            }
        };

        let command = encode_give_item(&self.template, to_give.category.code(), to_give.id, 1);
        if let Err(e) = self.memory.execute_command(&command).await {
            warn!(item_id = to_give.id, error = %e, "give-item command failed");
        }
    }
}
