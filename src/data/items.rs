//! Item catalog - local game items keyed by their Archipelago network id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Local id of the filler item granted when a network item id cannot be
/// resolved against the catalog.
pub const FILLER_ITEM_ID: i32 = 380;

/// In-game item categories. The numeric code is the high nibble the game's
/// give-item routine expects alongside the item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Weapons,
    Armor,
    Rings,
    Consumables,
    KeyItems,
}

impl ItemCategory {
    /// Category code used by the give-item command.
    pub fn code(self) -> i32 {
        match self {
            ItemCategory::Weapons => 0x0000_0000,
            ItemCategory::Armor => 0x1000_0000,
            ItemCategory::Rings => 0x2000_0000,
            // Key items share the goods category with consumables.
            ItemCategory::Consumables | ItemCategory::KeyItems => 0x4000_0000,
        }
    }
}

/// One grantable game item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DarkSoulsItem {
    /// Local item id (game param row).
    pub id: i32,
    /// Archipelago network id.
    pub ap_id: i64,
    pub name: String,
    pub category: ItemCategory,
}

/// Immutable item catalog with a many-to-one network-id lookup.
#[derive(Debug)]
pub struct ItemCatalog {
    items: Vec<DarkSoulsItem>,
    by_ap_id: HashMap<i64, usize>,
    filler: usize,
}

impl ItemCatalog {
    /// Load the embedded catalog. Validates that the filler item exists; a
    /// catalog without it could silently drop unresolved grants.
    pub fn load() -> Result<Self, DataError> {
        Self::from_json(include_str!("items.json"))
    }

    pub fn from_json(raw: &str) -> Result<Self, DataError> {
        let items: Vec<DarkSoulsItem> = serde_json::from_str(raw)?;

        let mut by_ap_id = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            // First entry wins on duplicate network ids.
            by_ap_id.entry(item.ap_id).or_insert(index);
        }

        let filler = items
            .iter()
            .position(|item| item.id == FILLER_ITEM_ID)
            .ok_or_else(|| {
                DataError::Invariant(format!("filler item {FILLER_ITEM_ID} missing from catalog"))
            })?;

        Ok(Self {
            items,
            by_ap_id,
            filler,
        })
    }

    /// Exact-match lookup by Archipelago network id.
    pub fn by_ap_id(&self, ap_id: i64) -> Option<&DarkSoulsItem> {
        self.by_ap_id.get(&ap_id).map(|&index| &self.items[index])
    }

    /// The filler item substituted for unresolved grants.
    pub fn filler(&self) -> &DarkSoulsItem {
        &self.items[self.filler]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DarkSoulsItem> {
        self.items.iter()
    }
}
