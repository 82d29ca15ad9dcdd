//! Item-lot tables - the loot structures the bulk replacement job rewrites.

use serde::{Deserialize, Serialize};

use super::items::ItemCategory;
use crate::error::DataError;

/// Local item id written into every replacement lot.
pub const REPLACEMENT_LOT_ITEM_ID: i32 = 370;

/// One possible drop within an item lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemLotItem {
    pub lot_item_id: i32,
    pub category: i32,
    pub count: i32,
    /// Drop weight.
    pub base_point: i32,
    pub cumulate_point: i32,
    pub cumulate_reset: bool,
    pub enable_luck: bool,
    /// Conditional acquisition flag, -1 when unconditional.
    pub get_item_flag_id: i32,
}

/// A loot table entry as laid out in the game's lot params.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemLot {
    pub rarity: i32,
    pub get_item_flag_id: i32,
    pub cumulate_num_flag_id: i32,
    pub cumulate_num_max: i32,
    pub items: Vec<ItemLotItem>,
}

impl ItemLot {
    /// Serialize to the in-memory param layout: four little-endian i32
    /// header fields, then each drop as five i32 fields plus two flag bytes
    /// and the conditional flag id.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16 + self.items.len() * 26);
        bytes.extend_from_slice(&self.rarity.to_le_bytes());
        bytes.extend_from_slice(&self.get_item_flag_id.to_le_bytes());
        bytes.extend_from_slice(&self.cumulate_num_flag_id.to_le_bytes());
        bytes.extend_from_slice(&self.cumulate_num_max.to_le_bytes());
        for item in &self.items {
            bytes.extend_from_slice(&item.lot_item_id.to_le_bytes());
            bytes.extend_from_slice(&item.category.to_le_bytes());
            bytes.extend_from_slice(&item.count.to_le_bytes());
            bytes.extend_from_slice(&item.base_point.to_le_bytes());
            bytes.extend_from_slice(&item.cumulate_point.to_le_bytes());
            bytes.push(item.cumulate_reset as u8);
            bytes.push(item.enable_luck as u8);
            bytes.extend_from_slice(&item.get_item_flag_id.to_le_bytes());
        }
        bytes
    }
}

/// The fixed filler lot written over every enabled lot at connect: rarity 1,
/// a single unconditional consumable, no luck scaling.
pub fn replacement_lot() -> ItemLot {
    ItemLot {
        rarity: 1,
        get_item_flag_id: -1,
        cumulate_num_flag_id: -1,
        cumulate_num_max: 0,
        items: vec![ItemLotItem {
            lot_item_id: REPLACEMENT_LOT_ITEM_ID,
            category: ItemCategory::Consumables.code(),
            count: 1,
            base_point: 100,
            cumulate_point: 0,
            cumulate_reset: false,
            enable_luck: false,
            get_item_flag_id: -1,
        }],
    }
}

/// One lot flag: which lot it gates, where that lot lives, and whether the
/// randomizer has it enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemLotFlag {
    pub flag: i64,
    pub lot_address: u64,
    pub is_enabled: bool,
}

/// The full item-lot-flag table for one session.
#[derive(Debug)]
pub struct ItemLotTable {
    pub flags: Vec<ItemLotFlag>,
}

impl ItemLotTable {
    pub fn load() -> Result<Self, DataError> {
        Self::from_json(include_str!("item_lots.json"))
    }

    pub fn from_json(raw: &str) -> Result<Self, DataError> {
        let flags: Vec<ItemLotFlag> = serde_json::from_str(raw)?;
        Ok(Self { flags })
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ItemLotFlag> {
        self.flags.iter().filter(|flag| flag.is_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_loads() {
        let table = ItemLotTable::load().expect("embedded lot table must parse");
        assert!(!table.flags.is_empty());
        assert!(table.enabled().count() > 0);
    }

    #[test]
    fn test_replacement_lot_shape() {
        let lot = replacement_lot();
        assert_eq!(lot.rarity, 1);
        assert_eq!(lot.get_item_flag_id, -1);
        assert_eq!(lot.items.len(), 1);

        let item = &lot.items[0];
        assert_eq!(item.lot_item_id, REPLACEMENT_LOT_ITEM_ID);
        assert_eq!(item.category, ItemCategory::Consumables.code());
        assert_eq!(item.count, 1);
        assert_eq!(item.get_item_flag_id, -1);
        assert!(!item.enable_luck);
    }

    #[test]
    fn test_lot_encoding_layout() {
        let lot = replacement_lot();
        let bytes = lot.to_bytes();

        // 16-byte header + 26 bytes per drop.
        assert_eq!(bytes.len(), 16 + 26);
        assert_eq!(&bytes[0..4], &1i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &(-1i32).to_le_bytes());
        assert_eq!(&bytes[16..20], &REPLACEMENT_LOT_ITEM_ID.to_le_bytes());
        assert_eq!(
            &bytes[20..24],
            &ItemCategory::Consumables.code().to_le_bytes()
        );
    }
}
