//! Static game-data catalogs.
//!
//! Catalogs are embedded as JSON and reloaded fresh on every connect. They
//! are immutable for the lifetime of a session; concurrent readers need no
//! synchronization.

pub mod item_lots;
pub mod items;
pub mod locations;

pub use item_lots::{replacement_lot, ItemLot, ItemLotFlag, ItemLotItem, ItemLotTable};
pub use items::{DarkSoulsItem, ItemCatalog, ItemCategory, FILLER_ITEM_ID};
pub use locations::{Location, LocationCatalogs, LocationCategory};

/// Template for the injected give-item routine. Three x86-64 `mov reg, imm32`
/// immediates hold the parameters: category at 0x1, quantity at 0x7, item id
/// at 0xD. The encoder clones this buffer per call; the constant itself is
/// never written to.
pub const GIVE_ITEM_TEMPLATE: [u8; 20] = [
    0xBA, 0x00, 0x00, 0x00, 0x00, // mov edx, category
    0x41, 0xB8, 0x00, 0x00, 0x00, 0x00, // mov r8d, quantity
    0x41, 0xB9, 0x00, 0x00, 0x00, 0x00, // mov r9d, item id
    0xFF, 0xD0, // call rax
    0xC3, // ret
];

/// Fresh copy of the give-item command template.
pub fn give_item_template() -> Vec<u8> {
    GIVE_ITEM_TEMPLATE.to_vec()
}
