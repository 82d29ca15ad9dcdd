//! Give-item command encoding.
//!
//! The injected routine takes its parameters as three little-endian i32
//! immediates inside the command buffer. Every call clones the template, so
//! concurrent grants can never interleave writes into a shared buffer.

/// Byte offset of the category field.
pub const CATEGORY_OFFSET: usize = 0x1;
/// Byte offset of the quantity field.
pub const QUANTITY_OFFSET: usize = 0x7;
/// Byte offset of the item id field.
pub const ITEM_ID_OFFSET: usize = 0xD;

/// Encode a give-item command from the template. Assumes the template is
/// correctly sized; no further validation is done.
pub fn encode_give_item(template: &[u8], category: i32, item_id: i32, quantity: i32) -> Vec<u8> {
    let mut command = template.to_vec();
    command[CATEGORY_OFFSET..CATEGORY_OFFSET + 4].copy_from_slice(&category.to_le_bytes());
    command[QUANTITY_OFFSET..QUANTITY_OFFSET + 4].copy_from_slice(&quantity.to_le_bytes());
    command[ITEM_ID_OFFSET..ITEM_ID_OFFSET + 4].copy_from_slice(&item_id.to_le_bytes());
    command
}
