//! Game-process interface.

pub mod memory;

pub use memory::GameMemory;

/// Save-flag bit that is set while the player is in a live online session.
/// Connecting while online is refused outright.
pub const ONLINE_SESSION_ADDRESS: u64 = 0x13FD_A740;
pub const ONLINE_SESSION_BIT: u8 = 2;
