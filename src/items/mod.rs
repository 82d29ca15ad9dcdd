//! Item delivery - command encoding, inbound grant handling, and the bulk
//! item-lot replacement job.

pub mod command;
pub mod receipt;
pub mod replacement;

pub use command::encode_give_item;
pub use receipt::ItemReceiptHandler;
pub use replacement::{overwrite_enabled_lots, ReplacementOutcome};
