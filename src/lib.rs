//! Dark Souls Remastered ⇄ Archipelago client runtime.
//!
//! This crate keeps a running Dark Souls Remastered process synchronized
//! with an Archipelago multiworld session:
//!
//! - location checks are discovered by polling save-flag bits in process
//!   memory and reported to the session as they complete,
//! - inbound item grants are resolved against the item catalog and turned
//!   into give-item commands executed inside the game process,
//! - item lots are bulk-replaced at connect so world pickups stay inert.
//!
//! The GUI shell, the raw process-memory primitives and the Archipelago
//! wire protocol are external collaborators behind the [`game::GameMemory`]
//! and [`net::ArchipelagoSession`] traits. [`session::RandomizerClient`]
//! is the entry point: it owns the connect/reconnect lifecycle and
//! guarantees that a torn-down session leaves no monitors or event
//! subscriptions behind.

pub mod config;
pub mod data;
pub mod error;
pub mod game;
pub mod items;
pub mod monitor;
pub mod net;
pub mod session;
pub mod telemetry;
pub mod ui;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::ClientConfig;
pub use error::ConnectError;
pub use session::{ConnectOptions, RandomizerClient};
