//! Archipelago session interface.
//!
//! The wire protocol (connect handshake, login, message framing, retries)
//! lives in the host's session implementation. The runtime drives it through
//! this trait and consumes inbound traffic as [`SessionEvent`]s from a
//! broadcast channel, so each dispatcher task holds its own receiver and
//! dies with its session context.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::data::Location;
use crate::error::SessionError;

/// An inbound item grant: the multiworld instructs this client to deliver
/// an item into the local game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkItem {
    /// Archipelago network item id.
    pub id: i64,
    pub name: String,
    /// Reported quantity. Deliberately not honored by the receipt handler;
    /// exactly one unit is granted per event.
    pub quantity: i32,
}

/// One colored fragment of a server log message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePart {
    pub text: String,
    /// RGB.
    pub color: (u8, u8, u8),
}

/// A server log message, e.g. chat or hint traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerMessage {
    pub parts: Vec<MessagePart>,
}

/// Inbound session traffic.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    ItemReceived(NetworkItem),
    MessageReceived(ServerMessage),
}

/// A connection to the Archipelago coordination server.
///
/// Send operations are fire-and-forget from the runtime's perspective;
/// retry and backoff are the implementation's responsibility.
#[async_trait]
pub trait ArchipelagoSession: Send + Sync {
    async fn connect(&self, host: &str, game: &str) -> Result<(), SessionError>;

    async fn login(&self, slot: &str, password: Option<&str>) -> Result<(), SessionError>;

    /// Report a completed location check.
    async fn send_location(&self, location: &Location) -> Result<(), SessionError>;

    /// Send free-text chat/command input.
    async fn send_message(&self, text: &str) -> Result<(), SessionError>;

    /// Report that this slot's goal condition has been met.
    async fn send_goal_completion(&self) -> Result<(), SessionError>;

    /// Subscribe to inbound events. Events published before the first
    /// subscription are not replayed.
    fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent>;
}
