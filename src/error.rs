//! Error types for the client runtime.
//!
//! Every fallible seam gets its own `thiserror` enum; `ConnectError` is the
//! only type that crosses the lifecycle controller's connect boundary.

use thiserror::Error;

/// Process-memory access failures.
///
/// Reads during location polling are expected to fail transiently (the game
/// relocates structures between loads); callers degrade those to
/// "not completed" rather than surfacing them.
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("invalid read at {address:#x}")]
    InvalidRead { address: u64 },

    #[error("invalid write at {address:#x}")]
    InvalidWrite { address: u64 },

    #[error("command execution failed: {reason}")]
    CommandFailed { reason: String },

    #[error("game process not attached")]
    NotAttached,
}

/// Network session operation failures.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("connection to {host} failed: {reason}")]
    ConnectFailed { host: String, reason: String },

    #[error("login rejected for slot {slot}: {reason}")]
    LoginRejected { slot: String, reason: String },

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("session closed")]
    Closed,
}

/// Static catalog loading failures.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog invariant violated: {0}")]
    Invariant(String),
}

/// Errors surfaced by `RandomizerClient::connect`.
///
/// `GameNotRunning` and `OnlineSession` are the two user-visible
/// preconditions; both leave the client fully disconnected and the connect
/// action retryable.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("game process is not running, start Dark Souls before connecting")]
    GameNotRunning,

    #[error("live online play detected, refusing to attach")]
    OnlineSession,

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}
