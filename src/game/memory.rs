//! Process-memory access trait.
//!
//! Address resolution, pointer chasing and the code-injection mechanics live
//! in the host application; the runtime only needs byte reads, bulk writes
//! and command execution.

use async_trait::async_trait;

use crate::error::MemoryError;

/// Raw access to the attached game process.
///
/// Implementations must be safe to call concurrently: every batch monitor,
/// the goal watch and the replacement workers share one handle.
#[async_trait]
pub trait GameMemory: Send + Sync {
    /// Read a single byte. Fails when the address is unmapped or the game
    /// is between loads; pollers treat that as "flag not set".
    async fn read_byte(&self, address: u64) -> Result<u8, MemoryError>;

    /// Overwrite a region of process memory.
    async fn write_bytes(&self, address: u64, bytes: &[u8]) -> Result<(), MemoryError>;

    /// Execute an injected command buffer inside the game process.
    async fn execute_command(&self, command: &[u8]) -> Result<(), MemoryError>;

    /// Whether the game process is reachable at all.
    fn is_attached(&self) -> bool;

    /// Read a single save-flag bit.
    async fn read_flag(&self, address: u64, bit: u8) -> Result<bool, MemoryError> {
        let byte = self.read_byte(address).await?;
        Ok(byte & (1u8 << bit) != 0)
    }
}
