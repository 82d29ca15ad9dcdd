//! Shared test fakes for the process-memory and session seams.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::data::Location;
use crate::error::{MemoryError, SessionError};
use crate::game::GameMemory;
use crate::net::{ArchipelagoSession, SessionEvent};

/// In-memory `GameMemory` fake: a sparse byte map, per-address read/write
/// failure injection, and recordings of executed commands and writes.
pub struct FakeMemory {
    bytes: Mutex<HashMap<u64, u8>>,
    failing_reads: Mutex<HashSet<u64>>,
    failing_writes: Mutex<HashSet<u64>>,
    commands: Mutex<Vec<Vec<u8>>>,
    writes: Mutex<Vec<(u64, Vec<u8>)>>,
    attached: AtomicBool,
}

impl FakeMemory {
    pub fn new() -> Self {
        Self {
            bytes: Mutex::new(HashMap::new()),
            failing_reads: Mutex::new(HashSet::new()),
            failing_writes: Mutex::new(HashSet::new()),
            commands: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            attached: AtomicBool::new(true),
        }
    }

    pub fn set_byte(&self, address: u64, value: u8) {
        self.failing_reads.lock().unwrap().remove(&address);
        self.bytes.lock().unwrap().insert(address, value);
    }

    pub fn set_flag(&self, address: u64, bit: u8) {
        let mut bytes = self.bytes.lock().unwrap();
        *bytes.entry(address).or_insert(0) |= 1u8 << bit;
    }

    pub fn clear_flag(&self, address: u64, bit: u8) {
        let mut bytes = self.bytes.lock().unwrap();
        *bytes.entry(address).or_insert(0) &= !(1u8 << bit);
    }

    /// Make reads of `address` fail until `set_byte` is called for it again.
    pub fn fail_address(&self, address: u64) {
        self.failing_reads.lock().unwrap().insert(address);
        self.bytes.lock().unwrap().remove(&address);
    }

    pub fn fail_writes_at(&self, address: u64) {
        self.failing_writes.lock().unwrap().insert(address);
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    pub fn executed_commands(&self) -> Vec<Vec<u8>> {
        self.commands.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<(u64, Vec<u8>)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl GameMemory for FakeMemory {
    async fn read_byte(&self, address: u64) -> Result<u8, MemoryError> {
        if self.failing_reads.lock().unwrap().contains(&address) {
            return Err(MemoryError::InvalidRead { address });
        }
        match self.bytes.lock().unwrap().get(&address) {
            Some(&byte) => Ok(byte),
            None => Err(MemoryError::InvalidRead { address }),
        }
    }

    async fn write_bytes(&self, address: u64, bytes: &[u8]) -> Result<(), MemoryError> {
        if self.failing_writes.lock().unwrap().contains(&address) {
            return Err(MemoryError::InvalidWrite { address });
        }
        self.writes.lock().unwrap().push((address, bytes.to_vec()));
        Ok(())
    }

    async fn execute_command(&self, command: &[u8]) -> Result<(), MemoryError> {
        self.commands.lock().unwrap().push(command.to_vec());
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}

/// Recording `ArchipelagoSession` fake with an injectable event stream.
pub struct FakeSession {
    events_tx: broadcast::Sender<SessionEvent>,
    sent_locations: Mutex<Vec<i64>>,
    sent_messages: Mutex<Vec<String>>,
    goal_completions: AtomicUsize,
    connect_calls: AtomicUsize,
    login_calls: AtomicUsize,
    fail_connect: AtomicBool,
    fail_login: AtomicBool,
}

impl FakeSession {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            events_tx,
            sent_locations: Mutex::new(Vec::new()),
            sent_messages: Mutex::new(Vec::new()),
            goal_completions: AtomicUsize::new(0),
            connect_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            fail_connect: AtomicBool::new(false),
            fail_login: AtomicBool::new(false),
        }
    }

    /// Inject an inbound event, ignoring the no-subscriber case.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.events_tx.send(event);
    }

    pub fn sent_locations(&self) -> Vec<i64> {
        self.sent_locations.lock().unwrap().clone()
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.sent_messages.lock().unwrap().clone()
    }

    pub fn goal_completions(&self) -> usize {
        self.goal_completions.load(Ordering::SeqCst)
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn fail_next_connect(&self) {
        self.fail_connect.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_login(&self) {
        self.fail_login.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ArchipelagoSession for FakeSession {
    async fn connect(&self, host: &str, _game: &str) -> Result<(), SessionError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.swap(false, Ordering::SeqCst) {
            return Err(SessionError::ConnectFailed {
                host: host.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    async fn login(&self, slot: &str, _password: Option<&str>) -> Result<(), SessionError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_login.swap(false, Ordering::SeqCst) {
            return Err(SessionError::LoginRejected {
                slot: slot.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    async fn send_location(&self, location: &Location) -> Result<(), SessionError> {
        self.sent_locations.lock().unwrap().push(location.id);
        Ok(())
    }

    async fn send_message(&self, text: &str) -> Result<(), SessionError> {
        self.sent_messages.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_goal_completion(&self) -> Result<(), SessionError> {
        self.goal_completions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }
}

/// Poll `predicate` until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: std::time::Duration, mut predicate: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    predicate()
}
