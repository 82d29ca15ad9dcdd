//! GUI-facing state. The runtime publishes log entries here; rendering is
//! the host shell's concern.

pub mod log;

pub use log::{ClientLog, LogEntry, TextSpan};
