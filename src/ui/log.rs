//! Append-only item and hint logs.
//!
//! Shared between the item receipt handler and the message path; the write
//! lock serializes appends so concurrent grants never interleave entries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::net::{NetworkItem, ServerMessage};

/// One colored fragment of a log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSpan {
    pub text: String,
    /// RGB.
    pub color: (u8, u8, u8),
}

/// One rendered log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub spans: Vec<TextSpan>,
    pub at: DateTime<Utc>,
}

impl LogEntry {
    fn new(spans: Vec<TextSpan>) -> Self {
        Self {
            spans,
            at: Utc::now(),
        }
    }

    fn texts(&self) -> Vec<&str> {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

const WHITE: (u8, u8, u8) = (255, 255, 255);
const PALE_GREEN: (u8, u8, u8) = (200, 255, 200);

/// The append-only item-log and hint-log views published to the GUI shell.
#[derive(Clone, Default)]
pub struct ClientLog {
    items: Arc<RwLock<Vec<LogEntry>>>,
    hints: Arc<RwLock<Vec<LogEntry>>>,
}

impl ClientLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry describing a received item. Called for every grant
    /// event, resolved or not.
    pub async fn append_item(&self, item: &NetworkItem) {
        let entry = LogEntry::new(vec![
            TextSpan {
                text: format!("[{}] -", item.id),
                color: WHITE,
            },
            TextSpan {
                text: item.name.clone(),
                color: PALE_GREEN,
            },
            TextSpan {
                text: format!("x{}", item.quantity),
                color: PALE_GREEN,
            },
        ]);
        self.items.write().await.push(entry);
    }

    /// Append a hint message unless an entry with the same text parts is
    /// already present. Returns whether the entry was added.
    pub async fn append_hint(&self, message: &ServerMessage) -> bool {
        let texts: Vec<&str> = message.parts.iter().map(|part| part.text.as_str()).collect();

        let mut hints = self.hints.write().await;
        if hints.iter().any(|entry| entry.texts() == texts) {
            return false;
        }
        hints.push(LogEntry::new(
            message
                .parts
                .iter()
                .map(|part| TextSpan {
                    text: part.text.clone(),
                    color: part.color,
                })
                .collect(),
        ));
        true
    }

    pub async fn items(&self) -> Vec<LogEntry> {
        self.items.read().await.clone()
    }

    pub async fn hints(&self) -> Vec<LogEntry> {
        self.hints.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::net::MessagePart;

    use super::*;

    fn hint(parts: &[&str]) -> ServerMessage {
        ServerMessage {
            parts: parts
                .iter()
                .map(|text| MessagePart {
                    text: text.to_string(),
                    color: (255, 255, 255),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_item_entry_spans() {
        let log = ClientLog::new();
        log.append_item(&NetworkItem {
            id: 11110370,
            name: "Humanity".to_string(),
            quantity: 3,
        })
        .await;

        let entries = log.items().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].spans[0].text, "[11110370] -");
        assert_eq!(entries[0].spans[1].text, "Humanity");
        assert_eq!(entries[0].spans[2].text, "x3");
    }

    #[tokio::test]
    async fn test_duplicate_hints_dropped() {
        let log = ClientLog::new();
        assert!(log.append_hint(&hint(&["[Hint]: ", "it is somewhere"])).await);
        assert!(!log.append_hint(&hint(&["[Hint]: ", "it is somewhere"])).await);
        assert!(log.append_hint(&hint(&["[Hint]: ", "something else"])).await);
        assert_eq!(log.hints().await.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_appends_all_land() {
        let log = ClientLog::new();
        let mut handles = Vec::new();
        for i in 0..32 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                log.append_item(&NetworkItem {
                    id: i,
                    name: format!("item-{i}"),
                    quantity: 1,
                })
                .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(log.items().await.len(), 32);
    }
}
