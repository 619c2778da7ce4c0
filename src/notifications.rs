//! User-facing notifications.
//!
//! The upload flows report progress and outcomes through a
//! [`NotificationSink`] handed to them at construction. In-progress notices
//! have no timeout and stay until dismissed; the rest auto-dismiss.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use log::{error, info, warn};
use serde::{Serialize, Deserialize};

use crate::constants::{ERROR_NOTIFICATION_TIMEOUT_MS, SUCCESS_NOTIFICATION_TIMEOUT_MS};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Warning => write!(f, "warning"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// Handle for dismissing a shown notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

/// Destination for notifications. `timeout` of `None` means the notice
/// persists until [`NotificationSink::dismiss`] is called.
pub trait NotificationSink: Send + Sync {
    fn show(&self, message: &str, kind: NotificationKind, timeout: Option<Duration>) -> NotificationId;
    fn dismiss(&self, id: NotificationId);
}

/// Timeouts applied to each notification kind
#[derive(Debug, Clone, Copy)]
pub struct NotificationTimeouts {
    pub success: Duration,
    pub error: Duration,
}

impl Default for NotificationTimeouts {
    fn default() -> Self {
        Self {
            success: Duration::from_millis(SUCCESS_NOTIFICATION_TIMEOUT_MS),
            error: Duration::from_millis(ERROR_NOTIFICATION_TIMEOUT_MS),
        }
    }
}

/// Sink that writes notifications to the log
#[derive(Debug, Default)]
pub struct LogSink {
    next_id: AtomicU64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSink for LogSink {
    fn show(&self, message: &str, kind: NotificationKind, _timeout: Option<Duration>) -> NotificationId {
        match kind {
            NotificationKind::Success | NotificationKind::Info => info!("{}", message),
            NotificationKind::Warning => warn!("{}", message),
            NotificationKind::Error => error!("{}", message),
        }
        NotificationId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn dismiss(&self, _id: NotificationId) {}
}

/// One notification captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedNotification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub timeout: Option<Duration>,
    pub dismissed: bool,
}

/// Sink that keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<RecordedNotification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RecordedNotification> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn of_kind(&self, kind: NotificationKind) -> Vec<RecordedNotification> {
        self.records().into_iter().filter(|n| n.kind == kind).collect()
    }

    /// Persistent notices that were never dismissed
    pub fn lingering(&self) -> Vec<RecordedNotification> {
        self.records()
            .into_iter()
            .filter(|n| n.timeout.is_none() && !n.dismissed)
            .collect()
    }
}

impl NotificationSink for MemorySink {
    fn show(&self, message: &str, kind: NotificationKind, timeout: Option<Duration>) -> NotificationId {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = NotificationId(records.len() as u64);
        records.push(RecordedNotification {
            id,
            message: message.to_string(),
            kind,
            timeout,
            dismissed: false,
        });
        id
    }

    fn dismiss(&self, id: NotificationId) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(record) = records.iter_mut().find(|n| n.id == id) {
            record.dismissed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_and_dismisses() {
        let sink = MemorySink::new();
        let busy = sink.show("Uploading...", NotificationKind::Info, None);
        sink.show("Done", NotificationKind::Success, Some(Duration::from_secs(3)));

        assert_eq!(sink.lingering().len(), 1);
        sink.dismiss(busy);
        assert!(sink.lingering().is_empty());
        assert_eq!(sink.of_kind(NotificationKind::Success)[0].message, "Done");
    }

    #[test]
    fn test_log_sink_ids_increase() {
        let sink = LogSink::new();
        let a = sink.show("a", NotificationKind::Info, None);
        let b = sink.show("b", NotificationKind::Warning, None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NotificationKind::Warning.to_string(), "warning");
    }
}
