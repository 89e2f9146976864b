//! Edit hand-off channel between the table and form screens.
//!
//! A single-slot, last-value store used to pass "the record currently being
//! edited" from the table to the form without a route parameter. A published
//! record is readable for one second; after that the slot reads as empty, so
//! a stale record cannot reappear when the user wanders back to the form
//! through some other path. The expiry is an explicit timestamp checked on
//! read, and a successful read always clears the slot (at-most-one delivery
//! per publish).

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::types::BugRecord;

/// How long a published record stays readable.
pub const HANDOFF_TTL: Duration = Duration::from_secs(1);

/// Single-slot hand-off store with expiry-on-read semantics.
pub struct EditHandoff {
    slot: Mutex<Option<(BugRecord, Instant)>>,
    ttl: Duration,
}

impl EditHandoff {
    pub fn new() -> Self {
        Self::with_ttl(HANDOFF_TTL)
    }

    /// Create a hand-off slot with a custom expiry window.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Store a record, replacing whatever was in the slot. The record stays
    /// readable until the expiry window elapses.
    pub fn publish(&self, record: BugRecord) {
        let mut slot = self.slot.lock();
        *slot = Some((record, Instant::now()));
    }

    /// Read and clear the slot. Returns `None` when the slot is empty or the
    /// published record has expired.
    pub fn take(&self) -> Option<BugRecord> {
        let mut slot = self.slot.lock();
        match slot.take() {
            Some((record, published_at)) if published_at.elapsed() <= self.ttl => Some(record),
            _ => None,
        }
    }
}

impl Default for EditHandoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Global hand-off instance shared by the table and form screens.
static HANDOFF: LazyLock<EditHandoff> = LazyLock::new(EditHandoff::new);

/// Get a reference to the global hand-off slot.
pub fn handoff() -> &'static EditHandoff {
    &HANDOFF
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    use crate::types::BugPriority;

    fn mock_record(title: &str) -> BugRecord {
        BugRecord {
            id: Some(1),
            title: title.to_string(),
            description: "description".to_string(),
            priority: BugPriority::P2,
            reporter: "QA".to_string(),
            status: "Open".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            comments: None,
        }
    }

    #[test]
    fn test_take_within_window_yields_record() {
        let handoff = EditHandoff::new();
        handoff.publish(mock_record("crash on save"));
        let taken = handoff.take();
        assert_eq!(taken.map(|r| r.title), Some("crash on save".to_string()));
    }

    #[test]
    fn test_take_is_at_most_once() {
        let handoff = EditHandoff::new();
        handoff.publish(mock_record("crash on save"));
        assert!(handoff.take().is_some());
        assert!(handoff.take().is_none());
    }

    #[test]
    fn test_empty_slot_reads_empty() {
        let handoff = EditHandoff::new();
        assert!(handoff.take().is_none());
    }

    #[test]
    fn test_expired_record_reads_empty() {
        let handoff = EditHandoff::with_ttl(Duration::from_millis(10));
        handoff.publish(mock_record("stale"));
        std::thread::sleep(Duration::from_millis(25));
        assert!(handoff.take().is_none());
    }

    #[test]
    fn test_republish_replaces_slot() {
        let handoff = EditHandoff::new();
        handoff.publish(mock_record("first"));
        handoff.publish(mock_record("second"));
        assert_eq!(
            handoff.take().map(|r| r.title),
            Some("second".to_string())
        );
    }
}
