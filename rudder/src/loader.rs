//! Sequenced asynchronous loads.
//!
//! A view that issues overlapping backend loads can receive responses out of
//! order; applying a stale payload after a fresher one corrupts what the
//! user sees. Each load takes a [`LoadTicket`] from the view's
//! [`LoadSequencer`]; only the most recently issued ticket may apply its
//! payload. Dropping the sequencer (view teardown) invalidates every
//! outstanding ticket, so loads cannot outlive their owning view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Issues monotonically increasing load tickets for one view or table.
#[derive(Debug, Default)]
pub struct LoadSequencer {
    latest: Arc<AtomicU64>,
}

impl LoadSequencer {
    /// Create a sequencer with no loads issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a load, superseding every ticket issued before it.
    pub fn begin(&self) -> LoadTicket {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        LoadTicket {
            seq,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Invalidate all outstanding tickets without issuing a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for LoadSequencer {
    fn drop(&mut self) {
        // Teardown: anything still in flight must be discarded.
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// A single load's claim on being the freshest.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    seq: u64,
    latest: Arc<AtomicU64>,
}

impl LoadTicket {
    /// Whether this ticket is still the most recently issued one.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.seq
    }

    /// Apply a completed load, unless a newer one has been issued since.
    ///
    /// Returns whether `apply` ran.
    pub fn apply(&self, apply: impl FnOnce()) -> bool {
        if self.is_current() {
            apply();
            true
        } else {
            log::debug!("discarding stale load response (ticket {})", self.seq);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let seq = LoadSequencer::new();
        let first = seq.begin();
        let second = seq.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(!first.apply(|| panic!("stale ticket must not apply")));
        let mut applied = false;
        assert!(second.apply(|| applied = true));
        assert!(applied);
    }

    #[test]
    fn dropping_the_sequencer_invalidates_tickets() {
        let seq = LoadSequencer::new();
        let ticket = seq.begin();
        drop(seq);
        assert!(!ticket.is_current());
    }

    #[test]
    fn invalidate_discards_in_flight_loads() {
        let seq = LoadSequencer::new();
        let ticket = seq.begin();
        seq.invalidate();
        assert!(!ticket.is_current());
    }
}
