//! Persistence watcher: writes the store once per committed mutation.
//!
//! The watcher observes `(snapshot, active)` whenever the snapshot epoch
//! changes. It persists when the gate is open and the epoch is newer than
//! the last epoch it wrote. Epoch 0 is the state loaded at session start and
//! is never written back.
//!
//! An inactive observation is dropped entirely: nothing is written and the
//! last persisted epoch stays where it was. A failed write is logged by
//! [`storage::persist`](crate::storage::persist) and also leaves the pointer
//! alone, so the next committed mutation writes the full store again.

use chrono::{Local, NaiveTime};
use foundry_universe::snapshot::StoreSnapshot;
use tracing::debug;

use crate::storage::{self, Storage};

// ---------------------------------------------------------------------------
// Status surface
// ---------------------------------------------------------------------------

/// Write-only sink for the user-facing confirmation message.
pub trait StatusSink {
    fn publish(&mut self, message: String);
}

/// A status surface that shows only the latest message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    latest: Option<String>,
    published: usize,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The message currently displayed.
    pub fn latest(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    /// How many messages have been published in total.
    pub fn published(&self) -> usize {
        self.published
    }
}

impl StatusSink for StatusLine {
    fn publish(&mut self, message: String) {
        self.latest = Some(message);
        self.published += 1;
    }
}

/// The confirmation shown after a successful write.
pub fn saved_message(at: NaiveTime) -> String {
    format!("Changes saved and persisted at {}", at.format("%H:%M:%S"))
}

// ---------------------------------------------------------------------------
// PersistOutcome
// ---------------------------------------------------------------------------

/// What one observation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The store at `epoch` was written.
    Persisted { epoch: u64 },
    /// The gate was closed; nothing happened.
    Inactive,
    /// Epoch 0, or an epoch already written.
    UpToDate,
    /// The write failed; the pointer did not move.
    Failed { epoch: u64 },
}

// ---------------------------------------------------------------------------
// PersistenceWatcher
// ---------------------------------------------------------------------------

/// Tracks the last persisted epoch and decides when to write.
#[derive(Debug, Clone, Default)]
pub struct PersistenceWatcher {
    last_persisted_epoch: u64,
}

impl PersistenceWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent epoch successfully written (0 if none).
    pub fn last_persisted_epoch(&self) -> u64 {
        self.last_persisted_epoch
    }

    /// Observe a snapshot, stamping the confirmation with the local time.
    pub fn observe<S, T>(
        &mut self,
        snapshot: &StoreSnapshot,
        active: bool,
        storage: &mut S,
        status: &mut T,
    ) -> PersistOutcome
    where
        S: Storage + ?Sized,
        T: StatusSink + ?Sized,
    {
        self.observe_at(snapshot, active, storage, status, Local::now().time())
    }

    /// Observe a snapshot with an explicit confirmation time.
    pub fn observe_at<S, T>(
        &mut self,
        snapshot: &StoreSnapshot,
        active: bool,
        storage: &mut S,
        status: &mut T,
        at: NaiveTime,
    ) -> PersistOutcome
    where
        S: Storage + ?Sized,
        T: StatusSink + ?Sized,
    {
        if !active {
            debug!(epoch = snapshot.epoch(), "persistence gated off");
            return PersistOutcome::Inactive;
        }
        let epoch = snapshot.epoch();
        if epoch == 0 || epoch <= self.last_persisted_epoch {
            return PersistOutcome::UpToDate;
        }
        if !storage::persist(storage, snapshot.universes()) {
            return PersistOutcome::Failed { epoch };
        }
        self.last_persisted_epoch = epoch;
        status.publish(saved_message(at));
        PersistOutcome::Persisted { epoch }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
