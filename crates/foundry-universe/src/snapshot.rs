//! Versioned, immutable store snapshots with BLAKE3 hashing.
//!
//! A [`StoreSnapshot`] pairs a [`CollectionStore`] with an `epoch`: the number
//! of accepted mutations that produced it. Epoch 0 is the state loaded at
//! session start, before any user mutation. Every accepted intent produces a
//! new snapshot through [`StoreSnapshot::advance`], one epoch higher.
//!
//! Subscribers compare epochs rather than contents to decide whether a
//! change is new: a replayed notification carries an epoch they have already
//! seen.
//!
//! Each snapshot also carries a BLAKE3 hex digest of its canonical JSON
//! encoding, so a snapshot that travelled through serialization can be
//! checked with [`StoreSnapshot::verify`].
//!
//! ```
//! use foundry_universe::prelude::*;
//!
//! let start = StoreSnapshot::initial(CollectionStore::seeded());
//! assert_eq!(start.epoch(), 0);
//! assert_eq!(start.hash().len(), 64);
//!
//! let next = start.advance(merge::create(start.universes(), "Tech"));
//! assert_eq!(next.epoch(), 1);
//! assert_ne!(next.hash(), start.hash());
//! assert!(next.verify().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::store::CollectionStore;
use crate::UniverseError;

// ---------------------------------------------------------------------------
// StoreSnapshot
// ---------------------------------------------------------------------------

/// An immutable store value at one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    universes: CollectionStore,
    epoch: u64,
    hash: String,
}

impl StoreSnapshot {
    /// Snapshot of a freshly loaded store (epoch 0).
    pub fn initial(universes: CollectionStore) -> Self {
        Self::at_epoch(universes, 0)
    }

    /// The successor snapshot holding `universes`, one epoch later.
    pub fn advance(&self, universes: CollectionStore) -> Self {
        Self::at_epoch(universes, self.epoch + 1)
    }

    fn at_epoch(universes: CollectionStore, epoch: u64) -> Self {
        let hash = compute_hash(&universes, epoch);
        Self {
            universes,
            epoch,
            hash,
        }
    }

    /// The store held by this snapshot.
    pub fn universes(&self) -> &CollectionStore {
        &self.universes
    }

    /// Number of accepted mutations behind this snapshot.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// BLAKE3 hex digest (64 lowercase hex chars) of `(universes, epoch)`.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Recompute the digest and compare it with the stored one.
    ///
    /// # Errors
    ///
    /// [`UniverseError::SnapshotHashMismatch`] if the snapshot was altered
    /// after it was hashed (e.g. hand-edited JSON).
    pub fn verify(&self) -> Result<(), UniverseError> {
        let computed = compute_hash(&self.universes, self.epoch);
        if computed != self.hash {
            return Err(UniverseError::SnapshotHashMismatch {
                stored: self.hash.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// Consume the snapshot, keeping only the store.
    pub fn into_universes(self) -> CollectionStore {
        self.universes
    }
}

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

/// BLAKE3 hex digest of the canonical JSON encoding of `(universes, epoch)`.
///
/// `CollectionStore` serializes from a `BTreeMap`, so the encoding is stable.
fn compute_hash(universes: &CollectionStore, epoch: u64) -> String {
    #[derive(Serialize)]
    struct HashableState<'a> {
        universes: &'a CollectionStore,
        epoch: u64,
    }

    let json_bytes = serde_json::to_vec(&HashableState { universes, epoch })
        .expect("StoreSnapshot state should always be JSON-serializable");

    blake3::hash(&json_bytes).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
