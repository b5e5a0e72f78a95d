//! Foundry Universe -- the symbol-universe data model and its mutation algebra.
//!
//! A *universe* is a named, de-duplicated collection of instrument symbols.
//! This crate owns the canonical [`CollectionStore`](store::CollectionStore)
//! (universe name -> de-duplicated symbol list), the pure transforms that derive new
//! stores from user intents ([`merge`]), the FIFO [`IntentBuffer`](intent::IntentBuffer)
//! that applies those intents with causality metadata, and the versioned
//! [`StoreSnapshot`](snapshot::StoreSnapshot) that the session hands to every
//! subscriber.
//!
//! Every transform takes the current store by reference and returns a new
//! one. Symbol lists are immutable and shared between snapshots, so editing
//! one universe can never alias into another.
//!
//! # Quick Start
//!
//! ```
//! use foundry_universe::prelude::*;
//!
//! let store = CollectionStore::seeded();
//! let store = merge::create(&store, "Tech");
//! let store = merge::apply_edits(
//!     &store,
//!     "Tech",
//!     &["NSE:TCS-EQ"],
//!     &[] as &[&str],
//!     "nse:infy-eq\n",
//! );
//!
//! assert_eq!(
//!     store.get("Tech"),
//!     Some(&["NSE:INFY-EQ".to_owned(), "NSE:TCS-EQ".to_owned()][..])
//! );
//! ```

#![deny(unsafe_code)]

pub mod catalog;
pub mod intent;
pub mod merge;
pub mod snapshot;
pub mod store;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by universe operations.
///
/// The merge transforms never surface these to the UI: the session treats
/// them as suppressed intents. They exist so callers (and the intent buffer's
/// logs) can tell *why* an intent was a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    /// The universe does not exist in the store.
    #[error("universe '{name}' does not exist. Known universes: [{known}]")]
    UnknownUniverse { name: String, known: String },

    /// A universe with this name already exists.
    #[error("universe '{name}' already exists")]
    DuplicateUniverse { name: String },

    /// The requested universe name is empty.
    #[error("universe name must not be empty")]
    EmptyName,

    /// A snapshot's stored digest does not match its contents.
    #[error("snapshot hash mismatch: stored {stored}, computed {computed}")]
    SnapshotHashMismatch { stored: String, computed: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::catalog::{StaticCatalog, SymbolCatalog};
    pub use crate::intent::{
        ApplyReport, CausalReason, Intent, IntentBuffer, IntentKind, IntentOutcome, ViewId,
    };
    pub use crate::merge;
    pub use crate::snapshot::StoreSnapshot;
    pub use crate::store::{CollectionStore, SymbolList, DEFAULT_UNIVERSE};
    pub use crate::UniverseError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
