//! Foundry Session -- the reactive driver of the universe manager.
//!
//! This crate builds on [`foundry_universe`] to run a session: it loads the
//! store from durable storage, delivers events to gated view subscribers,
//! applies their intents, repairs the selection, journals every accepted
//! mutation, and persists exactly once per committed change.
//!
//! # Modules
//!
//! - [`config`]: Session configuration loaded from YAML.
//! - [`gate`]: Activity gate (displayed route and tab vs. a view's scope).
//! - [`storage`]: YAML storage document, file and in-memory backends.
//! - [`persistence`]: Persistence watcher and status surface.
//! - [`selection`]: Selection repair after store changes.
//! - [`delete`]: Two-phase delete confirmation.
//! - [`view`]: Selector and editor projections.
//! - [`session`]: The session and its dispatch cascade.
//!
//! # Quick Start
//!
//! ```
//! use foundry_session::prelude::*;
//!
//! let mut session = Session::open(
//!     SessionConfig::default(),
//!     MemoryStorage::new(),
//!     Box::new(StaticCatalog::default()),
//! );
//! assert_eq!(session.selection(), Some("Nifty 50"));
//!
//! session.dispatch(Event::OpenDelete);
//! session.dispatch(Event::ConfirmDelete);
//!
//! assert!(session.store().is_empty());
//! assert_eq!(session.selection(), None);
//! assert_eq!(session.storage().write_count(), 1);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod delete;
pub mod gate;
pub mod persistence;
pub mod selection;
pub mod session;
pub mod storage;
pub mod view;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the universe crate for convenience.
pub use foundry_universe;

/// Re-export the journal crate for convenience.
pub use foundry_journal;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common session usage.
pub mod prelude {
    // Re-export everything from the universe prelude.
    pub use foundry_universe::prelude::*;

    // Journal types.
    pub use foundry_journal::journal::{ChangeKind, MutationJournal, UniverseChange};

    // Session-specific exports.
    pub use crate::config::{ConfigError, SessionConfig};
    pub use crate::delete::{DeleteState, DeleteWorkflow};
    pub use crate::gate::{is_active, Navigation, ViewScope};
    pub use crate::persistence::{PersistOutcome, PersistenceWatcher, StatusLine, StatusSink};
    pub use crate::selection::{reconcile, SelectionSync};
    pub use crate::session::{
        DispatchReport, EditorDraft, Event, HandlerContext, HandlerFn, Session, ViewState,
    };
    pub use crate::storage::{
        load_or_seed, persist, MemoryStorage, Storage, StorageError, YamlFileStorage,
    };
    pub use crate::view::{
        ControlVisibility, EditorTab, EditorView, SelectorView, MANUAL_FORMAT_HINT,
    };
}
