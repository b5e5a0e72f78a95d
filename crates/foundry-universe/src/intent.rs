//! Intent buffer with causality metadata for deferred store mutations.
//!
//! Views never mutate the [`CollectionStore`](crate::store::CollectionStore)
//! directly. Their handlers queue [`Intent`]s into an [`IntentBuffer`], and
//! the session applies the buffer once per dispatched event. Each intent
//! carries the [`ViewId`] that issued it and a [`CausalReason`], which feed
//! the mutation journal.
//!
//! Application is FIFO against an immutable [`StoreSnapshot`]: each accepted
//! intent produces a new snapshot whose epoch is one higher than the last.
//! An intent that fails validation (unknown target, duplicate name) is
//! *suppressed*: it is still returned so callers can see the attempt, but it
//! does not advance the epoch.
//!
//! # Example
//!
//! ```
//! use foundry_universe::prelude::*;
//!
//! let mut intents = IntentBuffer::new();
//! intents.create("Tech", ViewId::SELECTOR, CausalReason::UserAction("create".to_owned()));
//! intents.create("Tech", ViewId::SELECTOR, CausalReason::UserAction("create".to_owned()));
//!
//! let start = StoreSnapshot::initial(CollectionStore::seeded());
//! let (next, applied) = intents.apply(&start);
//!
//! assert!(applied[0].accepted);
//! assert!(!applied[1].accepted); // duplicate name
//! assert_eq!(next.epoch(), 1);
//! assert_eq!(intents.last_apply_report().suppressed_count, 1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::merge;
use crate::snapshot::StoreSnapshot;

// ---------------------------------------------------------------------------
// ViewId
// ---------------------------------------------------------------------------

/// Numeric ID of the view that issued an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(pub u32);

impl ViewId {
    /// Session-internal operations (not tied to a user-visible view).
    pub const SESSION_INTERNAL: ViewId = ViewId(0);
    /// The universe selector (dropdown, create field).
    pub const SELECTOR: ViewId = ViewId(1);
    /// The symbol editor (add / remove / manual entry, save button).
    pub const EDITOR: ViewId = ViewId(2);
    /// The delete confirmation dialog.
    pub const DELETE_DIALOG: ViewId = ViewId(3);
}

// ---------------------------------------------------------------------------
// CausalReason
// ---------------------------------------------------------------------------

/// Why an intent was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CausalReason {
    /// A direct user action (button click, paste).
    UserAction(String),
    /// The confirming half of a two-phase action.
    Confirmation(String),
    /// Session bookkeeping.
    SessionInternal(String),
}

// ---------------------------------------------------------------------------
// IntentKind
// ---------------------------------------------------------------------------

/// What mutation an intent requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentKind {
    /// Create an empty universe.
    Create { name: String },
    /// Delete a universe.
    Delete { name: String },
    /// Add and remove symbols in a universe.
    ApplyEdits {
        name: String,
        to_add: Vec<String>,
        to_remove: Vec<String>,
        manual_text: String,
    },
}

impl IntentKind {
    /// The universe this intent targets.
    pub fn target(&self) -> &str {
        match self {
            IntentKind::Create { name }
            | IntentKind::Delete { name }
            | IntentKind::ApplyEdits { name, .. } => name,
        }
    }

    /// Short label for logs (`"create"`, `"delete"`, `"apply_edits"`).
    pub fn label(&self) -> &'static str {
        match self {
            IntentKind::Create { .. } => "create",
            IntentKind::Delete { .. } => "delete",
            IntentKind::ApplyEdits { .. } => "apply_edits",
        }
    }
}

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// The committed effect of an accepted intent on its target universe.
///
/// `before` is `None` for a create, `after` is `None` for a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentOutcome {
    /// Epoch of the snapshot this intent produced.
    pub epoch: u64,
    /// Target symbols before the intent.
    pub before: Option<Vec<String>>,
    /// Target symbols after the intent.
    pub after: Option<Vec<String>>,
}

/// A single deferred mutation with causality metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// What mutation to perform.
    pub kind: IntentKind,
    /// Which view issued this intent.
    pub issued_by: ViewId,
    /// Why this intent was issued.
    pub reason: CausalReason,
    /// Sequential index within the buffer (set on insertion).
    pub intent_index: u32,
    /// Whether the intent was accepted. `false` before `apply()` and for
    /// suppressed intents.
    #[serde(default)]
    pub accepted: bool,
    /// Set on acceptance.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub outcome: Option<IntentOutcome>,
}

// ---------------------------------------------------------------------------
// ApplyReport
// ---------------------------------------------------------------------------

/// Summary of the last [`IntentBuffer::apply`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Intents that produced a new snapshot.
    pub accepted_count: usize,
    /// Intents that failed validation and were dropped.
    pub suppressed_count: usize,
}

// ---------------------------------------------------------------------------
// IntentBuffer
// ---------------------------------------------------------------------------

/// Collects intents during one dispatch and applies them in insertion order.
///
/// After [`apply`](Self::apply) the buffer is empty and the applied intents
/// (accepted and suppressed) are returned for the journal.
#[derive(Debug, Default)]
pub struct IntentBuffer {
    intents: Vec<Intent>,
    next_index: u32,
    last_apply_report: ApplyReport,
}

impl IntentBuffer {
    /// Create a new, empty intent buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `Create` intent.
    pub fn create(&mut self, name: &str, issued_by: ViewId, reason: CausalReason) {
        self.push(
            IntentKind::Create {
                name: name.to_owned(),
            },
            issued_by,
            reason,
        );
    }

    /// Queue a `Delete` intent.
    pub fn delete(&mut self, name: &str, issued_by: ViewId, reason: CausalReason) {
        self.push(
            IntentKind::Delete {
                name: name.to_owned(),
            },
            issued_by,
            reason,
        );
    }

    /// Queue an `ApplyEdits` intent.
    pub fn apply_edits(
        &mut self,
        name: &str,
        to_add: Vec<String>,
        to_remove: Vec<String>,
        manual_text: String,
        issued_by: ViewId,
        reason: CausalReason,
    ) {
        self.push(
            IntentKind::ApplyEdits {
                name: name.to_owned(),
                to_add,
                to_remove,
                manual_text,
            },
            issued_by,
            reason,
        );
    }

    /// Queued intents in insertion order.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Number of queued intents.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Report from the last [`apply`](Self::apply) call.
    pub fn last_apply_report(&self) -> &ApplyReport {
        &self.last_apply_report
    }

    /// Apply all queued intents to `snapshot` in insertion order.
    ///
    /// Returns the resulting snapshot and every intent with its `accepted`
    /// flag and outcome filled in. If nothing was accepted, the returned
    /// snapshot equals `snapshot` (same epoch, same hash). The buffer is
    /// cleared.
    pub fn apply(&mut self, snapshot: &StoreSnapshot) -> (StoreSnapshot, Vec<Intent>) {
        let mut intents = std::mem::take(&mut self.intents);
        self.next_index = 0;

        let mut current = snapshot.clone();
        let mut report = ApplyReport::default();

        for intent in &mut intents {
            let store = current.universes();
            let target = intent.kind.target();
            let before = store.get(target).map(<[String]>::to_vec);

            let result = match &intent.kind {
                IntentKind::Create { name } => merge::try_create(store, name),
                IntentKind::Delete { name } => merge::try_delete(store, name),
                IntentKind::ApplyEdits {
                    name,
                    to_add,
                    to_remove,
                    manual_text,
                } => merge::try_apply_edits(store, name, to_add, to_remove, manual_text),
            };

            match result {
                Ok(next_store) => {
                    let after = next_store.get(target).map(<[String]>::to_vec);
                    current = current.advance(next_store);
                    intent.accepted = true;
                    intent.outcome = Some(IntentOutcome {
                        epoch: current.epoch(),
                        before,
                        after,
                    });
                    report.accepted_count += 1;
                }
                Err(e) => {
                    report.suppressed_count += 1;
                    debug!(
                        intent_index = intent.intent_index,
                        intent = intent.kind.label(),
                        view_id = intent.issued_by.0,
                        reason = %e,
                        "intent suppressed"
                    );
                }
            }
        }

        self.last_apply_report = report;
        (current, intents)
    }

    fn push(&mut self, kind: IntentKind, issued_by: ViewId, reason: CausalReason) {
        let intent_index = self.next_index;
        self.next_index += 1;
        self.intents.push(Intent {
            kind,
            issued_by,
            reason,
            intent_index,
            accepted: false,
            outcome: None,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
