//! Mutation journal for tracking every accepted universe change with
//! causality metadata.
//!
//! The [`MutationJournal`] records every accepted mutation of the collection
//! store. Each entry ([`UniverseChange`]) captures the universe, its symbols
//! before and after, and full causality metadata (which view issued the
//! intent, why, at which intent index, and which epoch it produced).
//!
//! The journal is populated by the session after each intent buffer
//! application via [`MutationJournal::record_intents`]. Suppressed intents
//! are never recorded: the journal describes what happened, not what was
//! attempted.
//!
//! # Query API
//!
//! - **Universe**: [`MutationJournal::changes_for_universe`]
//! - **View**: [`MutationJournal::changes_by_view`]
//! - **Epoch**: [`MutationJournal::change_at_epoch`]
//!
//! # Example
//!
//! ```
//! use foundry_journal::journal::{MutationJournal, UniverseChange};
//! use foundry_universe::intent::{CausalReason, ViewId};
//!
//! let mut journal = MutationJournal::new();
//!
//! journal.record_change(UniverseChange {
//!     universe: "Tech".to_owned(),
//!     old_symbols: Some(vec![]),
//!     new_symbols: Some(vec!["NSE:TCS-EQ".to_owned()]),
//!     changed_by: ViewId::EDITOR,
//!     reason: CausalReason::UserAction("save_changes".to_owned()),
//!     intent_index: 0,
//!     epoch: 2,
//! });
//!
//! assert_eq!(journal.len(), 1);
//! assert_eq!(journal.changes_for_universe("Tech").count(), 1);
//! ```

use foundry_universe::intent::{CausalReason, Intent, ViewId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UniverseChange
// ---------------------------------------------------------------------------

/// A single recorded universe mutation with full causality metadata.
///
/// # Value semantics
///
/// - **Create**: `old_symbols` is `None`, `new_symbols` is `Some(...)`.
/// - **Edit**: both are `Some(...)` (possibly equal, for an empty save).
/// - **Delete**: `old_symbols` is `Some(...)`, `new_symbols` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseChange {
    /// The universe that was mutated.
    pub universe: String,
    /// Symbols before the mutation, or `None` if the universe did not exist.
    pub old_symbols: Option<Vec<String>>,
    /// Symbols after the mutation, or `None` if the universe was deleted.
    pub new_symbols: Option<Vec<String>>,
    /// The view that issued the intent producing this change.
    pub changed_by: ViewId,
    /// The causal reason attached to the intent.
    pub reason: CausalReason,
    /// The intent's index within its buffer.
    pub intent_index: u32,
    /// The snapshot epoch this change produced.
    pub epoch: u64,
}

/// Classification of a [`UniverseChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Edited,
    Deleted,
}

impl UniverseChange {
    /// Build the change for an accepted intent. Returns `None` for intents
    /// that were suppressed (or never applied).
    pub fn from_intent(intent: &Intent) -> Option<Self> {
        if !intent.accepted {
            return None;
        }
        let outcome = intent.outcome.as_ref()?;
        Some(Self {
            universe: intent.kind.target().to_owned(),
            old_symbols: outcome.before.clone(),
            new_symbols: outcome.after.clone(),
            changed_by: intent.issued_by,
            reason: intent.reason.clone(),
            intent_index: intent.intent_index,
            epoch: outcome.epoch,
        })
    }

    /// Whether this change created, edited, or deleted its universe.
    pub fn kind(&self) -> ChangeKind {
        match (&self.old_symbols, &self.new_symbols) {
            (None, _) => ChangeKind::Created,
            (Some(_), None) => ChangeKind::Deleted,
            (Some(_), Some(_)) => ChangeKind::Edited,
        }
    }

    /// Symbols present after the change but not before.
    pub fn added_symbols(&self) -> Vec<&str> {
        diff(self.new_symbols.as_deref(), self.old_symbols.as_deref())
    }

    /// Symbols present before the change but not after.
    pub fn removed_symbols(&self) -> Vec<&str> {
        diff(self.old_symbols.as_deref(), self.new_symbols.as_deref())
    }
}

fn diff<'a>(from: Option<&'a [String]>, minus: Option<&[String]>) -> Vec<&'a str> {
    let minus = minus.unwrap_or_default();
    from.unwrap_or_default()
        .iter()
        .filter(|s| !minus.contains(*s))
        .map(String::as_str)
        .collect()
}

// ---------------------------------------------------------------------------
// MutationJournal
// ---------------------------------------------------------------------------

/// Accumulates [`UniverseChange`] entries over a session and provides query
/// methods for debugging tools.
///
/// A bounded journal keeps only the most recent `limit` changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationJournal {
    changes: Vec<UniverseChange>,
    #[serde(default)]
    limit: Option<usize>,
}

impl MutationJournal {
    /// Create a new, empty, unbounded journal.
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty journal that keeps at most `limit` changes.
    pub fn bounded(limit: usize) -> Self {
        Self {
            changes: Vec::new(),
            limit: Some(limit),
        }
    }

    /// The retention limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record a single change.
    pub fn record_change(&mut self, change: UniverseChange) {
        self.changes.push(change);
        self.evict();
    }

    /// Record every accepted intent from an intent buffer application.
    ///
    /// Returns the number of changes recorded.
    pub fn record_intents(&mut self, intents: &[Intent]) -> usize {
        let before = self.changes.len();
        self.changes
            .extend(intents.iter().filter_map(UniverseChange::from_intent));
        let recorded = self.changes.len() - before;
        self.evict();
        if recorded > 0 {
            tracing::debug!(recorded, total = self.changes.len(), "journal updated");
        }
        recorded
    }

    /// Clear all recorded changes.
    pub fn clear(&mut self) {
        self.changes.clear();
    }

    /// Returns the number of recorded changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns `true` if no changes have been recorded.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns a slice of all recorded changes in insertion order.
    pub fn all_changes(&self) -> &[UniverseChange] {
        &self.changes
    }

    /// The most recent epoch recorded, if any.
    pub fn latest_epoch(&self) -> Option<u64> {
        self.changes.last().map(|c| c.epoch)
    }

    /// Drop the oldest changes beyond the limit.
    fn evict(&mut self) {
        let Some(limit) = self.limit else { return };
        let excess = self.changes.len().saturating_sub(limit);
        if excess > 0 {
            self.changes.drain(..excess);
            tracing::debug!(evicted = excess, limit, "journal trimmed");
        }
    }

    /// Returns an iterator over changes to the given universe.
    pub fn changes_for_universe<'a>(
        &'a self,
        universe: &'a str,
    ) -> impl Iterator<Item = &'a UniverseChange> {
        self.changes.iter().filter(move |c| c.universe == universe)
    }

    /// Returns an iterator over changes issued by the given view.
    pub fn changes_by_view(&self, view: ViewId) -> impl Iterator<Item = &UniverseChange> {
        self.changes.iter().filter(move |c| c.changed_by == view)
    }

    /// The change that produced the given epoch, if it was recorded.
    pub fn change_at_epoch(&self, epoch: u64) -> Option<&UniverseChange> {
        self.changes.iter().find(|c| c.epoch == epoch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_universe::prelude::*;

    // -- helpers ------------------------------------------------------------

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    fn edit(universe: &str, old: &[&str], new: &[&str], view: ViewId, epoch: u64) -> UniverseChange {
        UniverseChange {
            universe: universe.to_owned(),
            old_symbols: Some(symbols(old)),
            new_symbols: Some(symbols(new)),
            changed_by: view,
            reason: CausalReason::UserAction("save_changes".to_owned()),
            intent_index: 0,
            epoch,
        }
    }

    // -- tests --------------------------------------------------------------

    #[test]
    fn empty_journal() {
        let journal = MutationJournal::new();
        assert!(journal.is_empty());
        assert_eq!(journal.len(), 0);
        assert_eq!(journal.latest_epoch(), None);
        assert_eq!(journal.changes_for_universe("Tech").count(), 0);
        assert_eq!(journal.changes_by_view(ViewId::EDITOR).count(), 0);
        assert!(journal.change_at_epoch(1).is_none());
    }

    #[test]
    fn bounded_journal_keeps_latest_changes() {
        let mut journal = MutationJournal::bounded(2);
        assert_eq!(journal.limit(), Some(2));
        for epoch in 1..=5 {
            journal.record_change(edit("Tech", &[], &["TCS"], ViewId::EDITOR, epoch));
        }
        assert_eq!(journal.len(), 2);
        assert_eq!(journal.all_changes()[0].epoch, 4);
        assert_eq!(journal.latest_epoch(), Some(5));
        assert!(journal.change_at_epoch(1).is_none());

        let mut empty = MutationJournal::bounded(0);
        empty.record_change(edit("Tech", &[], &[], ViewId::EDITOR, 1));
        assert!(empty.is_empty());
    }

    #[test]
    fn query_by_universe_view_and_epoch() {
        let mut journal = MutationJournal::new();
        journal.record_change(edit("Tech", &[], &["TCS"], ViewId::EDITOR, 1));
        journal.record_change(edit("Banks", &[], &["SBIN"], ViewId::EDITOR, 2));
        journal.record_change(edit("Tech", &["TCS"], &["INFY", "TCS"], ViewId::EDITOR, 3));

        assert_eq!(journal.changes_for_universe("Tech").count(), 2);
        assert_eq!(journal.changes_for_universe("Banks").count(), 1);
        assert_eq!(journal.changes_for_universe("Ghost").count(), 0);
        assert_eq!(journal.changes_by_view(ViewId::EDITOR).count(), 3);
        assert_eq!(journal.changes_by_view(ViewId::SELECTOR).count(), 0);
        assert_eq!(journal.change_at_epoch(2).unwrap().universe, "Banks");
        assert_eq!(journal.latest_epoch(), Some(3));
    }

    #[test]
    fn records_only_accepted_intents() {
        let mut buf = IntentBuffer::new();
        buf.create("Tech", ViewId::SELECTOR, CausalReason::UserAction("create".to_owned()));
        buf.create("Tech", ViewId::SELECTOR, CausalReason::UserAction("create".to_owned()));
        buf.apply_edits(
            "Tech",
            vec!["NSE:TCS-EQ".to_owned()],
            Vec::new(),
            "nse:infy-eq".to_owned(),
            ViewId::EDITOR,
            CausalReason::UserAction("save_changes".to_owned()),
        );
        buf.delete(
            "Nifty 50",
            ViewId::DELETE_DIALOG,
            CausalReason::Confirmation("confirm_delete".to_owned()),
        );

        let (_, applied) = buf.apply(&StoreSnapshot::initial(CollectionStore::seeded()));

        let mut journal = MutationJournal::new();
        assert_eq!(journal.record_intents(&applied), 3);

        let changes = journal.all_changes();
        assert_eq!(changes[0].kind(), ChangeKind::Created);
        assert_eq!(changes[0].epoch, 1);
        assert_eq!(changes[0].changed_by, ViewId::SELECTOR);

        assert_eq!(changes[1].kind(), ChangeKind::Edited);
        assert_eq!(changes[1].intent_index, 2);
        assert_eq!(changes[1].added_symbols(), vec!["NSE:INFY-EQ", "NSE:TCS-EQ"]);
        assert!(changes[1].removed_symbols().is_empty());

        assert_eq!(changes[2].kind(), ChangeKind::Deleted);
        assert_eq!(changes[2].universe, "Nifty 50");
        assert_eq!(
            changes[2].reason,
            CausalReason::Confirmation("confirm_delete".to_owned())
        );
    }

    #[test]
    fn empty_save_is_an_edit_with_no_diff() {
        let change = edit("Tech", &["TCS"], &["TCS"], ViewId::EDITOR, 4);
        assert_eq!(change.kind(), ChangeKind::Edited);
        assert!(change.added_symbols().is_empty());
        assert!(change.removed_symbols().is_empty());
    }

    #[test]
    fn removed_symbols_of_delete_are_all_old_symbols() {
        let change = UniverseChange {
            universe: "Tech".to_owned(),
            old_symbols: Some(symbols(&["INFY", "TCS"])),
            new_symbols: None,
            changed_by: ViewId::DELETE_DIALOG,
            reason: CausalReason::Confirmation("confirm_delete".to_owned()),
            intent_index: 0,
            epoch: 7,
        };
        assert_eq!(change.removed_symbols(), vec!["INFY", "TCS"]);
        assert!(change.added_symbols().is_empty());
    }

    #[test]
    fn clear_and_reuse() {
        let mut journal = MutationJournal::new();
        journal.record_change(edit("Tech", &[], &["TCS"], ViewId::EDITOR, 1));
        journal.clear();
        assert!(journal.is_empty());

        journal.record_change(edit("Tech", &["TCS"], &[], ViewId::EDITOR, 2));
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.all_changes()[0].epoch, 2);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut journal = MutationJournal::new();
        journal.record_change(edit("Tech", &[], &["TCS"], ViewId::EDITOR, 1));

        let json = serde_json::to_string(&journal).unwrap();
        let back: MutationJournal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.all_changes(), journal.all_changes());
    }
}
