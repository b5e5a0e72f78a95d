//! The session: one store, its subscribers, and the dispatch cascade.
//!
//! A [`Session`] owns the current [`StoreSnapshot`] and every piece of view
//! state. Each call to [`Session::dispatch`] handles one logical event:
//!
//! 1. Navigation events (`Navigate`, `SelectTab`) update the displayed route
//!    and tab, which recomputes the activity gate.
//! 2. Any other event is delivered, in registration order, to every
//!    subscriber whose [`ViewScope`] is active. Handlers check the gate first,
//!    then read the snapshot and queue intents or update view state.
//! 3. The intent buffer is applied FIFO. Accepted intents are journaled and
//!    produce a new snapshot, one epoch per intent.
//! 4. If the epoch moved, the selection is repaired and the persistence
//!    watcher observes the new snapshot.
//! 5. If the selection changed, the editor draft is discarded.
//!
//! # Example
//!
//! ```
//! use foundry_session::prelude::*;
//!
//! let mut session = Session::open(
//!     SessionConfig::default(),
//!     MemoryStorage::new(),
//!     Box::new(StaticCatalog::default()),
//! );
//!
//! session.dispatch(Event::Create("Tech".to_owned()));
//! session.dispatch(Event::Select("Tech".to_owned()));
//! session.dispatch(Event::SetManualText("nse:tcs-eq".to_owned()));
//! let report = session.dispatch(Event::SaveChanges);
//!
//! assert_eq!(report.epoch, 2);
//! assert_eq!(session.store().get("Tech"), Some(&["NSE:TCS-EQ".to_owned()][..]));
//! assert_eq!(session.storage().write_count(), 2);
//! ```

use foundry_journal::journal::MutationJournal;
use foundry_universe::catalog::SymbolCatalog;
use foundry_universe::intent::{CausalReason, IntentBuffer, ViewId};
use foundry_universe::snapshot::StoreSnapshot;
use foundry_universe::store::CollectionStore;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::delete::DeleteWorkflow;
use crate::gate::{Navigation, ViewScope};
use crate::persistence::{PersistOutcome, PersistenceWatcher, StatusLine};
use crate::selection::SelectionSync;
use crate::storage::{self, Storage};
use crate::view::{self, EditorTab, EditorView, SelectorView};

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One logical user or host event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The host displayed a different route.
    Navigate(String),
    /// A different tab was selected on the current page.
    SelectTab(String),
    /// A universe was picked in the selector.
    Select(String),
    /// The create button was clicked with this name.
    Create(String),
    /// The add list's chosen symbols changed.
    StageAdditions(Vec<String>),
    /// The remove list's chosen symbols changed.
    StageRemovals(Vec<String>),
    /// The manual entry text changed.
    SetManualText(String),
    /// An editor sub-tab was selected.
    SelectEditorTab(EditorTab),
    /// The save button was clicked.
    SaveChanges,
    /// The delete button was clicked.
    OpenDelete,
    /// The dialog's confirm button was clicked.
    ConfirmDelete,
    /// The dialog's cancel button was clicked.
    CancelDelete,
}

impl Event {
    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Event::Navigate(_) => "navigate",
            Event::SelectTab(_) => "select_tab",
            Event::Select(_) => "select",
            Event::Create(_) => "create",
            Event::StageAdditions(_) => "stage_additions",
            Event::StageRemovals(_) => "stage_removals",
            Event::SetManualText(_) => "set_manual_text",
            Event::SelectEditorTab(_) => "select_editor_tab",
            Event::SaveChanges => "save_changes",
            Event::OpenDelete => "open_delete",
            Event::ConfirmDelete => "confirm_delete",
            Event::CancelDelete => "cancel_delete",
        }
    }
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Edits staged in the editor but not yet saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDraft {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
    pub manual_text: String,
}

impl EditorDraft {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty() && self.manual_text.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything the views own besides the store.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub selection: SelectionSync,
    pub draft: EditorDraft,
    pub editor_tab: EditorTab,
    pub delete: DeleteWorkflow,
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// What a handler sees during one delivery.
pub struct HandlerContext<'a> {
    snapshot: &'a StoreSnapshot,
    navigation: &'a Navigation,
    scope: &'a ViewScope,
    issued_by: ViewId,
    /// Intents queued here are applied after every handler has run.
    pub intents: &'a mut IntentBuffer,
    pub ui: &'a mut ViewState,
}

impl HandlerContext<'_> {
    /// The activity gate for the handler's own scope.
    pub fn is_active(&self) -> bool {
        self.scope.is_active(self.navigation)
    }

    /// The snapshot as of the start of this dispatch.
    pub fn snapshot(&self) -> &StoreSnapshot {
        self.snapshot
    }

    /// The view this handler was registered for.
    pub fn issued_by(&self) -> ViewId {
        self.issued_by
    }
}

/// A subscriber callback.
pub type HandlerFn = fn(&mut HandlerContext<'_>, &Event);

struct Subscriber {
    name: String,
    view: ViewId,
    scope: ViewScope,
    handler: HandlerFn,
}

/// Name of the selector subscriber registered by [`Session::open`].
pub const SELECTOR_SUBSCRIBER: &str = "selector";
/// Name of the editor subscriber registered by [`Session::open`].
pub const EDITOR_SUBSCRIBER: &str = "editor";
/// Name of the delete dialog subscriber registered by [`Session::open`].
pub const DELETE_DIALOG_SUBSCRIBER: &str = "delete_dialog";

fn gated_off(ctx: &HandlerContext<'_>, event: &Event) -> bool {
    if ctx.is_active() {
        return false;
    }
    debug!(
        view_id = ctx.issued_by.0,
        event = event.label(),
        "handler suppressed, view inactive"
    );
    true
}

fn selector_handler(ctx: &mut HandlerContext<'_>, event: &Event) {
    if gated_off(ctx, event) {
        return;
    }
    match event {
        Event::Select(name) => {
            ctx.ui.selection.select(name, ctx.snapshot.universes());
        }
        Event::Create(name) => ctx.intents.create(
            name,
            ctx.issued_by,
            CausalReason::UserAction("create_universe".to_owned()),
        ),
        _ => {}
    }
}

fn editor_handler(ctx: &mut HandlerContext<'_>, event: &Event) {
    if gated_off(ctx, event) {
        return;
    }
    match event {
        Event::StageAdditions(symbols) => ctx.ui.draft.to_add = symbols.clone(),
        Event::StageRemovals(symbols) => ctx.ui.draft.to_remove = symbols.clone(),
        Event::SetManualText(text) => ctx.ui.draft.manual_text = text.clone(),
        Event::SelectEditorTab(tab) => ctx.ui.editor_tab = *tab,
        Event::SaveChanges => {
            let draft = std::mem::take(&mut ctx.ui.draft);
            let Some(name) = ctx.ui.selection.selected() else {
                debug!("save with no selection ignored");
                return;
            };
            ctx.intents.apply_edits(
                name,
                draft.to_add,
                draft.to_remove,
                draft.manual_text,
                ctx.issued_by,
                CausalReason::UserAction("save_changes".to_owned()),
            );
        }
        _ => {}
    }
}

fn delete_dialog_handler(ctx: &mut HandlerContext<'_>, event: &Event) {
    if gated_off(ctx, event) {
        return;
    }
    match event {
        Event::OpenDelete => {
            ctx.ui.delete.open(ctx.ui.selection.selected());
        }
        Event::ConfirmDelete => {
            ctx.ui.delete.confirm(ctx.intents);
        }
        Event::CancelDelete => {
            ctx.ui.delete.cancel();
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// DispatchReport
// ---------------------------------------------------------------------------

/// What one [`Session::dispatch`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// The event's label.
    pub event: &'static str,
    /// Subscribers the event was delivered to.
    pub delivered: usize,
    /// Subscribers skipped because their scope was inactive.
    pub scoped_out: usize,
    /// Intents accepted.
    pub accepted: usize,
    /// Intents suppressed by validation.
    pub suppressed: usize,
    /// Epoch after the dispatch.
    pub epoch: u64,
    /// The watcher's outcome, if the epoch moved.
    pub persist: Option<PersistOutcome>,
    pub selection_changed: bool,
    pub navigation_changed: bool,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single-user universe manager session.
pub struct Session<S: Storage> {
    config: SessionConfig,
    snapshot: StoreSnapshot,
    navigation: Navigation,
    manager_scope: ViewScope,
    intents: IntentBuffer,
    ui: ViewState,
    subscribers: Vec<Subscriber>,
    catalog: Box<dyn SymbolCatalog>,
    storage: S,
    watcher: PersistenceWatcher,
    status: StatusLine,
    journal: MutationJournal,
    last_report: DispatchReport,
}

impl<S: Storage> Session<S> {
    /// Load the store from `storage` (or the configured seed) and start on
    /// the manager's page and tab with the selector, editor and delete
    /// dialog subscribed.
    pub fn open(config: SessionConfig, storage: S, catalog: Box<dyn SymbolCatalog>) -> Self {
        let store = storage::load_or_seed(&storage, config.seed_store());
        let manager_scope = config.manager_scope();
        let journal = MutationJournal::bounded(config.journal_limit);
        let navigation = Navigation::new(manager_scope.route(), manager_scope.tab());
        let ui = ViewState {
            selection: SelectionSync::new(&store),
            ..ViewState::default()
        };

        let mut session = Self {
            config,
            snapshot: StoreSnapshot::initial(store),
            navigation,
            manager_scope: manager_scope.clone(),
            intents: IntentBuffer::new(),
            ui,
            subscribers: Vec::new(),
            catalog,
            storage,
            watcher: PersistenceWatcher::new(),
            status: StatusLine::new(),
            journal,
            last_report: DispatchReport::default(),
        };
        session.add_subscriber(
            SELECTOR_SUBSCRIBER,
            ViewId::SELECTOR,
            manager_scope.clone(),
            selector_handler,
        );
        session.add_subscriber(
            EDITOR_SUBSCRIBER,
            ViewId::EDITOR,
            manager_scope.clone(),
            editor_handler,
        );
        session.add_subscriber(
            DELETE_DIALOG_SUBSCRIBER,
            ViewId::DELETE_DIALOG,
            manager_scope,
            delete_dialog_handler,
        );
        info!(
            universes = session.store().len(),
            selected = ?session.selection(),
            "session opened"
        );
        session
    }

    /// Register a subscriber. Subscribers run in registration order.
    ///
    /// # Panics
    ///
    /// Panics if a subscriber with the same name is already registered.
    pub fn add_subscriber(&mut self, name: &str, view: ViewId, scope: ViewScope, handler: HandlerFn) {
        assert!(
            !self.subscribers.iter().any(|s| s.name == name),
            "duplicate subscriber name: {name:?}"
        );
        self.subscribers.push(Subscriber {
            name: name.to_owned(),
            view,
            scope,
            handler,
        });
    }

    /// Handle one event through the full cascade.
    pub fn dispatch(&mut self, event: Event) -> DispatchReport {
        let was_active = self.is_active();
        let previous_selection = self.ui.selection.selected().map(str::to_owned);
        let mut report = DispatchReport {
            event: event.label(),
            ..DispatchReport::default()
        };

        // Phase 1: navigation, or delivery to scoped subscribers.
        match &event {
            Event::Navigate(route) => report.navigation_changed = self.navigation.navigate(route),
            Event::SelectTab(tab) => report.navigation_changed = self.navigation.select_tab(tab),
            _ => {
                for subscriber in &self.subscribers {
                    if !subscriber.scope.is_active(&self.navigation) {
                        report.scoped_out += 1;
                        continue;
                    }
                    let mut ctx = HandlerContext {
                        snapshot: &self.snapshot,
                        navigation: &self.navigation,
                        scope: &subscriber.scope,
                        issued_by: subscriber.view,
                        intents: &mut self.intents,
                        ui: &mut self.ui,
                    };
                    (subscriber.handler)(&mut ctx, &event);
                    report.delivered += 1;
                }
            }
        }

        let active = self.is_active();
        if active != was_active {
            debug!(
                active,
                route = self.navigation.route(),
                tab = self.navigation.tab(),
                "activity gate changed"
            );
        }

        // Phase 2: apply intents.
        let (next, applied) = self.intents.apply(&self.snapshot);
        let apply_report = self.intents.last_apply_report();
        report.accepted = apply_report.accepted_count;
        report.suppressed = apply_report.suppressed_count;
        self.journal.record_intents(&applied);

        // Phase 3: fan out a new snapshot.
        if next.epoch() != self.snapshot.epoch() {
            self.snapshot = next;
            self.ui.selection.sync(self.snapshot.universes());
            report.persist = Some(self.watcher.observe(
                &self.snapshot,
                active,
                &mut self.storage,
                &mut self.status,
            ));
        }

        // Phase 4: a new selection discards the draft.
        if self.ui.selection.selected() != previous_selection.as_deref() {
            self.ui.draft.clear();
            report.selection_changed = true;
        }

        report.epoch = self.snapshot.epoch();
        debug!(
            event = report.event,
            delivered = report.delivered,
            accepted = report.accepted,
            suppressed = report.suppressed,
            epoch = report.epoch,
            "event dispatched"
        );
        self.last_report = report.clone();
        report
    }

    // -- accessors ----------------------------------------------------------

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    pub fn store(&self) -> &CollectionStore {
        self.snapshot.universes()
    }

    pub fn epoch(&self) -> u64 {
        self.snapshot.epoch()
    }

    pub fn selection(&self) -> Option<&str> {
        self.ui.selection.selected()
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// The activity gate for the universe manager.
    pub fn is_active(&self) -> bool {
        self.manager_scope.is_active(&self.navigation)
    }

    pub fn draft(&self) -> &EditorDraft {
        &self.ui.draft
    }

    pub fn editor_tab(&self) -> EditorTab {
        self.ui.editor_tab
    }

    pub fn delete_workflow(&self) -> &DeleteWorkflow {
        &self.ui.delete
    }

    /// The confirmation dialog body, while a delete is pending.
    pub fn delete_prompt(&self) -> Option<String> {
        self.ui.delete.prompt()
    }

    /// The latest status confirmation, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.latest()
    }

    pub fn journal(&self) -> &MutationJournal {
        &self.journal
    }

    /// Drop every journaled change. Epochs keep counting.
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn last_persisted_epoch(&self) -> u64 {
        self.watcher.last_persisted_epoch()
    }

    pub fn last_report(&self) -> &DispatchReport {
        &self.last_report
    }

    /// Names of registered subscribers, in delivery order.
    pub fn subscriber_names(&self) -> Vec<&str> {
        self.subscribers.iter().map(|s| s.name.as_str()).collect()
    }

    // -- projections --------------------------------------------------------

    /// The selector projection, or `None` while the manager is not shown.
    pub fn selector_view(&self) -> Option<SelectorView> {
        self.is_active()
            .then(|| view::selector_view(self.store(), self.selection()))
    }

    /// The editor projection, or `None` while the manager is not shown or
    /// nothing is selected.
    pub fn editor_view(&self) -> Option<EditorView> {
        if !self.is_active() {
            return None;
        }
        view::editor_view(
            self.store(),
            self.selection(),
            self.catalog.as_ref(),
            self.ui.editor_tab,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
