//! Read-only projections consumed by the renderer.
//!
//! Projections are plain data derived from the store, the selection and the
//! catalog. Renderers never mutate them; user input goes back to the session
//! as [`Event`](crate::session::Event)s.

use std::fmt;
use std::str::FromStr;

use foundry_universe::catalog::SymbolCatalog;
use foundry_universe::merge;
use foundry_universe::store::CollectionStore;
use serde::Serialize;

/// Hint shown next to the manual entry box.
pub const MANUAL_FORMAT_HINT: &str = "Format: EXCHANGE:SYMBOL-SUFFIX (one per line)";

// ---------------------------------------------------------------------------
// EditorTab
// ---------------------------------------------------------------------------

/// Sub-tab of the symbol editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorTab {
    #[default]
    Add,
    Remove,
    Manual,
}

/// Which editor controls are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlVisibility {
    pub add_list: bool,
    pub remove_list: bool,
    pub manual_entry: bool,
    pub format_hint: bool,
}

impl EditorTab {
    pub fn visibility(self) -> ControlVisibility {
        ControlVisibility {
            add_list: self == EditorTab::Add,
            remove_list: self == EditorTab::Remove,
            manual_entry: self == EditorTab::Manual,
            format_hint: self == EditorTab::Manual,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EditorTab::Add => "add",
            EditorTab::Remove => "remove",
            EditorTab::Manual => "manual",
        }
    }
}

impl fmt::Display for EditorTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown editor tab name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown editor tab `{0}`, expected add, remove or manual")]
pub struct UnknownEditorTab(pub String);

impl FromStr for EditorTab {
    type Err = UnknownEditorTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(EditorTab::Add),
            "remove" => Ok(EditorTab::Remove),
            "manual" => Ok(EditorTab::Manual),
            _ => Err(UnknownEditorTab(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// SelectorView
// ---------------------------------------------------------------------------

/// The universe dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorView {
    /// Universe names, sorted.
    pub options: Vec<String>,
    pub selected: Option<String>,
}

pub fn selector_view(store: &CollectionStore, selection: Option<&str>) -> SelectorView {
    SelectorView {
        options: store.names().map(str::to_owned).collect(),
        selected: selection.map(str::to_owned),
    }
}

// ---------------------------------------------------------------------------
// EditorView
// ---------------------------------------------------------------------------

/// The symbol editor for the selected universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub universe: String,
    /// `"Editing: {name}"`.
    pub title: String,
    /// `"Stocks in Universe: {n}"`.
    pub count_label: String,
    /// Catalog tickers not yet in the universe, sorted.
    pub add_candidates: Vec<String>,
    /// The universe's current symbols, in stored order.
    pub remove_candidates: Vec<String>,
    pub tab: EditorTab,
    pub visibility: ControlVisibility,
    /// Present only on the manual tab.
    pub format_hint: Option<&'static str>,
}

/// Project the editor for `selection`. `None` when nothing valid is selected.
pub fn editor_view(
    store: &CollectionStore,
    selection: Option<&str>,
    catalog: &dyn SymbolCatalog,
    tab: EditorTab,
) -> Option<EditorView> {
    let name = selection?;
    let current = store.get(name)?;
    let visibility = tab.visibility();
    Some(EditorView {
        universe: name.to_owned(),
        title: format!("Editing: {name}"),
        count_label: format!("Stocks in Universe: {}", current.len()),
        add_candidates: merge::available_to_add(current, &catalog.all_known_tickers()),
        remove_candidates: current.to_vec(),
        tab,
        visibility,
        format_hint: visibility.format_hint.then_some(MANUAL_FORMAT_HINT),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
