//! Selection sync: keep the selected universe a key of the store.

use foundry_universe::store::CollectionStore;

/// The selection that should be shown for `store`.
///
/// A selection that is still a key is kept. Otherwise the lexicographically
/// first key is chosen, or `None` if the store is empty.
pub fn reconcile(selection: Option<&str>, store: &CollectionStore) -> Option<String> {
    match selection {
        Some(name) if store.contains(name) => Some(name.to_owned()),
        _ => store.first_name().map(str::to_owned),
    }
}

/// The currently selected universe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSync {
    selected: Option<String>,
}

impl SelectionSync {
    /// Start with the selection reconciled against `store`.
    pub fn new(store: &CollectionStore) -> Self {
        Self {
            selected: reconcile(None, store),
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select `name` if it is a key of `store`. Returns `true` if the
    /// selection changed.
    pub fn select(&mut self, name: &str, store: &CollectionStore) -> bool {
        if !store.contains(name) || self.selected.as_deref() == Some(name) {
            return false;
        }
        self.selected = Some(name.to_owned());
        true
    }

    /// Repair the selection after a store change. Returns `true` if the
    /// selection changed.
    pub fn sync(&mut self, store: &CollectionStore) -> bool {
        let next = reconcile(self.selected.as_deref(), store);
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }
}
