//! The canonical collection store.
//!
//! A [`CollectionStore`] maps universe names to their symbol lists. It is the
//! single source of truth for the session: views read it, the merge
//! transforms derive new stores from it, and the persistence layer writes it
//! to disk whole.
//!
//! # Invariants
//!
//! - No symbol list contains duplicates. Lists loaded from storage keep
//!   their stored order; lists produced by an edit are sorted ascending.
//! - Symbol lists are immutable ([`SymbolList`] is an `Arc<[String]>`). A new
//!   store shares the lists of every universe it did not touch with the store
//!   it was derived from, and replaces the touched list wholesale.
//! - Keys are kept in a `BTreeMap`, so iteration yields names in
//!   lexicographic order.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

/// Name of the universe seeded when storage is absent or unreadable.
pub const DEFAULT_UNIVERSE: &str = "Nifty 50";

/// An immutable, de-duplicated list of symbols.
pub type SymbolList = Arc<[String]>;

// ---------------------------------------------------------------------------
// CollectionStore
// ---------------------------------------------------------------------------

/// Universe name -> symbol list.
///
/// Serializes as a plain mapping of name to list of strings, which is also
/// the shape of the durable storage document. Deserializing goes through
/// [`from_lists`](Self::from_lists), so decoded stores carry no duplicate
/// symbols either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CollectionStore {
    universes: BTreeMap<String, SymbolList>,
}

impl CollectionStore {
    /// Create an empty store. An empty store is valid.
    pub fn new() -> Self {
        Self {
            universes: BTreeMap::new(),
        }
    }

    /// The default seed: a single, empty [`DEFAULT_UNIVERSE`].
    pub fn seeded() -> Self {
        Self::new().with_universe(DEFAULT_UNIVERSE.to_owned(), Arc::from(Vec::new()))
    }

    /// Build a store from `(name, symbols)` pairs.
    ///
    /// Each list keeps its given order with later duplicates dropped, so a
    /// hand-edited storage file round-trips unchanged until a universe is
    /// edited. A later pair with the same name replaces an earlier one.
    pub fn from_lists<I, N, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<S>)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut universes = BTreeMap::new();
        for (name, symbols) in lists {
            let name = name.into();
            let raw: Vec<String> = symbols.into_iter().map(Into::into).collect();
            let raw_len = raw.len();
            let list = dedup_in_order(raw);
            if list.len() != raw_len {
                tracing::warn!(
                    universe = %name,
                    dropped = raw_len - list.len(),
                    "duplicate symbols dropped from universe"
                );
            }
            universes.insert(name, list);
        }
        Self { universes }
    }

    /// Whether a universe with this exact (case-sensitive) name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.universes.contains_key(name)
    }

    /// The symbols of a universe, if it exists.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.universes.get(name).map(|list| &**list)
    }

    /// The shared list handle of a universe, if it exists.
    ///
    /// Mostly useful to check structural sharing between snapshots with
    /// [`Arc::ptr_eq`].
    pub fn symbol_list(&self, name: &str) -> Option<&SymbolList> {
        self.universes.get(name)
    }

    /// Universe names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.universes.keys().map(String::as_str)
    }

    /// The lexicographically first universe name, if any.
    pub fn first_name(&self) -> Option<&str> {
        self.universes.keys().next().map(String::as_str)
    }

    /// `(name, symbols)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.universes
            .iter()
            .map(|(name, list)| (name.as_str(), &**list))
    }

    /// Number of universes.
    pub fn len(&self) -> usize {
        self.universes.len()
    }

    /// Whether the store holds no universes.
    pub fn is_empty(&self) -> bool {
        self.universes.is_empty()
    }

    /// Comma-separated universe names, for error messages.
    pub fn known_names(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }

    /// Owned copy of the store as a plain document (name -> list).
    pub fn to_document(&self) -> BTreeMap<String, Vec<String>> {
        self.universes
            .iter()
            .map(|(name, list)| (name.clone(), list.to_vec()))
            .collect()
    }

    // -- copy-on-write builders (crate-private) ------------------------------

    /// A new store with `name` bound to `list`. Other lists are shared.
    pub(crate) fn with_universe(&self, name: String, list: SymbolList) -> Self {
        let mut universes = self.universes.clone();
        universes.insert(name, list);
        Self { universes }
    }

    /// A new store without `name`. Other lists are shared.
    pub(crate) fn without_universe(&self, name: &str) -> Self {
        let mut universes = self.universes.clone();
        universes.remove(name);
        Self { universes }
    }
}

impl<'de> Deserialize<'de> for CollectionStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        Ok(Self::from_lists(document))
    }
}

/// Drop repeated symbols, keeping the first occurrence of each.
fn dedup_in_order(symbols: Vec<String>) -> SymbolList {
    let mut seen = HashSet::with_capacity(symbols.len());
    let kept: Vec<String> = symbols
        .into_iter()
        .filter(|symbol| seen.insert(symbol.clone()))
        .collect();
    Arc::from(kept)
}

/// Sort and de-duplicate into an immutable list.
pub(crate) fn normalize(mut symbols: Vec<String>) -> SymbolList {
    symbols.sort();
    symbols.dedup();
    Arc::from(symbols)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
