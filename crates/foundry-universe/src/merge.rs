//! Pure transforms over the [`CollectionStore`].
//!
//! Every function here takes the current store by reference and returns a new
//! one; none of them mutates its input or touches storage. The `try_*`
//! variants report *why* an intent is a no-op. The plain variants follow the
//! UI contract and hand back an unchanged copy instead.
//!
//! # Edit semantics
//!
//! [`apply_edits`] computes `(current ∪ to_add ∪ parse(manual)) − to_remove`.
//! Additions are applied before removals, so a symbol that is both added and
//! removed in the same edit ends up absent. The result is sorted and
//! de-duplicated. Manual text is split on newlines, trimmed, stripped of blank
//! lines and upper-cased (see [`parse_manual_symbols`]). Checkbox selections
//! (`to_add` / `to_remove`) are taken verbatim, minus empty strings.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::store::{normalize, CollectionStore};
use crate::UniverseError;

// ---------------------------------------------------------------------------
// Manual entry parsing
// ---------------------------------------------------------------------------

/// Parse pasted text into symbols: one per line, trimmed, blank lines
/// dropped, upper-cased.
///
/// ```
/// use foundry_universe::merge::parse_manual_symbols;
///
/// assert_eq!(
///     parse_manual_symbols("nse:wipro-eq\n  \n BSE:TCS-EQ \r\n"),
///     vec!["NSE:WIPRO-EQ".to_owned(), "BSE:TCS-EQ".to_owned()]
/// );
/// ```
pub fn parse_manual_symbols(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Insert an empty universe named `name`.
///
/// # Errors
///
/// - [`UniverseError::EmptyName`] if `name` is empty. Whitespace is a
///   valid name.
/// - [`UniverseError::DuplicateUniverse`] if `name` is already a key.
pub fn try_create(store: &CollectionStore, name: &str) -> Result<CollectionStore, UniverseError> {
    if name.is_empty() {
        return Err(UniverseError::EmptyName);
    }
    if store.contains(name) {
        return Err(UniverseError::DuplicateUniverse {
            name: name.to_owned(),
        });
    }
    Ok(store.with_universe(name.to_owned(), Arc::from(Vec::new())))
}

/// [`try_create`], returning an unchanged copy of `store` on a no-op.
pub fn create(store: &CollectionStore, name: &str) -> CollectionStore {
    try_create(store, name).unwrap_or_else(|_| store.clone())
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Remove the universe named `name`.
///
/// # Errors
///
/// [`UniverseError::UnknownUniverse`] if `name` is not a key.
pub fn try_delete(store: &CollectionStore, name: &str) -> Result<CollectionStore, UniverseError> {
    if !store.contains(name) {
        return Err(unknown(store, name));
    }
    Ok(store.without_universe(name))
}

/// [`try_delete`], returning an unchanged copy of `store` on a no-op.
pub fn delete(store: &CollectionStore, name: &str) -> CollectionStore {
    try_delete(store, name).unwrap_or_else(|_| store.clone())
}

// ---------------------------------------------------------------------------
// Apply edits
// ---------------------------------------------------------------------------

/// Apply additions, a manual paste, and removals to universe `name`.
///
/// Succeeds for any existing universe, even when the edit changes nothing
/// (an empty "save" is still an accepted edit).
///
/// # Errors
///
/// [`UniverseError::UnknownUniverse`] if `name` is not a key.
pub fn try_apply_edits<A, R>(
    store: &CollectionStore,
    name: &str,
    to_add: &[A],
    to_remove: &[R],
    manual_text: &str,
) -> Result<CollectionStore, UniverseError>
where
    A: AsRef<str>,
    R: AsRef<str>,
{
    let current = store.get(name).ok_or_else(|| unknown(store, name))?;

    let mut symbols: BTreeSet<String> = current.iter().cloned().collect();

    // 1. Additions from the candidate list.
    symbols.extend(
        to_add
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
    );

    // 2. Additions from manual entry.
    symbols.extend(parse_manual_symbols(manual_text));

    // 3. Removals, last.
    for symbol in to_remove.iter().map(|s| s.as_ref()) {
        symbols.remove(symbol);
    }

    let list = normalize(symbols.into_iter().collect());
    Ok(store.with_universe(name.to_owned(), list))
}

/// [`try_apply_edits`], returning an unchanged copy of `store` on a no-op.
pub fn apply_edits<A, R>(
    store: &CollectionStore,
    name: &str,
    to_add: &[A],
    to_remove: &[R],
    manual_text: &str,
) -> CollectionStore
where
    A: AsRef<str>,
    R: AsRef<str>,
{
    try_apply_edits(store, name, to_add, to_remove, manual_text).unwrap_or_else(|_| store.clone())
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// Symbols that can still be added: `sorted(all_known − current)`.
///
/// The result is sorted ascending, de-duplicated, and disjoint from `current`.
pub fn available_to_add<C, K>(current: &[C], all_known: &[K]) -> Vec<String>
where
    C: AsRef<str>,
    K: AsRef<str>,
{
    let current: BTreeSet<&str> = current.iter().map(|s| s.as_ref()).collect();
    all_known
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !current.contains(s))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn unknown(store: &CollectionStore, name: &str) -> UniverseError {
    UniverseError::UnknownUniverse {
        name: name.to_owned(),
        known: store.known_names(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
