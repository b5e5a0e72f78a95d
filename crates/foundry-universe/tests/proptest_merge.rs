//! Property tests for the merge transforms.
//!
//! These tests use `proptest` to generate random universes and edits and
//! verify that the algebraic properties of the store hold for every input.

use std::collections::BTreeSet;
use std::sync::Arc;

use foundry_universe::prelude::*;
use proptest::prelude::*;

/// Short upper-case tokens, so generated sets overlap often.
fn symbol_strategy() -> impl Strategy<Value = String> {
    "[A-E]{1,2}"
}

fn symbols_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(symbol_strategy(), 0..8)
}

/// Stores whose lists are already sorted, as every edited list is.
fn store_strategy() -> impl Strategy<Value = CollectionStore> {
    prop::collection::btree_map("[a-d]{1,3}", symbols_strategy(), 1..5).prop_map(|lists| {
        CollectionStore::from_lists(lists.into_iter().map(|(name, mut symbols)| {
            symbols.sort();
            (name, symbols)
        }))
    })
}

/// Stores loaded in arbitrary order.
fn unsorted_store_strategy() -> impl Strategy<Value = CollectionStore> {
    prop::collection::btree_map("[a-d]{1,3}", symbols_strategy(), 1..5)
        .prop_map(|lists| CollectionStore::from_lists(lists))
}

/// A store plus the name of one of its universes.
fn store_and_name() -> impl Strategy<Value = (CollectionStore, String)> {
    store_strategy().prop_flat_map(|store| {
        let names: Vec<String> = store.names().map(str::to_owned).collect();
        (Just(store), prop::sample::select(names))
    })
}

const NONE: &[&str] = &[];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn noop_edit_is_identity((store, name) in store_and_name()) {
        prop_assert_eq!(merge::apply_edits(&store, &name, NONE, NONE, ""), store);
    }

    #[test]
    fn edit_result_honors_add_and_remove(
        (store, name) in store_and_name(),
        to_add in symbols_strategy(),
        to_remove in symbols_strategy(),
    ) {
        let next = merge::apply_edits(&store, &name, &to_add, &to_remove, "");
        let result = next.get(&name).unwrap();

        let removed: BTreeSet<&str> = to_remove.iter().map(String::as_str).collect();
        for symbol in result {
            prop_assert!(!removed.contains(symbol.as_str()), "{symbol} should have been removed");
        }

        let current = store.get(&name).unwrap();
        for symbol in current.iter().chain(to_add.iter()) {
            if !removed.contains(symbol.as_str()) {
                prop_assert!(result.contains(symbol), "{symbol} missing from result");
            }
        }

        let unique: BTreeSet<&String> = result.iter().collect();
        prop_assert_eq!(unique.len(), result.len(), "result has duplicates");

        let mut sorted = result.to_vec();
        sorted.sort();
        prop_assert_eq!(sorted, result.to_vec());
    }

    #[test]
    fn manual_paste_is_uppercased(
        (store, name) in store_and_name(),
        lines in prop::collection::vec("[a-e]{1,3}", 0..5),
    ) {
        let text = lines.join("\n  \n");
        let next = merge::apply_edits(&store, &name, NONE, NONE, &text);
        let result = next.get(&name).unwrap();
        for line in &lines {
            prop_assert!(result.contains(&line.to_uppercase()));
        }
    }

    #[test]
    fn available_is_sorted_and_disjoint(
        current in symbols_strategy(),
        known in symbols_strategy(),
    ) {
        let available = merge::available_to_add(&current, &known);

        let mut sorted = available.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&sorted, &available);

        for symbol in &available {
            prop_assert!(!current.contains(symbol));
            prop_assert!(known.contains(symbol));
        }
    }

    #[test]
    fn delete_leaves_other_universes_untouched((store, name) in store_and_name()) {
        let next = merge::delete(&store, &name);
        prop_assert!(!next.contains(&name));
        prop_assert_eq!(next.len(), store.len() - 1);

        for (other, symbols) in store.iter().filter(|(n, _)| *n != name) {
            prop_assert_eq!(next.get(other), Some(symbols));
            prop_assert!(Arc::ptr_eq(
                store.symbol_list(other).unwrap(),
                next.symbol_list(other).unwrap()
            ));
        }
    }

    #[test]
    fn edit_sorts_only_the_target(store in unsorted_store_strategy(), pick in any::<prop::sample::Index>()) {
        let names: Vec<String> = store.names().map(str::to_owned).collect();
        let name = pick.get(&names);
        let next = merge::apply_edits(&store, name, NONE, NONE, "");

        let mut sorted = store.get(name).unwrap().to_vec();
        sorted.sort();
        prop_assert_eq!(next.get(name), Some(&sorted[..]));
        for (other, symbols) in store.iter().filter(|(n, _)| *n != name.as_str()) {
            prop_assert_eq!(next.get(other), Some(symbols));
        }
    }

    #[test]
    fn create_existing_is_value_identity((store, name) in store_and_name()) {
        prop_assert_eq!(merge::create(&store, &name), store);
    }

    #[test]
    fn edits_never_alias_other_universes(
        (store, name) in store_and_name(),
        to_add in symbols_strategy(),
    ) {
        let before = store.clone();
        let next = merge::apply_edits(&store, &name, &to_add, NONE, "");

        // The input is unchanged by value.
        prop_assert_eq!(&store, &before);
        for (other, symbols) in store.iter().filter(|(n, _)| *n != name) {
            prop_assert_eq!(next.get(other), Some(symbols));
        }
    }
}

/// Deleting one universe leaves another, built from separate lists, unchanged
/// byte for byte.
#[test]
fn delete_does_not_touch_separately_built_universe() {
    let store = CollectionStore::from_lists([
        ("Banks", vec!["NSE:HDFCBANK", "ICICIBANK"]),
        ("Tech", vec!["NSE:INFY-EQ", "TCS"]),
    ]);
    let tech_before = serde_json::to_vec(store.get("Tech").unwrap()).unwrap();

    let next = merge::delete(&store, "Banks");

    let tech_after = serde_json::to_vec(next.get("Tech").unwrap()).unwrap();
    assert_eq!(tech_before, tech_after);
}
