//! Property tests for the session cascade.
//!
//! Random event streams, including navigation away from the manager, must
//! keep the selection valid and persist exactly the epochs committed while
//! the manager was shown.

use foundry_session::prelude::*;
use proptest::prelude::*;

const PAGE: &str = "/research-hub";
const TAB: &str = "universe-manager-tab";

fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "B", "Nifty 50", ""]).prop_map(str::to_owned)
}

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        name_strategy().prop_map(Event::Create),
        name_strategy().prop_map(Event::Select),
        prop::collection::vec("[X-Z]", 0..3).prop_map(Event::StageAdditions),
        prop::collection::vec("[X-Z]", 0..3).prop_map(Event::StageRemovals),
        "[x-z\n ]{0,6}".prop_map(Event::SetManualText),
        prop::sample::select(vec![
            Event::SaveChanges,
            Event::OpenDelete,
            Event::ConfirmDelete,
            Event::CancelDelete,
        ]),
        prop::sample::select(vec![PAGE, "/backtest"]).prop_map(|r| Event::Navigate(r.to_owned())),
        prop::sample::select(vec![TAB, "performance-tab"]).prop_map(|t| Event::SelectTab(t.to_owned())),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn cascade_invariants_hold(events in prop::collection::vec(event_strategy(), 0..40)) {
        let mut session = Session::open(
            SessionConfig::default(),
            MemoryStorage::new(),
            Box::new(StaticCatalog::default()),
        );
        let mut committed_while_active = 0usize;

        for event in events {
            let before = session.epoch();
            let report = session.dispatch(event);

            // One epoch per accepted intent.
            prop_assert_eq!(session.epoch(), before + report.accepted as u64);

            // Selection is a key, or None only for an empty store.
            match session.selection() {
                Some(name) => prop_assert!(session.store().contains(name)),
                None => prop_assert!(session.store().is_empty()),
            }

            // Handlers never run while the manager is hidden.
            if !session.is_active() {
                prop_assert_eq!(report.delivered, 0);
            }

            if report.accepted > 0 {
                prop_assert!(session.is_active());
                committed_while_active += 1;
            }
        }

        // Each dispatch commits at most one intent here, and every commit
        // happened with the gate open, so each one was written once.
        prop_assert_eq!(session.storage().write_count(), committed_while_active);
        prop_assert_eq!(session.last_persisted_epoch(), session.epoch());
    }
}
