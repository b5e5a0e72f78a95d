//! End-to-end session tests against real YAML files.
//!
//! These tests drive a [`Session`] through its public event API with a
//! [`YamlFileStorage`] in a temporary directory, and check what lands on
//! disk as well as what the session reports.

use std::fs;
use std::path::Path;

use foundry_session::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PAGE: &str = "/research-hub";
const TAB: &str = "universe-manager-tab";

fn config_for(path: &Path) -> SessionConfig {
    SessionConfig {
        storage_path: path.to_path_buf(),
        ..SessionConfig::default()
    }
}

fn open_file_session(path: &Path) -> Session<YamlFileStorage> {
    Session::open(
        config_for(path),
        YamlFileStorage::new(path),
        Box::new(StaticCatalog::default()),
    )
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn missing_file_seeds_default_universe() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("universes.yaml");

    let session = open_file_session(&path);
    assert_eq!(session.store().names().collect::<Vec<_>>(), vec!["Nifty 50"]);
    assert_eq!(session.epoch(), 0);
    // Loading alone never writes.
    assert!(!path.exists());
}

#[test]
fn malformed_files_fall_back_to_seed() {
    let dir = TempDir::new().unwrap();
    for (i, text) in ["- just\n- a list\n", "42\n", "Tech: [oops\n", ""]
        .into_iter()
        .enumerate()
    {
        let path = dir.path().join(format!("bad-{i}.yaml"));
        fs::write(&path, text).unwrap();

        let session = open_file_session(&path);
        assert_eq!(session.store(), &CollectionStore::seeded(), "document {text:?}");
        // The malformed document is left alone until the next mutation.
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }
}

#[test]
fn stored_lists_drop_duplicates_but_keep_order_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("universes.yaml");
    fs::write(&path, "Tech:\n- TCS\n- INFY\n- TCS\n").unwrap();

    let session = open_file_session(&path);
    assert_eq!(session.store().get("Tech"), Some(&owned(&["TCS", "INFY"])[..]));
}

#[test]
fn numeric_symbols_survive_load_mutate_and_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("universes.yaml");
    fs::write(&path, "Tech:\n- NSE:TCS-EQ\n- 500325\nBanks:\n- SBIN\n").unwrap();

    let mut session = open_file_session(&path);
    assert_eq!(session.store().names().collect::<Vec<_>>(), vec!["Banks", "Tech"]);

    session.dispatch(Event::Create("X".to_owned()));

    let on_disk = YamlFileStorage::new(&path).load().unwrap().unwrap();
    assert_eq!(on_disk.names().collect::<Vec<_>>(), vec!["Banks", "Tech", "X"]);
    assert_eq!(on_disk.get("Tech"), Some(&owned(&["NSE:TCS-EQ", "500325"])[..]));
    assert_eq!(on_disk.get("Banks"), Some(&owned(&["SBIN"])[..]));
}

#[test]
fn editing_one_universe_keeps_stored_order_of_others() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("universes.yaml");
    fs::write(&path, "Banks:\n- SBIN\nTech:\n- TCS\n- INFY\n").unwrap();

    let mut session = open_file_session(&path);
    assert_eq!(session.selection(), Some("Banks"));
    session.dispatch(Event::StageAdditions(owned(&["HDFC"])));
    session.dispatch(Event::SaveChanges);

    let on_disk = YamlFileStorage::new(&path).load().unwrap().unwrap();
    assert_eq!(on_disk.get("Banks"), Some(&owned(&["HDFC", "SBIN"])[..]));
    assert_eq!(on_disk.get("Tech"), Some(&owned(&["TCS", "INFY"])[..]));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.find("TCS").unwrap() < text.find("INFY").unwrap());
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[test]
fn create_edit_paste_save_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("universes.yaml");

    let mut session = open_file_session(&path);
    session.dispatch(Event::Create("Tech".to_owned()));
    session.dispatch(Event::Select("Tech".to_owned()));
    session.dispatch(Event::StageAdditions(owned(&["NSE:TCS-EQ", "NSE:INFY-EQ"])));
    session.dispatch(Event::SetManualText("nse:wipro-eq\n  ".to_owned()));
    let report = session.dispatch(Event::SaveChanges);

    let expected = owned(&["NSE:INFY-EQ", "NSE:TCS-EQ", "NSE:WIPRO-EQ"]);
    assert_eq!(session.store().get("Tech"), Some(&expected[..]));
    assert_eq!(report.persist, Some(PersistOutcome::Persisted { epoch: 2 }));
    assert_eq!(session.last_persisted_epoch(), 2);

    // Missing parent directories were created, and a new session sees the
    // same store.
    let reopened = open_file_session(&path);
    assert_eq!(reopened.store(), session.store());
    assert_eq!(reopened.store().get("Nifty 50"), Some(&[][..]));
}

#[test]
fn deleting_selected_universe_repairs_selection_and_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("universes.yaml");
    fs::write(&path, "A: []\nB: [X]\n").unwrap();

    let mut session = open_file_session(&path);
    assert_eq!(session.selection(), Some("A"));

    session.dispatch(Event::OpenDelete);
    session.dispatch(Event::ConfirmDelete);

    assert_eq!(session.selection(), Some("B"));
    let on_disk = YamlFileStorage::new(&path).load().unwrap().unwrap();
    assert!(!on_disk.contains("A"));
    assert_eq!(on_disk.get("B"), Some(&owned(&["X"])[..]));
}

#[test]
fn journal_tracks_every_accepted_change() {
    let dir = TempDir::new().unwrap();
    let mut session = open_file_session(&dir.path().join("u.yaml"));

    session.dispatch(Event::Create("Tech".to_owned()));
    session.dispatch(Event::Create("Tech".to_owned())); // duplicate, suppressed
    session.dispatch(Event::SaveChanges); // on "Nifty 50"
    session.dispatch(Event::OpenDelete);
    session.dispatch(Event::ConfirmDelete);

    let journal = session.journal();
    assert_eq!(journal.len(), 3);
    let kinds: Vec<ChangeKind> = journal.all_changes().iter().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![ChangeKind::Created, ChangeKind::Edited, ChangeKind::Deleted]
    );
    assert_eq!(journal.changes_for_universe("Nifty 50").count(), 2);
    assert_eq!(journal.changes_by_view(ViewId::DELETE_DIALOG).count(), 1);
    assert_eq!(journal.change_at_epoch(1).unwrap().universe, "Tech");
}

// ---------------------------------------------------------------------------
// Gating and persistence
// ---------------------------------------------------------------------------

#[test]
fn hidden_manager_neither_mutates_nor_persists() {
    let mut session = Session::open(
        SessionConfig::default(),
        MemoryStorage::new(),
        Box::new(StaticCatalog::default()),
    );

    session.dispatch(Event::Navigate("/backtest".to_owned()));
    for name in ["A", "B", "C"] {
        let report = session.dispatch(Event::Create(name.to_owned()));
        assert_eq!(report.delivered, 0);
    }
    session.dispatch(Event::Navigate(PAGE.to_owned()));
    session.dispatch(Event::Create("D".to_owned()));
    session.dispatch(Event::SelectTab("performance-tab".to_owned()));
    session.dispatch(Event::SaveChanges);
    session.dispatch(Event::SelectTab(TAB.to_owned()));

    assert_eq!(session.storage().write_count(), 1);
    assert_eq!(session.epoch(), 1);
    assert!(session.store().contains("D"));
    assert!(!session.store().contains("A"));
}

#[test]
fn failed_write_is_retried_by_next_mutation() {
    let mut session = Session::open(
        SessionConfig::default(),
        MemoryStorage::new(),
        Box::new(StaticCatalog::default()),
    );

    session.storage_mut().set_fail_writes(true);
    let report = session.dispatch(Event::Create("A".to_owned()));
    assert_eq!(report.persist, Some(PersistOutcome::Failed { epoch: 1 }));
    assert_eq!(session.status(), None);
    // The in-memory store stays authoritative.
    assert!(session.store().contains("A"));

    session.storage_mut().set_fail_writes(false);
    session.dispatch(Event::Create("B".to_owned()));
    let written = &session.storage().writes()[0];
    assert!(written.contains("A") && written.contains("B"));
    assert_eq!(session.last_persisted_epoch(), 2);
}

#[test]
fn custom_config_scopes_the_manager() {
    let config = SessionConfig::from_yaml_str(
        "page_route: /hub\nmanager_tab: universes\ndefault_universe: Sensex\n",
    )
    .unwrap();
    let mut session = Session::open(
        config,
        MemoryStorage::new(),
        Box::new(StaticCatalog::default()),
    );

    assert_eq!(session.navigation().route(), "/hub");
    assert_eq!(session.selection(), Some("Sensex"));

    session.dispatch(Event::Navigate(PAGE.to_owned()));
    assert!(!session.is_active());
    session.dispatch(Event::Navigate("/hub".to_owned()));
    assert!(session.is_active());
}

#[test]
fn snapshot_survives_json_and_verifies() {
    let mut session = Session::open(
        SessionConfig::default(),
        MemoryStorage::new(),
        Box::new(StaticCatalog::default()),
    );
    session.dispatch(Event::Create("Tech".to_owned()));

    let json = serde_json::to_string(session.snapshot()).unwrap();
    let back: StoreSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, session.snapshot());
    assert!(back.verify().is_ok());
}
