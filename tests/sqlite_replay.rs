use serde_json::json;
use tempfile::TempDir;

use matchday::{
    core::store::{LeagueStore, StoreConfig},
    persist::{STORAGE_KEY, StateSink, sqlite::SqliteStateSink},
    types::{MATCHDAY_COUNT, Role},
};

#[test]
fn sqlite_reopen_restores_committed_state() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("league.db");

    let sink = SqliteStateSink::open(&db_path).expect("open sqlite");
    let mut store = LeagueStore::open(Box::new(sink), StoreConfig::default());
    let iria = store.add_player("Iria Sanz", &["DF", "MD"]).expect("add player");
    let lia = store.add_participant("Lia").expect("add participant");
    store.assign_slot(lia, Role::DF, 0, iria).expect("assign");
    store.set_captain(lia, Some(iria)).expect("captain");
    store.set_points(iria, 6).expect("points");
    store.select_matchday(9).expect("select");
    let expected = store.state();
    drop(store);

    let reopened = SqliteStateSink::open(&db_path).expect("reopen");
    assert!(reopened.last_written_ms(STORAGE_KEY).expect("ts").is_some());
    let store = LeagueStore::open(Box::new(reopened), StoreConfig::default());
    assert_eq!(*store.state(), *expected);
    assert_eq!(store.state().current_matchday_index, 9);

    let first = store.state().matchday(1).expect("matchday 1").clone();
    assert_eq!(first.participants[0].captain_id, Some(iria));
    assert_eq!(first.base_points(iria), 6);
}

#[test]
fn legacy_document_is_migrated_and_written_back() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("legacy.db");

    let legacy = json!({
        "players": [
            {"id": 1, "name": "Ana", "pos": "PT"},
            {"id": 2, "name": "Bea", "pos": "DL"}
        ],
        "nextId": 3,
        "participants": [
            {"id": 1, "name": "Lia", "formation": "1-1-2",
             "lineup": {"PT": [1], "DL": [2]}}
        ],
        "points": {"1": 3, "2": 5}
    });

    let mut sink = SqliteStateSink::open(&db_path).expect("open sqlite");
    sink.store(STORAGE_KEY, &legacy.to_string()).expect("seed legacy");
    drop(sink);

    let sink = SqliteStateSink::open(&db_path).expect("reopen");
    let store = LeagueStore::open(Box::new(sink), StoreConfig::default());
    let state = store.state();
    assert_eq!(state.matchdays.len(), MATCHDAY_COUNT);
    assert_eq!(state.next_player_id, 3);
    assert_eq!(state.next_participant_id, 2);
    let lia = &state.matchdays[0].participants[0];
    assert_eq!(lia.formation.to_string(), "1-1-1-2");
    assert_eq!(store.matchday_classification()[0].points, 8);
    drop(store);

    let check = SqliteStateSink::open(&db_path).expect("open for check");
    let raw = check.load(STORAGE_KEY).expect("load").expect("document present");
    let doc: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert!(doc.get("participants").is_none());
    assert_eq!(doc["matchdays"].as_array().map(Vec::len), Some(MATCHDAY_COUNT));
    assert_eq!(doc["players"][0]["roles"], json!(["GK"]));
}

#[test]
fn custom_storage_key_keeps_documents_apart() {
    let mut sink = SqliteStateSink::open_in_memory().expect("open memory");
    sink.store(STORAGE_KEY, "{\"currentMatchdayIndex\": 5}").expect("seed");
    assert_eq!(sink.load("other_league").expect("load"), None);
    sink.flush().expect("flush");

    let config = StoreConfig {
        storage_key: "other_league".to_string(),
        ..StoreConfig::default()
    };
    let store = LeagueStore::open(Box::new(sink), config);
    assert_eq!(store.state().current_matchday_index, 1);
}

#[test]
fn corrupt_document_falls_back_to_fresh_league() {
    let mut sink = SqliteStateSink::open_in_memory().expect("open memory");
    sink.store(STORAGE_KEY, "not json at all").expect("seed");
    let store = LeagueStore::open(Box::new(sink), StoreConfig::default());
    assert_eq!(store.state().players.len(), 14);
    assert_eq!(store.state().next_player_id, 15);
}
