mod common;

use common::{dec, material_neu};
use lager_core::domain::PostenNoMatNeu;
use lager_core::services::{KundeService, MaterialService, PostenNoMatService};
use lager_core::storage::Store;
use tempfile::TempDir;

#[test]
fn records_survive_reopen_of_the_database_file() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("lager.sqlite3");

    let material_id = {
        let mut store = Store::open(&path).expect("open store");
        let material =
            MaterialService::create(&mut store, material_neu("Kies", "10", "3", "5")).unwrap();
        material.id
    };

    // Second open runs the idempotent schema bootstrap again.
    let store = Store::open(&path).expect("reopen store");
    let material = MaterialService::get(&store, material_id).unwrap();
    assert_eq!(material.name, "Kies");
    assert_eq!(material.bestand, dec("10"));
}

#[test]
fn open_creates_missing_parent_directories() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("nested").join("data").join("lager.sqlite3");
    let store = Store::open(&path).expect("open with fresh parents");
    assert!(MaterialService::list(&store).unwrap().is_empty());
}

#[test]
fn posting_serializes_with_lowercase_status_and_decimal_strings() {
    let mut store = Store::open_in_memory().unwrap();
    let kunde = KundeService::create(&mut store, "Huber", None).unwrap();
    let posten = PostenNoMatService::create(
        &mut store,
        PostenNoMatNeu {
            kunde_id: kunde.id,
            beschreibung: "Fracht".into(),
            betrag: dec("25.50"),
            bezahlt: None,
            notiz: None,
        },
    )
    .unwrap();

    let json = serde_json::to_value(&posten).expect("serialize posting");
    assert_eq!(json["status"], "offen");
    assert_eq!(json["betrag"], "25.50");
    assert_eq!(json["offen"], "25.50");
    assert!(json.get("notiz").is_none(), "unset note is omitted");
}
