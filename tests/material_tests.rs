mod common;

use common::{bewegung, dec, material_neu, store};
use lager_core::domain::MaterialAenderung;
use lager_core::errors::LedgerError;
use lager_core::services::{KundeService, MaterialService};

#[test]
fn create_initializes_revenue_counters_and_profit() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Kies", "10", "3", "5")).unwrap();

    assert_eq!(material.bestand, dec("10"));
    assert_eq!(material.einnahmen_bar, dec("0"));
    assert_eq!(material.einnahmen_kombi, dec("0"));
    // 10 * 5 - 30
    assert_eq!(material.gewinn_theoretisch, dec("20"));
    assert_eq!(material.gewinn_aktuell, dec("-30"));

    let fetched = MaterialService::get(&store, material.id).unwrap();
    assert_eq!(fetched.bestand, dec("10"));
}

#[test]
fn bar_movement_decrements_stock_and_credits_cash_revenue() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Kies", "10", "3", "5")).unwrap();

    let updated =
        MaterialService::apply_bar_movement(&mut store, material.id, bewegung("3", "15", "2026-01-05"))
            .unwrap();

    assert_eq!(updated.bestand, dec("7"));
    assert_eq!(updated.einnahmen_bar, dec("15"));
    assert_eq!(updated.einnahmen_kombi, dec("0"));
    assert_eq!(updated.gewinn_aktuell, dec("-15"));

    let movements = MaterialService::list_bar_movements(&store, material.id).unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].menge, dec("3"));
    assert_eq!(movements[0].preis, dec("15"));
}

#[test]
fn insufficient_stock_rejects_without_partial_write() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Kies", "10", "3", "5")).unwrap();
    MaterialService::apply_bar_movement(&mut store, material.id, bewegung("3", "15", "2026-01-05"))
        .unwrap();

    let err =
        MaterialService::apply_bar_movement(&mut store, material.id, bewegung("8", "40", "2026-01-06"))
            .expect_err("movement beyond bestand must fail");
    assert!(
        matches!(err, LedgerError::InsufficientStock { bestand, menge, .. }
            if bestand == dec("7") && menge == dec("8")),
        "unexpected error: {err:?}"
    );

    let unchanged = MaterialService::get(&store, material.id).unwrap();
    assert_eq!(unchanged.bestand, dec("7"));
    assert_eq!(unchanged.einnahmen_bar, dec("15"));
    let movements = MaterialService::list_bar_movements(&store, material.id).unwrap();
    assert_eq!(movements.len(), 1, "failed movement must not persist");
}

#[test]
fn movement_may_drain_stock_to_zero() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Sand", "4", "2", "3")).unwrap();

    let updated =
        MaterialService::apply_bar_movement(&mut store, material.id, bewegung("4", "12", "2026-02-01"))
            .unwrap();
    assert_eq!(updated.bestand, dec("0"));
}

#[test]
fn kombi_movement_requires_existing_kunde() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Kies", "10", "3", "5")).unwrap();

    let err = MaterialService::apply_kombi_movement(
        &mut store,
        material.id,
        99,
        bewegung("2", "10", "2026-01-05"),
    )
    .expect_err("unknown kunde must fail");
    assert!(matches!(err, LedgerError::NotFound(_, 99)), "unexpected error: {err:?}");

    let unchanged = MaterialService::get(&store, material.id).unwrap();
    assert_eq!(unchanged.bestand, dec("10"));
    assert!(MaterialService::list_kombi_movements(&store, material.id)
        .unwrap()
        .is_empty());
}

#[test]
fn kombi_movement_credits_kombi_revenue() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Kies", "10", "3", "5")).unwrap();
    let kunde = KundeService::create(&mut store, "Huber", None).unwrap();

    let updated = MaterialService::apply_kombi_movement(
        &mut store,
        material.id,
        kunde.id,
        bewegung("2", "10", "2026-01-05"),
    )
    .unwrap();

    assert_eq!(updated.bestand, dec("8"));
    assert_eq!(updated.einnahmen_bar, dec("0"));
    assert_eq!(updated.einnahmen_kombi, dec("10"));

    let movements = MaterialService::list_kombi_movements(&store, material.id).unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kunde_id, kunde.id);
}

#[test]
fn update_merges_fields_and_refreshes_profit() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Kies", "10", "3", "5")).unwrap();

    let updated = MaterialService::update(
        &mut store,
        material.id,
        MaterialAenderung {
            vk_stueck: Some(dec("6")),
            notiz: Some("Preis angepasst".into()),
            ..MaterialAenderung::default()
        },
    )
    .unwrap();

    assert_eq!(updated.vk_stueck, dec("6"));
    // 10 * 6 - 30
    assert_eq!(updated.gewinn_theoretisch, dec("30"));
    assert_eq!(updated.name, "Kies", "unset fields keep stored values");
    assert_eq!(updated.notiz.as_deref(), Some("Preis angepasst"));
}

#[test]
fn delete_is_hard_and_get_reports_not_found() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Kies", "10", "3", "5")).unwrap();

    MaterialService::delete(&mut store, material.id).unwrap();
    let err = MaterialService::get(&store, material.id).expect_err("deleted material");
    assert!(matches!(err, LedgerError::NotFound(_, _)));

    let err = MaterialService::delete(&mut store, material.id).expect_err("double delete");
    assert!(matches!(err, LedgerError::NotFound(_, _)));
}
