mod common;

use common::{dec, store};
use lager_core::domain::{SchuldAenderung, SchuldNeu, Zahlungsstatus};
use lager_core::errors::LedgerError;
use lager_core::services::{GlaeubigerService, SchuldnerService};

fn schuld_neu(name: &str, betrag: &str) -> SchuldNeu {
    SchuldNeu {
        name: name.into(),
        betrag: dec(betrag),
        bezahlt: None,
        faelligkeit: None,
        notiz: None,
    }
}

#[test]
fn create_carries_due_date_and_derived_balance() {
    let mut store = store();
    let schuld = GlaeubigerService::create(
        &mut store,
        SchuldNeu {
            faelligkeit: Some("2026-09-01".into()),
            ..schuld_neu("Bank", "500")
        },
    )
    .unwrap();

    assert_eq!(schuld.offen, dec("500"));
    assert_eq!(schuld.status, Zahlungsstatus::Offen);
    assert_eq!(schuld.faelligkeit.as_deref(), Some("2026-09-01"));
}

#[test]
fn partial_payment_updates_balance() {
    let mut store = store();
    let schuld = SchuldnerService::create(&mut store, schuld_neu("Maier", "120")).unwrap();

    let schuld = SchuldnerService::apply_payment(&mut store, schuld.id, dec("45.50")).unwrap();
    assert_eq!(schuld.bezahlt, dec("45.50"));
    assert_eq!(schuld.offen, dec("74.50"));
    assert_eq!(schuld.status, Zahlungsstatus::Offen);

    let schuld = SchuldnerService::apply_payment(&mut store, schuld.id, dec("74.50")).unwrap();
    assert_eq!(schuld.offen, dec("0"));
    assert_eq!(schuld.status, Zahlungsstatus::Bezahlt);
}

#[test]
fn overpayment_drives_offen_negative_without_clamping() {
    let mut store = store();
    let schuld = GlaeubigerService::create(&mut store, schuld_neu("Bank", "100")).unwrap();

    let schuld = GlaeubigerService::apply_payment(&mut store, schuld.id, dec("130")).unwrap();
    assert_eq!(schuld.bezahlt, dec("130"));
    assert_eq!(schuld.offen, dec("-30"));
    assert_eq!(schuld.status, Zahlungsstatus::Bezahlt);
}

#[test]
fn update_recomputes_balance_when_betrag_changes() {
    let mut store = store();
    let schuld = GlaeubigerService::create(&mut store, schuld_neu("Bank", "100")).unwrap();
    GlaeubigerService::apply_payment(&mut store, schuld.id, dec("80")).unwrap();

    let schuld = GlaeubigerService::update(
        &mut store,
        schuld.id,
        SchuldAenderung {
            betrag: Some(dec("80")),
            ..SchuldAenderung::default()
        },
    )
    .unwrap();
    assert_eq!(schuld.offen, dec("0"));
    assert_eq!(schuld.status, Zahlungsstatus::Bezahlt);

    // A rename alone leaves the balance triple as stored.
    let schuld = GlaeubigerService::update(
        &mut store,
        schuld.id,
        SchuldAenderung {
            name: Some("Hausbank".into()),
            ..SchuldAenderung::default()
        },
    )
    .unwrap();
    assert_eq!(schuld.name, "Hausbank");
    assert_eq!(schuld.bezahlt, dec("80"));
    assert_eq!(schuld.offen, dec("0"));
}

#[test]
fn creditor_and_debtor_tables_are_independent() {
    let mut store = store();
    GlaeubigerService::create(&mut store, schuld_neu("Bank", "100")).unwrap();
    SchuldnerService::create(&mut store, schuld_neu("Maier", "60")).unwrap();

    assert_eq!(GlaeubigerService::list(&store).unwrap().len(), 1);
    assert_eq!(SchuldnerService::list(&store).unwrap().len(), 1);
    assert_eq!(GlaeubigerService::list(&store).unwrap()[0].name, "Bank");
    assert_eq!(SchuldnerService::list(&store).unwrap()[0].name, "Maier");
}

#[test]
fn delete_reports_not_found_for_unknown_id() {
    let mut store = store();
    let err = SchuldnerService::delete(&mut store, 7).expect_err("nothing to delete");
    assert!(matches!(err, LedgerError::NotFound(_, 7)));

    let schuld = SchuldnerService::create(&mut store, schuld_neu("Maier", "60")).unwrap();
    SchuldnerService::delete(&mut store, schuld.id).unwrap();
    let err = SchuldnerService::get(&store, schuld.id).expect_err("deleted record");
    assert!(matches!(err, LedgerError::NotFound(_, _)));
}
