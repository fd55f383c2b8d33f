mod common;

use common::{bewegung, dec, material_neu, store};
use lager_core::domain::BewegungsArt;
use lager_core::services::{HistorieService, KundeService, MaterialService};

#[test]
fn historie_merges_channels_and_orders_days_newest_first() {
    let mut store = store();
    let material = MaterialService::create(&mut store, material_neu("Kies", "20", "2", "5")).unwrap();
    let kunde = KundeService::create(&mut store, "Huber", None).unwrap();

    // Created out of date order on purpose; ids grow per table.
    MaterialService::apply_bar_movement(&mut store, material.id, bewegung("2", "10", "2026-01-03"))
        .unwrap();
    MaterialService::apply_bar_movement(&mut store, material.id, bewegung("1", "5", "2026-01-05"))
        .unwrap();
    MaterialService::apply_kombi_movement(
        &mut store,
        material.id,
        kunde.id,
        bewegung("3", "15", "2026-01-05"),
    )
    .unwrap();

    let tage = HistorieService::material_historie(&store, material.id).unwrap();
    assert_eq!(tage.len(), 2);

    assert_eq!(tage[0].datum, "2026-01-05");
    assert_eq!(tage[0].eintraege.len(), 2);
    // Within the day, higher id wins; the bar row was created second.
    let neueste = tage[0].neueste().unwrap();
    assert_eq!(neueste.art, BewegungsArt::Bar);
    assert_eq!(neueste.menge, dec("1"));
    assert_eq!(tage[0].eintraege[1].art, BewegungsArt::Kombi);
    assert_eq!(tage[0].eintraege[1].kunde_id, Some(kunde.id));

    assert_eq!(tage[1].datum, "2026-01-03");
    assert_eq!(tage[1].eintraege.len(), 1);
}

#[test]
fn historie_of_unknown_material_is_empty() {
    let store = store();
    let tage = HistorieService::material_historie(&store, 42).unwrap();
    assert!(tage.is_empty());
}
