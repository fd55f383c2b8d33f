#![allow(dead_code)]

use lager_core::domain::{BewegungNeu, MaterialNeu};
use lager_core::storage::Store;
use rust_decimal::Decimal;

pub fn store() -> Store {
    Store::open_in_memory().expect("in-memory store")
}

pub fn dec(raw: &str) -> Decimal {
    Decimal::from_str_exact(raw).expect("decimal literal")
}

pub fn material_neu(name: &str, menge: &str, ek_stueck: &str, vk_stueck: &str) -> MaterialNeu {
    let menge = dec(menge);
    let ek_stueck = dec(ek_stueck);
    MaterialNeu {
        name: name.into(),
        menge,
        bestand: menge,
        ek_stueck,
        ek_gesamt: menge * ek_stueck,
        vk_stueck: dec(vk_stueck),
        notiz: None,
    }
}

pub fn bewegung(menge: &str, preis: &str, datum: &str) -> BewegungNeu {
    BewegungNeu {
        menge: dec(menge),
        preis: dec(preis),
        datum: datum.into(),
        notiz: None,
    }
}
