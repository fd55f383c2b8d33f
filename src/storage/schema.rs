//! In-code schema bootstrap. Idempotent; runs on every open.
//!
//! Monetary and quantity columns are TEXT-encoded decimals. Reference
//! columns are plain integers without FK constraints: deleting a Material
//! or Kunde with dependent rows is a caller responsibility.

use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS material (
    id                  INTEGER PRIMARY KEY,
    name                TEXT NOT NULL,
    menge               TEXT NOT NULL,
    bestand             TEXT NOT NULL,
    ek_stueck           TEXT NOT NULL,
    ek_gesamt           TEXT NOT NULL,
    vk_stueck           TEXT NOT NULL,
    einnahmen_bar       TEXT NOT NULL,
    einnahmen_kombi     TEXT NOT NULL,
    gewinn_aktuell      TEXT NOT NULL,
    gewinn_theoretisch  TEXT NOT NULL,
    notiz               TEXT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS material_bewegungen_bar (
    id          INTEGER PRIMARY KEY,
    material_id INTEGER NOT NULL,
    menge       TEXT NOT NULL,
    preis       TEXT NOT NULL,
    datum       TEXT NOT NULL,
    notiz       TEXT,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_bewegungen_bar_material
    ON material_bewegungen_bar (material_id);

CREATE TABLE IF NOT EXISTS material_bewegungen_kombi (
    id          INTEGER PRIMARY KEY,
    material_id INTEGER NOT NULL,
    kunde_id    INTEGER NOT NULL,
    menge       TEXT NOT NULL,
    preis       TEXT NOT NULL,
    datum       TEXT NOT NULL,
    notiz       TEXT,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_bewegungen_kombi_material
    ON material_bewegungen_kombi (material_id);

CREATE TABLE IF NOT EXISTS kunden (
    id         INTEGER PRIMARY KEY,
    name       TEXT NOT NULL,
    notiz      TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS kunden_posten_mat (
    id          INTEGER PRIMARY KEY,
    kunde_id    INTEGER NOT NULL,
    material_id INTEGER NOT NULL,
    menge       TEXT NOT NULL,
    preis       TEXT NOT NULL,
    bezahlt     TEXT NOT NULL,
    offen       TEXT NOT NULL,
    status      TEXT NOT NULL,
    notiz       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_posten_mat_kunde
    ON kunden_posten_mat (kunde_id);

CREATE TABLE IF NOT EXISTS kunden_posten_nomat (
    id           INTEGER PRIMARY KEY,
    kunde_id     INTEGER NOT NULL,
    beschreibung TEXT NOT NULL,
    betrag       TEXT NOT NULL,
    bezahlt      TEXT NOT NULL,
    offen        TEXT NOT NULL,
    status       TEXT NOT NULL,
    notiz        TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_posten_nomat_kunde_status
    ON kunden_posten_nomat (kunde_id, status);

CREATE TABLE IF NOT EXISTS glaeubiger (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    betrag      TEXT NOT NULL,
    bezahlt     TEXT NOT NULL,
    offen       TEXT NOT NULL,
    status      TEXT NOT NULL,
    faelligkeit TEXT,
    notiz       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schuldner (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    betrag      TEXT NOT NULL,
    bezahlt     TEXT NOT NULL,
    offen       TEXT NOT NULL,
    status      TEXT NOT NULL,
    faelligkeit TEXT,
    notiz       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
";

pub(crate) fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
