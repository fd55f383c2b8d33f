//! Material stock ledger: CRUD plus the stock-guarded movement operations.
//!
//! A movement is an insert into the append-only movement table paired with
//! the counter update on the material row; both run inside one
//! transaction.

use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::domain::material::{gewinn_aktuell, gewinn_theoretisch};
use crate::domain::{BewegungBar, BewegungKombi, BewegungNeu, Material, MaterialAenderung, MaterialNeu};
use crate::errors::{Entity, LedgerError, LedgerResult};
use crate::services::kunde_service::fetch_kunde;
use crate::storage::{decimal_column, Store};
use crate::utils::now_iso;

const MATERIAL_COLUMNS: &str = "id, name, menge, bestand, ek_stueck, ek_gesamt, vk_stueck, \
     einnahmen_bar, einnahmen_kombi, gewinn_aktuell, gewinn_theoretisch, notiz, created_at, updated_at";

enum Kanal {
    Bar,
    Kombi { kunde_id: i64 },
}

/// Stock ledger over the material table and its movement tables.
pub struct MaterialService;

impl MaterialService {
    /// Inserts a new material. `bestand` is taken from the input as-is;
    /// callers pass `bestand = menge` for a fresh acquisition.
    pub fn create(store: &mut Store, neu: MaterialNeu) -> LedgerResult<Material> {
        let now = now_iso();
        let gewinn_theo = gewinn_theoretisch(neu.menge, neu.vk_stueck, neu.ek_gesamt);
        let gewinn_akt = gewinn_aktuell(Decimal::ZERO, Decimal::ZERO, neu.ek_gesamt);
        store.conn.execute(
            "INSERT INTO material (name, menge, bestand, ek_stueck, ek_gesamt, vk_stueck, \
             einnahmen_bar, einnahmen_kombi, gewinn_aktuell, gewinn_theoretisch, notiz, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                neu.name,
                neu.menge.to_string(),
                neu.bestand.to_string(),
                neu.ek_stueck.to_string(),
                neu.ek_gesamt.to_string(),
                neu.vk_stueck.to_string(),
                Decimal::ZERO.to_string(),
                Decimal::ZERO.to_string(),
                gewinn_akt.to_string(),
                gewinn_theo.to_string(),
                neu.notiz,
                now,
                now
            ],
        )?;
        let id = store.conn.last_insert_rowid();
        tracing::debug!(material_id = id, "material created");
        Ok(Material {
            id,
            name: neu.name,
            menge: neu.menge,
            bestand: neu.bestand,
            ek_stueck: neu.ek_stueck,
            ek_gesamt: neu.ek_gesamt,
            vk_stueck: neu.vk_stueck,
            einnahmen_bar: Decimal::ZERO,
            einnahmen_kombi: Decimal::ZERO,
            gewinn_aktuell: gewinn_akt,
            gewinn_theoretisch: gewinn_theo,
            notiz: neu.notiz,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get(store: &Store, id: i64) -> LedgerResult<Material> {
        fetch_material(&store.conn, id)
    }

    pub fn list(store: &Store) -> LedgerResult<Vec<Material>> {
        let mut stmt = store
            .conn
            .prepare(&format!("SELECT {MATERIAL_COLUMNS} FROM material ORDER BY id"))?;
        let rows = stmt.query_map([], map_material)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Merges the supplied changes and refreshes the derived profit figures.
    /// Dependent postings are left untouched.
    pub fn update(
        store: &mut Store,
        id: i64,
        aenderung: MaterialAenderung,
    ) -> LedgerResult<Material> {
        let mut material = fetch_material(&store.conn, id)?;
        if let Some(name) = aenderung.name {
            material.name = name;
        }
        if let Some(menge) = aenderung.menge {
            material.menge = menge;
        }
        if let Some(bestand) = aenderung.bestand {
            material.bestand = bestand;
        }
        if let Some(ek_stueck) = aenderung.ek_stueck {
            material.ek_stueck = ek_stueck;
        }
        if let Some(ek_gesamt) = aenderung.ek_gesamt {
            material.ek_gesamt = ek_gesamt;
        }
        if let Some(vk_stueck) = aenderung.vk_stueck {
            material.vk_stueck = vk_stueck;
        }
        if let Some(einnahmen_bar) = aenderung.einnahmen_bar {
            material.einnahmen_bar = einnahmen_bar;
        }
        if let Some(einnahmen_kombi) = aenderung.einnahmen_kombi {
            material.einnahmen_kombi = einnahmen_kombi;
        }
        if let Some(notiz) = aenderung.notiz {
            material.notiz = Some(notiz);
        }
        material.gewinn_theoretisch =
            gewinn_theoretisch(material.menge, material.vk_stueck, material.ek_gesamt);
        material.gewinn_aktuell = gewinn_aktuell(
            material.einnahmen_bar,
            material.einnahmen_kombi,
            material.ek_gesamt,
        );
        material.updated_at = now_iso();
        store.conn.execute(
            "UPDATE material SET name = ?1, menge = ?2, bestand = ?3, ek_stueck = ?4, \
             ek_gesamt = ?5, vk_stueck = ?6, einnahmen_bar = ?7, einnahmen_kombi = ?8, \
             gewinn_aktuell = ?9, gewinn_theoretisch = ?10, notiz = ?11, updated_at = ?12 \
             WHERE id = ?13",
            params![
                material.name,
                material.menge.to_string(),
                material.bestand.to_string(),
                material.ek_stueck.to_string(),
                material.ek_gesamt.to_string(),
                material.vk_stueck.to_string(),
                material.einnahmen_bar.to_string(),
                material.einnahmen_kombi.to_string(),
                material.gewinn_aktuell.to_string(),
                material.gewinn_theoretisch.to_string(),
                material.notiz,
                material.updated_at,
                id
            ],
        )?;
        Ok(material)
    }

    /// Hard delete. Movements and postings referencing the material remain.
    pub fn delete(store: &mut Store, id: i64) -> LedgerResult<()> {
        let affected = store
            .conn
            .execute("DELETE FROM material WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(LedgerError::NotFound(Entity::Material, id));
        }
        tracing::debug!(material_id = id, "material deleted");
        Ok(())
    }

    /// Records a cash sale: movement row plus `bestand -= menge` and
    /// `einnahmen_bar += preis` on the material, atomically. `preis` is the
    /// movement total.
    pub fn apply_bar_movement(
        store: &mut Store,
        material_id: i64,
        bewegung: BewegungNeu,
    ) -> LedgerResult<Material> {
        let tx = store.conn.transaction()?;
        let material = record_movement(&tx, material_id, Kanal::Bar, &bewegung)?;
        tx.commit()?;
        Ok(material)
    }

    /// Records an invoiced sale against a customer; same stock guard and
    /// atomicity as the cash path, crediting `einnahmen_kombi` instead.
    pub fn apply_kombi_movement(
        store: &mut Store,
        material_id: i64,
        kunde_id: i64,
        bewegung: BewegungNeu,
    ) -> LedgerResult<Material> {
        let tx = store.conn.transaction()?;
        let material = record_movement(&tx, material_id, Kanal::Kombi { kunde_id }, &bewegung)?;
        tx.commit()?;
        Ok(material)
    }

    /// Cash movements of a material, newest id first.
    pub fn list_bar_movements(store: &Store, material_id: i64) -> LedgerResult<Vec<BewegungBar>> {
        let mut stmt = store.conn.prepare(
            "SELECT id, material_id, menge, preis, datum, notiz, created_at \
             FROM material_bewegungen_bar WHERE material_id = ?1 ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![material_id], map_bar)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Invoiced movements of a material, newest id first.
    pub fn list_kombi_movements(
        store: &Store,
        material_id: i64,
    ) -> LedgerResult<Vec<BewegungKombi>> {
        let mut stmt = store.conn.prepare(
            "SELECT id, material_id, kunde_id, menge, preis, datum, notiz, created_at \
             FROM material_bewegungen_kombi WHERE material_id = ?1 ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![material_id], map_kombi)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn record_movement(
    conn: &Connection,
    material_id: i64,
    kanal: Kanal,
    bewegung: &BewegungNeu,
) -> LedgerResult<Material> {
    let mut material = fetch_material(conn, material_id)?;
    let rest = material.bestand - bewegung.menge;
    if rest < Decimal::ZERO {
        return Err(LedgerError::InsufficientStock {
            material_id,
            bestand: material.bestand,
            menge: bewegung.menge,
        });
    }
    let now = now_iso();
    match kanal {
        Kanal::Bar => {
            conn.execute(
                "INSERT INTO material_bewegungen_bar (material_id, menge, preis, datum, notiz, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    material_id,
                    bewegung.menge.to_string(),
                    bewegung.preis.to_string(),
                    bewegung.datum,
                    bewegung.notiz,
                    now
                ],
            )?;
            material.einnahmen_bar += bewegung.preis;
        }
        Kanal::Kombi { kunde_id } => {
            fetch_kunde(conn, kunde_id)?;
            conn.execute(
                "INSERT INTO material_bewegungen_kombi (material_id, kunde_id, menge, preis, datum, notiz, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    material_id,
                    kunde_id,
                    bewegung.menge.to_string(),
                    bewegung.preis.to_string(),
                    bewegung.datum,
                    bewegung.notiz,
                    now
                ],
            )?;
            material.einnahmen_kombi += bewegung.preis;
        }
    }
    material.bestand = rest;
    material.gewinn_aktuell = gewinn_aktuell(
        material.einnahmen_bar,
        material.einnahmen_kombi,
        material.ek_gesamt,
    );
    material.updated_at = now;
    conn.execute(
        "UPDATE material SET bestand = ?1, einnahmen_bar = ?2, einnahmen_kombi = ?3, \
         gewinn_aktuell = ?4, updated_at = ?5 WHERE id = ?6",
        params![
            material.bestand.to_string(),
            material.einnahmen_bar.to_string(),
            material.einnahmen_kombi.to_string(),
            material.gewinn_aktuell.to_string(),
            material.updated_at,
            material_id
        ],
    )?;
    tracing::debug!(
        material_id,
        menge = %bewegung.menge,
        preis = %bewegung.preis,
        bestand = %material.bestand,
        "movement recorded"
    );
    Ok(material)
}

pub(crate) fn fetch_material(conn: &Connection, id: i64) -> LedgerResult<Material> {
    conn.query_row(
        &format!("SELECT {MATERIAL_COLUMNS} FROM material WHERE id = ?1"),
        params![id],
        map_material,
    )
    .optional()?
    .ok_or(LedgerError::NotFound(Entity::Material, id))
}

/// Name lookup used for the overflow note; tolerates a deleted material.
pub(crate) fn material_name(conn: &Connection, id: i64) -> LedgerResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT name FROM material WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?)
}

fn map_material(row: &Row<'_>) -> rusqlite::Result<Material> {
    Ok(Material {
        id: row.get(0)?,
        name: row.get(1)?,
        menge: decimal_column(row, 2)?,
        bestand: decimal_column(row, 3)?,
        ek_stueck: decimal_column(row, 4)?,
        ek_gesamt: decimal_column(row, 5)?,
        vk_stueck: decimal_column(row, 6)?,
        einnahmen_bar: decimal_column(row, 7)?,
        einnahmen_kombi: decimal_column(row, 8)?,
        gewinn_aktuell: decimal_column(row, 9)?,
        gewinn_theoretisch: decimal_column(row, 10)?,
        notiz: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn map_bar(row: &Row<'_>) -> rusqlite::Result<BewegungBar> {
    Ok(BewegungBar {
        id: row.get(0)?,
        material_id: row.get(1)?,
        menge: decimal_column(row, 2)?,
        preis: decimal_column(row, 3)?,
        datum: row.get(4)?,
        notiz: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_kombi(row: &Row<'_>) -> rusqlite::Result<BewegungKombi> {
    Ok(BewegungKombi {
        id: row.get(0)?,
        material_id: row.get(1)?,
        kunde_id: row.get(2)?,
        menge: decimal_column(row, 3)?,
        preis: decimal_column(row, 4)?,
        datum: row.get(5)?,
        notiz: row.get(6)?,
        created_at: row.get(7)?,
    })
}
