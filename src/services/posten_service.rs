//! Posting payment ledger for material-backed and freeform postings.
//!
//! Both kinds share one payment protocol. A payment that exceeds the
//! posting's balance caps the posting at full payment and hands the
//! overflow to the same customer's most recently created still-open
//! freeform posting, selected strictly by highest id. Single hop: a
//! second-order overflow is not passed on, and without a target the
//! overflow is absorbed. Cap, redistribution, and note run in one
//! transaction.

use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::domain::saldo::{outstanding, status_for, Zahlungsstatus};
use crate::domain::{
    PostenMat, PostenMatAenderung, PostenMatNeu, PostenNoMat, PostenNoMatAenderung, PostenNoMatNeu,
};
use crate::errors::{Entity, LedgerError, LedgerResult};
use crate::services::kunde_service::fetch_kunde;
use crate::services::material_service::{fetch_material, material_name};
use crate::storage::{decimal_column, status_column, Store};
use crate::utils::now_iso;

const POSTEN_MAT_COLUMNS: &str =
    "id, kunde_id, material_id, menge, preis, bezahlt, offen, status, notiz, created_at, updated_at";
const POSTEN_NOMAT_COLUMNS: &str =
    "id, kunde_id, beschreibung, betrag, bezahlt, offen, status, notiz, created_at, updated_at";

/// Ledger over material-backed postings (`betrag = menge * preis`).
pub struct PostenMatService;

impl PostenMatService {
    /// Creates a posting; customer and material must exist. The balance
    /// triple is derived from the input.
    pub fn create(store: &mut Store, neu: PostenMatNeu) -> LedgerResult<PostenMat> {
        fetch_kunde(&store.conn, neu.kunde_id)?;
        fetch_material(&store.conn, neu.material_id)?;
        let bezahlt = neu.bezahlt.unwrap_or(Decimal::ZERO);
        let betrag = neu.menge * neu.preis;
        let offen = outstanding(betrag, bezahlt);
        let status = status_for(bezahlt, betrag);
        let now = now_iso();
        store.conn.execute(
            "INSERT INTO kunden_posten_mat (kunde_id, material_id, menge, preis, bezahlt, offen, \
             status, notiz, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                neu.kunde_id,
                neu.material_id,
                neu.menge.to_string(),
                neu.preis.to_string(),
                bezahlt.to_string(),
                offen.to_string(),
                status.as_str(),
                neu.notiz,
                now,
                now
            ],
        )?;
        let id = store.conn.last_insert_rowid();
        tracing::debug!(posten_id = id, kunde_id = neu.kunde_id, "posten_mat created");
        Ok(PostenMat {
            id,
            kunde_id: neu.kunde_id,
            material_id: neu.material_id,
            menge: neu.menge,
            preis: neu.preis,
            bezahlt,
            offen,
            status,
            notiz: neu.notiz,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get(store: &Store, id: i64) -> LedgerResult<PostenMat> {
        fetch_posten_mat(&store.conn, id)
    }

    pub fn list_for_kunde(store: &Store, kunde_id: i64) -> LedgerResult<Vec<PostenMat>> {
        let mut stmt = store.conn.prepare(&format!(
            "SELECT {POSTEN_MAT_COLUMNS} FROM kunden_posten_mat WHERE kunde_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![kunde_id], map_posten_mat)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Merges the supplied changes; any change to `menge`, `preis`, or
    /// `bezahlt` recomputes `offen` and `status` from the merged field set.
    pub fn update(
        store: &mut Store,
        id: i64,
        aenderung: PostenMatAenderung,
    ) -> LedgerResult<PostenMat> {
        let mut posten = fetch_posten_mat(&store.conn, id)?;
        let recompute =
            aenderung.menge.is_some() || aenderung.preis.is_some() || aenderung.bezahlt.is_some();
        if let Some(menge) = aenderung.menge {
            posten.menge = menge;
        }
        if let Some(preis) = aenderung.preis {
            posten.preis = preis;
        }
        if let Some(bezahlt) = aenderung.bezahlt {
            posten.bezahlt = bezahlt;
        }
        if let Some(notiz) = aenderung.notiz {
            posten.notiz = Some(notiz);
        }
        if recompute {
            let betrag = posten.betrag();
            posten.offen = outstanding(betrag, posten.bezahlt);
            posten.status = status_for(posten.bezahlt, betrag);
        }
        posten.updated_at = now_iso();
        store.conn.execute(
            "UPDATE kunden_posten_mat SET menge = ?1, preis = ?2, bezahlt = ?3, offen = ?4, \
             status = ?5, notiz = ?6, updated_at = ?7 WHERE id = ?8",
            params![
                posten.menge.to_string(),
                posten.preis.to_string(),
                posten.bezahlt.to_string(),
                posten.offen.to_string(),
                posten.status.as_str(),
                posten.notiz,
                posten.updated_at,
                id
            ],
        )?;
        Ok(posten)
    }

    /// Hard delete; a redistribution this posting sent or received earlier
    /// is not unwound.
    pub fn delete(store: &mut Store, id: i64) -> LedgerResult<()> {
        let affected = store
            .conn
            .execute("DELETE FROM kunden_posten_mat WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(LedgerError::NotFound(Entity::PostenMat, id));
        }
        Ok(())
    }

    /// Applies a payment, redistributing any overflow (see module docs).
    /// Returns the updated source posting.
    pub fn apply_payment(store: &mut Store, id: i64, amount: Decimal) -> LedgerResult<PostenMat> {
        let tx = store.conn.transaction()?;
        let mut posten = fetch_posten_mat(&tx, id)?;
        let betrag = posten.betrag();
        let kandidat = posten.bezahlt + amount;
        posten.updated_at = now_iso();
        if kandidat <= betrag {
            posten.bezahlt = kandidat;
            posten.offen = outstanding(betrag, kandidat);
            posten.status = status_for(kandidat, betrag);
            write_mat_balance(&tx, &posten)?;
        } else {
            let overflow = kandidat - betrag;
            posten.bezahlt = betrag;
            posten.offen = Decimal::ZERO;
            posten.status = Zahlungsstatus::Bezahlt;
            write_mat_balance(&tx, &posten)?;
            let quelle = material_name(&tx, posten.material_id)?
                .unwrap_or_else(|| format!("Posten {}", posten.id));
            redistribute_overflow(&tx, posten.kunde_id, &quelle, overflow)?;
        }
        tx.commit()?;
        tracing::debug!(posten_id = id, amount = %amount, status = posten.status.as_str(), "payment applied");
        Ok(posten)
    }
}

/// Ledger over freeform postings (`betrag` stored directly).
pub struct PostenNoMatService;

impl PostenNoMatService {
    /// Creates a freeform posting; the customer must exist.
    pub fn create(store: &mut Store, neu: PostenNoMatNeu) -> LedgerResult<PostenNoMat> {
        fetch_kunde(&store.conn, neu.kunde_id)?;
        let bezahlt = neu.bezahlt.unwrap_or(Decimal::ZERO);
        let offen = outstanding(neu.betrag, bezahlt);
        let status = status_for(bezahlt, neu.betrag);
        let now = now_iso();
        store.conn.execute(
            "INSERT INTO kunden_posten_nomat (kunde_id, beschreibung, betrag, bezahlt, offen, \
             status, notiz, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                neu.kunde_id,
                neu.beschreibung,
                neu.betrag.to_string(),
                bezahlt.to_string(),
                offen.to_string(),
                status.as_str(),
                neu.notiz,
                now,
                now
            ],
        )?;
        let id = store.conn.last_insert_rowid();
        tracing::debug!(posten_id = id, kunde_id = neu.kunde_id, "posten_nomat created");
        Ok(PostenNoMat {
            id,
            kunde_id: neu.kunde_id,
            beschreibung: neu.beschreibung,
            betrag: neu.betrag,
            bezahlt,
            offen,
            status,
            notiz: neu.notiz,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get(store: &Store, id: i64) -> LedgerResult<PostenNoMat> {
        fetch_posten_nomat(&store.conn, id)
    }

    pub fn list_for_kunde(store: &Store, kunde_id: i64) -> LedgerResult<Vec<PostenNoMat>> {
        let mut stmt = store.conn.prepare(&format!(
            "SELECT {POSTEN_NOMAT_COLUMNS} FROM kunden_posten_nomat WHERE kunde_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![kunde_id], map_posten_nomat)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Merges the supplied changes; any change to `betrag` or `bezahlt`
    /// recomputes `offen` and `status` from the merged field set.
    pub fn update(
        store: &mut Store,
        id: i64,
        aenderung: PostenNoMatAenderung,
    ) -> LedgerResult<PostenNoMat> {
        let mut posten = fetch_posten_nomat(&store.conn, id)?;
        let recompute = aenderung.betrag.is_some() || aenderung.bezahlt.is_some();
        if let Some(beschreibung) = aenderung.beschreibung {
            posten.beschreibung = beschreibung;
        }
        if let Some(betrag) = aenderung.betrag {
            posten.betrag = betrag;
        }
        if let Some(bezahlt) = aenderung.bezahlt {
            posten.bezahlt = bezahlt;
        }
        if let Some(notiz) = aenderung.notiz {
            posten.notiz = Some(notiz);
        }
        if recompute {
            posten.offen = outstanding(posten.betrag, posten.bezahlt);
            posten.status = status_for(posten.bezahlt, posten.betrag);
        }
        posten.updated_at = now_iso();
        store.conn.execute(
            "UPDATE kunden_posten_nomat SET beschreibung = ?1, betrag = ?2, bezahlt = ?3, \
             offen = ?4, status = ?5, notiz = ?6, updated_at = ?7 WHERE id = ?8",
            params![
                posten.beschreibung,
                posten.betrag.to_string(),
                posten.bezahlt.to_string(),
                posten.offen.to_string(),
                posten.status.as_str(),
                posten.notiz,
                posten.updated_at,
                id
            ],
        )?;
        Ok(posten)
    }

    /// Hard delete; a redistribution this posting sent or received earlier
    /// is not unwound.
    pub fn delete(store: &mut Store, id: i64) -> LedgerResult<()> {
        let affected = store
            .conn
            .execute("DELETE FROM kunden_posten_nomat WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(LedgerError::NotFound(Entity::PostenNoMat, id));
        }
        Ok(())
    }

    /// Applies a payment with the same protocol as the material-backed
    /// path. The capped source flips to `bezahlt` before the target query
    /// runs, so it can never redistribute onto itself.
    pub fn apply_payment(store: &mut Store, id: i64, amount: Decimal) -> LedgerResult<PostenNoMat> {
        let tx = store.conn.transaction()?;
        let mut posten = fetch_posten_nomat(&tx, id)?;
        let kandidat = posten.bezahlt + amount;
        posten.updated_at = now_iso();
        if kandidat <= posten.betrag {
            posten.bezahlt = kandidat;
            posten.offen = outstanding(posten.betrag, kandidat);
            posten.status = status_for(kandidat, posten.betrag);
            write_nomat_balance(&tx, &posten)?;
        } else {
            let overflow = kandidat - posten.betrag;
            posten.bezahlt = posten.betrag;
            posten.offen = Decimal::ZERO;
            posten.status = Zahlungsstatus::Bezahlt;
            write_nomat_balance(&tx, &posten)?;
            let quelle = posten.beschreibung.clone();
            redistribute_overflow(&tx, posten.kunde_id, &quelle, overflow)?;
        }
        tx.commit()?;
        tracing::debug!(posten_id = id, amount = %amount, status = posten.status.as_str(), "payment applied");
        Ok(posten)
    }
}

fn write_mat_balance(conn: &Connection, posten: &PostenMat) -> LedgerResult<()> {
    conn.execute(
        "UPDATE kunden_posten_mat SET bezahlt = ?1, offen = ?2, status = ?3, updated_at = ?4 \
         WHERE id = ?5",
        params![
            posten.bezahlt.to_string(),
            posten.offen.to_string(),
            posten.status.as_str(),
            posten.updated_at,
            posten.id
        ],
    )?;
    Ok(())
}

fn write_nomat_balance(conn: &Connection, posten: &PostenNoMat) -> LedgerResult<()> {
    conn.execute(
        "UPDATE kunden_posten_nomat SET bezahlt = ?1, offen = ?2, status = ?3, updated_at = ?4 \
         WHERE id = ?5",
        params![
            posten.bezahlt.to_string(),
            posten.offen.to_string(),
            posten.status.as_str(),
            posten.updated_at,
            posten.id
        ],
    )?;
    Ok(())
}

/// Books `overflow` onto the customer's most recently created open freeform
/// posting. Target selection is strictly by highest id. Single hop: `offen`
/// may go negative, nothing is passed further. Without a target the
/// overflow is absorbed.
fn redistribute_overflow(
    conn: &Connection,
    kunde_id: i64,
    quelle: &str,
    overflow: Decimal,
) -> LedgerResult<()> {
    let ziel = conn
        .query_row(
            &format!(
                "SELECT {POSTEN_NOMAT_COLUMNS} FROM kunden_posten_nomat \
                 WHERE kunde_id = ?1 AND status = 'offen' ORDER BY id DESC LIMIT 1"
            ),
            params![kunde_id],
            map_posten_nomat,
        )
        .optional()?;
    let Some(mut ziel) = ziel else {
        tracing::debug!(kunde_id, overflow = %overflow, "overflow absorbed, no open freeform posting");
        return Ok(());
    };
    ziel.bezahlt += overflow;
    ziel.offen = outstanding(ziel.betrag, ziel.bezahlt);
    ziel.status = status_for(ziel.bezahlt, ziel.betrag);
    let vermerk = format!("Überlauf {overflow} aus {quelle} übernommen");
    ziel.notiz = Some(match ziel.notiz.take() {
        Some(prev) if !prev.trim().is_empty() => format!("{prev}\n{vermerk}"),
        _ => vermerk,
    });
    ziel.updated_at = now_iso();
    conn.execute(
        "UPDATE kunden_posten_nomat SET bezahlt = ?1, offen = ?2, status = ?3, notiz = ?4, \
         updated_at = ?5 WHERE id = ?6",
        params![
            ziel.bezahlt.to_string(),
            ziel.offen.to_string(),
            ziel.status.as_str(),
            ziel.notiz,
            ziel.updated_at,
            ziel.id
        ],
    )?;
    tracing::debug!(kunde_id, ziel_id = ziel.id, overflow = %overflow, "overflow redistributed");
    Ok(())
}

fn fetch_posten_mat(conn: &Connection, id: i64) -> LedgerResult<PostenMat> {
    conn.query_row(
        &format!("SELECT {POSTEN_MAT_COLUMNS} FROM kunden_posten_mat WHERE id = ?1"),
        params![id],
        map_posten_mat,
    )
    .optional()?
    .ok_or(LedgerError::NotFound(Entity::PostenMat, id))
}

fn fetch_posten_nomat(conn: &Connection, id: i64) -> LedgerResult<PostenNoMat> {
    conn.query_row(
        &format!("SELECT {POSTEN_NOMAT_COLUMNS} FROM kunden_posten_nomat WHERE id = ?1"),
        params![id],
        map_posten_nomat,
    )
    .optional()?
    .ok_or(LedgerError::NotFound(Entity::PostenNoMat, id))
}

fn map_posten_mat(row: &Row<'_>) -> rusqlite::Result<PostenMat> {
    Ok(PostenMat {
        id: row.get(0)?,
        kunde_id: row.get(1)?,
        material_id: row.get(2)?,
        menge: decimal_column(row, 3)?,
        preis: decimal_column(row, 4)?,
        bezahlt: decimal_column(row, 5)?,
        offen: decimal_column(row, 6)?,
        status: status_column(row, 7)?,
        notiz: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn map_posten_nomat(row: &Row<'_>) -> rusqlite::Result<PostenNoMat> {
    Ok(PostenNoMat {
        id: row.get(0)?,
        kunde_id: row.get(1)?,
        beschreibung: row.get(2)?,
        betrag: decimal_column(row, 3)?,
        bezahlt: decimal_column(row, 4)?,
        offen: decimal_column(row, 5)?,
        status: status_column(row, 6)?,
        notiz: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
