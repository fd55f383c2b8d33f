//! Creditor ("I owe") and debtor ("owed to me") ledgers. The two tables
//! share one record shape and one payment rule: the plain non-overflow
//! arithmetic. An overpayment drives `offen` negative; the ledger does
//! not clamp, rejecting it is the caller's input validation.

use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::domain::saldo::{outstanding, status_for};
use crate::domain::{Schuld, SchuldAenderung, SchuldNeu};
use crate::errors::{Entity, LedgerError, LedgerResult};
use crate::storage::{decimal_column, status_column, Store};
use crate::utils::now_iso;

const SCHULD_COLUMNS: &str =
    "id, name, betrag, bezahlt, offen, status, faelligkeit, notiz, created_at, updated_at";

/// Creditor ledger over the `glaeubiger` table.
pub struct GlaeubigerService;

/// Debtor ledger over the `schuldner` table.
pub struct SchuldnerService;

impl GlaeubigerService {
    pub fn create(store: &mut Store, neu: SchuldNeu) -> LedgerResult<Schuld> {
        create(&store.conn, "glaeubiger", neu)
    }

    pub fn get(store: &Store, id: i64) -> LedgerResult<Schuld> {
        fetch(&store.conn, "glaeubiger", Entity::Glaeubiger, id)
    }

    pub fn list(store: &Store) -> LedgerResult<Vec<Schuld>> {
        list(&store.conn, "glaeubiger")
    }

    pub fn update(store: &mut Store, id: i64, aenderung: SchuldAenderung) -> LedgerResult<Schuld> {
        update(&store.conn, "glaeubiger", Entity::Glaeubiger, id, aenderung)
    }

    pub fn delete(store: &mut Store, id: i64) -> LedgerResult<()> {
        delete(&store.conn, "glaeubiger", Entity::Glaeubiger, id)
    }

    /// Applies a payment; no overflow redistribution exists for creditors.
    pub fn apply_payment(store: &mut Store, id: i64, amount: Decimal) -> LedgerResult<Schuld> {
        let tx = store.conn.transaction()?;
        let schuld = apply_payment(&tx, "glaeubiger", Entity::Glaeubiger, id, amount)?;
        tx.commit()?;
        Ok(schuld)
    }
}

impl SchuldnerService {
    pub fn create(store: &mut Store, neu: SchuldNeu) -> LedgerResult<Schuld> {
        create(&store.conn, "schuldner", neu)
    }

    pub fn get(store: &Store, id: i64) -> LedgerResult<Schuld> {
        fetch(&store.conn, "schuldner", Entity::Schuldner, id)
    }

    pub fn list(store: &Store) -> LedgerResult<Vec<Schuld>> {
        list(&store.conn, "schuldner")
    }

    pub fn update(store: &mut Store, id: i64, aenderung: SchuldAenderung) -> LedgerResult<Schuld> {
        update(&store.conn, "schuldner", Entity::Schuldner, id, aenderung)
    }

    pub fn delete(store: &mut Store, id: i64) -> LedgerResult<()> {
        delete(&store.conn, "schuldner", Entity::Schuldner, id)
    }

    /// Applies a payment; no overflow redistribution exists for debtors.
    pub fn apply_payment(store: &mut Store, id: i64, amount: Decimal) -> LedgerResult<Schuld> {
        let tx = store.conn.transaction()?;
        let schuld = apply_payment(&tx, "schuldner", Entity::Schuldner, id, amount)?;
        tx.commit()?;
        Ok(schuld)
    }
}

fn create(conn: &Connection, tabelle: &str, neu: SchuldNeu) -> LedgerResult<Schuld> {
    let bezahlt = neu.bezahlt.unwrap_or(Decimal::ZERO);
    let offen = outstanding(neu.betrag, bezahlt);
    let status = status_for(bezahlt, neu.betrag);
    let now = now_iso();
    conn.execute(
        &format!(
            "INSERT INTO {tabelle} (name, betrag, bezahlt, offen, status, faelligkeit, notiz, \
             created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            neu.name,
            neu.betrag.to_string(),
            bezahlt.to_string(),
            offen.to_string(),
            status.as_str(),
            neu.faelligkeit,
            neu.notiz,
            now,
            now
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, tabelle, "schuld record created");
    Ok(Schuld {
        id,
        name: neu.name,
        betrag: neu.betrag,
        bezahlt,
        offen,
        status,
        faelligkeit: neu.faelligkeit,
        notiz: neu.notiz,
        created_at: now.clone(),
        updated_at: now,
    })
}

fn fetch(conn: &Connection, tabelle: &str, entity: Entity, id: i64) -> LedgerResult<Schuld> {
    conn.query_row(
        &format!("SELECT {SCHULD_COLUMNS} FROM {tabelle} WHERE id = ?1"),
        params![id],
        map_schuld,
    )
    .optional()?
    .ok_or(LedgerError::NotFound(entity, id))
}

fn list(conn: &Connection, tabelle: &str) -> LedgerResult<Vec<Schuld>> {
    let mut stmt = conn.prepare(&format!("SELECT {SCHULD_COLUMNS} FROM {tabelle} ORDER BY id"))?;
    let rows = stmt.query_map([], map_schuld)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn update(
    conn: &Connection,
    tabelle: &str,
    entity: Entity,
    id: i64,
    aenderung: SchuldAenderung,
) -> LedgerResult<Schuld> {
    let mut schuld = fetch(conn, tabelle, entity, id)?;
    let recompute = aenderung.betrag.is_some() || aenderung.bezahlt.is_some();
    if let Some(name) = aenderung.name {
        schuld.name = name;
    }
    if let Some(betrag) = aenderung.betrag {
        schuld.betrag = betrag;
    }
    if let Some(bezahlt) = aenderung.bezahlt {
        schuld.bezahlt = bezahlt;
    }
    if let Some(faelligkeit) = aenderung.faelligkeit {
        schuld.faelligkeit = Some(faelligkeit);
    }
    if let Some(notiz) = aenderung.notiz {
        schuld.notiz = Some(notiz);
    }
    if recompute {
        schuld.offen = outstanding(schuld.betrag, schuld.bezahlt);
        schuld.status = status_for(schuld.bezahlt, schuld.betrag);
    }
    schuld.updated_at = now_iso();
    conn.execute(
        &format!(
            "UPDATE {tabelle} SET name = ?1, betrag = ?2, bezahlt = ?3, offen = ?4, status = ?5, \
             faelligkeit = ?6, notiz = ?7, updated_at = ?8 WHERE id = ?9"
        ),
        params![
            schuld.name,
            schuld.betrag.to_string(),
            schuld.bezahlt.to_string(),
            schuld.offen.to_string(),
            schuld.status.as_str(),
            schuld.faelligkeit,
            schuld.notiz,
            schuld.updated_at,
            id
        ],
    )?;
    Ok(schuld)
}

fn delete(conn: &Connection, tabelle: &str, entity: Entity, id: i64) -> LedgerResult<()> {
    let affected = conn.execute(&format!("DELETE FROM {tabelle} WHERE id = ?1"), params![id])?;
    if affected == 0 {
        return Err(LedgerError::NotFound(entity, id));
    }
    Ok(())
}

fn apply_payment(
    conn: &Connection,
    tabelle: &str,
    entity: Entity,
    id: i64,
    amount: Decimal,
) -> LedgerResult<Schuld> {
    let mut schuld = fetch(conn, tabelle, entity, id)?;
    schuld.bezahlt += amount;
    schuld.offen = outstanding(schuld.betrag, schuld.bezahlt);
    schuld.status = status_for(schuld.bezahlt, schuld.betrag);
    schuld.updated_at = now_iso();
    conn.execute(
        &format!(
            "UPDATE {tabelle} SET bezahlt = ?1, offen = ?2, status = ?3, updated_at = ?4 \
             WHERE id = ?5"
        ),
        params![
            schuld.bezahlt.to_string(),
            schuld.offen.to_string(),
            schuld.status.as_str(),
            schuld.updated_at,
            id
        ],
    )?;
    tracing::debug!(id, tabelle, amount = %amount, "payment applied");
    Ok(schuld)
}

fn map_schuld(row: &Row<'_>) -> rusqlite::Result<Schuld> {
    Ok(Schuld {
        id: row.get(0)?,
        name: row.get(1)?,
        betrag: decimal_column(row, 2)?,
        bezahlt: decimal_column(row, 3)?,
        offen: decimal_column(row, 4)?,
        status: status_column(row, 5)?,
        faelligkeit: row.get(6)?,
        notiz: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
