//! Customer directory. Postings reference customers by id; deleting a
//! customer does not touch dependent postings or movements. Cleaning up
//! dependents is the caller's job.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Kunde, KundeAenderung};
use crate::errors::{Entity, LedgerError, LedgerResult};
use crate::storage::Store;
use crate::utils::now_iso;

const KUNDE_COLUMNS: &str = "id, name, notiz, created_at, updated_at";

/// CRUD over the customer table.
pub struct KundeService;

impl KundeService {
    /// Creates a customer and returns the stored record.
    pub fn create(store: &mut Store, name: &str, notiz: Option<String>) -> LedgerResult<Kunde> {
        let now = now_iso();
        store.conn.execute(
            "INSERT INTO kunden (name, notiz, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, notiz, now, now],
        )?;
        let id = store.conn.last_insert_rowid();
        tracing::debug!(kunde_id = id, "kunde created");
        Ok(Kunde {
            id,
            name: name.to_string(),
            notiz,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get(store: &Store, id: i64) -> LedgerResult<Kunde> {
        fetch_kunde(&store.conn, id)
    }

    /// All customers, ordered by name with id as tie-break.
    pub fn list(store: &Store) -> LedgerResult<Vec<Kunde>> {
        let mut stmt = store
            .conn
            .prepare(&format!("SELECT {KUNDE_COLUMNS} FROM kunden ORDER BY name, id"))?;
        let rows = stmt.query_map([], map_kunde)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Merges the supplied changes into the stored record.
    pub fn update(store: &mut Store, id: i64, aenderung: KundeAenderung) -> LedgerResult<Kunde> {
        let mut kunde = fetch_kunde(&store.conn, id)?;
        if let Some(name) = aenderung.name {
            kunde.name = name;
        }
        if let Some(notiz) = aenderung.notiz {
            kunde.notiz = Some(notiz);
        }
        kunde.updated_at = now_iso();
        store.conn.execute(
            "UPDATE kunden SET name = ?1, notiz = ?2, updated_at = ?3 WHERE id = ?4",
            params![kunde.name, kunde.notiz, kunde.updated_at, id],
        )?;
        Ok(kunde)
    }

    /// Hard delete.
    pub fn delete(store: &mut Store, id: i64) -> LedgerResult<()> {
        let affected = store
            .conn
            .execute("DELETE FROM kunden WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(LedgerError::NotFound(Entity::Kunde, id));
        }
        tracing::debug!(kunde_id = id, "kunde deleted");
        Ok(())
    }
}

pub(crate) fn fetch_kunde(conn: &Connection, id: i64) -> LedgerResult<Kunde> {
    conn.query_row(
        &format!("SELECT {KUNDE_COLUMNS} FROM kunden WHERE id = ?1"),
        params![id],
        map_kunde,
    )
    .optional()?
    .ok_or(LedgerError::NotFound(Entity::Kunde, id))
}

fn map_kunde(row: &Row<'_>) -> rusqlite::Result<Kunde> {
    Ok(Kunde {
        id: row.get(0)?,
        name: row.get(1)?,
        notiz: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
