//! SQLite-backed store handle passed explicitly into every ledger operation.

mod schema;

use std::path::Path;

use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::domain::saldo::Zahlungsstatus;
use crate::errors::LedgerResult;
use crate::utils;

/// Owns the single connection to the embedded database. Multi-statement
/// ledger operations run inside one rusqlite transaction on this handle;
/// a transaction dropped before commit rolls back.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Opens (and if necessary bootstraps) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::bootstrap(Connection::open(path)?)
    }

    /// Opens the database at the managed default location
    /// (`~/.lager_core/lager.sqlite3`, overridable via `LAGER_CORE_HOME`).
    pub fn open_default() -> LedgerResult<Self> {
        Self::open(utils::database_file())
    }

    /// Fresh in-memory database, used by the test suites.
    pub fn open_in_memory() -> LedgerResult<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> LedgerResult<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }
}

/// Decodes a TEXT-encoded decimal column.
pub(crate) fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.parse::<Decimal>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
    })
}

/// Decodes a persisted payment status column.
pub(crate) fn status_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Zahlungsstatus> {
    let raw: String = row.get(idx)?;
    Zahlungsstatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown zahlungsstatus `{raw}`").into(),
        )
    })
}
