use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

/// Record kinds referenced by [`LedgerError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Material,
    Kunde,
    PostenMat,
    PostenNoMat,
    Glaeubiger,
    Schuldner,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Entity::Material => "Material",
            Entity::Kunde => "Kunde",
            Entity::PostenMat => "PostenMat",
            Entity::PostenNoMat => "PostenNoMat",
            Entity::Glaeubiger => "Glaeubiger",
            Entity::Schuldner => "Schuldner",
        };
        f.write_str(label)
    }
}

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0} {1} not found")]
    NotFound(Entity, i64),
    #[error("insufficient stock on material {material_id}: {bestand} on hand, {menge} requested")]
    InsufficientStock {
        material_id: i64,
        bestand: Decimal,
        menge: Decimal,
    },
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
