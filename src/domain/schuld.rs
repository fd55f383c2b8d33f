use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::saldo::Zahlungsstatus;

/// Shared record shape for Glaeubiger (creditor) and Schuldner (debtor)
/// entries. The two live in separate tables and never reference a Kunde.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schuld {
    pub id: i64,
    pub name: String,
    pub betrag: Decimal,
    pub bezahlt: Decimal,
    pub offen: Decimal,
    pub status: Zahlungsstatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faelligkeit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notiz: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchuldNeu {
    pub name: String,
    pub betrag: Decimal,
    #[serde(default)]
    pub bezahlt: Option<Decimal>,
    #[serde(default)]
    pub faelligkeit: Option<String>,
    #[serde(default)]
    pub notiz: Option<String>,
}

/// Merge-style update; `betrag` or `bezahlt` changes trigger recomputation
/// of `offen` and `status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchuldAenderung {
    pub name: Option<String>,
    pub betrag: Option<Decimal>,
    pub bezahlt: Option<Decimal>,
    pub faelligkeit: Option<String>,
    pub notiz: Option<String>,
}
