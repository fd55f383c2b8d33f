use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::saldo::Zahlungsstatus;

/// Material-backed posting: a billable line item priced as `menge * preis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostenMat {
    pub id: i64,
    pub kunde_id: i64,
    pub material_id: i64,
    pub menge: Decimal,
    pub preis: Decimal,
    pub bezahlt: Decimal,
    pub offen: Decimal,
    pub status: Zahlungsstatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notiz: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostenMat {
    /// Full amount billed by this posting.
    pub fn betrag(&self) -> Decimal {
        self.menge * self.preis
    }
}

/// Freeform posting with a directly stored `betrag`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostenNoMat {
    pub id: i64,
    pub kunde_id: i64,
    pub beschreibung: String,
    pub betrag: Decimal,
    pub bezahlt: Decimal,
    pub offen: Decimal,
    pub status: Zahlungsstatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notiz: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostenMatNeu {
    pub kunde_id: i64,
    pub material_id: i64,
    pub menge: Decimal,
    pub preis: Decimal,
    #[serde(default)]
    pub bezahlt: Option<Decimal>,
    #[serde(default)]
    pub notiz: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostenNoMatNeu {
    pub kunde_id: i64,
    pub beschreibung: String,
    pub betrag: Decimal,
    #[serde(default)]
    pub bezahlt: Option<Decimal>,
    #[serde(default)]
    pub notiz: Option<String>,
}

/// Merge-style update; whenever `menge`, `preis`, or `bezahlt` changes the
/// ledger recomputes `offen` and `status` from the merged field set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostenMatAenderung {
    pub menge: Option<Decimal>,
    pub preis: Option<Decimal>,
    pub bezahlt: Option<Decimal>,
    pub notiz: Option<String>,
}

/// Merge-style update; `betrag` or `bezahlt` changes trigger recomputation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostenNoMatAenderung {
    pub beschreibung: Option<String>,
    pub betrag: Option<Decimal>,
    pub bezahlt: Option<Decimal>,
    pub notiz: Option<String>,
}
