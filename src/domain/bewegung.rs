use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sale channel a movement was booked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BewegungsArt {
    Bar,
    Kombi,
}

/// Immutable cash-sale record against a material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BewegungBar {
    pub id: i64,
    pub material_id: i64,
    pub menge: Decimal,
    pub preis: Decimal,
    pub datum: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notiz: Option<String>,
    pub created_at: String,
}

/// Immutable invoiced-sale record against a material, tied to a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BewegungKombi {
    pub id: i64,
    pub material_id: i64,
    pub kunde_id: i64,
    pub menge: Decimal,
    pub preis: Decimal,
    pub datum: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notiz: Option<String>,
    pub created_at: String,
}

/// Input for recording a movement. `preis` is the movement total, not a
/// unit price; callers convert before invoking the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BewegungNeu {
    pub menge: Decimal,
    pub preis: Decimal,
    pub datum: String,
    #[serde(default)]
    pub notiz: Option<String>,
}
