use serde::{Deserialize, Serialize};

/// A customer; owns zero or more postings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kunde {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notiz: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Merge-style update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KundeAenderung {
    pub name: Option<String>,
    pub notiz: Option<String>,
}
