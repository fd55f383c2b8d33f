use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tracked stock item with its acquisition costs and revenue counters.
///
/// `bestand` stays within `[0, menge]`; it only ever shrinks through
/// recorded movements, never through raw field writes from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub name: String,
    pub menge: Decimal,
    pub bestand: Decimal,
    pub ek_stueck: Decimal,
    pub ek_gesamt: Decimal,
    pub vk_stueck: Decimal,
    pub einnahmen_bar: Decimal,
    pub einnahmen_kombi: Decimal,
    pub gewinn_aktuell: Decimal,
    pub gewinn_theoretisch: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notiz: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a [`Material`].
///
/// `bestand` is caller-supplied; by convention callers pass `bestand = menge`
/// for a fresh acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialNeu {
    pub name: String,
    pub menge: Decimal,
    pub bestand: Decimal,
    pub ek_stueck: Decimal,
    pub ek_gesamt: Decimal,
    pub vk_stueck: Decimal,
    #[serde(default)]
    pub notiz: Option<String>,
}

/// Merge-style update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialAenderung {
    pub name: Option<String>,
    pub menge: Option<Decimal>,
    pub bestand: Option<Decimal>,
    pub ek_stueck: Option<Decimal>,
    pub ek_gesamt: Option<Decimal>,
    pub vk_stueck: Option<Decimal>,
    pub einnahmen_bar: Option<Decimal>,
    pub einnahmen_kombi: Option<Decimal>,
    pub notiz: Option<String>,
}

/// Profit if the remaining plan works out: full quantity sold at list price.
pub fn gewinn_theoretisch(menge: Decimal, vk_stueck: Decimal, ek_gesamt: Decimal) -> Decimal {
    menge * vk_stueck - ek_gesamt
}

/// Profit realized so far across both revenue channels.
pub fn gewinn_aktuell(
    einnahmen_bar: Decimal,
    einnahmen_kombi: Decimal,
    ek_gesamt: Decimal,
) -> Decimal {
    einnahmen_bar + einnahmen_kombi - ek_gesamt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str_exact(raw).unwrap()
    }

    #[test]
    fn theoretical_profit_uses_full_quantity() {
        assert_eq!(gewinn_theoretisch(dec("10"), dec("5"), dec("30")), dec("20"));
    }

    #[test]
    fn current_profit_sums_both_channels() {
        assert_eq!(
            gewinn_aktuell(dec("15"), dec("25"), dec("30")),
            dec("10")
        );
        assert_eq!(gewinn_aktuell(dec("0"), dec("0"), dec("30")), dec("-30"));
    }
}
