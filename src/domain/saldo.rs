//! Balance arithmetic shared by every payable record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted two-state payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zahlungsstatus {
    Offen,
    Bezahlt,
}

impl Zahlungsstatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Zahlungsstatus::Offen => "offen",
            Zahlungsstatus::Bezahlt => "bezahlt",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "offen" => Some(Zahlungsstatus::Offen),
            "bezahlt" => Some(Zahlungsstatus::Bezahlt),
            _ => None,
        }
    }
}

/// Three-state view label derived from `(bezahlt, offen)`.
///
/// Never persisted; the stored form is [`Zahlungsstatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zahlungslage {
    Offen,
    Teilbezahlt,
    Bezahlt,
}

/// `Bezahlt` once the paid amount covers the full `betrag`.
pub fn status_for(bezahlt: Decimal, betrag: Decimal) -> Zahlungsstatus {
    if bezahlt >= betrag {
        Zahlungsstatus::Bezahlt
    } else {
        Zahlungsstatus::Offen
    }
}

/// Remaining balance, `betrag - bezahlt`.
pub fn outstanding(betrag: Decimal, bezahlt: Decimal) -> Decimal {
    betrag - bezahlt
}

/// The single consistent mapping callers use to label records three-state:
/// nothing paid yet reads `Offen`, nothing outstanding reads `Bezahlt`,
/// anything in between reads `Teilbezahlt`.
pub fn lage_for(bezahlt: Decimal, offen: Decimal) -> Zahlungslage {
    if bezahlt == Decimal::ZERO {
        Zahlungslage::Offen
    } else if offen == Decimal::ZERO {
        Zahlungslage::Bezahlt
    } else {
        Zahlungslage::Teilbezahlt
    }
}
