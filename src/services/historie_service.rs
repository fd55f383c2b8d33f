//! Movement history for a single material: both channels merged into one
//! date-grouped, newest-first view.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rusqlite::params;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::BewegungsArt;
use crate::errors::LedgerResult;
use crate::storage::{decimal_column, Store};

const DATUM_FORMAT: &str = "%Y-%m-%d";

/// One movement, tagged with the channel it came from.
#[derive(Debug, Clone, Serialize)]
pub struct HistorieEintrag {
    pub art: BewegungsArt,
    pub id: i64,
    pub datum: String,
    pub menge: Decimal,
    pub preis: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kunde_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notiz: Option<String>,
    pub created_at: String,
}

/// All movements sharing one `datum` string, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct HistorieTag {
    pub datum: String,
    pub eintraege: Vec<HistorieEintrag>,
}

impl HistorieTag {
    /// Newest entry of the day.
    pub fn neueste(&self) -> Option<&HistorieEintrag> {
        self.eintraege.first()
    }
}

/// Aggregates the movement tables into the per-material history view.
pub struct HistorieService;

impl HistorieService {
    /// Returns the material's movements grouped by day, ordered newest
    /// first. An unknown material simply yields an empty list.
    pub fn material_historie(store: &Store, material_id: i64) -> LedgerResult<Vec<HistorieTag>> {
        let mut eintraege = Vec::new();

        let mut stmt = store.conn.prepare(
            "SELECT id, menge, preis, datum, notiz, created_at \
             FROM material_bewegungen_bar WHERE material_id = ?1",
        )?;
        let bar = stmt.query_map(params![material_id], |row| {
            Ok(HistorieEintrag {
                art: BewegungsArt::Bar,
                id: row.get(0)?,
                menge: decimal_column(row, 1)?,
                preis: decimal_column(row, 2)?,
                datum: row.get(3)?,
                kunde_id: None,
                notiz: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        for eintrag in bar {
            eintraege.push(eintrag?);
        }

        let mut stmt = store.conn.prepare(
            "SELECT id, kunde_id, menge, preis, datum, notiz, created_at \
             FROM material_bewegungen_kombi WHERE material_id = ?1",
        )?;
        let kombi = stmt.query_map(params![material_id], |row| {
            Ok(HistorieEintrag {
                art: BewegungsArt::Kombi,
                id: row.get(0)?,
                kunde_id: Some(row.get(1)?),
                menge: decimal_column(row, 2)?,
                preis: decimal_column(row, 3)?,
                datum: row.get(4)?,
                notiz: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;
        for eintrag in kombi {
            eintraege.push(eintrag?);
        }

        sortieren(&mut eintraege);
        Ok(gruppieren(eintraege))
    }
}

/// Newest first: parsed date, raw date string where parsing fails, id as
/// final tie-break.
fn sortieren(eintraege: &mut [HistorieEintrag]) {
    eintraege.sort_by(|a, b| {
        let datum_a = NaiveDate::parse_from_str(&a.datum, DATUM_FORMAT).ok();
        let datum_b = NaiveDate::parse_from_str(&b.datum, DATUM_FORMAT).ok();
        let nach_datum = match (datum_a, datum_b) {
            (Some(a), Some(b)) => b.cmp(&a),
            _ => Ordering::Equal,
        };
        nach_datum
            .then_with(|| b.datum.cmp(&a.datum))
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Groups the sorted sequence by exact `datum` string, keeping first-seen
/// date order.
fn gruppieren(eintraege: Vec<HistorieEintrag>) -> Vec<HistorieTag> {
    let mut tage: Vec<HistorieTag> = Vec::new();
    for eintrag in eintraege {
        if let Some(tag) = tage.iter_mut().find(|tag| tag.datum == eintrag.datum) {
            tag.eintraege.push(eintrag);
        } else {
            tage.push(HistorieTag {
                datum: eintrag.datum.clone(),
                eintraege: vec![eintrag],
            });
        }
    }
    tage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eintrag(id: i64, datum: &str) -> HistorieEintrag {
        HistorieEintrag {
            art: BewegungsArt::Bar,
            id,
            datum: datum.to_string(),
            menge: Decimal::ONE,
            preis: Decimal::ONE,
            kunde_id: None,
            notiz: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn sorts_newest_date_first_then_id_descending() {
        let mut eintraege = vec![
            eintrag(5, "2026-01-03"),
            eintrag(10, "2026-01-05"),
            eintrag(11, "2026-01-05"),
        ];
        sortieren(&mut eintraege);
        let ids: Vec<i64> = eintraege.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![11, 10, 5]);
    }

    #[test]
    fn unparseable_dates_fall_back_to_raw_string_ordering() {
        let mut eintraege = vec![
            eintrag(1, "irgendwann"),
            eintrag(2, "2026-01-05"),
            eintrag(3, "irgendwann"),
        ];
        sortieren(&mut eintraege);
        // "irgendwann" sorts above the ISO date lexicographically; id breaks
        // the tie within the day.
        let ids: Vec<i64> = eintraege.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn groups_preserve_first_seen_date_order() {
        let mut eintraege = vec![
            eintrag(5, "2026-01-03"),
            eintrag(10, "2026-01-05"),
            eintrag(11, "2026-01-05"),
        ];
        sortieren(&mut eintraege);
        let tage = gruppieren(eintraege);
        assert_eq!(tage.len(), 2);
        assert_eq!(tage[0].datum, "2026-01-05");
        assert_eq!(tage[0].neueste().map(|e| e.id), Some(11));
        assert_eq!(tage[1].datum, "2026-01-03");
    }

    #[test]
    fn empty_input_yields_empty_view() {
        assert!(gruppieren(Vec::new()).is_empty());
    }
}
