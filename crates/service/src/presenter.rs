//! View models handed to the rendering side.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::query::QueryHit;
use crate::schedule::{classify, days_until_due, AlertWindow, Status};
use crate::store::RecordId;

/// Fixed `R$ 1234,56` formatting; no locale handling.
pub fn format_money(amount: Decimal) -> String {
    format!("R$ {:.2}", amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)).replace('.', ",")
}

/// `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub original_index: usize,
    pub id: RecordId,
    pub name: String,
    pub due_date: String,
    pub service: &'static str,
    pub fee: String,
    pub days_until_due: i64,
    pub status: Status,
}

pub fn list_rows(hits: &[QueryHit<'_>], today: NaiveDate, window: AlertWindow) -> Vec<ListRow> {
    hits.iter()
        .map(|hit| {
            let days = days_until_due(today, hit.record.due_date);
            ListRow {
                original_index: hit.original_index,
                id: hit.id,
                name: hit.record.name.clone(),
                due_date: format_date(hit.record.due_date),
                service: hit.record.service_type.label(),
                fee: format_money(hit.record.monthly_fee),
                days_until_due: days,
                status: classify(days, window),
            }
        })
        .collect()
}
