//! Dashboard figures derived from the current records.
//!
//! Nothing is cached: every call walks the records again.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use models::{CustomerRecord, ServiceType};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::schedule::{days_until_due, AlertWindow};

/// Unit cost the reseller pays per service type. Unknown types cost nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostTable {
    costs: BTreeMap<ServiceType, Decimal>,
}

impl Default for CostTable {
    fn default() -> Self {
        Self::from_iter([
            (ServiceType::Unitv, Decimal::new(1200, 2)),
            (ServiceType::Iptv, Decimal::new(1000, 2)),
        ])
    }
}

impl FromIterator<(ServiceType, Decimal)> for CostTable {
    fn from_iter<I: IntoIterator<Item = (ServiceType, Decimal)>>(iter: I) -> Self {
        Self { costs: iter.into_iter().collect() }
    }
}

impl CostTable {
    /// Build from the `[costs]` config table; keys that are not a known service are ignored.
    pub fn from_config(costs: &BTreeMap<String, Decimal>) -> Self {
        costs
            .iter()
            .filter_map(|(name, cost)| match name.parse::<ServiceType>() {
                Ok(ServiceType::Other) | Err(_) => None,
                Ok(service) => Some((service, *cost)),
            })
            .collect()
    }

    pub fn cost(&self, service: ServiceType) -> Decimal {
        self.costs.get(&service).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Profit on one record, floored at zero.
pub fn margin(record: &CustomerRecord, costs: &CostTable) -> Decimal {
    (record.monthly_fee - costs.cost(record.service_type)).max(Decimal::ZERO)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub monthly_profit: Decimal,
    pub upcoming_receivable: Decimal,
    pub active_count: usize,
    pub overdue_count: usize,
}

pub fn summarize<'a, I>(records: I, costs: &CostTable, today: NaiveDate, window: AlertWindow) -> Dashboard
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    records.into_iter().fold(Dashboard::default(), |mut acc, rec| {
        acc.monthly_profit += margin(rec, costs);
        let days = days_until_due(today, rec.due_date);
        if days < 0 {
            acc.overdue_count += 1;
        } else {
            acc.active_count += 1;
        }
        if window.contains(days) {
            acc.upcoming_receivable += rec.monthly_fee;
        }
        acc
    })
}
