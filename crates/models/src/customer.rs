use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;

/// Date layout used by persisted records and form input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields every imported record object must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "dueDate", "serviceType", "monthlyFee"];

/// Fees carry at most cents.
pub const FEE_SCALE: u32 = 2;

/// Largest accepted monthly fee (one billion). Keeps persisted fees exact as
/// JSON numbers and dashboard sums far from `Decimal` overflow.
pub const MAX_MONTHLY_FEE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Subscription product a customer pays for.
///
/// Anything that is not a known product (including a missing or empty
/// value in older records) collapses to `Other`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Unitv,
    Iptv,
    #[default]
    Other,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Unitv => "unitv",
            ServiceType::Iptv => "iptv",
            ServiceType::Other => "other",
        }
    }

    /// Display label; unset services show as `N/A`.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Unitv => "UniTV",
            ServiceType::Iptv => "IPTV",
            ServiceType::Other => "N/A",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ServiceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "unitv" => ServiceType::Unitv,
            "iptv" => ServiceType::Iptv,
            _ => ServiceType::Other,
        })
    }
}

impl<'de> Deserialize<'de> for ServiceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }
}

/// One tracked customer and the renewal data attached to it.
///
/// Serialized field names follow the persisted snapshot layout
/// (`name`, `dueDate`, `serviceType`, `monthlyFee`). Records written before
/// service types and fees existed load with `Other` and a zero fee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub name: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub service_type: ServiceType,
    #[serde(default)]
    pub monthly_fee: Decimal,
}

impl CustomerRecord {
    /// Build a record, trimming the name and enforcing the record invariants.
    pub fn new(
        name: impl Into<String>,
        due_date: NaiveDate,
        service_type: ServiceType,
        monthly_fee: Decimal,
    ) -> Result<Self, ModelError> {
        let rec = Self {
            name: name.into().trim().to_string(),
            due_date,
            service_type,
            monthly_fee,
        };
        rec.validate()?;
        Ok(rec)
    }

    /// Non-empty trimmed name and a fee accepted by [`check_fee`].
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::required("name"));
        }
        check_fee(self.monthly_fee)
    }
}

/// Non-negative, at most [`MAX_MONTHLY_FEE`], no finer than cents.
pub fn check_fee(fee: Decimal) -> Result<(), ModelError> {
    if fee < Decimal::ZERO {
        return Err(ModelError::Validation("monthlyFee must not be negative".into()));
    }
    if fee > MAX_MONTHLY_FEE {
        return Err(ModelError::Validation(format!("monthlyFee must not exceed {}", MAX_MONTHLY_FEE)));
    }
    if fee.normalize().scale() > FEE_SCALE {
        return Err(ModelError::Validation(format!("monthlyFee allows at most {} decimal places", FEE_SCALE)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap() }

    #[test]
    fn serializes_with_snapshot_field_names() {
        let rec = CustomerRecord::new("Ana", date("2024-01-10"), ServiceType::Iptv, Decimal::new(3000, 2)).unwrap();
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["name"], "Ana");
        assert_eq!(v["dueDate"], "2024-01-10");
        assert_eq!(v["serviceType"], "iptv");
        assert_eq!(v["monthlyFee"].as_f64(), Some(30.0));
    }

    #[test]
    fn legacy_record_without_service_or_fee_loads() {
        let rec: CustomerRecord = serde_json::from_str(r#"{"name":"Bia","dueDate":"2024-02-01"}"#).unwrap();
        assert_eq!(rec.service_type, ServiceType::Other);
        assert_eq!(rec.monthly_fee, Decimal::ZERO);
        assert_eq!(rec.service_type.label(), "N/A");
    }

    #[test]
    fn unknown_or_null_service_type_is_other() {
        let rec: CustomerRecord =
            serde_json::from_str(r#"{"name":"C","dueDate":"2024-02-01","serviceType":"cable","monthlyFee":5}"#).unwrap();
        assert_eq!(rec.service_type, ServiceType::Other);
        let rec: CustomerRecord =
            serde_json::from_str(r#"{"name":"C","dueDate":"2024-02-01","serviceType":null,"monthlyFee":5}"#).unwrap();
        assert_eq!(rec.service_type, ServiceType::Other);
        assert_eq!(rec.monthly_fee, Decimal::from(5));
    }

    #[test]
    fn service_type_parse_is_case_insensitive() {
        assert_eq!("UniTV".parse::<ServiceType>().unwrap(), ServiceType::Unitv);
        assert_eq!(" IPTV ".parse::<ServiceType>().unwrap(), ServiceType::Iptv);
        assert_eq!("".parse::<ServiceType>().unwrap(), ServiceType::Other);
    }

    #[test]
    fn new_rejects_blank_name_and_negative_fee() {
        let d = date("2024-01-10");
        assert!(matches!(CustomerRecord::new("   ", d, ServiceType::Iptv, Decimal::ONE), Err(ModelError::Validation(_))));
        assert!(matches!(CustomerRecord::new("Ana", d, ServiceType::Iptv, Decimal::NEGATIVE_ONE), Err(ModelError::Validation(_))));
        let ok = CustomerRecord::new("  Ana ", d, ServiceType::Iptv, Decimal::ZERO).unwrap();
        assert_eq!(ok.name, "Ana");
    }

    #[test]
    fn fee_is_bounded_and_limited_to_cents() {
        let d = date("2024-01-10");
        assert!(CustomerRecord::new("Ana", d, ServiceType::Iptv, MAX_MONTHLY_FEE).is_ok());
        assert!(CustomerRecord::new("Ana", d, ServiceType::Iptv, Decimal::new(3000, 2)).is_ok());
        // trailing zeros beyond cents are fine
        assert!(CustomerRecord::new("Ana", d, ServiceType::Iptv, Decimal::new(12_5000, 4)).is_ok());

        for fee in [MAX_MONTHLY_FEE + Decimal::new(1, 2), Decimal::MAX, Decimal::new(123_456, 4)] {
            assert!(
                matches!(CustomerRecord::new("Ana", d, ServiceType::Iptv, fee), Err(ModelError::Validation(_))),
                "{fee}"
            );
        }
    }

    #[test]
    fn largest_fee_survives_json_number_round_trip() {
        let rec = CustomerRecord::new("Ana", date("2024-01-10"), ServiceType::Unitv, MAX_MONTHLY_FEE - Decimal::new(1, 2))
            .unwrap();
        let back: CustomerRecord = serde_json::from_str(&serde_json::to_string(&rec).unwrap()).unwrap();
        assert_eq!(back, rec);
    }
}
