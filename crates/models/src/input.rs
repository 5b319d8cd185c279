use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::customer::{check_fee, CustomerRecord, ServiceType, DATE_FORMAT};
use crate::errors::ModelError;

/// Raw form submission: every field as typed by the user.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerInput {
    pub name: String,
    pub due_date: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub monthly_fee: String,
}

impl CustomerInput {
    /// Required fields are the name and the due date; service and fee may be blank.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::required("name"));
        }
        if self.due_date.trim().is_empty() {
            return Err(ModelError::required("due date"));
        }
        parse_due_date(&self.due_date)?;
        parse_fee(&self.monthly_fee)?;
        Ok(())
    }

    pub fn into_record(self) -> Result<CustomerRecord, ModelError> {
        self.validate()?;
        let due_date = parse_due_date(&self.due_date)?;
        let fee = parse_fee(&self.monthly_fee)?;
        let service = ServiceType::from_str(&self.service_type).unwrap_or_default();
        CustomerRecord::new(self.name, due_date, service, fee)
    }
}

/// Parse `YYYY-MM-DD`.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ModelError::Validation(format!("invalid due date '{}', expected YYYY-MM-DD", raw.trim())))
}

/// Blank means zero; both `12.50` and `12,50` are accepted. The result obeys
/// the same bounds as a stored record.
pub fn parse_fee(raw: &str) -> Result<Decimal, ModelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let fee = Decimal::from_str(&trimmed.replace(',', "."))
        .map_err(|_| ModelError::Validation(format!("invalid monthly fee '{}'", trimmed)))?;
    check_fee(fee)?;
    Ok(fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, due: &str, service: &str, fee: &str) -> CustomerInput {
        CustomerInput {
            name: name.into(),
            due_date: due.into(),
            service_type: service.into(),
            monthly_fee: fee.into(),
        }
    }

    #[test]
    fn into_record_trims_and_parses() {
        let rec = input("  Ana  ", "2024-01-10", "iptv", "30,00").into_record().unwrap();
        assert_eq!(rec.name, "Ana");
        assert_eq!(rec.due_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(rec.service_type, ServiceType::Iptv);
        assert_eq!(rec.monthly_fee, Decimal::new(3000, 2));
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        assert_eq!(input(" ", "2024-01-10", "", "").validate(), Err(ModelError::required("name")));
        assert_eq!(input("Ana", "", "", "").validate(), Err(ModelError::required("due date")));
        assert!(matches!(input("Ana", "10/01/2024", "", "").validate(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn blank_fee_and_service_default() {
        let rec = input("Ana", "2024-01-10", "", "").into_record().unwrap();
        assert_eq!(rec.monthly_fee, Decimal::ZERO);
        assert_eq!(rec.service_type, ServiceType::Other);
    }

    #[test]
    fn negative_or_garbage_fee_is_rejected() {
        assert!(input("Ana", "2024-01-10", "iptv", "-1").into_record().is_err());
        assert!(input("Ana", "2024-01-10", "iptv", "abc").into_record().is_err());
    }

    #[test]
    fn oversized_or_sub_cent_fee_is_rejected() {
        for fee in ["79228162514264337593543950335", "1000000000,01", "12,345"] {
            assert!(matches!(parse_fee(fee), Err(ModelError::Validation(_))), "{fee}");
        }
        assert_eq!(parse_fee("1000000000").unwrap(), Decimal::from(1_000_000_000));
    }
}
