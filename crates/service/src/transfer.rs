//! Snapshot export and import validation.
//!
//! Import never touches the store: it produces an [`ImportPlan`] that the
//! caller confirms and hands to `RecordStore::apply_import`.

use chrono::NaiveDate;
use configs::ImportValidationMode;
use models::{CustomerRecord, REQUIRED_FIELDS};
use serde_json::Value;
use tracing::warn;

use crate::errors::ServiceError;

/// Pretty-printed JSON array of every record, in store order.
pub fn export_snapshot<'a, I>(records: I) -> Result<String, ServiceError>
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    let records: Vec<&CustomerRecord> = records.into_iter().collect();
    if records.is_empty() {
        return Err(ServiceError::EmptyStore);
    }
    serde_json::to_string_pretty(&records).map_err(ServiceError::storage)
}

/// `renewals-backup-YYYY-MM-DD.json`
pub fn export_file_name(today: NaiveDate) -> String {
    format!("renewals-backup-{}.json", today.format("%Y-%m-%d"))
}

/// Parse an untrusted snapshot into records.
///
/// With [`ImportValidationMode::FirstElement`] only element 0 is checked for
/// the required fields; later elements that fail to deserialize still
/// surface as a shape error. [`ImportValidationMode::EveryElement`] checks
/// each element and reports the first offending index.
pub fn parse_import(text: &str, mode: ImportValidationMode) -> Result<Vec<CustomerRecord>, ServiceError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "import rejected: invalid JSON");
        ServiceError::Parse(e.to_string())
    })?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            warn!(kind = json_kind(&other), "import rejected: not a sequence");
            return Err(ServiceError::Shape(format!("expected a list of records, found {}", json_kind(&other))));
        }
    };
    if items.is_empty() {
        warn!("import rejected: empty sequence");
        return Err(ServiceError::Shape("the list of records is empty".into()));
    }

    let checked = match mode {
        ImportValidationMode::FirstElement => 1,
        ImportValidationMode::EveryElement => items.len(),
    };
    for (index, item) in items.iter().enumerate().take(checked) {
        check_fields(index, item)?;
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let rec: CustomerRecord = serde_json::from_value(item)
                .map_err(|e| ServiceError::Shape(format!("record {}: {}", index, e)))?;
            rec.validate().map_err(|e| ServiceError::Shape(format!("record {}: {}", index, e)))?;
            Ok(rec)
        })
        .collect()
}

fn check_fields(index: usize, item: &Value) -> Result<(), ServiceError> {
    let Some(obj) = item.as_object() else {
        return Err(ServiceError::Shape(format!("record {} is {}, not an object", index, json_kind(item))));
    };
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !obj.contains_key(**f)) {
        warn!(index, field = *missing, "import rejected: missing field");
        return Err(ServiceError::Shape(format!("record {} is missing field '{}'", index, missing)));
    }
    Ok(())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// A validated import waiting for confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportPlan {
    current_count: usize,
    incoming: Vec<CustomerRecord>,
}

impl ImportPlan {
    pub fn new(current_count: usize, incoming: Vec<CustomerRecord>) -> Self {
        Self { current_count, incoming }
    }

    /// Records that will be discarded.
    pub fn records_lost(&self) -> usize { self.current_count }

    /// Records that will replace them.
    pub fn records_gained(&self) -> usize { self.incoming.len() }

    pub fn into_records(self) -> Vec<CustomerRecord> { self.incoming }

    /// Prompt text for the confirmation step.
    pub fn summary(&self) -> String {
        format!(
            "Importing will replace {} current record(s) with {} record(s) from the file.",
            self.records_lost(),
            self.records_gained()
        )
    }
}
