use std::path::PathBuf;

use chrono::NaiveDate;
use configs::ImportValidationMode;
use models::CustomerInput;
use rust_decimal::Decimal;
use service::schedule::Severity;
use service::storage::{JsonFileStorage, RecordStorage};
use service::{ServiceError, Tracker, TrackerSettings};
use uuid::Uuid;

struct TempData {
    dir: PathBuf,
}

impl TempData {
    fn new() -> Self {
        Self { dir: std::env::temp_dir().join(format!("tracker_flow_{}", Uuid::new_v4())) }
    }

    fn storage(&self) -> JsonFileStorage { JsonFileStorage::new(self.dir.join("renewals.json"), "renewals") }
}

impl Drop for TempData {
    fn drop(&mut self) { let _ = std::fs::remove_dir_all(&self.dir); }
}

fn form(name: &str, due: &str, service: &str, fee: &str) -> CustomerInput {
    CustomerInput { name: name.into(), due_date: due.into(), service_type: service.into(), monthly_fee: fee.into() }
}

fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 8).unwrap() }

#[tokio::test]
async fn records_persist_across_reopen() -> anyhow::Result<()> {
    let data = TempData::new();
    {
        let mut t = Tracker::open(data.storage(), TrackerSettings::default()).await?;
        t.submit(form("Ana", "2024-01-10", "iptv", "30.00")).await?;
        t.submit(form("Bruno", "2024-01-05", "unitv", "25")).await?;
        t.submit(form("Caio", "2024-03-01", "", "")).await?;
        t.delete(1).await?;
    }

    let t = Tracker::open(data.storage(), TrackerSettings::default()).await?;
    let rows = t.list("", today());
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Ana", "Caio"]);
    assert_eq!(rows[1].service, "N/A");
    assert_eq!(rows[1].status.severity, Severity::Ok);

    let d = t.dashboard(today());
    assert_eq!(d.monthly_profit, Decimal::from(20));
    assert_eq!(d.active_count, 2);
    assert_eq!(d.overdue_count, 0);
    Ok(())
}

#[tokio::test]
async fn export_import_round_trip_through_files() -> anyhow::Result<()> {
    let source = TempData::new();
    let mut t = Tracker::open(source.storage(), TrackerSettings::default()).await?;
    t.submit(form("Ana", "2024-01-10", "iptv", "30")).await?;
    t.submit(form("Bia", "2023-12-20", "unitv", "12")).await?;
    let snapshot = t.export()?;

    let target = TempData::new();
    let mut other = Tracker::open(target.storage(), TrackerSettings::default()).await?;
    other.submit(form("Placeholder", "2024-02-01", "", "")).await?;
    let plan = other.prepare_import(&snapshot)?;
    assert_eq!(plan.records_lost(), 1);
    assert_eq!(plan.records_gained(), 2);
    other.confirm_import(plan).await?;

    assert_eq!(other.store().to_records(), t.store().to_records());
    assert_eq!(target.storage().load().await?, t.store().to_records());

    let d = other.dashboard(today());
    assert_eq!(d.overdue_count, 1);
    // fee equal to cost contributes nothing
    assert_eq!(d.monthly_profit, Decimal::from(20));
    Ok(())
}

#[tokio::test]
async fn object_document_is_rejected_and_store_kept() -> anyhow::Result<()> {
    let data = TempData::new();
    let mut t = Tracker::open(data.storage(), TrackerSettings::default()).await?;
    t.submit(form("Ana", "2024-01-10", "iptv", "30")).await?;
    let before = data.storage().load().await?;

    let err = t.prepare_import(r#"{"name":"Ana","dueDate":"2024-01-10"}"#).unwrap_err();
    assert!(matches!(err, ServiceError::Shape(_)));
    assert!(matches!(t.prepare_import("not json").unwrap_err(), ServiceError::Parse(_)));

    assert_eq!(t.store().len(), 1);
    assert_eq!(data.storage().load().await?, before);
    Ok(())
}

#[tokio::test]
async fn first_element_mode_tolerates_legacy_tail() -> anyhow::Result<()> {
    let data = TempData::new();
    let settings = TrackerSettings { import_validation: ImportValidationMode::FirstElement, ..TrackerSettings::default() };
    let mut t = Tracker::open(data.storage(), settings).await?;
    let doc = r#"[
        {"name":"Ana","dueDate":"2024-01-10","serviceType":"iptv","monthlyFee":30},
        {"name":"Old","dueDate":"2024-01-09"}
    ]"#;
    let plan = t.prepare_import(doc)?;
    t.confirm_import(plan).await?;
    let rows = t.list("old", today());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].fee, "R$ 0,00");
    assert_eq!(rows[0].original_index, 1);
    Ok(())
}

#[tokio::test]
async fn stale_index_fails_loudly() -> anyhow::Result<()> {
    let data = TempData::new();
    let mut t = Tracker::open(data.storage(), TrackerSettings::default()).await?;
    t.submit(form("Ana", "2024-01-10", "iptv", "30")).await?;
    t.delete(0).await?;
    assert!(matches!(t.delete(0).await, Err(ServiceError::Index { index: 0, len: 0 })));
    assert!(matches!(t.edit(0, form("X", "2024-01-01", "", "")).await, Err(ServiceError::Index { .. })));
    Ok(())
}

#[tokio::test]
async fn oversized_fee_is_refused_and_data_file_stays_readable() -> anyhow::Result<()> {
    let data = TempData::new();
    let mut t = Tracker::open(data.storage(), TrackerSettings::default()).await?;
    t.submit(form("Ana", "2024-01-10", "iptv", "999999999,99")).await?;
    let err = t.submit(form("Bia", "2024-01-11", "iptv", "79228162514264337593543950335")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "{err}");
    assert!(matches!(t.submit(form("Caio", "2024-01-12", "", "10,005")).await, Err(ServiceError::Validation(_))));

    let reopened = Tracker::open(data.storage(), TrackerSettings::default()).await?;
    assert_eq!(reopened.store().to_records(), t.store().to_records());
    assert_eq!(reopened.store().get(0).map(|r| r.monthly_fee), Some(Decimal::new(99_999_999_999, 2)));
    Ok(())
}
