//! Form-level operations over a record store.
//!
//! `Tracker` bundles the store with the settings every view needs (cost
//! table, alert window, import strictness) so front ends only deal with raw
//! input and ready-made view models.

use chrono::NaiveDate;
use configs::{AppConfig, ImportValidationMode};
use models::{errors::ModelError, CustomerInput, CustomerRecord};
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::finance::{summarize, CostTable, Dashboard};
use crate::presenter::{format_date, list_rows, ListRow};
use crate::query::query;
use crate::schedule::AlertWindow;
use crate::storage::RecordStorage;
use crate::store::{RecordId, RecordStore};
use crate::transfer::{export_snapshot, parse_import, ImportPlan};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerSettings {
    pub costs: CostTable,
    pub window: AlertWindow,
    pub import_validation: ImportValidationMode,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            costs: CostTable::default(),
            window: AlertWindow::default(),
            import_validation: ImportValidationMode::default(),
        }
    }
}

impl TrackerSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            costs: CostTable::from_config(&cfg.costs),
            window: AlertWindow(cfg.tracker.alert_window_days),
            import_validation: cfg.tracker.import_validation,
        }
    }
}

pub struct Tracker<S> {
    store: RecordStore<S>,
    settings: TrackerSettings,
}

fn invalid(e: ModelError) -> ServiceError {
    match e {
        ModelError::Validation(msg) => ServiceError::Validation(msg),
    }
}

impl<S: RecordStorage> Tracker<S> {
    pub async fn open(storage: S, settings: TrackerSettings) -> Result<Self, ServiceError> {
        let store = RecordStore::open(storage).await?;
        Ok(Self { store, settings })
    }

    pub fn store(&self) -> &RecordStore<S> { &self.store }

    pub fn settings(&self) -> &TrackerSettings { &self.settings }

    /// Validate a new-customer form and append it.
    pub async fn submit(&mut self, input: CustomerInput) -> Result<RecordId, ServiceError> {
        let record = input.into_record().map_err(|e| {
            warn!(error = %e, "form rejected");
            invalid(e)
        })?;
        self.store.add(record).await
    }

    /// Validate an edit form and write it over the record at `index`.
    pub async fn edit(&mut self, index: usize, input: CustomerInput) -> Result<(), ServiceError> {
        let record = input.into_record().map_err(invalid)?;
        self.store.update(index, record).await
    }

    /// Prefill values for an edit form.
    pub fn edit_form(&self, index: usize) -> Result<CustomerInput, ServiceError> {
        let rec = self.store.get(index).ok_or(ServiceError::Index { index, len: self.store.len() })?;
        Ok(CustomerInput {
            name: rec.name.clone(),
            due_date: rec.due_date.format(models::DATE_FORMAT).to_string(),
            service_type: rec.service_type.as_str().to_string(),
            monthly_fee: rec.monthly_fee.to_string(),
        })
    }

    /// Confirmation text naming the customer at `index`, shown before [`Tracker::delete`].
    pub fn delete_prompt(&self, index: usize) -> Result<String, ServiceError> {
        let rec = self.store.get(index).ok_or(ServiceError::Index { index, len: self.store.len() })?;
        Ok(format!("Remove customer \"{}\" (due {})?", rec.name, format_date(rec.due_date)))
    }

    pub async fn delete(&mut self, index: usize) -> Result<CustomerRecord, ServiceError> {
        self.store.remove(index).await
    }

    pub fn list(&self, search: &str, today: NaiveDate) -> Vec<ListRow> {
        list_rows(&query(self.store.entries(), search), today, self.settings.window)
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        summarize(self.store.records(), &self.settings.costs, today, self.settings.window)
    }

    pub fn export(&self) -> Result<String, ServiceError> {
        export_snapshot(self.store.records())
    }

    /// Validate an import document; nothing changes until [`Tracker::confirm_import`].
    pub fn prepare_import(&self, text: &str) -> Result<ImportPlan, ServiceError> {
        let incoming = parse_import(text, self.settings.import_validation)?;
        Ok(self.store.plan_import(incoming))
    }

    pub async fn confirm_import(&mut self, plan: ImportPlan) -> Result<(), ServiceError> {
        let (lost, gained) = (plan.records_lost(), plan.records_gained());
        self.store.apply_import(plan).await?;
        info!(event = "import_applied", lost, gained, "import applied");
        Ok(())
    }
}
