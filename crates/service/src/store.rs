use std::fmt;

use models::CustomerRecord;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::RecordStorage;
use crate::transfer::ImportPlan;

/// Stable handle for a record while it lives in the store.
///
/// Ids are assigned when a record enters the store (load, add, import) and
/// are never persisted; the snapshot keeps its four-field shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(Uuid);

impl RecordId {
    fn fresh() -> Self { Self(Uuid::new_v4()) }

    pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub record: CustomerRecord,
}

impl StoredRecord {
    fn new(record: CustomerRecord) -> Self { Self { id: RecordId::fresh(), record } }
}

/// Ordered, persisted collection of customer records.
///
/// Positions follow insertion order and shift down on removal. Every
/// mutation writes the whole sequence through the storage collaborator
/// before returning; a failed write is returned as-is and the in-memory
/// change stays applied.
pub struct RecordStore<S> {
    entries: Vec<StoredRecord>,
    storage: S,
}

impl<S: RecordStorage> RecordStore<S> {
    /// Load the persisted sequence once and take ownership of the backend.
    pub async fn open(storage: S) -> Result<Self, ServiceError> {
        let records = storage.load().await?;
        info!(event = "store_open", count = records.len(), "record store loaded");
        Ok(Self { entries: records.into_iter().map(StoredRecord::new).collect(), storage })
    }

    pub fn storage(&self) -> &S { &self.storage }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, index: usize) -> Option<&CustomerRecord> {
        self.entries.get(index).map(|e| &e.record)
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<&CustomerRecord> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.record)
    }

    /// Current position of `id`, if it is still in the store.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn entries(&self) -> &[StoredRecord] { &self.entries }

    /// Records in store order.
    pub fn records(&self) -> impl Iterator<Item = &CustomerRecord> + '_ {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn to_records(&self) -> Vec<CustomerRecord> { self.records().cloned().collect() }

    /// Append and persist; returns the id of the new record.
    pub async fn add(&mut self, record: CustomerRecord) -> Result<RecordId, ServiceError> {
        record.validate()?;
        let entry = StoredRecord::new(record);
        let id = entry.id;
        self.entries.push(entry);
        info!(event = "record_added", %id, index = self.entries.len() - 1, "record added");
        self.persist().await?;
        Ok(id)
    }

    /// Replace the record at `index` in place; the slot keeps its id.
    pub async fn update(&mut self, index: usize, record: CustomerRecord) -> Result<(), ServiceError> {
        let len = self.entries.len();
        let slot = self.entries.get_mut(index).ok_or(ServiceError::Index { index, len })?;
        record.validate()?;
        slot.record = record;
        info!(event = "record_updated", id = %slot.id, index, "record updated");
        self.persist().await
    }

    /// Delete the record at `index`; later records move down one position.
    pub async fn remove(&mut self, index: usize) -> Result<CustomerRecord, ServiceError> {
        let len = self.entries.len();
        if index >= len {
            return Err(ServiceError::Index { index, len });
        }
        let removed = self.entries.remove(index);
        info!(event = "record_removed", id = %removed.id, index, "record removed");
        self.persist().await?;
        Ok(removed.record)
    }

    pub async fn update_by_id(&mut self, id: RecordId, record: CustomerRecord) -> Result<(), ServiceError> {
        let index = self.position(id).ok_or_else(|| ServiceError::not_found(id.as_uuid()))?;
        self.update(index, record).await
    }

    pub async fn remove_by_id(&mut self, id: RecordId) -> Result<CustomerRecord, ServiceError> {
        let index = self.position(id).ok_or_else(|| ServiceError::not_found(id.as_uuid()))?;
        self.remove(index).await
    }

    /// Swap the whole collection after checking it is a non-empty sequence of valid records.
    ///
    /// On a validation failure nothing changes.
    pub async fn replace_all(&mut self, records: Vec<CustomerRecord>) -> Result<(), ServiceError> {
        if records.is_empty() {
            return Err(ServiceError::Shape("replacement sequence is empty".into()));
        }
        for (i, rec) in records.iter().enumerate() {
            rec.validate().map_err(|e| ServiceError::Shape(format!("record {}: {}", i, e)))?;
        }
        let previous = self.entries.len();
        self.entries = records.into_iter().map(StoredRecord::new).collect();
        info!(event = "store_replaced", previous, current = self.entries.len(), "record store replaced");
        self.persist().await
    }

    /// Describe what importing `incoming` would do, for the confirmation step.
    pub fn plan_import(&self, incoming: Vec<CustomerRecord>) -> ImportPlan {
        ImportPlan::new(self.entries.len(), incoming)
    }

    /// Carry out a confirmed import.
    ///
    /// A plan made against a store that has since grown or shrunk is refused,
    /// so the confirmed "records lost" count is never stale.
    pub async fn apply_import(&mut self, plan: ImportPlan) -> Result<(), ServiceError> {
        let current = self.entries.len();
        if plan.records_lost() != current {
            return Err(ServiceError::StaleImport { planned: plan.records_lost(), current });
        }
        self.replace_all(plan.into_records()).await
    }

    async fn persist(&self) -> Result<(), ServiceError> {
        let records = self.to_records();
        self.storage.save(&records).await?;
        debug!(count = records.len(), "store persisted");
        Ok(())
    }
}
