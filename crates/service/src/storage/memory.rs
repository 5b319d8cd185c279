use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use models::CustomerRecord;

use super::RecordStorage;
use crate::errors::ServiceError;

/// In-process backend for tests and embedders that persist elsewhere.
///
/// Counts saves and can be switched into a failing mode to exercise error
/// propagation.
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<Vec<CustomerRecord>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    pub fn with_records(records: Vec<CustomerRecord>) -> Self {
        Self { records: Mutex::new(records), ..Default::default() }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize { self.saves.load(Ordering::SeqCst) }

    pub fn set_fail_saves(&self, fail: bool) { self.fail_saves.store(fail, Ordering::SeqCst); }

    /// Last persisted sequence.
    pub fn snapshot(&self) -> Vec<CustomerRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RecordStorage for MemoryStorage {
    async fn load(&self) -> Result<Vec<CustomerRecord>, ServiceError> {
        let records = self.records.lock().map_err(ServiceError::storage)?;
        Ok(records.clone())
    }

    async fn save(&self, records: &[CustomerRecord]) -> Result<(), ServiceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("memory storage configured to fail".into()));
        }
        let mut stored = self.records.lock().map_err(ServiceError::storage)?;
        *stored = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
