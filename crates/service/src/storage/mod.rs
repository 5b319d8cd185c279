//! Persistence collaborators for the record store
//!
//! The store only ever talks to `RecordStorage`; backends decide where the
//! serialized sequence lives.

use async_trait::async_trait;
use models::CustomerRecord;

use crate::errors::ServiceError;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Load/save the full ordered record sequence.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Everything persisted so far; empty when nothing has been saved yet.
    async fn load(&self) -> Result<Vec<CustomerRecord>, ServiceError>;
    /// Overwrite the persisted sequence.
    async fn save(&self, records: &[CustomerRecord]) -> Result<(), ServiceError>;
}

#[async_trait]
impl<S: RecordStorage + ?Sized> RecordStorage for std::sync::Arc<S> {
    async fn load(&self) -> Result<Vec<CustomerRecord>, ServiceError> { (**self).load().await }
    async fn save(&self, records: &[CustomerRecord]) -> Result<(), ServiceError> { (**self).save(records).await }
}
