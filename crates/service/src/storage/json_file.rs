use std::path::PathBuf;

use async_trait::async_trait;
use models::CustomerRecord;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::debug;

use super::RecordStorage;
use crate::errors::ServiceError;

/// JSON file holding an object of `storage key -> record array`.
///
/// Only the configured key is read or written; any other keys already in the
/// file are carried through untouched on save.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    file_path: PathBuf,
    key: String,
}

impl JsonFileStorage {
    pub fn new<P: Into<PathBuf>>(path: P, key: impl Into<String>) -> Self {
        Self { file_path: path.into(), key: key.into() }
    }

    async fn read_map(&self) -> Result<Map<String, Value>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(ServiceError::storage(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        match serde_json::from_slice::<Value>(&bytes).map_err(ServiceError::storage)? {
            Value::Object(map) => Ok(map),
            _ => Err(ServiceError::Storage(format!(
                "{} does not contain a JSON object",
                self.file_path.display()
            ))),
        }
    }
}

#[async_trait]
impl RecordStorage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<CustomerRecord>, ServiceError> {
        let mut map = self.read_map().await?;
        let records = match map.remove(&self.key) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(ServiceError::storage)?,
        };
        debug!(path = %self.file_path.display(), key = %self.key, count = records.len(), "records loaded");
        Ok(records)
    }

    async fn save(&self, records: &[CustomerRecord]) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }
        let mut map = self.read_map().await?;
        map.insert(self.key.clone(), serde_json::to_value(records).map_err(ServiceError::storage)?);
        let data = serde_json::to_vec(&map).map_err(ServiceError::storage)?;
        fs::write(&self.file_path, data).await.map_err(ServiceError::storage)?;
        debug!(path = %self.file_path.display(), key = %self.key, count = records.len(), "records saved");
        Ok(())
    }
}
