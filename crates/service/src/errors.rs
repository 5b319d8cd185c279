use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("index {index} out of range for store of {len} records")]
    Index { index: usize, len: usize },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("shape error: {0}")]
    Shape(String),
    #[error("import was planned against {planned} records but the store now holds {current}; prepare it again")]
    StaleImport { planned: usize, current: usize },
    #[error("store is empty, nothing to export")]
    EmptyStore,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(id: Uuid) -> Self { Self::NotFound(format!("record {} not found", id)) }

    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) | ServiceError::Model(_) => 1001,
            ServiceError::Index { .. } => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Parse(_) => 1101,
            ServiceError::Shape(_) => 1102,
            ServiceError::EmptyStore => 1103,
            ServiceError::StaleImport { .. } => 1104,
            ServiceError::Storage(_) => 1200,
        }
    }

    /// Errors the user can fix by changing their input; everything else is a bug or I/O fault.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, ServiceError::Index { .. } | ServiceError::NotFound(_) | ServiceError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn codes_are_grouped_by_boundary() {
        assert_eq!(ServiceError::from(ModelError::required("name")).code(), 1001);
        assert_eq!(ServiceError::Index { index: 3, len: 1 }.code(), 1002);
        assert_eq!(ServiceError::Shape("x".into()).code(), 1102);
        assert_eq!(ServiceError::EmptyStore.code(), 1103);
        assert_eq!(ServiceError::StaleImport { planned: 1, current: 2 }.code(), 1104);
    }

    #[test]
    fn index_error_message_names_bounds() {
        let msg = ServiceError::Index { index: 4, len: 2 }.to_string();
        assert!(msg.contains('4') && msg.contains('2'));
        assert!(!ServiceError::Index { index: 4, len: 2 }.is_user_facing());
        assert!(ServiceError::EmptyStore.is_user_facing());
    }
}
