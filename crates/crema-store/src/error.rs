//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (crema-core) / fixture I/O                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds lookup context                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in crema-pos) ← Serialized for the caller                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crema_core::{CoreError, ValidationError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in the store.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A record with the same unique value already exists.
    ///
    /// ## When This Occurs
    /// - Inserting a record whose id is taken
    /// - Two customers with the same email
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A fixture file could not be read.
    #[error("Failed to read fixture {path}: {message}")]
    FixtureRead { path: String, message: String },

    /// A fixture file is not valid JSON for its record type.
    #[error("Failed to parse fixture {file}: {message}")]
    FixtureParse { file: String, message: String },

    /// Fixture records reference each other inconsistently.
    #[error("Inconsistent fixtures: {0}")]
    FixtureIntegrity(String),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

impl From<Vec<ValidationError>> for StoreError {
    fn from(errors: Vec<ValidationError>) -> Self {
        StoreError::Core(CoreError::Invalid(errors))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Turns a collected list of field errors into a result.
pub(crate) fn reject_if_any(errors: Vec<ValidationError>) -> StoreResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            StoreError::not_found("Customer", "c-9").to_string(),
            "Customer not found: c-9"
        );
        assert_eq!(
            StoreError::duplicate("email", "ada@example.com").to_string(),
            "Duplicate email: 'ada@example.com' already exists"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err = StoreError::from(CoreError::EmptyOrder);
        assert_eq!(err.to_string(), "Order is empty");
    }

    #[test]
    fn test_reject_if_any() {
        assert!(reject_if_any(Vec::new()).is_ok());
        let err = reject_if_any(vec![ValidationError::required("email")]).unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Invalid(ref e)) if e.len() == 1));
    }
}
