//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Crema POS                              │
//! │                                                                         │
//! │  Caller                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  {"cmd":"record_transaction", ...}                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Lookup Error? ─── StoreError::NotFound ───────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule Error? ─── CoreError::Invalid([...]) ────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  {"ok":false,"error":{"code":"VALIDATION_ERROR",                        │
//! │    "message":"...","fieldErrors":[{"field":"orderId",...}]}}            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field-level failures are never flattened into the message alone: each one
//! is carried in `fieldErrors` so a form can show it next to its input.

use serde::Serialize;

use crema_core::{CoreError, ValidationError};
use crema_store::StoreError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: c-9999",
///   "fieldErrors": []
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// One entry per offending field.
    pub field_errors: Vec<FieldError>,
}

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request line was not a valid command.
    BadRequest,

    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// A unique value is already taken
    Duplicate,

    /// Order operation failed (unknown line, limits, empty order)
    OrderError,

    /// Checkout without a payment method
    PaymentError,

    /// Points balance would go negative
    InsufficientPoints,

    /// Stock would go negative
    InsufficientStock,

    /// Fixture or startup failure
    DataError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error for one field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError {
            code: ErrorCode::ValidationError,
            message: format!("{}: {}", field, message),
            field_errors: vec![FieldError {
                field: field.to_string(),
                message,
            }],
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn from_validation(message: String, errors: &[&ValidationError]) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message,
            field_errors: errors.iter().map(|e| FieldError::from(*e)).collect(),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::LineNotFound(id) => ApiError::not_found("Line item", &id),
            CoreError::TransactionNotFound(id) => ApiError::not_found("Transaction", &id),
            CoreError::InsufficientPoints { .. } => {
                ApiError::new(ErrorCode::InsufficientPoints, message)
            }
            CoreError::PointsOutOfRange { .. } => {
                ApiError::new(ErrorCode::ValidationError, message)
            }
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, message)
            }
            CoreError::CartTooLarge { .. } | CoreError::EmptyOrder => {
                ApiError::new(ErrorCode::OrderError, message)
            }
            CoreError::QuantityTooLarge { .. } => {
                let mut api = ApiError::new(ErrorCode::OrderError, message);
                api.field_errors.push(FieldError {
                    field: "quantity".to_string(),
                    message: api.message.clone(),
                });
                api
            }
            CoreError::PaymentMethodRequired => ApiError::new(ErrorCode::PaymentError, message),
            CoreError::Invalid(ref errors) => {
                let refs: Vec<&ValidationError> = errors.iter().collect();
                ApiError::from_validation(message, &refs)
            }
            CoreError::Validation(ref e) => ApiError::from_validation(message, &[e]),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::from(CoreError::Validation(err))
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Duplicate { ref field, .. } => {
                let mut api = ApiError::new(ErrorCode::Duplicate, err.to_string());
                api.field_errors.push(FieldError {
                    field: field.clone(),
                    message: "already exists".to_string(),
                });
                api
            }
            StoreError::FixtureRead { .. }
            | StoreError::FixtureParse { .. }
            | StoreError::FixtureIntegrity(_) => {
                tracing::error!("Fixture error: {}", err);
                ApiError::new(ErrorCode::DataError, err.to_string())
            }
            StoreError::Core(e) => ApiError::from(e),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejection_keeps_every_field() {
        let err = CoreError::Invalid(vec![
            ValidationError::required("orderId"),
            ValidationError::MustBePositive {
                field: "amount".to_string(),
            },
        ]);
        let api = ApiError::from(StoreError::from(err));

        assert_eq!(api.code, ErrorCode::ValidationError);
        let fields: Vec<&str> = api.field_errors.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["orderId", "amount"]);
    }

    #[test]
    fn test_serialized_shape() {
        let api = ApiError::from(StoreError::not_found("Customer", "c-9"));
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Customer not found: c-9");
        assert!(json["fieldErrors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_insufficient_points_code() {
        let api = ApiError::from(CoreError::InsufficientPoints {
            customer_id: "c-1".to_string(),
            balance: 5,
            delta: -10,
        });
        assert_eq!(api.code, ErrorCode::InsufficientPoints);
    }

    #[test]
    fn test_duplicate_names_field() {
        let api = ApiError::from(StoreError::duplicate("email", "a@b.co"));
        assert_eq!(api.code, ErrorCode::Duplicate);
        assert_eq!(api.field_errors[0].field, "email");
    }
}
