//! # Error Types
//!
//! Domain-specific error types for crema-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  crema-core errors (this file)                                         │
//! │  ├── CoreError        - Domain invariant violations                    │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  crema-store errors (separate crate)                                   │
//! │  └── StoreError       - Lookup / fixture failures                      │
//! │                                                                         │
//! │  crema-pos errors (in app)                                             │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Caller    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every validation error names the field it belongs to, so the caller
//!    can render it inline next to that field
//! 3. Invariant errors are raised BEFORE shared state is mutated

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// None of these are fatal: every operation that returns one has left its
/// state exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An order line id that the order does not contain.
    #[error("Line item not found: {0}")]
    LineNotFound(String),

    /// A ledger entry id that the ledger does not contain.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Applying a points effect would drive the balance below zero.
    ///
    /// ## When This Occurs
    /// ```text
    /// Customer points: 20
    ///      │
    ///      ▼
    /// record points_redemption (redeem 50)
    ///      │
    ///      ▼
    /// InsufficientPoints { balance: 20, delta: -50 }
    ///      │
    ///      ▼
    /// Balance stays 20, nothing appended
    /// ```
    /// Also raised when deleting an earning transaction whose points were
    /// already spent.
    #[error("Insufficient points for customer {customer_id}: balance {balance}, change {delta}")]
    InsufficientPoints {
        customer_id: String,
        balance: i64,
        delta: i64,
    },

    /// Applying a points effect would push the balance past what it can hold.
    #[error("Points balance out of range for customer {customer_id}: balance {balance}, change {delta}")]
    PointsOutOfRange {
        customer_id: String,
        balance: i64,
        delta: i64,
    },

    /// Not enough stock on hand for a usage or write-off.
    #[error("Insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    /// Order has exceeded maximum allowed lines.
    #[error("Order cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout on an order without lines.
    #[error("Order is empty")]
    EmptyOrder,

    /// Checkout without a payment method.
    #[error("A payment method must be selected before checkout")]
    PaymentMethodRequired,

    /// One or more field-level failures from the transaction policy or an
    /// entity validator.
    #[error("Validation failed: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    /// Single validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the field-level errors carried by this error, if any.
    pub fn field_errors(&self) -> Vec<&ValidationError> {
        match self {
            CoreError::Invalid(errors) => errors.iter().collect(),
            CoreError::Validation(error) => vec![error],
            _ => Vec::new(),
        }
    }
}

impl From<Vec<ValidationError>> for CoreError {
    fn from(errors: Vec<ValidationError>) -> Self {
        CoreError::Invalid(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
///
/// Caught at the form-submit boundary and surfaced inline next to the
/// offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be strictly negative.
    #[error("{field} must be negative")]
    MustBeNegative { field: String },

    /// Value must be zero.
    #[error("{field} must be zero")]
    MustBeZero { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustBeNonNegative { field: String },

    /// Field must not be supplied at all.
    #[error("{field} is not allowed: {reason}")]
    Forbidden { field: String, reason: String },

    /// Invalid format (e.g., malformed email, unknown id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is well-formed but inconsistent with related data.
    #[error("{field} is invalid: {reason}")]
    Invalid { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustBeNegative { field }
            | ValidationError::MustBeZero { field }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::Forbidden { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Invalid { field, .. } => field,
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn forbidden(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::Forbidden {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
