//! # Validation Module
//!
//! Input validation for Crema records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command deserialization (crema-pos)                          │
//! │  └── Type validation (serde)                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field validators: one field, first failure wins                   │
//! │  └── Record validators: every failing field, collected                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Cross-record checks (ids exist, no duplicates)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use crema_core::validation::{validate_email, validate_rating};
//!
//! assert!(validate_email("ada@example.com").is_ok());
//! assert!(validate_rating(6).is_err());
//! ```

use crate::error::ValidationError;
use crate::inventory::InventoryItem;
use crate::types::{Customer, Feedback, Product, Shift, Staff};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length for names and other short labels.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for free-text notes and comments.
pub const MAX_NOTES_LEN: usize = 1000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required short label such as a first name.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
///
/// ## Example
/// ```rust
/// use crema_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("ada@example").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    let malformed = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| malformed("missing @"))?;

    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(malformed("not a valid address"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(malformed("domain must contain a dot"));
    }

    Ok(())
}

/// Validates an optional phone number.
///
/// Digits plus `+ - ( )` and spaces; between 7 and 20 digits.
pub fn validate_phone(field: &str, phone: Option<&str>) -> ValidationResult<()> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(7..=20).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must have between 7 and 20 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates optional free text.
pub fn validate_notes(field: &str, notes: Option<&str>) -> ValidationResult<()> {
    match notes {
        Some(n) if n.chars().count() > MAX_NOTES_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NOTES_LEN,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price or rate in cents.
///
/// ## Example
/// ```rust
/// use crema_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("basePrice", 450).is_ok());
/// assert!(validate_price_cents("basePrice", 0).is_ok());
/// assert!(validate_price_cents("basePrice", -100).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "taxRate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a feedback rating (1 to 5 stars).
pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

fn collect(errors: &mut Vec<ValidationError>, result: ValidationResult<()>) {
    if let Err(e) = result {
        errors.push(e);
    }
}

pub fn validate_product(product: &Product) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    collect(&mut errors, validate_name("name", &product.name));
    collect(&mut errors, validate_name("category", &product.category));
    collect(
        &mut errors,
        validate_price_cents("basePrice", product.base_price_cents),
    );
    errors
}

pub fn validate_customer(customer: &Customer) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    collect(&mut errors, validate_name("firstName", &customer.first_name));
    collect(&mut errors, validate_name("lastName", &customer.last_name));
    collect(&mut errors, validate_email(&customer.email));
    collect(&mut errors, validate_phone("phone", customer.phone.as_deref()));
    collect(&mut errors, validate_notes("notes", customer.notes.as_deref()));
    errors
}

pub fn validate_staff(staff: &Staff) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    collect(&mut errors, validate_name("firstName", &staff.first_name));
    collect(&mut errors, validate_name("lastName", &staff.last_name));
    collect(&mut errors, validate_email(&staff.email));
    collect(&mut errors, validate_phone("phone", staff.phone.as_deref()));
    collect(
        &mut errors,
        validate_price_cents("hourlyRate", staff.hourly_rate_cents),
    );

    let contact = &staff.emergency_contact;
    if !contact.phone.trim().is_empty() {
        collect(
            &mut errors,
            validate_phone("emergencyContact.phone", Some(&contact.phone)),
        );
    }
    errors
}

/// Validates a feedback entry.
///
/// `customer_exists` is resolved by the caller against its customer set.
pub fn validate_feedback(feedback: &Feedback, customer_exists: bool) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if feedback.customer_id.trim().is_empty() {
        errors.push(ValidationError::required("customerId"));
    } else if !customer_exists {
        errors.push(ValidationError::invalid("customerId", "unknown customer"));
    }
    collect(&mut errors, validate_rating(feedback.rating));
    collect(&mut errors, validate_notes("comment", Some(&feedback.comment)));
    errors
}

/// Validates a shift against its staff member and that member's other shifts.
///
/// ## Rules
/// - End time strictly after start time
/// - Staff member exists and is active
/// - No overlap with another shift of the same staff member on that date
///   (a shift with the same id is the one being replaced and is skipped)
pub fn validate_shift<'a, I>(shift: &Shift, staff: Option<&Staff>, others: I) -> Vec<ValidationError>
where
    I: IntoIterator<Item = &'a Shift>,
{
    let mut errors = Vec::new();

    if shift.end_time <= shift.start_time {
        errors.push(ValidationError::invalid(
            "endTime",
            "must be after the start time",
        ));
    }

    match staff {
        None => errors.push(ValidationError::invalid("staffId", "unknown staff member")),
        Some(s) if !s.is_active => {
            errors.push(ValidationError::invalid("staffId", "staff member is inactive"))
        }
        Some(_) => {}
    }

    let clash = others
        .into_iter()
        .filter(|other| other.id != shift.id && other.staff_id == shift.staff_id)
        .find(|other| other.overlaps(shift));
    if let Some(other) = clash {
        errors.push(ValidationError::invalid(
            "startTime",
            format!(
                "overlaps shift {} ({}-{})",
                other.id,
                other.start_time.format("%H:%M"),
                other.end_time.format("%H:%M")
            ),
        ));
    }

    collect(&mut errors, validate_notes("notes", shift.notes.as_deref()));
    errors
}

pub fn validate_inventory_item(item: &InventoryItem) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    collect(&mut errors, validate_name("name", &item.name));
    collect(&mut errors, validate_name("unit", &item.unit));
    collect(
        &mut errors,
        validate_price_cents("unitCost", item.unit_cost_cents),
    );
    if item.reorder_level < 0 {
        errors.push(ValidationError::MustBeNonNegative {
            field: "reorderLevel".to_string(),
        });
    }
    errors
}

// =============================================================================
// Unit Tests
// =============================================================================
