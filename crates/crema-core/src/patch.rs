//! # Field Patches
//!
//! Typed single-field updates for customer and staff profiles.
//!
//! A patch names exactly one field and carries a value of that field's type,
//! so nested fields (the staff emergency contact) are addressed by variant
//! instead of a dotted string path. On the wire a patch looks like:
//!
//! ```json
//! { "field": "emergencyContactPhone", "value": "+1 555 010 9999" }
//! ```
//!
//! The loyalty balance is not part of [`CustomerPatch`]: points
//! only move through the loyalty ledger.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Customer, Staff, StaffRole};
use crate::validation::{
    validate_email, validate_name, validate_notes, validate_phone, validate_price_cents,
    ValidationResult,
};

/// Empty or whitespace-only optional text clears the field.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Customer Patch
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum CustomerPatch {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(Option<String>),
    Notes(Option<String>),
    IsActive(bool),
}

impl CustomerPatch {
    /// Validates the new value and writes it. Leaves the customer untouched
    /// on error.
    pub fn apply(self, customer: &mut Customer) -> ValidationResult<()> {
        match self {
            CustomerPatch::FirstName(v) => {
                validate_name("firstName", &v)?;
                customer.first_name = v.trim().to_string();
            }
            CustomerPatch::LastName(v) => {
                validate_name("lastName", &v)?;
                customer.last_name = v.trim().to_string();
            }
            CustomerPatch::Email(v) => {
                validate_email(&v)?;
                customer.email = v.trim().to_string();
            }
            CustomerPatch::Phone(v) => {
                validate_phone("phone", v.as_deref())?;
                customer.phone = normalize_optional(v);
            }
            CustomerPatch::Notes(v) => {
                validate_notes("notes", v.as_deref())?;
                customer.notes = normalize_optional(v);
            }
            CustomerPatch::IsActive(v) => customer.is_active = v,
        }
        Ok(())
    }
}

// =============================================================================
// Staff Patch
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum StaffPatch {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(Option<String>),
    Role(StaffRole),
    HourlyRateCents(i64),
    EmergencyContactName(String),
    EmergencyContactPhone(String),
    EmergencyContactRelationship(String),
    IsActive(bool),
}

impl StaffPatch {
    pub fn apply(self, staff: &mut Staff) -> ValidationResult<()> {
        match self {
            StaffPatch::FirstName(v) => {
                validate_name("firstName", &v)?;
                staff.first_name = v.trim().to_string();
            }
            StaffPatch::LastName(v) => {
                validate_name("lastName", &v)?;
                staff.last_name = v.trim().to_string();
            }
            StaffPatch::Email(v) => {
                validate_email(&v)?;
                staff.email = v.trim().to_string();
            }
            StaffPatch::Phone(v) => {
                validate_phone("phone", v.as_deref())?;
                staff.phone = normalize_optional(v);
            }
            StaffPatch::Role(role) => staff.role = role,
            StaffPatch::HourlyRateCents(cents) => {
                validate_price_cents("hourlyRate", cents)?;
                staff.hourly_rate_cents = cents;
            }
            StaffPatch::EmergencyContactName(v) => {
                staff.emergency_contact.name = v.trim().to_string();
            }
            StaffPatch::EmergencyContactPhone(v) => {
                validate_phone("emergencyContact.phone", Some(&v))?;
                staff.emergency_contact.phone = v.trim().to_string();
            }
            StaffPatch::EmergencyContactRelationship(v) => {
                staff.emergency_contact.relationship = v.trim().to_string();
            }
            StaffPatch::IsActive(v) => staff.is_active = v,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::EmergencyContact;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 9, 4).unwrap()
    }

    fn staff() -> Staff {
        Staff {
            id: "s-1".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@crema.test".to_string(),
            phone: None,
            role: StaffRole::Barista,
            hire_date: day(),
            hourly_rate_cents: 1850,
            emergency_contact: EmergencyContact::default(),
            is_active: true,
        }
    }

    #[test]
    fn test_customer_patch_from_json() {
        let patch: CustomerPatch =
            serde_json::from_str(r#"{"field":"email","value":"new@example.com"}"#).unwrap();
        let mut customer = Customer::new("c-1", "Ada", "Byron", "ada@example.com", day());

        patch.apply(&mut customer).unwrap();
        assert_eq!(customer.email, "new@example.com");
    }

    #[test]
    fn test_customer_patch_rejects_bad_value() {
        let mut customer = Customer::new("c-1", "Ada", "Byron", "ada@example.com", day());
        let err = CustomerPatch::FirstName("  ".to_string())
            .apply(&mut customer)
            .unwrap_err();

        assert_eq!(err, ValidationError::required("firstName"));
        assert_eq!(customer.first_name, "Ada");
    }

    #[test]
    fn test_points_not_patchable() {
        let result: Result<CustomerPatch, _> =
            serde_json::from_str(r#"{"field":"points","value":500}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_phone_clears() {
        let mut customer = Customer::new("c-1", "Ada", "Byron", "ada@example.com", day());
        customer.phone = Some("555 010 1234".to_string());

        CustomerPatch::Phone(Some("   ".to_string()))
            .apply(&mut customer)
            .unwrap();
        assert_eq!(customer.phone, None);
    }

    #[test]
    fn test_emergency_contact_fields() {
        let mut s = staff();
        let patch: StaffPatch =
            serde_json::from_str(r#"{"field":"emergencyContactName","value":"Alan"}"#).unwrap();
        patch.apply(&mut s).unwrap();
        StaffPatch::EmergencyContactPhone("(555) 010-9999".to_string())
            .apply(&mut s)
            .unwrap();
        StaffPatch::EmergencyContactRelationship("Partner".to_string())
            .apply(&mut s)
            .unwrap();

        assert_eq!(
            s.emergency_contact,
            EmergencyContact {
                name: "Alan".to_string(),
                phone: "(555) 010-9999".to_string(),
                relationship: "Partner".to_string(),
            }
        );
    }

    #[test]
    fn test_staff_rate_and_role() {
        let mut s = staff();
        assert!(StaffPatch::HourlyRateCents(-1).apply(&mut s).is_err());
        assert_eq!(s.hourly_rate_cents, 1850);

        let patch: StaffPatch =
            serde_json::from_str(r#"{"field":"role","value":"shift_lead"}"#).unwrap();
        patch.apply(&mut s).unwrap();
        assert_eq!(s.role, StaffRole::ShiftLead);
    }
}
