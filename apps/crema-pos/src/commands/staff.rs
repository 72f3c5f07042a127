//! # Staff & Shift Commands
//!
//! Staff profiles and the shift schedule.
//!
//! A shift is checked against its staff member (must exist and be active)
//! and against that member's other shifts on the same day (no overlap).

use chrono::NaiveDate;
use tracing::debug;

use crema_core::{Shift, Staff, StaffPatch};
use crema_store::{NewShift, NewStaff};

use crate::error::ApiError;
use crate::state::StoreState;

// =============================================================================
// Staff
// =============================================================================

pub async fn list_staff(store: &StoreState, include_inactive: bool) -> Vec<Staff> {
    debug!(include_inactive, "list_staff command");
    store.inner().staff().list(include_inactive).await
}

pub async fn get_staff(store: &StoreState, id: String) -> Result<Staff, ApiError> {
    Ok(store.inner().staff().require(&id).await?)
}

pub async fn create_staff(store: &StoreState, input: NewStaff) -> Result<Staff, ApiError> {
    debug!(email = %input.email, role = ?input.role, "create_staff command");
    Ok(store.inner().staff().create(input).await?)
}

/// Applies a single-field edit, including the nested emergency contact.
pub async fn update_staff(
    store: &StoreState,
    id: String,
    patch: StaffPatch,
) -> Result<Staff, ApiError> {
    debug!(staff_id = %id, ?patch, "update_staff command");
    Ok(store.inner().staff().update(&id, patch).await?)
}

// =============================================================================
// Shifts
// =============================================================================

/// Lists shifts by date and start time.
pub async fn list_shifts(
    store: &StoreState,
    date: Option<NaiveDate>,
    staff_id: Option<String>,
) -> Vec<Shift> {
    debug!(?date, staff_id = ?staff_id, "list_shifts command");
    store.inner().shifts().list(date, staff_id.as_deref()).await
}

pub async fn schedule_shift(store: &StoreState, input: NewShift) -> Result<Shift, ApiError> {
    debug!(staff_id = %input.staff_id, date = %input.date, "schedule_shift command");
    Ok(store.inner().shifts().schedule(input).await?)
}

pub async fn update_shift(store: &StoreState, id: String, input: NewShift) -> Result<Shift, ApiError> {
    debug!(shift_id = %id, "update_shift command");
    Ok(store.inner().shifts().update(&id, input).await?)
}

pub async fn delete_shift(store: &StoreState, id: String) -> Result<Shift, ApiError> {
    debug!(shift_id = %id, "delete_shift command");
    Ok(store.inner().shifts().delete(&id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::NaiveTime;
    use crema_core::StaffRole;
    use crema_store::{Store, StoreConfig};

    async fn store() -> StoreState {
        StoreState::new(Store::new(StoreConfig::new()).await.unwrap())
    }

    #[tokio::test]
    async fn test_overlapping_shift_rejected() {
        let store = store().await;
        let input = NewShift {
            staff_id: "s-01".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            position: StaffRole::Manager,
            notes: None,
        };

        let err = schedule_shift(&store, input).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field_errors[0].field, "startTime");
    }

    #[tokio::test]
    async fn test_emergency_contact_patch() {
        let store = store().await;
        let staff = update_staff(
            &store,
            "s-02".to_string(),
            StaffPatch::EmergencyContactRelationship("Sister".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(staff.emergency_contact.relationship, "Sister");
        assert_eq!(staff.emergency_contact.name, "Aiko Nakamura");
    }
}
