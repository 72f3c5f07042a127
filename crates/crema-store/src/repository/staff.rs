//! # Staff Repository

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crema_core::validation::validate_staff;
use crema_core::{EmergencyContact, Staff, StaffPatch, StaffRole};

use super::new_id;
use crate::error::{reject_if_any, StoreError, StoreResult};
use crate::store::SharedData;

/// Input for a new staff member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: StaffRole,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    pub hourly_rate_cents: i64,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
}

#[derive(Debug, Clone)]
pub struct StaffRepository {
    data: SharedData,
}

impl StaffRepository {
    pub(crate) fn new(data: SharedData) -> Self {
        StaffRepository { data }
    }

    /// Lists staff sorted by last name.
    pub async fn list(&self, include_inactive: bool) -> Vec<Staff> {
        let data = self.data.read().await;
        let mut staff: Vec<Staff> = data
            .staff
            .iter()
            .filter(|s| include_inactive || s.is_active)
            .cloned()
            .collect();
        staff.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        staff
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Staff> {
        let data = self.data.read().await;
        data.staff.iter().find(|s| s.id == id).cloned()
    }

    pub async fn require(&self, id: &str) -> StoreResult<Staff> {
        self.get_by_id(id)
            .await
            .ok_or_else(|| StoreError::not_found("Staff", id))
    }

    pub async fn create(&self, input: NewStaff) -> StoreResult<Staff> {
        let contact = input.emergency_contact;
        let staff = Staff {
            id: new_id("s"),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            role: input.role,
            hire_date: input.hire_date.unwrap_or_else(|| Utc::now().date_naive()),
            hourly_rate_cents: input.hourly_rate_cents,
            emergency_contact: EmergencyContact {
                name: contact.name.trim().to_string(),
                phone: contact.phone.trim().to_string(),
                relationship: contact.relationship.trim().to_string(),
            },
            is_active: true,
        };
        reject_if_any(validate_staff(&staff))?;

        let mut data = self.data.write().await;
        if data
            .staff
            .iter()
            .any(|s| s.email.eq_ignore_ascii_case(&staff.email))
        {
            return Err(StoreError::duplicate("email", &staff.email));
        }
        data.staff.push(staff.clone());

        info!(staff_id = %staff.id, role = ?staff.role, "Staff member added");
        Ok(staff)
    }

    /// Applies a single-field patch, including nested emergency contact fields.
    pub async fn update(&self, id: &str, patch: StaffPatch) -> StoreResult<Staff> {
        debug!(staff_id = %id, ?patch, "Updating staff member");

        let mut data = self.data.write().await;
        let staff = data
            .staff
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Staff", id))?;

        let mut updated = staff.clone();
        patch.apply(&mut updated)?;
        *staff = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};

    fn new_staff(email: &str) -> NewStaff {
        NewStaff {
            first_name: " Jordan ".to_string(),
            last_name: "Reyes".to_string(),
            email: email.to_string(),
            phone: None,
            role: StaffRole::Barista,
            hire_date: None,
            hourly_rate_cents: 1800,
            emergency_contact: EmergencyContact::default(),
        }
    }

    #[tokio::test]
    async fn test_list_hides_inactive() {
        let repo = Store::new(StoreConfig::new()).await.unwrap().staff();
        assert_eq!(repo.list(false).await.len(), 3);
        assert_eq!(repo.list(true).await.len(), 4);
    }

    #[tokio::test]
    async fn test_create() {
        let repo = Store::new(StoreConfig::new()).await.unwrap().staff();
        let s = repo.create(new_staff("jordan@crema.example")).await.unwrap();
        assert_eq!(s.first_name, "Jordan");
        assert!(s.is_active);

        let err = repo.create(new_staff("MAYA@crema.example")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        let mut bad = new_staff("x@crema.example");
        bad.hourly_rate_cents = -5;
        assert!(repo.create(bad).await.is_err());
    }

    #[tokio::test]
    async fn test_update_nested_contact() {
        let repo = Store::new(StoreConfig::new()).await.unwrap().staff();
        let s = repo
            .update(
                "s-03",
                StaffPatch::EmergencyContactPhone("(555) 020-0177".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(s.emergency_contact.phone, "(555) 020-0177");

        let err = repo
            .update("s-03", StaffPatch::EmergencyContactPhone("12".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(_)));
        assert_eq!(
            repo.require("s-03").await.unwrap().emergency_contact.phone,
            "(555) 020-0177"
        );
    }

    #[tokio::test]
    async fn test_update_unknown() {
        let repo = Store::new(StoreConfig::new()).await.unwrap().staff();
        let err = repo.update("s-99", StaffPatch::IsActive(false)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
