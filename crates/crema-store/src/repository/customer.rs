//! # Customer Repository
//!
//! Loyalty customer profiles.
//!
//! Profile fields change only through [`CustomerPatch`]; the points balance
//! is read-only here and moves through the transaction repository.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crema_core::validation::validate_customer;
use crema_core::{Customer, CustomerPatch};

use super::{matches_query, new_id};
use crate::error::{reject_if_any, StoreError, StoreResult};
use crate::store::SharedData;

/// Input for a new customer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Defaults to today.
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
}

/// Outcome of checking a balance against its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsCheck {
    pub customer_id: String,
    pub stored: i64,
    pub expected: i64,
    pub repaired: bool,
}

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    data: SharedData,
}

impl CustomerRepository {
    pub(crate) fn new(data: SharedData) -> Self {
        CustomerRepository { data }
    }

    /// Lists customers sorted by last name, then first name.
    pub async fn list(&self, include_inactive: bool) -> Vec<Customer> {
        let data = self.data.read().await;
        let mut customers: Vec<Customer> = data
            .customers
            .iter()
            .filter(|c| include_inactive || c.is_active)
            .cloned()
            .collect();
        customers.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        customers
    }

    /// Finds active customers by name, email or phone.
    pub async fn search(&self, query: &str) -> Vec<Customer> {
        self.list(false)
            .await
            .into_iter()
            .filter(|c| {
                let full_name = c.full_name();
                matches_query(
                    query,
                    [
                        full_name.as_str(),
                        c.email.as_str(),
                        c.phone.as_deref().unwrap_or(""),
                    ],
                )
            })
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Customer> {
        let data = self.data.read().await;
        data.customers.iter().find(|c| c.id == id).cloned()
    }

    pub async fn require(&self, id: &str) -> StoreResult<Customer> {
        self.get_by_id(id)
            .await
            .ok_or_else(|| StoreError::not_found("Customer", id))
    }

    /// Creates an active customer with a zero balance.
    pub async fn create(&self, input: NewCustomer) -> StoreResult<Customer> {
        let join_date = input.join_date.unwrap_or_else(|| Utc::now().date_naive());
        let mut customer = Customer::new(
            new_id("c"),
            input.first_name.trim(),
            input.last_name.trim(),
            input.email.trim(),
            join_date,
        );
        customer.phone = input.phone.filter(|p| !p.trim().is_empty());
        customer.notes = input.notes.filter(|n| !n.trim().is_empty());
        reject_if_any(validate_customer(&customer))?;

        let mut data = self.data.write().await;
        ensure_unique_email(&data.customers, &customer.email, None)?;
        data.customers.push(customer.clone());

        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Applies a single-field patch.
    pub async fn update(&self, id: &str, patch: CustomerPatch) -> StoreResult<Customer> {
        debug!(customer_id = %id, ?patch, "Updating customer");

        let mut data = self.data.write().await;
        let index = data
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("Customer", id))?;

        let mut updated = data.customers[index].clone();
        patch.apply(&mut updated)?;
        ensure_unique_email(&data.customers, &updated.email, Some(id))?;

        data.customers[index] = updated.clone();
        Ok(updated)
    }

    /// Recomputes a customer's balance from the ledger, repairing it if it
    /// has drifted.
    pub async fn recompute_points(&self, id: &str) -> StoreResult<PointsCheck> {
        let mut data = self.data.write().await;
        let crate::store::StoreData {
            customers, loyalty, ..
        } = &mut *data;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("Customer", id))?;

        let stored = customer.points();
        let repaired = loyalty.reconcile(customer).is_some();
        if repaired {
            warn!(
                customer_id = %id,
                stored,
                expected = customer.points(),
                "Points balance repaired from history"
            );
        }

        Ok(PointsCheck {
            customer_id: id.to_string(),
            stored,
            expected: customer.points(),
            repaired,
        })
    }

    /// Ids of customers whose balance disagrees with the ledger.
    pub async fn find_drifted(&self) -> Vec<String> {
        let data = self.data.read().await;
        data.customers
            .iter()
            .filter(|c| !data.loyalty.verify(c))
            .map(|c| c.id.clone())
            .collect()
    }
}

fn ensure_unique_email(customers: &[Customer], email: &str, except: Option<&str>) -> StoreResult<()> {
    let taken = customers
        .iter()
        .filter(|c| Some(c.id.as_str()) != except)
        .any(|c| c.email.eq_ignore_ascii_case(email));
    if taken {
        return Err(StoreError::duplicate("email", email));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};
    use crema_core::{CoreError, TransactionDraft, TransactionType};

    async fn store() -> Store {
        Store::new(StoreConfig::new()).await.unwrap()
    }

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            first_name: "Mary".to_string(),
            last_name: "Jackson".to_string(),
            email: email.to_string(),
            phone: Some("  ".to_string()),
            notes: None,
            join_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_starts_at_zero_points() {
        let repo = store().await.customers();
        let c = repo.create(new_customer("mary@example.com")).await.unwrap();

        assert_eq!(c.points(), 0);
        assert!(c.is_active);
        assert_eq!(c.phone, None);
        assert!(c.id.starts_with("c-"));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = store().await.customers();
        let err = repo
            .create(new_customer("ADA.BYRON@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_create_collects_field_errors() {
        let repo = store().await.customers();
        let mut input = new_customer("not-an-email");
        input.first_name = String::new();

        match repo.create(input).await.unwrap_err() {
            StoreError::Core(CoreError::Invalid(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_update_patch() {
        let repo = store().await.customers();
        let c = repo
            .update("c-1002", CustomerPatch::Notes(Some("Decaf only".to_string())))
            .await
            .unwrap();
        assert_eq!(c.notes.as_deref(), Some("Decaf only"));

        let err = repo
            .update(
                "c-1002",
                CustomerPatch::Email("alan.turing@example.com".to_string()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // keeping one's own email is not a duplicate
        repo.update(
            "c-1002",
            CustomerPatch::Email("grace.hopper@example.com".to_string()),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_search() {
        let repo = store().await.customers();
        let found = repo.search("turing").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "c-1003");

        // inactive customers are not offered
        assert!(repo.search("katherine").await.is_empty());
    }

    #[tokio::test]
    async fn test_recompute_points_is_noop_when_consistent() {
        let store = store().await;
        let mut draft = TransactionDraft::new(
            "c-1001",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            TransactionType::PointsRedemption,
        );
        draft.points_redeemed = 8;
        store.transactions().record(draft).await.unwrap();

        let check = store.customers().recompute_points("c-1001").await.unwrap();
        assert_eq!(check.stored, 40);
        assert_eq!(check.expected, 40);
        assert!(!check.repaired);
        assert!(store.customers().find_drifted().await.is_empty());
    }
}
