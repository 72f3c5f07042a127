//! # Customer Commands
//!
//! Loyalty customer profiles. Points are read-only here; they move through
//! the transaction commands.

use serde::Serialize;
use tracing::{debug, info};

use crema_core::{Customer, CustomerPatch};
use crema_store::{NewCustomer, PointsCheck};

use crate::error::ApiError;
use crate::state::StoreState;

/// Result of a whole-store balance check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAudit {
    pub checked: usize,
    pub repaired: Vec<PointsCheck>,
}

pub async fn list_customers(store: &StoreState, include_inactive: bool) -> Vec<Customer> {
    debug!(include_inactive, "list_customers command");
    store.inner().customers().list(include_inactive).await
}

/// Searches by name, email or phone.
pub async fn search_customers(store: &StoreState, query: String) -> Vec<Customer> {
    debug!(query = %query, "search_customers command");
    store.inner().customers().search(&query).await
}

pub async fn get_customer(store: &StoreState, id: String) -> Result<Customer, ApiError> {
    Ok(store.inner().customers().require(&id).await?)
}

pub async fn create_customer(store: &StoreState, input: NewCustomer) -> Result<Customer, ApiError> {
    debug!(email = %input.email, "create_customer command");
    Ok(store.inner().customers().create(input).await?)
}

/// Applies a single-field edit.
pub async fn update_customer(
    store: &StoreState,
    id: String,
    patch: CustomerPatch,
) -> Result<Customer, ApiError> {
    debug!(customer_id = %id, ?patch, "update_customer command");
    Ok(store.inner().customers().update(&id, patch).await?)
}

/// Recomputes one customer's balance from their history.
pub async fn recompute_points(store: &StoreState, id: String) -> Result<PointsCheck, ApiError> {
    debug!(customer_id = %id, "recompute_points command");
    Ok(store.inner().customers().recompute_points(&id).await?)
}

/// Checks every balance against the ledger and repairs the ones that drifted.
pub async fn check_points(store: &StoreState) -> Result<PointsAudit, ApiError> {
    let customers = store.inner().customers();
    let checked = customers.list(true).await.len();

    let mut repaired = Vec::new();
    for id in customers.find_drifted().await {
        repaired.push(customers.recompute_points(&id).await?);
    }

    info!(checked, repaired = repaired.len(), "Points audit finished");
    Ok(PointsAudit { checked, repaired })
}
