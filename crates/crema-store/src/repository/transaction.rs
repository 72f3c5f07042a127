//! # Transaction Repository
//!
//! The loyalty ledger as seen from the outside.
//!
//! ## Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record / edit / delete                                                 │
//! │                                                                         │
//! │  write lock ──► find customer ──► LoyaltyLedger op ──► unlock          │
//! │                                        │                                │
//! │                         policy check, balance check                     │
//! │                         then entry + balance updated together           │
//! │                                                                         │
//! │  Two records for the same customer can never interleave, and a         │
//! │  rejected operation leaves both the ledger and the balance as they     │
//! │  were.                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use crema_core::{CustomerTransaction, TransactionDraft};

use crate::error::{StoreError, StoreResult};
use crate::store::{SharedData, StoreData};

#[derive(Debug, Clone)]
pub struct TransactionRepository {
    data: SharedData,
}

impl TransactionRepository {
    pub(crate) fn new(data: SharedData) -> Self {
        TransactionRepository { data }
    }

    /// A customer's history, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> StoreResult<Vec<CustomerTransaction>> {
        let data = self.data.read().await;
        if !data.customers.iter().any(|c| c.id == customer_id) {
            return Err(StoreError::not_found("Customer", customer_id));
        }

        let mut history: Vec<CustomerTransaction> =
            data.loyalty.for_customer(customer_id).cloned().collect();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(history)
    }

    pub async fn get_by_id(&self, id: &str) -> Option<CustomerTransaction> {
        let data = self.data.read().await;
        data.loyalty.get(id).cloned()
    }

    /// Validates and records a draft, moving the customer's balance.
    pub async fn record(&self, draft: TransactionDraft) -> StoreResult<CustomerTransaction> {
        debug!(customer_id = %draft.customer_id, tx_type = %draft.tx_type, "Recording transaction");

        let mut data = self.data.write().await;
        let StoreData {
            customers, loyalty, ..
        } = &mut *data;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == draft.customer_id)
            .ok_or_else(|| StoreError::not_found("Customer", &draft.customer_id))?;

        let tx = loyalty.record(customer, draft)?;
        info!(
            tx_id = %tx.id,
            customer_id = %tx.customer_id,
            tx_type = %tx.tx_type,
            delta = tx.points_delta(),
            balance = customer.points(),
            "Transaction recorded"
        );
        Ok(tx)
    }

    /// Replaces an entry with a re-validated draft under the same id.
    pub async fn edit(&self, id: &str, draft: TransactionDraft) -> StoreResult<CustomerTransaction> {
        let mut data = self.data.write().await;
        let StoreData {
            customers, loyalty, ..
        } = &mut *data;

        let owner = loyalty
            .get(id)
            .map(|tx| tx.customer_id.clone())
            .ok_or_else(|| StoreError::not_found("Transaction", id))?;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == owner)
            .ok_or_else(|| StoreError::not_found("Customer", &owner))?;

        let tx = loyalty.edit(customer, id, draft)?;
        info!(
            tx_id = %tx.id,
            customer_id = %tx.customer_id,
            balance = customer.points(),
            "Transaction edited"
        );
        Ok(tx)
    }

    /// Deletes an entry and reverses its points effect.
    pub async fn delete(&self, id: &str) -> StoreResult<CustomerTransaction> {
        let mut data = self.data.write().await;
        let StoreData {
            customers, loyalty, ..
        } = &mut *data;

        let owner = loyalty
            .get(id)
            .map(|tx| tx.customer_id.clone())
            .ok_or_else(|| StoreError::not_found("Transaction", id))?;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == owner)
            .ok_or_else(|| StoreError::not_found("Customer", &owner))?;

        let removed = loyalty.delete(customer, id)?;
        info!(
            tx_id = %removed.id,
            customer_id = %removed.customer_id,
            balance = customer.points(),
            "Transaction deleted"
        );
        Ok(removed)
    }
}
