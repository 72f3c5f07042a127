//! # Loyalty Transaction Commands
//!
//! The transaction form and the ledger behind it.
//!
//! ## Form Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Transaction Form                                     │
//! │                                                                         │
//! │  type dropdown changes ──► switch_transaction_type ──► re-derived draft │
//! │                                                                         │
//! │  any field changes ──────► preview_transaction ──────► draft + every    │
//! │                                                        field error      │
//! │                                                                         │
//! │  save (new) ─────────────► record_transaction ───────► entry + balance  │
//! │  save (edit) ────────────► edit_transaction                             │
//! │  delete ─────────────────► delete_transaction ───────► balance reversed │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use crema_core::policy;
use crema_core::{CustomerTransaction, TransactionDraft, TransactionType};

use crate::error::{ApiError, FieldError};
use crate::state::StoreState;

/// A normalized draft plus everything wrong with it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPreview {
    pub draft: TransactionDraft,
    /// Balance change the draft would cause, when it is valid.
    pub points_delta: Option<i64>,
    pub field_errors: Vec<FieldError>,
}

impl DraftPreview {
    fn build(draft: TransactionDraft) -> Self {
        let draft = policy::normalize(draft);
        let field_errors: Vec<FieldError> = policy::validate(&draft)
            .iter()
            .map(FieldError::from)
            .collect();
        let points_delta = if field_errors.is_empty() {
            draft
                .points_earned
                .map(|earned| earned - draft.points_redeemed)
        } else {
            None
        };
        DraftPreview {
            draft,
            points_delta,
            field_errors,
        }
    }
}

/// A customer's history, newest first.
pub async fn list_transactions(
    store: &StoreState,
    customer_id: String,
) -> Result<Vec<CustomerTransaction>, ApiError> {
    debug!(customer_id = %customer_id, "list_transactions command");
    Ok(store
        .inner()
        .transactions()
        .list_for_customer(&customer_id)
        .await?)
}

/// Normalizes a draft and reports its field errors without saving it.
pub fn preview_transaction(draft: TransactionDraft) -> DraftPreview {
    DraftPreview::build(draft)
}

/// Changes the draft's type and re-derives the controlled fields.
pub fn switch_transaction_type(draft: TransactionDraft, tx_type: TransactionType) -> DraftPreview {
    debug!(from = %draft.tx_type, to = %tx_type, "switch_transaction_type command");
    DraftPreview::build(policy::switch_type(draft, tx_type))
}

pub async fn record_transaction(
    store: &StoreState,
    draft: TransactionDraft,
) -> Result<CustomerTransaction, ApiError> {
    debug!(customer_id = %draft.customer_id, tx_type = %draft.tx_type, "record_transaction command");
    Ok(store.inner().transactions().record(draft).await?)
}

/// Replaces an entry, moving the balance by the difference.
pub async fn edit_transaction(
    store: &StoreState,
    id: String,
    draft: TransactionDraft,
) -> Result<CustomerTransaction, ApiError> {
    debug!(tx_id = %id, "edit_transaction command");
    Ok(store.inner().transactions().edit(&id, draft).await?)
}

/// Removes an entry and reverses its effect on the balance.
pub async fn delete_transaction(
    store: &StoreState,
    id: String,
) -> Result<CustomerTransaction, ApiError> {
    debug!(tx_id = %id, "delete_transaction command");
    Ok(store.inner().transactions().delete(&id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::NaiveDate;
    use crema_store::{Store, StoreConfig};

    async fn store() -> StoreState {
        StoreState::new(Store::new(StoreConfig::new()).await.unwrap())
    }

    fn draft(tx_type: TransactionType) -> TransactionDraft {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        TransactionDraft::new("c-1001", date, tx_type)
    }

    async fn balance(store: &StoreState) -> i64 {
        store
            .inner()
            .customers()
            .require("c-1001")
            .await
            .unwrap()
            .points()
    }

    #[test]
    fn test_preview_lists_every_field() {
        let preview = preview_transaction(draft(TransactionType::Purchase));
        let fields: Vec<&str> = preview
            .field_errors
            .iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(fields, vec!["orderId", "amount"]);
        assert_eq!(preview.points_delta, None);
    }

    #[test]
    fn test_preview_derives_purchase_points() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-9001".to_string());
        d.amount_cents = 1296;

        let preview = preview_transaction(d);
        assert!(preview.field_errors.is_empty());
        assert_eq!(preview.draft.points_earned, Some(13));
        assert_eq!(preview.points_delta, Some(13));
    }

    #[test]
    fn test_switch_to_adjustment_drops_order_and_amount() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-9001".to_string());
        d.amount_cents = 1296;

        let preview = switch_transaction_type(d, TransactionType::PointsAdjustment);
        assert_eq!(preview.draft.order_id, None);
        assert_eq!(preview.draft.amount_cents, 0);
        assert_eq!(preview.draft.points_earned, None);
        assert_eq!(preview.field_errors[0].field, "pointsEarned");
    }

    #[tokio::test]
    async fn test_record_and_delete_move_balance() {
        let store = store().await;
        let start = balance(&store).await;

        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-9001".to_string());
        d.amount_cents = 1296;
        let tx = record_transaction(&store, d).await.unwrap();
        assert_eq!(balance(&store).await, start + 13);

        delete_transaction(&store, tx.id).await.unwrap();
        assert_eq!(balance(&store).await, start);
    }

    #[tokio::test]
    async fn test_overdrawn_redemption_rejected() {
        let store = store().await;
        let start = balance(&store).await;

        let mut d = draft(TransactionType::PointsRedemption);
        d.points_redeemed = start + 1;
        let err = record_transaction(&store, d).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientPoints);
        assert_eq!(balance(&store).await, start);
    }

    #[tokio::test]
    async fn test_invalid_draft_reports_fields() {
        let store = store().await;
        let err = record_transaction(&store, draft(TransactionType::Refund))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.field_errors.iter().any(|f| f.field == "orderId"));
    }
}
