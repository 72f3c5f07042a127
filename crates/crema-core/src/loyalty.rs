//! # Loyalty Ledger
//!
//! The record of customer transactions from which each customer's points
//! balance is derived.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TransactionDraft ──record()──► CustomerTransaction ──delete()──► gone  │
//! │      (Draft)                       (Recorded)                (Deleted)  │
//! │                                        │                                │
//! │                                      edit()                             │
//! │                                        │                                │
//! │                     reverse old effect, apply new effect, same id       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! For every customer: `points == Σ (points_earned - points_redeemed)` over
//! that customer's entries. Every mutation computes the new balance first,
//! rejects it with `InsufficientPoints` if it would go negative (or
//! `PointsOutOfRange` if it would not fit), and only then touches the ledger
//! and the customer together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::policy;
use crate::types::{Customer, CustomerTransaction, TransactionDraft};

/// Recomputes a customer's balance from scratch over a transaction history.
pub fn recompute_points<'a, I>(customer_id: &str, history: I) -> i64
where
    I: IntoIterator<Item = &'a CustomerTransaction>,
{
    history
        .into_iter()
        .filter(|tx| tx.customer_id == customer_id)
        .map(CustomerTransaction::points_delta)
        .fold(0, i64::saturating_add)
}

/// Append-style store of recorded customer transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyLedger {
    entries: Vec<CustomerTransaction>,
}

impl LoyaltyLedger {
    pub fn new() -> Self {
        LoyaltyLedger::default()
    }

    /// Builds a ledger from previously recorded entries (fixture seeding).
    ///
    /// Balances are not touched; run [`LoyaltyLedger::reconcile`] per
    /// customer afterwards.
    pub fn from_history(entries: Vec<CustomerTransaction>) -> Self {
        LoyaltyLedger { entries }
    }

    pub fn entries(&self) -> &[CustomerTransaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CustomerTransaction> {
        self.entries.iter().find(|tx| tx.id == id)
    }

    pub fn for_customer<'a>(
        &'a self,
        customer_id: &'a str,
    ) -> impl Iterator<Item = &'a CustomerTransaction> + 'a {
        self.entries
            .iter()
            .filter(move |tx| tx.customer_id == customer_id)
    }

    /// Balance implied by the ledger for one customer.
    pub fn balance_for(&self, customer_id: &str) -> i64 {
        recompute_points(customer_id, &self.entries)
    }

    /// Whether the customer's stored balance matches the ledger.
    pub fn verify(&self, customer: &Customer) -> bool {
        customer.points() == self.balance_for(&customer.id)
    }

    /// Resets the customer's balance to what the ledger implies.
    ///
    /// ## Returns
    /// The stale balance if it had drifted, `None` if it was already correct.
    pub fn reconcile(&self, customer: &mut Customer) -> Option<i64> {
        let expected = self.balance_for(&customer.id);
        let stale = customer.points();
        if stale == expected {
            return None;
        }
        customer.set_points(expected);
        Some(stale)
    }

    /// Validates a draft through the type policy, appends it and applies its
    /// points effect to the customer.
    ///
    /// ## Errors
    /// - `Invalid` with field errors from the policy
    /// - `InsufficientPoints` if the balance would go negative
    /// - `PointsOutOfRange` if the balance would overflow
    pub fn record(
        &mut self,
        customer: &mut Customer,
        draft: TransactionDraft,
    ) -> CoreResult<CustomerTransaction> {
        let draft = policy::prepare(draft)?;
        ensure_same_customer(customer, &draft.customer_id)?;

        let tx = CustomerTransaction {
            id: Uuid::new_v4().to_string(),
            customer_id: draft.customer_id,
            date: draft.date,
            tx_type: draft.tx_type,
            order_id: draft.order_id,
            amount_cents: draft.amount_cents,
            points_earned: draft.points_earned.unwrap_or(0),
            points_redeemed: draft.points_redeemed,
            notes: draft.notes,
        };

        let new_balance = checked_balance(customer, tx.points_delta())?;
        self.entries.push(tx.clone());
        customer.set_points(new_balance);
        Ok(tx)
    }

    /// Removes an entry and reverses its points effect.
    pub fn delete(&mut self, customer: &mut Customer, id: &str) -> CoreResult<CustomerTransaction> {
        let index = self.index_of(id)?;
        ensure_same_customer(customer, &self.entries[index].customer_id)?;

        let delta = self.entries[index].points_delta();
        let reversal = delta
            .checked_neg()
            .ok_or_else(|| points_out_of_range(customer, delta))?;
        let new_balance = checked_balance(customer, reversal)?;
        let removed = self.entries.remove(index);
        customer.set_points(new_balance);
        Ok(removed)
    }

    /// Replaces a recorded entry with a re-validated draft.
    ///
    /// The old effect is reversed and the new one applied as a single net
    /// change, so the balance never double-counts. The entry keeps its id.
    pub fn edit(
        &mut self,
        customer: &mut Customer,
        id: &str,
        draft: TransactionDraft,
    ) -> CoreResult<CustomerTransaction> {
        let index = self.index_of(id)?;
        ensure_same_customer(customer, &self.entries[index].customer_id)?;

        let draft = policy::prepare(draft)?;
        ensure_same_customer(customer, &draft.customer_id)?;

        let old_delta = self.entries[index].points_delta();
        let updated = CustomerTransaction {
            id: id.to_string(),
            customer_id: draft.customer_id,
            date: draft.date,
            tx_type: draft.tx_type,
            order_id: draft.order_id,
            amount_cents: draft.amount_cents,
            points_earned: draft.points_earned.unwrap_or(0),
            points_redeemed: draft.points_redeemed,
            notes: draft.notes,
        };

        let net = updated
            .points_delta()
            .checked_sub(old_delta)
            .ok_or_else(|| points_out_of_range(customer, updated.points_delta()))?;
        let new_balance = checked_balance(customer, net)?;
        self.entries[index] = updated.clone();
        customer.set_points(new_balance);
        Ok(updated)
    }

    fn index_of(&self, id: &str) -> CoreResult<usize> {
        self.entries
            .iter()
            .position(|tx| tx.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))
    }
}

fn ensure_same_customer(customer: &Customer, customer_id: &str) -> CoreResult<()> {
    if customer.id != customer_id {
        return Err(ValidationError::invalid(
            "customerId",
            format!(
                "transaction belongs to {} but was applied to {}",
                customer_id, customer.id
            ),
        )
        .into());
    }
    Ok(())
}

fn points_out_of_range(customer: &Customer, delta: i64) -> CoreError {
    CoreError::PointsOutOfRange {
        customer_id: customer.id.clone(),
        balance: customer.points(),
        delta,
    }
}

fn checked_balance(customer: &Customer, delta: i64) -> CoreResult<i64> {
    let new_balance = customer
        .points()
        .checked_add(delta)
        .ok_or_else(|| points_out_of_range(customer, delta))?;
    if new_balance < 0 {
        return Err(CoreError::InsufficientPoints {
            customer_id: customer.id.clone(),
            balance: customer.points(),
            delta,
        });
    }
    Ok(new_balance)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn customer_with_points(points: i64) -> (Customer, LoyaltyLedger) {
        let mut customer = Customer::new("c-1", "Ada", "Byron", "ada@example.com", date());
        let mut ledger = LoyaltyLedger::new();
        if points > 0 {
            let mut opening = TransactionDraft::new("c-1", date(), TransactionType::PointsAdjustment);
            opening.points_earned = Some(points);
            ledger.record(&mut customer, opening).unwrap();
        }
        (customer, ledger)
    }

    fn purchase(amount_cents: i64, points: Option<i64>) -> TransactionDraft {
        let mut d = TransactionDraft::new("c-1", date(), TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = amount_cents;
        d.points_earned = points;
        d
    }

    fn redemption(points: i64) -> TransactionDraft {
        let mut d = TransactionDraft::new("c-1", date(), TransactionType::PointsRedemption);
        d.points_redeemed = points;
        d
    }

    #[test]
    fn test_record_then_delete_restores_balance() {
        let (mut customer, mut ledger) = customer_with_points(100);

        let tx = ledger.record(&mut customer, purchase(1250, Some(13))).unwrap();
        assert_eq!(customer.points(), 113);

        ledger.delete(&mut customer, &tx.id).unwrap();
        assert_eq!(customer.points(), 100);
        assert!(ledger.verify(&customer));
    }

    #[test]
    fn test_record_derives_points() {
        let (mut customer, mut ledger) = customer_with_points(0);
        let tx = ledger.record(&mut customer, purchase(1296, None)).unwrap();
        assert_eq!(tx.points_earned, 13);
        assert_eq!(customer.points(), 13);
    }

    #[test]
    fn test_redemption_beyond_balance_rejected() {
        let (mut customer, mut ledger) = customer_with_points(20);
        let before = ledger.len();

        let err = ledger.record(&mut customer, redemption(50)).unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientPoints {
                customer_id: "c-1".to_string(),
                balance: 20,
                delta: -50,
            }
        );
        assert_eq!(customer.points(), 20);
        assert_eq!(ledger.len(), before);
    }

    #[test]
    fn test_delete_of_spent_points_rejected() {
        let (mut customer, mut ledger) = customer_with_points(0);
        let earn = ledger.record(&mut customer, purchase(3000, None)).unwrap();
        ledger.record(&mut customer, redemption(25)).unwrap();
        assert_eq!(customer.points(), 5);

        let err = ledger.delete(&mut customer, &earn.id).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientPoints { .. }));
        assert_eq!(customer.points(), 5);
        assert!(ledger.get(&earn.id).is_some());
    }

    #[test]
    fn test_policy_rejection_does_not_mutate() {
        let (mut customer, mut ledger) = customer_with_points(10);
        let before = ledger.len();

        let err = ledger.record(&mut customer, purchase(0, None)).unwrap_err();
        assert_eq!(err.field_errors()[0].field(), "amount");
        assert_eq!(customer.points(), 10);
        assert_eq!(ledger.len(), before);
    }

    #[test]
    fn test_wrong_sign_amounts_rejected_without_mutation() {
        let (mut customer, mut ledger) = customer_with_points(10);
        let before = ledger.len();

        let err = ledger.record(&mut customer, purchase(-1250, None)).unwrap_err();
        assert_eq!(
            err,
            CoreError::Invalid(vec![ValidationError::MustBePositive {
                field: "amount".to_string()
            }])
        );

        let mut refund = TransactionDraft::new("c-1", date(), TransactionType::Refund);
        refund.order_id = Some("o-1".to_string());
        refund.amount_cents = 500;
        let err = ledger.record(&mut customer, refund).unwrap_err();
        assert_eq!(
            err,
            CoreError::Invalid(vec![ValidationError::MustBeNegative {
                field: "amount".to_string()
            }])
        );

        assert_eq!(customer.points(), 10);
        assert_eq!(ledger.len(), before);
    }

    #[test]
    fn test_balance_overflow_rejected() {
        let (mut customer, mut ledger) = customer_with_points(100);
        let spend = ledger.record(&mut customer, redemption(50)).unwrap();
        customer.set_points(i64::MAX - 10);
        let before = ledger.len();

        let mut bonus = TransactionDraft::new("c-1", date(), TransactionType::PointsAdjustment);
        bonus.points_earned = Some(20);
        let err = ledger.record(&mut customer, bonus.clone()).unwrap_err();
        assert!(matches!(err, CoreError::PointsOutOfRange { delta: 20, .. }));
        assert_eq!(ledger.len(), before);

        // Reversing the redemption alone would overflow too
        let err = ledger.edit(&mut customer, &spend.id, bonus).unwrap_err();
        assert!(matches!(err, CoreError::PointsOutOfRange { .. }));
        assert_eq!(ledger.get(&spend.id), Some(&spend));
        assert_eq!(customer.points(), i64::MAX - 10);

        let err = ledger.delete(&mut customer, &spend.id).unwrap_err();
        assert!(matches!(err, CoreError::PointsOutOfRange { delta: 50, .. }));
        assert_eq!(ledger.len(), before);
    }

    #[test]
    fn test_wrong_customer_rejected() {
        let (mut customer, mut ledger) = customer_with_points(0);
        let mut d = purchase(500, None);
        d.customer_id = "c-2".to_string();

        let err = ledger.record(&mut customer, d).unwrap_err();
        assert_eq!(err.field_errors()[0].field(), "customerId");
        assert!(ledger.for_customer("c-2").next().is_none());
    }

    #[test]
    fn test_edit_reverses_then_applies() {
        let (mut customer, mut ledger) = customer_with_points(100);
        let tx = ledger.record(&mut customer, purchase(1250, None)).unwrap();
        assert_eq!(customer.points(), 113);

        let mut edited = tx.to_draft();
        edited.amount_cents = 2000;
        edited.points_earned = None;
        let updated = ledger.edit(&mut customer, &tx.id, edited).unwrap();

        assert_eq!(updated.id, tx.id);
        assert_eq!(updated.points_earned, 20);
        assert_eq!(customer.points(), 120);
        assert!(ledger.verify(&customer));
    }

    #[test]
    fn test_edit_type_switch_through_policy() {
        let (mut customer, mut ledger) = customer_with_points(100);
        let tx = ledger.record(&mut customer, purchase(1250, None)).unwrap();

        let refund = policy::switch_type(tx.to_draft(), TransactionType::Refund);
        let updated = ledger.edit(&mut customer, &tx.id, refund).unwrap();

        assert_eq!(updated.amount_cents, -1250);
        assert_eq!(customer.points(), 100);
    }

    #[test]
    fn test_unknown_transaction() {
        let (mut customer, mut ledger) = customer_with_points(0);
        assert_eq!(
            ledger.delete(&mut customer, "nope"),
            Err(CoreError::TransactionNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_balance_matches_history_after_mixed_sequence() {
        let (mut customer, mut ledger) = customer_with_points(50);
        let a = ledger.record(&mut customer, purchase(899, None)).unwrap();
        let b = ledger.record(&mut customer, purchase(1520, Some(20))).unwrap();
        ledger.record(&mut customer, redemption(30)).unwrap();

        let mut refund = TransactionDraft::new("c-1", date(), TransactionType::Refund);
        refund.order_id = Some("o-1".to_string());
        refund.amount_cents = -899;
        ledger.record(&mut customer, refund).unwrap();

        ledger.delete(&mut customer, &a.id).unwrap();
        assert_eq!(customer.points(), recompute_points("c-1", ledger.entries()));
        ledger.delete(&mut customer, &b.id).unwrap();
        assert_eq!(customer.points(), recompute_points("c-1", ledger.entries()));
        assert_eq!(customer.points(), 20);
    }

    #[test]
    fn test_reconcile_repairs_drift() {
        let (mut customer, mut ledger) = customer_with_points(40);
        let history = ledger.entries().to_vec();
        ledger = LoyaltyLedger::from_history(history);

        customer.set_points(999);
        assert!(!ledger.verify(&customer));
        assert_eq!(ledger.reconcile(&mut customer), Some(999));
        assert_eq!(customer.points(), 40);
        assert_eq!(ledger.reconcile(&mut customer), None);
    }
}
