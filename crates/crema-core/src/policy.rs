//! # Transaction Type Policy
//!
//! The rule table that says, per transaction type, which fields are
//! required, derived, forced or forbidden.
//!
//! ## The Table
//! ```text
//! ┌──────────────────┬──────────┬──────────────┬────────────────────┬──────────────────┐
//! │ type             │ order    │ amount       │ points earned      │ points redeemed  │
//! ├──────────────────┼──────────┼──────────────┼────────────────────┼──────────────────┤
//! │ purchase         │ required │ > 0          │ ≥ 0, round(amount) │ must be 0        │
//! │                  │          │              │ when blank         │                  │
//! │ refund           │ required │ < 0          │ forced 0           │ must be 0        │
//! │ points_redemption│ optional │ forced 0     │ forced 0           │ ≥ 0              │
//! │ points_adjustment│ forbidden│ forced 0     │ user value, signed │ forbidden        │
//! └──────────────────┴──────────┴──────────────┴────────────────────┴──────────────────┘
//! ```
//!
//! ## Flow
//! ```text
//! new form ─┐                       ┌─► Ok(draft)  ──► LoyaltyLedger::record
//!           ├─► prepare(draft) ─────┤
//! edit form ┘   normalize+validate  └─► Err(field errors) ──► shown inline
//! ```
//!
//! Both flows go through [`prepare`]; nothing else interprets the table.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{TransactionDraft, TransactionType};
use crate::{MAX_TRANSACTION_AMOUNT_CENTS, MAX_TRANSACTION_POINTS};

// =============================================================================
// Rule Table
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRule {
    Required,
    Optional,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    Positive,
    Negative,
    ForcedZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarnedRule {
    /// Non-negative; derived from the amount when left blank.
    DerivedFromAmount,
    ForcedZero,
    /// Entered by the user, may be negative.
    UserSigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemedRule {
    MustBeZero,
    NonNegative,
    Forbidden,
}

/// One row of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRule {
    pub order: OrderRule,
    pub amount: AmountRule,
    pub points_earned: EarnedRule,
    pub points_redeemed: RedeemedRule,
}

/// Looks up the row for a transaction type.
pub const fn rule_for(tx_type: TransactionType) -> TypeRule {
    match tx_type {
        TransactionType::Purchase => TypeRule {
            order: OrderRule::Required,
            amount: AmountRule::Positive,
            points_earned: EarnedRule::DerivedFromAmount,
            points_redeemed: RedeemedRule::MustBeZero,
        },
        TransactionType::Refund => TypeRule {
            order: OrderRule::Required,
            amount: AmountRule::Negative,
            points_earned: EarnedRule::ForcedZero,
            points_redeemed: RedeemedRule::MustBeZero,
        },
        TransactionType::PointsRedemption => TypeRule {
            order: OrderRule::Optional,
            amount: AmountRule::ForcedZero,
            points_earned: EarnedRule::ForcedZero,
            points_redeemed: RedeemedRule::NonNegative,
        },
        TransactionType::PointsAdjustment => TypeRule {
            order: OrderRule::Forbidden,
            amount: AmountRule::ForcedZero,
            points_earned: EarnedRule::UserSigned,
            points_redeemed: RedeemedRule::Forbidden,
        },
    }
}

/// Points a purchase of `amount` earns when the form leaves them blank.
pub fn derived_points(amount: Money) -> i64 {
    amount.round_to_major().max(0)
}

// =============================================================================
// Normalize / Switch / Validate
// =============================================================================

/// Applies the derived and forced columns of the table.
///
/// User-entered values that the table merely constrains (a stray order id on
/// an adjustment, redeemed points on a purchase, a purchase amount with the
/// wrong sign) are left alone so [`validate`] can report them.
pub fn normalize(mut draft: TransactionDraft) -> TransactionDraft {
    let rule = rule_for(draft.tx_type);

    if rule.amount == AmountRule::ForcedZero {
        draft.amount_cents = 0;
    }

    draft.points_earned = match rule.points_earned {
        EarnedRule::DerivedFromAmount => draft
            .points_earned
            .or_else(|| Some(derived_points(draft.amount()))),
        EarnedRule::ForcedZero => Some(0),
        EarnedRule::UserSigned => draft.points_earned,
    };

    if rule.points_redeemed == RedeemedRule::Forbidden {
        draft.points_redeemed = 0;
    }

    if let Some(order_id) = &draft.order_id {
        if order_id.trim().is_empty() {
            draft.order_id = None;
        }
    }

    draft
}

/// Changes the draft's type and re-derives everything the table controls.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use crema_core::policy::switch_type;
/// use crema_core::types::{TransactionDraft, TransactionType};
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let mut draft = TransactionDraft::new("c-1", date, TransactionType::Purchase);
/// draft.amount_cents = 1250;
///
/// let refund = switch_type(draft, TransactionType::Refund);
/// assert_eq!(refund.amount_cents, -1250);
/// assert_eq!(refund.points_earned, Some(0));
/// ```
pub fn switch_type(mut draft: TransactionDraft, new_type: TransactionType) -> TransactionDraft {
    let rule = rule_for(new_type);
    draft.tx_type = new_type;

    // Earned points from the old type never carry over
    draft.points_earned = None;

    if rule.points_redeemed != RedeemedRule::NonNegative {
        draft.points_redeemed = 0;
    }
    if rule.order == OrderRule::Forbidden {
        draft.order_id = None;
    }

    // The amount keeps its magnitude across purchase and refund
    draft.amount_cents = match rule.amount {
        AmountRule::Positive if draft.amount_cents < 0 => draft.amount_cents.saturating_neg(),
        AmountRule::Negative if draft.amount_cents > 0 => -draft.amount_cents,
        _ => draft.amount_cents,
    };

    normalize(draft)
}

fn out_of_range(field: &str, max: i64) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: -max,
        max,
    }
}

/// Checks a draft against its type's row. Returns every offending field.
pub fn validate(draft: &TransactionDraft) -> Vec<ValidationError> {
    let rule = rule_for(draft.tx_type);
    let mut errors = Vec::new();

    if draft.customer_id.trim().is_empty() {
        errors.push(ValidationError::required("customerId"));
    }

    let has_order = draft
        .order_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());
    match rule.order {
        OrderRule::Required if !has_order => {
            errors.push(ValidationError::required("orderId"));
        }
        OrderRule::Forbidden if has_order => {
            errors.push(ValidationError::forbidden(
                "orderId",
                format!("a {} is not tied to an order", draft.tx_type),
            ));
        }
        _ => {}
    }

    let amount = draft.amount_cents;
    match rule.amount {
        _ if amount.unsigned_abs() > MAX_TRANSACTION_AMOUNT_CENTS.unsigned_abs() => {
            errors.push(out_of_range("amount", MAX_TRANSACTION_AMOUNT_CENTS))
        }
        AmountRule::Positive if amount <= 0 => errors.push(ValidationError::MustBePositive {
            field: "amount".to_string(),
        }),
        AmountRule::Negative if amount >= 0 => errors.push(ValidationError::MustBeNegative {
            field: "amount".to_string(),
        }),
        AmountRule::ForcedZero if amount != 0 => errors.push(ValidationError::MustBeZero {
            field: "amount".to_string(),
        }),
        _ => {}
    }

    match (rule.points_earned, draft.points_earned) {
        (_, Some(earned)) if earned.unsigned_abs() > MAX_TRANSACTION_POINTS.unsigned_abs() => {
            errors.push(out_of_range("pointsEarned", MAX_TRANSACTION_POINTS))
        }
        (EarnedRule::DerivedFromAmount, Some(earned)) if earned < 0 => {
            errors.push(ValidationError::MustBeNonNegative {
                field: "pointsEarned".to_string(),
            })
        }
        (EarnedRule::ForcedZero, Some(earned)) if earned != 0 => {
            errors.push(ValidationError::MustBeZero {
                field: "pointsEarned".to_string(),
            })
        }
        (EarnedRule::UserSigned, None) => errors.push(ValidationError::required("pointsEarned")),
        _ => {}
    }

    let redeemed = draft.points_redeemed;
    match rule.points_redeemed {
        _ if redeemed.unsigned_abs() > MAX_TRANSACTION_POINTS.unsigned_abs() => {
            errors.push(out_of_range("pointsRedeemed", MAX_TRANSACTION_POINTS))
        }
        RedeemedRule::MustBeZero if redeemed != 0 => errors.push(ValidationError::MustBeZero {
            field: "pointsRedeemed".to_string(),
        }),
        RedeemedRule::NonNegative if redeemed < 0 => {
            errors.push(ValidationError::MustBeNonNegative {
                field: "pointsRedeemed".to_string(),
            })
        }
        RedeemedRule::Forbidden if redeemed != 0 => errors.push(ValidationError::forbidden(
            "pointsRedeemed",
            "adjustments change the balance through points earned only",
        )),
        _ => {}
    }

    errors
}

/// Normalizes then validates. The single entry point for the "new" and
/// "edit" transaction flows.
///
/// On success the returned draft always has `points_earned` set.
pub fn prepare(draft: TransactionDraft) -> Result<TransactionDraft, Vec<ValidationError>> {
    let draft = normalize(draft);
    let errors = validate(&draft);
    if errors.is_empty() {
        Ok(draft)
    } else {
        Err(errors)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(tx_type: TransactionType) -> TransactionDraft {
        TransactionDraft::new("c-1", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), tx_type)
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field()).collect()
    }

    #[test]
    fn test_purchase_amount_must_be_positive() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 0;
        assert_eq!(fields(&validate(&d)), vec!["amount"]);

        d.amount_cents = -500;
        assert_eq!(fields(&validate(&d)), vec!["amount"]);
    }

    #[test]
    fn test_refund_amount_must_be_negative() {
        let mut d = draft(TransactionType::Refund);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 0;
        assert_eq!(fields(&validate(&d)), vec!["amount"]);

        d.amount_cents = 500;
        assert_eq!(fields(&validate(&d)), vec!["amount"]);

        d.amount_cents = -500;
        assert!(validate(&d).is_empty());
    }

    #[test]
    fn test_purchase_with_rounded_points_accepted() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 1250;
        d.points_earned = Some(13);
        assert!(validate(&d).is_empty());
    }

    #[test]
    fn test_same_record_as_adjustment_rejected_for_order_id() {
        let mut d = draft(TransactionType::PointsAdjustment);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 1250;
        d.points_earned = Some(13);

        let errors = validate(&d);
        assert!(fields(&errors).contains(&"orderId"));
        assert!(matches!(
            errors.iter().find(|e| e.field() == "orderId"),
            Some(ValidationError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_purchase_requires_order() {
        let mut d = draft(TransactionType::Purchase);
        d.amount_cents = 500;
        assert_eq!(fields(&validate(&d)), vec!["orderId"]);

        d.order_id = Some("   ".to_string());
        assert_eq!(fields(&validate(&d)), vec!["orderId"]);
    }

    #[test]
    fn test_purchase_rejects_redeemed_points() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 500;
        d.points_redeemed = 10;
        assert_eq!(prepare(d).unwrap_err()[0].field(), "pointsRedeemed");
    }

    #[test]
    fn test_prepare_derives_purchase_points() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 1250;

        let prepared = prepare(d).unwrap();
        assert_eq!(prepared.points_earned, Some(13));
    }

    #[test]
    fn test_prepare_keeps_supplied_purchase_points() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 1250;
        d.points_earned = Some(25);

        assert_eq!(prepare(d).unwrap().points_earned, Some(25));
    }

    #[test]
    fn test_refund_points_forced_to_zero() {
        let mut d = draft(TransactionType::Refund);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = -400;
        d.points_earned = Some(4);

        // Raw draft reports the disagreement, prepare forces it
        assert_eq!(fields(&validate(&d)), vec!["pointsEarned"]);
        assert_eq!(prepare(d).unwrap().points_earned, Some(0));
    }

    #[test]
    fn test_redemption_forces_amount_and_earned() {
        let mut d = draft(TransactionType::PointsRedemption);
        d.amount_cents = 999;
        d.points_earned = Some(5);
        d.points_redeemed = 50;

        let prepared = prepare(d).unwrap();
        assert_eq!(prepared.amount_cents, 0);
        assert_eq!(prepared.points_earned, Some(0));
        assert_eq!(prepared.points_redeemed, 50);
    }

    #[test]
    fn test_redemption_rejects_negative_redeemed() {
        let mut d = draft(TransactionType::PointsRedemption);
        d.points_redeemed = -5;
        assert_eq!(fields(&prepare(d).unwrap_err()), vec!["pointsRedeemed"]);
    }

    #[test]
    fn test_adjustment_allows_negative_and_requires_value() {
        let mut d = draft(TransactionType::PointsAdjustment);
        assert_eq!(fields(&prepare(d.clone()).unwrap_err()), vec!["pointsEarned"]);

        d.points_earned = Some(-30);
        d.points_redeemed = 12;
        let prepared = prepare(d).unwrap();
        assert_eq!(prepared.points_earned, Some(-30));
        assert_eq!(prepared.points_redeemed, 0);
    }

    #[test]
    fn test_switch_purchase_to_refund_negates_amount() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 1250;
        let d = normalize(d);
        assert_eq!(d.points_earned, Some(13));

        let refund = switch_type(d, TransactionType::Refund);
        assert_eq!(refund.amount_cents, -1250);
        assert_eq!(refund.points_earned, Some(0));
        assert!(validate(&refund).is_empty());
    }

    #[test]
    fn test_switch_refund_to_purchase_rederives_points() {
        let mut d = draft(TransactionType::Refund);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = -799;

        let purchase = switch_type(d, TransactionType::Purchase);
        assert_eq!(purchase.amount_cents, 799);
        assert_eq!(purchase.points_earned, Some(8));
    }

    #[test]
    fn test_switch_to_adjustment_drops_order_and_amount() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 1250;

        let adj = switch_type(d, TransactionType::PointsAdjustment);
        assert_eq!(adj.order_id, None);
        assert_eq!(adj.amount_cents, 0);
        assert_eq!(adj.points_earned, None);
    }

    #[test]
    fn test_switch_redemption_to_purchase_clears_redeemed() {
        let mut d = draft(TransactionType::PointsRedemption);
        d.points_redeemed = 40;
        let purchase = switch_type(d, TransactionType::Purchase);
        assert_eq!(purchase.points_redeemed, 0);
    }

    #[test]
    fn test_prepare_rejects_wrong_sign_purchase() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = -1250;

        let errors = prepare(d).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MustBePositive {
                field: "amount".to_string()
            }]
        );
    }

    #[test]
    fn test_prepare_rejects_wrong_sign_refund() {
        let mut d = draft(TransactionType::Refund);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = 500;

        let errors = prepare(d).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MustBeNegative {
                field: "amount".to_string()
            }]
        );
    }

    #[test]
    fn test_extreme_amounts_rejected_without_overflow() {
        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = i64::MIN;
        d.points_earned = Some(0);
        assert_eq!(fields(&prepare(d.clone()).unwrap_err()), vec!["amount"]);

        let refund = switch_type(d, TransactionType::Refund);
        assert!(refund.amount_cents < 0);
        assert!(matches!(
            prepare(refund).unwrap_err()[0],
            ValidationError::OutOfRange { .. }
        ));

        let mut d = draft(TransactionType::Purchase);
        d.order_id = Some("o-1".to_string());
        d.amount_cents = i64::MAX;
        let purchase = switch_type(d, TransactionType::Purchase);
        let errors = prepare(purchase).unwrap_err();
        assert_eq!(fields(&errors), vec!["amount", "pointsEarned"]);
    }

    #[test]
    fn test_points_beyond_limit_rejected() {
        let mut d = draft(TransactionType::PointsAdjustment);
        d.points_earned = Some(i64::MIN);
        assert!(matches!(
            prepare(d.clone()).unwrap_err()[0],
            ValidationError::OutOfRange { .. }
        ));

        d.points_earned = Some(-MAX_TRANSACTION_POINTS);
        assert!(prepare(d).is_ok());

        let mut d = draft(TransactionType::PointsRedemption);
        d.points_redeemed = MAX_TRANSACTION_POINTS + 1;
        assert_eq!(fields(&prepare(d).unwrap_err()), vec!["pointsRedeemed"]);
    }

    #[test]
    fn test_missing_customer_reported() {
        let mut d = draft(TransactionType::PointsRedemption);
        d.customer_id = String::new();
        assert_eq!(fields(&validate(&d)), vec!["customerId"]);
    }

    #[test]
    fn test_derived_points() {
        assert_eq!(derived_points(Money::from_cents(1296)), 13);
        assert_eq!(derived_points(Money::from_cents(-500)), 0);
        assert_eq!(derived_points(Money::from_cents(i64::MAX)), i64::MAX / 100);
    }
}
