//! # Domain Types
//!
//! Core records used throughout the Crema back office.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │    Customer     │   │ CustomerTransaction  │   │    Feedback     │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  id             │◄──│  customer_id         │   │  customer_id    │  │
//! │  │  points (derived│   │  type / order_id     │   │  rating 1-5     │  │
//! │  │   from ledger)  │   │  amount / points     │   │  category       │  │
//! │  └─────────────────┘   └──────────────────────┘   └─────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Staff       │   │     Shift       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  role           │◄──│  staff_id       │   │  base price     │       │
//! │  │  emergency      │   │  date, start,   │   │  category       │       │
//! │  │   contact       │   │  end            │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records serialize in camelCase so the JSON fixtures and the presentation
//! layer share one shape.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8% and 1000 bps = 10%.
/// The rate is deployment configuration, never a constant in business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// No method chosen yet; a fresh order starts here.
    #[default]
    #[serde(rename = "none")]
    Unselected,
    Cash,
    Card,
}

// =============================================================================
// Product
// =============================================================================

/// A menu item available at the POS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Price in cents before any customization.
    pub base_price_cents: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl Product {
    /// Returns the base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A loyalty customer.
///
/// ## Points Invariant
/// `points` always equals the sum over the customer's recorded transactions
/// of `points_earned - points_redeemed`. The field is private: only the
/// loyalty ledger moves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[ts(as = "String")]
    pub join_date: NaiveDate,
    #[serde(default)]
    points: i64,
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Customer {
    /// Creates an active customer with a zero balance.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        join_date: NaiveDate,
    ) -> Self {
        Customer {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            join_date,
            points: 0,
            notes: None,
            is_active: true,
        }
    }

    /// Current loyalty points balance.
    #[inline]
    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub(crate) fn set_points(&mut self, points: i64) {
        self.points = points;
    }
}

// =============================================================================
// Customer Transaction
// =============================================================================

/// The kind of loyalty ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Purchase,
    Refund,
    PointsRedemption,
    PointsAdjustment,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Purchase => write!(f, "purchase"),
            TransactionType::Refund => write!(f, "refund"),
            TransactionType::PointsRedemption => write!(f, "points_redemption"),
            TransactionType::PointsAdjustment => write!(f, "points_adjustment"),
        }
    }
}

/// An editable, not-yet-recorded transaction (the form's state).
///
/// `points_earned` is optional so a purchase can leave it blank and have it
/// derived from the amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub customer_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default)]
    pub points_earned: Option<i64>,
    #[serde(default)]
    pub points_redeemed: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionDraft {
    /// Starts a draft of the given type with everything else empty.
    pub fn new(customer_id: impl Into<String>, date: NaiveDate, tx_type: TransactionType) -> Self {
        TransactionDraft {
            customer_id: customer_id.into(),
            date,
            tx_type,
            order_id: None,
            amount_cents: 0,
            points_earned: None,
            points_redeemed: 0,
            notes: None,
        }
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// A recorded loyalty ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTransaction {
    pub id: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub order_id: Option<String>,
    /// Signed: positive for purchase, negative for refund, zero otherwise.
    pub amount_cents: i64,
    pub points_earned: i64,
    pub points_redeemed: i64,
    pub notes: Option<String>,
}

impl CustomerTransaction {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Net change this entry makes to the customer's balance.
    #[inline]
    pub fn points_delta(&self) -> i64 {
        self.points_earned.saturating_sub(self.points_redeemed)
    }

    /// Returns the draft that would reproduce this entry (edit flow).
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            customer_id: self.customer_id.clone(),
            date: self.date,
            tx_type: self.tx_type,
            order_id: self.order_id.clone(),
            amount_cents: self.amount_cents,
            points_earned: Some(self.points_earned),
            points_redeemed: self.points_redeemed,
            notes: self.notes.clone(),
        }
    }
}

// =============================================================================
// Feedback
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Service,
    Product,
    Ambience,
    Other,
}

/// Customer feedback entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// 1 (poor) to 5 (excellent).
    pub rating: u8,
    pub category: FeedbackCategory,
    pub comment: String,
}

// =============================================================================
// Staff
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Barista,
    Cashier,
    ShiftLead,
    Manager,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

/// A staff member profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    #[ts(as = "String")]
    pub hire_date: NaiveDate,
    pub hourly_rate_cents: i64,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Staff {
    #[inline]
    pub fn hourly_rate(&self) -> Money {
        Money::from_cents(self.hourly_rate_cents)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Shift
// =============================================================================

/// A scheduled shift for one staff member on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub staff_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    #[ts(as = "String")]
    pub end_time: NaiveTime,
    pub position: StaffRole,
    pub notes: Option<String>,
}

impl Shift {
    /// Scheduled length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Whether two shifts on the same date share any time.
    pub fn overlaps(&self, other: &Shift) -> bool {
        self.date == other.date
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(8.0).bps(), 800);
        assert!((TaxRate::from_bps(1000).percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_default_tax_rate() {
        assert_eq!(TaxRate::default().bps(), 800);
    }

    #[test]
    fn test_payment_method_serializes_none() {
        let json = serde_json::to_string(&PaymentMethod::Unselected).unwrap();
        assert_eq!(json, "\"none\"");
        let parsed: PaymentMethod = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Card);
    }

    #[test]
    fn test_transaction_type_wire_names() {
        let parsed: TransactionType = serde_json::from_str("\"points_redemption\"").unwrap();
        assert_eq!(parsed, TransactionType::PointsRedemption);
        assert_eq!(TransactionType::PointsAdjustment.to_string(), "points_adjustment");
    }

    #[test]
    fn test_customer_fixture_shape() {
        let json = r#"{
            "id": "c-1",
            "firstName": "Ada",
            "lastName": "Byron",
            "email": "ada@example.com",
            "phone": null,
            "joinDate": "2024-03-01",
            "points": 120,
            "notes": null
        }"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.points(), 120);
        assert!(customer.is_active);
        assert_eq!(customer.full_name(), "Ada Byron");
    }

    #[test]
    fn test_draft_type_field_is_named_type() {
        let json = r#"{
            "customerId": "c-1",
            "date": "2024-05-01",
            "type": "purchase",
            "orderId": "o-9",
            "amountCents": 1250
        }"#;
        let draft: TransactionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.tx_type, TransactionType::Purchase);
        assert_eq!(draft.points_earned, None);
        assert_eq!(draft.points_redeemed, 0);
    }

    #[test]
    fn test_shift_overlap() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        let morning = Shift {
            id: "s-1".to_string(),
            staff_id: "st-1".to_string(),
            date,
            start_time: at(6),
            end_time: at(12),
            position: StaffRole::Barista,
            notes: None,
        };
        let mut afternoon = morning.clone();
        afternoon.id = "s-2".to_string();
        afternoon.start_time = at(12);
        afternoon.end_time = at(18);

        assert!(!morning.overlaps(&afternoon));
        afternoon.start_time = at(11);
        assert!(morning.overlaps(&afternoon));
        assert_eq!(morning.duration_minutes(), 360);
    }
}
