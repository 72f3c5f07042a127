//! # Inventory
//!
//! Stock items and the inventory transaction ledger that moves them.
//!
//! ## Stock Movements
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Type         quantity              stock delta     total cost         │
//! │  ──────────   ───────────────────   ─────────────   ─────────────────  │
//! │  restock      magnitude  (> 0)      +q              +q × unit cost     │
//! │  usage        magnitude  (> 0)      -q              -q × unit cost     │
//! │  write_off    magnitude  (> 0)      -q              -q × unit cost     │
//! │  adjustment   signed     (≠ 0)      q               -|q| × unit cost   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recording applies the stock delta to the item; deleting reverses it.
//! Either direction is refused if on-hand stock would go negative.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{MAX_INVENTORY_QUANTITY, MAX_TRANSACTION_AMOUNT_CENTS};

// =============================================================================
// Inventory Item
// =============================================================================

/// A stocked ingredient or supply (beans, milk, cups).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    /// Unit of measure, e.g. "kg", "L", "each".
    pub unit: String,
    #[serde(default)]
    quantity_on_hand: i64,
    pub unit_cost_cents: i64,
    pub reorder_level: i64,
}

impl InventoryItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_cost_cents: i64,
        reorder_level: i64,
    ) -> Self {
        InventoryItem {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            quantity_on_hand: 0,
            unit_cost_cents,
            reorder_level,
        }
    }

    #[inline]
    pub fn quantity_on_hand(&self) -> i64 {
        self.quantity_on_hand
    }

    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    /// Stock has fallen to or below the reorder level.
    pub fn needs_reorder(&self) -> bool {
        self.quantity_on_hand <= self.reorder_level
    }

    /// Applies a signed stock change, refusing to go below zero.
    fn apply_delta(&mut self, delta: i64) -> CoreResult<()> {
        let next = self.quantity_on_hand.checked_add(delta).ok_or_else(|| {
            ValidationError::invalid("quantity", "stock on hand would overflow")
        })?;
        if next < 0 {
            return Err(CoreError::InsufficientStock {
                item: self.name.clone(),
                available: self.quantity_on_hand,
                requested: delta.saturating_neg(),
            });
        }
        self.quantity_on_hand = next;
        Ok(())
    }
}

// =============================================================================
// Inventory Transaction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InventoryTransactionType {
    Restock,
    Usage,
    Adjustment,
    WriteOff,
}

impl fmt::Display for InventoryTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InventoryTransactionType::Restock => "restock",
            InventoryTransactionType::Usage => "usage",
            InventoryTransactionType::Adjustment => "adjustment",
            InventoryTransactionType::WriteOff => "write_off",
        };
        write!(f, "{}", s)
    }
}

/// Unvalidated input for an inventory movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDraft {
    pub item_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub tx_type: InventoryTransactionType,
    pub quantity: i64,
    /// Cost per unit; defaults to the item's current unit cost.
    #[serde(default)]
    pub unit_cost_cents: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A recorded inventory movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    pub id: String,
    pub item_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub tx_type: InventoryTransactionType,
    pub quantity: i64,
    pub unit_cost_cents: i64,
    pub total_cost_cents: i64,
    pub notes: Option<String>,
}

impl InventoryTransaction {
    /// Signed change this entry made to on-hand stock.
    pub fn stock_delta(&self) -> i64 {
        stock_delta(self.tx_type, self.quantity)
    }

    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }
}

/// Signed stock change for a movement of `quantity`.
pub fn stock_delta(tx_type: InventoryTransactionType, quantity: i64) -> i64 {
    match tx_type {
        InventoryTransactionType::Restock => quantity,
        InventoryTransactionType::Usage | InventoryTransactionType::WriteOff => {
            quantity.saturating_neg()
        }
        InventoryTransactionType::Adjustment => quantity,
    }
}

/// `quantity × unit_cost`, positive for restock and negative otherwise.
///
/// `None` when the product does not fit in cents.
pub fn total_cost(
    tx_type: InventoryTransactionType,
    quantity: i64,
    unit_cost: Money,
) -> Option<Money> {
    let magnitude = unit_cost.cents().checked_mul(quantity.checked_abs()?)?;
    let cents = match tx_type {
        InventoryTransactionType::Restock => magnitude,
        _ => magnitude.checked_neg()?,
    };
    Some(Money::from_cents(cents))
}

/// Field-level checks for an inventory draft.
pub fn validate_draft(draft: &InventoryDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if draft.item_id.trim().is_empty() {
        errors.push(ValidationError::required("itemId"));
    }

    match draft.tx_type {
        _ if draft.quantity.unsigned_abs() > MAX_INVENTORY_QUANTITY.unsigned_abs() => {
            errors.push(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: -MAX_INVENTORY_QUANTITY,
                max: MAX_INVENTORY_QUANTITY,
            });
        }
        InventoryTransactionType::Adjustment => {
            if draft.quantity == 0 {
                errors.push(ValidationError::invalid(
                    "quantity",
                    "an adjustment must change stock",
                ));
            }
        }
        _ => {
            if draft.quantity <= 0 {
                errors.push(ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                });
            }
        }
    }

    match draft.unit_cost_cents {
        Some(c) if c < 0 => errors.push(ValidationError::MustBeNonNegative {
            field: "unitCost".to_string(),
        }),
        Some(c) if c > MAX_TRANSACTION_AMOUNT_CENTS => errors.push(ValidationError::OutOfRange {
            field: "unitCost".to_string(),
            min: 0,
            max: MAX_TRANSACTION_AMOUNT_CENTS,
        }),
        _ => {}
    }

    errors
}

// =============================================================================
// Inventory Ledger
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryLedger {
    entries: Vec<InventoryTransaction>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        InventoryLedger::default()
    }

    /// Builds a ledger from previously recorded entries without touching stock.
    pub fn from_history(entries: Vec<InventoryTransaction>) -> Self {
        InventoryLedger { entries }
    }

    pub fn entries(&self) -> &[InventoryTransaction] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&InventoryTransaction> {
        self.entries.iter().find(|tx| tx.id == id)
    }

    pub fn for_item<'a>(
        &'a self,
        item_id: &'a str,
    ) -> impl Iterator<Item = &'a InventoryTransaction> + 'a {
        self.entries.iter().filter(move |tx| tx.item_id == item_id)
    }

    /// Validates a draft, derives its total cost and applies it to the item.
    pub fn record(
        &mut self,
        item: &mut InventoryItem,
        draft: InventoryDraft,
    ) -> CoreResult<InventoryTransaction> {
        let errors = validate_draft(&draft);
        if !errors.is_empty() {
            return Err(CoreError::Invalid(errors));
        }
        if draft.item_id != item.id {
            return Err(ValidationError::invalid(
                "itemId",
                format!("movement for {} applied to {}", draft.item_id, item.id),
            )
            .into());
        }

        let unit_cost = draft
            .unit_cost_cents
            .map(Money::from_cents)
            .unwrap_or_else(|| item.unit_cost());

        let total = total_cost(draft.tx_type, draft.quantity, unit_cost).ok_or_else(|| {
            ValidationError::invalid("unitCost", "total cost is out of range")
        })?;

        item.apply_delta(stock_delta(draft.tx_type, draft.quantity))?;

        let tx = InventoryTransaction {
            id: Uuid::new_v4().to_string(),
            item_id: draft.item_id,
            date: draft.date,
            tx_type: draft.tx_type,
            quantity: draft.quantity,
            unit_cost_cents: unit_cost.cents(),
            total_cost_cents: total.cents(),
            notes: draft.notes.filter(|n| !n.trim().is_empty()),
        };
        self.entries.push(tx.clone());
        Ok(tx)
    }

    /// Removes an entry and reverses its stock delta.
    pub fn delete(&mut self, item: &mut InventoryItem, id: &str) -> CoreResult<InventoryTransaction> {
        let index = self
            .entries
            .iter()
            .position(|tx| tx.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;

        if self.entries[index].item_id != item.id {
            return Err(ValidationError::invalid(
                "itemId",
                format!("movement belongs to {}", self.entries[index].item_id),
            )
            .into());
        }

        item.apply_delta(self.entries[index].stock_delta().saturating_neg())?;
        Ok(self.entries.remove(index))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
