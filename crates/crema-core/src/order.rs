//! # Order Engine
//!
//! The POS order: line items, per-item customization pricing, and totals.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Operations                                     │
//! │                                                                         │
//! │  Tap product ──────────► add_item() ───────────► merge or push line     │
//! │                                                                         │
//! │  Pick size/milk/extras ► apply_customization() ► reprice from base      │
//! │                                                                         │
//! │  +/- buttons ──────────► update_quantity() ────► qty ≤ 0 removes line   │
//! │                                                                         │
//! │  Trash icon ───────────► remove_item() ────────► lines.remove(i)        │
//! │                                                                         │
//! │  Any render ───────────► totals() ─────────────► (read only, pure)      │
//! │                                                                         │
//! │  Pay ──────────────────► complete() ───────────► snapshot + reset       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `subtotal == Σ line totals` (line totals are never cached apart from
//!   unit price × quantity)
//! - `total == subtotal + tax`, `tax = subtotal × rate`
//! - every line has `quantity >= 1`
//! - a line's unit price is always derived from its immutable base price and
//!   its current options, so re-customizing never compounds
//!
//! ## Merge Policy
//! Adding a product merges into an existing line only when the product AND
//! the options match exactly. Otherwise the product gets its own line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentMethod, Product, TaxRate};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

/// Surcharge for each selected extra (syrup shot, whipped cream, ...).
pub const EXTRA_SURCHARGE: Money = Money::from_cents(50);

// =============================================================================
// Item Options
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

impl Size {
    pub const fn adjustment(&self) -> Money {
        match self {
            Size::Small => Money::from_cents(-50),
            Size::Medium => Money::zero(),
            Size::Large => Money::from_cents(75),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Milk {
    #[default]
    Whole,
    Skim,
    Oat,
    Almond,
    Soy,
    Coconut,
}

impl Milk {
    pub const fn adjustment(&self) -> Money {
        match self {
            Milk::Oat | Milk::Almond => Money::from_cents(75),
            _ => Money::zero(),
        }
    }
}

/// The customization chosen for one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemOptions {
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub milk: Milk,
    /// Treated as a set: trimmed, de-duplicated and sorted on entry.
    #[serde(default)]
    pub extras: Vec<String>,
}

impl ItemOptions {
    pub fn new<I, S>(size: Size, milk: Milk, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ItemOptions {
            size,
            milk,
            extras: extras.into_iter().map(Into::into).collect(),
        }
        .normalized()
    }

    /// Returns the options with extras in canonical set form.
    pub fn normalized(mut self) -> Self {
        self.extras = self
            .extras
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self.extras.sort();
        self.extras.dedup();
        self
    }

    /// Total price adjustment these options add to a base price.
    pub fn adjustment(&self) -> Money {
        self.size.adjustment() + self.milk.adjustment() + EXTRA_SURCHARGE * self.extras.len() as i64
    }

    /// Unit price for a base price with these options (never below zero).
    pub fn price_for(&self, base: Money) -> Money {
        (base + self.adjustment()).floor_zero()
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in an order.
///
/// ## Snapshot Pattern
/// Name and base price are frozen when the line is created. Product edits
/// after that don't reach into open orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub line_id: String,
    pub product_id: String,
    pub name: String,
    /// Immutable; every reprice starts here.
    pub base_price_cents: i64,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub options: ItemOptions,
    pub line_total_cents: i64,
}

impl LineItem {
    fn new(product: &Product, options: ItemOptions) -> Self {
        let mut line = LineItem {
            line_id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            base_price_cents: product.base_price_cents,
            unit_price_cents: product.base_price_cents,
            quantity: 1,
            options,
            line_total_cents: 0,
        };
        line.reprice();
        line
    }

    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    fn reprice(&mut self) {
        self.unit_price_cents = self.options.price_for(self.base_price()).cents();
        self.line_total_cents = self.line_total().cents();
    }
}

// =============================================================================
// Order
// =============================================================================

/// What `update_quantity` did to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Updated(i64),
    Removed,
}

/// The order being rung up at the POS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    lines: Vec<LineItem>,
    customer_id: Option<String>,
    payment_method: PaymentMethod,
}

impl Order {
    /// Creates a new empty order.
    pub fn new() -> Self {
        Order::default()
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, line_id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn set_customer(&mut self, customer_id: Option<String>) {
        self.customer_id = customer_id;
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Adds one unit of a product with the given options.
    ///
    /// ## Behavior
    /// - Same product with identical options already present: quantity + 1
    /// - Otherwise: new line with quantity 1
    ///
    /// ## Returns
    /// The id of the line that now holds the product.
    pub fn add_item(&mut self, product: &Product, options: ItemOptions) -> CoreResult<String> {
        if !product.is_available {
            return Err(ValidationError::invalid("productId", "product is not available").into());
        }

        let options = options.normalized();

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id && l.options == options)
        {
            let new_qty = line.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            line.reprice();
            return Ok(line.line_id.clone());
        }

        if self.lines.len() >= MAX_ORDER_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_ORDER_LINES,
            });
        }

        let line = LineItem::new(product, options);
        let line_id = line.line_id.clone();
        self.lines.push(line);
        Ok(line_id)
    }

    /// Changes a line's quantity by `delta`.
    ///
    /// A result of zero or less removes the line entirely; it is never
    /// clamped to zero.
    pub fn update_quantity(&mut self, line_id: &str, delta: i64) -> CoreResult<QuantityChange> {
        let index = self.index_of(line_id)?;
        let new_qty = self.lines[index].quantity.saturating_add(delta);

        if new_qty <= 0 {
            self.lines.remove(index);
            return Ok(QuantityChange::Removed);
        }

        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let line = &mut self.lines[index];
        line.quantity = new_qty;
        line.reprice();
        Ok(QuantityChange::Updated(new_qty))
    }

    /// Replaces a line's options and reprices it from its base price.
    ///
    /// ## Returns
    /// The new unit price.
    pub fn apply_customization(&mut self, line_id: &str, options: ItemOptions) -> CoreResult<Money> {
        let index = self.index_of(line_id)?;
        let line = &mut self.lines[index];
        line.options = options.normalized();
        line.reprice();
        Ok(line.unit_price())
    }

    /// Deletes a line and returns it.
    pub fn remove_item(&mut self, line_id: &str) -> CoreResult<LineItem> {
        let index = self.index_of(line_id)?;
        Ok(self.lines.remove(index))
    }

    /// Empties the order and resets customer and payment method.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer_id = None;
        self.payment_method = PaymentMethod::Unselected;
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    /// Computes subtotal, tax and total. Pure and idempotent.
    pub fn totals(&self, tax_rate: TaxRate) -> OrderTotals {
        let subtotal = self.subtotal();
        let tax = subtotal.calculate_tax(tax_rate);
        OrderTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            tax_rate_bps: tax_rate.bps(),
            subtotal_cents: subtotal.cents(),
            tax_cents: tax.cents(),
            total_cents: (subtotal + tax).cents(),
        }
    }

    /// Finalizes the order into a snapshot and resets it.
    ///
    /// ## Errors
    /// - `EmptyOrder` when there are no lines
    /// - `PaymentMethodRequired` when no payment method is selected
    ///
    /// On error the order is left untouched.
    pub fn complete(&mut self, tax_rate: TaxRate, completed_at: DateTime<Utc>) -> CoreResult<CompletedOrder> {
        if self.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        if self.payment_method == PaymentMethod::Unselected {
            return Err(CoreError::PaymentMethodRequired);
        }

        let totals = self.totals(tax_rate);
        let completed = CompletedOrder {
            id: Uuid::new_v4().to_string(),
            lines: std::mem::take(&mut self.lines),
            customer_id: self.customer_id.take(),
            payment_method: self.payment_method,
            totals,
            completed_at,
        };
        self.clear();
        Ok(completed)
    }

    fn index_of(&self, line_id: &str) -> CoreResult<usize> {
        self.lines
            .iter()
            .position(|l| l.line_id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))
    }
}

/// Totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub tax_rate_bps: u32,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl OrderTotals {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A paid order, frozen at completion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrder {
    pub id: String,
    pub lines: Vec<LineItem>,
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
