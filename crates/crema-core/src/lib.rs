//! # crema-core: Pure Business Logic for Crema
//!
//! The order engine, transaction type policy and loyalty ledger of a
//! coffee-shop back office, as pure functions over in-memory records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Crema Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    crema-pos (app)                              │   │
//! │  │    JSON-lines commands ──► OrderState / StoreState             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    crema-store                                  │   │
//! │  │        fixtures, repositories, checkout coupling               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ crema-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  order  │ │ policy  │ │ loyalty │ │inventory│ │  patch  │  │   │
//! │  │   │ Order   │ │ rules   │ │ ledger  │ │ ledger  │ │ typed   │  │   │
//! │  │   │ LineItem│ │ prepare │ │ points  │ │ stock   │ │ updates │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO GLOBAL STATE                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Product, Customer, CustomerTransaction, Staff, Shift)
//! - [`money`] - Money type with integer arithmetic
//! - [`order`] - Cart/order engine with option-based repricing
//! - [`policy`] - Per-type rules for customer transactions
//! - [`loyalty`] - Ledger that keeps customer points in step with history
//! - [`inventory`] - Stock items and their movement ledger
//! - [`patch`] - Typed single-field profile updates
//! - [`validation`] - Field and record validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use crema_core::order::{ItemOptions, Milk, Order, Size};
//! use crema_core::{Product, TaxRate};
//!
//! let latte = Product {
//!     id: "p-latte".to_string(),
//!     name: "Latte".to_string(),
//!     category: "espresso".to_string(),
//!     base_price_cents: 450,
//!     is_available: true,
//! };
//!
//! let mut order = Order::new();
//! let line = order
//!     .add_item(&latte, ItemOptions::new(Size::Large, Milk::Oat, Vec::<String>::new()))
//!     .unwrap();
//! order.update_quantity(&line, 1).unwrap();
//!
//! let totals = order.totals(TaxRate::from_bps(800));
//! assert_eq!(totals.subtotal_cents, 1200);
//! assert_eq!(totals.tax_cents, 96);
//! assert_eq!(totals.total_cents, 1296);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod loyalty;
pub mod money;
pub mod order;
pub mod patch;
pub mod policy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{
    InventoryDraft, InventoryItem, InventoryLedger, InventoryTransaction, InventoryTransactionType,
};
pub use loyalty::LoyaltyLedger;
pub use money::Money;
pub use order::{CompletedOrder, ItemOptions, LineItem, Milk, Order, OrderTotals, Size};
pub use patch::{CustomerPatch, StaffPatch};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default sales tax: 8%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Maximum distinct lines in a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity on a single line.
///
/// Catches a mistyped 100 where 10 was meant.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest amount a single loyalty transaction may carry, either sign: $1,000,000.
pub const MAX_TRANSACTION_AMOUNT_CENTS: i64 = 100_000_000;

/// Largest points value a single loyalty transaction may earn or redeem.
pub const MAX_TRANSACTION_POINTS: i64 = 1_000_000;

/// Largest quantity a single inventory movement may move.
pub const MAX_INVENTORY_QUANTITY: i64 = 1_000_000;
