//! # Store
//!
//! The shared in-memory collections and the handle that hands out
//! repositories over them.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Store Handle                                  │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new() / ::from_dir(path) / ::empty()                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::new(config).await ← Load fixtures + reconcile balances         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │        Arc<RwLock<StoreData>>           │                           │
//! │  │  products  customers  loyalty ledger    │                           │
//! │  │  feedback  staff      shifts            │                           │
//! │  │  inventory items      inventory ledger  │                           │
//! │  │  completed orders                       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │  store.customers() / .transactions() / .inventory() ...        │
//! │       ▼                                                                 │
//! │  Repositories: each write takes the lock once, so a ledger entry       │
//! │  and the balance it moves change together or not at all.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crema_core::{
    CompletedOrder, Customer, CustomerTransaction, Feedback, InventoryItem, InventoryLedger,
    LoyaltyLedger, Order, Product, Shift, Staff, TaxRate, TransactionDraft, TransactionType,
};

use crate::error::{StoreError, StoreResult};
use crate::fixtures::{FixtureSet, SeedReport};
use crate::repository::customer::CustomerRepository;
use crate::repository::feedback::FeedbackRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::shift::ShiftRepository;
use crate::repository::staff::StaffRepository;
use crate::repository::transaction::TransactionRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust
/// use crema_store::StoreConfig;
///
/// let config = StoreConfig::from_dir("./fixtures");
/// assert!(config.fixtures_dir.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the JSON fixture files.
    /// Default: None (use the embedded demo data)
    pub fixtures_dir: Option<PathBuf>,

    /// Whether to seed at all.
    /// Default: true
    pub seed: bool,
}

impl StoreConfig {
    /// Seeds from the embedded demo fixtures.
    pub fn new() -> Self {
        StoreConfig {
            fixtures_dir: None,
            seed: true,
        }
    }

    /// Seeds from a directory of fixture files.
    pub fn from_dir(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            fixtures_dir: Some(path.into()),
            seed: true,
        }
    }

    /// Starts with every collection empty (for testing).
    pub fn empty() -> Self {
        StoreConfig {
            fixtures_dir: None,
            seed: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Store Data
// =============================================================================

/// Every collection the store owns.
#[derive(Debug, Default)]
pub(crate) struct StoreData {
    pub(crate) products: Vec<Product>,
    pub(crate) customers: Vec<Customer>,
    pub(crate) loyalty: LoyaltyLedger,
    pub(crate) feedback: Vec<Feedback>,
    pub(crate) staff: Vec<Staff>,
    pub(crate) shifts: Vec<Shift>,
    pub(crate) inventory_items: Vec<InventoryItem>,
    pub(crate) inventory: InventoryLedger,
    pub(crate) orders: Vec<CompletedOrder>,
}

impl StoreData {
    pub(crate) fn customer_mut(&mut self, id: &str) -> StoreResult<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("Customer", id))
    }
}

pub(crate) type SharedData = Arc<RwLock<StoreData>>;

// =============================================================================
// Checkout
// =============================================================================

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub order: CompletedOrder,
    /// The purchase recorded for the attached customer, if any.
    pub loyalty_transaction: Option<CustomerTransaction>,
    /// The customer's balance after the purchase.
    pub points_balance: Option<i64>,
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cloning is cheap; all clones share the same collections.
///
/// ## Usage
/// ```rust,ignore
/// let store = Store::new(StoreConfig::new()).await?;
///
/// let latte = store.products().require("p-latte").await?;
/// let history = store.transactions().list_for_customer("c-1001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    data: SharedData,
    seed_report: Arc<SeedReport>,
}

impl Store {
    /// Creates a store and seeds it.
    ///
    /// ## What This Does
    /// 1. Reads fixtures (directory or embedded)
    /// 2. Checks ids and references
    /// 3. Builds the loyalty and inventory ledgers
    /// 4. Repairs any customer balance that disagrees with its history
    pub async fn new(config: StoreConfig) -> StoreResult<Self> {
        info!(
            fixtures_dir = ?config.fixtures_dir,
            seed = config.seed,
            "Initializing store"
        );

        let fixtures = match (&config.fixtures_dir, config.seed) {
            (_, false) => FixtureSet::default(),
            (Some(dir), true) => FixtureSet::from_dir(dir).await?,
            (None, true) => FixtureSet::embedded()?,
        };

        Self::from_fixtures(fixtures)
    }

    /// Builds a store from already-loaded fixtures.
    pub fn from_fixtures(fixtures: FixtureSet) -> StoreResult<Self> {
        let (data, report) = fixtures.into_data()?;
        Ok(Store {
            data: Arc::new(RwLock::new(data)),
            seed_report: Arc::new(report),
        })
    }

    /// What seeding loaded and repaired.
    pub fn seed_report(&self) -> &SeedReport {
        &self.seed_report
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.data.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.data.clone())
    }

    /// Returns the loyalty transaction repository.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.data.clone())
    }

    pub fn feedback(&self) -> FeedbackRepository {
        FeedbackRepository::new(self.data.clone())
    }

    pub fn staff(&self) -> StaffRepository {
        StaffRepository::new(self.data.clone())
    }

    pub fn shifts(&self) -> ShiftRepository {
        ShiftRepository::new(self.data.clone())
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.data.clone())
    }

    /// Completes an order and credits the attached customer.
    ///
    /// ## Flow
    /// ```text
    /// order ──complete()──► CompletedOrder
    ///                            │
    ///              customer attached and total > 0?
    ///                            │ yes
    ///                            ▼
    ///        record purchase { amount: total, orderId, points derived }
    ///                            │
    ///                            ▼
    ///              order reset, receipt returned
    /// ```
    ///
    /// Runs under the store's write lock and works on a copy of the order,
    /// so the caller's order is only reset once everything has succeeded.
    pub async fn checkout(&self, order: &mut Order, tax_rate: TaxRate) -> StoreResult<Receipt> {
        let mut data = self.data.write().await;

        if let Some(customer_id) = order.customer_id() {
            let customer = data.customer_mut(customer_id)?;
            if !customer.is_active {
                return Err(crema_core::ValidationError::invalid(
                    "customerId",
                    "customer is inactive",
                )
                .into());
            }
        }

        let mut working = order.clone();
        let completed = working.complete(tax_rate, Utc::now())?;

        let mut loyalty_transaction = None;
        let mut points_balance = None;

        if let Some(customer_id) = completed.customer_id.as_deref() {
            let total = completed.totals.total();
            if total.is_positive() {
                let mut draft = TransactionDraft::new(
                    customer_id,
                    completed.completed_at.date_naive(),
                    TransactionType::Purchase,
                );
                draft.order_id = Some(completed.id.clone());
                draft.amount_cents = total.cents();

                let StoreData {
                    customers, loyalty, ..
                } = &mut *data;
                let customer = customers
                    .iter_mut()
                    .find(|c| c.id == customer_id)
                    .ok_or_else(|| StoreError::not_found("Customer", customer_id))?;
                let tx = loyalty.record(customer, draft)?;

                info!(
                    order_id = %completed.id,
                    customer_id = %customer_id,
                    points = tx.points_earned,
                    balance = customer.points(),
                    "Purchase recorded at checkout"
                );
                points_balance = Some(customer.points());
                loyalty_transaction = Some(tx);
            } else {
                debug!(order_id = %completed.id, "Zero total, no loyalty entry");
            }
        }

        data.orders.push(completed.clone());
        *order = working;

        info!(
            order_id = %completed.id,
            total = %completed.totals.total(),
            "Order completed"
        );

        Ok(Receipt {
            order: completed,
            loyalty_transaction,
            points_balance,
        })
    }

    /// Orders completed since startup, oldest first.
    pub async fn completed_orders(&self) -> Vec<CompletedOrder> {
        self.data.read().await.orders.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crema_core::order::{ItemOptions, Milk, Size};
    use crema_core::{CoreError, PaymentMethod};

    async fn seeded() -> Store {
        Store::new(StoreConfig::new()).await.unwrap()
    }

    async fn latte_order(store: &Store, customer: Option<&str>) -> Order {
        let latte = store.products().require("p-latte").await.unwrap();
        let mut order = Order::new();
        let line = order
            .add_item(&latte, ItemOptions::new(Size::Large, Milk::Oat, Vec::<String>::new()))
            .unwrap();
        order.update_quantity(&line, 1).unwrap();
        order.set_customer(customer.map(str::to_string));
        order.set_payment_method(PaymentMethod::Card);
        order
    }

    #[tokio::test]
    async fn test_seeded_store_has_no_repairs() {
        let store = seeded().await;
        assert!(store.seed_report().repaired_balances.is_empty());
        assert!(store.seed_report().customers > 0);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = Store::new(StoreConfig::empty()).await.unwrap();
        assert!(store.products().list(false).await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_credits_customer() {
        let store = seeded().await;
        let before = store.customers().require("c-1003").await.unwrap().points();

        let mut order = latte_order(&store, Some("c-1003")).await;
        let receipt = store.checkout(&mut order, TaxRate::from_bps(800)).await.unwrap();

        assert_eq!(receipt.order.totals.total_cents, 1296);
        let tx = receipt.loyalty_transaction.unwrap();
        assert_eq!(tx.amount_cents, 1296);
        assert_eq!(tx.points_earned, 13);
        assert_eq!(tx.order_id.as_deref(), Some(receipt.order.id.as_str()));
        assert_eq!(receipt.points_balance, Some(before + 13));
        assert!(order.is_empty());
        assert_eq!(store.completed_orders().await.len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_without_customer() {
        let store = seeded().await;
        let mut order = latte_order(&store, None).await;

        let receipt = store.checkout(&mut order, TaxRate::default()).await.unwrap();
        assert!(receipt.loyalty_transaction.is_none());
        assert!(order.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_requires_payment_method() {
        let store = seeded().await;
        let mut order = latte_order(&store, None).await;
        order.set_payment_method(PaymentMethod::Unselected);

        let err = store.checkout(&mut order, TaxRate::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::PaymentMethodRequired)));
        assert_eq!(order.item_count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_unknown_customer_leaves_order() {
        let store = seeded().await;
        let mut order = latte_order(&store, Some("c-nope")).await;

        let err = store.checkout(&mut order, TaxRate::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(!order.is_empty());
        assert!(store.completed_orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_inactive_customer_rejected() {
        let store = seeded().await;
        let mut order = latte_order(&store, Some("c-1004")).await;

        let err = store.checkout(&mut order, TaxRate::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        assert!(!order.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store = seeded().await;
        let other = store.clone();
        let mut order = latte_order(&store, None).await;
        store.checkout(&mut order, TaxRate::default()).await.unwrap();
        assert_eq!(other.completed_orders().await.len(), 1);
    }
}
