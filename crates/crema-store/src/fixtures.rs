//! # Fixtures
//!
//! JSON seed data for the store.
//!
//! ## Load Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Seeding the Store                                │
//! │                                                                         │
//! │  fixtures dir configured?                                              │
//! │       │                                                                 │
//! │       ├── yes ──► FixtureSet::from_dir(dir)   (tokio::fs, per file)    │
//! │       │                                                                 │
//! │       └── no ───► FixtureSet::embedded()      (compiled-in JSON)       │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                 check_integrity()   ids unique, references resolve     │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                 into_data()         build ledgers, reconcile every     │
//! │                                     customer balance against history   │
//! │                                     (warn! for each repaired balance)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A file missing from a fixtures directory is an empty collection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use crema_core::{
    Customer, CustomerTransaction, Feedback, InventoryItem, InventoryLedger, InventoryTransaction,
    LoyaltyLedger, Product, Shift, Staff,
};

use crate::error::{StoreError, StoreResult};
use crate::store::StoreData;

pub const PRODUCTS_FILE: &str = "products.json";
pub const CUSTOMERS_FILE: &str = "customers.json";
pub const TRANSACTIONS_FILE: &str = "customer_transactions.json";
pub const FEEDBACK_FILE: &str = "feedback.json";
pub const STAFF_FILE: &str = "staff.json";
pub const SHIFTS_FILE: &str = "shifts.json";
pub const INVENTORY_ITEMS_FILE: &str = "inventory_items.json";
pub const INVENTORY_TRANSACTIONS_FILE: &str = "inventory_transactions.json";

/// Raw fixture records, before ledgers are built.
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub transactions: Vec<CustomerTransaction>,
    pub feedback: Vec<Feedback>,
    pub staff: Vec<Staff>,
    pub shifts: Vec<Shift>,
    pub inventory_items: Vec<InventoryItem>,
    pub inventory_transactions: Vec<InventoryTransaction>,
}

/// A customer balance that disagreed with its transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRepair {
    pub customer_id: String,
    pub stored: i64,
    pub expected: i64,
}

/// What seeding loaded and repaired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub products: usize,
    pub customers: usize,
    pub transactions: usize,
    pub feedback: usize,
    pub staff: usize,
    pub shifts: usize,
    pub inventory_items: usize,
    pub inventory_transactions: usize,
    pub repaired_balances: Vec<BalanceRepair>,
}

fn parse<T: DeserializeOwned>(file: &str, text: &str) -> StoreResult<Vec<T>> {
    serde_json::from_str(text).map_err(|e| StoreError::FixtureParse {
        file: file.to_string(),
        message: e.to_string(),
    })
}

async fn read_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> StoreResult<Vec<T>> {
    let path = dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => parse(file, &text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Fixture file absent, using empty collection");
            Ok(Vec::new())
        }
        Err(e) => Err(StoreError::FixtureRead {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

impl FixtureSet {
    /// The demo data compiled into the binary.
    pub fn embedded() -> StoreResult<Self> {
        Ok(FixtureSet {
            products: parse(PRODUCTS_FILE, include_str!("../fixtures/products.json"))?,
            customers: parse(CUSTOMERS_FILE, include_str!("../fixtures/customers.json"))?,
            transactions: parse(
                TRANSACTIONS_FILE,
                include_str!("../fixtures/customer_transactions.json"),
            )?,
            feedback: parse(FEEDBACK_FILE, include_str!("../fixtures/feedback.json"))?,
            staff: parse(STAFF_FILE, include_str!("../fixtures/staff.json"))?,
            shifts: parse(SHIFTS_FILE, include_str!("../fixtures/shifts.json"))?,
            inventory_items: parse(
                INVENTORY_ITEMS_FILE,
                include_str!("../fixtures/inventory_items.json"),
            )?,
            inventory_transactions: parse(
                INVENTORY_TRANSACTIONS_FILE,
                include_str!("../fixtures/inventory_transactions.json"),
            )?,
        })
    }

    /// Reads every fixture file from a directory.
    pub async fn from_dir(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        info!(dir = %dir.display(), "Loading fixtures");

        Ok(FixtureSet {
            products: read_optional(dir, PRODUCTS_FILE).await?,
            customers: read_optional(dir, CUSTOMERS_FILE).await?,
            transactions: read_optional(dir, TRANSACTIONS_FILE).await?,
            feedback: read_optional(dir, FEEDBACK_FILE).await?,
            staff: read_optional(dir, STAFF_FILE).await?,
            shifts: read_optional(dir, SHIFTS_FILE).await?,
            inventory_items: read_optional(dir, INVENTORY_ITEMS_FILE).await?,
            inventory_transactions: read_optional(dir, INVENTORY_TRANSACTIONS_FILE).await?,
        })
    }

    /// Verifies ids are unique per collection and every reference resolves.
    pub fn check_integrity(&self) -> StoreResult<()> {
        let product_ids = unique_ids("product", self.products.iter().map(|p| p.id.as_str()))?;
        let customer_ids = unique_ids("customer", self.customers.iter().map(|c| c.id.as_str()))?;
        unique_ids("transaction", self.transactions.iter().map(|t| t.id.as_str()))?;
        unique_ids("feedback", self.feedback.iter().map(|f| f.id.as_str()))?;
        let staff_ids = unique_ids("staff", self.staff.iter().map(|s| s.id.as_str()))?;
        unique_ids("shift", self.shifts.iter().map(|s| s.id.as_str()))?;
        let item_ids = unique_ids(
            "inventory item",
            self.inventory_items.iter().map(|i| i.id.as_str()),
        )?;
        unique_ids(
            "inventory transaction",
            self.inventory_transactions.iter().map(|t| t.id.as_str()),
        )?;
        debug!(products = product_ids.len(), "Fixture ids unique");

        for tx in &self.transactions {
            ensure_ref(&customer_ids, &tx.customer_id, "transaction", &tx.id, "customer")?;
        }
        for f in &self.feedback {
            ensure_ref(&customer_ids, &f.customer_id, "feedback", &f.id, "customer")?;
        }
        for shift in &self.shifts {
            ensure_ref(&staff_ids, &shift.staff_id, "shift", &shift.id, "staff member")?;
        }
        for tx in &self.inventory_transactions {
            ensure_ref(&item_ids, &tx.item_id, "inventory transaction", &tx.id, "item")?;
        }
        Ok(())
    }

    /// Builds the store's collections, reconciling every customer's balance
    /// against the transaction history.
    pub(crate) fn into_data(self) -> StoreResult<(StoreData, SeedReport)> {
        self.check_integrity()?;

        let mut report = SeedReport {
            products: self.products.len(),
            customers: self.customers.len(),
            transactions: self.transactions.len(),
            feedback: self.feedback.len(),
            staff: self.staff.len(),
            shifts: self.shifts.len(),
            inventory_items: self.inventory_items.len(),
            inventory_transactions: self.inventory_transactions.len(),
            repaired_balances: Vec::new(),
        };

        let loyalty = LoyaltyLedger::from_history(self.transactions);
        let mut customers = self.customers;
        for customer in &mut customers {
            if let Some(stored) = loyalty.reconcile(customer) {
                warn!(
                    customer_id = %customer.id,
                    stored,
                    expected = customer.points(),
                    "Fixture points balance disagreed with history, repaired"
                );
                report.repaired_balances.push(BalanceRepair {
                    customer_id: customer.id.clone(),
                    stored,
                    expected: customer.points(),
                });
            }
        }

        let data = StoreData {
            products: self.products,
            customers,
            loyalty,
            feedback: self.feedback,
            staff: self.staff,
            shifts: self.shifts,
            inventory_items: self.inventory_items,
            inventory: InventoryLedger::from_history(self.inventory_transactions),
            orders: Vec::new(),
        };

        info!(
            products = report.products,
            customers = report.customers,
            transactions = report.transactions,
            repaired = report.repaired_balances.len(),
            "Fixtures seeded"
        );
        Ok((data, report))
    }
}

fn unique_ids<'a>(
    entity: &str,
    ids: impl Iterator<Item = &'a str>,
) -> StoreResult<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::FixtureIntegrity(format!(
                "duplicate {} id {}",
                entity, id
            )));
        }
    }
    Ok(seen)
}

fn ensure_ref(
    known: &HashSet<&str>,
    target: &str,
    entity: &str,
    id: &str,
    target_entity: &str,
) -> StoreResult<()> {
    if known.contains(target) {
        Ok(())
    } else {
        Err(StoreError::FixtureIntegrity(format!(
            "{} {} references unknown {} {}",
            entity, id, target_entity, target
        )))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
