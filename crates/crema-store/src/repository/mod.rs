//! # Repository Module
//!
//! Repository implementations over the store's shared collections.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Command                                                               │
//! │       │                                                                 │
//! │       │  store.transactions().record(draft)                            │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                 │
//! │  ├── take write lock                                                   │
//! │  ├── look up customer                                                  │
//! │  ├── LoyaltyLedger::record (policy + balance check)                    │
//! │  └── release lock                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreData (Arc<RwLock<..>>)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Menu lookup and search
//! - [`CustomerRepository`](customer::CustomerRepository) - Profiles, patches, points checks
//! - [`TransactionRepository`](transaction::TransactionRepository) - Loyalty ledger
//! - [`FeedbackRepository`](feedback::FeedbackRepository) - Ratings and comments
//! - [`StaffRepository`](staff::StaffRepository) - Staff profiles
//! - [`ShiftRepository`](shift::ShiftRepository) - Schedule
//! - [`InventoryRepository`](inventory::InventoryRepository) - Stock and movements

pub mod customer;
pub mod feedback;
pub mod inventory;
pub mod product;
pub mod shift;
pub mod staff;
pub mod transaction;

use uuid::Uuid;

/// Generates a prefixed record id, e.g. `c-1f0c…`.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Case-insensitive substring match over any of the given fields.
pub(crate) fn matches_query<'a>(query: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || fields
            .into_iter()
            .any(|f| f.to_lowercase().contains(&query))
}
