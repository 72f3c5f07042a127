//! # crema-store: In-Memory Store for Crema
//!
//! Owns the back office collections (menu, customers, loyalty ledger,
//! feedback, staff, shifts, inventory) behind one shared lock and exposes
//! them through repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Crema Data Flow                                 │
//! │                                                                         │
//! │  Command (record_transaction)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   crema-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │   Fixtures   │  │   │
//! │  │   │  (store.rs)   │    │               │    │   (JSON)     │  │   │
//! │  │   │               │    │ CustomerRepo  │    │              │  │   │
//! │  │   │ Arc<RwLock<   │◄───│ TransactionRe │    │ embedded or  │  │   │
//! │  │   │  StoreData>>  │    │ InventoryRepo │    │ a directory  │  │   │
//! │  │   │ checkout()    │    │ ...           │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  crema-core: LoyaltyLedger, InventoryLedger, validation                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The shared collections, configuration and checkout
//! - [`fixtures`] - JSON seed data and integrity checks
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crema_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new()).await?;
//!
//! let customer = store.customers().require("c-1001").await?;
//! let history = store.transactions().list_for_customer(&customer.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use fixtures::{BalanceRepair, FixtureSet, SeedReport};
pub use store::{Receipt, Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::customer::{CustomerRepository, NewCustomer, PointsCheck};
pub use repository::feedback::{FeedbackRepository, FeedbackSummary, NewFeedback};
pub use repository::inventory::{InventoryRepository, NewInventoryItem};
pub use repository::product::ProductRepository;
pub use repository::shift::{NewShift, ShiftRepository};
pub use repository::staff::{NewStaff, StaffRepository};
pub use repository::transaction::TransactionRepository;
