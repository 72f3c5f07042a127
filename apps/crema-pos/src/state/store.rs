//! # Store State
//!
//! Wraps the seeded [`Store`] for use in commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn search_products(
//!     store: &StoreState,
//!     query: &str,
//! ) -> Result<Vec<Product>, ApiError> {
//!     Ok(store.inner().products().search(query, 20).await)
//! }
//! ```

use crema_store::Store;

/// Wrapper around `Store` for state management.
///
/// The store is cheap to clone and locks internally, so commands can run
/// against it concurrently without extra locking here.
#[derive(Debug, Clone)]
pub struct StoreState {
    store: Store,
}

impl StoreState {
    pub fn new(store: Store) -> Self {
        StoreState { store }
    }

    /// Returns a reference to the inner Store.
    pub fn inner(&self) -> &Store {
        &self.store
    }
}
