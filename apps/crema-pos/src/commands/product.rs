//! # Product Commands
//!
//! Menu lookup for the order screen.

use tracing::debug;

use crema_core::Product;

use crate::error::ApiError;
use crate::state::{ConfigState, StoreState};

pub async fn list_products(store: &StoreState, available_only: bool) -> Vec<Product> {
    debug!(available_only, "list_products command");
    store.inner().products().list(available_only).await
}

/// Searches available products by name or category.
///
/// Without an explicit `limit` the configured search limit applies.
pub async fn search_products(
    store: &StoreState,
    config: &ConfigState,
    query: String,
    limit: Option<usize>,
) -> Vec<Product> {
    let limit = limit.unwrap_or(config.product_search_limit).max(1);
    debug!(query = %query, limit, "search_products command");
    store.inner().products().search(&query, limit).await
}

pub async fn get_product(store: &StoreState, id: String) -> Result<Product, ApiError> {
    Ok(store.inner().products().require(&id).await?)
}

/// Takes a product on or off the menu.
pub async fn set_product_available(
    store: &StoreState,
    id: String,
    available: bool,
) -> Result<Product, ApiError> {
    debug!(product_id = %id, available, "set_product_available command");
    Ok(store.inner().products().set_available(&id, available).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crema_store::{Store, StoreConfig};

    async fn store() -> StoreState {
        StoreState::new(Store::new(StoreConfig::new()).await.unwrap())
    }

    #[tokio::test]
    async fn test_search_uses_configured_limit() {
        let store = store().await;
        let mut config = ConfigState::default();
        config.product_search_limit = 2;

        let found = search_products(&store, &config, String::new(), None).await;
        assert_eq!(found.len(), 2);

        let found = search_products(&store, &config, "latte".to_string(), Some(10)).await;
        assert!(found.iter().all(|p| p.name.to_lowercase().contains("latte")));
        assert!(found.iter().all(|p| p.is_available));
    }

    #[tokio::test]
    async fn test_availability_toggle() {
        let store = store().await;
        let before = list_products(&store, true).await.len();

        set_product_available(&store, "p-pumpkin".to_string(), true)
            .await
            .unwrap();
        assert_eq!(list_products(&store, true).await.len(), before + 1);

        assert!(get_product(&store, "p-nope".to_string()).await.is_err());
    }
}
