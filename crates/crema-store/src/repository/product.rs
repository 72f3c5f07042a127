//! # Product Repository
//!
//! Menu lookup for the order screen.

use tracing::{debug, info};

use crema_core::validation::validate_product;
use crema_core::Product;

use super::matches_query;
use crate::error::{reject_if_any, StoreError, StoreResult};
use crate::store::SharedData;

/// Repository for menu products.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    data: SharedData,
}

impl ProductRepository {
    pub(crate) fn new(data: SharedData) -> Self {
        ProductRepository { data }
    }

    /// Lists products sorted by category, then name.
    pub async fn list(&self, available_only: bool) -> Vec<Product> {
        let data = self.data.read().await;
        let mut products: Vec<Product> = data
            .products
            .iter()
            .filter(|p| !available_only || p.is_available)
            .cloned()
            .collect();
        products.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        products
    }

    /// Searches available products by name or category.
    ///
    /// An empty query returns the first `limit` available products.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<Product> {
        debug!(query = %query, limit, "Searching products");

        let mut results: Vec<Product> = self
            .list(true)
            .await
            .into_iter()
            .filter(|p| matches_query(query, [p.name.as_str(), p.category.as_str()]))
            .collect();
        results.truncate(limit);
        results
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Product> {
        let data = self.data.read().await;
        data.products.iter().find(|p| p.id == id).cloned()
    }

    /// Like [`get_by_id`](Self::get_by_id), but a missing product is an error.
    pub async fn require(&self, id: &str) -> StoreResult<Product> {
        self.get_by_id(id)
            .await
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    pub async fn insert(&self, product: Product) -> StoreResult<Product> {
        reject_if_any(validate_product(&product))?;

        let mut data = self.data.write().await;
        if data.products.iter().any(|p| p.id == product.id) {
            return Err(StoreError::duplicate("id", &product.id));
        }
        data.products.push(product.clone());

        info!(product_id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    /// Marks a product as on or off the menu.
    pub async fn set_available(&self, id: &str, available: bool) -> StoreResult<Product> {
        let mut data = self.data.write().await;
        let product = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        product.is_available = available;

        debug!(product_id = %id, available, "Product availability changed");
        Ok(product.clone())
    }
}
