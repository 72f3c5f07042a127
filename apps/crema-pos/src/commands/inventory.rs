//! # Inventory Commands
//!
//! Stock items and the movements that change their on-hand quantity.

use tracing::debug;

use crema_core::{InventoryDraft, InventoryItem, InventoryTransaction};
use crema_store::NewInventoryItem;

use crate::error::ApiError;
use crate::state::StoreState;

/// Lists stock items by name, optionally filtered.
pub async fn list_inventory(store: &StoreState, query: Option<String>) -> Vec<InventoryItem> {
    debug!(query = ?query, "list_inventory command");
    store.inner().inventory().list_items(query.as_deref()).await
}

/// Items at or below their reorder level.
pub async fn low_stock(store: &StoreState) -> Vec<InventoryItem> {
    store.inner().inventory().low_stock().await
}

pub async fn inventory_history(
    store: &StoreState,
    item_id: String,
) -> Result<Vec<InventoryTransaction>, ApiError> {
    debug!(item_id = %item_id, "inventory_history command");
    Ok(store.inner().inventory().transactions_for(&item_id).await?)
}

pub async fn add_inventory_item(
    store: &StoreState,
    input: NewInventoryItem,
) -> Result<InventoryItem, ApiError> {
    debug!(name = %input.name, "add_inventory_item command");
    Ok(store.inner().inventory().add_item(input).await?)
}

/// Records a restock, usage, adjustment or write-off.
pub async fn record_inventory(
    store: &StoreState,
    draft: InventoryDraft,
) -> Result<InventoryTransaction, ApiError> {
    debug!(item_id = %draft.item_id, tx_type = %draft.tx_type, quantity = draft.quantity, "record_inventory command");
    Ok(store.inner().inventory().record(draft).await?)
}

/// Removes a movement and reverses its quantity.
pub async fn delete_inventory_transaction(
    store: &StoreState,
    id: String,
) -> Result<InventoryTransaction, ApiError> {
    debug!(inventory_tx_id = %id, "delete_inventory_transaction command");
    Ok(store.inner().inventory().delete_transaction(&id).await?)
}
