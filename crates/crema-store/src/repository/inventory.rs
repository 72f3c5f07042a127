//! # Inventory Repository
//!
//! Stocked items and the movements that change their on-hand quantity.
//!
//! ```text
//! record(draft)              delete(id)
//!     │                          │
//!     ▼                          ▼
//! item.qty += delta          item.qty -= delta
//!     │                          │
//!     └── InsufficientStock if the result would go below zero
//! ```

use serde::Deserialize;
use tracing::{info, warn};

use crema_core::validation::validate_inventory_item;
use crema_core::{InventoryDraft, InventoryItem, InventoryTransaction};

use super::{matches_query, new_id};
use crate::error::{reject_if_any, StoreError, StoreResult};
use crate::store::{SharedData, StoreData};

/// Input for a new stocked item. Stock starts at zero and is raised by a
/// restock movement.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub unit: String,
    pub unit_cost_cents: i64,
    pub reorder_level: i64,
}

#[derive(Debug, Clone)]
pub struct InventoryRepository {
    data: SharedData,
}

impl InventoryRepository {
    pub(crate) fn new(data: SharedData) -> Self {
        InventoryRepository { data }
    }

    /// Lists items by name, optionally filtered by a name query.
    pub async fn list_items(&self, query: Option<&str>) -> Vec<InventoryItem> {
        let data = self.data.read().await;
        let mut items: Vec<InventoryItem> = data
            .inventory_items
            .iter()
            .filter(|i| query.map_or(true, |q| matches_query(q, [i.name.as_str()])))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    pub async fn get_item(&self, id: &str) -> Option<InventoryItem> {
        let data = self.data.read().await;
        data.inventory_items.iter().find(|i| i.id == id).cloned()
    }

    pub async fn require_item(&self, id: &str) -> StoreResult<InventoryItem> {
        self.get_item(id)
            .await
            .ok_or_else(|| StoreError::not_found("InventoryItem", id))
    }

    pub async fn add_item(&self, input: NewInventoryItem) -> StoreResult<InventoryItem> {
        let item = InventoryItem::new(
            new_id("inv"),
            input.name.trim(),
            input.unit.trim(),
            input.unit_cost_cents,
            input.reorder_level,
        );
        reject_if_any(validate_inventory_item(&item))?;

        let mut data = self.data.write().await;
        if data
            .inventory_items
            .iter()
            .any(|i| i.name.eq_ignore_ascii_case(&item.name))
        {
            return Err(StoreError::duplicate("name", &item.name));
        }
        data.inventory_items.push(item.clone());

        info!(item_id = %item.id, name = %item.name, "Inventory item added");
        Ok(item)
    }

    /// Items at or below their reorder level.
    pub async fn low_stock(&self) -> Vec<InventoryItem> {
        self.list_items(None)
            .await
            .into_iter()
            .filter(InventoryItem::needs_reorder)
            .collect()
    }

    /// Movements for one item, newest first.
    pub async fn transactions_for(&self, item_id: &str) -> StoreResult<Vec<InventoryTransaction>> {
        let data = self.data.read().await;
        if !data.inventory_items.iter().any(|i| i.id == item_id) {
            return Err(StoreError::not_found("InventoryItem", item_id));
        }
        let mut entries: Vec<InventoryTransaction> =
            data.inventory.for_item(item_id).cloned().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    /// Records a movement and applies its stock delta.
    pub async fn record(&self, draft: InventoryDraft) -> StoreResult<InventoryTransaction> {
        let mut data = self.data.write().await;
        let StoreData {
            inventory_items,
            inventory,
            ..
        } = &mut *data;
        let item = inventory_items
            .iter_mut()
            .find(|i| i.id == draft.item_id)
            .ok_or_else(|| StoreError::not_found("InventoryItem", &draft.item_id))?;

        let tx = inventory.record(item, draft)?;
        info!(
            tx_id = %tx.id,
            item_id = %tx.item_id,
            tx_type = %tx.tx_type,
            quantity = tx.quantity,
            on_hand = item.quantity_on_hand(),
            "Inventory movement recorded"
        );
        if item.needs_reorder() {
            warn!(item_id = %item.id, on_hand = item.quantity_on_hand(), "Stock at reorder level");
        }
        Ok(tx)
    }

    /// Deletes a movement and reverses its stock delta.
    pub async fn delete_transaction(&self, id: &str) -> StoreResult<InventoryTransaction> {
        let mut data = self.data.write().await;
        let StoreData {
            inventory_items,
            inventory,
            ..
        } = &mut *data;

        let item_id = inventory
            .get(id)
            .map(|tx| tx.item_id.clone())
            .ok_or_else(|| StoreError::not_found("InventoryTransaction", id))?;
        let item = inventory_items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| StoreError::not_found("InventoryItem", &item_id))?;

        let removed = inventory.delete(item, id)?;
        info!(
            tx_id = %removed.id,
            item_id = %removed.item_id,
            on_hand = item.quantity_on_hand(),
            "Inventory movement deleted"
        );
        Ok(removed)
    }
}
