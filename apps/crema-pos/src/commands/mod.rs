//! # Commands Module
//!
//! Every command the POS answers on its command channel.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (dispatch)
//! ├── order.rs        ◄─── Order building and checkout
//! ├── product.rs      ◄─── Menu lookup
//! ├── customer.rs     ◄─── Loyalty customer profiles
//! ├── transaction.rs  ◄─── Loyalty ledger and the transaction form
//! ├── feedback.rs     ◄─── Customer feedback
//! ├── staff.rs        ◄─── Staff profiles and shifts
//! ├── inventory.rs    ◄─── Stock items and movements
//! └── config.rs       ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  {"id":1,"cmd":"search_products","args":{"query":"latte"}}              │
//! │         │                                                               │
//! │         │ Request::from_json                                            │
//! │         ▼                                                               │
//! │  Command::SearchProducts { query, limit }                               │
//! │         │                                                               │
//! │         │ dispatch(&state, command)                                     │
//! │         ▼                                                               │
//! │  product::search_products(&state.store, &state.config, query, limit)   │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  {"id":1,"ok":true,"data":[...]}                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the store
//! async fn search_customers(store: &StoreState, ...)
//!
//! // Only needs the order
//! async fn update_quantity(order: &OrderState, config: &ConfigState, ...)
//!
//! // Needs both
//! async fn add_to_order(store: &StoreState, order: &OrderState, ...)
//! ```

pub mod config;
pub mod customer;
pub mod feedback;
pub mod inventory;
pub mod order;
pub mod product;
pub mod staff;
pub mod transaction;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::protocol::Command;
use crate::state::AppState;

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("Failed to serialize response: {}", e)))
}

/// Routes a command to its handler and serializes the result.
pub async fn dispatch(state: &AppState, command: Command) -> Result<Value, ApiError> {
    let AppState {
        store,
        order: current,
        config: cfg,
    } = state;

    match command {
        // Order
        Command::GetOrder => to_data(order::get_order(current, cfg).await),
        Command::AddToOrder {
            product_id,
            options,
        } => to_data(order::add_to_order(store, current, cfg, product_id, options).await?),
        Command::UpdateQuantity { line_id, delta } => {
            to_data(order::update_quantity(current, cfg, line_id, delta).await?)
        }
        Command::CustomizeItem { line_id, options } => {
            to_data(order::customize_item(current, cfg, line_id, options).await?)
        }
        Command::RemoveFromOrder { line_id } => {
            to_data(order::remove_from_order(current, cfg, line_id).await?)
        }
        Command::SetOrderCustomer { customer_id } => {
            to_data(order::set_order_customer(store, current, cfg, customer_id).await?)
        }
        Command::SetPaymentMethod { method } => {
            to_data(order::set_payment_method(current, cfg, method).await)
        }
        Command::ClearOrder => to_data(order::clear_order(current, cfg).await),
        Command::Checkout => to_data(order::checkout(store, current, cfg).await?),
        Command::ListCompletedOrders => to_data(order::list_completed_orders(store).await),

        // Products
        Command::ListProducts { available_only } => {
            to_data(product::list_products(store, available_only).await)
        }
        Command::SearchProducts { query, limit } => {
            to_data(product::search_products(store, cfg, query, limit).await)
        }
        Command::GetProduct { id } => to_data(product::get_product(store, id).await?),
        Command::SetProductAvailable { id, available } => {
            to_data(product::set_product_available(store, id, available).await?)
        }

        // Customers
        Command::ListCustomers { include_inactive } => {
            to_data(customer::list_customers(store, include_inactive).await)
        }
        Command::SearchCustomers { query } => {
            to_data(customer::search_customers(store, query).await)
        }
        Command::GetCustomer { id } => to_data(customer::get_customer(store, id).await?),
        Command::CreateCustomer(input) => to_data(customer::create_customer(store, input).await?),
        Command::UpdateCustomer { id, patch } => {
            to_data(customer::update_customer(store, id, patch).await?)
        }
        Command::RecomputePoints { id } => to_data(customer::recompute_points(store, id).await?),
        Command::CheckPoints => to_data(customer::check_points(store).await?),

        // Loyalty transactions
        Command::ListTransactions { customer_id } => {
            to_data(transaction::list_transactions(store, customer_id).await?)
        }
        Command::PreviewTransaction { draft } => {
            to_data(transaction::preview_transaction(draft))
        }
        Command::SwitchTransactionType { draft, tx_type } => {
            to_data(transaction::switch_transaction_type(draft, tx_type))
        }
        Command::RecordTransaction { draft } => {
            to_data(transaction::record_transaction(store, draft).await?)
        }
        Command::EditTransaction { id, draft } => {
            to_data(transaction::edit_transaction(store, id, draft).await?)
        }
        Command::DeleteTransaction { id } => {
            to_data(transaction::delete_transaction(store, id).await?)
        }

        // Feedback
        Command::ListFeedback { customer_id } => {
            to_data(feedback::list_feedback(store, customer_id).await)
        }
        Command::CreateFeedback(input) => to_data(feedback::create_feedback(store, input).await?),
        Command::DeleteFeedback { id } => to_data(feedback::delete_feedback(store, id).await?),
        Command::FeedbackSummary => to_data(feedback::feedback_summary(store).await),

        // Staff & shifts
        Command::ListStaff { include_inactive } => {
            to_data(staff::list_staff(store, include_inactive).await)
        }
        Command::GetStaff { id } => to_data(staff::get_staff(store, id).await?),
        Command::CreateStaff(input) => to_data(staff::create_staff(store, input).await?),
        Command::UpdateStaff { id, patch } => to_data(staff::update_staff(store, id, patch).await?),
        Command::ListShifts { date, staff_id } => {
            to_data(staff::list_shifts(store, date, staff_id).await)
        }
        Command::ScheduleShift(input) => to_data(staff::schedule_shift(store, input).await?),
        Command::UpdateShift { id, shift } => to_data(staff::update_shift(store, id, shift).await?),
        Command::DeleteShift { id } => to_data(staff::delete_shift(store, id).await?),

        // Inventory
        Command::ListInventory { query } => to_data(inventory::list_inventory(store, query).await),
        Command::LowStock => to_data(inventory::low_stock(store).await),
        Command::InventoryHistory { item_id } => {
            to_data(inventory::inventory_history(store, item_id).await?)
        }
        Command::AddInventoryItem(input) => {
            to_data(inventory::add_inventory_item(store, input).await?)
        }
        Command::RecordInventory { draft } => {
            to_data(inventory::record_inventory(store, draft).await?)
        }
        Command::DeleteInventoryTransaction { id } => {
            to_data(inventory::delete_inventory_transaction(store, id).await?)
        }

        // Config
        Command::GetConfig => to_data(config::get_config(cfg)),
        Command::SeedReport => to_data(config::seed_report(store)),
    }
}
